//! Per-tick observers
//!
//! Hooks are plain closures registered on a [`Simulator`](super::Simulator).
//! After every tick each hook receives either the charge grid or the field,
//! together with the step index, in registration order.

use serde::{Deserialize, Serialize};

use crate::core_types::FieldData;
use crate::grid::ChargeGrid;

/// Which array a hook observes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookTarget {
    /// The charge grid after transport and injection
    #[default]
    Charge,
    /// The field used for this tick's transport
    Field,
}

impl HookTarget {
    /// Parse `"charge"` or `"field"` (case-insensitive)
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "charge" | "q" => Some(Self::Charge),
            "field" | "e" => Some(Self::Field),
            _ => None,
        }
    }
}

/// Borrowed view handed to a hook for the duration of the call
#[derive(Debug, Clone, Copy)]
pub enum StepView<'a> {
    /// Charge grid
    Charge(&'a ChargeGrid),
    /// Derived field
    Field(&'a FieldData),
}

impl StepView<'_> {
    /// Row-major values of the observed array
    #[must_use]
    pub fn values(&self) -> &[f32] {
        match self {
            StepView::Charge(grid) => grid.cells(),
            StepView::Field(field) => field.as_slice(),
        }
    }

    /// Number of rows
    #[must_use]
    pub fn rows(&self) -> usize {
        match self {
            StepView::Charge(grid) => grid.rows(),
            StepView::Field(field) => field.rows,
        }
    }

    /// Number of columns
    #[must_use]
    pub fn cols(&self) -> usize {
        match self {
            StepView::Charge(grid) => grid.cols(),
            StepView::Field(field) => field.cols,
        }
    }

    /// Which array this view exposes
    #[must_use]
    pub fn target(&self) -> HookTarget {
        match self {
            StepView::Charge(_) => HookTarget::Charge,
            StepView::Field(_) => HookTarget::Field,
        }
    }
}

/// Boxed hook callback
pub type HookFn = Box<dyn FnMut(StepView<'_>, usize)>;

pub(crate) struct StepHook {
    pub(crate) target: HookTarget,
    pub(crate) callback: HookFn,
}

impl std::fmt::Debug for StepHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepHook")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_from_name() {
        assert_eq!(HookTarget::from_name("Field"), Some(HookTarget::Field));
        assert_eq!(HookTarget::from_name("charge"), Some(HookTarget::Charge));
        assert_eq!(HookTarget::from_name("potential"), None);
    }

    #[test]
    fn test_view_exposes_shape_and_values() {
        let grid = ChargeGrid::from_values(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let view = StepView::Charge(&grid);
        assert_eq!((view.rows(), view.cols()), (2, 3));
        assert_eq!(view.values()[4], 5.0);
        assert_eq!(view.target(), HookTarget::Charge);

        let field = FieldData::with_value(4, 1, -0.5);
        let view = StepView::Field(&field);
        assert_eq!((view.rows(), view.cols()), (4, 1));
        assert!(view.values().iter().all(|&v| v == -0.5));
    }
}
