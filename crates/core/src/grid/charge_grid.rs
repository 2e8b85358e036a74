//! Scalar charge grid with a cached adjacency list

use std::sync::{Arc, OnceLock};

use tracing::trace;

use super::neighbors::{build_neighbor_pairs, NeighborPair};
use crate::core_types::{finite_or_zero, FieldData, RandomSource};
use crate::error::GridError;

/// 2D charge distribution on a fixed `rows x cols` grid
///
/// Every stored value is finite: all write paths coerce NaN and infinities to
/// zero. The adjacency list is built on first use and shared by clones, since
/// the shape never changes after construction.
#[derive(Debug, Clone)]
pub struct ChargeGrid {
    cells: FieldData,
    neighbors: OnceLock<Arc<[NeighborPair]>>,
}

impl ChargeGrid {
    /// Create a zero-filled grid
    ///
    /// # Arguments
    ///
    /// * `rows` - Number of rows, at least 1
    /// * `cols` - Number of columns, at least 1
    ///
    /// # Returns
    ///
    /// Grid with every cell at zero; adjacency is built on first use
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ZeroDimension`] if either dimension is zero and
    /// [`GridError::TooLarge`] if the cell count overflows `usize`.
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        validate_shape(rows, cols)?;
        Ok(Self {
            cells: FieldData::new(rows, cols),
            neighbors: OnceLock::new(),
        })
    }

    /// Create a grid from row-major values, coercing non-finite entries to zero
    ///
    /// # Errors
    ///
    /// Returns the same shape errors as [`ChargeGrid::new`], or
    /// [`GridError::ShapeMismatch`] if `values` has the wrong length.
    pub fn from_values(rows: usize, cols: usize, values: Vec<f32>) -> Result<Self, GridError> {
        let expected = validate_shape(rows, cols)?;
        if values.len() != expected {
            return Err(GridError::ShapeMismatch {
                expected,
                actual: values.len(),
            });
        }
        let mut cells = FieldData {
            data: values,
            rows,
            cols,
        };
        sanitize(cells.as_mut_slice());
        Ok(Self {
            cells,
            neighbors: OnceLock::new(),
        })
    }

    /// Number of rows
    #[must_use]
    pub fn rows(&self) -> usize {
        self.cells.rows
    }

    /// Number of columns
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cells.cols
    }

    /// Total number of cells
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.data.len()
    }

    /// Always false; a grid has at least one cell
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.data.is_empty()
    }

    /// Flat row-major index of `(i, j)`
    #[inline]
    #[must_use]
    pub fn index(&self, i: usize, j: usize) -> usize {
        self.cells.index(i, j)
    }

    /// Charge values in row-major order
    #[must_use]
    pub fn cells(&self) -> &[f32] {
        self.cells.as_slice()
    }

    /// Charge values as a field
    #[must_use]
    pub fn field(&self) -> &FieldData {
        &self.cells
    }

    /// Charge at `(i, j)`
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.cells.get(i, j)
    }

    /// Charge at `(i, j)`, or `None` outside the grid
    #[must_use]
    pub fn try_get(&self, i: usize, j: usize) -> Option<f32> {
        (i < self.rows() && j < self.cols()).then(|| self.cells.get(i, j))
    }

    /// Set the charge at `(i, j)`; non-finite values are stored as zero
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    pub fn set(&mut self, i: usize, j: usize, value: f32) {
        self.cells.set(i, j, finite_or_zero(value));
    }

    /// Add `amount` to the charge at `(i, j)`
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    pub fn add_charge(&mut self, i: usize, j: usize, amount: f32) {
        let current = self.get(i, j);
        self.set(i, j, current + amount);
    }

    /// Add one unit of charge to a uniformly chosen cell, returning its coordinates
    pub fn place_charge<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> (usize, usize) {
        let i = rng.next_index(self.rows());
        let j = rng.next_index(self.cols());
        self.add_charge(i, j, 1.0);
        (i, j)
    }

    /// Zero every cell
    pub fn clear(&mut self) {
        self.cells.fill(0.0);
    }

    /// Sum of all cell values, accumulated in `f64` so it cannot overflow
    #[must_use]
    pub fn total_charge(&self) -> f64 {
        self.cells.data.iter().map(|&v| f64::from(v)).sum()
    }

    /// Whether `(i, j)` lies on the outer ring of the grid
    #[inline]
    #[must_use]
    pub fn is_border(&self, i: usize, j: usize) -> bool {
        i == 0 || j == 0 || i + 1 == self.rows() || j + 1 == self.cols()
    }

    /// Adjacency list, built on first call and identical on every later call
    #[must_use]
    pub fn neighbor_pairs(&self) -> &[NeighborPair] {
        self.cached_pairs()
    }

    /// Shared handle to the adjacency list
    #[must_use]
    pub fn shared_neighbor_pairs(&self) -> Arc<[NeighborPair]> {
        Arc::clone(self.cached_pairs())
    }

    fn cached_pairs(&self) -> &Arc<[NeighborPair]> {
        self.neighbors.get_or_init(|| {
            let pairs = build_neighbor_pairs(self.rows(), self.cols());
            trace!(
                "Built adjacency for {}x{} grid: {} pairs",
                self.rows(),
                self.cols(),
                pairs.len()
            );
            pairs.into()
        })
    }

    /// Replace all cell values from a same-length buffer, sanitizing on the way
    /// in. The buffer receives the previous values.
    pub(crate) fn swap_cells(&mut self, next: &mut Vec<f32>) {
        debug_assert_eq!(next.len(), self.len());
        sanitize(next);
        std::mem::swap(&mut self.cells.data, next);
    }
}

fn validate_shape(rows: usize, cols: usize) -> Result<usize, GridError> {
    if rows == 0 || cols == 0 {
        return Err(GridError::ZeroDimension { rows, cols });
    }
    rows.checked_mul(cols)
        .ok_or(GridError::TooLarge { rows, cols })
}

fn sanitize(values: &mut [f32]) {
    for v in values {
        *v = finite_or_zero(*v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_grid_is_zeroed() {
        let grid = ChargeGrid::new(4, 5).unwrap();
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.cols(), 5);
        assert_eq!(grid.len(), 20);
        assert!(grid.cells().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert_eq!(
            ChargeGrid::new(0, 3).unwrap_err(),
            GridError::ZeroDimension { rows: 0, cols: 3 }
        );
        assert!(ChargeGrid::new(3, 0).is_err());
        assert_eq!(
            ChargeGrid::new(usize::MAX, 2).unwrap_err(),
            GridError::TooLarge {
                rows: usize::MAX,
                cols: 2
            }
        );
    }

    #[test]
    fn test_from_values_sanitizes() {
        let grid =
            ChargeGrid::from_values(2, 2, vec![1.0, f32::NAN, f32::INFINITY, -2.0]).unwrap();
        assert_eq!(grid.cells(), &[1.0, 0.0, 0.0, -2.0]);

        let err = ChargeGrid::from_values(2, 2, vec![0.0; 3]).unwrap_err();
        assert_eq!(
            err,
            GridError::ShapeMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_set_coerces_non_finite() {
        let mut grid = ChargeGrid::new(2, 2).unwrap();
        grid.set(1, 1, f32::NAN);
        assert_eq!(grid.get(1, 1), 0.0);
        grid.set(1, 1, 3.0);
        grid.add_charge(1, 1, f32::MAX);
        grid.add_charge(1, 1, f32::MAX);
        assert_eq!(grid.get(1, 1), 0.0);
    }

    #[test]
    fn test_place_charge_adds_one_unit() {
        let mut grid = ChargeGrid::new(6, 4).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..25 {
            let before = grid.clone();
            let (i, j) = grid.place_charge(&mut rng);
            assert_eq!(grid.get(i, j), before.get(i, j) + 1.0);
            for n in 0..grid.len() {
                if n != grid.index(i, j) {
                    assert_eq!(grid.cells()[n], before.cells()[n]);
                }
            }
        }
        assert_eq!(grid.total_charge(), 25.0);
    }

    #[test]
    fn test_try_get_bounds() {
        let grid = ChargeGrid::new(2, 3).unwrap();
        assert_eq!(grid.try_get(1, 2), Some(0.0));
        assert_eq!(grid.try_get(2, 0), None);
        assert_eq!(grid.try_get(0, 3), None);
    }

    #[test]
    fn test_border_predicate() {
        let grid = ChargeGrid::new(4, 4).unwrap();
        assert!(grid.is_border(0, 0));
        assert!(grid.is_border(3, 3));
        assert!(grid.is_border(0, 2));
        assert!(grid.is_border(2, 3));
        assert!(!grid.is_border(1, 1));
        assert!(!grid.is_border(2, 2));
    }

    #[test]
    fn test_neighbor_pairs_cached_and_shared() {
        let grid = ChargeGrid::new(5, 5).unwrap();
        let first = grid.neighbor_pairs().to_vec();
        let second = grid.neighbor_pairs();
        assert_eq!(first.as_slice(), second);

        let copy = grid.clone();
        assert!(Arc::ptr_eq(
            &grid.shared_neighbor_pairs(),
            &copy.shared_neighbor_pairs()
        ));
    }

    #[test]
    fn test_clone_is_deep_for_cells() {
        let mut grid = ChargeGrid::new(3, 3).unwrap();
        let copy = grid.clone();
        grid.set(1, 1, 5.0);
        assert_eq!(copy.get(1, 1), 0.0);
    }
}
