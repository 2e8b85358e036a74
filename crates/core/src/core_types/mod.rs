//! Shared storage and capability types

pub mod field;
pub mod random;

pub use field::{finite_or_zero, FieldData};
pub use random::RandomSource;
