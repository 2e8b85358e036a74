//! Error types for grid construction and configuration loading
//!
//! Only construction and configuration can fail. Numeric degeneracy during a
//! tick is not an error: non-finite values are coerced to zero where they are
//! read and offending updates are skipped.

/// Errors raised while constructing a charge grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// One of the dimensions was zero
    ZeroDimension {
        /// Requested row count
        rows: usize,
        /// Requested column count
        cols: usize,
    },
    /// `rows * cols` does not fit in `usize`
    TooLarge {
        /// Requested row count
        rows: usize,
        /// Requested column count
        cols: usize,
    },
    /// A value buffer did not match the requested shape
    ShapeMismatch {
        /// Number of cells implied by the shape
        expected: usize,
        /// Number of values supplied
        actual: usize,
    },
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::ZeroDimension { rows, cols } => {
                write!(f, "Grid dimensions must be positive, got {rows}x{cols}")
            }
            GridError::TooLarge { rows, cols } => {
                write!(f, "Grid of {rows}x{cols} cells overflows addressable memory")
            }
            GridError::ShapeMismatch { expected, actual } => {
                write!(f, "Expected {expected} cell values, got {actual}")
            }
        }
    }
}

impl std::error::Error for GridError {}

/// Errors that can occur while loading or applying a simulation configuration
#[derive(Debug)]
pub enum ConfigError {
    /// The configured grid shape is invalid
    Grid(GridError),
    /// Failed to read the configuration file
    Load(String),
    /// Failed to parse the configuration file
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Grid(err) => write!(f, "Invalid grid: {err}"),
            ConfigError::Load(msg) => write!(f, "Failed to load: {msg}"),
            ConfigError::Parse(msg) => write!(f, "Failed to parse: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Grid(err) => Some(err),
            ConfigError::Load(_) | ConfigError::Parse(_) => None,
        }
    }
}

impl From<GridError> for ConfigError {
    fn from(err: GridError) -> Self {
        ConfigError::Grid(err)
    }
}
