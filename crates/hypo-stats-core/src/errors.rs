use thiserror::Error;

/// Structural failures raised before any statistic is computed.
///
/// Statistical degeneracies (zero variance, too few degrees of freedom) are
/// never reported through this type; they collapse to conservative values
/// at the point where they occur.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Empty input: {field} cannot be empty")]
    EmptyInput { field: &'static str },

    #[error("Variable length mismatch: x={x_len}, y={y_len}")]
    DimensionMismatch { x_len: usize, y_len: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),
}

/// Result type for statistical operations
pub type StatsResult<T> = Result<T, StatsError>;
