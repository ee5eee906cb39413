//! Error type shared by tensors, layers, and configuration loading.

use thiserror::Error;

/// Errors produced by the crate.
#[derive(Debug, Error)]
pub enum NaluError {
    /// The trailing (feature) dimension of an input does not match what the
    /// operator expects.
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// A layer or tensor was asked for a zero-sized dimension.
    #[error("invalid dimensions: input size {n_in}, output size {n_out}")]
    InvalidDimensions { n_in: usize, n_out: usize },

    /// Backing data length does not match the requested shape.
    #[error("data length {got} does not match shape volume {expected}")]
    DataLength { expected: usize, got: usize },

    /// Configuration parsed but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NaluError>;

impl NaluError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        NaluError::InvalidConfig(message.into())
    }
}
