use thiserror::Error;

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A vector or matrix handed to the network does not match the topology.
    #[error("dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("topology must contain at least one layer")]
    EmptyTopology,

    #[error("layer {index} has no nodes")]
    ZeroWidthLayer { index: usize },

    /// Training needs an input layer and at least one weighted layer.
    #[error("backward pass needs at least 2 layers, network has {layers}")]
    TooFewLayers { layers: usize },

    #[error("dataset has no samples")]
    EmptyDataset,

    #[error("invalid training configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown label")]
    UnknownLabel,
}

/// Fails with `DimensionMismatch` unless `actual == expected`.
pub(crate) fn ensure_len(context: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::DimensionMismatch {
            context,
            expected,
            actual,
        })
    }
}
