use thiserror::Error;

pub type Result<T> = std::result::Result<T, MerkleError>;

/// Failures raised by digest parsing and tree reduction.
///
/// `InvalidHex` and `InvalidLength` are both format errors: the caller
/// handed us something that is not a 32-byte hex digest.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MerkleError {
    #[error("invalid hex digest {input:?}: {source}")]
    InvalidHex {
        input: String,
        #[source]
        source: hex::FromHexError,
    },

    #[error("digest {input:?} decodes to {len} bytes, expected 32")]
    InvalidLength { input: String, len: usize },

    #[error("leaf #{index}: {source}")]
    InvalidLeaf {
        index: usize,
        #[source]
        source: Box<MerkleError>,
    },

    #[error("cannot build a merkle tree over zero leaves")]
    EmptyInput,
}

impl MerkleError {
    pub fn is_format_error(&self) -> bool {
        match self {
            MerkleError::InvalidHex { .. } | MerkleError::InvalidLength { .. } => true,
            MerkleError::InvalidLeaf { source, .. } => source.is_format_error(),
            MerkleError::EmptyInput => false,
        }
    }

    /// The offending input string, if the error carries one.
    pub fn input(&self) -> Option<&str> {
        match self {
            MerkleError::InvalidHex { input, .. } | MerkleError::InvalidLength { input, .. } => {
                Some(input)
            }
            MerkleError::InvalidLeaf { source, .. } => source.input(),
            MerkleError::EmptyInput => None,
        }
    }
}
