// Errors raised while attacking a padding oracle.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort an attack. No partial results are returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("length {length} is not usable with block size {block_size}")]
    InvalidLength { length: usize, block_size: usize },
    #[error("block size {0} is not in 1..=255")]
    InvalidBlockSize(usize),
    /// None of the 256 candidates validated. `block` is the 1-indexed data
    /// block (0 when a lone pair was cracked) and `position` the 1-indexed
    /// byte within it.
    #[error("cant decrypt byte at position {position} of block {block}")]
    OracleExhausted { block: usize, position: usize },
    #[error("oracle has no ciphertext to supply")]
    NoCiphertext,
    #[error("invalid pkcs7 padding")]
    InvalidPadding,
}

impl Error {
    pub(crate) fn in_block(self, block: usize) -> Self {
        match self {
            Error::OracleExhausted { position, .. } => Error::OracleExhausted { block, position },
            other => other,
        }
    }
}
