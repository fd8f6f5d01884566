use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MerkleError {
    /// Text bytes that are not valid UTF-8.
    #[error("encoding error: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("invalid hex string: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("cannot compute a root on an empty list")]
    EmptyInput,

    #[error("leaf count must be a power of two (got {0})")]
    InvalidSize(usize),
}

pub type Result<T> = std::result::Result<T, MerkleError>;
