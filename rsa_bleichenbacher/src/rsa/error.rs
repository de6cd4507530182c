use thiserror::Error;

/// PKCS#1 v1.5 encoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaddingError {
    #[error("message of {message_len} bytes does not fit a {block_len}-byte block")]
    MessageTooLong { message_len: usize, block_len: usize },

    #[error("block is not PKCS#1 v1.5 (type 2) padded")]
    Malformed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RsaError {
    #[error("message representative must be smaller than the modulus")]
    MessageTooLarge,

    #[error("a {0}-byte modulus is too small for PKCS#1 v1.5")]
    ModulusTooSmall(usize),

    #[error(transparent)]
    Padding(#[from] PaddingError),
}
