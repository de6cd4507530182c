use crate::rsa::error::PaddingError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttackError {
    #[error("ciphertext must satisfy 0 < c < n")]
    InvalidCiphertext,

    #[error("a {0}-byte modulus is too small for PKCS#1 v1.5")]
    ModulusTooSmall(usize),

    /// Narrowing left no interval; the oracle contradicted itself.
    #[error("candidate set exhausted at iteration {iteration}")]
    CandidateSetExhausted { iteration: usize },

    #[error("query budget of {queries} oracle queries exceeded")]
    QueryBudgetExceeded { queries: u64 },

    #[error("time budget exceeded after {elapsed:?}")]
    TimeBudgetExceeded { elapsed: Duration },

    #[error(transparent)]
    Padding(#[from] PaddingError),
}

pub type AttackResult<T> = Result<T, AttackError>;
