//! Bleichenbacher's attack on RSA PKCS#1 v1.5 encryption padding
//! ("Chosen Ciphertext Attacks Against Protocols Based on the RSA
//! Encryption Standard PKCS #1", CRYPTO '98).
//!
//! Given only a padding oracle and the public key, the attack keeps a set
//! of intervals the plaintext `m` must lie in, and shrinks it with every
//! multiplier `s` for which `m * s mod n` is again conforming.

pub mod attack;
pub mod error;
pub mod interval;
pub mod narrowing;
pub mod oracle;
pub mod rational;
pub mod search;

pub use attack::{AttackConfig, AttackState, Bleichenbacher, Phase, Recovered, recover_plaintext};
pub use error::{AttackError, AttackResult};
pub use interval::{CandidateSet, Interval, add_to_set, simplify};
pub use narrowing::narrow;
pub use oracle::{BlindingOracle, PaddingOracle};
pub use rational::BigRational;
pub use search::MultiplierSearch;
