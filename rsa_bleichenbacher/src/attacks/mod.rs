pub mod bleichenbacher;

pub use bleichenbacher::{AttackConfig, AttackError, Bleichenbacher, PaddingOracle, Recovered, recover_plaintext};
