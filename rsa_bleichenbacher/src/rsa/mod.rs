pub mod error;
pub mod keygen;
pub mod oracle;
pub mod pkcs1;
pub mod rsa;

pub use error::{PaddingError, RsaError};
pub use keygen::{RsaKeyGenerator, RsaKeyPair, RsaPublicKey};
pub use oracle::{DecryptionOracle, OracleMode};
pub use rsa::RsaService;
