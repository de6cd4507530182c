use crate::number_theory::byte_length;
use crate::rsa::error::RsaError;
use crate::rsa::keygen::{RsaKeyPair, RsaPublicKey};
use crate::rsa::pkcs1;
use num_bigint::BigUint;
use rand::Rng;

pub struct RsaService {
    keypair: RsaKeyPair,
}

impl RsaService {
    pub fn from_keypair(keypair: RsaKeyPair) -> Self {
        Self { keypair }
    }

    pub fn encrypt(&self, m: &BigUint) -> Result<BigUint, RsaError> {
        if m >= &self.keypair.n {
            return Err(RsaError::MessageTooLarge);
        }
        Ok(m.modpow(&self.keypair.e, &self.keypair.n))
    }

    pub fn decrypt(&self, ciphertext: &BigUint) -> BigUint {
        ciphertext.modpow(&self.keypair.d, &self.keypair.n)
    }

    /// Pads `message` as PKCS#1 v1.5 block type 2 and encrypts it.
    pub fn encrypt_pkcs1<R: Rng + ?Sized>(&self, message: &[u8], rng: &mut R) -> Result<BigUint, RsaError> {
        let k = self.modulus_len();
        if k < pkcs1::OVERHEAD {
            return Err(RsaError::ModulusTooSmall(k));
        }
        let block = pkcs1::pad(message, k, rng)?;
        self.encrypt(&BigUint::from_bytes_be(&block))
    }

    /// Decrypts and returns the full `k`-byte encryption block.
    pub fn decrypt_block(&self, ciphertext: &BigUint) -> Vec<u8> {
        pkcs1::to_fixed_bytes(&self.decrypt(ciphertext), self.modulus_len())
    }

    pub fn decrypt_pkcs1(&self, ciphertext: &BigUint) -> Result<Vec<u8>, RsaError> {
        Ok(pkcs1::unpad(&self.decrypt_block(ciphertext))?)
    }

    pub fn modulus_len(&self) -> usize {
        byte_length(&self.keypair.n)
    }

    pub fn public_key(&self) -> RsaPublicKey {
        self.keypair.public_key()
    }

    pub fn keypair(&self) -> &RsaKeyPair {
        &self.keypair
    }
}
