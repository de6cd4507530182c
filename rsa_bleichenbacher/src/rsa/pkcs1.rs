//! PKCS#1 v1.5 encryption padding (block type 2).
//!
//! `EB = 00 || 02 || PS || 00 || M`, where `PS` holds at least
//! [`MIN_PADDING_LEN`] random nonzero bytes.

use crate::rsa::error::PaddingError;
use num_bigint::BigUint;
use rand::Rng;

pub const MIN_PADDING_LEN: usize = 8;

/// Leading bytes, mandatory padding and the terminating zero.
pub const OVERHEAD: usize = 3 + MIN_PADDING_LEN;

/// Pads `message` into a `block_len`-byte encryption block.
pub fn pad<R: Rng + ?Sized>(message: &[u8], block_len: usize, rng: &mut R) -> Result<Vec<u8>, PaddingError> {
    if block_len < OVERHEAD || message.len() > block_len - OVERHEAD {
        return Err(PaddingError::MessageTooLong {
            message_len: message.len(),
            block_len,
        });
    }

    let padding_len = block_len - message.len() - 3;
    let mut block = Vec::with_capacity(block_len);
    block.extend_from_slice(&[0x00, 0x02]);
    block.extend((0..padding_len).map(|_| rng.gen_range(1..=255u8)));
    block.push(0x00);
    block.extend_from_slice(message);
    Ok(block)
}

/// Full block-type-2 check: `00 02`, eight nonzero padding bytes and a
/// terminating zero somewhere after them.
pub fn is_conforming(block: &[u8]) -> bool {
    if block.len() < OVERHEAD || block[0] != 0x00 || block[1] != 0x02 {
        return false;
    }
    let mandatory = &block[2..2 + MIN_PADDING_LEN];
    if mandatory.contains(&0x00) {
        return false;
    }
    block[2 + MIN_PADDING_LEN..].contains(&0x00)
}

/// Checks only the `00 02` prefix.
pub fn has_conforming_prefix(block: &[u8]) -> bool {
    block.len() >= 2 && block[0] == 0x00 && block[1] == 0x02
}

/// Strips the padding and returns the message.
pub fn unpad(block: &[u8]) -> Result<Vec<u8>, PaddingError> {
    if !is_conforming(block) {
        return Err(PaddingError::Malformed);
    }
    let separator = block[2 + MIN_PADDING_LEN..]
        .iter()
        .position(|&b| b == 0x00)
        .map(|i| i + 2 + MIN_PADDING_LEN)
        .ok_or(PaddingError::Malformed)?;
    Ok(block[separator + 1..].to_vec())
}

/// Big-endian encoding of `x` left-padded with zeros to `len` bytes (I2OSP).
/// Values wider than `len` keep all their bytes.
pub fn to_fixed_bytes(x: &BigUint, len: usize) -> Vec<u8> {
    let bytes = x.to_bytes_be();
    if bytes.len() >= len {
        return bytes;
    }
    let mut out = vec![0u8; len - bytes.len()];
    out.extend_from_slice(&bytes);
    out
}
