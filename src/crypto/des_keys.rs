//! DES key hygiene: parity fixup, weak-key detection, key generation.

use getrandom::fill;
use tracing::trace;
use zeroize::Zeroizing;

use super::key::{Enctype, KeyBlock};
use super::{DES_KEY_BYTES, DES_KEY_SIZE};
use crate::error::{Error, Result};

/// Known weak and semi-weak DES keys, in odd-parity form.
const WEAK_KEYS: [[u8; DES_KEY_SIZE]; 16] = [
    // weak
    [0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01],
    [0xFE, 0xFE, 0xFE, 0xFE, 0xFE, 0xFE, 0xFE, 0xFE],
    [0xE0, 0xE0, 0xE0, 0xE0, 0xF1, 0xF1, 0xF1, 0xF1],
    [0x1F, 0x1F, 0x1F, 0x1F, 0x0E, 0x0E, 0x0E, 0x0E],
    // semi-weak pairs
    [0x01, 0x1F, 0x01, 0x1F, 0x01, 0x0E, 0x01, 0x0E],
    [0x1F, 0x01, 0x1F, 0x01, 0x0E, 0x01, 0x0E, 0x01],
    [0x01, 0xE0, 0x01, 0xE0, 0x01, 0xF1, 0x01, 0xF1],
    [0xE0, 0x01, 0xE0, 0x01, 0xF1, 0x01, 0xF1, 0x01],
    [0x01, 0xFE, 0x01, 0xFE, 0x01, 0xFE, 0x01, 0xFE],
    [0xFE, 0x01, 0xFE, 0x01, 0xFE, 0x01, 0xFE, 0x01],
    [0x1F, 0xE0, 0x1F, 0xE0, 0x0E, 0xF1, 0x0E, 0xF1],
    [0xE0, 0x1F, 0xE0, 0x1F, 0xF1, 0x0E, 0xF1, 0x0E],
    [0x1F, 0xFE, 0x1F, 0xFE, 0x0E, 0xFE, 0x0E, 0xFE],
    [0xFE, 0x1F, 0xFE, 0x1F, 0xFE, 0x0E, 0xFE, 0x0E],
    [0xE0, 0xFE, 0xE0, 0xFE, 0xF1, 0xFE, 0xF1, 0xFE],
    [0xFE, 0xE0, 0xFE, 0xE0, 0xFE, 0xF1, 0xFE, 0xF1],
];

/// Forces odd parity on every byte; the parity bit is the low bit.
pub fn fixup_parity(key: &mut [u8; DES_KEY_SIZE]) {
    for byte in key.iter_mut() {
        let high = *byte & 0xfe;
        *byte = high | u8::from(high.count_ones() % 2 == 0);
    }
}

/// Returns `true` iff `key` is one of the weak or semi-weak DES keys.
///
/// The key must already have odd parity; complemented-parity forms of the
/// table entries are not checked.
pub fn is_weak_key(key: &[u8; DES_KEY_SIZE]) -> bool {
    WEAK_KEYS.iter().any(|weak| weak == key)
}

/// Builds a DES key from 7 bytes of random input.
///
/// The low bit of each input byte is moved into the last key byte, parity is
/// fixed, and a weak result is perturbed so it no longer matches the table.
pub fn random_to_key(random: &[u8]) -> Result<KeyBlock> {
    if random.len() != DES_KEY_BYTES {
        return Err(Error::Internal);
    }

    let mut key = Zeroizing::new([0u8; DES_KEY_SIZE]);
    key[..DES_KEY_BYTES].copy_from_slice(random);
    key[7] = random
        .iter()
        .enumerate()
        .fold(0u8, |acc, (i, b)| acc | ((b & 1) << (i + 1)));

    fixup_parity(&mut key);
    if is_weak_key(&key) {
        trace!("random DES key was weak, adjusting");
        key[7] ^= 0xf0;
    }

    Ok(KeyBlock::new(Enctype::DesCbcCrc, &key[..]))
}

/// Generates a fresh DES key from the OS random generator.
pub fn random_key() -> Result<KeyBlock> {
    let mut random = Zeroizing::new([0u8; DES_KEY_BYTES]);
    fill(&mut random[..]).map_err(|_| Error::Internal)?;
    random_to_key(&random[..])
}
