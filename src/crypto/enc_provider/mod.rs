//! Encryption providers.
//!
//! Each supported cipher is a statically constructed, read-only provider
//! implementing [`EncProvider`]. Providers are `Send + Sync` and may be shared
//! freely; the per-key [`CipherState`] they hand out is not, and concurrent use
//! of one state object must be serialized by the caller.

mod camellia;
mod des;
mod rc4;

use std::fmt;

use serde::Serialize;
use zeroize::Zeroizing;

use super::iov::{CryptoIov, encrypted_len};
use super::key::{Key, KeyBlock, KeyUsage};
use crate::error::{Error, Result};

pub use self::camellia::CamelliaProvider;
pub use self::des::DesProvider;
pub use self::rc4::{ArcfourProvider, ArcfourState};

pub static DES: DesProvider = DesProvider;
pub static ARCFOUR: ArcfourProvider = ArcfourProvider;
pub static CAMELLIA128: CamelliaProvider = CamelliaProvider::new("camellia128", 16);
pub static CAMELLIA256: CamelliaProvider = CamelliaProvider::new("camellia256", 32);

/// Size parameters of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProviderInfo {
    pub name: &'static str,
    pub block_size: usize,
    /// Bytes of randomness needed to make a key.
    pub key_bytes: usize,
    /// Length of a key as stored and used.
    pub key_length: usize,
}

/// Per-key, per-usage cipher state.
pub enum CipherState {
    /// Chaining value for block ciphers.
    Iv(Zeroizing<Vec<u8>>),
    /// Running keystream for ARC4.
    Arcfour(ArcfourState),
}

impl CipherState {
    pub fn iv(bytes: &[u8]) -> Self {
        CipherState::Iv(Zeroizing::new(bytes.to_vec()))
    }

    /// The chaining value, if this is a block cipher state.
    pub fn as_iv(&self) -> Option<&[u8]> {
        match self {
            CipherState::Iv(iv) => Some(iv.as_slice()),
            CipherState::Arcfour(_) => None,
        }
    }
}

impl fmt::Debug for CipherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherState::Iv(iv) => f.debug_tuple("Iv").field(&iv.len()).finish(),
            CipherState::Arcfour(state) => f.debug_tuple("Arcfour").field(state).finish(),
        }
    }
}

/// Uniform interface over the supported ciphers.
///
/// All transforms work in place on the [`IovRole::Data`](super::IovRole::Data)
/// segments of `iovs`.
pub trait EncProvider: Send + Sync {
    fn info(&self) -> &ProviderInfo;

    fn encrypt(
        &self,
        key: &Key,
        state: Option<&mut CipherState>,
        iovs: &mut [CryptoIov<'_>],
    ) -> Result<()>;

    fn decrypt(
        &self,
        key: &Key,
        state: Option<&mut CipherState>,
        iovs: &mut [CryptoIov<'_>],
    ) -> Result<()>;

    /// Computes a CBC-MAC of the data segments into `output`.
    fn cbc_mac(
        &self,
        _key: &Key,
        _iovs: &[CryptoIov<'_>],
        _iv: Option<&[u8]>,
        _output: &mut [u8],
    ) -> Result<()> {
        Err(Error::Internal)
    }

    fn init_state(&self, key: &KeyBlock, usage: KeyUsage) -> Result<CipherState>;

    fn free_state(&self, state: CipherState) -> Result<()> {
        drop(state);
        Ok(())
    }

    /// Length of a ciphertext for `length` bytes of input plus `pad_minimum`.
    fn encrypted_length(&self, length: usize, pad_minimum: usize) -> Result<usize> {
        length
            .checked_add(pad_minimum)
            .and_then(|n| n.checked_next_multiple_of(self.info().block_size))
            .ok_or(Error::BadMessageSize)
    }
}

impl fmt::Debug for dyn EncProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.info(), f)
    }
}

/// Checks key length, data alignment and IV length for a block cipher.
///
/// Returns `true` if there is no data to process.
pub(crate) fn validate(
    info: &ProviderInfo,
    key: &Key,
    iv: Option<&[u8]>,
    iovs: &[CryptoIov<'_>],
) -> Result<bool> {
    let input_length = encrypted_len(iovs);

    if key.contents().len() != info.key_length {
        return Err(Error::BadKeySize);
    }

    if input_length % info.block_size != 0 || iv.is_some_and(|iv| iv.len() != info.block_size) {
        return Err(Error::BadMessageSize);
    }

    Ok(input_length == 0)
}

/// Extracts the chaining IV from a block-cipher state.
pub(crate) fn state_iv(state: Option<&CipherState>) -> Result<Option<&[u8]>> {
    match state {
        None => Ok(None),
        Some(CipherState::Iv(iv)) => Ok(Some(iv.as_slice())),
        Some(CipherState::Arcfour(_)) => Err(Error::Internal),
    }
}
