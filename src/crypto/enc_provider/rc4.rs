//! ARC4 stream cipher with resumable per-usage state.

use std::fmt;

use rc4::consts::U16;
use rc4::{KeyInit, Rc4, StreamCipher};
use tracing::{debug, trace};

use super::{CipherState, EncProvider, ProviderInfo};
use crate::crypto::ARCFOUR_KEY_SIZE;
use crate::crypto::iov::CryptoIov;
use crate::crypto::key::{Key, KeyBlock, KeyUsage};
use crate::error::{Error, Result};

type Engine = Rc4<U16>;

const INFO: ProviderInfo = ProviderInfo {
    name: "arcfour",
    block_size: 1,
    key_bytes: ARCFOUR_KEY_SIZE,
    key_length: ARCFOUR_KEY_SIZE,
};

/// Keystream position carried between calls.
///
/// The engine is keyed lazily by the first transform that uses the state, not
/// when the state is created.
#[derive(Default)]
pub enum ArcfourState {
    #[default]
    Uninitialized,
    Active(Box<Engine>),
}

impl ArcfourState {
    pub fn is_active(&self) -> bool {
        matches!(self, ArcfourState::Active(_))
    }
}

impl fmt::Debug for ArcfourState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArcfourState::Uninitialized => f.write_str("Uninitialized"),
            ArcfourState::Active(_) => f.write_str("Active"),
        }
    }
}

#[derive(Debug)]
pub struct ArcfourProvider;

impl ArcfourProvider {
    fn new_engine(key: &Key) -> Result<Box<Engine>> {
        Engine::new_from_slice(key.contents())
            .map(Box::new)
            .map_err(|_| Error::BadKeySize)
    }

    /// Encryption and decryption are the same keystream XOR.
    ///
    /// Processing stops at the first empty segment; later segments are left
    /// untouched.
    fn docrypt(
        &self,
        key: &Key,
        state: Option<&mut CipherState>,
        iovs: &mut [CryptoIov<'_>],
    ) -> Result<()> {
        if key.contents().len() != ARCFOUR_KEY_SIZE {
            return Err(Error::BadKeySize);
        }

        let mut scratch;
        let engine: &mut Engine = match state {
            None => {
                scratch = Self::new_engine(key)?;
                &mut *scratch
            }
            Some(CipherState::Arcfour(arc)) => {
                if let ArcfourState::Uninitialized = arc {
                    trace!("keying arcfour state on first use");
                    *arc = ArcfourState::Active(Self::new_engine(key)?);
                }
                match arc {
                    ArcfourState::Active(engine) => &mut **engine,
                    ArcfourState::Uninitialized => return Err(Error::Internal),
                }
            }
            Some(CipherState::Iv(_)) => return Err(Error::Internal),
        };

        let mut processed = 0usize;
        for iov in iovs.iter_mut() {
            if iov.data.is_empty() {
                break;
            }
            if iov.role.is_encrypted() {
                engine.apply_keystream(iov.data);
                processed += iov.data.len();
            }
        }
        debug!(provider = INFO.name, bytes = processed, "applied keystream");

        Ok(())
    }
}

impl EncProvider for ArcfourProvider {
    fn info(&self) -> &ProviderInfo {
        &INFO
    }

    fn encrypt(
        &self,
        key: &Key,
        state: Option<&mut CipherState>,
        iovs: &mut [CryptoIov<'_>],
    ) -> Result<()> {
        self.docrypt(key, state, iovs)
    }

    fn decrypt(
        &self,
        key: &Key,
        state: Option<&mut CipherState>,
        iovs: &mut [CryptoIov<'_>],
    ) -> Result<()> {
        self.docrypt(key, state, iovs)
    }

    fn init_state(&self, _key: &KeyBlock, _usage: KeyUsage) -> Result<CipherState> {
        Ok(CipherState::Arcfour(ArcfourState::Uninitialized))
    }
}
