//! Camellia placeholder.
//!
//! The provider advertises the right sizes so that enctype tables and length
//! calculations work, but every transform fails with [`Error::Internal`].

use tracing::warn;

use super::{CipherState, EncProvider, ProviderInfo};
use crate::crypto::iov::CryptoIov;
use crate::crypto::key::{Key, KeyBlock, KeyUsage};
use crate::error::{Error, Result};

const CAMELLIA_BLOCK_SIZE: usize = 16;

#[derive(Debug)]
pub struct CamelliaProvider {
    info: ProviderInfo,
}

impl CamelliaProvider {
    pub const fn new(name: &'static str, key_length: usize) -> Self {
        Self {
            info: ProviderInfo {
                name,
                block_size: CAMELLIA_BLOCK_SIZE,
                key_bytes: key_length,
                key_length,
            },
        }
    }

    fn unsupported(&self, op: &'static str) -> Error {
        warn!(provider = self.info.name, op, "camellia is not implemented");
        Error::Internal
    }
}

impl EncProvider for CamelliaProvider {
    fn info(&self) -> &ProviderInfo {
        &self.info
    }

    fn encrypt(
        &self,
        _key: &Key,
        _state: Option<&mut CipherState>,
        _iovs: &mut [CryptoIov<'_>],
    ) -> Result<()> {
        Err(self.unsupported("encrypt"))
    }

    fn decrypt(
        &self,
        _key: &Key,
        _state: Option<&mut CipherState>,
        _iovs: &mut [CryptoIov<'_>],
    ) -> Result<()> {
        Err(self.unsupported("decrypt"))
    }

    fn cbc_mac(
        &self,
        _key: &Key,
        _iovs: &[CryptoIov<'_>],
        _iv: Option<&[u8]>,
        _output: &mut [u8],
    ) -> Result<()> {
        Err(self.unsupported("cbc_mac"))
    }

    fn init_state(&self, _key: &KeyBlock, _usage: KeyUsage) -> Result<CipherState> {
        Err(self.unsupported("init_state"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key::Enctype;

    #[test]
    fn advertises_sizes() {
        let p = CamelliaProvider::new("camellia256", 32);
        assert_eq!(p.info().block_size, 16);
        assert_eq!(p.info().key_bytes, 32);
        assert_eq!(p.info().key_length, 32);
        assert_eq!(p.encrypted_length(17, 0), Ok(32));
    }

    #[test]
    fn every_operation_fails() {
        let p = CamelliaProvider::new("camellia128", 16);
        let key = Key::new(KeyBlock::new(Enctype::Camellia128CtsCmac, &[7u8; 16]));
        let mut buf = [0u8; 16];
        let mut out = [0u8; 16];

        assert_eq!(
            p.encrypt(&key, None, &mut [CryptoIov::data(&mut buf)]),
            Err(Error::Internal)
        );
        assert_eq!(
            p.decrypt(&key, None, &mut [CryptoIov::data(&mut buf)]),
            Err(Error::Internal)
        );
        assert_eq!(
            p.cbc_mac(&key, &[CryptoIov::data(&mut buf)], None, &mut out),
            Err(Error::Internal)
        );
        assert!(p.init_state(key.keyblock(), KeyUsage(1)).is_err());
        assert_eq!(buf, [0u8; 16]);
    }
}
