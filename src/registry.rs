//! Named lookup of encryption and hash providers.

use std::collections::BTreeMap;

use subtle::ConstantTimeEq;
use tracing::debug;

use crate::crypto::enc_provider::{self, EncProvider};
use crate::crypto::hash::{self, HashProvider};
use crate::crypto::hmac::hmac;
use crate::crypto::iov::CryptoIov;
use crate::crypto::key::Key;
use crate::error::{Error, Result};

/// Provider tables keyed by name.
///
/// Built once and then shared read-only; registration needs `&mut self`.
#[derive(Default)]
pub struct Registry {
    enc: BTreeMap<String, &'static dyn EncProvider>,
    hash: BTreeMap<String, &'static HashProvider>,
}

impl Registry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in DES, ARC4, Camellia, MD5, SHA1 and SHA256 providers.
    pub fn builtin() -> Self {
        let enc: [&'static dyn EncProvider; 4] = [
            &enc_provider::DES,
            &enc_provider::ARCFOUR,
            &enc_provider::CAMELLIA128,
            &enc_provider::CAMELLIA256,
        ];
        let hashes = [&hash::MD5, &hash::SHA1, &hash::SHA256];

        Self {
            enc: enc.into_iter().map(|p| (p.info().name.to_string(), p)).collect(),
            hash: hashes.into_iter().map(|h| (h.name.to_string(), h)).collect(),
        }
    }

    pub fn register_enc(&mut self, name: &str, provider: &'static dyn EncProvider) -> Result<()> {
        if self.enc.contains_key(name) {
            return Err(Error::TypeExists(name.to_string()));
        }
        debug!(name, "registered encryption provider");
        self.enc.insert(name.to_string(), provider);
        Ok(())
    }

    pub fn register_hash(&mut self, provider: &'static HashProvider) -> Result<()> {
        if self.hash.contains_key(provider.name) {
            return Err(Error::TypeExists(provider.name.to_string()));
        }
        debug!(name = provider.name, "registered hash provider");
        self.hash.insert(provider.name.to_string(), provider);
        Ok(())
    }

    pub fn enc_provider(&self, name: &str) -> Result<&'static dyn EncProvider> {
        self.enc
            .get(name)
            .copied()
            .ok_or_else(|| Error::TypeNotFound(name.to_string()))
    }

    pub fn hash_provider(&self, name: &str) -> Result<&'static HashProvider> {
        self.hash
            .get(name)
            .copied()
            .ok_or_else(|| Error::TypeNotFound(name.to_string()))
    }

    pub fn enc_providers(&self) -> impl Iterator<Item = (&str, &'static dyn EncProvider)> {
        self.enc.iter().map(|(name, p)| (name.as_str(), *p))
    }

    pub fn hash_providers(&self) -> impl Iterator<Item = &'static HashProvider> {
        self.hash.values().copied()
    }

    /// HMAC of the signed segments of `iovs` under the named hash.
    pub fn make_checksum(&self, hash_name: &str, key: &Key, iovs: &[CryptoIov<'_>]) -> Result<Vec<u8>> {
        let hash = self.hash_provider(hash_name)?;
        let mut out = Vec::new();
        out.try_reserve_exact(hash.hashsize)?;
        out.resize(hash.hashsize, 0);
        hmac(hash, key, iovs, &mut out)?;
        Ok(out)
    }

    /// Recomputes the checksum and compares it with `expected` in constant time.
    pub fn verify_checksum(
        &self,
        hash_name: &str,
        key: &Key,
        iovs: &[CryptoIov<'_>],
        expected: &[u8],
    ) -> Result<bool> {
        let computed = self.make_checksum(hash_name, key, iovs)?;
        Ok(computed.ct_eq(expected).into())
    }
}
