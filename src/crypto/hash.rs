//! Hash provider descriptors.

use serde::Serialize;

use crate::error::{Error, Result};

/// Describes a hash function by name and size.
///
/// The name selects the concrete digest, see [`Digest::for_provider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HashProvider {
    pub name: &'static str,
    pub hashsize: usize,
    pub blocksize: usize,
}

impl HashProvider {
    pub const fn new(name: &'static str, hashsize: usize, blocksize: usize) -> Self {
        Self {
            name,
            hashsize,
            blocksize,
        }
    }
}

pub static MD5: HashProvider = HashProvider::new("MD5", 16, 64);
pub static SHA1: HashProvider = HashProvider::new("SHA1", 20, 64);
pub static SHA256: HashProvider = HashProvider::new("SHA256", 32, 64);

/// Digests that have a concrete implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Digest {
    Sha1,
    Sha256,
    Md5,
}

impl Digest {
    /// Resolves a provider by name prefix.
    pub fn for_provider(hash: &HashProvider) -> Result<Self> {
        let name = hash.name;
        if name.starts_with("SHA1") {
            Ok(Digest::Sha1)
        } else if name.starts_with("SHA256") {
            Ok(Digest::Sha256)
        } else if name.starts_with("MD5") {
            Ok(Digest::Md5)
        } else {
            Err(Error::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_names_resolve() {
        assert_eq!(Digest::for_provider(&MD5), Ok(Digest::Md5));
        assert_eq!(Digest::for_provider(&SHA1), Ok(Digest::Sha1));
        assert_eq!(Digest::for_provider(&SHA256), Ok(Digest::Sha256));
    }

    #[test]
    fn matching_is_by_prefix() {
        let variant = HashProvider::new("SHA1-96", 20, 64);
        assert_eq!(Digest::for_provider(&variant), Ok(Digest::Sha1));

        let md4 = HashProvider::new("MD4", 16, 64);
        assert_eq!(Digest::for_provider(&md4), Err(Error::Internal));

        let lower = HashProvider::new("sha1", 20, 64);
        assert_eq!(Digest::for_provider(&lower), Err(Error::Internal));
    }
}
