//! HMAC over scattered input.

use ::hmac::digest::KeyInit;
use ::hmac::{Hmac, Mac};
use md5::Md5;
use sha1::Sha1;
use sha2::Sha256;
use tracing::debug;
use zeroize::Zeroize;

use super::hash::{Digest, HashProvider};
use super::iov::CryptoIov;
use super::key::{Key, KeyBlock};
use crate::error::{Error, Result};

fn mac_signed<M: Mac + KeyInit>(key: &[u8], iovs: &[CryptoIov<'_>], output: &mut [u8]) -> Result<()> {
    let mut mac = <M as Mac>::new_from_slice(key).map_err(|_| Error::Internal)?;
    for iov in iovs.iter().filter(|iov| iov.role.is_signed()) {
        mac.update(&iov.data[..]);
    }
    let mut tag = mac.finalize().into_bytes();
    output[..tag.len()].copy_from_slice(&tag);
    tag.as_mut_slice().zeroize();
    Ok(())
}

/// Computes the HMAC of every signed segment of `iovs`, in order.
///
/// Writes exactly `hash.hashsize` bytes at the start of `output` and returns
/// that length. `output` may be longer; the remainder is left as is.
pub fn hmac_keyblock(
    hash: &HashProvider,
    keyblock: &KeyBlock,
    iovs: &[CryptoIov<'_>],
    output: &mut [u8],
) -> Result<usize> {
    if keyblock.len() > hash.blocksize {
        return Err(Error::Internal);
    }
    if output.len() < hash.hashsize {
        return Err(Error::BadMessageSize);
    }

    let key = keyblock.contents();
    match Digest::for_provider(hash)? {
        Digest::Sha1 => mac_signed::<Hmac<Sha1>>(key, iovs, output)?,
        Digest::Sha256 => mac_signed::<Hmac<Sha256>>(key, iovs, output)?,
        Digest::Md5 => mac_signed::<Hmac<Md5>>(key, iovs, output)?,
    }
    debug!(hash = hash.name, segments = iovs.len(), "computed hmac");

    Ok(hash.hashsize)
}

/// [`hmac_keyblock`] keyed by a key handle.
pub fn hmac(hash: &HashProvider, key: &Key, iovs: &[CryptoIov<'_>], output: &mut [u8]) -> Result<usize> {
    hmac_keyblock(hash, key.keyblock(), iovs, output)
}
