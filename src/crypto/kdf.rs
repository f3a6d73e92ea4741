use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;
use tracing::debug;

use crate::error::{Error, Result};

/// Derives `out.len()` bytes with PBKDF2 using HMAC-SHA1 as the PRF.
///
/// The output length is not capped. An iteration count of zero is rejected.
pub fn pbkdf2_hmac_sha1(out: &mut [u8], count: u32, password: &[u8], salt: &[u8]) -> Result<()> {
    if count == 0 {
        return Err(Error::Internal);
    }

    pbkdf2_hmac::<Sha1>(password, salt, count, out);
    debug!(iterations = count, len = out.len(), "derived pbkdf2 key");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derive(count: u32, password: &[u8], salt: &[u8], len: usize) -> String {
        let mut out = vec![0u8; len];
        pbkdf2_hmac_sha1(&mut out, count, password, salt).unwrap();
        hex::encode(out)
    }

    #[test]
    fn rfc6070_vectors() {
        assert_eq!(
            derive(1, b"password", b"salt", 20),
            "0c60c80f961f0e71f3a9b524af6012062fe037a6"
        );
        assert_eq!(
            derive(2, b"password", b"salt", 20),
            "ea6c014dc72d6f8ccd1ed92ace1d41f0d8de8957"
        );
        assert_eq!(
            derive(4096, b"password", b"salt", 20),
            "4b007901b765489abead49d926f721d065a429c1"
        );
    }

    #[test]
    fn output_longer_than_one_block() {
        assert_eq!(
            derive(4096, b"passwordPASSWORDpassword", b"saltSALTsaltSALTsaltSALTsaltSALTsalt", 25),
            "3d2eec4fe41c849b80c8d83662c0e44a8b291a964cf2f07038"
        );
    }

    #[test]
    fn shorter_output_is_a_prefix() {
        let long = derive(2, b"pw", b"NaCl", 32);
        let short = derive(2, b"pw", b"NaCl", 7);
        assert!(long.starts_with(&short));
    }

    #[test]
    fn zero_iterations_fail() {
        let mut out = [0u8; 16];
        assert_eq!(pbkdf2_hmac_sha1(&mut out, 0, b"pw", b"salt"), Err(Error::Internal));
    }
}
