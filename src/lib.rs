//! Kerberos crypto and encoding core.
//!
//! Encryption providers over scattered buffers, HMAC and PBKDF2 over pluggable
//! hash providers, DES key utilities, and the reverse-built ASN.1 buffer.

pub mod asn1;
pub mod crypto;
mod error;
mod registry;

pub use crate::asn1::Asn1Buf;
pub use crate::crypto::{
    CipherState, CryptoIov, EncProvider, Enctype, HashProvider, IovRole, Key, KeyBlock, KeyUsage,
};
pub use crate::error::{Error, Result};
pub use crate::registry::Registry;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn des_state_chains_through_registry_provider() {
        let reg = Registry::builtin();
        let des = reg.enc_provider("des-cbc").unwrap();
        let key = Key::new(KeyBlock::new(Enctype::DesCbcMd5, &hex_key("0123456789abcdef")));
        let mut state = des.init_state(key.keyblock(), KeyUsage(2)).unwrap();

        let mut first = *b"8 bytes!";
        let mut second = *b"8 more!!";
        des.encrypt(&key, Some(&mut state), &mut [CryptoIov::data(&mut first)]).unwrap();
        des.encrypt(&key, Some(&mut state), &mut [CryptoIov::data(&mut second)]).unwrap();
        assert_eq!(state.as_iv(), Some(&second[..]));

        let mut state = des.init_state(key.keyblock(), KeyUsage(2)).unwrap();
        des.decrypt(&key, Some(&mut state), &mut [CryptoIov::data(&mut first)]).unwrap();
        des.decrypt(&key, Some(&mut state), &mut [CryptoIov::data(&mut second)]).unwrap();
        assert_eq!(&first, b"8 bytes!");
        assert_eq!(&second, b"8 more!!");
    }

    #[test]
    fn enctype_provider_matches_registry() {
        let reg = Registry::builtin();
        for e in Enctype::ALL {
            let name = e.provider().info().name;
            assert_eq!(reg.enc_provider(name).unwrap().info(), e.provider().info());
        }
    }

    #[test]
    fn checksum_over_encoded_message() {
        let mut buf = Asn1Buf::new();
        buf.insert_octetstring(b"payload").unwrap();
        buf.insert_octet(7).unwrap();
        buf.insert_octet(0x04).unwrap();
        let mut encoded = buf.to_data().unwrap();

        let reg = Registry::builtin();
        let key = Key::new(KeyBlock::new(Enctype::ArcfourHmac, b"0123456789abcdef"));
        let iovs = [CryptoIov::sign_only(&mut encoded)];
        let sum = reg.make_checksum("MD5", &key, &iovs).unwrap();
        assert_eq!(sum.len(), 16);
        assert!(reg.verify_checksum("MD5", &key, &iovs, &sum).unwrap());
    }

    fn hex_key(s: &str) -> Vec<u8> {
        hex::decode(s).unwrap()
    }
}
