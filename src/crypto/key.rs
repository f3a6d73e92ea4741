use std::fmt;

use zeroize::Zeroizing;

use super::enc_provider::{self, EncProvider};

/// Encryption type identifiers as assigned for Kerberos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Enctype {
    DesCbcCrc = 1,
    DesCbcMd4 = 2,
    DesCbcMd5 = 3,
    ArcfourHmac = 23,
    Camellia128CtsCmac = 25,
    Camellia256CtsCmac = 26,
}

impl Enctype {
    pub const ALL: [Enctype; 6] = [
        Enctype::DesCbcCrc,
        Enctype::DesCbcMd4,
        Enctype::DesCbcMd5,
        Enctype::ArcfourHmac,
        Enctype::Camellia128CtsCmac,
        Enctype::Camellia256CtsCmac,
    ];

    pub fn from_i32(value: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|e| *e as i32 == value)
    }

    pub fn name(self) -> &'static str {
        match self {
            Enctype::DesCbcCrc => "des-cbc-crc",
            Enctype::DesCbcMd4 => "des-cbc-md4",
            Enctype::DesCbcMd5 => "des-cbc-md5",
            Enctype::ArcfourHmac => "arcfour-hmac",
            Enctype::Camellia128CtsCmac => "camellia128-cts-cmac",
            Enctype::Camellia256CtsCmac => "camellia256-cts-cmac",
        }
    }

    /// Parses an enctype by name (case-insensitive) or by number.
    pub fn parse(s: &str) -> Option<Self> {
        if let Ok(value) = s.parse::<i32>() {
            return Self::from_i32(value);
        }
        Self::ALL.into_iter().find(|e| e.name().eq_ignore_ascii_case(s))
    }

    /// The encryption provider backing this enctype.
    pub fn provider(self) -> &'static dyn EncProvider {
        match self {
            Enctype::DesCbcCrc | Enctype::DesCbcMd4 | Enctype::DesCbcMd5 => &enc_provider::DES,
            Enctype::ArcfourHmac => &enc_provider::ARCFOUR,
            Enctype::Camellia128CtsCmac => &enc_provider::CAMELLIA128,
            Enctype::Camellia256CtsCmac => &enc_provider::CAMELLIA256,
        }
    }
}

/// Returns `true` if `value` names a supported enctype.
pub fn valid_enctype(value: i32) -> bool {
    Enctype::from_i32(value).is_some()
}

/// Key usage number, selecting per-purpose cipher state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyUsage(pub i32);

/// Raw key material tagged with its enctype.
///
/// Contents are wiped when the block is dropped and never shown by `Debug`.
#[derive(Clone)]
pub struct KeyBlock {
    enctype: Enctype,
    contents: Zeroizing<Vec<u8>>,
}

impl KeyBlock {
    pub fn new(enctype: Enctype, contents: &[u8]) -> Self {
        Self {
            enctype,
            contents: Zeroizing::new(contents.to_vec()),
        }
    }

    pub fn enctype(&self) -> Enctype {
        self.enctype
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

impl fmt::Debug for KeyBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyBlock")
            .field("enctype", &self.enctype)
            .field("len", &self.contents.len())
            .finish_non_exhaustive()
    }
}

/// A key handle as passed to encryption providers.
#[derive(Debug, Clone)]
pub struct Key {
    keyblock: KeyBlock,
}

impl Key {
    pub fn new(keyblock: KeyBlock) -> Self {
        Self { keyblock }
    }

    pub fn keyblock(&self) -> &KeyBlock {
        &self.keyblock
    }

    pub fn contents(&self) -> &[u8] {
        self.keyblock.contents()
    }
}

impl From<KeyBlock> for Key {
    fn from(keyblock: KeyBlock) -> Self {
        Self::new(keyblock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_key_bytes() {
        let kb = KeyBlock::new(Enctype::ArcfourHmac, &[0xAB; 16]);
        let shown = format!("{kb:?}");
        assert!(shown.contains("ArcfourHmac"));
        assert!(!shown.contains("171"));
        assert!(!shown.to_lowercase().contains("ab, "));
    }

    #[test]
    fn enctype_numbers_roundtrip() {
        for e in Enctype::ALL {
            assert_eq!(Enctype::from_i32(e as i32), Some(e));
        }
        assert!(valid_enctype(23));
        assert!(!valid_enctype(0));
        assert!(!valid_enctype(18));
    }

    #[test]
    fn enctypes_parse_by_name_or_number() {
        assert_eq!(Enctype::parse("arcfour-hmac"), Some(Enctype::ArcfourHmac));
        assert_eq!(Enctype::parse("DES-CBC-MD5"), Some(Enctype::DesCbcMd5));
        assert_eq!(Enctype::parse("25"), Some(Enctype::Camellia128CtsCmac));
        assert_eq!(Enctype::parse("18"), None);
        assert_eq!(Enctype::parse("aes256-cts"), None);
    }

    #[test]
    fn enctypes_map_to_providers() {
        assert_eq!(Enctype::DesCbcMd5.provider().info().name, "des-cbc");
        assert_eq!(Enctype::ArcfourHmac.provider().info().block_size, 1);
        assert_eq!(Enctype::Camellia256CtsCmac.provider().info().key_length, 32);
    }
}
