//! Cryptographic core.
//!
//! Encryption providers, hash providers, HMAC, PBKDF2 and DES key utilities,
//! all operating on scattered [`CryptoIov`] messages where that applies.

pub mod des_keys;
pub mod enc_provider;
pub mod hash;
pub mod hmac;
pub mod iov;
pub mod kdf;
pub mod key;

pub use des_keys::{fixup_parity, is_weak_key, random_key, random_to_key};
pub use enc_provider::{CipherState, EncProvider, ProviderInfo};
pub use hash::HashProvider;
pub use self::hmac::{hmac, hmac_keyblock};
pub use iov::{CryptoIov, IovCursor, IovRole, get_block, put_block};
pub use kdf::pbkdf2_hmac_sha1;
pub use key::{Enctype, Key, KeyBlock, KeyUsage, valid_enctype};

/// DES block size (8 bytes).
pub const DES_BLOCK_SIZE: usize = 8;
/// DES key length including parity (8 bytes).
pub const DES_KEY_SIZE: usize = 8;
/// Random bytes needed to build a DES key (7 bytes).
pub const DES_KEY_BYTES: usize = 7;
/// ARC4 key length (16 bytes).
pub const ARCFOUR_KEY_SIZE: usize = 16;
