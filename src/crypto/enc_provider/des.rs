//! Single DES in CBC mode.

use des::Des;
use des::cipher::generic_array::GenericArray;
use des::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use tracing::debug;
use zeroize::Zeroizing;

use super::{CipherState, EncProvider, ProviderInfo, state_iv, validate};
use crate::crypto::iov::{CryptoIov, IovCursor, get_block, put_block};
use crate::crypto::key::{Key, KeyBlock, KeyUsage};
use crate::crypto::{DES_BLOCK_SIZE, DES_KEY_BYTES, DES_KEY_SIZE};
use crate::error::{Error, Result};

type Block = [u8; DES_BLOCK_SIZE];

const INFO: ProviderInfo = ProviderInfo {
    name: "des-cbc",
    block_size: DES_BLOCK_SIZE,
    key_bytes: DES_KEY_BYTES,
    key_length: DES_KEY_SIZE,
};

#[derive(Debug)]
pub struct DesProvider;

impl DesProvider {
    fn cipher(key: &Key) -> Result<Des> {
        Des::new_from_slice(key.contents()).map_err(|_| Error::BadKeySize)
    }

    fn initial_iv(iv: Option<&[u8]>) -> Zeroizing<Block> {
        let mut block = Zeroizing::new([0u8; DES_BLOCK_SIZE]);
        if let Some(iv) = iv {
            block.copy_from_slice(iv);
        }
        block
    }
}

fn xor_into(block: &mut Block, other: &Block) {
    for (b, o) in block.iter_mut().zip(other) {
        *b ^= o;
    }
}

impl EncProvider for DesProvider {
    fn info(&self) -> &ProviderInfo {
        &INFO
    }

    fn encrypt(
        &self,
        key: &Key,
        mut state: Option<&mut CipherState>,
        iovs: &mut [CryptoIov<'_>],
    ) -> Result<()> {
        let iv = state_iv(state.as_deref())?;
        if validate(&INFO, key, iv, iovs)? {
            return Ok(());
        }

        let cipher = Self::cipher(key)?;
        let mut chain = Self::initial_iv(iv);
        let mut block = Zeroizing::new([0u8; DES_BLOCK_SIZE]);
        let mut input = IovCursor::new();
        let mut output = IovCursor::new();
        let mut blocks = 0usize;

        while get_block(&mut block[..], iovs, &mut input) {
            xor_into(&mut block, &chain);
            cipher.encrypt_block(GenericArray::from_mut_slice(&mut block[..]));
            put_block(iovs, &mut output, &block[..]);
            chain.copy_from_slice(&block[..]);
            blocks += 1;
        }
        debug!(provider = INFO.name, blocks, "encrypted");

        // the last ciphertext block becomes the next IV
        if let Some(CipherState::Iv(iv)) = state.as_deref_mut() {
            iv.copy_from_slice(&chain[..]);
        }
        Ok(())
    }

    fn decrypt(
        &self,
        key: &Key,
        mut state: Option<&mut CipherState>,
        iovs: &mut [CryptoIov<'_>],
    ) -> Result<()> {
        let iv = state_iv(state.as_deref())?;
        if validate(&INFO, key, iv, iovs)? {
            return Ok(());
        }

        let cipher = Self::cipher(key)?;
        let mut chain = Self::initial_iv(iv);
        let mut iblock = Zeroizing::new([0u8; DES_BLOCK_SIZE]);
        let mut oblock = Zeroizing::new([0u8; DES_BLOCK_SIZE]);
        let mut input = IovCursor::new();
        let mut output = IovCursor::new();
        let mut blocks = 0usize;

        while get_block(&mut iblock[..], iovs, &mut input) {
            oblock.copy_from_slice(&iblock[..]);
            cipher.decrypt_block(GenericArray::from_mut_slice(&mut oblock[..]));
            xor_into(&mut oblock, &chain);
            put_block(iovs, &mut output, &oblock[..]);
            chain.copy_from_slice(&iblock[..]);
            blocks += 1;
        }
        debug!(provider = INFO.name, blocks, "decrypted");

        // the last input block becomes the next IV
        if let Some(CipherState::Iv(iv)) = state.as_deref_mut() {
            iv.copy_from_slice(&iblock[..]);
        }
        Ok(())
    }

    fn cbc_mac(
        &self,
        key: &Key,
        iovs: &[CryptoIov<'_>],
        iv: Option<&[u8]>,
        output: &mut [u8],
    ) -> Result<()> {
        if validate(&INFO, key, iv, iovs)? {
            return Ok(());
        }
        if output.len() != DES_BLOCK_SIZE {
            return Err(Error::BadMessageSize);
        }

        let cipher = Self::cipher(key)?;
        let mut chain = Self::initial_iv(iv);
        let mut block = Zeroizing::new([0u8; DES_BLOCK_SIZE]);
        let mut input = IovCursor::new();

        while get_block(&mut block[..], iovs, &mut input) {
            xor_into(&mut block, &chain);
            cipher.encrypt_block(GenericArray::from_mut_slice(&mut block[..]));
            chain.copy_from_slice(&block[..]);
        }

        output.copy_from_slice(&chain[..]);
        Ok(())
    }

    fn init_state(&self, _key: &KeyBlock, _usage: KeyUsage) -> Result<CipherState> {
        Ok(CipherState::iv(&[0u8; DES_BLOCK_SIZE]))
    }
}
