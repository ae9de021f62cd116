// The padding oracle contract, and an in-process oracle built on AES-CBC.
use rand::RngCore;

use crate::cbc::{decrypt_aes_128_cbc, encrypt_aes_128_cbc, AES_BLOCK_SIZE};
use crate::padding::{is_pkcs7_padded, pkcs7_pad};
use crate::{Error, Result};

/// Anything that can tell us whether a ciphertext decrypts to valid padding.
///
/// The first block of every ciphertext passed to [`validate`] is treated as
/// the IV. Block pairs may be cracked concurrently, hence `Sync`.
///
/// [`validate`]: PaddingOracle::validate
pub trait PaddingOracle: Sync {
    /// Returns `true` if `ciphertext` decrypts to well formed PKCS#7 padding.
    fn validate(&self, ciphertext: &[u8]) -> bool;

    /// The ciphertext to attack. If the IV is known it should be the first
    /// block, otherwise the first block of the ciphertext cannot be revealed.
    fn supply(&self) -> Result<Vec<u8>> {
        Err(Error::NoCiphertext)
    }
}

impl<F> PaddingOracle for F
where
    F: Fn(&[u8]) -> bool + Sync,
{
    fn validate(&self, ciphertext: &[u8]) -> bool {
        self(ciphertext)
    }
}

/// A server that decrypts `iv || ciphertext` with a secret key and leaks
/// whether the padding was valid.
pub struct CbcPaddingOracle {
    key: [u8; 16],
    iv: [u8; 16],
    intercepted: Option<Vec<u8>>,
}

impl CbcPaddingOracle {
    pub fn new(key: [u8; 16], iv: [u8; 16]) -> Self {
        Self {
            key,
            iv,
            intercepted: None,
        }
    }

    pub fn with_random_key() -> Self {
        let mut rng = rand::thread_rng();
        let mut key = [0u8; 16];
        let mut iv = [0u8; 16];
        rng.fill_bytes(&mut key);
        rng.fill_bytes(&mut iv);
        Self::new(key, iv)
    }

    /// Pads and encrypts `message`, returning `iv || ciphertext`.
    pub fn seal(&self, message: &[u8]) -> Result<Vec<u8>> {
        self.seal_unpadded(&pkcs7_pad(message, AES_BLOCK_SIZE as u8))
    }

    /// Encrypts a whole number of blocks as they are, returning `iv || ciphertext`.
    pub fn seal_unpadded(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let ciphertext = encrypt_aes_128_cbc(plaintext, &self.key, &self.iv)?;
        Ok([self.iv.as_slice(), &ciphertext].concat())
    }

    /// Seals `message` and hands it out through [`PaddingOracle::supply`].
    pub fn intercept(mut self, message: &[u8]) -> Result<Self> {
        self.intercepted = Some(self.seal(message)?);
        Ok(self)
    }

    pub fn key(&self) -> &[u8; 16] {
        &self.key
    }
}

impl PaddingOracle for CbcPaddingOracle {
    fn validate(&self, ciphertext: &[u8]) -> bool {
        if ciphertext.len() < 2 * AES_BLOCK_SIZE {
            return false;
        }
        let (iv, ciphertext) = ciphertext.split_at(AES_BLOCK_SIZE);
        let Ok(iv) = <[u8; 16]>::try_from(iv) else {
            return false;
        };
        decrypt_aes_128_cbc(ciphertext, &self.key, &iv)
            .map(|plaintext| is_pkcs7_padded(&plaintext).is_some())
            .unwrap_or(false)
    }

    fn supply(&self) -> Result<Vec<u8>> {
        self.intercepted.clone().ok_or(Error::NoCiphertext)
    }
}
