// AES-128 in CBC mode, used to stand up a padding oracle to attack.
//
// Neither function pads or unpads; callers deal with PKCS#7 themselves so the
// oracle can inspect the raw decryption.
use aes::cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Block};

use crate::block::{check_multiple, xor_bytes};
use crate::Result;

pub const AES_BLOCK_SIZE: usize = 16;

pub fn encrypt_aes_128_cbc(plaintext: &[u8], key: &[u8; 16], iv: &[u8; 16]) -> Result<Vec<u8>> {
    check_multiple(plaintext, AES_BLOCK_SIZE)?;
    let cipher = Aes128::new(GenericArray::from_slice(key));
    let mut ciphertext = Vec::with_capacity(plaintext.len());

    let mut last_block = *iv;
    for plaintext_block in plaintext.chunks(AES_BLOCK_SIZE) {
        let mut block = Block::clone_from_slice(&xor_bytes(plaintext_block, &last_block));
        cipher.encrypt_block(&mut block);
        last_block.copy_from_slice(&block);
        ciphertext.extend_from_slice(&block);
    }
    Ok(ciphertext)
}

pub fn decrypt_aes_128_cbc(ciphertext: &[u8], key: &[u8; 16], iv: &[u8; 16]) -> Result<Vec<u8>> {
    check_multiple(ciphertext, AES_BLOCK_SIZE)?;
    let cipher = Aes128::new(GenericArray::from_slice(key));
    let mut message = Vec::with_capacity(ciphertext.len());

    let mut last_block: &[u8] = iv;
    for ciphertext_block in ciphertext.chunks(AES_BLOCK_SIZE) {
        let mut block = Block::clone_from_slice(ciphertext_block);
        cipher.decrypt_block(&mut block);
        message.extend(xor_bytes(&block, last_block));
        last_block = ciphertext_block;
    }
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::Error;

    const KEY: &[u8; 16] = b"YELLOW SUBMARINE";

    #[test]
    fn encrypt_aes_128_cbc_matches_known_vector() {
        // NIST SP 800-38A, F.2.1 CBC-AES128.Encrypt, first block.
        let key: [u8; 16] = [
            0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf,
            0x4f, 0x3c,
        ];
        let iv: [u8; 16] = core::array::from_fn(|i| i as u8);
        let plaintext = [
            0x6b, 0xc1, 0xbe, 0xe2, 0x2e, 0x40, 0x9f, 0x96, 0xe9, 0x3d, 0x7e, 0x11, 0x73, 0x93,
            0x17, 0x2a,
        ];

        let ciphertext = encrypt_aes_128_cbc(&plaintext, &key, &iv).unwrap();

        let expected = [
            0x76, 0x49, 0xab, 0xac, 0x81, 0x19, 0xb2, 0x46, 0xce, 0xe9, 0x8e, 0x9b, 0x12, 0xe9,
            0x19, 0x7d,
        ];
        assert_eq!(ciphertext, expected);
    }

    #[test]
    fn decrypt_then_encrypt_returns_original_ciphertext() {
        let iv = [7u8; 16];
        let plaintext = b"I'm back and I'm ringin' the bell A rockin' on the mike!".repeat(2);
        let plaintext = &plaintext[..96];

        let ciphertext = encrypt_aes_128_cbc(plaintext, KEY, &iv).unwrap();
        let decrypted = decrypt_aes_128_cbc(&ciphertext, KEY, &iv).unwrap();

        assert_eq!(decrypted, plaintext);
        assert_eq!(encrypt_aes_128_cbc(&decrypted, KEY, &iv).unwrap(), ciphertext);
    }

    #[test]
    fn encrypt_aes_128_cbc_rejects_partial_blocks() {
        let err = encrypt_aes_128_cbc(b"not a block", KEY, &[0; 16]);

        assert_eq!(
            err,
            Err(Error::InvalidLength {
                length: 11,
                block_size: 16
            })
        );
    }
}
