// Encrypting arbitrary plaintext without the key.
//
// Cracking a block against an all-zero reference gives back its intermediate
// state I = D(C). If we then place the block
//
//                 C' = I ⊕ P
//
// in front of C, the server decrypts C to exactly P. C' is a block we made up,
// so we can crack it in turn and put another block in front of that. Working
// back from an arbitrary final block builds a ciphertext for any message,
// where the first block plays the part of the IV.
use log::info;
use rand::RngCore;

use crate::block::{check_multiple, xor_bytes};
use crate::{crack_block, Error, PaddingOracle, Result};

/// Builds a ciphertext that decrypts to `plaintext`, which must already be a
/// whole number of blocks (pad it first if the server expects padding).
///
/// The result is one block longer than `plaintext`: the first block acts as
/// the IV and the last block is `terminal_block`, or a random block if none is
/// given.
pub fn forge<O>(
    plaintext: &[u8],
    block_size: usize,
    oracle: &O,
    terminal_block: Option<&[u8]>,
) -> Result<Vec<u8>>
where
    O: PaddingOracle + ?Sized,
{
    check_multiple(plaintext, block_size)?;
    let terminal = match terminal_block {
        Some(block) if block.len() == block_size => block.to_vec(),
        Some(block) => {
            return Err(Error::InvalidLength {
                length: block.len(),
                block_size,
            })
        }
        None => random_block(block_size),
    };

    let zeros = vec![0u8; block_size];
    let mut blocks = vec![terminal];
    for (idx, plaintext_block) in plaintext.chunks(block_size).enumerate().rev() {
        let trailing = &blocks[blocks.len() - 1];
        let intermediate =
            crack_block(&zeros, trailing, oracle).map_err(|e| e.in_block(idx + 1))?;
        info!("forged block {}", idx + 1);
        blocks.push(xor_bytes(&intermediate, plaintext_block));
    }
    blocks.reverse();
    Ok(blocks.concat())
}

fn random_block(block_size: usize) -> Vec<u8> {
    let mut block = vec![0u8; block_size];
    rand::thread_rng().fill_bytes(&mut block);
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::cbc::decrypt_aes_128_cbc;
    use crate::{decrypt, pkcs7_pad, CbcPaddingOracle, DEMO_IV, DEMO_KEY};

    // An all-zero reference can fool the oracle on the final byte when byte
    // 15 of the intermediate state is \x02, so these use a fixed key and
    // terminal block.
    const TERMINAL: &[u8] = b"terminal block!!";

    fn oracle() -> CbcPaddingOracle {
        CbcPaddingOracle::new(DEMO_KEY, DEMO_IV)
    }

    #[rstest]
    #[case(b"YELLOW SUBMARINE".to_vec())]
    #[case(pkcs7_pad(b";admin=true;", 16))]
    #[case(pkcs7_pad(b"I'm like Samson -- Samson to Delilah", 16))]
    fn forge_then_decrypt_returns_plaintext(#[case] plaintext: Vec<u8>) {
        let oracle = oracle();

        let ciphertext = forge(&plaintext, 16, &oracle, Some(TERMINAL)).unwrap();
        let decrypted = decrypt(&ciphertext, 16, &oracle, false).unwrap();

        assert_eq!(ciphertext.len(), plaintext.len() + 16);
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn forged_ciphertext_decrypts_under_the_secret_key() {
        let oracle = oracle();
        let plaintext = pkcs7_pad(b"comment1=cooking%20MCs;admin=true", 16);

        let ciphertext = forge(&plaintext, 16, &oracle, Some(TERMINAL)).unwrap();

        let (iv, ciphertext) = ciphertext.split_at(16);
        let iv: [u8; 16] = iv.try_into().unwrap();
        let decrypted = decrypt_aes_128_cbc(ciphertext, oracle.key(), &iv).unwrap();
        assert_eq!(decrypted, plaintext);
        assert!(oracle.validate(&[iv.as_slice(), ciphertext].concat()));
    }

    #[test]
    fn forge_ends_with_given_terminal_block() {
        let oracle = oracle();
        let terminal = *b"0123456789abcdef";
        let plaintext = pkcs7_pad(b"hi", 16);

        let ciphertext = forge(&plaintext, 16, &oracle, Some(terminal.as_slice())).unwrap();

        assert_eq!(ciphertext.len(), 32);
        assert_eq!(&ciphertext[16..], &terminal);
    }

    #[test]
    fn forge_with_empty_plaintext_returns_terminal_block() {
        let oracle = CbcPaddingOracle::with_random_key();

        let ciphertext = forge(&[], 16, &oracle, Some([9u8; 16].as_slice())).unwrap();

        assert_eq!(ciphertext, [9u8; 16]);
    }

    #[rstest]
    #[case(b"short".to_vec(), None)]
    #[case(vec![0u8; 16], Some(vec![0u8; 15]))]
    fn forge_rejects_bad_lengths(#[case] plaintext: Vec<u8>, #[case] terminal: Option<Vec<u8>>) {
        let oracle = CbcPaddingOracle::with_random_key();

        let err = forge(&plaintext, 16, &oracle, terminal.as_deref());

        assert!(matches!(err, Err(Error::InvalidLength { .. })));
    }

    #[test]
    fn forge_fails_on_oracle_that_never_validates() {
        let oracle = |_: &[u8]| false;

        let err = forge(&[0u8; 32], 16, &oracle, None);

        assert_eq!(
            err,
            Err(Error::OracleExhausted {
                block: 2,
                position: 16
            })
        );
    }
}
