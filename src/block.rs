// Helpers for slicing byte strings into fixed size blocks.
use crate::{Error, Result};

/// Returns the block size as a PKCS#7 pad value, which must fit in one byte.
pub(crate) fn check_block_size(block_size: usize) -> Result<u8> {
    match u8::try_from(block_size) {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::InvalidBlockSize(block_size)),
    }
}

pub(crate) fn check_multiple(bytes: &[u8], block_size: usize) -> Result<()> {
    check_block_size(block_size)?;
    if bytes.len() % block_size != 0 {
        return Err(Error::InvalidLength {
            length: bytes.len(),
            block_size,
        });
    }
    Ok(())
}

/// Splits a ciphertext into blocks. The first block is the IV (or whatever
/// precedes the first data block) so at least two blocks are required.
pub(crate) fn split_ciphertext(ciphertext: &[u8], block_size: usize) -> Result<Vec<&[u8]>> {
    check_multiple(ciphertext, block_size)?;
    if ciphertext.len() < 2 * block_size {
        return Err(Error::InvalidLength {
            length: ciphertext.len(),
            block_size,
        });
    }
    Ok(ciphertext.chunks(block_size).collect())
}

pub(crate) fn xor_bytes(buf_a: &[u8], buf_b: &[u8]) -> Vec<u8> {
    buf_a.iter().zip(buf_b).map(|(a, b)| a ^ b).collect()
}
