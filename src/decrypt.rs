// Decrypting a whole ciphertext one block pair at a time.
//
// Block i only depends on the ciphertext blocks i-1 and i, so the pairs can be
// cracked in any order, or all at once.
use log::info;
use rayon::prelude::*;

use crate::block::split_ciphertext;
use crate::padding::strip_padding;
use crate::{crack_block, PaddingOracle, Result};

/// Decrypts every block of `ciphertext` except the first, which is taken as
/// the IV. Pairs are cracked from the end of the message backwards.
///
/// With `strip_padding` the final plaintext byte is trusted as the padding
/// length and that many bytes are dropped.
pub fn decrypt<O>(
    ciphertext: &[u8],
    block_size: usize,
    oracle: &O,
    strip_padding: bool,
) -> Result<Vec<u8>>
where
    O: PaddingOracle + ?Sized,
{
    let blocks = split_ciphertext(ciphertext, block_size)?;
    let mut revealed = Vec::with_capacity(blocks.len() - 1);
    for (idx, pair) in blocks.windows(2).enumerate().rev() {
        revealed.push(crack_pair(idx + 1, pair, oracle)?);
    }
    revealed.reverse();
    Ok(finish(revealed.concat(), strip_padding))
}

/// As [`decrypt`], but cracks all block pairs concurrently on the rayon pool.
pub fn decrypt_parallel<O>(
    ciphertext: &[u8],
    block_size: usize,
    oracle: &O,
    strip_padding: bool,
) -> Result<Vec<u8>>
where
    O: PaddingOracle + ?Sized,
{
    let blocks = split_ciphertext(ciphertext, block_size)?;
    let revealed = blocks
        .par_windows(2)
        .enumerate()
        .map(|(idx, pair)| crack_pair(idx + 1, pair, oracle))
        .collect::<Result<Vec<_>>>()?;
    Ok(finish(revealed.concat(), strip_padding))
}

fn crack_pair<O>(block: usize, pair: &[&[u8]], oracle: &O) -> Result<Vec<u8>>
where
    O: PaddingOracle + ?Sized,
{
    let revealed = crack_block(pair[0], pair[1], oracle).map_err(|e| e.in_block(block))?;
    info!("revealed block {block}: {:?}", String::from_utf8_lossy(&revealed));
    Ok(revealed)
}

fn finish(mut plaintext: Vec<u8>, strip: bool) -> Vec<u8> {
    if strip {
        strip_padding(&mut plaintext);
    }
    plaintext
}
