// PKCS#7 padding
use crate::{Error, Result};

/// Pads `bytes` to a multiple of `block_size`. A block size of 0 has no valid
/// padding, so the bytes come back unchanged.
pub fn pkcs7_pad(bytes: &[u8], block_size: u8) -> Vec<u8> {
    if block_size == 0 {
        return bytes.to_vec();
    }
    let n_pad = block_size - (bytes.len() % block_size as usize) as u8;
    let mut out = Vec::with_capacity(bytes.len() + n_pad as usize);
    out.extend_from_slice(bytes);
    (0..n_pad).for_each(|_| out.push(n_pad));
    out
}

/// Removes a PKCS#7 padding after checking it is well formed.
pub fn pkcs7_unpad(bytes: &mut Vec<u8>) -> Result<()> {
    if let Some(n_pad) = is_pkcs7_padded(bytes) {
        bytes.truncate(bytes.len() - n_pad as usize);
        return Ok(());
    }
    Err(Error::InvalidPadding)
}

/// Removes as many trailing bytes as the final byte says, without checking
/// the rest of the padding.
pub fn strip_padding(bytes: &mut Vec<u8>) {
    if let Some(&n_pad) = bytes.last() {
        bytes.truncate(bytes.len().saturating_sub(n_pad as usize));
    }
}

pub(crate) fn is_pkcs7_padded(bytes: &[u8]) -> Option<u8> {
    let n_pad = *bytes.last()?;
    if n_pad == 0 || n_pad as usize > bytes.len() {
        return None;
    }
    let padded = &bytes[(bytes.len() - n_pad as usize)..];
    if padded.iter().all(|&el| el == n_pad) {
        return Some(n_pad);
    }
    None
}
