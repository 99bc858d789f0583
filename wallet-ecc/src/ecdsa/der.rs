//! ASN.1 DER encoded ECDSA signatures.
//!
//! Only the shape produced by signers in the wild is accepted:
//!
//! ```text
//! 0x30 len 0x02 rlen r... 0x02 slen s...
//! ```
//!
//! with single-byte lengths and `len == rlen + slen + 4`. Integers shorter
//! than 32 bytes are left-padded; longer ones (a leading zero byte keeps a
//! DER integer positive) contribute their low 32 bytes.

use crate::{Error, Result};

/// Size of one raw signature component.
const SCALAR_SIZE: usize = 32;

/// Tag of an ASN.1 `SEQUENCE`.
const SEQUENCE_TAG: u8 = 0x30;

/// Tag of an ASN.1 `INTEGER`.
const INTEGER_TAG: u8 = 0x02;

/// Decode a DER signature into its raw `r || s` form.
///
/// `sig` is zeroed first and stays zeroed if the input is rejected. Bytes
/// following the encoded sequence are ignored.
///
/// ```
/// use wallet_ecc::ecdsa::der_to_sig;
///
/// let der = [0x30, 0x06, 0x02, 0x01, 0x05, 0x02, 0x01, 0x07];
/// let mut sig = [0u8; 64];
/// der_to_sig(&der, &mut sig)?;
/// assert_eq!(sig[31], 5);
/// assert_eq!(sig[63], 7);
/// # Ok::<(), wallet_ecc::Error>(())
/// ```
pub fn der_to_sig(der: &[u8], sig: &mut [u8; 64]) -> Result<()> {
    sig.fill(0);

    let (r, s) = parse(der).ok_or(Error::MalformedDer)?;
    let (sig_r, sig_s) = sig.split_at_mut(SCALAR_SIZE);
    copy_integer(sig_r, r);
    copy_integer(sig_s, s);
    Ok(())
}

/// Returns the contents of the two integers.
fn parse(der: &[u8]) -> Option<(&[u8], &[u8])> {
    let rest = expect_tag(der, SEQUENCE_TAG)?;
    let (&len, rest) = rest.split_first()?;
    let (r, rest) = integer(rest)?;
    let (s, _) = integer(rest)?;

    if r.len() + s.len() + 4 != usize::from(len) {
        return None;
    }

    Some((r, s))
}

/// Splits one `INTEGER` off the front of `input`.
fn integer(input: &[u8]) -> Option<(&[u8], &[u8])> {
    let rest = expect_tag(input, INTEGER_TAG)?;
    let (&len, rest) = rest.split_first()?;
    rest.split_at_checked(usize::from(len))
}

fn expect_tag(input: &[u8], tag: u8) -> Option<&[u8]> {
    match input.split_first()? {
        (&t, rest) if t == tag => Some(rest),
        _ => None,
    }
}

/// Right-aligns a big-endian integer into a 32-byte slot.
fn copy_integer(out: &mut [u8], int: &[u8]) {
    if int.len() < SCALAR_SIZE {
        out[SCALAR_SIZE - int.len()..].copy_from_slice(int);
    } else {
        out.copy_from_slice(&int[int.len() - SCALAR_SIZE..]);
    }
}
