//! Helpers shared by the integration tests.

#![allow(dead_code)]

use num_bigint::BigUint;
use rand_core::OsRng;
use wallet_ecc::{Bignum256, CurveParams, ecdsa::RecoveryId};

pub fn to_biguint(x: &Bignum256) -> BigUint {
    BigUint::from_bytes_be(&x.to_be_bytes())
}

pub fn from_biguint(x: &BigUint) -> Bignum256 {
    let bytes = x.to_bytes_be();
    let mut buf = [0u8; 32];
    buf[32 - bytes.len()..].copy_from_slice(&bytes);
    Bignum256::from_be_bytes(&buf)
}

/// Maps arbitrary bytes to a scalar in `1..n`.
pub fn nonzero_scalar(curve: &CurveParams, bytes: &[u8; 32]) -> Bignum256 {
    let n = to_biguint(&curve.order);
    let k = BigUint::from_bytes_be(bytes) % (&n - 1u32) + 1u32;
    from_biguint(&k)
}

/// Textbook ECDSA signature of `digest` by secret `d` with nonce `k`.
pub fn sign(
    curve: &CurveParams,
    d: &Bignum256,
    k: &Bignum256,
    digest: &[u8; 32],
) -> ([u8; 64], RecoveryId) {
    let n = to_biguint(&curve.order);
    let big_r = curve.scalar_multiply(k, &mut OsRng);

    let x = to_biguint(&big_r.x);
    let r = &x % &n;
    let e = BigUint::from_bytes_be(digest);
    let k_inv = to_biguint(k).modpow(&(&n - 2u32), &n);
    let s = (k_inv * (e + &r * to_biguint(d))) % &n;

    let mut sig = [0u8; 64];
    sig[..32].copy_from_slice(&from_biguint(&r).to_be_bytes());
    sig[32..].copy_from_slice(&from_biguint(&s).to_be_bytes());

    let id = RecoveryId::new(bool::from(big_r.y.is_odd()), x >= n);
    (sig, id)
}

/// DER encoding of a raw signature, as produced by common signers.
pub fn to_der(sig: &[u8; 64]) -> Vec<u8> {
    fn integer(out: &mut Vec<u8>, bytes: &[u8]) {
        let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len() - 1);
        let bytes = &bytes[start..];
        let pad = bytes[0] & 0x80 != 0;
        out.push(0x02);
        out.push((bytes.len() + pad as usize) as u8);
        if pad {
            out.push(0);
        }
        out.extend_from_slice(bytes);
    }

    let mut body = Vec::new();
    integer(&mut body, &sig[..32]);
    integer(&mut body, &sig[32..]);

    let mut der = vec![0x30, body.len() as u8];
    der.extend_from_slice(&body);
    der
}
