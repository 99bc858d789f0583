#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg"
)]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]
#![doc = include_str!("../README.md")]

//! ## Usage
//!
//! Recovering the public key that produced a signature:
//!
//! ```
//! use wallet_ecc::{SECP256K1, Bignum256, ecdsa::{RecoveryId, Signature}};
//! use rand_core::OsRng;
//!
//! # fn main() -> wallet_ecc::Result<()> {
//! // d = 1, k = 1: r is the x-coordinate of G and the key is G itself
//! let digest = [0u8; 32];
//! let r = SECP256K1.g.x.to_be_bytes();
//! let s = r;
//! let mut raw = [0u8; 64];
//! raw[..32].copy_from_slice(&r);
//! raw[32..].copy_from_slice(&s);
//!
//! let signature = Signature::from_bytes(&raw)?;
//! let key = signature.recover_public_key(&SECP256K1, &digest, RecoveryId::new(false, false), &mut OsRng)?;
//! assert_eq!(&key[1..33], &r);
//! # Ok(())
//! # }
//! ```

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod arithmetic;
pub mod bignum;
pub mod ecdsa;
pub mod secp256k1;

mod error;

#[cfg(test)]
mod dev;

pub use crate::{
    arithmetic::{AffinePoint, CurveParams, JacobianPoint},
    bignum::{Bignum256, FormatOptions},
    error::{Error, Result},
    secp256k1::SECP256K1,
};
pub use rand_core;
pub use subtle;
pub use zeroize;

#[cfg(feature = "precomputed-tables")]
pub use crate::arithmetic::BasepointTable;
