//! secp256k1 curve parameters.
//!
//! Specified in Certicom's SECG in SEC 2: Recommended Elliptic Curve Domain
//! Parameters:
//!
//! <https://www.secg.org/sec2-v2.pdf>
//!
//! The curve's equation is `y² = x³ + 7` over a ~256-bit prime field.

use crate::{AffinePoint, Bignum256, CurveParams};
use hex_literal::hex;

#[cfg(feature = "precomputed-tables")]
use crate::arithmetic::BasepointTable;

/// Field modulus: `2^256 - 2^32 - 977`.
pub const PRIME: Bignum256 = Bignum256::from_be_bytes(&hex!(
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F"
));

/// Order of the group generated by [`GENERATOR`].
pub const ORDER: Bignum256 = Bignum256::from_be_bytes(&hex!(
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141"
));

/// Coefficient `b` in the curve equation.
pub const EQUATION_B: Bignum256 = Bignum256::from_u32(7);

/// Generator point.
pub const GENERATOR: AffinePoint = AffinePoint {
    x: Bignum256::from_be_bytes(&hex!(
        "79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798"
    )),
    y: Bignum256::from_be_bytes(&hex!(
        "483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8"
    )),
};

/// Odd multiples of the powers of 16 of [`GENERATOR`], built on first use.
#[cfg(feature = "precomputed-tables")]
static SECP256K1_TABLE: BasepointTable = BasepointTable::new(init_table);

#[cfg(feature = "precomputed-tables")]
fn init_table() -> crate::arithmetic::lookup_table::Table {
    BasepointTable::generate(&SECP256K1)
}

/// secp256k1 curve parameters.
pub static SECP256K1: CurveParams = CurveParams {
    prime: PRIME,
    order: ORDER,
    a: 0,
    b: EQUATION_B,
    g: GENERATOR,
    #[cfg(feature = "precomputed-tables")]
    basepoint_table: Some(&SECP256K1_TABLE),
};
