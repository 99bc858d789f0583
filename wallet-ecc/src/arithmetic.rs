//! Group operations on short Weierstrass curves `y² = x³ + ax + b` with
//! `-3 <= a <= 0` over a ~256-bit prime field.

mod affine;
mod jacobian;
mod mul;

#[cfg(feature = "precomputed-tables")]
pub(crate) mod lookup_table;

pub use self::{affine::AffinePoint, jacobian::JacobianPoint};

#[cfg(feature = "precomputed-tables")]
pub use self::lookup_table::BasepointTable;

use crate::Bignum256;
use core::fmt;

/// Parameters of a curve `y² = x³ + ax + b (mod prime)`.
///
/// Every point operation takes the curve it works on as a parameter. The
/// record is `Copy` so that a variant can be derived from an existing curve,
/// e.g. the same curve without its base-point table:
///
/// ```
/// use wallet_ecc::SECP256K1;
///
/// # #[allow(unused_mut)]
/// let mut plain = SECP256K1;
/// #[cfg(feature = "precomputed-tables")]
/// {
///     plain.basepoint_table = None;
/// }
/// assert_eq!(plain.g, SECP256K1.g);
/// ```
#[derive(Clone, Copy)]
pub struct CurveParams {
    /// Field modulus; must be a prime `≡ 3 (mod 4)` between
    /// `2^256 - 2^224` and `2^256`.
    pub prime: Bignum256,

    /// Order of the group generated by [`CurveParams::g`]; same range as
    /// the prime.
    pub order: Bignum256,

    /// Coefficient `a` in the curve equation; must lie in `-3..=0`.
    pub a: i32,

    /// Coefficient `b` in the curve equation, reduced.
    pub b: Bignum256,

    /// Generator point.
    pub g: AffinePoint,

    /// Optional table of odd multiples of the powers of 16 of the generator,
    /// used by [`CurveParams::scalar_multiply`].
    #[cfg(feature = "precomputed-tables")]
    pub basepoint_table: Option<&'static BasepointTable>,
}

impl CurveParams {
    /// `-a` as the small integer the limb routines take.
    pub(crate) fn minus_a(&self) -> u32 {
        assert!((-3..=0).contains(&self.a), "curve coefficient a out of range");
        self.a.unsigned_abs()
    }
}

impl fmt::Debug for CurveParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurveParams")
            .field("prime", &self.prime)
            .field("order", &self.order)
            .field("a", &self.a)
            .field("b", &self.b)
            .field("g", &self.g)
            .finish_non_exhaustive()
    }
}
