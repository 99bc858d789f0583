//! Affine points

use super::CurveParams;
use crate::Bignum256;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::DefaultIsZeroes;

/// Curve point expressed in affine coordinates.
///
/// The point at infinity is represented as `(0, 0)`, which is never on a
/// curve with `b != 0`. Coordinates are kept reduced modulo the field prime,
/// so equality of points is equality of their limbs.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct AffinePoint {
    /// x-coordinate
    pub x: Bignum256,

    /// y-coordinate
    pub y: Bignum256,
}

impl AffinePoint {
    /// The point at infinity.
    pub const INFINITY: Self = Self {
        x: Bignum256::ZERO,
        y: Bignum256::ZERO,
    };

    /// Create a new [`AffinePoint`] with the given coordinates.
    pub const fn new(x: Bignum256, y: Bignum256) -> Self {
        Self { x, y }
    }

    /// Is this the point at infinity?
    pub fn is_infinity(&self) -> bool {
        (self.x.is_zero() & self.y.is_zero()).into()
    }

    /// Overwrite this point with the point at infinity.
    pub fn set_infinity(&mut self) {
        *self = Self::INFINITY;
    }

    /// Is `other == -self`?
    ///
    /// Points with `y = 0` are their own negatives and are reported as not
    /// negative of anything, since adding them is a doubling.
    pub fn is_negative_of(&self, other: &Self) -> bool {
        self.x == other.x && !bool::from(self.y.is_zero()) && self.y != other.y
    }
}

impl ConditionallySelectable for AffinePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: Bignum256::conditional_select(&a.x, &b.x, choice),
            y: Bignum256::conditional_select(&a.y, &b.y, choice),
        }
    }
}

impl ConstantTimeEq for AffinePoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.x.ct_eq(&other.x) & self.y.ct_eq(&other.y)
    }
}

impl DefaultIsZeroes for AffinePoint {}

/// Chord-and-tangent formulas in affine coordinates.
///
/// Each call costs a field inversion and branches on its inputs: they are
/// used on public points only (table construction, the public combination
/// step of key recovery).
impl CurveParams {
    /// Returns `p + q`.
    pub fn point_add(&self, p: &AffinePoint, q: &AffinePoint) -> AffinePoint {
        if p.is_infinity() {
            return *q;
        }
        if q.is_infinity() {
            return *p;
        }
        if p == q {
            return self.point_double(p);
        }
        if p.is_negative_of(q) {
            return AffinePoint::INFINITY;
        }

        let prime = &self.prime;

        // lambda = (y2 - y1) / (x2 - x1)
        let inv = q.x.sub_mod(&p.x, prime).fast_mod(prime).invert_mod(prime);
        let lambda = q.y.sub_mod(&p.y, prime).mul_mod(&inv, prime);

        self.chord(p, &lambda, &p.x.add_mod(&q.x, prime))
    }

    /// Returns `2p`.
    pub fn point_double(&self, p: &AffinePoint) -> AffinePoint {
        if p.is_infinity() || bool::from(p.y.is_zero()) {
            return AffinePoint::INFINITY;
        }

        let prime = &self.prime;

        // lambda = (3x^2 + a) / 2y
        let inv = p.y.mul_small(2, prime).reduce(prime).invert_mod(prime);
        let lambda = p
            .x
            .mul_mod(&p.x, prime)
            .mul_small(3, prime)
            .sub_small(self.minus_a(), prime)
            .mul_mod(&inv, prime);

        self.chord(p, &lambda, &p.x.shl1())
    }

    /// Completes an addition or doubling through `p` with slope `lambda`,
    /// where `x_sum` is the (partly reduced) sum of the two x-coordinates.
    fn chord(&self, p: &AffinePoint, lambda: &Bignum256, x_sum: &Bignum256) -> AffinePoint {
        let prime = &self.prime;

        // xr = lambda^2 - x1 - x2
        let x = lambda
            .mul_mod(lambda, prime)
            .sub_mod(x_sum, prime)
            .fast_mod(prime)
            .reduce(prime);

        // yr = lambda (x1 - xr) - y1
        let y = p
            .x
            .sub_mod(&x, prime)
            .mul_mod(lambda, prime)
            .sub_mod(&p.y, prime)
            .fast_mod(prime)
            .reduce(prime);

        AffinePoint { x, y }
    }
}
