//! Jacobian points

use super::{AffinePoint, CurveParams};
use crate::{Bignum256, bignum::LIMB_MASK};
use rand_core::{CryptoRng, RngCore};
use subtle::{ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

/// Curve point in Jacobian coordinates: the affine point `(x/z², y/z³)`.
///
/// Coordinates are partly reduced between operations. A Jacobian point is
/// created from an affine point with a random `z`, so that the limbs seen
/// during a scalar multiplication are unrelated from one run to the next,
/// and converted back with a single inversion at the end. [`add_affine`]
/// and [`double`] wipe their intermediate values before returning.
///
/// [`add_affine`]: JacobianPoint::add_affine
/// [`double`]: JacobianPoint::double
#[derive(Clone, Copy, Debug, Default)]
pub struct JacobianPoint {
    /// `x · z²`
    pub x: Bignum256,

    /// `y · z³`
    pub y: Bignum256,

    /// Blinding denominator.
    pub z: Bignum256,
}

impl JacobianPoint {
    /// Blind `p` with a fresh random `z` in `1..order`.
    pub fn from_affine(
        p: &AffinePoint,
        curve: &CurveParams,
        rng: &mut (impl CryptoRng + RngCore),
    ) -> Self {
        let prime = &curve.prime;
        let z = random_nonzero_below(&curve.order, rng);

        let z2 = z.mul_mod(&z, prime);
        let z3 = z2.mul_mod(&z, prime);

        Self {
            x: p.x.mul_mod(&z2, prime),
            y: p.y.mul_mod(&z3, prime),
            z,
        }
    }

    /// Convert back to affine coordinates. The result is reduced.
    pub fn to_affine(&self, curve: &CurveParams) -> AffinePoint {
        let prime = &curve.prime;

        let zi = self.z.invert_mod(prime);
        let zi2 = zi.mul_mod(&zi, prime);
        let zi3 = zi2.mul_mod(&zi, prime);

        AffinePoint {
            x: self.x.mul_mod(&zi2, prime).reduce(prime),
            y: self.y.mul_mod(&zi3, prime).reduce(prime),
        }
    }

    /// Replace `self` with `self + p`.
    ///
    /// The doubling case `p == self` goes through the same sequence of
    /// operations as a regular addition: both numerators are computed and
    /// one is selected in constant time. `p == -self` is not handled; it
    /// does not occur in the scalar multiplication ladders.
    pub fn add_affine(&mut self, p: &AffinePoint, curve: &CurveParams) {
        let prime = &curve.prime;
        let minus_a = curve.minus_a();

        // Bring p to the denominator of self: x1' = x1 z2², y1' = y1 z2³.
        //
        // lambda = r / (h z2) with
        //   r = is_doubling ? 3 x2² + a z2⁴ : y1' - y2
        //   h = is_doubling ?    y1' + y2   : x1' - x2
        //
        // z3 = h z2
        // x3 = r² - h² (x1' + x2)
        // y3 = (r (h² (x1' + x2) - 2 x3) - h³ (y1' + y2)) / 2
        let mut xz = self.z.mul_mod(&self.z, prime);
        let mut yz = self.z.mul_mod(&xz, prime);

        let mut az = if minus_a != 0 {
            xz.mul_mod(&xz, prime).mul_small(minus_a as u8, prime)
        } else {
            Bignum256::ZERO
        };

        xz = p.x.mul_mod(&xz, prime);
        let mut h = xz.sub_mod(&self.x, prime).fast_mod(prime);
        xz = xz.add_limbs(&self.x);

        // x1' + 2p - x2 is positive, so a multiple of the prime fast-reduces
        // to exactly the prime, never to zero
        let is_doubling = h.ct_eq(prime);

        yz = p.y.mul_mod(&yz, prime);
        let mut r = yz.sub_mod(&self.y, prime);
        yz = yz.add_limbs(&self.y);

        let mut r2 = self.x.mul_mod(&self.x, prime).mul_small(3, prime);
        if minus_a != 0 {
            r2 = r2.sub_mod(&az, prime);
        }

        r = Bignum256::conditional_select(&r, &r2, is_doubling);
        h = Bignum256::conditional_select(&h, &yz, is_doubling);

        // h² (x1' + x2) and h³ (y1' + y2)
        let mut hsqx = h.mul_mod(&h, prime);
        let mut hcby = hsqx.mul_mod(&h, prime);
        hsqx = hsqx.mul_mod(&xz, prime);
        hcby = hcby.mul_mod(&yz, prime);

        self.z = self.z.mul_mod(&h, prime);
        self.x = r.mul_mod(&r, prime).sub_mod(&hsqx, prime).fast_mod(prime);
        self.y = hsqx
            .sub_mod(&self.x, prime)
            .sub_mod(&self.x, prime)
            .mul_mod(&r, prime)
            .sub_mod(&hcby, prime)
            .half_mod(prime)
            .fast_mod(prime);

        for t in [&mut xz, &mut yz, &mut az, &mut h, &mut r, &mut r2, &mut hsqx, &mut hcby] {
            t.zeroize();
        }
    }

    /// Replace `self` with `2 · self`.
    pub fn double(&mut self, curve: &CurveParams) {
        let prime = &curve.prime;
        let minus_a = curve.minus_a();

        // m  = (3 x² + a z⁴) / 2
        // x3 = m² - 2 x y²
        // y3 = m (x y² - x3) - y⁴
        // z3 = y z
        let mut z4 = self.z.mul_mod(&self.z, prime);
        let mut az4 = z4.mul_mod(&z4, prime).mul_small(minus_a as u8, prime);
        let mut m = self
            .x
            .mul_mod(&self.x, prime)
            .mul_small(3, prime)
            .sub_mod(&az4, prime)
            .half_mod(prime);

        let mut msq = m.mul_mod(&m, prime);
        let mut ysq = self.y.mul_mod(&self.y, prime);
        let mut xysq = self.x.mul_mod(&ysq, prime);

        self.z = self.y.mul_mod(&self.z, prime);
        self.x = msq
            .sub_mod(&xysq.shl1().fast_mod(prime), prime)
            .fast_mod(prime);
        self.y = xysq
            .sub_mod(&self.x, prime)
            .mul_mod(&m, prime)
            .sub_mod(&ysq.mul_mod(&ysq, prime), prime)
            .fast_mod(prime);

        for t in [&mut z4, &mut az4, &mut m, &mut msq, &mut ysq, &mut xysq] {
            t.zeroize();
        }
    }
}

impl Zeroize for JacobianPoint {
    fn zeroize(&mut self) {
        self.x.zeroize();
        self.y.zeroize();
        self.z.zeroize();
    }
}

/// Samples a uniformly random value in `1..bound` by rejection.
///
/// `bound` must be normalized and at least `2^255`, so a draw succeeds with
/// probability above one half.
fn random_nonzero_below(bound: &Bignum256, rng: &mut (impl CryptoRng + RngCore)) -> Bignum256 {
    loop {
        let mut k = Bignum256::ZERO;
        for limb in &mut k.0[..8] {
            *limb = rng.next_u32() & LIMB_MASK;
        }
        k.0[8] = rng.next_u32() & 0xFFFF;

        if !bool::from(k.is_zero()) && bool::from(k.ct_lt(bound)) {
            return k;
        }
    }
}
