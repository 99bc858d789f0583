//! Constant-time scalar multiplication.
//!
//! Both ladders recode the scalar into 65 signed odd radix-16 digits and add
//! one table entry per digit, following Okeya and Takagi, "The Width-w NAF
//! Method Provides Small Memory and Fast Elliptic Scalar Multiplications
//! Secure against Side Channel Attacks":
//!
//! `a = k + 2^256 (mod n)` is made odd by subtracting the order when `k` is
//! even. Every odd `a` can be written as `sum_{i=0..64} a_i 16^i` with `a_i`
//! odd and `|a_i| < 16`: whenever a radix-16 digit is even, add one to it and
//! subtract 16 from the digit below. The top digit `a_64` is always 1, the
//! `2^256` that was added, so `k · P = sum_{i=0..63} a_i 16^i · P`.
//!
//! Digit `a_i` has absolute value `((w ^ (((w >> 4) & 1) - 1)) & 15)` and is
//! negative iff bit 4 of `w` is clear, where `w` is the 5-bit window of `a`
//! starting at bit `4i`. Every digit costs the same sequence of operations,
//! table entries are read with a full scan, and signs are applied by
//! conditional negation, so the running time and memory accesses do not
//! depend on the scalar.

use super::{AffinePoint, CurveParams, JacobianPoint};
use crate::{Bignum256, bignum::LIMB_MASK};
use rand_core::{CryptoRng, RngCore};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroizing;

#[cfg(feature = "precomputed-tables")]
use super::lookup_table::Table;

/// Number of precomputed odd multiples: `P, 3P, ..., 15P`.
const ODD_MULTIPLES: usize = 8;

/// Returns `k + 2^256 - (k even ? order : 0)`, which is odd.
fn recode(k: &Bignum256, order: &Bignum256) -> Bignum256 {
    // all ones if k is even
    let is_even = (k.0[0] & 1).wrapping_sub(1);
    let mut a = Bignum256::ZERO;
    let mut tmp = 1u32;

    for j in 0..8 {
        tmp = tmp
            .wrapping_add(LIMB_MASK)
            .wrapping_add(k.0[j])
            .wrapping_sub(order.0[j] & is_even);
        a.0[j] = tmp & LIMB_MASK;
        tmp >>= 30;
    }

    a.0[8] = tmp
        .wrapping_add(0xFFFF)
        .wrapping_add(k.0[8])
        .wrapping_sub(order.0[8] & is_even);

    debug_assert_eq!(a.0[0] & 1, 1);
    a
}

/// Returns the absolute value of a 5-bit window as a table index, and all
/// ones if the digit is negative.
#[inline]
fn window_digit(window: u32) -> (u32, u32) {
    let window = window & 31;
    let sign = (window >> 4).wrapping_sub(1);
    (((window ^ sign) & 15) >> 1, sign)
}

/// Returns `points[index]` after touching every entry.
fn select(points: &[AffinePoint; ODD_MULTIPLES], index: u32) -> AffinePoint {
    let mut t = AffinePoint::INFINITY;
    for (j, point) in (0u32..).zip(points.iter()) {
        t.conditional_assign(point, index.ct_eq(&j));
    }
    t
}

/// Turns an all-ones / all-zeros mask into a [`Choice`].
#[inline]
fn mask_choice(mask: u32) -> Choice {
    Choice::from((mask & 1) as u8)
}

impl CurveParams {
    /// Returns `k · p`.
    ///
    /// `k` must be reduced modulo the group order and `p` must be on the
    /// curve. `k = 0` and `p = ∞` return the point at infinity; in every
    /// other case the running time does not depend on `k`. `rng` supplies
    /// the blinding of the Jacobian accumulator.
    ///
    /// # Panics
    ///
    /// If `k` is not below the group order.
    pub fn point_multiply(
        &self,
        k: &Bignum256,
        p: &AffinePoint,
        rng: &mut (impl CryptoRng + RngCore),
    ) -> AffinePoint {
        assert!(
            bool::from(k.ct_lt(&self.order)),
            "scalar must be below the group order"
        );

        if bool::from(k.is_zero()) || p.is_infinity() {
            return AffinePoint::INFINITY;
        }

        let prime = &self.prime;
        let a = Zeroizing::new(recode(k, &self.order));

        // pmult[i] = (2i + 1) · p
        let mut pmult = [*p; ODD_MULTIPLES];
        let double = self.point_double(p);
        for i in 1..ODD_MULTIPLES {
            pmult[i] = self.point_add(&pmult[i - 1], &double);
        }

        // Digits are consumed from the top. `abits` is the current limb and
        // `ashift` the position of the window inside it; digit 63 starts at
        // bit 252, i.e. bit 12 of limb 8.
        let mut limb = 8;
        let mut abits = a.0[limb];
        let mut ashift: i32 = 12;

        let (index, mut sign) = window_digit(abits >> ashift);
        let mut jres = Zeroizing::new(JacobianPoint::from_affine(&select(&pmult, index), self, rng));

        // invariant: jres = (-1)^sign · sum_{j=i+1..63} a_j 16^(j-i-1) · p
        for _ in 0..63 {
            for _ in 0..4 {
                jres.double(self);
            }

            // the branch depends on the iteration count only
            ashift -= 4;
            let window = if ashift < 0 {
                let high = abits << (-ashift) as u32;
                limb -= 1;
                abits = a.0[limb];
                ashift += 30;
                high | (abits >> ashift)
            } else {
                abits >> ashift
            };

            let (index, nsign) = window_digit(window);

            // align the sign of the accumulator with the sign of this digit
            jres.z.conditional_negate(mask_choice(sign ^ nsign), prime);
            jres.add_affine(&select(&pmult, index), self);
            sign = nsign;
        }

        jres.z.conditional_negate(mask_choice(sign), prime);
        jres.to_affine(self)
    }

    /// Returns `k · G` for the curve's generator `G`.
    ///
    /// With a base-point table the ladder needs no doublings; without one
    /// this is [`CurveParams::point_multiply`] on the generator. Same
    /// requirements and guarantees as `point_multiply`.
    ///
    /// # Panics
    ///
    /// If `k` is not below the group order.
    pub fn scalar_multiply(
        &self,
        k: &Bignum256,
        rng: &mut (impl CryptoRng + RngCore),
    ) -> AffinePoint {
        #[cfg(feature = "precomputed-tables")]
        if let Some(table) = self.basepoint_table {
            return self.multiply_with_table(k, table, rng);
        }

        self.point_multiply(k, &self.g, rng)
    }

    /// Base-point ladder over a table with `table[i][j] = (2j + 1) · 16^i · G`.
    #[cfg(feature = "precomputed-tables")]
    fn multiply_with_table(
        &self,
        k: &Bignum256,
        table: &Table,
        rng: &mut (impl CryptoRng + RngCore),
    ) -> AffinePoint {
        assert!(
            bool::from(k.ct_lt(&self.order)),
            "scalar must be below the group order"
        );

        if bool::from(k.is_zero()) {
            return AffinePoint::INFINITY;
        }

        let prime = &self.prime;
        let mut a = Zeroizing::new(recode(k, &self.order));

        let (index, mut sign) = window_digit(a.0[0]);
        let mut jres = Zeroizing::new(JacobianPoint::from_affine(&select(&table[0], index), self, rng));

        // invariant: jres = (-1)^sign · sum_{j=0..i-1} a_j 16^j · G
        for row in &table[1..] {
            for j in 0..8 {
                a.0[j] = (a.0[j] >> 4) | ((a.0[j + 1] & 0xF) << 26);
            }
            a.0[8] >>= 4;

            let (index, nsign) = window_digit(a.0[0]);
            jres.y.conditional_negate(mask_choice(sign ^ nsign), prime);
            jres.add_affine(&select(row, index), self);
            sign = nsign;
        }

        jres.y.conditional_negate(mask_choice(sign), prime);
        jres.to_affine(self)
    }
}
