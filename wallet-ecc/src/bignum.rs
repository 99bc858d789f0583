//! 256-bit integers stored as nine 30-bit limbs.
//!
//! Limbs are little-endian: `0.0[0]` holds the lowest 30 bits and `0.0[8]`
//! the highest 16 bits of a normalized value. The spare bits in every `u32`
//! limb let the modular routines below postpone carry propagation and
//! reduction; the reduction tier each routine expects and produces is stated
//! in its documentation:
//!
//! - *normalized*: limbs `0..8` are below `2^30`, limb 8 below `2^17`;
//! - *partly reduced*: normalized and `< 2 * modulus`;
//! - *reduced*: normalized and `< modulus`.
//!
//! All modular routines require a modulus between `2^256 - 2^224` and
//! `2^256`, which holds for the prime and the order of every curve in the
//! supported family.

mod format;

pub use format::FormatOptions;

use core::fmt;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::{Zeroize, Zeroizing};

/// Mask selecting the 30 payload bits of a limb.
pub(crate) const LIMB_MASK: u32 = 0x3FFF_FFFF;

/// Number of bits in the payload of a limb.
const LIMB_BITS: u32 = 30;

/// Number of limbs.
const LIMBS: usize = 9;

/// Upper bound on the number of decimal digits of a 256-bit value.
const MAX_DIGITS: u32 = 78;

/// A 256-bit unsigned integer in 9 limbs of 30 bits (8 × 30 + 16).
#[derive(Clone, Copy, Default)]
pub struct Bignum256(pub(crate) [u32; LIMBS]);

impl Bignum256 {
    /// Zero.
    pub const ZERO: Self = Self([0; LIMBS]);

    /// One.
    pub const ONE: Self = Self([1, 0, 0, 0, 0, 0, 0, 0, 0]);

    /// Decode a 32-byte big-endian integer.
    pub const fn from_be_bytes(bytes: &[u8; 32]) -> Self {
        let mut limbs = [0u32; LIMBS];
        let mut temp = 0u32;
        let mut i = 0;

        while i < 8 {
            let offset = (7 - i) * 4;
            let word = u32::from_be_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ]);

            // `temp` holds the bits of the previous word that did not fit
            temp |= word << (2 * i);
            limbs[i] = temp & LIMB_MASK;
            temp = word >> (30 - 2 * i);
            i += 1;
        }

        limbs[8] = temp;
        Self(limbs)
    }

    /// Decode a 32-byte little-endian integer.
    pub fn from_le_bytes(bytes: &[u8; 32]) -> Self {
        let mut be = *bytes;
        be.reverse();
        Self::from_be_bytes(&be)
    }

    /// Encode as 32 big-endian bytes.
    ///
    /// The value is normalized first; it must be below `2^256`.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let n = self.normalize();
        let mut out = [0u8; 32];
        let mut temp = n.0[8];

        for i in 0..8 {
            let limb = n.0[7 - i];
            temp = (temp << (16 + 2 * i)) | (limb >> (14 - 2 * i));
            out[i * 4..i * 4 + 4].copy_from_slice(&temp.to_be_bytes());
            temp = limb;
        }

        out
    }

    /// Encode as 32 little-endian bytes.
    pub fn to_le_bytes(&self) -> [u8; 32] {
        let mut out = self.to_be_bytes();
        out.reverse();
        out
    }

    /// Create from a 32-bit machine integer.
    pub const fn from_u32(n: u32) -> Self {
        Self([n & LIMB_MASK, n >> LIMB_BITS, 0, 0, 0, 0, 0, 0, 0])
    }

    /// Create from a 64-bit machine integer.
    pub const fn from_u64(n: u64) -> Self {
        Self([
            (n as u32) & LIMB_MASK,
            ((n >> 30) as u32) & LIMB_MASK,
            (n >> 60) as u32,
            0,
            0,
            0,
            0,
            0,
            0,
        ])
    }

    /// Low 32 bits of a normalized value.
    pub const fn to_u32(&self) -> u32 {
        self.0[0] | (self.0[1] << LIMB_BITS)
    }

    /// Low 64 bits of a normalized value.
    pub const fn to_u64(&self) -> u64 {
        (self.0[0] as u64) | ((self.0[1] as u64) << 30) | ((self.0[2] as u64) << 60)
    }

    /// Propagate carries so that limbs `0..8` fit in 30 bits.
    ///
    /// This does not reduce the value modulo anything.
    pub const fn normalize(&self) -> Self {
        self.add_small(0)
    }

    /// Is this value zero? Requires a normalized value.
    pub fn is_zero(&self) -> Choice {
        let mut acc = 0u32;
        for limb in self.0 {
            acc |= limb;
        }
        acc.ct_eq(&0)
    }

    /// Is this value odd? Requires a normalized value.
    pub fn is_odd(&self) -> Choice {
        Choice::from((self.0[0] & 1) as u8)
    }

    /// Is this value even? Requires a normalized value.
    pub fn is_even(&self) -> Choice {
        !self.is_odd()
    }

    /// Is `self < other`? Both values must be normalized.
    ///
    /// Every limb is compared, so the running time does not depend on where
    /// the values first differ.
    pub fn ct_lt(&self, other: &Self) -> Choice {
        let mut lt = 0u32;
        let mut gt = 0u32;

        for i in (0..LIMBS).rev() {
            lt = (lt << 1) | (self.0[i] < other.0[i]) as u32;
            gt = (gt << 1) | (self.0[i] > other.0[i]) as u32;
        }

        // the most significant differing limb decides
        Choice::from((lt > gt) as u8)
    }

    /// Returns bit `index` of a normalized value.
    pub fn bit(&self, index: u32) -> Choice {
        assert!(index < 256, "bit index out of range");
        let limb = self.0[(index / LIMB_BITS) as usize];
        Choice::from(((limb >> (index % LIMB_BITS)) & 1) as u8)
    }

    /// Sets bit `index` of a normalized value.
    pub fn set_bit(&mut self, index: u32) {
        assert!(index < 256, "bit index out of range");
        self.0[(index / LIMB_BITS) as usize] |= 1 << (index % LIMB_BITS);
    }

    /// Clears bit `index` of a normalized value.
    pub fn clear_bit(&mut self, index: u32) {
        assert!(index < 256, "bit index out of range");
        self.0[(index / LIMB_BITS) as usize] &= !(1 << (index % LIMB_BITS));
    }

    /// Shift a normalized value left by one bit.
    ///
    /// The top limb may grow to 17 bits; no bits are discarded for values
    /// below `2^256`.
    pub fn shl1(&self) -> Self {
        let mut res = *self;
        for i in (1..LIMBS).rev() {
            res.0[i] = ((self.0[i] << 1) & LIMB_MASK) | ((self.0[i - 1] & 0x2000_0000) >> 29);
        }
        res.0[0] = (self.0[0] << 1) & LIMB_MASK;
        res
    }

    /// Shift a normalized value right by one bit.
    pub fn shr1(&self) -> Self {
        let mut res = *self;
        for i in 0..(LIMBS - 1) {
            res.0[i] = (self.0[i] >> 1) | ((self.0[i + 1] & 1) << 29);
        }
        res.0[8] = self.0[8] >> 1;
        res
    }

    /// Number of significant bits of a normalized value.
    pub fn bit_count(&self) -> u32 {
        for i in (0..LIMBS).rev() {
            let limb = self.0[i];
            if limb != 0 {
                return i as u32 * LIMB_BITS + (32 - limb.leading_zeros());
            }
        }
        0
    }

    /// Number of decimal digits of a normalized value (1 for zero).
    pub fn digit_count(&self) -> u32 {
        let mut val = *self;
        let mut digits = 1;

        for i in (0..MAX_DIGITS).step_by(3) {
            let limb = val.div_rem_1000();
            if limb >= 100 {
                digits = i + 3;
            } else if limb >= 10 {
                digits = i + 2;
            } else if limb >= 1 {
                digits = i + 1;
            }
        }

        digits
    }

    /// Divide a normalized value by 1000 in place, returning the remainder.
    pub(crate) fn div_rem_1000(&mut self) -> u32 {
        let mut rem = self.0[8] % 1000;
        self.0[8] /= 1000;

        for i in (0..8).rev() {
            // 2^30 == 1073741 * 1000 + 824
            let tmp = rem * 824 + self.0[i];
            self.0[i] = rem * 1_073_741 + tmp / 1000;
            rem = tmp % 1000;
        }

        rem
    }

    /// Plain addition with carry propagation, no modular reduction.
    ///
    /// The result is normalized as long as it stays below `2^270`.
    pub const fn add_limbs(&self, rhs: &Self) -> Self {
        let mut res = [0u32; LIMBS];
        let mut carry = 0u32;
        let mut i = 0;

        while i < 8 {
            carry += self.0[i] + rhs.0[i];
            res[i] = carry & LIMB_MASK;
            carry >>= LIMB_BITS;
            i += 1;
        }

        res[8] = self.0[8] + rhs.0[8] + carry;
        Self(res)
    }

    /// Add a small integer, propagating carries.
    pub const fn add_small(&self, n: u32) -> Self {
        let mut res = [0u32; LIMBS];
        let mut carry = n;
        let mut i = 0;

        while i < 8 {
            carry += self.0[i];
            res[i] = carry & LIMB_MASK;
            carry >>= LIMB_BITS;
            i += 1;
        }

        res[8] = self.0[8] + carry;
        Self(res)
    }

    /// Computes `self + modulus - n`, i.e. subtracts a small integer without
    /// underflowing. Requires `n <= modulus.0[0]`; the result is normalized
    /// but not reduced.
    pub fn sub_small(&self, n: u32, modulus: &Self) -> Self {
        assert!(n <= modulus.0[0]);
        let mut biased = *modulus;
        biased.0[0] -= n;
        self.add_limbs(&biased)
    }

    /// Computes `self - rhs` for normalized `self >= rhs`.
    ///
    /// If `self < rhs` the result wraps modulo `2^270` and is meaningless;
    /// callers use that in constant-time selections only.
    pub fn sub_limbs(&self, rhs: &Self) -> Self {
        let mut res = [0u32; LIMBS];
        let mut tmp = 1u32;

        for i in 0..LIMBS {
            tmp = tmp
                .wrapping_add(LIMB_MASK)
                .wrapping_add(self.0[i])
                .wrapping_sub(rhs.0[i]);
            res[i] = tmp & LIMB_MASK;
            tmp >>= LIMB_BITS;
        }

        Self(res)
    }

    /// Computes `self - rhs (mod modulus)` as `self + 2 * modulus - rhs`.
    ///
    /// `rhs` must be partly reduced. The result is normalized but not
    /// reduced.
    pub fn sub_mod(&self, rhs: &Self, modulus: &Self) -> Self {
        let mut res = [0u32; LIMBS];
        let mut tmp = 1u32;

        for i in 0..LIMBS {
            tmp = tmp
                .wrapping_add(LIMB_MASK)
                .wrapping_add(self.0[i])
                .wrapping_add(2 * modulus.0[i])
                .wrapping_sub(rhs.0[i]);
            res[i] = tmp & LIMB_MASK;
            tmp >>= LIMB_BITS;
        }

        Self(res)
    }

    /// Computes `self + rhs (mod modulus)`; the result is partly reduced.
    pub fn add_mod(&self, rhs: &Self, modulus: &Self) -> Self {
        let mut res = *self;
        for i in 0..LIMBS {
            res.0[i] += rhs.0[i];
        }
        res.fast_mod(modulus)
    }

    /// Computes `self * k (mod modulus)` for a small `k`.
    ///
    /// `self` must be normalized; the result is partly reduced.
    pub fn mul_small(&self, k: u8, modulus: &Self) -> Self {
        let k = k as u64;
        let mut res = [0u32; LIMBS];
        let mut carry = 0u64;

        for i in 0..8 {
            carry += self.0[i] as u64 * k;
            res[i] = (carry as u32) & LIMB_MASK;
            carry >>= LIMB_BITS;
        }

        res[8] = (self.0[8] as u64 * k + carry) as u32;
        Self(res).fast_mod(modulus)
    }

    /// Computes `self / 2 (mod modulus)`.
    ///
    /// Odd values are made even by adding the (odd) modulus first. `self`
    /// must be normalized; the result is normalized and partly reduced when
    /// `self` was.
    pub fn half_mod(&self, modulus: &Self) -> Self {
        let odd = 0u32.wrapping_sub(self.0[0] & 1);
        let mut res = [0u32; LIMBS];
        let mut tmp1 = (self.0[0] + (modulus.0[0] & odd)) >> 1;

        for j in 0..8 {
            let tmp2 = self.0[j + 1] + (modulus.0[j + 1] & odd);
            tmp1 += (tmp2 & 1) << 29;
            res[j] = tmp1 & LIMB_MASK;
            tmp1 >>= LIMB_BITS;
            tmp1 += tmp2 >> 1;
        }

        res[8] = tmp1;
        Self(res)
    }

    /// Full reduction: returns `self - modulus` if `self >= modulus`.
    ///
    /// `self` must be partly reduced; the result is reduced. Both candidates
    /// are computed and selected without branching.
    pub fn reduce(&self, modulus: &Self) -> Self {
        let lt = self.ct_lt(modulus);
        let diff = self.sub_limbs(modulus);
        Self::conditional_select(&diff, self, lt)
    }

    /// Cheap partial reduction: subtracts `floor(self / 2^256) * modulus`.
    ///
    /// Accepts limbs of up to 32 bits as long as the top limb fits in 30
    /// bits. The result is partly reduced (`< 2 * modulus`) and must go
    /// through [`Self::reduce`] before comparisons or encoding.
    pub fn fast_mod(&self, modulus: &Self) -> Self {
        let coef = (self.0[8] >> 16) as u64;
        let mut res = [0u32; LIMBS];

        // bias by 2^61 to keep the running value positive
        let mut temp = 0x2000_0000_0000_0000u64 + self.0[0] as u64 - modulus.0[0] as u64 * coef;
        res[0] = (temp as u32) & LIMB_MASK;

        for j in 1..LIMBS {
            temp >>= 30;
            temp += 0x1FFF_FFFF_8000_0000u64 + self.0[j] as u64 - modulus.0[j] as u64 * coef;
            res[j] = (temp as u32) & LIMB_MASK;
        }

        Self(res)
    }

    /// Computes `self * rhs (mod modulus)`.
    ///
    /// Both operands must be below `180 * modulus` with limbs fitting in 30
    /// bits (partly reduced values and sums of two of them qualify). The
    /// result is partly reduced.
    pub fn mul_mod(&self, rhs: &Self, modulus: &Self) -> Self {
        let mut res = Zeroizing::new([0u32; 2 * LIMBS]);
        let mut temp = 0u64;

        // lower half of the schoolbook product
        for i in 0..LIMBS {
            for j in 0..=i {
                // 9 * 2^60 < 2^64, no overflow
                temp += self.0[j] as u64 * rhs.0[i - j] as u64;
            }
            res[i] = (temp as u32) & LIMB_MASK;
            temp >>= 30;
        }

        // upper half
        for i in LIMBS..(2 * LIMBS - 1) {
            for j in (i - 8)..LIMBS {
                temp += self.0[j] as u64 * rhs.0[i - j] as u64;
            }
            res[i] = (temp as u32) & LIMB_MASK;
            temp >>= 30;
        }
        res[17] = temp as u32;

        // the quotient is only estimated, so the result may exceed the
        // modulus but stays below twice the modulus
        for i in (8..=16).rev() {
            reduce_step(&mut res, modulus, i);
        }

        let mut out = [0u32; LIMBS];
        out.copy_from_slice(&res[..LIMBS]);
        Self(out)
    }

    /// Computes `self^exp (mod modulus)` for a public exponent.
    ///
    /// Branches only on the bits of `exp`, never on `self`. The result is
    /// reduced.
    fn pow_mod(&self, exp: &Self, modulus: &Self) -> Self {
        let mut acc = Zeroizing::new(Self::ONE);
        let mut base = Zeroizing::new(*self);

        for i in 0..LIMBS {
            let mut limb = exp.0[i];
            for _ in 0..LIMB_BITS {
                if i == 8 && limb == 0 {
                    break;
                }
                if limb & 1 == 1 {
                    *acc = base.mul_mod(&acc, modulus);
                }
                limb >>= 1;
                *base = base.mul_mod(&base, modulus);
            }
        }

        acc.reduce(modulus)
    }

    /// Computes `self^-1 (mod modulus)` as `self^(modulus - 2)`.
    ///
    /// The modulus must be prime. Runs in time independent of `self`; zero
    /// maps to zero. `self` must be partly reduced; the result is reduced.
    pub fn invert_mod(&self, modulus: &Self) -> Self {
        let mut exp = *modulus;
        // the modulus is odd and its low limb is far above 2
        exp.0[0] -= 2;
        self.pow_mod(&exp, modulus)
    }

    /// Computes a square root modulo a prime `modulus ≡ 3 (mod 4)` as
    /// `self^((modulus + 1) / 4)`.
    ///
    /// No validation is performed: if `self` is not a quadratic residue the
    /// result is meaningless, so callers must square it back and compare.
    /// The result is reduced.
    pub fn sqrt_mod(&self, modulus: &Self) -> Self {
        let exp = modulus.add_small(1).shr1().shr1();
        self.pow_mod(&exp, modulus)
    }

    /// Replaces `self` by `2 * modulus - self` if `choice` is set, leaves it
    /// bit-identical otherwise. The running time does not depend on
    /// `choice`.
    ///
    /// The top limb must be below `2^17` before and after.
    pub fn conditional_negate(&mut self, choice: Choice, modulus: &Self) {
        debug_assert!(self.0[8] < 0x20000);
        let mask = 0u32.wrapping_sub(choice.unwrap_u8() as u32);
        let mut tmp = 1u32;

        for j in 0..LIMBS {
            tmp = tmp
                .wrapping_add(LIMB_MASK)
                .wrapping_add(2 * modulus.0[j])
                .wrapping_sub(self.0[j]);
            self.0[j] = (tmp & LIMB_MASK & mask) | (self.0[j] & !mask);
            tmp >>= LIMB_BITS;
        }

        debug_assert!(self.0[8] < 0x20000);
    }
}

/// One step of the schoolbook reduction in [`Bignum256::mul_mod`].
///
/// With `k = i - 8`, on entry `0 <= res < 2^(30k + 31) * modulus`. The
/// quotient `res / (modulus * 2^30k)` is estimated as
/// `res / 2^(30k + 256)`, which is below `2^31`, and that multiple of the
/// modulus is subtracted. Because `modulus > 2^256 - 2^224` the remainder is
/// below `2^30k * 2 * modulus`.
fn reduce_step(res: &mut [u32; 2 * LIMBS], modulus: &Bignum256, i: usize) {
    debug_assert!((8..=16).contains(&i));

    let coef = (res[i] >> 16).wrapping_add(res[i + 1] << 14);
    debug_assert!(coef < 0x8000_0000);
    let coef = coef as u64;

    let mut temp = 0x2000_0000_0000_0000u64 + res[i - 8] as u64 - modulus.0[0] as u64 * coef;
    res[i - 8] = (temp as u32) & LIMB_MASK;

    for j in 1..LIMBS {
        temp >>= 30;
        // coef * limb <= (2^31 - 1) * (2^30 - 1), this cannot underflow
        temp += 0x1FFF_FFFF_8000_0000u64 + res[i - 8 + j] as u64 - modulus.0[j] as u64 * coef;
        res[i - 8 + j] = (temp as u32) & LIMB_MASK;
    }

    temp >>= 30;
    temp += 0x1FFF_FFFF_8000_0000u64 + res[i + 1] as u64;
    res[i + 1] = (temp as u32) & LIMB_MASK;
}

impl ConditionallySelectable for Bignum256 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let tmask = 0u32.wrapping_sub(choice.unwrap_u8() as u32);
        let fmask = !tmask;
        let mut res = [0u32; LIMBS];

        for i in 0..LIMBS {
            res[i] = (b.0[i] & tmask) | (a.0[i] & fmask);
        }

        Self(res)
    }
}

impl ConstantTimeEq for Bignum256 {
    fn ct_eq(&self, other: &Self) -> Choice {
        let mut acc = 0u32;
        for i in 0..LIMBS {
            acc |= self.0[i] ^ other.0[i];
        }
        acc.ct_eq(&0)
    }
}

impl PartialEq for Bignum256 {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Bignum256 {}

impl From<u32> for Bignum256 {
    fn from(n: u32) -> Self {
        Self::from_u32(n)
    }
}

impl From<u64> for Bignum256 {
    fn from(n: u64) -> Self {
        Self::from_u64(n)
    }
}

impl Zeroize for Bignum256 {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for Bignum256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bignum256(0x")?;
        for byte in self.to_be_bytes() {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Bignum256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0u8; MAX_DIGITS as usize];
        let len = self
            .format(&FormatOptions::default(), &mut buf)
            .map_err(|_| fmt::Error)?;
        let s = core::str::from_utf8(&buf[..len]).map_err(|_| fmt::Error)?;
        f.pad_integral(true, "", s)
    }
}
