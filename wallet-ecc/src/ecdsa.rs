//! ECDSA public-key recovery and public-key validation.
//!
//! ## Recovery
//!
//! A signature `(r, s)` over digest `e` by key `Q = d · G` satisfies
//! `s = k⁻¹ (e + r d)` where `R = k · G` has x-coordinate `r (mod n)`. Given
//! which of the (up to four) candidates `R` was, encoded in a [`RecoveryId`],
//! the key is
//!
//! ```text
//! Q = r⁻¹ (s · R - e · G)
//! ```

mod der;

pub use self::der::der_to_sig;

use crate::{AffinePoint, Bignum256, CurveParams, Error, Result};
use core::fmt::{self, Debug};
use rand_core::{CryptoRng, RngCore};
use subtle::Choice;

/// Size of a SEC1 uncompressed point: `0x04 || x || y`.
pub const UNCOMPRESSED_POINT_SIZE: usize = 65;

/// SEC1 tag of an uncompressed point.
const UNCOMPRESSED_TAG: u8 = 0x04;

/// Identifier of the point `R` a signature was computed from.
///
/// - bit 0: is the y-coordinate of `R` odd?
/// - bit 1: did the x-coordinate of `R` exceed the group order, i.e. is it
///   `r + n` rather than `r`?
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct RecoveryId(u8);

impl RecoveryId {
    /// Maximum supported value for the recovery ID (inclusive).
    pub const MAX: u8 = 3;

    /// Create a new [`RecoveryId`] from its two flags.
    pub const fn new(is_y_odd: bool, is_x_reduced: bool) -> Self {
        Self(((is_x_reduced as u8) << 1) | (is_y_odd as u8))
    }

    /// Convert a `u8` into a [`RecoveryId`].
    pub const fn from_byte(byte: u8) -> Option<Self> {
        if byte <= Self::MAX {
            Some(Self(byte))
        } else {
            None
        }
    }

    /// Convert this [`RecoveryId`] into a `u8`.
    pub const fn to_byte(self) -> u8 {
        self.0
    }

    /// Is the y-coordinate of `R` odd?
    pub const fn is_y_odd(self) -> bool {
        (self.0 & 1) != 0
    }

    /// Was the x-coordinate of `R` reduced modulo the group order?
    pub const fn is_x_reduced(self) -> bool {
        (self.0 & 2) != 0
    }
}

impl TryFrom<u8> for RecoveryId {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self> {
        Self::from_byte(byte).ok_or(Error::InvalidRecoveryId)
    }
}

impl From<RecoveryId> for u8 {
    fn from(id: RecoveryId) -> u8 {
        id.0
    }
}

/// ECDSA signature in its raw form: big-endian `r` followed by big-endian
/// `s`.
///
/// Parsing rejects zero components but does not range-check them against a
/// curve's order; that happens during recovery.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Signature {
    bytes: [u8; 64],
}

impl Signature {
    /// Parse a raw 64-byte signature.
    ///
    /// Fails with [`Error::SignatureOutOfRange`] if `r` or `s` is zero.
    pub fn from_bytes(bytes: &[u8; 64]) -> Result<Self> {
        let (r, s) = bytes.split_at(32);
        if r.iter().all(|&b| b == 0) || s.iter().all(|&b| b == 0) {
            return Err(Error::SignatureOutOfRange);
        }

        Ok(Self { bytes: *bytes })
    }

    /// Parse an ASN.1 DER encoded signature.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let mut bytes = [0u8; 64];
        der_to_sig(der, &mut bytes)?;
        Self::from_bytes(&bytes)
    }

    /// Serialize as raw `r || s`.
    pub fn to_bytes(&self) -> [u8; 64] {
        self.bytes
    }

    /// The `r` component, big endian.
    pub fn r(&self) -> [u8; 32] {
        let mut r = [0u8; 32];
        r.copy_from_slice(&self.bytes[..32]);
        r
    }

    /// The `s` component, big endian.
    pub fn s(&self) -> [u8; 32] {
        let mut s = [0u8; 32];
        s.copy_from_slice(&self.bytes[32..]);
        s
    }

    /// Recover the SEC1 uncompressed public key that produced this
    /// signature over `digest`. See [`CurveParams::recover_pub_from_sig`].
    pub fn recover_public_key(
        &self,
        curve: &CurveParams,
        digest: &[u8; 32],
        recovery_id: RecoveryId,
        rng: &mut (impl CryptoRng + RngCore),
    ) -> Result<[u8; UNCOMPRESSED_POINT_SIZE]> {
        curve.recover_pub_from_sig(&self.bytes, digest, recovery_id, rng)
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ecdsa::Signature(")?;
        for byte in &self.bytes {
            write!(f, "{byte:02X}")?;
        }
        write!(f, ")")
    }
}

/// Encode a point in the SEC1 uncompressed form `0x04 || x || y`.
///
/// The point at infinity encodes as a tag followed by zeros; it is never
/// accepted back by [`decode_uncompressed`].
pub fn encode_uncompressed(point: &AffinePoint) -> [u8; UNCOMPRESSED_POINT_SIZE] {
    let mut out = [0u8; UNCOMPRESSED_POINT_SIZE];
    out[0] = UNCOMPRESSED_TAG;
    out[1..33].copy_from_slice(&point.x.to_be_bytes());
    out[33..].copy_from_slice(&point.y.to_be_bytes());
    out
}

/// Decode and validate a SEC1 uncompressed point.
pub fn decode_uncompressed(
    curve: &CurveParams,
    bytes: &[u8; UNCOMPRESSED_POINT_SIZE],
) -> Result<AffinePoint> {
    if bytes[0] != UNCOMPRESSED_TAG {
        return Err(Error::MalformedPoint);
    }

    let mut x = [0u8; 32];
    let mut y = [0u8; 32];
    x.copy_from_slice(&bytes[1..33]);
    y.copy_from_slice(&bytes[33..]);

    let point = AffinePoint::new(Bignum256::from_be_bytes(&x), Bignum256::from_be_bytes(&y));
    if !curve.validate_pubkey(&point) {
        return Err(Error::PointNotOnCurve);
    }

    Ok(point)
}

impl CurveParams {
    /// Checks that `p` is a valid public key: not the point at infinity,
    /// coordinates reduced, and on the curve.
    pub fn validate_pubkey(&self, p: &AffinePoint) -> bool {
        let prime = &self.prime;

        if p.is_infinity() {
            return false;
        }

        if !bool::from(p.x.ct_lt(prime) & p.y.ct_lt(prime)) {
            return false;
        }

        let y2 = p.y.mul_mod(&p.y, prime).reduce(prime);

        // x^3 + ax + b = (x^2 + a) x + b
        let rhs = p
            .x
            .mul_mod(&p.x, prime)
            .sub_small(self.minus_a(), prime)
            .mul_mod(&p.x, prime)
            .add_mod(&self.b, prime)
            .reduce(prime);

        y2 == rhs
    }

    /// Returns the y-coordinate with parity `y_is_odd` of the point with
    /// x-coordinate `x`, reduced.
    ///
    /// Nothing is checked: if `x` is not the x-coordinate of a curve point
    /// the result is meaningless, and [`CurveParams::validate_pubkey`] on the
    /// resulting point fails. The parity fix-up does not branch on `y`.
    pub fn uncompress_coords(&self, y_is_odd: Choice, x: &Bignum256) -> Bignum256 {
        let prime = &self.prime;

        // y^2 = (x^2 + a) x + b
        let mut y = x
            .mul_mod(x, prime)
            .sub_small(self.minus_a(), prime)
            .mul_mod(x, prime)
            .add_limbs(&self.b)
            .sqrt_mod(prime);

        y.conditional_negate(y_is_odd ^ y.is_odd(), prime);
        y.fast_mod(prime).reduce(prime)
    }

    /// Recover the public key that produced `sig` (raw `r || s`) over
    /// `digest`, as a SEC1 uncompressed point.
    ///
    /// `rng` blinds the scalar multiplications. Fails without producing
    /// output if either component of the signature is zero or not below the
    /// group order, if the recovery id selects an x-coordinate past the
    /// field prime, if no curve point has that x-coordinate, or if the
    /// recovered key is the point at infinity.
    pub fn recover_pub_from_sig(
        &self,
        sig: &[u8; 64],
        digest: &[u8; 32],
        recovery_id: RecoveryId,
        rng: &mut (impl CryptoRng + RngCore),
    ) -> Result<[u8; UNCOMPRESSED_POINT_SIZE]> {
        let order = &self.order;
        let (r_bytes, s_bytes) = sig.split_at(32);
        let r = read_scalar(r_bytes, order)?;
        let s = read_scalar(s_bytes, order)?;

        // R = k · G
        let mut x = r;
        if recovery_id.is_x_reduced() {
            x = x.add_limbs(order);
            if !bool::from(x.ct_lt(&self.prime)) {
                return Err(Error::RecoveredXOutOfRange);
            }
        }

        let y = self.uncompress_coords(Choice::from(recovery_id.is_y_odd() as u8), &x);
        let big_r = AffinePoint::new(x, y);
        if !self.validate_pubkey(&big_r) {
            return Err(Error::PointNotOnCurve);
        }

        // e = -digest (mod n)
        let e = order
            .sub_mod(&Bignum256::from_be_bytes(digest), order)
            .fast_mod(order)
            .reduce(order);
        let r_inv = r.invert_mod(order);

        // s · R - e · G = s k G - e G = r d G
        let sr = self.point_multiply(&s, &big_r, rng);
        let eg = self.scalar_multiply(&e, rng);
        let rq = self.point_add(&eg, &sr);
        if rq.is_infinity() {
            return Err(Error::PointAtInfinity);
        }

        let q = self.point_multiply(&r_inv, &rq, rng);
        Ok(encode_uncompressed(&q))
    }
}

/// Reads a big-endian signature component, requiring `0 < v < order`.
fn read_scalar(bytes: &[u8], order: &Bignum256) -> Result<Bignum256> {
    let mut buf = [0u8; 32];
    buf.copy_from_slice(bytes);
    let v = Bignum256::from_be_bytes(&buf);

    if bool::from(v.is_zero()) || !bool::from(v.ct_lt(order)) {
        return Err(Error::SignatureOutOfRange);
    }

    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::{RecoveryId, Signature, decode_uncompressed, encode_uncompressed};
    use crate::{
        AffinePoint, Bignum256, Error,
        secp256k1::{GENERATOR, ORDER, PRIME, SECP256K1},
    };
    use hex_literal::hex;
    use rand_core::OsRng;
    use subtle::Choice;

    const DIGEST: [u8; 32] = hex!("AF2BDBE1AA9B6EC1E2ADE1D694F41FC71A831D0268E9891562113D8A62ADD1BF");

    /// Key of the secret `C9AFA9D8...120F6721`.
    const PUBLIC_KEY: [u8; 65] = hex!(
        "04"
        "2C8C31FC9F990C6B55E3865A184A4CE50E09481F2EAEB3E60EC1CEA13A6AE645"
        "64B95E4FDB6948C0386E189B006A29F686769B011704275E4459822DC3328085"
    );

    /// Signature of `DIGEST` by that key with nonce `0x123456789ABCDEF0`.
    const SIGNATURE: [u8; 64] = hex!(
        "63868EC5EA2839E7C230950B53040DCD0F6D7CB17E6ACEBE4609F6BFA2F7CD99"
        "4D1AD642E3F83759566372439B7733816EABC00EB90F1CB76E9E088D3A13DDA9"
    );

    /// Same key and digest, nonce 77.
    const SIGNATURE_77: [u8; 64] = hex!(
        "59DBF46F8C94759BA21277C33784F41645F7B44F6C596A58CE92E666191ABE3E"
        "17FCBE26B2F7F2371EB4EBA3BE5CD9BE3265A32897D0D8CC3E0869E98775EBE1"
    );

    #[test]
    fn recovery_id_flags() {
        for byte in 0..=3 {
            let id = RecoveryId::from_byte(byte).unwrap();
            assert_eq!(id.to_byte(), byte);
            assert_eq!(RecoveryId::new(id.is_y_odd(), id.is_x_reduced()), id);
        }
        assert!(RecoveryId::new(true, false).is_y_odd());
        assert!(RecoveryId::new(false, true).is_x_reduced());
        assert_eq!(RecoveryId::from_byte(4), None);
        assert_eq!(RecoveryId::try_from(4u8), Err(Error::InvalidRecoveryId));
    }

    #[test]
    fn generator_is_valid() {
        assert!(SECP256K1.validate_pubkey(&GENERATOR));
    }

    #[test]
    fn invalid_pubkeys() {
        assert!(!SECP256K1.validate_pubkey(&AffinePoint::INFINITY));

        let mut off_curve = GENERATOR;
        off_curve.y = off_curve.y.add_small(1);
        assert!(!SECP256K1.validate_pubkey(&off_curve));

        // x + p is the same residue but not a reduced coordinate
        let unreduced = AffinePoint::new(GENERATOR.x.add_limbs(&PRIME), GENERATOR.y);
        assert!(!SECP256K1.validate_pubkey(&unreduced));
    }

    #[test]
    fn uncompress_both_parities() {
        let even = SECP256K1.uncompress_coords(Choice::from(0), &GENERATOR.x);
        let odd = SECP256K1.uncompress_coords(Choice::from(1), &GENERATOR.x);

        // Gy is even
        assert_eq!(even, GENERATOR.y);
        assert_eq!(odd, PRIME.sub_limbs(&GENERATOR.y));
        assert!(bool::from(odd.is_odd()));
    }

    #[test]
    fn known_answer_recovery() {
        let id = RecoveryId::new(false, false);
        let recovered = SECP256K1
            .recover_pub_from_sig(&SIGNATURE, &DIGEST, id, &mut OsRng)
            .unwrap();
        assert_eq!(recovered, PUBLIC_KEY);

        // the other y parity recovers a different, valid key
        let flipped = RecoveryId::new(true, false);
        let other = SECP256K1
            .recover_pub_from_sig(&SIGNATURE, &DIGEST, flipped, &mut OsRng)
            .unwrap();
        assert_ne!(other, PUBLIC_KEY);
        assert!(decode_uncompressed(&SECP256K1, &other).is_ok());
    }

    #[test]
    fn signature_wrapper() {
        let sig = Signature::from_bytes(&SIGNATURE_77).unwrap();
        assert_eq!(sig.to_bytes(), SIGNATURE_77);
        assert_eq!(&sig.r()[..], &SIGNATURE_77[..32]);
        assert_eq!(&sig.s()[..], &SIGNATURE_77[32..]);

        let key = sig
            .recover_public_key(&SECP256K1, &DIGEST, RecoveryId::new(false, false), &mut OsRng)
            .unwrap();
        assert_eq!(key, PUBLIC_KEY);
    }

    #[test]
    fn signature_zero_components() {
        let mut raw = SIGNATURE;
        raw[..32].fill(0);
        assert_eq!(Signature::from_bytes(&raw), Err(Error::SignatureOutOfRange));

        let mut raw = SIGNATURE;
        raw[32..].fill(0);
        assert_eq!(Signature::from_bytes(&raw), Err(Error::SignatureOutOfRange));
    }

    #[test]
    fn components_out_of_range() {
        let id = RecoveryId::new(false, false);
        let one = Bignum256::ONE.to_be_bytes();
        let n = ORDER.to_be_bytes();

        for (r, s) in [([0u8; 32], one), (one, [0u8; 32]), (n, one), (one, n), ([0xFF; 32], one)] {
            let mut sig = [0u8; 64];
            sig[..32].copy_from_slice(&r);
            sig[32..].copy_from_slice(&s);
            assert_eq!(
                SECP256K1.recover_pub_from_sig(&sig, &DIGEST, id, &mut OsRng),
                Err(Error::SignatureOutOfRange)
            );
        }
    }

    #[test]
    fn x_offset_out_of_range() {
        // r + n >= p for any r >= p - n
        let r = PRIME.sub_limbs(&ORDER);
        let mut sig = [0u8; 64];
        sig[..32].copy_from_slice(&r.to_be_bytes());
        sig[63] = 1;

        assert_eq!(
            SECP256K1.recover_pub_from_sig(&sig, &DIGEST, RecoveryId::new(false, true), &mut OsRng),
            Err(Error::RecoveredXOutOfRange)
        );
    }

    #[test]
    fn x_not_on_curve() {
        // x = 5 has no y on secp256k1: 5^3 + 7 = 132 is not a square mod p
        let mut sig = [0u8; 64];
        sig[31] = 5;
        sig[63] = 1;

        assert_eq!(
            SECP256K1.recover_pub_from_sig(&sig, &DIGEST, RecoveryId::new(false, false), &mut OsRng),
            Err(Error::PointNotOnCurve)
        );
    }

    #[test]
    fn recovered_infinity() {
        // r = Gx selects R = G; with s = 1 and a digest of 1 the sum
        // s R - e G is G - G
        let r = GENERATOR.x.reduce(&ORDER);
        let digest = Bignum256::ONE.to_be_bytes();
        let mut sig = [0u8; 64];
        sig[..32].copy_from_slice(&r.to_be_bytes());
        sig[63] = 1;

        assert_eq!(
            SECP256K1.recover_pub_from_sig(&sig, &digest, RecoveryId::new(false, false), &mut OsRng),
            Err(Error::PointAtInfinity)
        );
    }

    #[test]
    fn encoding_round_trip() {
        let encoded = encode_uncompressed(&GENERATOR);
        assert_eq!(encoded[0], 0x04);
        assert_eq!(decode_uncompressed(&SECP256K1, &encoded), Ok(GENERATOR));

        let mut bad_tag = encoded;
        bad_tag[0] = 0x02;
        assert_eq!(decode_uncompressed(&SECP256K1, &bad_tag), Err(Error::MalformedPoint));

        let mut bad_y = encoded;
        bad_y[64] ^= 1;
        assert_eq!(decode_uncompressed(&SECP256K1, &bad_y), Err(Error::PointNotOnCurve));

        let infinity = encode_uncompressed(&AffinePoint::INFINITY);
        assert_eq!(decode_uncompressed(&SECP256K1, &infinity), Err(Error::PointNotOnCurve));
    }

    #[test]
    fn signature_from_der() {
        let der = hex!("3006020105020107");
        let sig = Signature::from_der(&der).unwrap();
        assert_eq!(sig.r()[31], 5);
        assert_eq!(sig.s()[31], 7);
        assert_eq!(Signature::from_der(&der[..7]), Err(Error::MalformedDer));
    }
}
