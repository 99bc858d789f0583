//! secp256k1 public-key recovery tests.

mod common;

use common::{nonzero_scalar, sign, to_der};
use hex_literal::hex;
use proptest::prelude::*;
use rand_core::OsRng;
use sha2::{Digest, Sha256};
use wallet_ecc::{
    Error, SECP256K1,
    ecdsa::{RecoveryId, Signature, decode_uncompressed, encode_uncompressed},
};

const MESSAGE: &[u8] = b"ECDSA proves knowledge of a secret number in the context of a single message";

#[test]
fn recover_with_each_id() {
    let digest: [u8; 32] = Sha256::digest(MESSAGE).into();
    let d = nonzero_scalar(
        &SECP256K1,
        &hex!("1cf6bc6c7f642a84994119e206c9f0753ff100709f4fd12f2338c1be60bf4175"),
    );
    let public = encode_uncompressed(&SECP256K1.scalar_multiply(&d, &mut OsRng));

    let mut seen = [false; 2];
    for nonce in 1u8..=16 {
        let k = nonzero_scalar(&SECP256K1, &Sha256::digest([nonce]).into());
        let (sig, id) = sign(&SECP256K1, &d, &k, &digest);
        seen[id.is_y_odd() as usize] = true;

        let recovered = SECP256K1
            .recover_pub_from_sig(&sig, &digest, id, &mut OsRng)
            .unwrap();
        assert_eq!(recovered, public);
    }

    // both parities are exercised with overwhelming probability
    assert_eq!(seen, [true, true]);
}

#[test]
fn recover_from_der() {
    let digest: [u8; 32] = Sha256::digest(MESSAGE).into();
    let d = nonzero_scalar(&SECP256K1, &[0x42; 32]);
    let k = nonzero_scalar(&SECP256K1, &[0x17; 32]);
    let (raw, id) = sign(&SECP256K1, &d, &k, &digest);

    let signature = Signature::from_der(&to_der(&raw)).unwrap();
    assert_eq!(signature.to_bytes(), raw);

    let key = signature
        .recover_public_key(&SECP256K1, &digest, id, &mut OsRng)
        .unwrap();
    let point = decode_uncompressed(&SECP256K1, &key).unwrap();
    assert_eq!(point, SECP256K1.scalar_multiply(&d, &mut OsRng));
}

#[test]
fn wrong_digest_recovers_other_key() {
    let digest: [u8; 32] = Sha256::digest(MESSAGE).into();
    let other: [u8; 32] = Sha256::digest(b"another message").into();
    let d = nonzero_scalar(&SECP256K1, &[0x42; 32]);
    let k = nonzero_scalar(&SECP256K1, &[0x99; 32]);
    let (sig, id) = sign(&SECP256K1, &d, &k, &digest);

    let public = encode_uncompressed(&SECP256K1.scalar_multiply(&d, &mut OsRng));
    let recovered = SECP256K1
        .recover_pub_from_sig(&sig, &other, id, &mut OsRng)
        .unwrap();
    assert_ne!(recovered, public);
}

#[test]
fn invalid_recovery_id_byte() {
    assert_eq!(RecoveryId::try_from(27u8), Err(Error::InvalidRecoveryId));
}

prop_compose! {
    fn scalar_bytes()(bytes in any::<[u8; 32]>()) -> [u8; 32] {
        bytes
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn sign_then_recover(
        d in scalar_bytes(),
        k in scalar_bytes(),
        msg in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let d = nonzero_scalar(&SECP256K1, &d);
        let k = nonzero_scalar(&SECP256K1, &k);
        let digest: [u8; 32] = Sha256::digest(&msg).into();

        let (sig, id) = sign(&SECP256K1, &d, &k, &digest);
        let recovered = SECP256K1.recover_pub_from_sig(&sig, &digest, id, &mut OsRng).unwrap();
        let public = SECP256K1.scalar_multiply(&d, &mut OsRng);

        prop_assert!(SECP256K1.validate_pubkey(&public));
        prop_assert_eq!(recovered, encode_uncompressed(&public));
    }
}
