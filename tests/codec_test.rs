//! Integration tests for the jwt-codec library API.
//!
//! Exercises encoding and decoding across every supported algorithm with
//! the PEM fixtures, plus key generation feeding straight into signing.

mod common;

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use jwt_codec::core::keys::{generate, generate_key_pair, load_pem};
use jwt_codec::core::{
    AlgorithmFamily, ClaimSet, KeyGenerationType, KeyMaterial, KeyPairFamily, SignatureAlgorithm,
    decode, decode_at, encode,
};
use jwt_codec::error::JwtCodecError;

fn sample_claims() -> ClaimSet {
    let now = Utc::now();
    ClaimSet::new()
        .with_issuer("app")
        .with_subject("u1")
        .with_audience("api")
        .with_issued_at(now)
        .with_expiration(now + Duration::seconds(900))
        .with_not_before(now - Duration::seconds(5))
        .with_unique_id("4f1c2a")
        .with_claim("role", "admin")
        .unwrap()
        .with_claim("level", 3_i64)
        .unwrap()
}

fn b64(text: &str) -> String {
    URL_SAFE_NO_PAD.encode(text)
}

// --- Round trips ---

#[test]
fn test_every_algorithm_round_trips() {
    let claims = sample_claims();
    for alg in SignatureAlgorithm::ALL {
        let token = encode(&claims, alg, &common::signing_key(alg)).unwrap();
        let decoded = decode(&token, alg, &common::verifying_key(alg))
            .unwrap_or_else(|e| panic!("{alg}: {e}"));
        assert_eq!(decoded, claims.truncated_to_seconds(), "{alg}");
    }
}

#[test]
fn test_key_pair_material_verifies_too() {
    for alg in SignatureAlgorithm::ALL {
        let key = common::signing_key(alg);
        let token = encode(&sample_claims(), alg, &key).unwrap();
        assert!(decode(&token, alg, &key).is_ok(), "{alg}");
    }
}

#[test]
fn test_ecdsa_signatures_are_fixed_width() {
    for (alg, width) in [
        (SignatureAlgorithm::ES256, 64),
        (SignatureAlgorithm::ES384, 96),
        (SignatureAlgorithm::ES512, 132),
    ] {
        let token = encode(&ClaimSet::new(), alg, &common::signing_key(alg)).unwrap();
        let signature = URL_SAFE_NO_PAD
            .decode(token.rsplit('.').next().unwrap())
            .unwrap();
        assert_eq!(signature.len(), width, "{alg}");
    }
}

#[test]
fn test_documented_example() {
    let claims = ClaimSet::new()
        .with_issuer("app")
        .with_subject("u1")
        .with_expiration(Utc::now() + Duration::seconds(900));
    let key = KeyMaterial::secret("topsecret");

    let token = encode(&claims, SignatureAlgorithm::HS256, &key).unwrap();
    let decoded = decode(&token, SignatureAlgorithm::HS256, &key).unwrap();

    assert_eq!(decoded.issuer.as_deref(), Some("app"));
    assert_eq!(decoded.subject.as_deref(), Some("u1"));
    assert_eq!(
        decoded.expiration.map(|at| at.timestamp()),
        claims.expiration.map(|at| at.timestamp())
    );
}

// --- Signature failures ---

#[test]
fn test_other_key_of_same_type_is_signature_invalid() {
    for alg in SignatureAlgorithm::ALL {
        let token = encode(&sample_claims(), alg, &common::signing_key(alg)).unwrap();
        let err = decode(&token, alg, &common::other_signing_key(alg)).unwrap_err();
        assert!(
            matches!(err, JwtCodecError::SignatureInvalid { .. }),
            "{alg}: {err}"
        );
    }
}

#[test]
fn test_tampered_payload_byte_is_signature_invalid() {
    for alg in SignatureAlgorithm::ALL {
        let token = encode(&sample_claims(), alg, &common::signing_key(alg)).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let payload = URL_SAFE_NO_PAD.decode(parts[1]).unwrap();

        for i in 0..payload.len() {
            let mut flipped = payload.clone();
            flipped[i] ^= 1;
            let forged = format!(
                "{}.{}.{}",
                parts[0],
                URL_SAFE_NO_PAD.encode(&flipped),
                parts[2]
            );

            let err = decode(&forged, alg, &common::verifying_key(alg)).unwrap_err();
            assert!(
                matches!(err, JwtCodecError::SignatureInvalid { .. }),
                "{alg} byte {i}: {err}"
            );
        }
    }
}

#[test]
fn test_unsigned_token_is_rejected_for_every_algorithm() {
    for alg in SignatureAlgorithm::ALL {
        let err = decode(common::UNSIGNED_TOKEN, alg, &common::verifying_key(alg)).unwrap_err();
        assert!(matches!(err, JwtCodecError::UnsignedTokenRejected), "{alg}");
    }
}

#[test]
fn test_token_signed_with_other_algorithm_is_rejected() {
    let token = encode(
        &sample_claims(),
        SignatureAlgorithm::RS256,
        &common::signing_key(SignatureAlgorithm::RS256),
    )
    .unwrap();
    let err = decode(
        &token,
        SignatureAlgorithm::PS256,
        &common::verifying_key(SignatureAlgorithm::PS256),
    )
    .unwrap_err();
    assert!(matches!(err, JwtCodecError::SignatureInvalid { .. }));
}

#[test]
fn test_hmac_token_cannot_be_verified_as_rsa_with_public_key_as_secret() {
    // Classic key-confusion attempt: sign HS256 with the RSA public key text.
    let public_pem = std::fs::read_to_string(common::RSA_PUBLIC_KEY_PATH).unwrap();
    let forged = encode(
        &sample_claims(),
        SignatureAlgorithm::HS256,
        &KeyMaterial::secret(public_pem.clone()),
    )
    .unwrap();

    let err = decode(
        &forged,
        SignatureAlgorithm::RS256,
        &KeyMaterial::public_key(public_pem),
    )
    .unwrap_err();
    assert!(matches!(err, JwtCodecError::SignatureInvalid { .. }));
}

// --- Validity window ---

#[test]
fn test_expired_one_second_ago() {
    let now = Utc::now();
    for alg in [SignatureAlgorithm::HS256, SignatureAlgorithm::ES512] {
        let claims = ClaimSet::new().with_expiration(now - Duration::seconds(1));
        let token = encode(&claims, alg, &common::signing_key(alg)).unwrap();
        let err = decode_at(&token, alg, &common::verifying_key(alg), now).unwrap_err();
        assert!(matches!(err, JwtCodecError::TokenExpired { .. }), "{alg}");
    }
}

#[test]
fn test_not_before_one_hour_ahead() {
    let claims = ClaimSet::new().with_not_before(Utc::now() + Duration::hours(1));
    let alg = SignatureAlgorithm::PS512;
    let token = encode(&claims, alg, &common::signing_key(alg)).unwrap();
    let err = decode(&token, alg, &common::verifying_key(alg)).unwrap_err();
    assert!(matches!(err, JwtCodecError::TokenNotYetValid { .. }));
}

#[test]
fn test_time_travel_makes_expired_token_valid() {
    let issued = Utc::now() - Duration::days(2);
    let claims = ClaimSet::new()
        .with_issued_at(issued)
        .with_expiration(issued + Duration::hours(1));
    let key = KeyMaterial::secret("topsecret");
    let token = encode(&claims, SignatureAlgorithm::HS384, &key).unwrap();

    assert!(decode(&token, SignatureAlgorithm::HS384, &key).is_err());
    assert!(
        decode_at(
            &token,
            SignatureAlgorithm::HS384,
            &key,
            issued + Duration::minutes(30)
        )
        .is_ok()
    );
}

// --- Claims ---

#[test]
fn test_duplicate_claims_are_rejected_before_encoding() {
    let err = ClaimSet::new()
        .with_claim("role", "admin")
        .unwrap()
        .with_claim("role", "guest")
        .unwrap_err();
    assert!(matches!(err, JwtCodecError::DuplicateClaim { key } if key == "role"));
}

#[test]
fn test_foreign_token_claims_are_preserved() {
    let header = b64(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = b64(r#"{"sub":"u1","aud":["api"],"tenant":"acme","flags":{"beta":true}}"#);
    let key = KeyMaterial::secret("topsecret");
    // Issued by another library, with a payload the encoder never emits.
    let signature = jsonwebtoken::crypto::sign(
        format!("{header}.{payload}").as_bytes(),
        &jsonwebtoken::EncodingKey::from_secret(b"topsecret"),
        jsonwebtoken::Algorithm::HS256,
    )
    .unwrap();

    let claims = decode(
        &format!("{header}.{payload}.{signature}"),
        SignatureAlgorithm::HS256,
        &key,
    )
    .unwrap();
    assert_eq!(claims.audience.as_ref().and_then(|aud| aud.as_single()), Some("api"));
    assert_eq!(claims.claim("tenant").unwrap().to_string(), "acme");
    assert_eq!(claims.claim("flags").unwrap().to_string(), r#"{"beta":true}"#);
}

#[test]
fn test_foreign_token_with_several_audiences_is_accepted() {
    let header = b64(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = b64(r#"{"sub":"u1","aud":["a","b"]}"#);
    let signature = jsonwebtoken::crypto::sign(
        format!("{header}.{payload}").as_bytes(),
        &jsonwebtoken::EncodingKey::from_secret(b"topsecret"),
        jsonwebtoken::Algorithm::HS256,
    )
    .unwrap();

    let claims = decode(
        &format!("{header}.{payload}.{signature}"),
        SignatureAlgorithm::HS256,
        &KeyMaterial::secret("topsecret"),
    )
    .unwrap();
    let audience = claims.audience.unwrap();
    assert_eq!(audience.iter().collect::<Vec<_>>(), ["a", "b"]);
    assert!(audience.contains("a"));
}

// --- Key material ---

/// Key type generated for `alg` in the tests below. RSA sizes grow with
/// the digest so every modulus size gets exercised.
fn generated_type_for(alg: SignatureAlgorithm) -> KeyGenerationType {
    match (alg.family(), alg.digest_bits()) {
        (AlgorithmFamily::RsaPkcs1 | AlgorithmFamily::RsaPss, 384) => KeyGenerationType::Rsa3072,
        (AlgorithmFamily::RsaPkcs1 | AlgorithmFamily::RsaPss, 512) => KeyGenerationType::Rsa4096,
        _ => KeyGenerationType::for_algorithm(alg),
    }
}

#[test]
fn test_generated_keys_sign_and_verify_for_every_algorithm() {
    // Two independent keys per type, shared by the RS and PS variants.
    let mut generated: HashMap<KeyGenerationType, (KeyMaterial, KeyMaterial)> = HashMap::new();

    for alg in SignatureAlgorithm::ALL {
        let kind = generated_type_for(alg);
        let (key, other) = generated
            .entry(kind)
            .or_insert_with(|| (generate(kind).unwrap(), generate(kind).unwrap()));

        let claims = sample_claims();
        let token = encode(&claims, alg, key).unwrap();
        let decoded = decode(&token, alg, key).unwrap_or_else(|e| panic!("{alg} ({kind}): {e}"));
        assert_eq!(decoded, claims.truncated_to_seconds(), "{alg}");

        let err = decode(&token, alg, other).unwrap_err();
        assert!(
            matches!(err, JwtCodecError::SignatureInvalid { .. }),
            "{alg} ({kind}): {err}"
        );
    }

    assert!(generated.contains_key(&KeyGenerationType::Rsa3072));
    assert!(generated.contains_key(&KeyGenerationType::Rsa4096));
}

#[test]
fn test_generated_pem_survives_crlf_round_trip() {
    let pair = generate_key_pair(KeyPairFamily::Ec, 256).unwrap();
    let private_crlf = pair.private_key_pem.replace('\n', "\r\n");
    let public_crlf = format!("\u{feff}{}", pair.public_key_pem.replace('\n', "\r\n"));

    let key = KeyMaterial::key_pair(load_pem(&private_crlf), load_pem(&public_crlf));
    let token = encode(&ClaimSet::new(), SignatureAlgorithm::ES256, &key).unwrap();
    assert!(decode(&token, SignatureAlgorithm::ES256, &key).is_ok());
}

#[test]
fn test_public_key_cannot_sign() {
    let public_pem = std::fs::read_to_string(common::EC_PUBLIC_KEY_PATH).unwrap();
    let err = encode(
        &ClaimSet::new(),
        SignatureAlgorithm::ES256,
        &KeyMaterial::public_key(public_pem),
    )
    .unwrap_err();
    assert!(matches!(err, JwtCodecError::InvalidKeyFormat { .. }));
}

#[test]
fn test_wrong_curve_is_invalid_key() {
    let err = encode(
        &ClaimSet::new(),
        SignatureAlgorithm::ES384,
        &common::signing_key(SignatureAlgorithm::ES256),
    )
    .unwrap_err();
    assert!(matches!(err, JwtCodecError::InvalidKeyFormat { .. }));
}
