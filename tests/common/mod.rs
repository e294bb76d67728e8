//! Shared test fixtures and helper utilities.
//!
//! Provides pre-built JWT tokens with known claims and the paths of the
//! PEM key fixtures, for use by the integration tests.
#![allow(dead_code)]

use jwt_codec::core::{KeyMaterial, SignatureAlgorithm};

/// A valid HS256-signed JWT for testing.
///
/// Header: `{"alg":"HS256","typ":"JWT"}`
/// Payload: `{"sub":"1234567890","name":"Test User","iat":1516239022}`
pub const VALID_HS256_TOKEN: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
     eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IlRlc3QgVXNlciIsImlhdCI6MTUxNjIzOTAyMn0.\
     SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c";

/// A malformed token with only two parts (missing signature).
pub const MALFORMED_TOKEN_TWO_PARTS: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxMjM0NTY3ODkwIn0";

/// A completely invalid token string.
pub const INVALID_TOKEN: &str = "not-a-valid-jwt";

/// An unsigned token: `{"alg":"none"}` . `{"sub":"u1"}` . (empty)
pub const UNSIGNED_TOKEN: &str = "eyJhbGciOiJub25lIn0.eyJzdWIiOiJ1MSJ9.";

/// HMAC secret used to sign test tokens.
pub const HMAC_TEST_SECRET: &str = "topsecret";

pub const RSA_PRIVATE_KEY_PATH: &str = "tests/fixtures/rsa_private.pem";
pub const RSA_PUBLIC_KEY_PATH: &str = "tests/fixtures/rsa_public.pem";
pub const RSA_OTHER_PUBLIC_KEY_PATH: &str = "tests/fixtures/rsa_other_public.pem";
pub const EC_PRIVATE_KEY_PATH: &str = "tests/fixtures/ec_private.pem";
pub const EC_PUBLIC_KEY_PATH: &str = "tests/fixtures/ec_public.pem";
pub const EC521_PRIVATE_KEY_PATH: &str = "tests/fixtures/ec521_private.pem";
pub const EC521_PUBLIC_KEY_PATH: &str = "tests/fixtures/ec521_public.pem";

fn fixture(path: &str) -> String {
    std::fs::read_to_string(path).unwrap()
}

/// The signing key for `algorithm`.
pub fn signing_key(algorithm: SignatureAlgorithm) -> KeyMaterial {
    key_material(algorithm, false)
}

/// A second, unrelated key of the same type as [`signing_key`].
pub fn other_signing_key(algorithm: SignatureAlgorithm) -> KeyMaterial {
    key_material(algorithm, true)
}

/// The verification key matching [`signing_key`]: the same secret for
/// HMAC, the public half for everything else.
pub fn verifying_key(algorithm: SignatureAlgorithm) -> KeyMaterial {
    match signing_key(algorithm) {
        KeyMaterial::KeyPair { public_key_pem, .. } => KeyMaterial::public_key(public_key_pem),
        secret => secret,
    }
}

fn key_material(algorithm: SignatureAlgorithm, other: bool) -> KeyMaterial {
    let prefix = match algorithm {
        SignatureAlgorithm::HS256 | SignatureAlgorithm::HS384 | SignatureAlgorithm::HS512 => {
            return KeyMaterial::secret(if other { "another-secret" } else { HMAC_TEST_SECRET });
        }
        SignatureAlgorithm::ES256 => "ec",
        SignatureAlgorithm::ES384 => "ec384",
        SignatureAlgorithm::ES512 => "ec521",
        _ => "rsa",
    };

    let name = if other {
        format!("{prefix}_other")
    } else {
        prefix.to_string()
    };
    KeyMaterial::key_pair(
        fixture(&format!("tests/fixtures/{name}_private.pem")),
        fixture(&format!("tests/fixtures/{name}_public.pem")),
    )
}
