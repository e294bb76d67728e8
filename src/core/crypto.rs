//! Signer and verifier construction for each signature algorithm.
//!
//! A flat dispatch table maps every [`SignatureAlgorithm`] to a backend:
//! `jsonwebtoken`'s signing primitives for the HMAC, RSA and P-256/P-384
//! algorithms, and the `p521` crate for ES512, which `jsonwebtoken` does
//! not implement. Key text is parsed eagerly so that unusable material is
//! reported as [`JwtCodecError::InvalidKeyFormat`] before anything is
//! signed or verified.
//!
//! EC private keys are accepted as PKCS#8 or SEC1 PEM and re-encoded as
//! PKCS#8 (with the public point embedded) before being handed to the
//! signing backend.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{DecodingKey, EncodingKey};
use p256::pkcs8::spki::SubjectPublicKeyInfoRef;
use p256::pkcs8::{
    DecodePrivateKey, DecodePublicKey, EncodePrivateKey, LineEnding, ObjectIdentifier,
    PrivateKeyInfo,
};
use p521::ecdsa::signature::{Signer as _, Verifier as _};
use p521::elliptic_curve::sec1::ToEncodedPoint;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use zeroize::Zeroizing;

use crate::core::algorithm::{AlgorithmFamily, SignatureAlgorithm};
use crate::core::keys::{KeyMaterial, pem_label};
use crate::error::JwtCodecError;

/// Smallest RSA modulus the signing backend accepts.
const MIN_RSA_BITS: usize = 2048;

/// Which implementation computes signatures for an algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    Jwt(jsonwebtoken::Algorithm),
    P521,
}

fn backend(algorithm: SignatureAlgorithm) -> Backend {
    use jsonwebtoken::Algorithm as Jwt;

    match algorithm {
        SignatureAlgorithm::HS256 => Backend::Jwt(Jwt::HS256),
        SignatureAlgorithm::HS384 => Backend::Jwt(Jwt::HS384),
        SignatureAlgorithm::HS512 => Backend::Jwt(Jwt::HS512),
        SignatureAlgorithm::RS256 => Backend::Jwt(Jwt::RS256),
        SignatureAlgorithm::RS384 => Backend::Jwt(Jwt::RS384),
        SignatureAlgorithm::RS512 => Backend::Jwt(Jwt::RS512),
        SignatureAlgorithm::ES256 => Backend::Jwt(Jwt::ES256),
        SignatureAlgorithm::ES384 => Backend::Jwt(Jwt::ES384),
        SignatureAlgorithm::ES512 => Backend::P521,
        SignatureAlgorithm::PS256 => Backend::Jwt(Jwt::PS256),
        SignatureAlgorithm::PS384 => Backend::Jwt(Jwt::PS384),
        SignatureAlgorithm::PS512 => Backend::Jwt(Jwt::PS512),
    }
}

/// Computes signatures for one algorithm with one key.
pub(crate) enum Signer {
    Jwt {
        key: EncodingKey,
        algorithm: jsonwebtoken::Algorithm,
    },
    P521(p521::ecdsa::SigningKey),
}

impl Signer {
    /// Build a signer for `algorithm` from `material`.
    ///
    /// # Errors
    ///
    /// Returns [`JwtCodecError::InvalidKeyFormat`] if the material is the
    /// wrong kind for the algorithm or cannot be parsed.
    pub(crate) fn new(
        algorithm: SignatureAlgorithm,
        material: &KeyMaterial,
    ) -> Result<Self, JwtCodecError> {
        let jwt_algorithm = match backend(algorithm) {
            Backend::P521 => {
                let pem = private_pem_for(algorithm, material)?;
                return p521_signing_key(pem).map(Self::P521);
            }
            Backend::Jwt(jwt_algorithm) => jwt_algorithm,
        };

        let key = match algorithm.family() {
            AlgorithmFamily::Hmac => EncodingKey::from_secret(secret_for(algorithm, material)?),
            AlgorithmFamily::RsaPkcs1 | AlgorithmFamily::RsaPss => {
                let pem = private_pem_for(algorithm, material)?;
                check_rsa_private_key(pem)?;
                EncodingKey::from_rsa_pem(pem.as_bytes()).map_err(|e| {
                    JwtCodecError::invalid_key(format!("not a usable RSA private key: {e}"))
                })?
            }
            AlgorithmFamily::Ecdsa => {
                let pem = private_pem_for(algorithm, material)?;
                let pkcs8 = ec_private_key_as_pkcs8(algorithm, pem)?;
                EncodingKey::from_ec_pem(pkcs8.as_bytes()).map_err(|e| {
                    JwtCodecError::invalid_key(format!("not a usable EC private key: {e}"))
                })?
            }
        };

        Ok(Self::Jwt {
            key,
            algorithm: jwt_algorithm,
        })
    }

    /// Sign `message`, returning the base64url (unpadded) signature.
    pub(crate) fn sign(&self, message: &[u8]) -> Result<String, JwtCodecError> {
        match self {
            Self::Jwt { key, algorithm } => jsonwebtoken::crypto::sign(message, key, *algorithm)
                .map_err(|e| {
                    JwtCodecError::invalid_key(format!("{algorithm:?} signer rejected the key: {e}"))
                }),
            Self::P521(key) => {
                let signature: p521::ecdsa::Signature = key.try_sign(message).map_err(|e| {
                    JwtCodecError::invalid_key(format!("ES512 signer rejected the key: {e}"))
                })?;
                Ok(URL_SAFE_NO_PAD.encode(signature.to_bytes()))
            }
        }
    }
}

/// Checks signatures for one algorithm with one key.
pub(crate) enum Verifier {
    Jwt {
        key: DecodingKey,
        algorithm: jsonwebtoken::Algorithm,
    },
    P521(p521::ecdsa::VerifyingKey),
}

impl Verifier {
    /// Build a verifier for `algorithm` from `material`.
    ///
    /// # Errors
    ///
    /// Returns [`JwtCodecError::InvalidKeyFormat`] if the material is the
    /// wrong kind for the algorithm or cannot be parsed.
    pub(crate) fn new(
        algorithm: SignatureAlgorithm,
        material: &KeyMaterial,
    ) -> Result<Self, JwtCodecError> {
        let jwt_algorithm = match backend(algorithm) {
            Backend::P521 => {
                let pem = public_pem_for(algorithm, material)?;
                return p521_verifying_key(pem).map(Self::P521);
            }
            Backend::Jwt(jwt_algorithm) => jwt_algorithm,
        };

        let key = match algorithm.family() {
            AlgorithmFamily::Hmac => DecodingKey::from_secret(secret_for(algorithm, material)?),
            AlgorithmFamily::RsaPkcs1 | AlgorithmFamily::RsaPss => {
                let pem = public_pem_for(algorithm, material)?;
                check_rsa_public_key(pem)?;
                DecodingKey::from_rsa_pem(pem.as_bytes()).map_err(|e| {
                    JwtCodecError::invalid_key(format!("not a usable RSA public key: {e}"))
                })?
            }
            AlgorithmFamily::Ecdsa => {
                let pem = public_pem_for(algorithm, material)?;
                check_ec_public_key(algorithm, pem)?;
                DecodingKey::from_ec_pem(pem.as_bytes()).map_err(|e| {
                    JwtCodecError::invalid_key(format!("not a usable EC public key: {e}"))
                })?
            }
        };

        Ok(Self::Jwt {
            key,
            algorithm: jwt_algorithm,
        })
    }

    /// Check a base64url `signature` over `message`.
    ///
    /// Returns `Ok(false)` on a mismatch. The caller has already checked
    /// that `signature` is valid base64url.
    pub(crate) fn verify(&self, message: &[u8], signature: &str) -> Result<bool, JwtCodecError> {
        match self {
            Self::Jwt { key, algorithm } => {
                jsonwebtoken::crypto::verify(signature, message, key, *algorithm).map_err(|e| {
                    JwtCodecError::invalid_key(format!(
                        "{algorithm:?} verifier rejected the key: {e}"
                    ))
                })
            }
            Self::P521(key) => {
                let Ok(bytes) = URL_SAFE_NO_PAD.decode(signature) else {
                    return Ok(false);
                };
                let Ok(signature) = p521::ecdsa::Signature::from_slice(&bytes) else {
                    return Ok(false);
                };
                Ok(key.verify(message, &signature).is_ok())
            }
        }
    }
}

fn secret_for(
    algorithm: SignatureAlgorithm,
    material: &KeyMaterial,
) -> Result<&[u8], JwtCodecError> {
    match material {
        KeyMaterial::Secret(secret) if secret.is_empty() => {
            Err(JwtCodecError::invalid_key("the secret key is empty"))
        }
        KeyMaterial::Secret(secret) => Ok(secret.as_bytes()),
        other => Err(JwtCodecError::invalid_key(format!(
            "{algorithm} requires a shared secret, but a {} was supplied",
            other.kind()
        ))),
    }
}

fn private_pem_for(
    algorithm: SignatureAlgorithm,
    material: &KeyMaterial,
) -> Result<&str, JwtCodecError> {
    match material {
        KeyMaterial::KeyPair {
            private_key_pem, ..
        }
        | KeyMaterial::PrivateKey(private_key_pem) => Ok(private_key_pem.as_str()),
        other => Err(JwtCodecError::invalid_key(format!(
            "signing with {algorithm} requires a PEM private key, but a {} was supplied",
            other.kind()
        ))),
    }
}

fn public_pem_for(
    algorithm: SignatureAlgorithm,
    material: &KeyMaterial,
) -> Result<&str, JwtCodecError> {
    match material {
        KeyMaterial::KeyPair { public_key_pem, .. } | KeyMaterial::PublicKey(public_key_pem) => {
            Ok(public_key_pem.as_str())
        }
        other => Err(JwtCodecError::invalid_key(format!(
            "verifying with {algorithm} requires a PEM public key, but a {} was supplied",
            other.kind()
        ))),
    }
}

/// Asymmetric key families, as told apart by PEM label or algorithm OID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyFamily {
    Rsa,
    Ec,
}

impl KeyFamily {
    fn described(self) -> &'static str {
        match self {
            Self::Rsa => "an RSA key",
            Self::Ec => "an EC key",
        }
    }
}

const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
const RSASSA_PSS: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.10");
const EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

/// The family a PEM key belongs to: from the label for the legacy
/// formats, from the algorithm identifier for PKCS#8 and
/// SubjectPublicKeyInfo. `None` when it can't be told.
fn pem_key_family(text: &str) -> Option<KeyFamily> {
    let block = pem::parse(text.trim()).ok()?;
    let oid = match block.tag() {
        "RSA PRIVATE KEY" | "RSA PUBLIC KEY" => return Some(KeyFamily::Rsa),
        "EC PRIVATE KEY" => return Some(KeyFamily::Ec),
        "PRIVATE KEY" => PrivateKeyInfo::try_from(block.contents()).ok()?.algorithm.oid,
        "PUBLIC KEY" => SubjectPublicKeyInfoRef::try_from(block.contents()).ok()?.algorithm.oid,
        _ => return None,
    };

    if oid == RSA_ENCRYPTION || oid == RSASSA_PSS {
        Some(KeyFamily::Rsa)
    } else if oid == EC_PUBLIC_KEY {
        Some(KeyFamily::Ec)
    } else {
        None
    }
}

/// The PEM label of `pem`, or an error naming what was expected. A key of
/// another family is reported as such before any curve-specific parsing.
fn require_label(pem: &str, expected: &str, family: KeyFamily) -> Result<String, JwtCodecError> {
    let label = pem_label(pem).ok_or_else(|| {
        JwtCodecError::invalid_key(format!("expected {expected} in PEM format"))
    })?;
    match pem_key_family(pem) {
        Some(found) if found != family => Err(JwtCodecError::invalid_key(format!(
            "expected {expected}, found {}",
            found.described()
        ))),
        _ => Ok(label),
    }
}

fn unexpected_label(expected: &str, found: &str) -> JwtCodecError {
    JwtCodecError::invalid_key(format!("expected {expected}, found {found}"))
}

fn check_rsa_private_key(pem: &str) -> Result<(), JwtCodecError> {
    let label = require_label(pem, "an RSA private key", KeyFamily::Rsa)?;
    let key = match label.as_str() {
        "PRIVATE KEY" => RsaPrivateKey::from_pkcs8_pem(pem)
            .map_err(|e| JwtCodecError::invalid_key(format!("not an RSA private key: {e}")))?,
        "RSA PRIVATE KEY" => RsaPrivateKey::from_pkcs1_pem(pem)
            .map_err(|e| JwtCodecError::invalid_key(format!("not an RSA private key: {e}")))?,
        other => return Err(unexpected_label("an RSA private key", other)),
    };
    check_rsa_modulus(key.size() * 8)
}

fn check_rsa_public_key(pem: &str) -> Result<(), JwtCodecError> {
    let label = require_label(pem, "an RSA public key", KeyFamily::Rsa)?;
    let key = match label.as_str() {
        "PUBLIC KEY" => RsaPublicKey::from_public_key_pem(pem)
            .map_err(|e| JwtCodecError::invalid_key(format!("not an RSA public key: {e}")))?,
        "RSA PUBLIC KEY" => RsaPublicKey::from_pkcs1_pem(pem)
            .map_err(|e| JwtCodecError::invalid_key(format!("not an RSA public key: {e}")))?,
        other => return Err(unexpected_label("an RSA public key", other)),
    };
    check_rsa_modulus(key.size() * 8)
}

fn check_rsa_modulus(bits: usize) -> Result<(), JwtCodecError> {
    if bits < MIN_RSA_BITS {
        return Err(JwtCodecError::invalid_key(format!(
            "RSA keys must be at least {MIN_RSA_BITS} bits, this one has {bits}"
        )));
    }
    Ok(())
}

/// Parse an EC private key for `algorithm`'s curve and re-encode it as
/// PKCS#8 PEM.
fn ec_private_key_as_pkcs8(
    algorithm: SignatureAlgorithm,
    pem: &str,
) -> Result<Zeroizing<String>, JwtCodecError> {
    let label = require_label(pem, "an EC private key", KeyFamily::Ec)?;
    let sec1 = match label.as_str() {
        "PRIVATE KEY" => false,
        "EC PRIVATE KEY" => true,
        other => return Err(unexpected_label("an EC private key", other)),
    };
    let wrong_curve = |e: String| {
        JwtCodecError::invalid_key(format!("not a {} private key: {e}", curve_name(algorithm)))
    };

    let encoded = match algorithm {
        SignatureAlgorithm::ES256 => {
            let key = if sec1 {
                p256::SecretKey::from_sec1_pem(pem).map_err(|e| wrong_curve(e.to_string()))?
            } else {
                p256::SecretKey::from_pkcs8_pem(pem).map_err(|e| wrong_curve(e.to_string()))?
            };
            key.to_pkcs8_pem(LineEnding::LF)
        }
        _ => {
            let key = if sec1 {
                p384::SecretKey::from_sec1_pem(pem).map_err(|e| wrong_curve(e.to_string()))?
            } else {
                p384::SecretKey::from_pkcs8_pem(pem).map_err(|e| wrong_curve(e.to_string()))?
            };
            key.to_pkcs8_pem(LineEnding::LF)
        }
    };

    encoded.map_err(|e| JwtCodecError::invalid_key(format!("failed to re-encode EC key: {e}")))
}

fn check_ec_public_key(algorithm: SignatureAlgorithm, pem: &str) -> Result<(), JwtCodecError> {
    let label = require_label(pem, "an EC public key", KeyFamily::Ec)?;
    if label != "PUBLIC KEY" {
        return Err(unexpected_label("an EC public key", &label));
    }

    let parsed = match algorithm {
        SignatureAlgorithm::ES256 => p256::PublicKey::from_public_key_pem(pem).map(|_| ()),
        _ => p384::PublicKey::from_public_key_pem(pem).map(|_| ()),
    };
    parsed.map_err(|e| {
        JwtCodecError::invalid_key(format!("not a {} public key: {e}", curve_name(algorithm)))
    })
}

fn p521_signing_key(pem: &str) -> Result<p521::ecdsa::SigningKey, JwtCodecError> {
    let label = require_label(pem, "an EC private key", KeyFamily::Ec)?;
    let secret = match label.as_str() {
        "PRIVATE KEY" => p521::SecretKey::from_pkcs8_pem(pem).map_err(|e| e.to_string()),
        "EC PRIVATE KEY" => p521::SecretKey::from_sec1_pem(pem).map_err(|e| e.to_string()),
        other => return Err(unexpected_label("an EC private key", other)),
    }
    .map_err(|e| JwtCodecError::invalid_key(format!("not a P-521 private key: {e}")))?;

    p521::ecdsa::SigningKey::from_slice(&secret.to_bytes())
        .map_err(|e| JwtCodecError::invalid_key(format!("not a P-521 private key: {e}")))
}

fn p521_verifying_key(pem: &str) -> Result<p521::ecdsa::VerifyingKey, JwtCodecError> {
    let label = require_label(pem, "an EC public key", KeyFamily::Ec)?;
    if label != "PUBLIC KEY" {
        return Err(unexpected_label("an EC public key", &label));
    }

    let public = p521::PublicKey::from_public_key_pem(pem)
        .map_err(|e| JwtCodecError::invalid_key(format!("not a P-521 public key: {e}")))?;
    p521::ecdsa::VerifyingKey::from_sec1_bytes(public.to_encoded_point(false).as_bytes())
        .map_err(|e| JwtCodecError::invalid_key(format!("not a P-521 public key: {e}")))
}

fn curve_name(algorithm: SignatureAlgorithm) -> &'static str {
    match algorithm.digest_bits() {
        256 => "P-256",
        384 => "P-384",
        _ => "P-521",
    }
}
