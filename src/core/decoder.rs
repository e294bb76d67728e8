//! JWT decoding and verification.
//!
//! [`decode`] runs the full pipeline (structure, header, signature,
//! payload claims, timestamps) and yields a [`ClaimSet`] only when every
//! stage passes. The payload is not parsed before its signature checks
//! out. [`inspect`] stops after the structural stages and hands back
//! the raw JSON of an unverified token for display.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::core::algorithm::SignatureAlgorithm;
use crate::core::claims::ClaimSet;
use crate::core::crypto::Verifier;
use crate::core::keys::KeyMaterial;
use crate::error::JwtCodecError;

/// The decoded, unverified parts of a JWT.
///
/// Implements a custom `Debug` that redacts `payload` and `signature`
/// to prevent accidental leakage of sensitive claim data.
pub struct DecodedToken {
    /// The parsed JWT header (typically contains `alg` and `typ`).
    pub header: Value,
    /// The parsed JWT payload (claims).
    pub payload: Value,
    /// The raw base64url-encoded signature segment.
    pub signature: String,
}

/// Custom `Debug` that redacts payload and signature to prevent
/// accidental leakage through debug formatting or error chains.
impl fmt::Debug for DecodedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedToken")
            .field("header", &self.header)
            .field("payload", &"[REDACTED]")
            .field("signature", &"[REDACTED]")
            .finish()
    }
}

/// Split a token and parse its header and payload without verifying it.
///
/// # Errors
///
/// Returns [`JwtCodecError::MalformedToken`] if the token doesn't have
/// exactly three parts, or if a segment is not base64url-encoded JSON
/// object text.
pub fn inspect(token: &str) -> Result<DecodedToken, JwtCodecError> {
    let segments = Segments::split(token)?;
    let header = decode_segment(segments.header, "header")?;
    let payload = decode_segment(segments.payload, "payload")?;

    Ok(DecodedToken {
        header: Value::Object(header),
        payload: Value::Object(payload),
        signature: segments.signature.to_string(),
    })
}

/// Verify `token` with `algorithm` and `key`, and return its claims.
///
/// Timestamp claims are checked against the current time.
///
/// # Errors
///
/// See [`decode_at`].
pub fn decode(
    token: &str,
    algorithm: SignatureAlgorithm,
    key: &KeyMaterial,
) -> Result<ClaimSet, JwtCodecError> {
    decode_at(token, algorithm, key, Utc::now())
}

/// Verify `token` as of the instant `now`.
///
/// # Errors
///
/// Checks run in order and the first failure is returned:
///
/// - [`JwtCodecError::MalformedToken`] for structural problems and an
///   unreadable header;
/// - [`JwtCodecError::UnsignedTokenRejected`] when the header has no `alg`
///   or declares `none`;
/// - [`JwtCodecError::SignatureMissing`] for an empty signature segment;
/// - [`JwtCodecError::InvalidKeyFormat`] when `key` does not suit
///   `algorithm`;
/// - [`JwtCodecError::SignatureInvalid`] when the header declares another
///   algorithm or the signature does not match;
/// - [`JwtCodecError::MalformedToken`] when the authenticated payload is
///   not a JSON object or a claim has the wrong type;
/// - [`JwtCodecError::TokenExpired`] when `exp` is before `now`;
/// - [`JwtCodecError::TokenNotYetValid`] when `nbf` is after `now`.
pub fn decode_at(
    token: &str,
    algorithm: SignatureAlgorithm,
    key: &KeyMaterial,
    now: DateTime<Utc>,
) -> Result<ClaimSet, JwtCodecError> {
    let segments = Segments::split(token)?;
    let header = decode_segment(segments.header, "header")?;
    let declared = declared_algorithm(&header)?;

    if segments.signature.is_empty() {
        return Err(JwtCodecError::SignatureMissing);
    }
    if URL_SAFE_NO_PAD.decode(segments.signature).is_err() {
        return Err(JwtCodecError::malformed(
            "signature segment is not valid base64url",
        ));
    }

    let verifier = Verifier::new(algorithm, key)?;
    if declared != algorithm.short_name() {
        return Err(JwtCodecError::SignatureInvalid {
            reason: format!(
                "algorithm mismatch: the token declares '{}' but {algorithm} was selected",
                declared.escape_default()
            ),
        });
    }

    let signing_input = format!("{}.{}", segments.header, segments.payload);
    if !verifier.verify(signing_input.as_bytes(), segments.signature)? {
        return Err(JwtCodecError::SignatureInvalid {
            reason: format!("the signature does not match the {algorithm} key"),
        });
    }

    // Nothing in the payload is read until it is authenticated.
    let payload = decode_segment(segments.payload, "payload")?;
    let claims = ClaimSet::from_payload(payload)?;
    check_validity_window(&claims, now)?;
    Ok(claims)
}

/// The three raw segments of a compact token.
struct Segments<'a> {
    header: &'a str,
    payload: &'a str,
    signature: &'a str,
}

impl<'a> Segments<'a> {
    fn split(token: &'a str) -> Result<Self, JwtCodecError> {
        let parts: Vec<&str> = token.trim().split('.').collect();
        let &[header, payload, signature] = parts.as_slice() else {
            return Err(JwtCodecError::malformed(format!(
                "expected 3 dot-separated segments, found {}",
                parts.len()
            )));
        };

        for (segment, name) in [(header, "header"), (payload, "payload")] {
            if segment.is_empty() {
                return Err(JwtCodecError::malformed(format!("the {name} segment is empty")));
            }
        }

        Ok(Self {
            header,
            payload,
            signature,
        })
    }
}

/// Base64url-decode a segment and parse it as a JSON object.
fn decode_segment(encoded: &str, segment_name: &str) -> Result<Map<String, Value>, JwtCodecError> {
    let bytes = URL_SAFE_NO_PAD.decode(encoded).map_err(|_| {
        JwtCodecError::malformed(format!("the {segment_name} segment is not valid base64url"))
    })?;

    match serde_json::from_slice(&bytes) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(JwtCodecError::malformed(format!(
            "the {segment_name} segment is not a JSON object"
        ))),
        Err(e) => Err(JwtCodecError::malformed(format!(
            "the {segment_name} segment is not valid JSON: {e}"
        ))),
    }
}

/// The header's `alg` value. Tokens without one, or declaring `none` in
/// any case, are unsigned.
fn declared_algorithm(header: &Map<String, Value>) -> Result<&str, JwtCodecError> {
    match header.get("alg") {
        None => Err(JwtCodecError::UnsignedTokenRejected),
        Some(Value::String(alg)) if alg.eq_ignore_ascii_case("none") => {
            Err(JwtCodecError::UnsignedTokenRejected)
        }
        Some(Value::String(alg)) => Ok(alg),
        Some(_) => Err(JwtCodecError::malformed("the header 'alg' must be a string")),
    }
}

/// Expiry is checked before not-before, both at second granularity.
fn check_validity_window(claims: &ClaimSet, now: DateTime<Utc>) -> Result<(), JwtCodecError> {
    let now = now.timestamp();
    if let Some(expired_at) = claims.expiration {
        if expired_at.timestamp() < now {
            return Err(JwtCodecError::TokenExpired { expired_at });
        }
    }
    if let Some(not_before) = claims.not_before {
        if not_before.timestamp() > now {
            return Err(JwtCodecError::TokenNotYetValid { not_before });
        }
    }
    Ok(())
}
