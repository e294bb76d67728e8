//! Token encoding.
//!
//! Serializes a [`ClaimSet`] into a compact JWS string signed with the
//! chosen algorithm.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Map, Value};

use crate::core::algorithm::SignatureAlgorithm;
use crate::core::claims::ClaimSet;
use crate::core::crypto::Signer;
use crate::core::keys::KeyMaterial;
use crate::error::JwtCodecError;

/// Encode and sign `claims`.
///
/// The header is `{"alg": <algorithm>, "typ": "JWT"}`. Unset claims are
/// omitted from the payload and timestamps are written as whole seconds
/// since the Unix epoch.
///
/// # Errors
///
/// Returns [`JwtCodecError::InvalidKeyFormat`] when `key` does not suit
/// `algorithm`.
pub fn encode(
    claims: &ClaimSet,
    algorithm: SignatureAlgorithm,
    key: &KeyMaterial,
) -> Result<String, JwtCodecError> {
    let signer = Signer::new(algorithm, key)?;

    let mut header = Map::new();
    header.insert("alg".to_string(), Value::from(algorithm.short_name()));
    header.insert("typ".to_string(), Value::from("JWT"));

    let signing_input = format!(
        "{}.{}",
        encode_segment(&header),
        encode_segment(&claims.to_payload())
    );
    let signature = signer.sign(signing_input.as_bytes())?;

    Ok(format!("{signing_input}.{signature}"))
}

fn encode_segment(object: &Map<String, Value>) -> String {
    // A JSON object with string keys always serializes.
    URL_SAFE_NO_PAD.encode(Value::Object(object.clone()).to_string())
}
