//! Domain error types for jwt-codec.
//!
//! Every core operation reports failures through [`JwtCodecError`]. The
//! variants form a small, closed taxonomy so that a front end can tell a
//! structural problem apart from a cryptographic one, and both apart from
//! an expired token. Messages are converted to user-facing text at the CLI
//! boundary.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur while encoding, decoding, or generating keys.
#[derive(Debug, Error)]
pub enum JwtCodecError {
    /// The token is not a well-formed `header.payload.signature` string,
    /// or one of its segments is not valid base64url / JSON.
    #[error("malformed token: {reason}")]
    MalformedToken {
        /// Which structural check failed.
        reason: String,
    },

    /// The header declares no signature algorithm (or `none`).
    #[error("unsigned token rejected: the header does not declare a signature algorithm")]
    UnsignedTokenRejected,

    /// The signature segment is empty.
    #[error("the token signature is missing")]
    SignatureMissing,

    /// The signature does not verify under the selected algorithm and key.
    #[error("signature validation failed: {reason}")]
    SignatureInvalid {
        /// Description of why validation failed.
        reason: String,
    },

    /// The `exp` claim lies in the past.
    #[error("the token has expired (exp: {expired_at})")]
    TokenExpired {
        /// The token's expiration instant.
        expired_at: DateTime<Utc>,
    },

    /// The `nbf` claim lies in the future.
    #[error("the token is not valid yet (nbf: {not_before})")]
    TokenNotYetValid {
        /// The token's not-before instant.
        not_before: DateTime<Utc>,
    },

    /// The key material cannot be used with the selected algorithm.
    #[error("invalid key format: {reason}")]
    InvalidKeyFormat {
        /// Diagnostic, including the cryptographic library's message when
        /// there is one.
        reason: String,
    },

    /// Key generation parameters are unsupported, or generation failed.
    #[error("key generation failed: {reason}")]
    KeyGenerationError {
        /// Description of the failure.
        reason: String,
    },

    /// No signature algorithm was selected, or the name is unknown.
    #[error("invalid algorithm choice: {reason}")]
    InvalidAlgorithmChoice {
        /// Description of the problem with the selection.
        reason: String,
    },

    /// Two custom claims share the same key.
    #[error("duplicate claim '{key}'")]
    DuplicateClaim {
        /// The repeated claim key.
        key: String,
    },

    /// A custom claim uses one of the registered claim names.
    #[error("'{key}' is a registered claim name and cannot be used as a custom claim")]
    ReservedClaimName {
        /// The offending claim key.
        key: String,
    },

    /// A custom claim is otherwise unusable.
    #[error("invalid claim '{key}': {reason}")]
    InvalidClaim {
        /// The claim key as given.
        key: String,
        /// Description of the problem.
        reason: String,
    },

    /// Failed to parse a time expression.
    #[error("invalid time expression '{expression}': {reason}")]
    InvalidTimeExpression {
        /// The time expression that failed to parse.
        expression: String,
        /// Description of the parsing failure.
        reason: String,
    },
}

impl JwtCodecError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedToken {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_key(reason: impl Into<String>) -> Self {
        Self::InvalidKeyFormat {
            reason: reason.into(),
        }
    }

    pub(crate) fn key_generation(reason: impl Into<String>) -> Self {
        Self::KeyGenerationError {
            reason: reason.into(),
        }
    }
}
