//! jwt-codec: encode, decode and verify JSON Web Tokens.
//!
//! The [`core`] module signs a [`core::ClaimSet`] into a compact JWS with
//! any of twelve HMAC, RSA, ECDSA and RSA-PSS algorithms, verifies tokens
//! back into claim sets, and generates secrets and PEM key pairs.
//!
//! ```no_run
//! use chrono::{Duration, Utc};
//! use jwt_codec::core::{ClaimSet, KeyMaterial, SignatureAlgorithm, decode, encode};
//!
//! # fn main() -> Result<(), jwt_codec::error::JwtCodecError> {
//! let claims = ClaimSet::new()
//!     .with_issuer("app")
//!     .with_subject("u1")
//!     .with_expiration(Utc::now() + Duration::seconds(900));
//! let key = KeyMaterial::secret("topsecret");
//!
//! let token = encode(&claims, SignatureAlgorithm::HS256, &key)?;
//! let verified = decode(&token, SignatureAlgorithm::HS256, &key)?;
//! assert_eq!(verified.subject.as_deref(), Some("u1"));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod core;
pub mod error;
