//! Core business logic for JWT operations.
//!
//! This module contains the domain logic separated from CLI concerns.
//! All types and functions here are testable without the CLI layer.

pub mod algorithm;
pub mod claims;
pub(crate) mod crypto;
pub mod decoder;
pub mod encoder;
pub mod keys;
pub mod time_travel;

pub use algorithm::{AlgorithmFamily, SignatureAlgorithm};
pub use claims::{Audience, Claim, ClaimSet, ClaimValue};
pub use decoder::{DecodedToken, decode, decode_at, inspect};
pub use encoder::encode;
pub use keys::{GeneratedKeyPair, KeyGenerationType, KeyMaterial, KeyPairFamily};
