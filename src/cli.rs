//! CLI argument definitions for jwt-codec.
//!
//! Uses `clap` derive macros to define the command-line interface.
//! Each subcommand has its own argument struct for type-safe parsing.
//!
//! # Security
//!
//! Argument structs that can carry tokens, secrets or claim values
//! implement custom `Debug` to redact them and prevent accidental leakage
//! through debug formatting, error chains, or logging.

use std::fmt;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use jwt_codec::core::{ClaimValue, KeyGenerationType};
use zeroize::Zeroizing;

/// Encode, decode and verify JSON Web Tokens, and generate the keys to
/// sign them with.
#[derive(Debug, Parser)]
#[command(name = "jwt-codec")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log debug details to stderr. `JWT_CODEC_LOG` takes precedence.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign a new JWT from the given claims.
    Encode(EncodeArgs),

    /// Verify a JWT's signature and validity window, then show its claims.
    Decode(DecodeArgs),

    /// Show a JWT's header and payload without verifying its signature.
    Inspect(InspectArgs),

    /// Generate an HMAC secret or an RSA/EC key pair.
    Keygen(KeygenArgs),

    /// List the supported signature algorithms.
    Algorithms,
}

/// Where to read a token from.
#[derive(Args)]
#[group(multiple = false)]
pub struct TokenSource {
    /// The JWT token. If omitted, reads from stdin.
    pub token: Option<String>,

    /// Read the token from the specified environment variable.
    #[arg(long, value_name = "VAR_NAME")]
    pub token_env: Option<String>,
}

impl fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSource")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("token_env", &self.token_env)
            .finish()
    }
}

/// Where to read the signing or verification key from.
#[derive(Args)]
#[group(multiple = false)]
pub struct KeySource {
    /// HMAC shared secret.
    ///
    /// WARNING: Passing secrets via CLI arguments may expose them in shell
    /// history. Prefer using --secret-env instead.
    #[arg(long, value_name = "SECRET", value_parser = parse_zeroizing_string)]
    pub secret: Option<Zeroizing<String>>,

    /// Read the HMAC secret from the specified environment variable.
    #[arg(long, value_name = "VAR_NAME")]
    pub secret_env: Option<String>,

    /// Path to a PEM-encoded key file: a private key for encoding, a public
    /// key for decoding.
    #[arg(long, value_name = "FILE")]
    pub key_file: Option<PathBuf>,
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySource")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("secret_env", &self.secret_env)
            .field("key_file", &self.key_file)
            .finish()
    }
}

/// A custom claim given as `KEY=VALUE` (text) or `KEY:=JSON` (typed).
#[derive(Clone, Debug)]
pub struct ClaimArg {
    pub key: String,
    pub value: ClaimValue,
}

/// Arguments for the `encode` subcommand.
#[derive(Args)]
pub struct EncodeArgs {
    /// Signature algorithm, e.g. HS256, RS384, ES512 or PS256.
    #[arg(long, value_name = "ALG")]
    pub alg: Option<String>,

    #[command(flatten)]
    pub key: KeySource,

    /// Issuer (`iss`).
    #[arg(long)]
    pub iss: Option<String>,

    /// Subject (`sub`).
    #[arg(long)]
    pub sub: Option<String>,

    /// Audience (`aud`). Repeat for a token with several audiences.
    #[arg(long, value_name = "AUD")]
    pub aud: Vec<String>,

    /// Issued-at time (`iat`), e.g. "now".
    ///
    /// Accepts relative expressions like "+7d", "-1h", "+30m" or
    /// absolute timestamps in ISO 8601 or Unix epoch format.
    #[arg(long, value_name = "EXPR", allow_hyphen_values = true)]
    pub iat: Option<String>,

    /// Expiration time (`exp`), e.g. "+15m". Same formats as --iat.
    #[arg(long, value_name = "EXPR", allow_hyphen_values = true)]
    pub exp: Option<String>,

    /// Not-before time (`nbf`). Same formats as --iat.
    #[arg(long, value_name = "EXPR", allow_hyphen_values = true)]
    pub nbf: Option<String>,

    /// Unique token identifier (`jti`).
    #[arg(long)]
    pub jti: Option<String>,

    /// Custom claim as KEY=VALUE (string) or KEY:=JSON (number, boolean,
    /// array, object or null). Repeatable.
    #[arg(long = "claim", value_name = "KEY=VALUE", value_parser = parse_claim)]
    pub claims: Vec<ClaimArg>,
}

/// Custom `Debug` that redacts claim values.
impl fmt::Debug for EncodeArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodeArgs")
            .field("alg", &self.alg)
            .field("key", &self.key)
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .field("nbf", &self.nbf)
            .field(
                "claims",
                &self.claims.iter().map(|c| c.key.as_str()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// Arguments for the `decode` subcommand.
#[derive(Args)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub token: TokenSource,

    /// Signature algorithm the token must be signed with.
    #[arg(long, value_name = "ALG")]
    pub alg: Option<String>,

    #[command(flatten)]
    pub key: KeySource,

    /// Simulate a different current time for expiry/nbf checks.
    ///
    /// Accepts relative expressions like "+7d", "-1h", "+30m" or
    /// absolute timestamps in ISO 8601 or Unix epoch format.
    #[arg(long, value_name = "EXPR", allow_hyphen_values = true)]
    pub time_travel: Option<String>,

    /// Output raw JSON without colors (machine-readable).
    #[arg(long)]
    pub json: bool,
}

impl fmt::Debug for DecodeArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeArgs")
            .field("token", &self.token)
            .field("alg", &self.alg)
            .field("key", &self.key)
            .field("time_travel", &self.time_travel)
            .field("json", &self.json)
            .finish()
    }
}

/// Arguments for the `inspect` subcommand.
#[derive(Debug, Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub token: TokenSource,

    /// Output raw JSON without colors (machine-readable).
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `keygen` subcommand.
#[derive(Debug, Args)]
pub struct KeygenArgs {
    /// Key type: hmac-256, hmac-384, hmac-512, rsa-2048, rsa-3072,
    /// rsa-4096, ec-256, ec-384 or ec-521.
    #[arg(long = "type", value_name = "TYPE")]
    pub kind: KeyGenerationType,

    /// Write the private key PEM to this file instead of stdout.
    #[arg(long, value_name = "FILE")]
    pub private_out: Option<PathBuf>,

    /// Write the public key PEM to this file instead of stdout.
    #[arg(long, value_name = "FILE")]
    pub public_out: Option<PathBuf>,

    /// Write the HMAC secret to this file instead of stdout.
    #[arg(long, value_name = "FILE")]
    pub secret_out: Option<PathBuf>,
}

/// Parse a string into a `Zeroizing<String>` for secure CLI arguments.
fn parse_zeroizing_string(s: &str) -> Result<Zeroizing<String>, std::convert::Infallible> {
    Ok(Zeroizing::new(s.to_string()))
}

/// Parse `KEY=VALUE` into a text claim and `KEY:=JSON` into a typed one.
fn parse_claim(s: &str) -> Result<ClaimArg, String> {
    let Some(eq) = s.find('=') else {
        return Err("expected KEY=VALUE or KEY:=JSON".to_string());
    };
    let raw = &s[eq + 1..];

    match s[..eq].strip_suffix(':') {
        Some(key) => {
            let json = serde_json::from_str(raw)
                .map_err(|e| format!("invalid JSON value for claim '{key}': {e}"))?;
            Ok(ClaimArg {
                key: key.to_string(),
                value: ClaimValue::from_json(json),
            })
        }
        None => Ok(ClaimArg {
            key: s[..eq].to_string(),
            value: ClaimValue::Text(raw.to_string()),
        }),
    }
}
