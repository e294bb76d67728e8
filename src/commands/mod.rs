//! Command handlers for each CLI subcommand.
//!
//! Each subcommand is implemented in its own module and exposes
//! a single `execute` function that receives the parsed arguments.
//! Input helpers shared between subcommands live here.

pub mod algorithms;
pub mod decode;
pub mod encode;
pub mod inspect;
pub mod keygen;

use std::fs;
use std::io::{self, IsTerminal, Read};

use anyhow::{Context, Result, bail};
use jwt_codec::core::KeyMaterial;
use jwt_codec::core::keys::{load_pem, pem_label};
use tracing::debug;
use zeroize::Zeroizing;

use crate::cli::{KeySource, TokenSource};

/// Upper bound on what is read from stdin.
const MAX_STDIN_BYTES: u64 = 64 * 1024;

/// Resolve the token from the argument, an environment variable, or stdin.
///
/// The token is trimmed; an empty token is an error.
pub(crate) fn read_token(source: &TokenSource) -> Result<Zeroizing<String>> {
    let raw = if let Some(token) = &source.token {
        debug!(source = "argument", "reading token");
        Zeroizing::new(token.clone())
    } else if let Some(var) = &source.token_env {
        debug!(source = "environment", var = %var, "reading token");
        read_env_var(var)?
    } else {
        debug!(source = "stdin", "reading token");
        read_stdin()?
    };

    let token = raw.trim();
    if token.is_empty() {
        bail!("no token provided: pass it as an argument, with --token-env, or on stdin");
    }
    Ok(Zeroizing::new(token.to_string()))
}

/// Resolve the signing or verification key.
///
/// PEM files are classified by their label: anything labelled as a private
/// key is used for signing, everything else is treated as a public key.
pub(crate) fn read_key(source: &KeySource) -> Result<KeyMaterial> {
    if let Some(secret) = &source.secret {
        debug!(source = "argument", "using shared secret");
        return Ok(KeyMaterial::Secret(secret.clone()));
    }

    if let Some(var) = &source.secret_env {
        debug!(source = "environment", var = %var, "using shared secret");
        return Ok(KeyMaterial::Secret(read_env_var(var)?));
    }

    if let Some(path) = &source.key_file {
        let contents = Zeroizing::new(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read key file '{}'", path.display()))?,
        );
        let pem = load_pem(&contents);
        let material = match pem_label(&pem) {
            Some(label) if label.ends_with("PRIVATE KEY") => KeyMaterial::private_key(pem),
            _ => KeyMaterial::public_key(pem),
        };
        debug!(path = %path.display(), kind = material.kind(), "loaded key file");
        return Ok(material);
    }

    bail!("no key supplied: use --secret, --secret-env or --key-file")
}

fn read_env_var(name: &str) -> Result<Zeroizing<String>> {
    validate_env_var_name(name)?;
    std::env::var(name)
        .map(Zeroizing::new)
        .with_context(|| format!("environment variable '{name}' is not set or is not valid UTF-8"))
}

/// Reject names the platform cannot look up.
fn validate_env_var_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains('=') || name.contains('\0') {
        bail!(
            "invalid environment variable name '{}'",
            name.escape_default()
        );
    }
    Ok(())
}

fn read_stdin() -> Result<Zeroizing<String>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(Zeroizing::new(String::new()));
    }

    let mut buffer = Zeroizing::new(String::new());
    stdin
        .lock()
        .take(MAX_STDIN_BYTES)
        .read_to_string(&mut buffer)
        .context("failed to read token from stdin")?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_name_validation() {
        assert!(validate_env_var_name("JWT_TOKEN").is_ok());
        for name in ["", "BAD=NAME", "NUL\0"] {
            let err = validate_env_var_name(name).unwrap_err();
            assert!(err.to_string().contains("invalid environment variable name"));
        }
    }

    #[test]
    fn test_read_token_trims_argument() {
        let source = TokenSource {
            token: Some("  a.b.c\n".to_string()),
            token_env: None,
        };
        assert_eq!(read_token(&source).unwrap().as_str(), "a.b.c");
    }

    #[test]
    fn test_read_token_rejects_blank_argument() {
        let source = TokenSource {
            token: Some("   ".to_string()),
            token_env: None,
        };
        let err = read_token(&source).unwrap_err();
        assert!(err.to_string().contains("no token provided"));
    }

    #[test]
    fn test_read_key_without_source_fails() {
        let source = KeySource {
            secret: None,
            secret_env: None,
            key_file: None,
        };
        let err = read_key(&source).unwrap_err();
        assert!(err.to_string().contains("no key supplied"));
    }

    #[test]
    fn test_read_key_classifies_pem_files() {
        let source = KeySource {
            secret: None,
            secret_env: None,
            key_file: Some("tests/fixtures/ec_private.pem".into()),
        };
        assert!(matches!(read_key(&source).unwrap(), KeyMaterial::PrivateKey(_)));

        let source = KeySource {
            key_file: Some("tests/fixtures/ec_public.pem".into()),
            ..source
        };
        assert!(matches!(read_key(&source).unwrap(), KeyMaterial::PublicKey(_)));
    }

    #[test]
    fn test_read_key_missing_file_names_path() {
        let source = KeySource {
            secret: None,
            secret_env: None,
            key_file: Some("tests/fixtures/does_not_exist.pem".into()),
        };
        let err = read_key(&source).unwrap_err();
        assert!(format!("{err:#}").contains("does_not_exist.pem"));
    }
}
