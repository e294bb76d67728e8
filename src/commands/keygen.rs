//! Handler for the `keygen` subcommand.
//!
//! Generates an HMAC secret or an RSA/EC key pair and prints it, or
//! writes it to the requested files. Private material is written with
//! owner-only permissions on Unix.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use jwt_codec::core::KeyMaterial;
use jwt_codec::core::keys::{generate, pem_for_file};
use tracing::debug;
use zeroize::Zeroizing;

use crate::cli::KeygenArgs;

/// Execute the `keygen` subcommand with the given arguments.
pub fn execute(args: &KeygenArgs) -> Result<()> {
    check_outputs(args)?;

    let started = Instant::now();
    let material = generate(args.kind)?;
    debug!(kind = %args.kind, elapsed = ?started.elapsed(), "key material generated");

    match material {
        KeyMaterial::Secret(secret) => {
            emit(args.secret_out.as_deref(), &secret, "secret", true)?;
        }
        KeyMaterial::KeyPair {
            private_key_pem,
            public_key_pem,
        } => {
            emit(args.private_out.as_deref(), &private_key_pem, "private key", true)?;
            emit(args.public_out.as_deref(), &public_key_pem, "public key", false)?;
        }
        other => bail!("key generation produced an unexpected {}", other.kind()),
    }
    Ok(())
}

/// Output files must match the kind of material being generated.
fn check_outputs(args: &KeygenArgs) -> Result<()> {
    if args.kind.is_asymmetric() {
        if args.secret_out.is_some() {
            bail!(
                "--secret-out only applies to HMAC secrets; use --private-out and --public-out for {}",
                args.kind
            );
        }
    } else if args.private_out.is_some() || args.public_out.is_some() {
        bail!(
            "--private-out and --public-out only apply to key pairs; use --secret-out for {}",
            args.kind
        );
    }
    Ok(())
}

fn emit(path: Option<&Path>, text: &str, what: &str, private: bool) -> Result<()> {
    let contents = Zeroizing::new(pem_for_file(text));
    match path {
        Some(path) => {
            write_file(path, &contents, private)
                .with_context(|| format!("failed to write {what} to '{}'", path.display()))?;
            eprintln!("Wrote {what} to {}", path.display());
        }
        None => print!("{}", contents.as_str()),
    }
    Ok(())
}

fn write_file(path: &Path, contents: &str, private: bool) -> std::io::Result<()> {
    if !private {
        return fs::write(path, contents);
    }

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)?.write_all(contents.as_bytes())
}
