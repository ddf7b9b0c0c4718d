//! Encrypt and decrypt commands.

use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};

use super::args::CryptArgs;
use super::{emit, read_source};
use crate::crypto::{self, CryptoError};

pub fn run_encrypt(args: &CryptArgs) -> Result<()> {
    let source = read_source(&args.file)?;
    if crypto::looks_encrypted(&source) {
        bail!("{} is already encrypted", args.file.display());
    }

    let document =
        crypto::encrypt_article(&source, &args.password).map_err(|e| explain(e, &args.file))?;
    emit(&document, args.output.as_deref())?;
    log!("crypto"; "encrypted {}", args.file.display());
    Ok(())
}

pub fn run_decrypt(args: &CryptArgs) -> Result<()> {
    let source = read_source(&args.file)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .build()
        .context("failed to start async runtime")?;

    let plain = runtime
        .block_on(crypto::decrypt(source, args.password.clone()))
        .map_err(|e| explain(e, &args.file))?;
    emit(&plain, args.output.as_deref())?;
    log!("crypto"; "decrypted {}", args.file.display());
    Ok(())
}

/// Turn a crypto failure into a message that tells a wrong password apart
/// from a damaged file.
pub(crate) fn explain(err: CryptoError, path: &Path) -> anyhow::Error {
    match err {
        CryptoError::Authentication => anyhow!(
            "wrong password for {} (or the content was modified)",
            path.display()
        ),
        CryptoError::Format(reason) => {
            anyhow!("{} is not a valid encrypted post: {reason}", path.display())
        }
        CryptoError::Worker(reason) => anyhow!("could not process {}: {reason}", path.display()),
    }
}
