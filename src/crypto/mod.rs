//! Encrypted posts.
//!
//! An encrypted post keeps its front matter in cleartext and replaces the
//! body with a Base64 envelope:
//!
//! ```text
//! ---
//! title: ...
//! ---
//! <!-- ENCRYPTED CONTENT -->
//! base64( salt[16] ‖ nonce[12] ‖ ciphertext ‖ tag[16] )
//! ```
//!
//! The key is PBKDF2-HMAC-SHA256 (100 000 rounds) over the salt, the cipher
//! AES-256-GCM. Offsets are fixed; nothing in the envelope is length-prefixed.


use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD as BASE64};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use regex::Regex;
use sha2::Sha256;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

pub const SALT_LEN: usize = 16;
pub const NONCE_LEN: usize = 12;
pub const HEADER_LEN: usize = SALT_LEN + NONCE_LEN;
pub const PBKDF2_ROUNDS: u32 = 100_000;
pub const KEY_LEN: usize = 32;

/// Marker line written before the Base64 body.
pub const ENCRYPTED_MARKER: &str = "<!-- ENCRYPTED CONTENT -->";

/// Shortest Base64 text that can hold a header.
const MIN_BASE64_LEN: usize = HEADER_LEN.div_ceil(3) * 4;
const LINE_WIDTH: usize = 76;

static METADATA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A---\n(.*?)\n---\n").unwrap());
static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<!--\s*ENCRYPTED\s*CONTENT\s*-->").unwrap());

/// Accepts unpadded input, like browsers' `atob`.
const FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Error)]
pub enum CryptoError {
    /// The document is not a valid envelope.
    #[error("invalid encrypted content: {0}")]
    Format(String),

    /// Tag check failed: wrong password or tampered data.
    #[error("wrong password or corrupted content (authentication failed)")]
    Authentication,

    #[error("decryption worker failed: {0}")]
    Worker(String),
}

/// Tag name → article paths (`Tags.json`).
pub type TagsIndex = HashMap<String, Vec<String>>;

/// Whether `article` is listed under the encryption tag.
pub fn is_article_encrypted(article: &str, crypto_tag: &str, tags: &TagsIndex) -> bool {
    tags.get(crypto_tag)
        .is_some_and(|articles| articles.iter().any(|a| a == article))
}

pub fn parse_tags_index(json: &str) -> Result<TagsIndex, serde_json::Error> {
    serde_json::from_str(json)
}

/// Whether `document` carries the encrypted-content marker.
pub fn looks_encrypted(document: &str) -> bool {
    MARKER.is_match(document)
}

fn normalize_newlines(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}

/// Split off the leading front matter block, delimiters included.
fn split_metadata(content: &str) -> (&str, &str) {
    match METADATA.find(content) {
        Some(m) => content.split_at(m.end()),
        None => ("", content),
    }
}

fn derive_key(password: &str, salt: &[u8]) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ROUNDS, &mut key);
    key
}

fn cipher(key: &[u8; KEY_LEN]) -> Result<Aes256Gcm, CryptoError> {
    Aes256Gcm::new_from_slice(key).map_err(|e| CryptoError::Format(e.to_string()))
}

// ============================================================================
// Envelope
// ============================================================================

/// A parsed encrypted post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedArticle {
    /// Front matter block as it appears in the file (may be empty).
    pub metadata: String,
    /// `salt ‖ nonce ‖ ciphertext+tag`, at least [`HEADER_LEN`] bytes.
    pub envelope: Vec<u8>,
}

impl EncryptedArticle {
    pub fn parse(document: &str) -> Result<Self, CryptoError> {
        let normalized = normalize_newlines(document);
        let (metadata, body) = split_metadata(&normalized);
        if metadata.is_empty() {
            crate::debug!("crypto"; "no front matter; treating whole document as envelope");
        }

        let body = MARKER.replace_all(body, "");
        let base64: String = body
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
            .collect();
        if base64.len() < MIN_BASE64_LEN {
            return Err(CryptoError::Format(format!(
                "encrypted data is empty or too short ({} Base64 characters)",
                base64.len()
            )));
        }

        let envelope = FORGIVING
            .decode(base64.as_bytes())
            .map_err(|e| CryptoError::Format(format!("Base64: {e}")))?;
        if envelope.len() < HEADER_LEN {
            return Err(CryptoError::Format(format!(
                "envelope is {} bytes, need at least {HEADER_LEN}",
                envelope.len()
            )));
        }

        Ok(Self {
            metadata: metadata.to_string(),
            envelope,
        })
    }

    pub fn salt(&self) -> &[u8] {
        &self.envelope[..SALT_LEN]
    }

    pub fn nonce(&self) -> &[u8] {
        &self.envelope[SALT_LEN..HEADER_LEN]
    }

    /// Ciphertext with the GCM tag appended.
    pub fn ciphertext(&self) -> &[u8] {
        &self.envelope[HEADER_LEN..]
    }

    /// Decrypt the body and put the front matter back in front of it.
    pub fn decrypt(&self, password: &str) -> Result<String, CryptoError> {
        let key = derive_key(password, self.salt());
        let plaintext = cipher(&key)?
            .decrypt(Nonce::from_slice(self.nonce()), self.ciphertext())
            .map_err(|_| CryptoError::Authentication)?;

        let mut out = self.metadata.clone();
        out.push_str(&String::from_utf8_lossy(&plaintext));
        Ok(out)
    }
}

// ============================================================================
// Operations
// ============================================================================

/// Decrypt on the calling thread. Key derivation takes a noticeable moment.
pub fn decrypt_blocking(document: &str, password: &str) -> Result<String, CryptoError> {
    let article = EncryptedArticle::parse(document)?;
    crate::debug!("crypto"; "envelope: {} bytes", article.envelope.len());
    article.decrypt(password)
}

/// Decrypt on tokio's blocking pool.
pub async fn decrypt(document: String, password: String) -> Result<String, CryptoError> {
    tokio::task::spawn_blocking(move || decrypt_blocking(&document, &password))
        .await
        .map_err(|e| CryptoError::Worker(e.to_string()))?
}

/// Encrypt the body of `markdown` with a fresh salt and nonce.
pub fn encrypt_article(markdown: &str, password: &str) -> Result<String, CryptoError> {
    let mut salt = [0u8; SALT_LEN];
    let mut nonce = [0u8; NONCE_LEN];
    let mut rng = rand::thread_rng();
    rng.fill_bytes(&mut salt);
    rng.fill_bytes(&mut nonce);
    encrypt_with(markdown, password, &salt, &nonce)
}

/// Encrypt with a caller-chosen salt and nonce.
///
/// Reusing a nonce with the same password breaks GCM; this exists for
/// reproducible fixtures.
pub fn encrypt_with(
    markdown: &str,
    password: &str,
    salt: &[u8; SALT_LEN],
    nonce: &[u8; NONCE_LEN],
) -> Result<String, CryptoError> {
    let normalized = normalize_newlines(markdown);
    let (metadata, body) = split_metadata(&normalized);

    let key = derive_key(password, salt);
    let ciphertext = cipher(&key)?
        .encrypt(Nonce::from_slice(nonce), body.as_bytes())
        .map_err(|e| CryptoError::Format(e.to_string()))?;

    let mut envelope = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    envelope.extend_from_slice(salt);
    envelope.extend_from_slice(nonce);
    envelope.extend_from_slice(&ciphertext);

    let encoded = BASE64.encode(&envelope);
    let mut out = format!("{metadata}{ENCRYPTED_MARKER}\n");
    for line in encoded.as_bytes().chunks(LINE_WIDTH) {
        // Base64 output is ASCII
        out.push_str(&String::from_utf8_lossy(line));
        out.push('\n');
    }
    Ok(out)
}
