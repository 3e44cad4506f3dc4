//! Service-account credential handling.
//!
//! The deployment passes the key material either as a base64-encoded
//! document or as a path to a key file on disk. Either way the
//! resolved secret lives in exactly one place, the `Credential` value
//! handed to the directory client, and is redacted from all
//! `Debug`/`Display` output.

use std::fmt;
use std::fs;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::{DirectoryError, DirectoryResult};

/// Resolved service-account key material.
#[derive(Clone)]
pub struct Credential {
    secret: String,
}

impl Credential {
    /// Resolve raw credential input: a base64-encoded key document,
    /// or a filesystem path to one.
    pub fn load(raw: &str) -> DirectoryResult<Self> {
        if let Some(decoded) = decode_base64(raw) {
            return Ok(Self { secret: decoded });
        }
        let path = Path::new(raw);
        if path.is_file() {
            let secret = fs::read_to_string(path)
                .map_err(|e| DirectoryError::Credential(format!("cannot read key file: {e}")))?;
            return Ok(Self { secret });
        }
        Err(DirectoryError::Credential(
            "credential is neither a base64-encoded key nor a path to a key file".to_string(),
        ))
    }

    /// The bearer secret sent to the directory API. Crate-private so
    /// it cannot leak past the HTTP client.
    pub(crate) fn bearer(&self) -> &str {
        &self.secret
    }

    /// Short prefix safe to include in parameter logs.
    pub fn redacted(&self) -> String {
        let prefix: String = self.secret.chars().take(9).collect();
        format!("{prefix}...")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// Strict base64 probe: accept only input that survives a
/// decode/encode round trip, so a key-file path is never mistaken
/// for base64.
fn decode_base64(raw: &str) -> Option<String> {
    let bytes = BASE64.decode(raw.as_bytes()).ok()?;
    if BASE64.encode(&bytes) != raw {
        return None;
    }
    String::from_utf8(bytes).ok()
}
