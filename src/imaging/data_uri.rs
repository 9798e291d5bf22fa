//! `data:` URIs: the displayable form of an encoded image.
//!
//! Only the base64 form (`data:<mime>;base64,<payload>`) is produced or
//! accepted; that is what image sources and the transformation service use.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataUriError {
    #[error("not a data: URI")]
    NotDataUri,
    #[error("data: URI is not base64-encoded")]
    NotBase64,
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),
}

/// A decoded `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Build `data:<mime>;base64,<payload>` from raw bytes.
pub fn encode_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    let payload = STANDARD.encode(bytes);
    let mut uri =
        String::with_capacity(SCHEME.len() + mime_type.len() + BASE64_MARKER.len() + 1 + payload.len());
    uri.push_str(SCHEME);
    uri.push_str(mime_type);
    uri.push_str(BASE64_MARKER);
    uri.push(',');
    uri.push_str(&payload);
    uri
}

/// Wrap an already base64-encoded payload as a `data:` URI.
pub fn wrap_base64(mime_type: &str, base64: &str) -> String {
    format!("{SCHEME}{mime_type}{BASE64_MARKER},{base64}")
}

/// Whether `uri` uses the `data:` scheme (case-insensitive).
pub fn is_data_uri(uri: &str) -> bool {
    uri.get(..SCHEME.len())
        .is_some_and(|s| s.eq_ignore_ascii_case(SCHEME))
}

/// Split and decode a base64 `data:` URI.
pub fn decode_data_uri(uri: &str) -> Result<DataUri, DataUriError> {
    if !is_data_uri(uri) {
        return Err(DataUriError::NotDataUri);
    }
    let rest = &uri[SCHEME.len()..];
    let (header, payload) = rest.split_once(',').ok_or(DataUriError::NotDataUri)?;
    let mime_type = header
        .strip_suffix(BASE64_MARKER)
        .ok_or(DataUriError::NotBase64)?;
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| DataUriError::InvalidBase64(e.to_string()))?;
    Ok(DataUri {
        mime_type: mime_type.to_string(),
        bytes,
    })
}
