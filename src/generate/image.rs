//! Image byte resolution for generation.
//!
//! The single suspending operation of the pipeline: `http(s)` URLs are
//! fetched over the network, `data:` URIs are decoded in place. A failed
//! resolution is permanent for the current run; the walker degrades the
//! drawing to a placeholder run instead of retrying.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::common::error::{Error, Result};

/// Image container formats accepted for embedding, detected from magic
/// bytes. Anything else degrades to a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
}

impl ImageFormat {
    /// Detect the container format from its byte signature.
    pub fn detect_from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 8 {
            return None;
        }
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }
        if data.starts_with(b"BM") {
            return Some(Self::Bmp);
        }
        None
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
        }
    }
}

/// Resolve an image URL to raw bytes. No retries.
pub async fn resolve_bytes(url: &str) -> Result<Vec<u8>> {
    if let Some(rest) = url.strip_prefix("data:") {
        return decode_data_uri(rest);
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        let response = reqwest::get(url)
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::Other(format!("image fetch failed: {e}")))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Other(format!("image fetch failed: {e}")))?;
        return Ok(bytes.to_vec());
    }
    Err(Error::Unsupported(format!("image url scheme: {url}")))
}

fn decode_data_uri(rest: &str) -> Result<Vec<u8>> {
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::InvalidFormat("data URI without payload".to_string()))?;
    if !meta.ends_with(";base64") {
        return Err(Error::Unsupported("non-base64 data URI".to_string()));
    }
    BASE64
        .decode(payload.trim())
        .map_err(|e| Error::InvalidFormat(format!("data URI payload: {e}")))
}
