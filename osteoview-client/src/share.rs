//! Share-link payload encoding
//!
//! A share link embeds a base64-encoded JSON payload of the model id and its
//! annotations in a URL query parameter. Decoding is defensive: malformed
//! tokens produce a [`ClientError::MalformedShare`] the viewer can surface,
//! never a panic, and leave viewer state untouched.

use crate::error::{ClientError, ClientResult};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use osteoview_core::Annotation;
use serde::{Deserialize, Serialize};

/// The payload carried by a share link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharePayload {
    pub model_id: i64,
    pub annotations: Vec<Annotation>,
}

/// Encode a share payload into a URL-safe token
pub fn encode_share(payload: &SharePayload) -> String {
    // Serializing our own types cannot fail.
    let json = serde_json::to_vec(payload).expect("share payload serializes");
    URL_SAFE_NO_PAD.encode(json)
}

/// Decode a share token back into its payload
pub fn decode_share(token: &str) -> ClientResult<SharePayload> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token.trim())
        .map_err(|e| ClientError::MalformedShare(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::MalformedShare(e.to_string()))
}
