//! Inline media encoding
//!
//! Turns uploaded videos into base64 payloads that can be embedded in a
//! JSON request body.

use super::error::EncodingError;
use super::types::{MediaPayload, VideoUpload};
use base64::Engine;
use mime_guess::Mime;

/// Read a video from disk and encode it
pub async fn encode_video(video: &VideoUpload) -> Result<MediaPayload, EncodingError> {
    // Validate first so a bad declaration never costs a full read
    validate_mime(&video.mime_type)?;

    let data = tokio::fs::read(&video.path)
        .await
        .map_err(|source| EncodingError::Read {
            path: video.path.clone(),
            source,
        })?;

    tracing::debug!(
        path = %video.path.display(),
        mime_type = %video.mime_type,
        bytes = data.len(),
        "Encoding video"
    );

    encode_bytes(&data, &video.mime_type)
}

/// Encode in-memory bytes under the given media type
pub fn encode_bytes(data: &[u8], mime_type: &str) -> Result<MediaPayload, EncodingError> {
    validate_mime(mime_type)?;

    Ok(MediaPayload {
        mime_type: mime_type.to_string(),
        data: base64::engine::general_purpose::STANDARD.encode(data),
    })
}

fn validate_mime(mime_type: &str) -> Result<(), EncodingError> {
    if mime_type.trim().is_empty() || mime_type.parse::<Mime>().is_err() {
        return Err(EncodingError::InvalidMediaType(mime_type.to_string()));
    }
    Ok(())
}
