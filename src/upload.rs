//! Upload intake: validates user-supplied images before they become a source

use std::path::Path;

use anyhow::Context;

use crate::domain::{EncodedImage, SourceImage};

/// Largest accepted upload
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("Please select a valid image file (JPEG, PNG, WebP).")]
    NotAnImage,
    #[error("Image is too large. Please select an image under 10MB.")]
    TooLarge,
}

/// Accept already-encoded bytes with their declared media type
pub fn intake(bytes: Vec<u8>, media_type: &str) -> Result<SourceImage, UploadError> {
    if !media_type.starts_with("image/") {
        return Err(UploadError::NotAnImage);
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge);
    }
    log::debug!("Accepted upload: {} bytes of {}", bytes.len(), media_type);
    Ok(SourceImage::new(EncodedImage::new(bytes, media_type)))
}

/// Read an image file, inferring its media type from the content
pub fn intake_file(path: &Path) -> anyhow::Result<SourceImage> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read image: {}", path.display()))?;
    let media_type = image::guess_format(&bytes)
        .map(|format| format.to_mime_type())
        .map_err(|_| UploadError::NotAnImage)
        .with_context(|| format!("Unrecognized image: {}", path.display()))?;
    Ok(intake(bytes, media_type)?)
}
