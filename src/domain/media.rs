//! Encoded image values exchanged between the session and its collaborators

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::RgbaImage;

/// Media type used for masks and for promoted results without a known type
pub const PNG_MEDIA_TYPE: &str = "image/png";

/// An encoded image payload together with its media type
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub media_type: String,
}

impl EncodedImage {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
        }
    }

    /// Base64 form used on the wire
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    /// Display-ready `data:` URL
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.to_base64())
    }
}

/// The image the user is editing
///
/// Immutable once created; the session replaces it wholesale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceImage {
    preview: String,
    payload: EncodedImage,
}

impl SourceImage {
    pub fn new(payload: EncodedImage) -> Self {
        let preview = payload.to_data_url();
        Self { preview, payload }
    }

    /// Display-ready representation
    pub fn preview(&self) -> &str {
        &self.preview
    }

    /// Raw encoded payload sent to the generator
    pub fn payload(&self) -> &EncodedImage {
        &self.payload
    }

    pub fn media_type(&self) -> &str {
        &self.payload.media_type
    }
}

/// The live source of an edit session
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// A real image supplied by the user or promoted from a result
    Image(SourceImage),
    /// Placeholder after a from-scratch generation; there is no original to compare
    Genesis,
}

impl Source {
    /// Payload to send with an edit, if any
    pub fn payload(&self) -> Option<&EncodedImage> {
        match self {
            Source::Image(image) => Some(image.payload()),
            Source::Genesis => None,
        }
    }

    pub fn is_genesis(&self) -> bool {
        matches!(self, Source::Genesis)
    }
}

/// Binary region mask derived from the user's strokes
///
/// Every pixel is exactly opaque black or opaque white.
#[derive(Clone, Debug, PartialEq)]
pub struct MaskImage {
    raster: RgbaImage,
    encoded: EncodedImage,
}

impl MaskImage {
    pub(crate) fn new(raster: RgbaImage, png: Vec<u8>) -> Self {
        Self {
            raster,
            encoded: EncodedImage::new(png, PNG_MEDIA_TYPE),
        }
    }

    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    /// PNG encoding for transmission
    pub fn encoded(&self) -> &EncodedImage {
        &self.encoded
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// Number of pixels classified as part of the masked region
    pub fn selected_pixels(&self) -> usize {
        self.raster.pixels().filter(|p| p.0[0] == 255).count()
    }

    /// Whether no pixel is selected
    pub fn is_blank(&self) -> bool {
        self.selected_pixels() == 0
    }
}
