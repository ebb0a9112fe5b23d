//! Boundary with the generative image backend
//!
//! The backend itself is external; this module defines the request and
//! response shapes, the error kinds, and the `Generator` trait the session
//! dispatches through.

pub mod prompts;
#[cfg(test)]
pub(crate) mod testing;

use futures::future::BoxFuture;

use crate::config::{AspectRatio, Resolution};
use crate::domain::EncodedImage;

/// Everything the backend needs for one edit or generation
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    /// Prompt as sent, already rewritten for masked edits
    pub prompt: String,
    /// Image being edited; absent for from-scratch generation
    pub source: Option<EncodedImage>,
    /// Opaque black/white PNG marking the editable region
    pub mask: Option<EncodedImage>,
    pub resolution: Resolution,
    /// Only set for from-scratch generation
    pub aspect_ratio: Option<AspectRatio>,
}

impl GenerationRequest {
    pub fn is_from_scratch(&self) -> bool {
        self.source.is_none()
    }
}

/// What the backend returned; an image wins over text when both are present
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationResponse {
    pub image: Option<EncodedImage>,
    pub text: Option<String>,
}

impl GenerationResponse {
    pub fn image(image: EncodedImage) -> Self {
        Self {
            image: Some(image),
            text: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            image: None,
            text: Some(text.into()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// The backend call failed; the message is shown as is
    #[error("{0}")]
    Backend(String),
    #[error("The model did not return an image or text.")]
    EmptyResponse,
}

/// Shown when a failure carries no usable message
pub const GENERIC_FAILURE: &str = "Failed to process. Please try again.";

impl GenerationError {
    /// Message for display, never blank
    pub fn display_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_FAILURE.to_string()
        } else {
            message
        }
    }
}

/// The external generation collaborator
///
/// One call per submission; the session never retries.
pub trait Generator {
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> BoxFuture<'static, Result<GenerationResponse, GenerationError>>;
}

/// Prompt actually sent to the backend
pub fn effective_prompt(prompt: &str, masked: bool) -> String {
    if masked {
        format!("Apply this change to the masked area: {prompt}")
    } else {
        prompt.to_string()
    }
}
