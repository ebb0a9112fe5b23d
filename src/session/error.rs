//! Error kinds raised at the edit session boundary

use crate::domain::NodeId;

/// Fixed message for submissions while disconnected
pub const OFFLINE_MESSAGE: &str = "You are currently offline. Please reconnect.";

/// Why a submission was not dispatched
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// Prompt was empty after trimming; nothing changed
    #[error("prompt is empty")]
    EmptyPrompt,
    /// Another request is still pending; nothing changed
    #[error("a request is already in progress")]
    RequestPending,
    /// Edit requested without a real source image; nothing changed
    #[error("there is no source image to edit")]
    NoSource,
    /// Disconnected; the request state was set to failed
    #[error("You are currently offline. Please reconnect.")]
    Offline,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("no history node with id {0}")]
    UnknownNode(NodeId),
}
