//! Edit session management module
//!
//! This module contains:
//! - Session state: source, history and request lifecycle
//! - Message types for studio interactions
//! - Submission and lookup errors

pub mod error;
pub mod messages;
pub mod state;

pub use error::{OFFLINE_MESSAGE, SessionError, SubmitError};
pub use messages::{MaskMsg, Msg, PointerEvent, SourceMsg, SubmitMsg};
pub use state::{Dispatch, EditSession, RequestState, RequestTicket, SubmitOptions};
