//! Edit session: source image, result history and the single in-flight request

use chrono::Utc;

use crate::config::{AspectRatio, MaskSelectionPolicy, Resolution};
use crate::domain::{
    HistoryNode, HistorySequence, MaskImage, NodeId, NodeIdGenerator, Source, SourceImage,
};
use crate::generation::{
    GenerationError, GenerationRequest, GenerationResponse, Generator, effective_prompt,
};

use super::error::{OFFLINE_MESSAGE, SessionError, SubmitError};

/// Lifecycle of the current (or last) request
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed(String),
}

/// Identifies one accepted submission; completions carrying a stale ticket are dropped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestTicket(u64);

/// Per-submission options chosen by the user
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmitOptions {
    pub resolution: Resolution,
    pub aspect_ratio: Option<AspectRatio>,
    /// Generate from text alone, without sending the source image
    pub from_scratch: bool,
}

impl SubmitOptions {
    /// Edit the current source
    pub fn edit(resolution: Resolution) -> Self {
        Self {
            resolution,
            aspect_ratio: None,
            from_scratch: false,
        }
    }

    /// Generate a new image from text alone
    pub fn scratch(resolution: Resolution, aspect_ratio: AspectRatio) -> Self {
        Self {
            resolution,
            aspect_ratio: Some(aspect_ratio),
            from_scratch: true,
        }
    }
}

/// An accepted submission, ready to hand to the generator
#[derive(Clone, Debug, PartialEq)]
pub struct Dispatch {
    pub ticket: RequestTicket,
    pub request: GenerationRequest,
}

#[derive(Clone, Debug)]
struct PendingRequest {
    ticket: RequestTicket,
    prompt: String,
    from_scratch: bool,
}

/// Owns the source, the append-only history and the request lifecycle
///
/// Every operation that replaces the source goes through the same
/// invalidation: history emptied, no active node, no message or error, no
/// mask, request state back to idle.
#[derive(Debug, Default)]
pub struct EditSession {
    source: Option<Source>,
    history: HistorySequence,
    ids: NodeIdGenerator,
    state: RequestState,
    message: Option<String>,
    mask: Option<MaskImage>,
    pending: Option<PendingRequest>,
    next_ticket: u64,
    mask_policy: MaskSelectionPolicy,
}

impl EditSession {
    pub fn new(mask_policy: MaskSelectionPolicy) -> Self {
        Self {
            mask_policy,
            ..Default::default()
        }
    }

    pub fn source(&self) -> Option<&Source> {
        self.source.as_ref()
    }

    pub fn history(&self) -> &HistorySequence {
        &self.history
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == RequestState::Pending
    }

    /// Text returned by the generator instead of an image
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Error of the last failed request
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            RequestState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn mask(&self) -> Option<&MaskImage> {
        self.mask.as_ref()
    }

    pub fn mask_policy(&self) -> MaskSelectionPolicy {
        self.mask_policy
    }

    /// The result currently displayed
    pub fn active_node(&self) -> Option<&HistoryNode> {
        self.history.active()
    }

    /// Whether the prompt box applies: a real source exists to edit
    pub fn can_edit(&self) -> bool {
        matches!(self.source, Some(Source::Image(_)))
    }

    /// Replace the mask constraint for the next submission
    pub fn set_mask(&mut self, mask: Option<MaskImage>) {
        self.mask = mask;
    }

    pub fn set_source_image(&mut self, image: SourceImage) {
        log::info!("New source image ({})", image.media_type());
        self.invalidate();
        self.source = Some(Source::Image(image));
    }

    /// Drop the source and everything derived from it
    pub fn reset(&mut self) {
        log::info!("Session reset");
        self.invalidate();
        self.source = None;
    }

    /// Make a result the new source image ("Edit this")
    pub fn promote_result_as_source(&mut self, id: NodeId) -> Result<(), SessionError> {
        let node = self.history.get(id).ok_or(SessionError::UnknownNode(id))?;
        let image = SourceImage::new(node.image.clone());
        log::info!("Promoting history node {} to source", id);
        self.set_source_image(image);
        Ok(())
    }

    /// Show another result
    ///
    /// Returns whether the mask was dropped, which depends on the configured
    /// policy. Reselecting the active node never drops it.
    pub fn select_history_node(&mut self, id: NodeId) -> Result<bool, SessionError> {
        let previous = self.history.active_id();
        if !self.history.select(id) {
            return Err(SessionError::UnknownNode(id));
        }
        self.message = None;
        if matches!(self.state, RequestState::Failed(_)) {
            self.state = RequestState::Idle;
        }
        let clear_mask = self.mask_policy == MaskSelectionPolicy::Clear
            && previous != Some(id)
            && self.mask.is_some();
        if clear_mask {
            self.mask = None;
        }
        Ok(clear_mask)
    }

    /// Validate a submission and move to `Pending`
    ///
    /// Empty prompts, submissions while pending and edits without a real
    /// source are rejected without any state change. Offline submissions fail
    /// with a fixed message.
    pub fn begin_submit(
        &mut self,
        prompt: &str,
        options: SubmitOptions,
        online: bool,
    ) -> Result<Dispatch, SubmitError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(SubmitError::EmptyPrompt);
        }
        if self.is_pending() {
            log::debug!("Submission rejected, request already pending");
            return Err(SubmitError::RequestPending);
        }
        if !options.from_scratch && !self.can_edit() {
            log::debug!("Edit rejected, no source image");
            return Err(SubmitError::NoSource);
        }
        if !online {
            log::warn!("Submission rejected, offline");
            self.state = RequestState::Failed(OFFLINE_MESSAGE.to_string());
            return Err(SubmitError::Offline);
        }

        let source = if options.from_scratch {
            None
        } else {
            self.source.as_ref().and_then(Source::payload).cloned()
        };
        let request = GenerationRequest {
            prompt: effective_prompt(prompt, self.mask.is_some()),
            source,
            mask: self.mask.as_ref().map(|m| m.encoded().clone()),
            resolution: options.resolution,
            aspect_ratio: if options.from_scratch {
                options.aspect_ratio
            } else {
                None
            },
        };

        self.next_ticket += 1;
        let ticket = RequestTicket(self.next_ticket);
        self.pending = Some(PendingRequest {
            ticket,
            prompt: prompt.to_string(),
            from_scratch: options.from_scratch,
        });
        self.state = RequestState::Pending;
        self.message = None;

        log::info!(
            "Dispatching request {:?} ({}, source: {}, mask: {})",
            ticket,
            request.resolution,
            request.source.is_some(),
            request.mask.is_some()
        );
        Ok(Dispatch { ticket, request })
    }

    /// Apply the generator's outcome for `ticket`
    ///
    /// Returns false if the ticket no longer matches the pending request, in
    /// which case nothing changes.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<GenerationResponse, GenerationError>,
    ) -> bool {
        let Some(pending) = self.pending.take_if(|p| p.ticket == ticket) else {
            log::warn!("Discarding stale completion for {:?}", ticket);
            return false;
        };

        match outcome {
            Ok(GenerationResponse {
                image: Some(image), ..
            }) => {
                let now = Utc::now();
                let node = HistoryNode {
                    id: self.ids.next(now),
                    image,
                    prompt: pending.prompt,
                    created_at: now,
                };
                log::info!("Request {:?} produced history node {}", ticket, node.id);
                self.history.push(node);
                self.state = RequestState::Succeeded;
                if pending.from_scratch && self.source.is_none() {
                    self.source = Some(Source::Genesis);
                }
            }
            Ok(GenerationResponse {
                image: None,
                text: Some(text),
            }) => {
                log::info!("Request {:?} returned text only", ticket);
                self.message = Some(text);
                self.state = RequestState::Succeeded;
            }
            Ok(GenerationResponse {
                image: None,
                text: None,
            }) => self.fail(ticket, GenerationError::EmptyResponse),
            Err(err) => self.fail(ticket, err),
        }
        true
    }

    /// Submit and wait for the generator, in one step
    pub async fn submit_edit<G: Generator + ?Sized>(
        &mut self,
        generator: &G,
        prompt: &str,
        options: SubmitOptions,
        online: bool,
    ) -> Result<(), SubmitError> {
        let Dispatch { ticket, request } = self.begin_submit(prompt, options, online)?;
        let outcome = generator.generate(request).await;
        self.complete(ticket, outcome);
        Ok(())
    }

    fn fail(&mut self, ticket: RequestTicket, err: GenerationError) {
        log::warn!("Request {:?} failed: {}", ticket, err);
        self.state = RequestState::Failed(err.display_message());
    }

    fn invalidate(&mut self) {
        self.history.clear();
        self.message = None;
        self.mask = None;
        self.pending = None;
        self.state = RequestState::Idle;
    }
}
