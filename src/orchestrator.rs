// codegen-preview: Request orchestration and view-state machine
//
// State machine:
//
//   Loading --(service success)--> Success
//   Loading --(service failure)--> Failure
//   Success | Failure --(select_format | confirm_configuration)--> Loading
//
// The orchestrator never awaits. Every transition into Loading hands back a
// `Ticket`; whoever owns the orchestrator dispatches it and feeds the outcome
// back through `complete`. Only the most recently issued ticket may change
// the view, so the last request issued wins regardless of arrival order.

use crate::clipboard::Clipboard;
use crate::format::Format;
use crate::service::{GenerationRequest, GenerationResult, ServiceError};
use crate::workflow::WorkflowDefinition;

pub const LOADING_TEXT: &str = "Loading...";
pub const COPY_ACK: &str = "Code copied to clipboard!";
pub const NOTHING_TO_COPY: &str = "No code to copy yet";

/// Current display mode. Each variant owns exactly the data it displays.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Loading,
    Success(GenerationResult),
    Failure(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub selected_format: Format,
    pub base_url: String,
    pub mode: Mode,
}

impl ViewState {
    /// Text for the code panel.
    pub fn displayed_text(&self) -> &str {
        match &self.mode {
            Mode::Loading => LOADING_TEXT,
            Mode::Success(result) => &result.code,
            Mode::Failure(message) => message,
        }
    }

    /// Payload for the payload panel; absent unless the last request succeeded.
    pub fn displayed_payload(&self) -> Option<&serde_json::Value> {
        match &self.mode {
            Mode::Success(result) => Some(&result.payload),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&GenerationResult> {
        match &self.mode {
            Mode::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.mode {
            Mode::Failure(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.mode, Mode::Loading)
    }
}

/// One outbound request the caller must dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub seq: u64,
    pub request: GenerationRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer ticket was issued after this one; the outcome was dropped.
    Stale { latest: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    NothingToCopy,
}

impl CopyOutcome {
    pub fn notice(self) -> &'static str {
        match self {
            CopyOutcome::Copied => COPY_ACK,
            CopyOutcome::NothingToCopy => NOTHING_TO_COPY,
        }
    }
}

pub struct Orchestrator {
    state: ViewState,
    workflow: WorkflowDefinition,
    latest_seq: u64,
}

impl Orchestrator {
    /// Create the session and perform the entry action: go to Loading and
    /// request code for the initial format.
    pub fn start(
        workflow: WorkflowDefinition,
        format: Format,
        base_url: impl Into<String>,
    ) -> (Self, Ticket) {
        let mut orchestrator = Self {
            state: ViewState {
                selected_format: format,
                base_url: base_url.into(),
                mode: Mode::Loading,
            },
            workflow,
            latest_seq: 0,
        };
        let ticket = orchestrator.regenerate();
        (orchestrator, ticket)
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Sequence number of the most recently issued ticket.
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Always regenerates, even when `format` is already selected.
    pub fn select_format(&mut self, format: Format) -> Ticket {
        self.state.selected_format = format;
        self.regenerate()
    }

    /// Stores the new base URL without requesting anything.
    pub fn update_base_url(&mut self, url: impl Into<String>) {
        self.state.base_url = url.into();
    }

    pub fn confirm_configuration(&mut self) -> Ticket {
        self.regenerate()
    }

    fn regenerate(&mut self) -> Ticket {
        self.latest_seq += 1;
        self.state.mode = Mode::Loading;

        let ticket = Ticket {
            seq: self.latest_seq,
            request: GenerationRequest {
                workflow: self.workflow.clone(),
                language: self.state.selected_format,
                base_url: self.state.base_url.clone(),
            },
        };

        tracing::debug!(
            seq = ticket.seq,
            format = %ticket.request.language,
            base_url = %ticket.request.base_url,
            "Issuing generation request"
        );
        ticket
    }

    /// Reconcile the outcome of ticket `seq` into the view.
    pub fn complete(
        &mut self,
        seq: u64,
        outcome: Result<GenerationResult, ServiceError>,
    ) -> Completion {
        if seq != self.latest_seq {
            tracing::debug!(seq, latest = self.latest_seq, "Discarding superseded response");
            return Completion::Stale {
                latest: self.latest_seq,
            };
        }

        self.state.mode = match outcome {
            Ok(result) => {
                tracing::info!(seq, format = %self.state.selected_format, "Code generated");
                Mode::Success(result)
            }
            Err(e) => {
                tracing::warn!(seq, error = %e, "Code generation failed");
                Mode::Failure(e.user_message())
            }
        };
        Completion::Applied
    }

    /// Copy the displayed code. The acknowledgment does not depend on whether
    /// the clipboard write itself succeeded.
    pub fn copy_current_code(&self, clipboard: &mut dyn Clipboard) -> CopyOutcome {
        let Some(result) = self.state.result() else {
            return CopyOutcome::NothingToCopy;
        };
        if let Err(e) = clipboard.copy(&result.code) {
            tracing::warn!(error = %e, "Clipboard write failed");
        }
        CopyOutcome::Copied
    }
}
