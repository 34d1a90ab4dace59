// codegen-preview: Async dispatch loop around the orchestrator
//
// The driver is the single owner of the orchestrator. Tickets run on tokio
// tasks; their outcomes come back over a channel and are applied one at a
// time by whoever holds the driver, so view mutations never interleave.

use crate::clipboard::Clipboard;
use crate::format::Format;
use crate::orchestrator::{Completion, CopyOutcome, Orchestrator, Ticket, ViewState};
use crate::service::{CodegenService, GenerationResult, ServiceError};
use crate::workflow::WorkflowDefinition;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Outcome of one dispatched ticket.
#[derive(Debug)]
pub struct Finished {
    pub seq: u64,
    pub outcome: Result<GenerationResult, ServiceError>,
}

pub struct Driver {
    orchestrator: Orchestrator,
    service: Arc<dyn CodegenService>,
    tx: mpsc::UnboundedSender<Finished>,
    rx: mpsc::UnboundedReceiver<Finished>,
    in_flight: usize,
}

impl Driver {
    /// Start a session and dispatch the initial request. Must be called
    /// inside a tokio runtime.
    pub fn start(
        service: Arc<dyn CodegenService>,
        workflow: WorkflowDefinition,
        format: Format,
        base_url: impl Into<String>,
    ) -> Self {
        let (orchestrator, ticket) = Orchestrator::start(workflow, format, base_url);
        let (tx, rx) = mpsc::unbounded_channel();
        let mut driver = Self {
            orchestrator,
            service,
            tx,
            rx,
            in_flight: 0,
        };
        driver.dispatch(ticket);
        driver
    }

    pub fn state(&self) -> &ViewState {
        self.orchestrator.state()
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Requests issued but not yet received back, superseded ones included.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn select_format(&mut self, format: Format) {
        let ticket = self.orchestrator.select_format(format);
        self.dispatch(ticket);
    }

    pub fn update_base_url(&mut self, url: impl Into<String>) {
        self.orchestrator.update_base_url(url);
    }

    pub fn confirm_configuration(&mut self) {
        let ticket = self.orchestrator.confirm_configuration();
        self.dispatch(ticket);
    }

    pub fn copy_current_code(&self, clipboard: &mut dyn Clipboard) -> CopyOutcome {
        self.orchestrator.copy_current_code(clipboard)
    }

    fn dispatch(&mut self, ticket: Ticket) {
        let Ticket { seq, request } = ticket;
        let service = self.service.clone();
        let tx = self.tx.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let outcome = service.generate(&request).await;
            // Receiver only goes away when the session ends.
            let _ = tx.send(Finished { seq, outcome });
        });
    }

    fn apply(&mut self, finished: Finished) -> Completion {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.orchestrator.complete(finished.seq, finished.outcome)
    }

    /// Apply every outcome that has already arrived. Never blocks.
    pub fn poll_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(finished) = self.rx.try_recv() {
            self.apply(finished);
            applied += 1;
        }
        applied
    }

    /// Wait for the next outcome to arrive and apply it.
    /// Returns `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        if self.in_flight == 0 {
            return None;
        }
        let finished = self.rx.recv().await?;
        Some(self.apply(finished))
    }

    /// Wait until the latest request has been reconciled into the view.
    pub async fn settle(&mut self) -> &ViewState {
        while self.state().is_loading() {
            if self.next_completion().await.is_none() {
                break;
            }
        }
        self.state()
    }
}
