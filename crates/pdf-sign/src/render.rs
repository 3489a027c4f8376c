//! Render readiness gate
//!
//! Geometry may only be read once every page of the current document has been
//! rendered and the renderer has published the geometry it actually laid
//! out. The renderer reports completion explicitly; nothing here relies on
//! frame timing.
//!
//! Each [`RenderGate::begin`] starts a new generation. Tickets from earlier
//! generations (a replaced or closed document) are ignored.

use crate::geometry::{LayoutSnapshot, PageGeometryProvider};
use crate::types::*;
use std::sync::Arc;
use tokio::sync::watch;

/// Lifecycle of the page surface
#[derive(Debug, Clone, PartialEq)]
pub enum RenderStatus {
    Preparing,
    Rendering { rendered: usize, total: usize },
    Ready(Arc<LayoutSnapshot>),
    Failed(String),
}

/// Proof that a completion belongs to the current document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTicket {
    generation: u64,
}

#[derive(Debug)]
struct GateState {
    generation: u64,
    rendered: Vec<bool>,
    status: RenderStatus,
}

pub struct RenderGate {
    tx: watch::Sender<GateState>,
}

impl Default for RenderGate {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderGate {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(GateState {
            generation: 0,
            rendered: Vec::new(),
            status: RenderStatus::Preparing,
        });
        Self { tx }
    }

    /// Start rendering a freshly decoded document of `page_count` pages
    pub fn begin(&self, page_count: usize) -> RenderTicket {
        let mut generation = 0;
        self.tx.send_modify(|state| {
            state.generation += 1;
            state.rendered = vec![false; page_count];
            state.status = RenderStatus::Rendering {
                rendered: 0,
                total: page_count,
            };
            generation = state.generation;
        });
        log::debug!("Render generation {} started ({} pages)", generation, page_count);
        RenderTicket { generation }
    }

    /// Record that one page's surface has been rendered. Returns `false` for
    /// stale tickets and unknown pages.
    pub fn page_rendered(&self, ticket: RenderTicket, page_index: usize) -> bool {
        let mut accepted = false;
        self.tx.send_if_modified(|state| {
            if state.generation != ticket.generation || page_index >= state.rendered.len() {
                return false;
            }
            accepted = true;
            if state.rendered[page_index] {
                return false;
            }
            state.rendered[page_index] = true;
            if let RenderStatus::Rendering { rendered, .. } = &mut state.status {
                *rendered += 1;
            }
            true
        });
        accepted
    }

    /// Whether every page of the current generation has been rendered
    pub fn all_rendered(&self) -> bool {
        let state = self.tx.borrow();
        !state.rendered.is_empty() && state.rendered.iter().all(|r| *r)
    }

    /// Publish the geometry measured after the rendered pages were laid out,
    /// moving the gate to `Ready`. May be called again while ready to replace
    /// the snapshot after a relayout.
    pub fn publish(&self, ticket: RenderTicket, snapshot: LayoutSnapshot) -> Result<bool> {
        let mut outcome = Ok(false);
        self.tx.send_if_modified(|state| {
            if state.generation != ticket.generation {
                return false;
            }
            if matches!(state.status, RenderStatus::Failed(_)) {
                return false;
            }
            let complete = !state.rendered.is_empty() && state.rendered.iter().all(|r| *r);
            if !complete || snapshot.page_count() != state.rendered.len() {
                outcome = Err(SignError::NotReady);
                return false;
            }
            if let RenderStatus::Ready(current) = &state.status {
                if **current == snapshot {
                    outcome = Ok(true);
                    return false;
                }
            }
            state.status = RenderStatus::Ready(Arc::new(snapshot));
            outcome = Ok(true);
            true
        });
        outcome
    }

    /// Mark the current generation as failed (e.g. the document cannot be
    /// decoded or a page cannot be rendered)
    pub fn fail(&self, ticket: RenderTicket, message: impl Into<String>) -> bool {
        let message = message.into();
        self.tx.send_if_modified(|state| {
            if state.generation != ticket.generation {
                return false;
            }
            log::warn!("Render generation {} failed: {}", state.generation, message);
            state.status = RenderStatus::Failed(message.clone());
            true
        })
    }

    /// Drop the current document. Outstanding tickets become stale.
    pub fn reset(&self) {
        self.tx.send_modify(|state| {
            state.generation += 1;
            state.rendered.clear();
            state.status = RenderStatus::Preparing;
        });
    }

    pub fn status(&self) -> RenderStatus {
        self.tx.borrow().status.clone()
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.tx.borrow().status, RenderStatus::Ready(_))
    }

    /// Current geometry; `None` unless the gate is ready
    pub fn snapshot(&self) -> Option<Arc<LayoutSnapshot>> {
        match &self.tx.borrow().status {
            RenderStatus::Ready(snapshot) => Some(Arc::clone(snapshot)),
            _ => None,
        }
    }

    /// Wait until the current document is ready, or report why it never will be
    pub async fn wait_ready(&self) -> Result<Arc<LayoutSnapshot>> {
        let mut rx = self.tx.subscribe();
        let state = rx
            .wait_for(|state| {
                matches!(
                    state.status,
                    RenderStatus::Ready(_) | RenderStatus::Failed(_)
                )
            })
            .await
            .map_err(|_| SignError::NotReady)?;

        match &state.status {
            RenderStatus::Ready(snapshot) => Ok(Arc::clone(snapshot)),
            RenderStatus::Failed(message) => Err(SignError::Decode(message.clone())),
            _ => Err(SignError::NotReady),
        }
    }
}
