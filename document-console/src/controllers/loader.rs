//! Detail loading for the document viewer.
//!
//! The loader is a small state machine, `Idle -> Loading -> Loaded | Failed`,
//! held in a [`watch`] channel. Every `load` is tagged with a fresh request id
//! and a response is only applied while the state still shows that id as
//! loading, so the most recent `load` always wins regardless of the order in
//! which responses arrive.

use crate::models::DocumentDetail;
use crate::services::DocumentApi;
use console_core::error::{ApiError, ErrorKind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&ApiError> for LoadFailure {
    fn from(err: &ApiError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading {
        request_id: u64,
        document_id: String,
    },
    Loaded {
        document_id: String,
        detail: Arc<DocumentDetail>,
    },
    Failed {
        document_id: String,
        failure: LoadFailure,
    },
}

impl LoadState {
    /// The document this state refers to; `None` when idle.
    pub fn document_id(&self) -> Option<&str> {
        match self {
            LoadState::Idle => None,
            LoadState::Loading { document_id, .. }
            | LoadState::Loaded { document_id, .. }
            | LoadState::Failed { document_id, .. } => Some(document_id),
        }
    }

    pub fn detail(&self) -> Option<&Arc<DocumentDetail>> {
        match self {
            LoadState::Loaded { detail, .. } => Some(detail),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading { .. })
    }
}

pub struct DocumentDetailLoader {
    api: Arc<dyn DocumentApi>,
    state: Arc<watch::Sender<LoadState>>,
    next_request_id: AtomicU64,
}

impl DocumentDetailLoader {
    pub fn new(api: Arc<dyn DocumentApi>) -> Self {
        let (state, _) = watch::channel(LoadState::Idle);
        Self {
            api,
            state: Arc::new(state),
            next_request_id: AtomicU64::new(1),
        }
    }

    pub fn state(&self) -> LoadState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state.subscribe()
    }

    /// Start loading `document_id` in the background.
    ///
    /// The state is `Loading` by the time this returns. The handle can be
    /// awaited to know when the response has been applied or discarded.
    pub fn load(&self, document_id: &str) -> JoinHandle<()> {
        let request_id = self.begin(document_id);
        let api = self.api.clone();
        let state = self.state.clone();
        let document_id = document_id.to_string();

        tokio::spawn(async move {
            let result = api.get_document(&document_id).await;
            complete(&state, request_id, &document_id, result);
        })
    }

    /// Load `document_id` and wait for the outcome.
    ///
    /// Returns the state after this request settled, which reflects a newer
    /// request if one was started meanwhile.
    pub async fn load_now(&self, document_id: &str) -> LoadState {
        let request_id = self.begin(document_id);
        let result = self.api.get_document(document_id).await;
        complete(&self.state, request_id, document_id, result);
        self.state()
    }

    /// Re-issue a load for the document currently shown, if any.
    pub fn retry(&self) -> Option<JoinHandle<()>> {
        let document_id = self.state.borrow().document_id().map(str::to_string)?;
        Some(self.load(&document_id))
    }

    /// Return to `Idle`; a response still in flight is discarded on arrival.
    pub fn close(&self) {
        self.state.send_modify(|state| *state = LoadState::Idle);
    }

    fn begin(&self, document_id: &str) -> u64 {
        let mut request_id = 0;
        self.state.send_modify(|state| {
            // Allocated under the channel lock so ids follow transition order.
            request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
            *state = LoadState::Loading {
                request_id,
                document_id: document_id.to_string(),
            };
        });
        tracing::debug!(request_id, document_id, "Loading document detail");
        request_id
    }
}

fn complete(
    state: &watch::Sender<LoadState>,
    request_id: u64,
    document_id: &str,
    result: Result<DocumentDetail, ApiError>,
) {
    let applied = state.send_if_modified(|current| {
        let still_current = matches!(
            current,
            LoadState::Loading { request_id: current_id, .. } if *current_id == request_id
        );
        if !still_current {
            return false;
        }

        *current = match &result {
            Ok(detail) => LoadState::Loaded {
                document_id: document_id.to_string(),
                detail: Arc::new(detail.clone().normalize()),
            },
            Err(err) => LoadState::Failed {
                document_id: document_id.to_string(),
                failure: LoadFailure::from(err),
            },
        };
        true
    });

    match (&result, applied) {
        (_, false) => {
            tracing::debug!(request_id, document_id, "Discarding stale document response");
        }
        (Ok(_), true) => {
            tracing::info!(request_id, document_id, "Document detail loaded");
        }
        (Err(err), true) => {
            tracing::warn!(
                request_id,
                document_id,
                kind = %err.kind(),
                error = %err,
                "Document detail failed to load"
            );
        }
    }
}
