//! Controller services
//!
//! Each service is a thin handle over the shared [`CrudContext`]; they are
//! cheap to construct and built on demand. Session state sits behind one
//! async mutex that is never held across a request.

mod action_handlers;
mod fragment_loader;
mod modal_stack;
mod readiness;
mod related;
mod result_display;
mod submission;

pub use action_handlers::ActionHandlers;
pub use fragment_loader::FragmentLoader;
pub use modal_stack::ModalStack;
pub use readiness::ReadinessNotifier;
pub use related::RelatedObjectSpawner;
pub use result_display::ResultDisplay;
pub use submission::SubmissionService;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::CrudConfig;
use crate::error::CrudResult;
use crate::registry::{DialogRegistry, SessionState};
use crate::traits::{Page, ResponseClassifier, Transport};
use crate::types::{DialogId, DialogRole};

/// Service context - holds all dependencies
///
/// The host builds the page and transport implementations and hands them
/// over; everything else is derived from configuration.
pub struct CrudContext {
    /// Document seam
    pub page: Arc<dyn Page>,
    /// HTTP seam
    pub transport: Arc<dyn Transport>,
    /// Decides acceptance of submission responses
    pub classifier: Arc<dyn ResponseClassifier>,
    pub config: CrudConfig,
    pub state: Mutex<SessionState>,
}

impl CrudContext {
    /// Create a new context from its collaborators and the discovered dialogs
    #[must_use]
    pub fn new(
        page: Arc<dyn Page>,
        transport: Arc<dyn Transport>,
        classifier: Arc<dyn ResponseClassifier>,
        config: CrudConfig,
        registry: DialogRegistry,
    ) -> Self {
        Self {
            page,
            transport,
            classifier,
            config,
            state: Mutex::new(SessionState::new(registry)),
        }
    }

    /// Dialog currently playing a static role.
    pub async fn dialog(&self, role: &DialogRole) -> CrudResult<DialogId> {
        self.state.lock().await.dialog_for(role, &self.config)
    }
}
