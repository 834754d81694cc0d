//! Readiness notification

use std::sync::Arc;

use crate::services::CrudContext;
use crate::types::{Container, EventTarget};

/// Raises the readiness event on freshly attached create/edit forms so host
/// code can initialise them the same way in dialogs and on full pages.
pub struct ReadinessNotifier {
    ctx: Arc<CrudContext>,
}

impl ReadinessNotifier {
    /// Create a new notifier over the shared context
    #[must_use]
    pub fn new(ctx: Arc<CrudContext>) -> Self {
        Self { ctx }
    }

    /// Notify on the first form in `container`. The delete confirmation form
    /// is preloaded with the page and never notified.
    ///
    /// Returns whether an event was raised.
    pub fn notify(&self, container: &Container) -> bool {
        let Some(form) = self.ctx.page.find_form(container, None) else {
            return false;
        };
        if form.id.as_deref() == Some(self.ctx.config.forms.delete.as_str()) {
            log::trace!("Skipping readiness for delete form in {container:?}");
            return false;
        }

        let target = EventTarget::Form {
            container: container.clone(),
            form_id: form.id,
        };
        self.ctx
            .page
            .dispatch_event(&target, &self.ctx.config.events.form_ready);
        true
    }
}
