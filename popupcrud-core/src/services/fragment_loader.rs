//! Fragment loading

use std::sync::Arc;

use crate::error::CrudResult;
use crate::services::CrudContext;
use crate::types::DialogId;
use crate::utils::truncate_for_log;

/// Fetches server-rendered fragments into dialog bodies
pub struct FragmentLoader {
    ctx: Arc<CrudContext>,
}

impl FragmentLoader {
    /// Create a new loader over the shared context
    #[must_use]
    pub fn new(ctx: Arc<CrudContext>) -> Self {
        Self { ctx }
    }

    /// GET `url` and replace the body of `dialog` with the response.
    ///
    /// Returns the generation of the new content. On failure the body is
    /// emptied, any form armed there is dropped and the error is shown in the
    /// dialog's error slot. No retries.
    pub async fn load(&self, url: &str, dialog: &DialogId) -> CrudResult<u64> {
        log::debug!("Loading {url} into {dialog}");

        let body = match self.ctx.transport.fetch(url).await {
            Ok(body) => body,
            Err(e) => {
                log::error!("Failed to load {url} into {dialog}: {e}");
                // Previous content belongs to another object.
                self.ctx.page.set_dialog_body(dialog, "")?;
                self.ctx.state.lock().await.armed.remove(dialog);
                self.ctx.page.set_dialog_error(dialog, Some(&e.to_string()))?;
                return Err(e);
            }
        };
        log::debug!("Fragment for {dialog}: {}", truncate_for_log(&body));

        self.ctx.page.set_dialog_error(dialog, None)?;
        self.ctx.page.set_dialog_body(dialog, &body)
    }
}
