//! Action result dialog

use std::sync::Arc;

use crate::error::CrudResult;
use crate::services::{CrudContext, ModalStack};
use crate::types::{DialogId, DialogRole};

/// Shows `{result, message}` outcomes of delete and custom actions
pub struct ResultDisplay {
    ctx: Arc<CrudContext>,
}

impl ResultDisplay {
    /// Create a new result display over the shared context
    #[must_use]
    pub fn new(ctx: Arc<CrudContext>) -> Self {
        Self { ctx }
    }

    /// Show the result dialog. When it is next hidden the page reloads if
    /// `result` is true; the hide handler fires once and a later call
    /// replaces it.
    pub async fn show(&self, result: bool, title: &str, message: &str) -> CrudResult<u32> {
        let dialog = self.ctx.dialog(&DialogRole::ActionResult).await?;
        self.ctx.page.set_dialog_title(&dialog, title)?;
        // The message is server-provided markup.
        self.ctx
            .page
            .set_element_html(&dialog, &self.ctx.config.elements.action_result, message)?;
        self.ctx.state.lock().await.result_on_hide = Some(result);

        log::info!("Action result ({}): {title}", if result { "ok" } else { "failed" });
        ModalStack::new(Arc::clone(&self.ctx)).show(&dialog).await
    }

    /// Run the one-shot hide handler if `dialog` is the result dialog.
    pub async fn dialog_hidden(&self, dialog: &DialogId) {
        let reload = {
            let mut state = self.ctx.state.lock().await;
            if state.registry.get(&DialogRole::ActionResult) != Some(dialog) {
                return;
            }
            state.result_on_hide.take()
        };
        if reload == Some(true) {
            log::debug!("Reloading page after successful action");
            self.ctx.page.reload();
        }
    }
}
