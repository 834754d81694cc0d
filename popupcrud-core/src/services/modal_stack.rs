//! Stacking order of visible dialogs

use std::sync::Arc;

use crate::error::CrudResult;
use crate::registry::DeferredTask;
use crate::services::{CrudContext, ReadinessNotifier, ResultDisplay};
use crate::types::{Container, DialogId};

/// Layers dialogs so that the last one shown is on top.
///
/// The n-th visible dialog (counting from zero) gets
/// `base + increment * n`; the backdrop created with it gets one less, once
/// the dialog widget has inserted it (next [`run_deferred`](Self::run_deferred)).
pub struct ModalStack {
    ctx: Arc<CrudContext>,
}

impl ModalStack {
    /// Create a new stack view over the shared context
    #[must_use]
    pub fn new(ctx: Arc<CrudContext>) -> Self {
        Self { ctx }
    }

    /// Show `dialog` above every visible dialog and return its stacking order.
    ///
    /// Showing an already visible dialog keeps its position and does not
    /// repeat the shown steps.
    pub async fn show(&self, dialog: &DialogId) -> CrudResult<u32> {
        let stacking = self.ctx.config.stacking;
        let z_index = {
            let mut state = self.ctx.state.lock().await;
            if state.visible.contains(dialog) {
                if let Some(z) = state.z_indices.get(dialog) {
                    return Ok(*z);
                }
            }
            let depth = u32::try_from(state.visible.len()).unwrap_or(u32::MAX);
            let z_index = stacking
                .base
                .saturating_add(stacking.increment.saturating_mul(depth));
            state.visible.push(dialog.clone());
            state.z_indices.insert(dialog.clone(), z_index);
            state
                .deferred
                .push_back(DeferredTask::StackBackdrops {
                    dialog: dialog.clone(),
                    z_index,
                });
            z_index
        };

        self.ctx.page.set_dialog_z_index(dialog, z_index)?;
        self.ctx.page.show_dialog(dialog)?;
        log::debug!("Showing {dialog} at z-index {z_index}");

        // Shown: initialise widgets, then announce the form.
        let container = Container::from(dialog);
        self.ctx.page.bind_select_widgets(&container);
        ReadinessNotifier::new(Arc::clone(&self.ctx)).notify(&container);

        Ok(z_index)
    }

    /// Hide `dialog` and release its slot in the stack.
    pub async fn hide(&self, dialog: &DialogId) -> CrudResult<()> {
        self.ctx.page.hide_dialog(dialog)?;
        self.on_hidden(dialog).await
    }

    /// Bookkeeping for a dialog that was closed, by the controller or by the
    /// user through the dialog widget.
    pub async fn on_hidden(&self, dialog: &DialogId) -> CrudResult<()> {
        let was_visible = {
            let mut state = self.ctx.state.lock().await;
            let before = state.visible.len();
            state.visible.retain(|d| d != dialog);
            state.z_indices.remove(dialog);
            state.visible.len() != before
        };
        if was_visible {
            log::debug!("Hidden {dialog}");
        }
        ResultDisplay::new(Arc::clone(&self.ctx))
            .dialog_hidden(dialog)
            .await;
        Ok(())
    }

    /// Apply postponed backdrop stacking. Returns the number of backdrops
    /// stacked.
    pub async fn run_deferred(&self) -> usize {
        let tasks: Vec<DeferredTask> = self.ctx.state.lock().await.deferred.drain(..).collect();
        let mut stacked = 0;
        for task in tasks {
            match task {
                DeferredTask::StackBackdrops { dialog, z_index } => {
                    for backdrop in self.ctx.page.unstacked_backdrops(&dialog) {
                        self.ctx
                            .page
                            .stack_backdrop(backdrop, z_index.saturating_sub(1));
                        stacked += 1;
                    }
                }
            }
        }
        stacked
    }

    pub async fn z_index_of(&self, dialog: &DialogId) -> Option<u32> {
        self.ctx.state.lock().await.z_indices.get(dialog).copied()
    }

    pub async fn visible(&self) -> Vec<DialogId> {
        self.ctx.state.lock().await.visible.clone()
    }
}
