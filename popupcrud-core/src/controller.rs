//! CRUD page controller

use std::sync::Arc;

use crate::config::CrudConfig;
use crate::error::CrudResult;
use crate::registry::DialogRegistry;
use crate::services::{
    ActionHandlers, CrudContext, ModalStack, ReadinessNotifier, RelatedObjectSpawner,
    ResultDisplay, SubmissionService,
};
use crate::traits::{MarkupClassifier, Page, ResponseClassifier, Transport};
use crate::types::{Container, DialogId, SubmitOutcome, Trigger};

/// What a handled trigger produced
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerOutcome {
    /// A dialog was shown
    Opened(DialogId),
    /// A custom action completed with this outcome
    ActionCompleted { result: bool, message: String },
}

/// Single owner of the page's dialogs, bindings and submission contexts.
///
/// The host forwards user input: activated triggers to [`handle`](Self::handle),
/// form submits to [`submit`](Self::submit), dialogs closed by the user to
/// [`dialog_hidden`](Self::dialog_hidden), and calls [`tick`](Self::tick) once
/// the dialog widget has rendered.
pub struct CrudController {
    ctx: Arc<CrudContext>,
}

impl CrudController {
    /// Create a controller with the markup classifier from `config`.
    ///
    /// Fails if the configuration is invalid or a required dialog is missing.
    pub fn new(
        page: Arc<dyn Page>,
        transport: Arc<dyn Transport>,
        config: CrudConfig,
    ) -> CrudResult<Self> {
        let classifier = Arc::new(MarkupClassifier::from_config(&config));
        Self::with_classifier(page, transport, classifier, config)
    }

    pub fn with_classifier(
        page: Arc<dyn Page>,
        transport: Arc<dyn Transport>,
        classifier: Arc<dyn ResponseClassifier>,
        config: CrudConfig,
    ) -> CrudResult<Self> {
        config.validate()?;
        let registry = DialogRegistry::discover(page.as_ref(), &config)?;
        Ok(Self {
            ctx: Arc::new(CrudContext::new(
                page, transport, classifier, config, registry,
            )),
        })
    }

    /// Bind the add-another triggers present in the page and announce an
    /// inline create/edit form, if the page was rendered with one.
    pub async fn initialize(&self) -> CrudResult<()> {
        let bound = self.bind_add_another(Container::Root).await?;
        let notified = ReadinessNotifier::new(Arc::clone(&self.ctx)).notify(&Container::Root);
        log::info!("Controller initialized ({bound} add-another triggers, inline form: {notified})");
        Ok(())
    }

    /// Drop every binding, armed form and pending task. Dialogs already in
    /// the page stay where they are.
    pub async fn shutdown(&self) {
        self.ctx.state.lock().await.reset();
        log::info!("Controller shut down");
    }

    /// Dispatch an activated trigger.
    pub async fn handle(&self, trigger: Trigger) -> CrudResult<TriggerOutcome> {
        self.tick().await;
        let handlers = ActionHandlers::new(Arc::clone(&self.ctx));
        let outcome = match trigger {
            Trigger::CreateEdit { url, title } => {
                TriggerOutcome::Opened(handlers.create_edit(&url, &title).await?)
            }
            Trigger::Detail { url, title } => {
                TriggerOutcome::Opened(handlers.detail(&url, &title).await?)
            }
            Trigger::Delete {
                url,
                object_name,
                title,
            } => TriggerOutcome::Opened(handlers.delete(&url, &object_name, &title).await?),
            Trigger::CustomAction {
                action,
                item,
                title,
            } => {
                let outcome = handlers.custom_action(&action, &item, &title).await?;
                TriggerOutcome::ActionCompleted {
                    result: outcome.result,
                    message: outcome.message,
                }
            }
            Trigger::AddAnother { trigger_id } => TriggerOutcome::Opened(
                RelatedObjectSpawner::new(Arc::clone(&self.ctx))
                    .open(&trigger_id)
                    .await?,
            ),
        };
        Ok(outcome)
    }

    /// Submit the form armed in `dialog`.
    pub async fn submit(&self, dialog: &DialogId) -> CrudResult<SubmitOutcome> {
        self.tick().await;
        let result = SubmissionService::new(Arc::clone(&self.ctx))
            .submit(dialog)
            .await;
        if let Err(e) = &result {
            if e.is_expected() {
                log::warn!("Submit ignored for {dialog}: {e}");
            }
        }
        result
    }

    /// Hide a dialog programmatically.
    pub async fn hide_dialog(&self, dialog: &DialogId) -> CrudResult<()> {
        ModalStack::new(Arc::clone(&self.ctx)).hide(dialog).await
    }

    /// Record that the user closed `dialog` through the dialog widget.
    pub async fn dialog_hidden(&self, dialog: &DialogId) -> CrudResult<()> {
        ModalStack::new(Arc::clone(&self.ctx))
            .on_hidden(dialog)
            .await
    }

    /// Run postponed work (backdrop stacking). Returns the number of
    /// backdrops updated.
    pub async fn tick(&self) -> usize {
        ModalStack::new(Arc::clone(&self.ctx)).run_deferred().await
    }

    /// Bind add-another triggers inside `container`.
    pub async fn bind_add_another(&self, container: Container) -> CrudResult<usize> {
        RelatedObjectSpawner::new(Arc::clone(&self.ctx))
            .bind(&container)
            .await
    }

    /// Show a result message, reloading the page on hide when `result` is true.
    pub async fn show_action_result(
        &self,
        result: bool,
        title: &str,
        message: &str,
    ) -> CrudResult<u32> {
        ResultDisplay::new(Arc::clone(&self.ctx))
            .show(result, title, message)
            .await
    }

    pub async fn z_index_of(&self, dialog: &DialogId) -> Option<u32> {
        ModalStack::new(Arc::clone(&self.ctx)).z_index_of(dialog).await
    }

    /// Visible dialogs, bottom first.
    pub async fn visible_dialogs(&self) -> Vec<DialogId> {
        ModalStack::new(Arc::clone(&self.ctx)).visible().await
    }

    pub async fn is_armed(&self, dialog: &DialogId) -> bool {
        SubmissionService::new(Arc::clone(&self.ctx))
            .is_armed(dialog)
            .await
    }

    #[must_use]
    pub fn config(&self) -> &CrudConfig {
        &self.ctx.config
    }
}
