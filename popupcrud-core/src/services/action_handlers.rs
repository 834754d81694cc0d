//! User action handlers

use std::sync::Arc;

use crate::dom::markup;
use crate::error::{CrudError, CrudResult};
use crate::services::{
    CrudContext, FragmentLoader, ModalStack, RelatedObjectSpawner, ResultDisplay,
    SubmissionService,
};
use crate::types::{ActionOutcome, Completion, Container, DialogId, DialogRole, FormSubmission};
use crate::utils::{read_cookie, truncate_for_log};

/// Field carrying the CSRF token in custom action requests
const CSRF_FIELD: &str = "csrfmiddlewaretoken";

/// Handlers for the create/edit, detail, delete and custom action triggers
pub struct ActionHandlers {
    ctx: Arc<CrudContext>,
}

impl ActionHandlers {
    /// Create new handlers over the shared context
    #[must_use]
    pub fn new(ctx: Arc<CrudContext>) -> Self {
        Self { ctx }
    }

    fn stack(&self) -> ModalStack {
        ModalStack::new(Arc::clone(&self.ctx))
    }

    /// Load `url` into `dialog` and title it. A failed load still shows the
    /// dialog so the error is visible.
    async fn load_titled(&self, url: &str, dialog: &DialogId, title: &str) -> CrudResult<()> {
        let loaded = FragmentLoader::new(Arc::clone(&self.ctx)).load(url, dialog).await;
        self.ctx.page.set_dialog_title(dialog, title)?;
        if let Err(e) = loaded {
            self.stack().show(dialog).await?;
            return Err(e);
        }
        Ok(())
    }

    /// Open the create/edit form at `url`. Acceptance reloads the page.
    pub async fn create_edit(&self, url: &str, title: &str) -> CrudResult<DialogId> {
        let dialog = self.ctx.dialog(&DialogRole::CreateEdit).await?;
        self.load_titled(url, &dialog, title).await?;

        RelatedObjectSpawner::new(Arc::clone(&self.ctx))
            .bind(&Container::from(&dialog))
            .await?;

        let armed = SubmissionService::new(Arc::clone(&self.ctx))
            .arm(
                &dialog,
                Some(&self.ctx.config.forms.create_edit),
                Some(Completion::ReloadPage),
            )
            .await;
        if let Err(e) = armed {
            log::warn!("Create/edit fragment from {url} has no form: {e}");
        }

        self.stack().show(&dialog).await?;
        Ok(dialog)
    }

    /// Open the read-only view at `url`.
    pub async fn detail(&self, url: &str, title: &str) -> CrudResult<DialogId> {
        let dialog = self.ctx.dialog(&DialogRole::Detail).await?;
        self.load_titled(url, &dialog, title).await?;
        self.stack().show(&dialog).await?;
        Ok(dialog)
    }

    /// Ask for confirmation before deleting `object_name` through `url`.
    ///
    /// The confirmation dialog and its form are part of the page; only the
    /// object name and the form action change.
    pub async fn delete(&self, url: &str, object_name: &str, title: &str) -> CrudResult<DialogId> {
        let dialog = self.ctx.dialog(&DialogRole::Delete).await?;
        let page = &self.ctx.page;
        let form_id = &self.ctx.config.forms.delete;

        page.set_element_text(&dialog, &self.ctx.config.elements.object_name, object_name)?;
        page.set_form_action(&dialog, form_id, url)?;

        SubmissionService::new(Arc::clone(&self.ctx))
            .arm(
                &dialog,
                Some(form_id),
                Some(Completion::ShowResult {
                    title: title.to_string(),
                }),
            )
            .await?;

        self.stack().show(&dialog).await?;
        Ok(dialog)
    }

    /// Run a custom action on `item` with a direct POST to the current page.
    ///
    /// Any failure is reported through the result dialog as well as returned.
    pub async fn custom_action(
        &self,
        action: &str,
        item: &str,
        title: &str,
    ) -> CrudResult<ActionOutcome> {
        let display = ResultDisplay::new(Arc::clone(&self.ctx));
        match self.post_action(action, item).await {
            Ok(outcome) => {
                display.show(outcome.result, title, &outcome.message).await?;
                Ok(outcome)
            }
            Err(e) => {
                log::error!("Custom action {action} on {item} failed: {e}");
                display.show(false, title, &markup::escape(&e.to_string())).await?;
                Err(e)
            }
        }
    }

    async fn post_action(&self, action: &str, item: &str) -> CrudResult<ActionOutcome> {
        let token = read_cookie(&self.ctx.page.cookies(), &self.ctx.config.csrf_cookie);
        if token.is_none() {
            log::warn!(
                "No {} cookie, sending custom action without token",
                self.ctx.config.csrf_cookie
            );
        }

        let submission = FormSubmission::post(
            self.ctx.page.location(),
            vec![
                (CSRF_FIELD.to_string(), token.unwrap_or_default()),
                ("action".to_string(), action.to_string()),
                ("item".to_string(), item.to_string()),
            ],
        );
        log::debug!("POST {} action={action} item={item}", submission.url);

        let body = self.ctx.transport.send(&submission).await?;
        log::debug!("Action response: {}", truncate_for_log(&body));
        serde_json::from_str(&body)
            .map_err(|e| CrudError::ParseError(format!("custom action response: {e}")))
    }
}
