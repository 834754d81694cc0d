//! Asynchronous form submission with in-place re-rendering

use std::sync::Arc;

use serde_json::Value;

use crate::error::{CrudError, CrudResult};
use crate::services::{
    CrudContext, ModalStack, ReadinessNotifier, RelatedObjectSpawner, ResultDisplay,
};
use crate::types::{
    ActionOutcome, Completion, Container, CreatedObject, DialogId, EventTarget, FormHandle,
    FormSubmission, SelectRef, SubmissionContext, SubmitOutcome, Verdict,
};
use crate::utils::truncate_for_log;

/// Submission protocol for forms hosted in dialogs.
///
/// A form is armed with the completion to run on acceptance. Submitting sends
/// the form, then either re-renders the dialog with the returned markup and
/// re-arms the new form instance, or hides the dialog and runs the completion
/// exactly once.
pub struct SubmissionService {
    ctx: Arc<CrudContext>,
}

impl SubmissionService {
    /// Create a new submission service over the shared context
    #[must_use]
    pub fn new(ctx: Arc<CrudContext>) -> Self {
        Self { ctx }
    }

    /// Arm the form with `form_id` (or the first form) inside `dialog`,
    /// replacing any context previously armed there.
    pub async fn arm(
        &self,
        dialog: &DialogId,
        form_id: Option<&str>,
        completion: Option<Completion>,
    ) -> CrudResult<FormHandle> {
        let form = self
            .ctx
            .page
            .find_form(&Container::from(dialog), form_id)
            .ok_or_else(|| CrudError::FormNotFound {
                dialog: dialog.clone(),
                form_id: form_id.unwrap_or("<first>").to_string(),
            })?;

        log::debug!(
            "Armed {} in {dialog} (generation {})",
            form.id.as_deref().unwrap_or("<form>"),
            form.generation
        );
        self.ctx.state.lock().await.armed.insert(
            dialog.clone(),
            SubmissionContext {
                form: form.clone(),
                completion,
            },
        );
        Ok(form)
    }

    pub async fn is_armed(&self, dialog: &DialogId) -> bool {
        self.ctx.state.lock().await.armed.contains_key(dialog)
    }

    /// Submit the form armed in `dialog`.
    ///
    /// Transport failures are shown in the dialog and returned; the context
    /// stays armed so the user can retry.
    pub async fn submit(&self, dialog: &DialogId) -> CrudResult<SubmitOutcome> {
        let context = {
            let mut state = self.ctx.state.lock().await;
            if state.in_flight.contains(dialog) {
                return Err(CrudError::SubmissionInFlight(dialog.clone()));
            }
            let context = state
                .armed
                .get(dialog)
                .cloned()
                .ok_or_else(|| CrudError::NotArmed(dialog.clone()))?;
            let current = self.ctx.page.content_generation(&context.form.container)?;
            if current != context.form.generation {
                return Err(CrudError::StaleForm {
                    dialog: dialog.clone(),
                    armed: context.form.generation,
                    current,
                });
            }
            state.in_flight.insert(dialog.clone());
            context
        };

        let result = self.exchange(&context.form).await;
        self.ctx.state.lock().await.in_flight.remove(dialog);

        let body = match result {
            Ok(body) => body,
            Err(e) => {
                if e.is_transport() {
                    log::error!("Submission in {dialog} failed: {e}");
                    self.ctx.page.set_dialog_error(dialog, Some(&e.to_string()))?;
                } else {
                    log::warn!("Submission in {dialog} not sent: {e}");
                }
                return Err(e);
            }
        };
        self.ctx.page.set_dialog_error(dialog, None)?;

        match self.ctx.classifier.classify(&body) {
            Verdict::Rejected => self.rerender(dialog, &context, &body).await,
            Verdict::Accepted => self.accept(dialog, context, &body).await,
        }
    }

    async fn exchange(&self, form: &FormHandle) -> CrudResult<String> {
        let submission = FormSubmission {
            method: form.method,
            url: form.action.clone(),
            fields: self.ctx.page.serialize_form(form)?,
        };
        log::debug!(
            "{} {} ({} fields)",
            submission.method.as_str(),
            submission.url,
            submission.fields.len()
        );
        let body = self.ctx.transport.send(&submission).await?;
        log::debug!("Response from {}: {}", submission.url, truncate_for_log(&body));
        Ok(body)
    }

    async fn rerender(
        &self,
        dialog: &DialogId,
        context: &SubmissionContext,
        body: &str,
    ) -> CrudResult<SubmitOutcome> {
        log::warn!("Submission in {dialog} rejected, re-rendering form");
        let generation = self.ctx.page.set_dialog_body(dialog, body)?;
        let container = Container::from(dialog);

        RelatedObjectSpawner::new(Arc::clone(&self.ctx))
            .bind(&container)
            .await?;
        self.ctx.page.bind_select_widgets(&container);
        ReadinessNotifier::new(Arc::clone(&self.ctx)).notify(&container);

        if let Err(e) = self
            .arm(dialog, context.form.id.as_deref(), context.completion.clone())
            .await
        {
            // The old context points at replaced content and can never be sent.
            log::warn!("Re-rendered content of {dialog} has no form to arm: {e}");
            self.ctx.state.lock().await.armed.remove(dialog);
        }
        Ok(SubmitOutcome::Rerendered { generation })
    }

    async fn accept(
        &self,
        dialog: &DialogId,
        context: SubmissionContext,
        body: &str,
    ) -> CrudResult<SubmitOutcome> {
        self.ctx.state.lock().await.armed.remove(dialog);
        ModalStack::new(Arc::clone(&self.ctx)).hide(dialog).await?;

        let payload = serde_json::from_str::<Value>(body).ok();
        if payload.is_none() {
            log::debug!("Accepted response from {dialog} carries no JSON payload");
        }

        if let Some(completion) = context.completion {
            self.complete(completion, payload.as_ref()).await?;
        }
        log::info!("Submission in {dialog} accepted");
        Ok(SubmitOutcome::Accepted { payload })
    }

    async fn complete(&self, completion: Completion, payload: Option<&Value>) -> CrudResult<()> {
        match completion {
            Completion::ReloadPage => {
                self.ctx.page.reload();
                Ok(())
            }
            Completion::PatchSelect(select) => {
                let Some(payload) = payload else {
                    log::warn!("No created object returned for {}", select.name);
                    return Ok(());
                };
                let created: CreatedObject = serde_json::from_value(payload.clone())?;
                self.patch_select(&select, &created)
            }
            Completion::ShowResult { title } => {
                let Some(payload) = payload else {
                    log::warn!("No action outcome returned for {title}");
                    return Ok(());
                };
                let outcome: ActionOutcome = serde_json::from_value(payload.clone())?;
                ResultDisplay::new(Arc::clone(&self.ctx))
                    .show(outcome.result, &title, &outcome.message)
                    .await
                    .map(|_| ())
            }
        }
    }

    /// Add the created object to the select and select it: appended to the
    /// selection of a multi-select, replacing it otherwise.
    fn patch_select(&self, select: &SelectRef, created: &CreatedObject) -> CrudResult<()> {
        let page = &self.ctx.page;
        page.append_option(select, &created.pk, &created.name)?;

        let state = page.select_state(select)?;
        let selected = if state.multiple {
            let mut values = state.selected;
            if !values.contains(&created.pk) {
                values.push(created.pk.clone());
            }
            values
        } else {
            vec![created.pk.clone()]
        };
        page.set_selected(select, &selected)?;
        page.dispatch_event(
            &EventTarget::Select(select.clone()),
            &self.ctx.config.events.change,
        );
        log::debug!("Added {} ({}) to {}", created.name, created.pk, select.name);
        Ok(())
    }
}
