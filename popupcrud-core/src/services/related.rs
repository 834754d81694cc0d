//! Add-another: inline creation of related objects in nested dialogs

use std::sync::Arc;

use crate::error::{CrudError, CrudResult};
use crate::registry::RelatedBinding;
use crate::services::{CrudContext, FragmentLoader, ModalStack, SubmissionService};
use crate::types::{Completion, Container, DialogId, DialogRole};

/// Gives each add-another trigger its own dialog, cloned from the related
/// dialog template, and wires the created object back into the select
/// control preceding the trigger.
pub struct RelatedObjectSpawner {
    ctx: Arc<CrudContext>,
}

impl RelatedObjectSpawner {
    /// Create a new spawner over the shared context
    #[must_use]
    pub fn new(ctx: Arc<CrudContext>) -> Self {
        Self { ctx }
    }

    /// Bind every add-another trigger inside `container`.
    ///
    /// Dialogs are created on first sight and reused afterwards, so binding
    /// the same content twice never duplicates a dialog. Returns the number of
    /// triggers bound; zero when the page has no template.
    pub async fn bind(&self, container: &Container) -> CrudResult<usize> {
        let Some(template) = self
            .ctx
            .state
            .lock()
            .await
            .registry
            .get(&DialogRole::RelatedTemplate)
            .cloned()
        else {
            return Ok(0);
        };

        let triggers = self
            .ctx
            .page
            .add_another_triggers(container, &self.ctx.config.triggers.add_another_class);

        let mut bound = 0;
        for trigger in triggers {
            if trigger.id.is_empty() {
                log::warn!("Skipping add-another link without id in {container:?}");
                continue;
            }
            let Some(select) = trigger.select else {
                log::warn!(
                    "Skipping add-another link {} without a preceding select",
                    trigger.id
                );
                continue;
            };

            let dialog = DialogId::related_to(&trigger.id);
            if !self.ctx.page.dialog_exists(&dialog) {
                self.ctx.page.clone_dialog(&template, &dialog)?;
                log::debug!("Created dialog {dialog} for trigger {}", trigger.id);
            }

            let mut state = self.ctx.state.lock().await;
            state
                .registry
                .register(DialogRole::Related(trigger.id.clone()), dialog.clone());
            state.related.insert(
                trigger.id,
                RelatedBinding {
                    dialog,
                    url: trigger.url,
                    title: trigger.text,
                    select,
                },
            );
            bound += 1;
        }
        Ok(bound)
    }

    /// Activate a bound trigger: load its form into its dialog, bind nested
    /// triggers, arm the form and show the dialog on top.
    pub async fn open(&self, trigger_id: &str) -> CrudResult<DialogId> {
        let binding = self
            .ctx
            .state
            .lock()
            .await
            .related
            .get(trigger_id)
            .cloned()
            .ok_or_else(|| CrudError::TriggerNotBound(trigger_id.to_string()))?;
        let dialog = binding.dialog.clone();
        let stack = ModalStack::new(Arc::clone(&self.ctx));

        if let Err(e) = FragmentLoader::new(Arc::clone(&self.ctx))
            .load(&binding.url, &dialog)
            .await
        {
            self.ctx.page.set_dialog_title(&dialog, &binding.title)?;
            stack.show(&dialog).await?;
            return Err(e);
        }
        self.ctx.page.set_dialog_title(&dialog, &binding.title)?;
        self.bind(&Container::from(&dialog)).await?;

        let armed = SubmissionService::new(Arc::clone(&self.ctx))
            .arm(
                &dialog,
                Some(&self.ctx.config.forms.create_edit),
                Some(Completion::PatchSelect(binding.select)),
            )
            .await;
        if let Err(e) = armed {
            log::warn!("Add-another fragment from {} has no form: {e}", binding.url);
        }

        stack.show(&dialog).await?;
        Ok(dialog)
    }
}
