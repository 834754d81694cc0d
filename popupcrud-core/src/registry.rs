//! Dialog registry and controller session state

use std::collections::{HashMap, HashSet, VecDeque};

use crate::config::CrudConfig;
use crate::error::{CrudError, CrudResult};
use crate::traits::Page;
use crate::types::{DialogId, DialogRole, SelectRef, SubmissionContext};

/// Dialogs known to the controller, by role.
///
/// The static roles are resolved and checked once at startup; related
/// dialogs are added as add-another triggers are bound.
#[derive(Debug, Clone, Default)]
pub struct DialogRegistry {
    roles: HashMap<DialogRole, DialogId>,
}

impl DialogRegistry {
    /// Resolve every static role against the page.
    ///
    /// The related-dialog template is optional: without it add-another
    /// binding is a no-op.
    pub fn discover(page: &dyn Page, config: &CrudConfig) -> CrudResult<Self> {
        let mut roles = HashMap::new();
        for role in DialogRole::REQUIRED {
            let id = config.dialogs.for_role(&role);
            if !page.dialog_exists(&id) {
                return Err(CrudError::MissingDialog { role, id });
            }
            roles.insert(role, id);
        }

        let template = config.dialogs.for_role(&DialogRole::RelatedTemplate);
        if page.dialog_exists(&template) {
            roles.insert(DialogRole::RelatedTemplate, template);
        } else {
            log::debug!("No related dialog template ({template}); add-another disabled");
        }

        Ok(Self { roles })
    }

    pub fn get(&self, role: &DialogRole) -> Option<&DialogId> {
        self.roles.get(role)
    }

    pub fn register(&mut self, role: DialogRole, id: DialogId) {
        self.roles.insert(role, id);
    }

    pub fn role_of(&self, id: &DialogId) -> Option<&DialogRole> {
        self.roles
            .iter()
            .find_map(|(role, dialog)| (dialog == id).then_some(role))
    }

    /// Forget related dialogs. Static roles survive teardown.
    pub fn clear_related(&mut self) {
        self.roles
            .retain(|role, _| !matches!(role, DialogRole::Related(_)));
    }
}

/// An add-another trigger wired to its dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedBinding {
    pub dialog: DialogId,
    pub url: String,
    pub title: String,
    pub select: SelectRef,
}

/// Work postponed until the next [`tick`](crate::CrudController::tick)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredTask {
    /// Give the backdrop of `dialog` a stacking order under `z_index`
    StackBackdrops { dialog: DialogId, z_index: u32 },
}

/// Mutable state owned by the controller
#[derive(Debug, Default)]
pub struct SessionState {
    pub registry: DialogRegistry,
    /// Bound add-another triggers, by trigger id
    pub related: HashMap<String, RelatedBinding>,
    /// Armed submission contexts, at most one per dialog
    pub armed: HashMap<DialogId, SubmissionContext>,
    pub in_flight: HashSet<DialogId>,
    /// Visible dialogs, in the order they were shown
    pub visible: Vec<DialogId>,
    pub z_indices: HashMap<DialogId, u32>,
    pub deferred: VecDeque<DeferredTask>,
    /// One-shot handler for hiding the result dialog: reload when `Some(true)`
    pub result_on_hide: Option<bool>,
}

impl SessionState {
    #[must_use]
    pub fn new(registry: DialogRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    /// Static role lookup that reports the role's configured id on failure.
    pub fn dialog_for(&self, role: &DialogRole, config: &CrudConfig) -> CrudResult<DialogId> {
        self.registry
            .get(role)
            .cloned()
            .ok_or_else(|| CrudError::MissingDialog {
                role: role.clone(),
                id: config.dialogs.for_role(role),
            })
    }

    /// Drop everything bound since startup.
    pub fn reset(&mut self) {
        self.registry.clear_related();
        self.related.clear();
        self.armed.clear();
        self.in_flight.clear();
        self.deferred.clear();
        self.result_on_hide = None;
    }
}
