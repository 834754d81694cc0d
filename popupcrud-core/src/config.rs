//! Controller configuration
//!
//! Every identifier the controller looks up in the page lives here, with
//! defaults matching the stock templates. A deployment with customised
//! templates overrides only what differs:
//!
//! ```toml
//! csrf_cookie = "xsrf"
//!
//! [dialogs]
//! create_edit = "book-form-modal"
//!
//! [stacking]
//! base = 2000
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CrudError, CrudResult};
use crate::types::{DialogId, DialogRole};

/// Controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrudConfig {
    pub dialogs: DialogIds,
    pub forms: FormIds,
    pub elements: ElementIds,
    pub triggers: TriggerConfig,
    pub stacking: StackingConfig,
    pub classifier: ClassifierConfig,
    pub events: EventNames,
    /// Cookie holding the CSRF token sent with custom actions
    pub csrf_cookie: String,
    pub http: HttpConfig,
}

impl Default for CrudConfig {
    fn default() -> Self {
        Self {
            dialogs: DialogIds::default(),
            forms: FormIds::default(),
            elements: ElementIds::default(),
            triggers: TriggerConfig::default(),
            stacking: StackingConfig::default(),
            classifier: ClassifierConfig::default(),
            events: EventNames::default(),
            csrf_cookie: "csrftoken".to_string(),
            http: HttpConfig::default(),
        }
    }
}

/// Dialog element ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogIds {
    pub create_edit: String,
    pub detail: String,
    pub delete: String,
    pub action_result: String,
    pub related_template: String,
}

impl Default for DialogIds {
    fn default() -> Self {
        Self {
            create_edit: "create-edit-modal".to_string(),
            detail: "detail-modal".to_string(),
            delete: "delete-modal".to_string(),
            action_result: "action-result-modal".to_string(),
            related_template: "add-related-modal".to_string(),
        }
    }
}

impl DialogIds {
    /// Id of the dialog playing `role`. Related dialogs are derived from
    /// their trigger rather than configured.
    #[must_use]
    pub fn for_role(&self, role: &DialogRole) -> DialogId {
        let id = match role {
            DialogRole::CreateEdit => &self.create_edit,
            DialogRole::Detail => &self.detail,
            DialogRole::Delete => &self.delete,
            DialogRole::ActionResult => &self.action_result,
            DialogRole::RelatedTemplate => &self.related_template,
            DialogRole::Related(trigger) => return DialogId::related_to(trigger),
        };
        DialogId::new(id.clone())
    }
}

/// Form element ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormIds {
    pub create_edit: String,
    pub delete: String,
}

impl Default for FormIds {
    fn default() -> Self {
        Self {
            create_edit: "create-edit-form".to_string(),
            delete: "delete-form".to_string(),
        }
    }
}

/// Ids of elements filled in by the controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    /// Display name of the object in the delete confirmation
    pub object_name: String,
    /// Message slot of the result dialog
    pub action_result: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            object_name: "id_object_name".to_string(),
            action_result: "id_action_result".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// Class marking add-another links
    pub add_another_class: String,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            add_another_class: "add-another".to_string(),
        }
    }
}

/// Layering of stacked dialogs: the n-th visible dialog gets
/// `base + increment * n`, its backdrop one less.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackingConfig {
    pub base: u32,
    pub increment: u32,
}

impl Default for StackingConfig {
    fn default() -> Self {
        Self {
            base: 1040,
            increment: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Classes whose presence in a response marks it as rejected
    pub error_markers: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            error_markers: vec!["has-error".to_string(), "alert".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventNames {
    /// Raised on a create/edit form once it is attached and initialised
    pub form_ready: String,
    /// Raised on a select control after add-another changed it
    pub change: String,
}

impl Default for EventNames {
    fn default() -> Self {
        Self {
            form_ready: "crudform.ready".to_string(),
            change: "change".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Base for resolving relative URLs found in the page
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: 30,
            user_agent: concat!("popupcrud/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl CrudConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> CrudResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| CrudError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> CrudResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| CrudError::InvalidConfig(format!("{}: {e}", path.display())))?;
        log::debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> CrudResult<()> {
        let ids = [
            ("dialogs.create_edit", &self.dialogs.create_edit),
            ("dialogs.detail", &self.dialogs.detail),
            ("dialogs.delete", &self.dialogs.delete),
            ("dialogs.action_result", &self.dialogs.action_result),
            ("dialogs.related_template", &self.dialogs.related_template),
            ("forms.create_edit", &self.forms.create_edit),
            ("forms.delete", &self.forms.delete),
            ("triggers.add_another_class", &self.triggers.add_another_class),
            ("events.form_ready", &self.events.form_ready),
        ];
        if let Some((key, _)) = ids.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(CrudError::InvalidConfig(format!("{key} must not be empty")));
        }
        if self.stacking.increment == 0 {
            return Err(CrudError::InvalidConfig(
                "stacking.increment must be positive".to_string(),
            ));
        }
        if self.stacking.base == 0 {
            return Err(CrudError::InvalidConfig(
                "stacking.base must leave room for backdrops".to_string(),
            ));
        }
        Ok(())
    }
}
