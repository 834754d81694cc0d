//! Dialog identity and roles

use std::fmt;

use serde::{Deserialize, Serialize};

/// Suffix appended to an add-another trigger's id to name its dialog.
const RELATED_DIALOG_SUFFIX: &str = "-modal";

/// Identifier of a dialog element in the page
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialogId(String);

impl DialogId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Dialog dedicated to the add-another trigger with the given id.
    #[must_use]
    pub fn related_to(trigger_id: &str) -> Self {
        Self(format!("{trigger_id}{RELATED_DIALOG_SUFFIX}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DialogId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DialogId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for DialogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The part a dialog plays in the CRUD page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "role", content = "trigger")]
pub enum DialogRole {
    /// Shared create/edit form dialog
    CreateEdit,
    /// Shared read-only detail dialog
    Detail,
    /// Delete confirmation dialog, preloaded with its form
    Delete,
    /// Result message dialog for delete and custom actions
    ActionResult,
    /// Template cloned for add-another dialogs
    RelatedTemplate,
    /// Dialog created for one add-another trigger (keyed by trigger id)
    Related(String),
}

impl DialogRole {
    /// Roles that must be present in the page at startup.
    pub const REQUIRED: [Self; 4] = [
        Self::CreateEdit,
        Self::Detail,
        Self::Delete,
        Self::ActionResult,
    ];
}

impl fmt::Display for DialogRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateEdit => f.write_str("create-edit"),
            Self::Detail => f.write_str("detail"),
            Self::Delete => f.write_str("delete"),
            Self::ActionResult => f.write_str("action-result"),
            Self::RelatedTemplate => f.write_str("related-template"),
            Self::Related(trigger) => write!(f, "related({trigger})"),
        }
    }
}

/// Scope of a page query: the document root or a single dialog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Container {
    Root,
    Dialog(DialogId),
}

impl Container {
    #[must_use]
    pub fn dialog(&self) -> Option<&DialogId> {
        match self {
            Self::Root => None,
            Self::Dialog(id) => Some(id),
        }
    }
}

impl From<DialogId> for Container {
    fn from(id: DialogId) -> Self {
        Self::Dialog(id)
    }
}

impl From<&DialogId> for Container {
    fn from(id: &DialogId) -> Self {
        Self::Dialog(id.clone())
    }
}

/// Handle of a backdrop element created by the dialog widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackdropId(pub u64);
