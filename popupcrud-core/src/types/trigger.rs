//! Trigger and selection control types

use serde::Serialize;

use super::{Container, DialogId};

/// A user activation routed to the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// `[name=create_edit_object]`: open the create/edit form at `url`
    CreateEdit { url: String, title: String },
    /// `[name=object_detail]`: open the read-only view at `url`
    Detail { url: String, title: String },
    /// `a[name=delete_object]`: confirm deletion of `object_name` via `url`
    Delete {
        url: String,
        object_name: String,
        title: String,
    },
    /// `a[name=custom_action]`: run `action` against object `item`
    CustomAction {
        action: String,
        item: String,
        title: String,
    },
    /// `.add-another` link with the given element id
    AddAnother { trigger_id: String },
}

/// Reference to a `<select>` control by container and field name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SelectRef {
    pub container: Container,
    pub name: String,
}

impl SelectRef {
    #[must_use]
    pub fn new(container: impl Into<Container>, name: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            name: name.into(),
        }
    }
}

/// Current state of a select control
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectState {
    pub multiple: bool,
    pub selected: Vec<String>,
}

/// An add-another link discovered in the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddAnotherTrigger {
    pub id: String,
    pub url: String,
    /// Link text, used as the dialog title
    pub text: String,
    /// The select control preceding the link, if there is one
    pub select: Option<SelectRef>,
}

/// Element a synthetic event is dispatched on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EventTarget {
    Form {
        container: Container,
        form_id: Option<String>,
    },
    Select(SelectRef),
    Dialog(DialogId),
}
