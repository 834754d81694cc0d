//! Form and submission types

use serde::Serialize;

use super::{Container, DialogId, SelectRef};

/// HTTP method declared by a form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl HttpMethod {
    /// Parse a form's `method` attribute. Anything other than `post` is a GET,
    /// as browsers treat unknown methods.
    #[must_use]
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("post") => Self::Post,
            _ => Self::Get,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// A form instance found in the page.
///
/// `generation` identifies the content the form was found in; it changes every
/// time the hosting container's content is replaced, so a handle never refers
/// to a form that has since been re-rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormHandle {
    pub container: Container,
    pub id: Option<String>,
    pub method: HttpMethod,
    pub action: String,
    pub generation: u64,
}

impl FormHandle {
    #[must_use]
    pub fn dialog(&self) -> Option<&DialogId> {
        self.container.dialog()
    }
}

/// A request built from a form (or from a custom action trigger)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSubmission {
    pub method: HttpMethod,
    pub url: String,
    pub fields: Vec<(String, String)>,
}

impl FormSubmission {
    #[must_use]
    pub fn post(url: impl Into<String>, fields: Vec<(String, String)>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            fields,
        }
    }

    /// Value of the first field with the given name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// What to do once a submission has been accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Reload the whole page so the list reflects the change
    ReloadPage,
    /// Add the created object to a select control and select it
    PatchSelect(SelectRef),
    /// Display `{result, message}` in the result dialog under this title
    ShowResult { title: String },
}

/// A form armed for asynchronous submission inside a dialog
#[derive(Debug, Clone)]
pub struct SubmissionContext {
    pub form: FormHandle,
    pub completion: Option<Completion>,
}
