//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

use crate::types::{DialogId, DialogRole};

/// Core layer error type
#[derive(Error, Debug, Clone, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CrudError {
    /// A dialog required for a role is not present in the page
    #[error("Required dialog for role {role} not found: {id}")]
    MissingDialog { role: DialogRole, id: DialogId },

    /// A dialog identifier is not known to the page
    #[error("Dialog not found: {0}")]
    DialogNotFound(DialogId),

    /// An add-another trigger was activated before being bound
    #[error("Trigger not bound: {0}")]
    TriggerNotBound(String),

    /// The expected form is not present in a dialog
    #[error("Form {form_id} not found in dialog {dialog}")]
    FormNotFound { dialog: DialogId, form_id: String },

    /// A submit arrived for a dialog with no armed form
    #[error("No form armed in dialog {0}")]
    NotArmed(DialogId),

    /// A submit arrived for a form instance that has since been replaced
    #[error("Form in dialog {dialog} was replaced (armed generation {armed}, current {current})")]
    StaleForm {
        dialog: DialogId,
        armed: u64,
        current: u64,
    },

    /// A submission for the same dialog is still awaiting its response
    #[error("Submission already in flight for dialog {0}")]
    SubmissionInFlight(DialogId),

    /// Network error
    #[error("Network error: {url} - {detail}")]
    NetworkError { url: String, detail: String },

    /// The request did not complete within the configured timeout
    #[error("Request timed out: {url}")]
    Timeout { url: String },

    /// Non-success HTTP status
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    /// A success payload could not be decoded
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Markup could not be interpreted
    #[error("Markup error: {0}")]
    MarkupError(String),

    /// Configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CrudError {
    /// Whether this is expected behavior (user interaction races, missing optional markup),
    /// used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::SubmissionInFlight(_) | Self::StaleForm { .. } | Self::NotArmed(_)
        )
    }

    /// Whether the failure happened on the wire rather than in the page.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::HttpStatus { .. }
        )
    }
}

impl From<serde_json::Error> for CrudError {
    fn from(e: serde_json::Error) -> Self {
        Self::ParseError(e.to_string())
    }
}

/// Core layer Result type alias
pub type CrudResult<T> = std::result::Result<T, CrudError>;
