//! Type definition module

mod dialog;
mod form;
mod response;
mod trigger;

pub use dialog::{BackdropId, Container, DialogId, DialogRole};
pub use form::{Completion, FormHandle, FormSubmission, HttpMethod, SubmissionContext};
pub use response::{ActionOutcome, CreatedObject, SubmitOutcome, Verdict};
pub use trigger::{AddAnotherTrigger, EventTarget, SelectRef, SelectState, Trigger};
