//! Popup CRUD Core Library
//!
//! Client-side orchestration for server-rendered CRUD pages built around
//! modal dialogs:
//! - Fragment loading into dialogs
//! - Asynchronous form submission with in-place re-rendering on validation errors
//! - Nested "add another" dialogs that patch the originating select control
//! - Stacking order of simultaneously visible dialogs
//!
//! The document and the network are reached through the [`Page`] and
//! [`Transport`] traits, so the controller runs unchanged against a browser
//! bridge, a headless [`MemoryPage`](dom::MemoryPage) or a test double.

pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod registry;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::CrudConfig;
pub use controller::{CrudController, TriggerOutcome};
pub use error::{CrudError, CrudResult};
pub use services::CrudContext;
pub use traits::{MarkupClassifier, Page, ResponseClassifier, Transport};
