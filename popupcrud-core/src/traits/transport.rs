//! HTTP transport abstract Trait

use async_trait::async_trait;

use crate::error::CrudResult;
use crate::types::FormSubmission;

/// Transport Trait
///
/// Asynchronous requests to the server that rendered the page. Implementations
/// map connection failures, timeouts and non-success statuses to the transport
/// variants of [`CrudError`](crate::CrudError); a 200 carrying a re-rendered
/// form is a successful exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET an HTML fragment.
    ///
    /// # Arguments
    /// * `url` - fragment URL, as found in the page
    async fn fetch(&self, url: &str) -> CrudResult<String>;

    /// Send form data and return the raw response body.
    ///
    /// # Arguments
    /// * `submission` - method, destination and serialized fields
    async fn send(&self, submission: &FormSubmission) -> CrudResult<String>;
}
