//! Test helpers
//!
//! Mock transport, markup fixtures and factories for a page carrying the
//! stock dialogs.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify, RwLock};

use crate::config::CrudConfig;
use crate::controller::CrudController;
use crate::dom::{MemoryPage, MemoryPageBuilder};
use crate::error::{CrudError, CrudResult};
use crate::registry::DialogRegistry;
use crate::services::CrudContext;
use crate::traits::{MarkupClassifier, Transport};
use crate::types::FormSubmission;

/// Create/edit form with an author select, its add-another link and a
/// multi-select of tags (tag 3 selected)
pub const BOOK_FORM: &str = r#"<form id="create-edit-form" method="post" action="/books/new/">
  <input type="hidden" name="csrfmiddlewaretoken" value="tok">
  <div class="form-group"><input type="text" name="title" value=""></div>
  <select name="author" id="id_author">
    <option value="">---------</option>
    <option value="1">Frank Herbert</option>
  </select>
  <a href="javascript:void(0);" class="add-another" id="add_id_author" data-url="/authors/new/">Add another</a>
  <select name="tags" id="id_tags" multiple>
    <option value="3" selected>SF</option>
    <option value="5">Classic</option>
  </select>
</form>"#;

pub const AUTHOR_FORM: &str = r#"<form id="create-edit-form" method="post" action="/authors/new/">
  <input type="hidden" name="csrfmiddlewaretoken" value="tok">
  <div class="form-group"><input type="text" name="name" value=""></div>
</form>"#;

pub const AUTHOR_FORM_INVALID: &str = r#"<form id="create-edit-form" method="post" action="/authors/new/">
  <input type="hidden" name="csrfmiddlewaretoken" value="tok">
  <div class="form-group has-error"><input type="text" name="name" value="">
    <span class="help-block">This field is required.</span></div>
</form>"#;

// ===== MockTransport =====

/// A request seen by [`MockTransport`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    /// `None` for fragment fetches
    pub submission: Option<FormSubmission>,
}

/// Transport answering from per-URL queues of scripted responses
pub struct MockTransport {
    responses: Mutex<HashMap<String, VecDeque<CrudResult<String>>>>,
    requests: RwLock<Vec<RecordedRequest>>,
    /// If set, the next request waits for a notification before answering
    gate: RwLock<Option<Arc<Notify>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            requests: RwLock::new(Vec::new()),
            gate: RwLock::new(None),
        }
    }

    pub async fn respond(&self, url: &str, body: &str) {
        self.push(url, Ok(body.to_string())).await;
    }

    pub async fn fail(&self, url: &str, err: CrudError) {
        self.push(url, Err(err)).await;
    }

    async fn push(&self, url: &str, response: CrudResult<String>) {
        self.responses
            .lock()
            .await
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }

    /// Hold the next request until the returned handle is notified.
    pub async fn gate(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.write().await = Some(Arc::clone(&notify));
        notify
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    pub fn status_error(url: &str, status: u16) -> CrudError {
        CrudError::HttpStatus {
            url: url.to_string(),
            status,
        }
    }

    async fn answer(&self, url: &str, submission: Option<&FormSubmission>) -> CrudResult<String> {
        self.requests.write().await.push(RecordedRequest {
            url: url.to_string(),
            submission: submission.cloned(),
        });
        let gate = self.gate.write().await.take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.responses
            .lock()
            .await
            .get_mut(url)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(CrudError::NetworkError {
                    url: url.to_string(),
                    detail: "no response scripted".to_string(),
                })
            })
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch(&self, url: &str) -> CrudResult<String> {
        self.answer(url, None).await
    }

    async fn send(&self, submission: &FormSubmission) -> CrudResult<String> {
        self.answer(&submission.url, Some(submission)).await
    }
}

// ===== Factories =====

fn build_page(customize: impl FnOnce(MemoryPageBuilder) -> MemoryPageBuilder) -> Arc<MemoryPage> {
    let builder = MemoryPage::builder()
        .location("/")
        .standard_dialogs(&CrudConfig::default());
    Arc::new(customize(builder).build())
}

/// Context over a page with the stock dialogs.
pub fn create_test_context() -> (Arc<CrudContext>, Arc<MemoryPage>, Arc<MockTransport>) {
    create_test_context_with(|b| b)
}

pub fn create_test_context_with(
    customize: impl FnOnce(MemoryPageBuilder) -> MemoryPageBuilder,
) -> (Arc<CrudContext>, Arc<MemoryPage>, Arc<MockTransport>) {
    let config = CrudConfig::default();
    let page = build_page(customize);
    let transport = Arc::new(MockTransport::new());
    let registry = DialogRegistry::discover(page.as_ref(), &config).unwrap();
    let ctx = CrudContext::new(
        page.clone(),
        transport.clone(),
        Arc::new(MarkupClassifier::from_config(&config)),
        config,
        registry,
    );
    (Arc::new(ctx), page, transport)
}

pub fn create_test_controller(
    customize: impl FnOnce(MemoryPageBuilder) -> MemoryPageBuilder,
) -> (CrudController, Arc<MemoryPage>, Arc<MockTransport>) {
    let page = build_page(customize);
    let transport = Arc::new(MockTransport::new());
    let controller =
        CrudController::new(page.clone(), transport.clone(), CrudConfig::default()).unwrap();
    (controller, page, transport)
}
