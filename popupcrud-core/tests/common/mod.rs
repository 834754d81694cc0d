//! Shared fixtures and a scripted transport for integration tests

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use popupcrud_core::dom::{MemoryPage, MemoryPageBuilder};
use popupcrud_core::types::FormSubmission;
use popupcrud_core::{CrudConfig, CrudController, CrudError, CrudResult, Transport};
use tokio::sync::Mutex;

/// List page markup: one inline add-another link outside any dialog
pub const LIST_PAGE: &str = r#"<table class="table">
  <tr><td><div data-name="Dune">Dune</div></td>
      <td><a name="delete_object" data-url="/widget/1/delete/">Delete</a></td></tr>
</table>"#;

/// Widget form with a category select and its add-another link
pub const WIDGET_FORM: &str = r#"<form id="create-edit-form" method="post" action="/widget/new">
  <input type="hidden" name="csrfmiddlewaretoken" value="tok">
  <div class="form-group"><input type="text" name="name" value="Sprocket"></div>
  <select name="category" id="id_category">
    <option value="">---------</option>
    <option value="1">Tools</option>
  </select>
  <a href="javascript:void(0);" class="add-another" id="add_id_category" data-url="/category/new">Add Category</a>
</form>"#;

pub const WIDGET_FORM_INVALID: &str = r#"<form id="create-edit-form" method="post" action="/widget/new">
  <input type="hidden" name="csrfmiddlewaretoken" value="tok">
  <div class="form-group has-error"><input type="text" name="name" value="">
    <span class="help-block">This field is required.</span></div>
  <select name="category" id="id_category">
    <option value="">---------</option>
    <option value="1">Tools</option>
  </select>
  <a href="javascript:void(0);" class="add-another" id="add_id_category" data-url="/category/new">Add Category</a>
</form>"#;

pub const CATEGORY_FORM: &str = r#"<form id="create-edit-form" method="post" action="/category/new">
  <input type="hidden" name="csrfmiddlewaretoken" value="tok">
  <div class="form-group"><input type="text" name="name" value="Gadgets"></div>
</form>"#;

pub const CATEGORY_FORM_INVALID: &str = r#"<div class="alert alert-danger">Category exists</div>
<form id="create-edit-form" method="post" action="/category/new">
  <input type="hidden" name="csrfmiddlewaretoken" value="tok">
  <div class="form-group"><input type="text" name="name" value="Gadgets"></div>
</form>"#;

/// Transport replaying scripted responses per URL and recording requests
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<HashMap<String, VecDeque<CrudResult<String>>>>,
    sent: Mutex<Vec<(String, Option<FormSubmission>)>>,
}

impl ScriptedTransport {
    pub async fn respond(&self, url: &str, body: &str) {
        self.script
            .lock()
            .await
            .entry(url.to_string())
            .or_default()
            .push_back(Ok(body.to_string()));
    }

    pub async fn fail(&self, url: &str, err: CrudError) {
        self.script
            .lock()
            .await
            .entry(url.to_string())
            .or_default()
            .push_back(Err(err));
    }

    /// Submissions sent so far, fragment fetches excluded.
    pub async fn submissions(&self) -> Vec<FormSubmission> {
        self.sent
            .lock()
            .await
            .iter()
            .filter_map(|(_, s)| s.clone())
            .collect()
    }

    pub async fn urls(&self) -> Vec<String> {
        self.sent.lock().await.iter().map(|(u, _)| u.clone()).collect()
    }

    async fn next(&self, url: &str, submission: Option<&FormSubmission>) -> CrudResult<String> {
        self.sent
            .lock()
            .await
            .push((url.to_string(), submission.cloned()));
        self.script
            .lock()
            .await
            .get_mut(url)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(CrudError::NetworkError {
                    url: url.to_string(),
                    detail: "unexpected request".to_string(),
                })
            })
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn fetch(&self, url: &str) -> CrudResult<String> {
        self.next(url, None).await
    }

    async fn send(&self, submission: &FormSubmission) -> CrudResult<String> {
        self.next(&submission.url, Some(submission)).await
    }
}

/// Page with the stock dialogs, located at `/widget/`.
pub fn page_with(customize: impl FnOnce(MemoryPageBuilder) -> MemoryPageBuilder) -> Arc<MemoryPage> {
    let builder = MemoryPage::builder()
        .location("/widget/")
        .cookies("csrftoken=tok")
        .root(LIST_PAGE)
        .standard_dialogs(&CrudConfig::default());
    Arc::new(customize(builder).build())
}

pub fn setup() -> (CrudController, Arc<MemoryPage>, Arc<ScriptedTransport>) {
    setup_with(|b| b)
}

pub fn setup_with(
    customize: impl FnOnce(MemoryPageBuilder) -> MemoryPageBuilder,
) -> (CrudController, Arc<MemoryPage>, Arc<ScriptedTransport>) {
    let page = page_with(customize);
    let transport = Arc::new(ScriptedTransport::default());
    let controller =
        CrudController::new(page.clone(), transport.clone(), CrudConfig::default()).unwrap();
    (controller, page, transport)
}
