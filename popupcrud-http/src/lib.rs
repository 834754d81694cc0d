//! # popupcrud-http
//!
//! [`Transport`](popupcrud_core::Transport) implementation over `reqwest`.
//!
//! Requests carry `X-Requested-With: XMLHttpRequest`, which is how the server
//! tells an asynchronous dialog request from a full page navigation and
//! answers with a fragment or JSON instead of a whole page.
//!
//! POSTs are checked by the server against the CSRF cookie, so the page's
//! cookies are seeded into the transport's jar before the first request.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: use the platform's native TLS implementation.
//! - **`rustls`**: use rustls.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use popupcrud_core::dom::MemoryPage;
//! use popupcrud_core::{CrudConfig, CrudController, Page};
//! use popupcrud_http::HttpTransport;
//!
//! # async fn run() -> popupcrud_core::CrudResult<()> {
//! let config = CrudConfig::load("popupcrud.toml")?;
//! let page = Arc::new(MemoryPage::builder().standard_dialogs(&config).build());
//! let transport = HttpTransport::from_config(&config.http)?;
//! transport.seed_cookies(&page.cookies())?;
//!
//! let transport = Arc::new(transport);
//!
//! let controller = CrudController::new(page, transport, config)?;
//! controller.initialize().await?;
//! # Ok(())
//! # }
//! ```

mod http_client;
mod transport;

pub use http_client::HttpUtils;
pub use transport::HttpTransport;
