//! reqwest transport

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use popupcrud_core::config::HttpConfig;
use popupcrud_core::types::{FormSubmission, HttpMethod};
use popupcrud_core::{CrudError, CrudResult, Transport};
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use url::Url;

use crate::http_client::HttpUtils;

const REQUESTED_WITH: &str = "x-requested-with";
const XML_HTTP_REQUEST: &str = "XMLHttpRequest";

/// [`Transport`] over a shared `reqwest` client.
///
/// URLs found in the page are usually relative (`/books/new/`); they are
/// resolved against the configured base URL.
///
/// Cookies live in a jar shared by every request, so the session and CSRF
/// cookies set by the server are sent back like a browser would.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base: Option<Url>,
    jar: Arc<Jar>,
}

impl HttpTransport {
    /// Build a client with the configured timeout, user agent and AJAX marker
    /// header.
    pub fn from_config(config: &HttpConfig) -> CrudResult<Self> {
        let base = config
            .base_url
            .as_deref()
            .map(|raw| {
                Url::parse(raw)
                    .map_err(|e| CrudError::InvalidConfig(format!("http.base_url {raw}: {e}")))
            })
            .transpose()?;

        let mut headers = HeaderMap::new();
        headers.insert(REQUESTED_WITH, HeaderValue::from_static(XML_HTTP_REQUEST));

        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .default_headers(headers)
            .cookie_provider(Arc::clone(&jar))
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CrudError::InvalidConfig(format!("http client: {e}")))?;

        log::debug!(
            "HTTP transport ready (base {}, timeout {}s)",
            base.as_ref().map_or("<none>", Url::as_str),
            config.timeout_secs
        );
        Ok(Self { client, base, jar })
    }

    /// Add the cookies of the hosting page (`name=value; name2=value2`, as in
    /// `document.cookie`) for the base URL. Returns the number of cookies
    /// added.
    pub fn seed_cookies(&self, cookies: &str) -> CrudResult<usize> {
        let Some(base) = &self.base else {
            return Err(CrudError::InvalidConfig(
                "http.base_url is required to seed cookies".to_string(),
            ));
        };
        let origin = base
            .join("/")
            .map_err(|e| CrudError::InvalidConfig(format!("http.base_url {base}: {e}")))?;

        let mut added = 0;
        for pair in cookies.split(';').map(str::trim) {
            if pair.is_empty() || !pair.contains('=') {
                continue;
            }
            self.jar.add_cookie_str(&format!("{pair}; Path=/"), &origin);
            added += 1;
        }
        log::debug!("Seeded {added} cookies for {origin}");
        Ok(added)
    }

    /// Resolve a URL from the page against the base URL.
    pub fn resolve(&self, raw: &str) -> CrudResult<Url> {
        let parsed = match &self.base {
            Some(base) => base.join(raw),
            None => Url::parse(raw),
        };
        parsed.map_err(|e| CrudError::NetworkError {
            url: raw.to_string(),
            detail: format!("cannot resolve URL: {e}"),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> CrudResult<String> {
        let target = self.resolve(url)?;
        let request = self.client.get(target.clone());
        HttpUtils::execute_request(request, "GET", target.as_str()).await
    }

    async fn send(&self, submission: &FormSubmission) -> CrudResult<String> {
        let target = self.resolve(&submission.url)?;
        let request = match submission.method {
            HttpMethod::Get => self.client.get(target.clone()).query(&submission.fields),
            HttpMethod::Post => self.client.post(target.clone()).form(&submission.fields),
        };
        HttpUtils::execute_request(request, submission.method.as_str(), target.as_str()).await
    }
}
