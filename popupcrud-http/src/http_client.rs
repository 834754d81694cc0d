//! Generic HTTP request execution
//!
//! Sending, logging and status handling shared by fragment fetches and form
//! submissions.

use popupcrud_core::utils::truncate_for_log;
use popupcrud_core::{CrudError, CrudResult};
use reqwest::RequestBuilder;

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns the response text
    ///
    /// # Arguments
    /// * `request_builder` - configured request (URL, headers, body)
    /// * `method_name` - request method (for logs)
    /// * `url` - request URL (for logs and errors)
    ///
    /// # Returns
    /// * `Ok(text)` - body of a 2xx response, whatever it contains
    /// * `Err(CrudError::Timeout)` - the client timeout elapsed
    /// * `Err(CrudError::HttpStatus)` - any other status
    /// * `Err(CrudError::NetworkError)` - connection or body read failure
    pub async fn execute_request(
        request_builder: RequestBuilder,
        method_name: &str,
        url: &str,
    ) -> CrudResult<String> {
        log::debug!("{method_name} {url}");

        let response = request_builder
            .send()
            .await
            .map_err(|e| Self::map_send_error(&e, url))?;

        let status = response.status();
        log::debug!("Response Status: {}", status.as_u16());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!(
                "{method_name} {url} failed with HTTP {}: {}",
                status.as_u16(),
                truncate_for_log(&body)
            );
            return Err(CrudError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                CrudError::Timeout {
                    url: url.to_string(),
                }
            } else {
                CrudError::NetworkError {
                    url: url.to_string(),
                    detail: format!("Failed to read response body: {e}"),
                }
            }
        })?;

        log::debug!("Response Body: {}", truncate_for_log(&text));
        Ok(text)
    }

    fn map_send_error(e: &reqwest::Error, url: &str) -> CrudError {
        if e.is_timeout() {
            CrudError::Timeout {
                url: url.to_string(),
            }
        } else {
            CrudError::NetworkError {
                url: url.to_string(),
                detail: e.to_string(),
            }
        }
    }
}
