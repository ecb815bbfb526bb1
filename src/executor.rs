//! Outbound request execution with rate-limit retry.
//!
//! Every call to the API goes through [`Client::execute`]. A `429 Too Many Requests`
//! answer is retried after a fixed delay until the configured ceiling has elapsed since
//! the first attempt; any other failure is returned immediately.

use crate::models::Account;
use crate::{Client, Error, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Description of a single API call, replayable across retries.
#[derive(Debug, Clone)]
pub(crate) struct ApiRequest<'a> {
    method: Method,
    path: &'a str,
    token: Option<&'a str>,
    body: Option<&'a Account>,
    accept: &'static str,
}

impl<'a> ApiRequest<'a> {
    pub(crate) fn get(path: &'a str) -> Self {
        Self {
            method: Method::GET,
            path,
            token: None,
            body: None,
            accept: "application/json",
        }
    }

    pub(crate) fn post(path: &'a str, body: &'a Account) -> Self {
        Self {
            method: Method::POST,
            path,
            token: None,
            body: Some(body),
            accept: "application/json",
        }
    }

    /// Attach `Authorization: Bearer <token>`.
    pub(crate) fn bearer(mut self, token: &'a str) -> Self {
        self.token = Some(token);
        self
    }

    /// Ask for a raw binary body.
    pub(crate) fn binary(mut self) -> Self {
        self.accept = "*/*";
        self
    }
}

impl Client {
    /// Send `request`, retrying while rate limited, and return the raw body.
    #[instrument(
        name = "Client::execute",
        skip_all,
        fields(method = %request.method, path = request.path)
    )]
    pub(crate) async fn execute(&self, request: &ApiRequest<'_>) -> Result<Vec<u8>> {
        let url = self.url(request.path);
        let started = Instant::now();
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;

            let response = match self.build_request(request, &url).send().await {
                Ok(response) => response,
                Err(source) => return Err(Self::unexpected(request, url, source)),
            };

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                tokio::time::sleep(self.rate_limit_retry_interval).await;

                let elapsed = started.elapsed();
                if elapsed > self.rate_limit_ceiling {
                    warn!(?elapsed, attempts, "Rate limited past ceiling, giving up");
                    return Err(Error::RateLimitExceeded { elapsed, attempts });
                }

                debug!(?elapsed, attempts, "Rate limited, retrying");
                continue;
            }

            let response = match response.error_for_status() {
                Ok(response) => response,
                Err(source) => return Err(Self::unexpected(request, url, source)),
            };

            return match response.bytes().await {
                Ok(body) => {
                    debug!(attempts, bytes = body.len(), "Request succeeded");
                    Ok(body.to_vec())
                }
                Err(source) => Err(Self::unexpected(request, url, source)),
            };
        }
    }

    /// [`execute`](Self::execute) and decode the body as JSON.
    pub(crate) async fn execute_json<T: DeserializeOwned>(
        &self,
        request: &ApiRequest<'_>,
    ) -> Result<T> {
        let body = self.execute(request).await?;
        serde_json::from_slice(&body).map_err(|source| Error::ResponseParse {
            url: self.url(request.path),
            source,
        })
    }

    /// Absolute URL for an API path. Paths start with `/`.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn build_request(&self, request: &ApiRequest<'_>, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .header(ACCEPT, request.accept);

        if let Some(token) = request.token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = request.body {
            builder = builder.json(body);
        }
        builder
    }

    fn unexpected(request: &ApiRequest<'_>, url: String, source: reqwest::Error) -> Error {
        warn!(
            method = %request.method,
            url = %url,
            status = ?source.status(),
            error = %source,
            "Request failed"
        );
        Error::UnexpectedResponse {
            method: request.method.clone(),
            url,
            source,
        }
    }
}
