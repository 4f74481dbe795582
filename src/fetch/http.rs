// src/fetch/http.rs
// =============================================================================
// Fetches pages over HTTP with reqwest.
//
// Rules:
// - One GET per URL, 5 second timeout, redirects are NOT followed
// - First attempt uses our own User-Agent; on a connection error we retry
//   exactly once with a browser User-Agent (some servers drop unknown agents)
// - Only "200 OK" with an HTML content type counts as a page we can extract
//   from; everything else is classified and reported, never fatal
// - An optional proxy applies to every request
//
// URLs without a scheme ("example.com/a") are requested as http://...
// The crawler still uses the original string as its key.
// =============================================================================

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{redirect, Client, Proxy, Response, StatusCode};
use std::future::Future;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{FetchResult, PageFetcher};
use crate::error::Result;

const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

// The real network fetcher
//
// Client is cheap to clone (it's an Arc internally), but we only need one:
// the whole crawl shares this fetcher behind an Arc.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds the fetcher.
    ///
    /// Fails if the proxy URL cannot be parsed or the TLS backend cannot be
    /// initialised.
    pub fn new(proxy: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .user_agent(DEFAULT_USER_AGENT);

        if let Some(proxy) = proxy {
            builder = builder.proxy(Proxy::all(proxy)?);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    async fn send(&self, url: &str) -> std::result::Result<Response, reqwest::Error> {
        with_agent_fallback(|agent| {
            let mut request = self.client.get(url);
            if let Some(agent) = agent {
                request = request.header(USER_AGENT, agent);
            }
            request.send()
        })
        .await
    }
}

// Runs `attempt` with the default agent (None), and exactly once more with
// the browser agent if that failed to connect
async fn with_agent_fallback<T, F, Fut>(mut attempt: F) -> std::result::Result<T, reqwest::Error>
where
    F: FnMut(Option<&'static str>) -> Fut,
    Fut: Future<Output = std::result::Result<T, reqwest::Error>>,
{
    match attempt(None).await {
        Err(e) if e.is_connect() => {
            debug!(error = %e, "connection failed, retrying with browser user agent");
            attempt(Some(BROWSER_USER_AGENT)).await
        }
        other => other,
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        let target = request_url(url);

        let response = match self.send(&target).await {
            Ok(response) => response,
            Err(e) => return categorize_error(&e),
        };

        let status = response.status();
        if status != StatusCode::OK {
            return FetchResult::HttpError(status.as_u16());
        }

        // A missing content type is treated as HTML
        if let Some(content_type) = content_type(&response) {
            if !content_type.contains("text/html") {
                return FetchResult::NonHtml(content_type);
            }
        }

        match response.text().await {
            Ok(body) => FetchResult::Ok(body),
            Err(e) => categorize_error(&e),
        }
    }
}

// Adds "http://" when the URL has no usable scheme
//
// Url::parse("example.com") fails (no scheme), and
// Url::parse("localhost:8080") succeeds with the scheme "localhost",
// so both cases fall through to the prefixed form.
fn request_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => url.to_string(),
        _ => format!("http://{}", url),
    }
}

fn content_type(response: &Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_ascii_lowercase())
}

// Maps a reqwest error onto our fetch outcomes
fn categorize_error(error: &reqwest::Error) -> FetchResult {
    if error.is_timeout() {
        FetchResult::Timeout
    } else {
        FetchResult::NetworkError(error.to_string())
    }
}
