use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use super::types::{parse_page, CatalogQuery, ResultPage};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

const MAX_RESPONSE_SIZE: usize = 2 * 1024 * 1024; // 2MB

/// Shown for every transport-level failure; the detail goes to the log.
const TRANSPORT_ERROR_MESSAGE: &str = "Error fetching movies. Please try again later.";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Request timed out")]
    Timeout,
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    /// Well-formed response in which the catalog reports a logical failure.
    #[error("Catalog error: {0}")]
    Api(String),
    /// Body could not be turned into a result page.
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Insecure base URL: HTTPS required (except localhost for testing)")]
    InsecureBaseUrl,
}

impl CatalogError {
    /// True for failures of the transport rather than of the catalog itself.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::Network(_) | Self::HttpStatus(_) | Self::ResponseTooLarge(_)
        )
    }

    /// Single human-readable message for the error state.
    ///
    /// Transport failures all read the same; API failures carry the catalog's
    /// own message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(message) => message.clone(),
            Self::Malformed(_) => "Unexpected response from the movie catalog.".to_string(),
            Self::InvalidBaseUrl(_) | Self::InsecureBaseUrl => self.to_string(),
            _ => TRANSPORT_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Anything that can produce a page of catalog results.
///
/// The HTTP client implements this; tests drive the controller with scripted
/// sources instead.
pub trait CatalogSource: Send + Sync {
    fn fetch_page(
        &self,
        query: &CatalogQuery,
        page: u32,
    ) -> impl Future<Output = Result<ResultPage, CatalogError>> + Send;
}

/// Build the shared HTTP client. The request timeout is the only timeout applied
/// to catalog calls.
pub fn build_http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(30))
        .timeout(timeout)
        .build()
}

/// HTTP client for the TMDB v3 API.
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    token: SecretString,
}

impl TmdbClient {
    /// Create a client against `base_url`.
    ///
    /// The base must be HTTPS so the bearer token is never sent in clear text;
    /// plain HTTP is accepted only for localhost, which the tests use.
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        token: SecretString,
    ) -> Result<Self, CatalogError> {
        let parsed = Url::parse(base_url).map_err(|e| CatalogError::InvalidBaseUrl(e.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(CatalogError::InvalidBaseUrl(base_url.to_string()));
        }

        match parsed.scheme() {
            "https" => {}
            "http" => {
                let is_localhost = matches!(parsed.host_str(), Some("localhost" | "127.0.0.1"));
                if !is_localhost {
                    tracing::error!(base_url = %base_url, "Rejecting non-HTTPS catalog base URL");
                    return Err(CatalogError::InsecureBaseUrl);
                }
                tracing::warn!(base_url = %base_url, "Using non-HTTPS catalog base URL (localhost only)");
            }
            other => {
                return Err(CatalogError::InvalidBaseUrl(format!(
                    "unsupported scheme '{}'",
                    other
                )))
            }
        }

        if base_url.trim_end_matches('/') != DEFAULT_BASE_URL {
            tracing::info!(base_url = %base_url, "Using custom catalog base URL");
        }

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// URL for one request: discover sorted by popularity, or an escaped title search.
    pub fn request_url(&self, query: &CatalogQuery, page: u32) -> Result<Url, CatalogError> {
        let page = page.to_string();
        let parsed = match query {
            CatalogQuery::Discover => Url::parse_with_params(
                &format!("{}/discover/movie", self.base_url),
                &[("sort_by", "popularity.desc"), ("page", page.as_str())],
            ),
            CatalogQuery::Search(text) => Url::parse_with_params(
                &format!("{}/search/movie", self.base_url),
                &[("query", text.as_str()), ("page", page.as_str())],
            ),
        };
        parsed.map_err(|e| CatalogError::InvalidBaseUrl(e.to_string()))
    }

    async fn get_page(&self, query: &CatalogQuery, page: u32) -> Result<ResultPage, CatalogError> {
        let url = self.request_url(query, page)?;
        tracing::debug!(
            search = ?query.search_text(),
            page,
            "Fetching catalog page"
        );

        let response = self
            .http
            .get(url)
            .header("accept", "application/json")
            .header(
                "Authorization",
                format!("Bearer {}", self.token.expose_secret()),
            )
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), page, "Catalog returned error status");
            return Err(CatalogError::HttpStatus(status.as_u16()));
        }

        let body = read_limited_body(response, MAX_RESPONSE_SIZE).await?;
        let result = parse_page(&body, page)?;

        tracing::debug!(
            page = result.page,
            total_pages = result.total_pages,
            items = result.items.len(),
            "Catalog page received"
        );
        Ok(result)
    }
}

impl CatalogSource for TmdbClient {
    fn fetch_page(
        &self,
        query: &CatalogQuery,
        page: u32,
    ) -> impl Future<Output = Result<ResultPage, CatalogError>> + Send {
        self.get_page(query, page)
    }
}

/// The request timeout covers the body too, so both phases map it the same way.
fn transport_error(e: reqwest::Error) -> CatalogError {
    if e.is_timeout() {
        CatalogError::Timeout
    } else {
        CatalogError::Network(e)
    }
}

async fn read_limited_body(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, CatalogError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(CatalogError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(transport_error)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(CatalogError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
