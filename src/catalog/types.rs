use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use super::CatalogError;

/// Highest page the catalog will serve; requests beyond it are rejected upstream.
pub const MAX_CATALOG_PAGE: u32 = 500;

/// Message used when the API signals an error without saying why.
pub const DEFAULT_API_ERROR: &str = "Failed to fetch movies";

/// Public movie page on the catalog's website, used for "open in browser".
const MOVIE_PAGE_BASE: &str = "https://www.themoviedb.org/movie";

// ============================================================================
// Domain Types
// ============================================================================

/// The two request shapes the catalog understands.
///
/// Search text lives inside the variant, so a browse request can never
/// carry stale query text to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogQuery {
    /// Discover movies sorted by descending popularity.
    Discover,
    /// Free-text title search. The text is trimmed and non-empty.
    Search(String),
}

impl CatalogQuery {
    pub fn search_text(&self) -> Option<&str> {
        match self {
            Self::Discover => None,
            Self::Search(text) => Some(text),
        }
    }
}

/// One movie as shown on a card.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: Option<NaiveDate>,
    /// Always within `0.0..=10.0` when present.
    pub vote_average: Option<f64>,
}

impl MovieSummary {
    pub fn release_year(&self) -> Option<i32> {
        self.release_date.map(|d| d.year())
    }

    /// Full poster URL for the given image base (e.g. `https://image.tmdb.org/t/p/w500`).
    pub fn poster_url(&self, image_base: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|path| format!("{}{}", image_base.trim_end_matches('/'), path))
    }

    pub fn page_url(&self) -> String {
        format!("{}/{}", MOVIE_PAGE_BASE, self.id)
    }
}

/// One page of results, replacing whatever page was shown before.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultPage {
    pub items: Vec<MovieSummary>,
    pub total_pages: u32,
    pub page: u32,
}

// ============================================================================
// Wire Format
// ============================================================================

/// Raw page payload. Every field is optional on the wire; defaults are applied
/// once in [`parse_page`] rather than at each use site.
#[derive(Debug, Deserialize)]
struct RawPage {
    results: Option<Vec<RawMovie>>,
    total_pages: Option<u32>,
    page: Option<u32>,
    /// Catalog error envelope: `{"success": false, "status_message": "..."}`.
    success: Option<bool>,
    status_message: Option<String>,
    /// Legacy error envelope: `{"Response": "False", "Error": "..."}`.
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMovie {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    vote_average: Option<f64>,
}

impl From<RawMovie> for MovieSummary {
    fn from(raw: RawMovie) -> Self {
        let release_date = raw
            .release_date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());

        let vote_average = raw
            .vote_average
            .filter(|v| v.is_finite() && (0.0..=10.0).contains(v));

        let poster_path = raw.poster_path.filter(|p| !p.trim().is_empty());

        Self {
            id: raw.id,
            title: raw.title.unwrap_or_default(),
            poster_path,
            release_date,
            vote_average,
        }
    }
}

/// Parse a catalog response body into a [`ResultPage`].
///
/// - Not JSON, or fields of the wrong type → `CatalogError::Malformed`
/// - Error envelope → `CatalogError::Api` (message defaults to [`DEFAULT_API_ERROR`])
/// - Missing `results` → empty page; missing `total_pages` → 0;
///   missing `page` → `requested_page`
pub fn parse_page(body: &[u8], requested_page: u32) -> Result<ResultPage, CatalogError> {
    let raw: RawPage =
        serde_json::from_slice(body).map_err(|e| CatalogError::Malformed(e.to_string()))?;

    let legacy_error = raw
        .response
        .as_deref()
        .is_some_and(|r| r.eq_ignore_ascii_case("false"));

    if raw.success == Some(false) || legacy_error {
        let message = raw
            .status_message
            .or(raw.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_ERROR.to_string());
        return Err(CatalogError::Api(message));
    }

    let items: Vec<MovieSummary> = raw
        .results
        .unwrap_or_default()
        .into_iter()
        .map(MovieSummary::from)
        .collect();

    Ok(ResultPage {
        items,
        total_pages: raw.total_pages.unwrap_or(0).min(MAX_CATALOG_PAGE),
        page: raw.page.filter(|p| *p >= 1).unwrap_or(requested_page),
    })
}
