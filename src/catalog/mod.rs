//! Movie catalog access.
//!
//! - [`types`] - Domain types and the typed parse step for catalog payloads
//! - [`client`] - HTTP client for the TMDB v3 API and the [`CatalogSource`] seam
//!
//! Two read requests exist: discover-by-popularity and search-by-title. Both
//! are paged and both produce a [`ResultPage`] or a [`CatalogError`].

mod client;
mod types;

pub use client::{build_http_client, CatalogError, CatalogSource, TmdbClient, DEFAULT_BASE_URL};
pub use types::{
    parse_page, CatalogQuery, MovieSummary, ResultPage, DEFAULT_API_ERROR, MAX_CATALOG_PAGE,
};
