//! Spawning catalog requests off the UI task.

use crate::app::{App, AppEvent};
use crate::catalog::CatalogSource;
use crate::controller::PageRequest;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Wraps a future to catch panics and convert them to errors.
///
/// A panicking fetch would otherwise vanish inside the runtime and leave the
/// controller loading forever.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            }
        })
}

/// Run `request` in the background and report through `event_tx`.
///
/// The previous fetch is aborted first. Its completion would be discarded as
/// stale anyway, so there is no point letting it finish.
pub(super) fn spawn_fetch<C>(
    app: &mut App,
    catalog: &Arc<C>,
    event_tx: &mpsc::Sender<AppEvent>,
    request: PageRequest,
) where
    C: CatalogSource + 'static,
{
    if let Some(handle) = app.fetch_handle.take() {
        handle.abort();
        tracing::debug!("Aborted previous catalog fetch");
    }

    let catalog = Arc::clone(catalog);
    let tx = event_tx.clone();
    let PageRequest {
        generation,
        query,
        page,
    } = request;

    tracing::debug!(generation, page, search = ?query.search_text(), "Spawning catalog fetch");

    app.fetch_handle = Some(tokio::spawn(async move {
        let event = match catch_task_panic(catalog.fetch_page(&query, page)).await {
            Ok(result) => AppEvent::PageLoaded { generation, result },
            Err(error) => {
                tracing::error!(generation, error = %error, "Catalog fetch panicked");
                AppEvent::FetchPanicked { generation, error }
            }
        };

        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send fetch result (receiver dropped)");
        }
    }));
}

/// Spawn `request` if there is one; page actions outside the valid range yield none.
pub(super) fn dispatch<C>(
    app: &mut App,
    catalog: &Arc<C>,
    event_tx: &mpsc::Sender<AppEvent>,
    request: Option<PageRequest>,
) where
    C: CatalogSource + 'static,
{
    if let Some(request) = request {
        app.selected = 0;
        spawn_fetch(app, catalog, event_tx, request);
    }
}
