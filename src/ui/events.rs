//! Application event handling.
//!
//! Applies background fetch results to the controller. Completions for
//! anything but the latest request are dropped by the controller itself.

use crate::app::{App, AppEvent};

/// Message shown when a fetch task died without reporting.
const FETCH_PANIC_MESSAGE: &str = "Something went wrong while fetching movies.";

pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::PageLoaded { generation, result } => {
            if app.controller.complete(generation, result) {
                app.fetch_handle = None;
                app.clamp_selection();
            } else {
                tracing::debug!(generation, "Discarded stale catalog response");
            }
        }
        AppEvent::FetchPanicked { generation, error } => {
            tracing::error!(generation, error = %error, "Fetch task panicked");
            if app.controller.fail(generation, FETCH_PANIC_MESSAGE) {
                app.fetch_handle = None;
                app.clamp_selection();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogError, MovieSummary, ResultPage};
    use crate::controller::Phase;
    use crate::keybindings::KeybindingRegistry;
    use crate::theme::ThemeVariant;

    fn test_app() -> App {
        App::new(ThemeVariant::Dark, KeybindingRegistry::new(), "")
    }

    fn page(ids: &[u64], total_pages: u32, page: u32) -> ResultPage {
        ResultPage {
            items: ids
                .iter()
                .map(|&id| MovieSummary {
                    id,
                    title: format!("Movie {}", id),
                    poster_path: None,
                    release_date: None,
                    vote_average: None,
                })
                .collect(),
            total_pages,
            page,
        }
    }

    #[test]
    fn test_page_loaded_applies_latest() {
        let mut app = test_app();
        let request = app.controller.start();
        handle_app_event(
            &mut app,
            AppEvent::PageLoaded {
                generation: request.generation,
                result: Ok(page(&[1, 2], 4, 1)),
            },
        );
        assert_eq!(app.controller.phase(), Phase::IdleBrowse);
        assert_eq!(app.controller.items().len(), 2);
        assert_eq!(app.controller.total_pages(), 4);
    }

    #[test]
    fn test_stale_page_is_ignored() {
        let mut app = test_app();
        let first = app.controller.start();
        let second = app.controller.submit_search("heat").unwrap();

        handle_app_event(
            &mut app,
            AppEvent::PageLoaded {
                generation: first.generation,
                result: Ok(page(&[1], 9, 1)),
            },
        );
        assert!(app.controller.is_loading());

        handle_app_event(
            &mut app,
            AppEvent::PageLoaded {
                generation: second.generation,
                result: Ok(page(&[7], 1, 1)),
            },
        );
        assert_eq!(app.controller.phase(), Phase::IdleSearch);
        assert_eq!(app.controller.items()[0].id, 7);
    }

    #[test]
    fn test_error_result_clears_items() {
        let mut app = test_app();
        app.selected = 3;
        let request = app.controller.start();
        handle_app_event(
            &mut app,
            AppEvent::PageLoaded {
                generation: request.generation,
                result: Err(CatalogError::HttpStatus(500)),
            },
        );
        assert_eq!(app.controller.phase(), Phase::Error);
        assert!(app.controller.items().is_empty());
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_panicked_fetch_ends_loading() {
        let mut app = test_app();
        let request = app.controller.start();
        handle_app_event(
            &mut app,
            AppEvent::FetchPanicked {
                generation: request.generation,
                error: "boom".to_string(),
            },
        );
        assert_eq!(app.controller.phase(), Phase::Error);
        assert_eq!(app.controller.error_message(), Some(FETCH_PANIC_MESSAGE));
    }
}
