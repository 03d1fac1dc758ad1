//! Input handling for the TUI.
//!
//! Keys go through the keybinding registry. In the grid they drive selection
//! and the pager; while the search box is focused, unbound keys edit the text.

use crate::app::{App, AppEvent};
use crate::catalog::CatalogSource;
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::util::MAX_SEARCH_QUERY_LENGTH;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::fetch::{dispatch, spawn_fetch};
use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input<C>(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    catalog: &Arc<C>,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action>
where
    C: CatalogSource + 'static,
{
    // Ctrl+C always quits, whatever has focus.
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(Action::Quit);
    }

    if app.show_help {
        return Ok(handle_help_input(app, code));
    }

    if app.is_editing() {
        return Ok(handle_search_input(app, code, modifiers, catalog, event_tx));
    }

    handle_grid_input(app, code, modifiers, catalog, event_tx)
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

fn handle_grid_input<C>(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    catalog: &Arc<C>,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action>
where
    C: CatalogSource + 'static,
{
    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Grid)
    else {
        return Ok(Action::Continue);
    };

    match action {
        KbAction::Quit => return Ok(Action::Quit),
        KbAction::NavUp => app.nav_up(),
        KbAction::NavDown => app.nav_down(),
        KbAction::NavLeft => app.nav_left(),
        KbAction::NavRight => app.nav_right(),
        KbAction::NextPage => {
            let request = app.controller.next_page();
            dispatch(app, catalog, event_tx, request);
        }
        KbAction::PrevPage => {
            let request = app.controller.prev_page();
            dispatch(app, catalog, event_tx, request);
        }
        KbAction::FirstPage => {
            let request = app.controller.first_page();
            dispatch(app, catalog, event_tx, request);
        }
        KbAction::LastPage => {
            let request = app.controller.last_page();
            dispatch(app, catalog, event_tx, request);
        }
        KbAction::Reload => {
            let request = app.controller.reload();
            spawn_fetch(app, catalog, event_tx, request);
        }
        KbAction::EnterSearch => app.begin_search_edit(),
        KbAction::ClearSearch => {
            app.search_input.clear();
            let request = app.controller.clear_search();
            dispatch(app, catalog, event_tx, Some(request));
        }
        KbAction::OpenInBrowser => {
            if let Some(url) = app.selected_movie().map(|movie| movie.page_url()) {
                open_url(app, &url);
            }
        }
        KbAction::OpenPoster => match app.selected_poster_url() {
            Some(url) => open_url(app, &url),
            None if app.selected_movie().is_some() => app.set_status("No poster for this movie"),
            None => {}
        },
        KbAction::CycleTheme => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        KbAction::ShowHelp => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        // Search-box actions are not bound in the grid context.
        KbAction::CommitSearch | KbAction::CancelSearch => {}
    }

    Ok(Action::Continue)
}

fn open_url(app: &mut App, url: &str) {
    match open::that(url) {
        Ok(()) => app.set_status("Opened in browser"),
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Failed to open browser");
            app.set_status(format!("Failed to open browser: {}", e));
        }
    }
}

/// Handle input while the search box has focus.
fn handle_search_input<C>(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    catalog: &Arc<C>,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action
where
    C: CatalogSource + 'static,
{
    match app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Search)
    {
        Some(KbAction::CommitSearch) => {
            app.end_search_edit();
            // Blank input is a no-op: the current results stay as they are.
            let request = app.controller.submit_search(&app.search_input);
            dispatch(app, catalog, event_tx, request);
            return Action::Continue;
        }
        Some(KbAction::CancelSearch) => {
            app.end_search_edit();
            app.search_input = app.controller.search_text().to_string();
            return Action::Continue;
        }
        _ => {}
    }

    match code {
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            if app.search_input.chars().count() < MAX_SEARCH_QUERY_LENGTH {
                app.search_input.push(c);
            } else {
                app.set_status(format!(
                    "Search query too long (max {} chars)",
                    MAX_SEARCH_QUERY_LENGTH
                ));
            }
        }
        _ => {}
    }

    Action::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogError, CatalogQuery, MovieSummary, ResultPage};
    use crate::controller::Mode;
    use crate::keybindings::KeybindingRegistry;
    use crate::theme::ThemeVariant;
    use std::future::Future;
    use std::sync::Mutex;

    /// Records requests and never answers them.
    #[derive(Default)]
    struct PendingCatalog {
        calls: Mutex<Vec<(CatalogQuery, u32)>>,
    }

    impl CatalogSource for PendingCatalog {
        fn fetch_page(
            &self,
            query: &CatalogQuery,
            page: u32,
        ) -> impl Future<Output = Result<ResultPage, CatalogError>> + Send {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push((query.clone(), page));
            }
            std::future::pending()
        }
    }

    struct Harness {
        app: App,
        catalog: Arc<PendingCatalog>,
        tx: mpsc::Sender<AppEvent>,
        _rx: mpsc::Receiver<AppEvent>,
    }

    impl Harness {
        fn new() -> Self {
            let (tx, rx) = mpsc::channel(8);
            Self {
                app: App::new(ThemeVariant::Dark, KeybindingRegistry::new(), ""),
                catalog: Arc::new(PendingCatalog::default()),
                tx,
                _rx: rx,
            }
        }

        fn key(&mut self, code: KeyCode) -> Action {
            handle_input(
                &mut self.app,
                code,
                KeyModifiers::NONE,
                &self.catalog,
                &self.tx,
            )
            .unwrap()
        }

        fn type_text(&mut self, text: &str) {
            for c in text.chars() {
                self.key(KeyCode::Char(c));
            }
        }

        /// Let spawned fetches reach the catalog, then return what it was asked.
        async fn calls(&self) -> Vec<(CatalogQuery, u32)> {
            for _ in 0..4 {
                tokio::task::yield_now().await;
            }
            self.catalog.calls.lock().unwrap().clone()
        }

        /// Answer the latest request with an empty page out of `total_pages`.
        fn answer(&mut self, items: Vec<MovieSummary>, total_pages: u32) {
            let generation = self.app.controller.latest_generation();
            let page = self.app.controller.page();
            self.app.controller.complete(
                generation,
                Ok(ResultPage {
                    items,
                    total_pages,
                    page,
                }),
            );
        }
    }

    #[tokio::test]
    async fn test_quit_key() {
        let mut h = Harness::new();
        assert!(matches!(h.key(KeyCode::Char('q')), Action::Quit));
    }

    #[tokio::test]
    async fn test_typing_q_in_search_box_does_not_quit() {
        let mut h = Harness::new();
        h.key(KeyCode::Char('/'));
        assert!(matches!(h.key(KeyCode::Char('q')), Action::Continue));
        assert_eq!(h.app.search_input, "q");
    }

    #[tokio::test]
    async fn test_commit_search_spawns_fetch() {
        let mut h = Harness::new();
        h.key(KeyCode::Char('/'));
        h.type_text("blade runner");
        h.key(KeyCode::Backspace);
        h.key(KeyCode::Enter);

        assert!(!h.app.is_editing());
        assert_eq!(h.app.controller.mode(), Mode::Search);
        assert_eq!(h.app.controller.search_text(), "blade runne");
        assert!(h.app.controller.is_loading());
        assert!(h.app.fetch_handle.is_some());
    }

    #[tokio::test]
    async fn test_blank_search_is_noop() {
        let mut h = Harness::new();
        h.key(KeyCode::Char('/'));
        h.type_text("   ");
        h.key(KeyCode::Enter);

        assert_eq!(h.app.controller.mode(), Mode::Browse);
        assert!(h.app.fetch_handle.is_none());
    }

    #[tokio::test]
    async fn test_cancel_search_restores_active_text() {
        let mut h = Harness::new();
        h.key(KeyCode::Char('/'));
        h.type_text("alien");
        h.key(KeyCode::Esc);

        assert!(!h.app.is_editing());
        assert_eq!(h.app.search_input, "");
        assert_eq!(h.app.controller.mode(), Mode::Browse);
    }

    #[tokio::test]
    async fn test_next_page_blocked_before_first_load() {
        let mut h = Harness::new();
        // total_pages is 0 until a page arrives.
        h.key(KeyCode::Char('n'));
        assert!(h.app.fetch_handle.is_none());
        assert_eq!(h.app.controller.page(), 1);
    }

    #[tokio::test]
    async fn test_reload_always_fetches() {
        let mut h = Harness::new();
        h.key(KeyCode::Char('r'));
        assert!(h.app.fetch_handle.is_some());
        assert!(h.app.controller.is_loading());
    }

    #[tokio::test]
    async fn test_search_length_limit() {
        let mut h = Harness::new();
        h.key(KeyCode::Char('/'));
        h.type_text(&"x".repeat(MAX_SEARCH_QUERY_LENGTH + 5));
        assert_eq!(h.app.search_input.len(), MAX_SEARCH_QUERY_LENGTH);
        assert!(h.app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_help_overlay_captures_keys() {
        let mut h = Harness::new();
        h.key(KeyCode::Char('?'));
        assert!(h.app.show_help);
        // 'q' closes help instead of quitting.
        assert!(matches!(h.key(KeyCode::Char('q')), Action::Continue));
        assert!(!h.app.show_help);
    }

    #[tokio::test]
    async fn test_keys_issue_expected_requests() {
        let mut h = Harness::new();
        h.key(KeyCode::Char('/'));
        h.type_text("heat");
        h.key(KeyCode::Enter);
        assert_eq!(
            h.calls().await,
            vec![(CatalogQuery::Search("heat".to_string()), 1)]
        );

        h.answer(Vec::new(), 3);
        h.key(KeyCode::Char('n'));
        assert_eq!(
            h.calls().await.last(),
            Some(&(CatalogQuery::Search("heat".to_string()), 2))
        );

        h.answer(Vec::new(), 3);
        h.key(KeyCode::Esc);
        assert_eq!(
            h.calls().await,
            vec![
                (CatalogQuery::Search("heat".to_string()), 1),
                (CatalogQuery::Search("heat".to_string()), 2),
                (CatalogQuery::Discover, 1),
            ]
        );
        assert_eq!(h.app.controller.mode(), Mode::Browse);
    }

    #[tokio::test]
    async fn test_page_keys_out_of_range_send_nothing() {
        let mut h = Harness::new();
        h.key(KeyCode::Char('r'));
        assert_eq!(h.calls().await, vec![(CatalogQuery::Discover, 1)]);
        h.answer(Vec::new(), 2);
        h.key(KeyCode::Char('p'));
        h.key(KeyCode::Char('G'));
        h.key(KeyCode::Char('n'));
        assert_eq!(
            h.calls().await,
            vec![(CatalogQuery::Discover, 1), (CatalogQuery::Discover, 2)]
        );
    }

    #[tokio::test]
    async fn test_open_poster_without_poster_sets_status() {
        let mut h = Harness::new();
        h.key(KeyCode::Char('r'));
        h.answer(
            vec![MovieSummary {
                id: 42,
                title: "No Art".to_string(),
                poster_path: None,
                release_date: None,
                vote_average: None,
            }],
            1,
        );
        h.key(KeyCode::Char('v'));
        let status = h.app.status_message.as_ref().map(|(msg, _)| msg.to_string());
        assert_eq!(status.as_deref(), Some("No poster for this movie"));
    }
}
