use crate::catalog::{CatalogError, MovieSummary, ResultPage};
use crate::controller::Controller;
use crate::keybindings::KeybindingRegistry;
use crate::theme::{StyleMap, ThemeVariant};
use ratatui::style::Style;
use std::borrow::Cow;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// How long a status message stays in the status bar.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// Input Mode and Event Types
// ============================================================================

/// Where key presses go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Keys drive the card grid and pager.
    Grid,
    /// Keys edit the search box.
    Editing,
}

/// Events sent from background tasks to the main loop.
#[derive(Debug)]
pub enum AppEvent {
    /// A catalog fetch finished. `generation` is the controller ticket it answers.
    PageLoaded {
        generation: u64,
        result: Result<ResultPage, CatalogError>,
    },
    /// A fetch task panicked before it could report.
    FetchPanicked { generation: u64, error: String },
}

// ============================================================================
// App State
// ============================================================================

pub struct App {
    /// Query and result state machine. All catalog requests go through it.
    pub controller: Controller,

    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,
    pub keybindings: KeybindingRegistry,

    /// Prefix joined with poster paths to form full image URLs.
    pub image_base_url: String,

    pub input_mode: InputMode,
    /// Text being edited in the search box. Not submitted until committed.
    pub search_input: String,

    /// Index of the highlighted card on the current page.
    pub selected: usize,
    /// Cards per row at the last render, used for vertical navigation.
    pub grid_columns: usize,

    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub needs_redraw: bool,
    pub spinner_frame: usize,

    pub show_help: bool,
    pub help_scroll_offset: usize,

    /// In-flight catalog fetch. Replaced (and aborted) by each new request.
    pub fetch_handle: Option<JoinHandle<()>>,
}

impl App {
    pub fn new(
        theme_variant: ThemeVariant,
        keybindings: KeybindingRegistry,
        image_base_url: impl Into<String>,
    ) -> Self {
        Self {
            controller: Controller::new(),
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            keybindings,
            image_base_url: image_base_url.into(),
            input_mode: InputMode::Grid,
            search_input: String::new(),
            selected: 0,
            grid_columns: 1,
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
            show_help: false,
            help_scroll_offset: 0,
            fetch_handle: None,
        }
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant. Returns the new theme's name.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    pub fn is_editing(&self) -> bool {
        self.input_mode == InputMode::Editing
    }

    /// Focus the search box, seeded with the active search text.
    pub fn begin_search_edit(&mut self) {
        self.input_mode = InputMode::Editing;
        self.search_input = self.controller.search_text().to_string();
    }

    /// Leave the search box without submitting anything.
    pub fn end_search_edit(&mut self) {
        self.input_mode = InputMode::Grid;
    }

    // ------------------------------------------------------------------------
    // Card selection
    // ------------------------------------------------------------------------

    pub fn selected_movie(&self) -> Option<&MovieSummary> {
        self.controller.items().get(self.selected)
    }

    /// Poster image of the highlighted card under the configured image base.
    pub fn selected_poster_url(&self) -> Option<String> {
        self.selected_movie()
            .and_then(|movie| movie.poster_url(&self.image_base_url))
    }

    /// Keep the selection inside the current page's items.
    pub fn clamp_selection(&mut self) {
        let len = self.controller.items().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn nav_left(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn nav_right(&mut self) {
        let len = self.controller.items().len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn nav_up(&mut self) {
        let columns = self.grid_columns.max(1);
        if self.selected >= columns {
            self.selected -= columns;
        }
    }

    pub fn nav_down(&mut self) {
        let columns = self.grid_columns.max(1);
        let len = self.controller.items().len();
        if self.selected + columns < len {
            self.selected += columns;
        }
    }

    // ------------------------------------------------------------------------
    // Status bar
    // ------------------------------------------------------------------------

    /// Set status message (expires after three seconds).
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear the status message if expired. Returns true if one was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
            tracing::debug!("Aborted catalog fetch on App drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogQuery, MovieSummary, ResultPage};
    use tokio::time::{self, Duration};

    fn test_app() -> App {
        App::new(
            ThemeVariant::Dark,
            KeybindingRegistry::new(),
            "https://image.tmdb.org/t/p/w500",
        )
    }

    fn movie(id: u64) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("Movie {}", id),
            poster_path: None,
            release_date: None,
            vote_average: None,
        }
    }

    fn app_with_items(count: u64) -> App {
        let mut app = test_app();
        let request = app.controller.start();
        assert_eq!(request.query, CatalogQuery::Discover);
        app.controller.complete(
            request.generation,
            Ok(ResultPage {
                items: (1..=count).map(movie).collect(),
                total_pages: 3,
                page: 1,
            }),
        );
        app
    }

    #[test]
    fn test_nav_on_empty_page() {
        let mut app = test_app();
        app.nav_right();
        app.nav_down();
        assert_eq!(app.selected, 0);
        assert!(app.selected_movie().is_none());
    }

    #[test]
    fn test_grid_navigation_respects_columns() {
        let mut app = app_with_items(7);
        app.grid_columns = 3;

        app.nav_down();
        assert_eq!(app.selected, 3);
        app.nav_down();
        assert_eq!(app.selected, 6);
        // No full row below.
        app.nav_down();
        assert_eq!(app.selected, 6);

        app.nav_right();
        assert_eq!(app.selected, 6);
        app.nav_up();
        assert_eq!(app.selected, 3);
        app.nav_left();
        assert_eq!(app.selected, 2);
        assert_eq!(app.selected_movie().map(|m| m.id), Some(3));
    }

    #[test]
    fn test_clamp_selection_after_shorter_page() {
        let mut app = app_with_items(5);
        app.selected = 4;
        let request = app.controller.next_page().unwrap();
        app.controller.complete(
            request.generation,
            Ok(ResultPage {
                items: vec![movie(10), movie(11)],
                total_pages: 3,
                page: 2,
            }),
        );
        app.clamp_selection();
        assert_eq!(app.selected, 1);
    }

    #[test]
    fn test_poster_url_follows_image_base() {
        let loaded = |base: &str| {
            let mut app = App::new(ThemeVariant::Dark, KeybindingRegistry::new(), base);
            let request = app.controller.start();
            app.controller.complete(
                request.generation,
                Ok(ResultPage {
                    items: vec![
                        MovieSummary {
                            poster_path: Some("/heat.jpg".to_string()),
                            ..movie(949)
                        },
                        movie(950),
                    ],
                    total_pages: 1,
                    page: 1,
                }),
            );
            app
        };

        let mut tmdb = loaded("https://image.tmdb.org/t/p/w500");
        let mirror = loaded("https://img.example.com/w342/");
        assert_eq!(
            tmdb.selected_poster_url().as_deref(),
            Some("https://image.tmdb.org/t/p/w500/heat.jpg")
        );
        assert_eq!(
            mirror.selected_poster_url().as_deref(),
            Some("https://img.example.com/w342/heat.jpg")
        );

        tmdb.nav_right();
        assert_eq!(tmdb.selected_poster_url(), None);
    }

    #[test]
    fn test_begin_search_edit_seeds_active_text() {
        let mut app = test_app();
        app.controller.submit_search("alien").unwrap();
        app.begin_search_edit();
        assert!(app.is_editing());
        assert_eq!(app.search_input, "alien");
        app.end_search_edit();
        assert_eq!(app.input_mode, InputMode::Grid);
    }

    #[test]
    fn test_cycle_theme_round_trip() {
        let mut app = test_app();
        assert_eq!(app.cycle_theme(), "Light");
        assert_eq!(app.theme_variant, ThemeVariant::Light);
        assert_eq!(
            app.style("card_selected"),
            ThemeVariant::Light.palette().card_selected
        );
        assert_eq!(app.cycle_theme(), "Dark");
    }

    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        let mut app = test_app();
        time::pause();
        app.set_status("Test message");

        time::advance(Duration::from_secs(2)).await;
        assert!(!app.clear_expired_status());
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }
}
