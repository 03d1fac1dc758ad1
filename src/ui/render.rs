//! Render functions for the TUI.
//!
//! Layout, top to bottom: search header, body (cards, spinner or error),
//! pager, status bar.

use crate::app::App;
use crate::controller::{Mode, Phase};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{cards, help, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 12;

const SPINNER: [&str; super::loop_runner::SPINNER_FRAMES] =
    ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Main render dispatch function.
///
/// Takes `&mut App` so the card grid can record how many columns it drew.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    render_body(f, app, chunks[1]);
    render_pager(f, app, chunks[2]);
    status::render(f, app, chunks[3]);

    if app.show_help {
        help::render(f, app);
    }
}

/// Title plus the search box.
fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if app.is_editing() {
        (
            format!("Search: {}▏", app.search_input),
            app.style("search_box_active"),
        )
    } else if app.controller.mode() == Mode::Search {
        (
            format!("Search: {}  (Esc for popular)", app.controller.search_text()),
            app.style("search_box"),
        )
    } else {
        (
            "Popular movies  (/ to search)".to_string(),
            app.style("search_box"),
        )
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(Span::styled(" Marquee ", app.style("header_title")));

    f.render_widget(Paragraph::new(text).style(style).block(block), area);
}

fn render_body(f: &mut Frame, app: &mut App, area: Rect) {
    match app.controller.phase() {
        Phase::Loading => {
            let frame = SPINNER[app.spinner_frame % SPINNER.len()];
            let line = Line::from(Span::styled(
                format!("{} Loading movies...", frame),
                app.style("spinner"),
            ));
            f.render_widget(
                Paragraph::new(line).alignment(Alignment::Center),
                centered_line(area),
            );
        }
        Phase::Error => {
            let message = app.controller.error_message().unwrap_or_default();
            let lines = vec![
                Line::from(Span::styled(message.to_string(), app.style("error"))),
                Line::from(""),
                Line::from(Span::styled(
                    "Press r to retry, / to search",
                    app.style("pager"),
                )),
            ];
            let text_area = Rect {
                y: area.y + area.height.saturating_sub(3) / 2,
                height: area.height.min(3),
                ..area
            };
            f.render_widget(
                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                text_area,
            );
        }
        Phase::IdleBrowse | Phase::IdleSearch if app.controller.items().is_empty() => {
            let text = match app.controller.mode() {
                Mode::Search => "No movies found.",
                Mode::Browse => "No movies available.",
            };
            f.render_widget(
                Paragraph::new(text)
                    .style(app.style("pager"))
                    .alignment(Alignment::Center),
                centered_line(area),
            );
        }
        Phase::IdleBrowse | Phase::IdleSearch => cards::render(f, app, area),
    }
}

fn render_pager(f: &mut Frame, app: &App, area: Rect) {
    let text = pager_text(app.controller.page(), app.controller.total_pages());
    f.render_widget(
        Paragraph::new(text)
            .style(app.style("pager"))
            .alignment(Alignment::Center),
        area,
    );
}

/// "Page x of y", or just the page while the total is unknown.
pub(super) fn pager_text(page: u32, total_pages: u32) -> String {
    if total_pages == 0 {
        format!("Page {}", page)
    } else {
        format!("‹ Page {} of {} ›", page, total_pages)
    }
}

/// One-line rect in the vertical middle of `area`.
fn centered_line(area: Rect) -> Rect {
    Rect {
        y: area.y + area.height / 2,
        height: area.height.min(1),
        ..area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MovieSummary, ResultPage};
    use crate::keybindings::KeybindingRegistry;
    use crate::theme::ThemeVariant;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn test_app() -> App {
        App::new(ThemeVariant::Dark, KeybindingRegistry::new(), "")
    }

    #[test]
    fn test_pager_text() {
        assert_eq!(pager_text(1, 0), "Page 1");
        assert_eq!(pager_text(2, 10), "‹ Page 2 of 10 ›");
    }

    #[test]
    fn test_loading_screen() {
        let mut app = test_app();
        app.controller.start();
        let screen = draw(&mut app, 80, 20);
        assert!(screen.contains("Loading movies"));
        assert!(screen.contains("Popular movies"));
    }

    #[test]
    fn test_error_screen_shows_message() {
        let mut app = test_app();
        let request = app.controller.start();
        app.controller.fail(request.generation, "Invalid API key");
        let screen = draw(&mut app, 80, 20);
        assert!(screen.contains("Invalid API key"));
        assert!(!screen.contains("Loading"));
    }

    #[test]
    fn test_grid_and_pager() {
        let mut app = test_app();
        let request = app.controller.start();
        app.controller.complete(
            request.generation,
            Ok(ResultPage {
                items: vec![MovieSummary {
                    id: 603,
                    title: "The Matrix".to_string(),
                    poster_path: None,
                    release_date: chrono::NaiveDate::from_ymd_opt(1999, 3, 31),
                    vote_average: Some(8.2),
                }],
                total_pages: 12,
                page: 1,
            }),
        );
        let screen = draw(&mut app, 80, 20);
        assert!(screen.contains("The Matrix"));
        assert!(screen.contains("1999"));
        assert!(screen.contains("Page 1 of 12"));
    }

    #[test]
    fn test_empty_search_results() {
        let mut app = test_app();
        let request = app.controller.submit_search("zzzzz").unwrap();
        app.controller
            .complete(request.generation, Ok(ResultPage::default()));
        let screen = draw(&mut app, 80, 20);
        assert!(screen.contains("No movies found."));
    }

    #[test]
    fn test_too_small_terminal() {
        let mut app = test_app();
        let screen = draw(&mut app, 30, 8);
        assert!(screen.contains("Too small") || screen.contains("too small"));
    }
}
