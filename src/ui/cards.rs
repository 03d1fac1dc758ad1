//! Movie card grid.
//!
//! Cards have a fixed size; the number of columns follows the terminal width
//! and the grid scrolls by whole rows to keep the selection visible.

use crate::app::App;
use crate::catalog::MovieSummary;
use crate::util::{sanitize_line, wrap_to_width};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub(super) const CARD_WIDTH: u16 = 26;
pub(super) const CARD_HEIGHT: u16 = 7;

const TITLE_LINES: usize = 2;

pub(super) fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < CARD_WIDTH || area.height < 3 {
        return;
    }

    let columns = usize::from(area.width / CARD_WIDTH).max(1);
    let visible_rows = usize::from(area.height / CARD_HEIGHT).max(1);
    app.grid_columns = columns;
    app.clamp_selection();

    let selected_row = app.selected / columns;
    let first_row = selected_row.saturating_sub(visible_rows - 1);
    let first_index = first_row * columns;

    let app = &*app;
    let items = app.controller.items();

    for (index, movie) in items
        .iter()
        .enumerate()
        .skip(first_index)
        .take(visible_rows * columns)
    {
        let offset = index - first_index;
        let row = (offset / columns) as u16;
        let col = (offset % columns) as u16;

        let y = area.y + row * CARD_HEIGHT;
        let card_area = Rect {
            x: area.x + col * CARD_WIDTH,
            y,
            width: CARD_WIDTH,
            height: CARD_HEIGHT.min(area.bottom().saturating_sub(y)),
        };

        render_card(f, app, movie, index == app.selected, card_area);
    }
}

fn render_card(f: &mut Frame, app: &App, movie: &MovieSummary, selected: bool, area: Rect) {
    let border_style = if selected {
        app.style("card_selected")
    } else {
        app.style("card_border")
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner_width = usize::from(area.width.saturating_sub(2));
    let lines = card_lines(
        movie,
        inner_width,
        &CardStyles {
            title: app.style("card_title"),
            year: app.style("card_year"),
            rating: app.style("card_rating"),
            no_poster: app.style("card_no_poster"),
        },
    );

    f.render_widget(Paragraph::new(lines).block(block), area);
}

pub(super) struct CardStyles {
    pub title: Style,
    pub year: Style,
    pub rating: Style,
    pub no_poster: Style,
}

/// Lines inside one card: title (up to two lines), year, rating, poster marker.
pub(super) fn card_lines(
    movie: &MovieSummary,
    width: usize,
    styles: &CardStyles,
) -> Vec<Line<'static>> {
    let title = sanitize_line(&movie.title);
    let mut lines: Vec<Line<'static>> = wrap_to_width(&title, width, TITLE_LINES)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, styles.title)))
        .collect();
    while lines.len() < TITLE_LINES {
        lines.push(Line::from(""));
    }

    let year = movie
        .release_year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    lines.push(Line::from(Span::styled(year, styles.year)));

    // Unrated titles come back with 0.0.
    match movie.vote_average.filter(|v| *v > 0.0) {
        Some(vote) => lines.push(Line::from(Span::styled(
            format!("★ {:.1}", vote),
            styles.rating,
        ))),
        None => lines.push(Line::from("")),
    }

    if movie.poster_path.is_some() {
        lines.push(Line::from(Span::styled("▣ poster", styles.year)));
    } else {
        lines.push(Line::from(Span::styled("□ no poster", styles.no_poster)));
    }

    lines
}
