//! Help overlay: scrollable keybinding table.
//!
//! Lists the bindings actually in effect, including config overrides.

use crate::app::App;
use crate::keybindings::{Context, KeybindingRegistry};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table},
    Frame,
};

const CONTEXT_ORDER: [(Context, &str); 2] =
    [(Context::Grid, "Movie Grid"), (Context::Search, "Search Box")];

/// Bindings grouped by context label, in display order. Empty groups are dropped.
fn grouped_bindings(
    registry: &KeybindingRegistry,
) -> Vec<(&'static str, Vec<(String, &'static str)>)> {
    let bindings = registry.all_bindings();
    CONTEXT_ORDER
        .iter()
        .map(|(ctx, label)| {
            let entries = bindings
                .iter()
                .filter(|(c, _, _)| c == ctx)
                .map(|(_, key, description)| (key.clone(), *description))
                .collect::<Vec<_>>();
            (*label, entries)
        })
        .filter(|(_, entries)| !entries.is_empty())
        .collect()
}

pub fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(70, 80, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let mut rows: Vec<Row> = Vec::new();
    for (label, entries) in grouped_bindings(&app.keybindings) {
        if !rows.is_empty() {
            rows.push(Row::new(vec![String::new(), String::new()]));
        }
        rows.push(
            Row::new(vec![
                Line::from(Span::styled(
                    format!("-- {} --", label),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ])
            .style(app.style("help_heading")),
        );
        rows.extend(entries.into_iter().map(|(key, description)| {
            Row::new(vec![format!("  {}", key), description.to_string()])
        }));
    }

    let total_rows = rows.len();
    let visible_height = overlay.height.saturating_sub(3) as usize;
    let max_scroll = total_rows.saturating_sub(visible_height);
    let scroll = app.help_scroll_offset.min(max_scroll);
    let visible_rows: Vec<Row> = rows.into_iter().skip(scroll).take(visible_height).collect();

    let title = if max_scroll > 0 {
        format!(" Help ({}/{}) ", scroll + 1, max_scroll + 1)
    } else {
        " Help (? to close) ".to_string()
    };

    let header = Row::new(vec!["Key", "Action"])
        .style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::UNDERLINED),
        )
        .bottom_margin(1);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("card_selected"))
        .title(title);
    let table = Table::new(visible_rows, [Constraint::Length(16), Constraint::Min(20)])
        .header(header)
        .block(block);

    f.render_widget(table, overlay);

    if scroll < max_scroll {
        let hint = Line::from(Span::styled(
            " j/k to scroll, ? or Esc to close ",
            app.style("pager"),
        ));
        let hint_area = Rect {
            x: overlay.x + 1,
            y: overlay.y + overlay.height.saturating_sub(1),
            width: overlay.width.saturating_sub(2),
            height: 1,
        };
        f.render_widget(Paragraph::new(hint), hint_area);
    }
}

/// Centered rectangle with the given percentage of the parent area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x) / 100) as u16;
    let height = (u32::from(area.height) * u32::from(percent_y) / 100) as u16;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
