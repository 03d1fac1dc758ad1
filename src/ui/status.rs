use crate::app::App;
use crate::controller::Phase;
use crate::util::sanitize_line;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.is_editing() {
        Cow::Borrowed("Type a title | ENTER search | ESC cancel")
    } else {
        match app.controller.phase() {
            Phase::Error => Cow::Borrowed("[r]etry [/]search [Esc]popular [?]help [q]uit"),
            _ => match app.selected_movie() {
                Some(movie) => Cow::Owned(format!(
                    "{} | [n/p]page [/]search [o]pen [v]poster [?]help [q]uit",
                    sanitize_line(&movie.title)
                )),
                None => Cow::Borrowed("[n/p]page [/]search [r]eload [?]help [q]uit"),
            },
        }
    };

    let paragraph = Paragraph::new(text).style(app.style("status_bar"));
    f.render_widget(paragraph, area);
}
