use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::{percent_bar, percent_color, truncate};
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Students ({}) ", app.students.items.len()))
        .title_style(Style::default().fg(Color::Cyan));

    if app.students.items.is_empty() {
        let paragraph = Paragraph::new("No students yet. Add one with `literacy user add`.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .students
        .items
        .iter()
        .filter_map(|id| app.platform.user(id))
        .map(|user| {
            let (overall, minutes) = match app.platform.student_analytics(&user.id) {
                Ok(analytics) => (analytics.overall_progress, analytics.total_time_spent),
                Err(_) => (0.0, 0),
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<22}", truncate(&user.username, 20)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("{:<30}", truncate(&user.email, 28)),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(percent_bar(overall), Style::default().fg(percent_color(overall))),
                Span::styled(
                    format!(" {:>5.1}%  ", overall),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(format!("{} min", minutes), Style::default().fg(Color::Cyan)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(app.students.selected);
    f.render_stateful_widget(list, area, &mut state);
}
