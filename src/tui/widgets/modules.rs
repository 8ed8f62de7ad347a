use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::truncate;
use crate::models::DifficultyLevel;
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let title = if let Some(category) = app.filter_category {
        format!(" Modules (category: {}) ", category.label())
    } else {
        " Modules ".to_string()
    };

    let items: Vec<ListItem> = app
        .modules
        .items
        .iter()
        .filter_map(|id| app.platform.module(id))
        .map(|module| {
            let level_color = match module.difficulty {
                DifficultyLevel::Beginner => Color::Green,
                DifficultyLevel::Intermediate => Color::Yellow,
                DifficultyLevel::Advanced => Color::Red,
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<42}", truncate(&module.title, 40)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("{:<20}", module.category.label()),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    format!("{:<14}", module.difficulty.label()),
                    Style::default().fg(level_color),
                ),
                Span::styled(
                    format!("{} min", module.estimated_duration),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(Style::default().fg(Color::Cyan));

    let heading = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::BOLD);
    let header = Line::from(vec![
        Span::styled(format!("{:<42}", "Title"), heading),
        Span::styled(format!("{:<20}", "Category"), heading),
        Span::styled(format!("{:<14}", "Level"), heading),
        Span::styled("Duration", heading),
    ]);

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(app.modules.selected);

    // Header row just inside the border
    let header_area = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: 1,
    };
    f.render_widget(Paragraph::new(header), header_area);

    let list_area = Rect {
        x: area.x,
        y: area.y + 1,
        width: area.width,
        height: area.height.saturating_sub(1),
    };

    f.render_stateful_widget(list, list_area, &mut state);
}
