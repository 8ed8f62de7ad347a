use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::widgets::{dashboard, module_detail, modules, student_detail, students};
use super::{App, View};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Help bar
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);
    draw_content(f, app, chunks[1]);
    draw_help_bar(f, app, chunks[2]);
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let tab_titles = vec!["Dashboard", "Modules", "Students"];
    let selected = match app.view {
        View::Dashboard => 0,
        View::Modules | View::ModuleDetail => 1,
        View::Students | View::StudentDetail => 2,
    };

    let tabs = Tabs::new(tab_titles)
        .block(Block::default().borders(Borders::ALL).title(" Literacy "))
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}

fn draw_content(f: &mut Frame, app: &App, area: Rect) {
    match app.view {
        View::Dashboard => dashboard::draw(f, app, area),
        View::Modules => modules::draw(f, app, area),
        View::ModuleDetail => module_detail::draw(f, app, area),
        View::Students => students::draw(f, app, area),
        View::StudentDetail => student_detail::draw(f, app, area),
    }
}

// (key, action) pairs shown in the help bar for each view
fn view_hints(app: &App) -> Vec<(&'static str, &'static str)> {
    let mut hints = vec![("h/l", "Views")];
    match app.view {
        View::Dashboard => hints.push(("^r", "Refresh")),
        View::Modules | View::Students => {
            hints.extend([("j/k", "Nav"), ("g/G", "Top/Bot"), ("l/<CR>", "Open")]);
            if app.view == View::Modules {
                hints.push(("/", "Category"));
                if app.filter_category.is_some() {
                    hints.push(("<Esc>", "Clear"));
                }
            }
        }
        View::ModuleDetail | View::StudentDetail => {
            hints.extend([("h/<Esc>", "Back"), ("^r", "Refresh")]);
        }
    }
    hints.push(("q", "Quit"));
    hints
}

fn hint_spans<'a>(hints: &[(&'a str, &'a str)]) -> Vec<Span<'a>> {
    let key_style = Style::default().fg(Color::Cyan);
    hints
        .iter()
        .flat_map(|(key, action)| {
            [
                Span::styled(*key, key_style),
                Span::raw(format!(" {}  ", action)),
            ]
        })
        .collect()
}

fn draw_help_bar(f: &mut Frame, app: &App, area: Rect) {
    let spans = if app.filter_mode {
        let mut spans = vec![
            Span::styled("/", Style::default().fg(Color::Yellow)),
            Span::raw(app.filter_input.as_str()),
            Span::styled("█", Style::default().fg(Color::Yellow)),
            Span::raw(" | "),
        ];
        spans.extend(hint_spans(&[("<CR>", "Apply"), ("<Esc>", "Cancel")]));
        spans
    } else if let Some(status) = &app.status {
        let mut spans = vec![Span::styled(
            format!("{}  ", status),
            Style::default().fg(Color::Red),
        )];
        spans.extend(hint_spans(&[("q", "Quit")]));
        spans
    } else {
        hint_spans(&view_hints(app))
    };

    let help = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    f.render_widget(help, area);
}
