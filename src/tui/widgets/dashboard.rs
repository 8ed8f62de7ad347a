use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::{percent_bar, percent_color, truncate};
use crate::models::TeacherDashboard;
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let Some(teacher) = app.teacher else {
        draw_notice(
            f,
            area,
            "No teacher selected. Start with `literacy tui --teacher <ID>` to see class progress.",
            Color::DarkGray,
        );
        return;
    };

    let dashboard = match app.platform.teacher_dashboard(&teacher) {
        Ok(dashboard) => dashboard,
        Err(e) => {
            draw_notice(f, area, &format!("Dashboard unavailable: {}", e), Color::Red);
            return;
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9), // Overview + completion rates
            Constraint::Min(0),    // Students
        ])
        .split(area);

    let top_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[0]);

    draw_overview(f, app, &dashboard, top_chunks[0]);
    draw_completion_rates(f, &dashboard, top_chunks[1]);
    draw_students(f, &dashboard, chunks[1]);
}

fn draw_notice(f: &mut Frame, area: Rect, text: &str, color: Color) {
    let block = Block::default().borders(Borders::ALL).title(" Dashboard ");
    let paragraph = Paragraph::new(text.to_string())
        .style(Style::default().fg(color))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_overview(f: &mut Frame, app: &App, dashboard: &TeacherDashboard, area: Rect) {
    let class_average = if dashboard.student_progress.is_empty() {
        0.0
    } else {
        dashboard
            .student_progress
            .iter()
            .map(|s| s.completion_rate)
            .sum::<f64>()
            / dashboard.student_progress.len() as f64
    };

    let stat = |label: &'static str, value: String, color: Color| {
        Line::from(vec![
            Span::styled(label, Style::default().fg(Color::Gray)),
            Span::styled(value, Style::default().fg(color)),
        ])
    };

    let text = vec![
        Line::from(vec![
            Span::styled("Students: ", Style::default().fg(Color::Gray)),
            Span::styled(
                dashboard.total_students.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        stat(
            "Modules: ",
            app.platform.modules().count().to_string(),
            Color::White,
        ),
        stat(
            "Scenarios: ",
            app.platform.scenarios().count().to_string(),
            Color::White,
        ),
        stat(
            "Class avg: ",
            format!("{:.1}%", class_average),
            percent_color(class_average),
        ),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Class Overview ")
        .title_style(Style::default().fg(Color::Cyan));

    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_completion_rates(f: &mut Frame, dashboard: &TeacherDashboard, area: Rect) {
    let items: Vec<ListItem> = dashboard
        .module_completion_rates
        .iter()
        .map(|rate| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<32}", truncate(&rate.title, 30)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    percent_bar(rate.completion_rate),
                    Style::default().fg(percent_color(rate.completion_rate)),
                ),
                Span::styled(
                    format!(" {:>5.1}%", rate.completion_rate),
                    Style::default().fg(Color::Yellow),
                ),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Module Completion ")
        .title_style(Style::default().fg(Color::Yellow));

    f.render_widget(List::new(items).block(block), area);
}

fn draw_students(f: &mut Frame, dashboard: &TeacherDashboard, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Students ({}) ", dashboard.total_students))
        .title_style(Style::default().fg(Color::Magenta));

    if dashboard.student_progress.is_empty() {
        let paragraph = Paragraph::new("No students enrolled yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = dashboard
        .student_progress
        .iter()
        .map(|student| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<22}", truncate(&student.student_name, 20)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    percent_bar(student.completion_rate),
                    Style::default().fg(percent_color(student.completion_rate)),
                ),
                Span::styled(
                    format!(" {:>5.1}%  ", student.completion_rate),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(
                    format!("{:>5} min  ", student.time_spent),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    student.last_active.format("%b %d %H:%M").to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}
