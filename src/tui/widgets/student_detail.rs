use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::{percent_bar, percent_color, truncate};
use crate::models::{StudentAnalytics, UserId};
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let Some(student_id) = app.selected_student else {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Student Detail ");
        let paragraph = Paragraph::new("No student selected").block(block);
        f.render_widget(paragraph, area);
        return;
    };

    let analytics = match app.platform.student_analytics(&student_id) {
        Ok(analytics) => analytics,
        Err(e) => {
            let block = Block::default()
                .borders(Borders::ALL)
                .title(" Student Detail ");
            let paragraph = Paragraph::new(e.to_string())
                .style(Style::default().fg(Color::Red))
                .block(block);
            f.render_widget(paragraph, area);
            return;
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Summary
            Constraint::Length(4), // Recommendation
            Constraint::Min(0),    // Module progress + path
        ])
        .split(area);

    let bottom_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[2]);

    draw_summary(f, &analytics, chunks[0]);
    draw_recommendation(f, app, &student_id, chunks[1]);
    draw_module_progress(f, app, &student_id, bottom_chunks[0]);
    draw_learning_path(f, app, &student_id, bottom_chunks[1]);
}

fn draw_summary(f: &mut Frame, analytics: &StudentAnalytics, area: Rect) {
    let info = &analytics.student_info;
    let overall = analytics.overall_progress;

    let text = vec![
        Line::from(vec![
            Span::styled("Email: ", Style::default().fg(Color::Gray)),
            Span::styled(info.email.as_str(), Style::default().fg(Color::White)),
            Span::raw("  "),
            Span::styled("Joined: ", Style::default().fg(Color::Gray)),
            Span::styled(
                info.join_date.format("%b %d, %Y").to_string(),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            Span::styled("Overall: ", Style::default().fg(Color::Gray)),
            Span::styled(percent_bar(overall), Style::default().fg(percent_color(overall))),
            Span::styled(
                format!(" {:.1}%", overall),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw("  "),
            Span::styled("Time: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{} min", analytics.total_time_spent),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        Line::from(vec![
            Span::styled("Completed: ", Style::default().fg(Color::Gray)),
            Span::styled(
                analytics.modules_completed.to_string(),
                Style::default().fg(Color::Green),
            ),
            Span::raw("  "),
            Span::styled("In progress: ", Style::default().fg(Color::Gray)),
            Span::styled(
                analytics.modules_in_progress.to_string(),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw("  "),
            Span::styled("Quiz avg: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{:.1}", analytics.average_quiz_score),
                Style::default().fg(percent_color(analytics.average_quiz_score)),
            ),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", info.name))
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_recommendation(f: &mut Frame, app: &App, student_id: &UserId, area: Rect) {
    let line = match app.platform.recommend_next_module(student_id) {
        Some(module) => Line::from(vec![
            Span::styled(
                module.title.as_str(),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({}, {})", module.category.label(), module.difficulty.label()),
                Style::default().fg(Color::Gray),
            ),
        ]),
        None => Line::from(Span::styled(
            "Nothing left to recommend.",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Recommended Next ")
        .title_style(Style::default().fg(Color::Green));

    f.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_module_progress(f: &mut Frame, app: &App, student_id: &UserId, area: Rect) {
    let mut records: Vec<_> = app.platform.progress_for(student_id).collect();
    records.sort_by(|a, b| b.last_accessed.cmp(&a.last_accessed));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Modules ({}) ", records.len()))
        .title_style(Style::default().fg(Color::Cyan));

    if records.is_empty() {
        let paragraph = Paragraph::new("No modules started yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = records
        .iter()
        .map(|progress| {
            let title = app
                .platform
                .module(&progress.module_id)
                .map(|m| m.title.as_str())
                .unwrap_or("(removed)");
            let quiz = progress
                .average_quiz_score()
                .map(|s| format!("quiz {:.0}", s))
                .unwrap_or_else(|| "no quiz".to_string());

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<26}", truncate(title, 24)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    percent_bar(progress.completion_percentage),
                    Style::default().fg(percent_color(progress.completion_percentage)),
                ),
                Span::styled(
                    format!(" {:>5.1}%  ", progress.completion_percentage),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(quiz, Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn draw_learning_path(f: &mut Frame, app: &App, student_id: &UserId, area: Rect) {
    let path = app.platform.personalized_learning_path(student_id);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Learning Path ")
        .title_style(Style::default().fg(Color::Magenta));

    if path.is_empty() {
        let paragraph = Paragraph::new("All available modules completed!")
            .style(Style::default().fg(Color::Green))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = path
        .iter()
        .enumerate()
        .map(|(i, module)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}. ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::styled(truncate(&module.title, 28), Style::default().fg(Color::White)),
                Span::styled(
                    format!(" {}", module.difficulty.label()),
                    Style::default().fg(Color::Cyan),
                ),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}
