use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::truncate;
use crate::models::{ContentKind, LearningModule};
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let Some(module) = app.selected_module.and_then(|id| app.platform.module(&id)) else {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Module Detail ");
        let paragraph = Paragraph::new("No module selected").block(block);
        f.render_widget(paragraph, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),      // Header info
            Constraint::Percentage(45), // Content blocks
            Constraint::Min(0),         // Assessment
        ])
        .split(area);

    draw_header(f, app, module, chunks[0]);
    draw_content(f, module, chunks[1]);
    draw_assessment(f, module, chunks[2]);
}

fn draw_header(f: &mut Frame, app: &App, module: &LearningModule, area: Rect) {
    let prerequisites = if module.prerequisites.is_empty() {
        "None".to_string()
    } else {
        module
            .prerequisites
            .iter()
            .map(|id| {
                app.platform
                    .module(id)
                    .map(|m| m.title.clone())
                    .unwrap_or_else(|| id.to_string())
            })
            .collect::<Vec<_>>()
            .join(", ")
    };

    let text = vec![
        Line::from(vec![
            Span::styled("Description: ", Style::default().fg(Color::Gray)),
            Span::styled(module.description.as_str(), Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            Span::styled("Category: ", Style::default().fg(Color::Gray)),
            Span::styled(module.category.label(), Style::default().fg(Color::Cyan)),
            Span::raw("  "),
            Span::styled("Level: ", Style::default().fg(Color::Gray)),
            Span::styled(module.difficulty.label(), Style::default().fg(Color::Yellow)),
            Span::raw("  "),
            Span::styled("Duration: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{} min", module.estimated_duration),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            Span::styled("Requires: ", Style::default().fg(Color::Gray)),
            Span::styled(prerequisites, Style::default().fg(Color::Magenta)),
        ]),
        Line::from(vec![
            Span::styled("Scenarios: ", Style::default().fg(Color::Gray)),
            Span::styled(
                module.scenarios.len().to_string(),
                Style::default().fg(Color::White),
            ),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", module.title))
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_content(f: &mut Frame, module: &LearningModule, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Content ({}) ", module.content_blocks.len()))
        .title_style(Style::default().fg(Color::Cyan));

    if module.content_blocks.is_empty() {
        let paragraph = Paragraph::new("No content yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = module
        .content_blocks
        .iter()
        .map(|content| {
            let kind_color = match content.kind {
                ContentKind::Text => Color::White,
                ContentKind::Interactive => Color::Green,
                ContentKind::Video => Color::Magenta,
                ContentKind::CaseStudy => Color::Yellow,
            };

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        format!("{:<13}", content.kind.label()),
                        Style::default().fg(kind_color),
                    ),
                    Span::styled(
                        content.title.as_str(),
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("             {}", truncate(&content.content, 80)),
                    Style::default().fg(Color::Gray),
                )),
            ])
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn draw_assessment(f: &mut Frame, module: &LearningModule, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(
            " Assessment ({} questions) ",
            module.assessment_questions.len()
        ))
        .title_style(Style::default().fg(Color::Magenta));

    if module.assessment_questions.is_empty() {
        let paragraph = Paragraph::new("No assessment for this module.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let mut lines = Vec::new();
    for (i, question) in module.assessment_questions.iter().enumerate() {
        lines.push(Line::from(Span::styled(
            format!("Q{}. {}", i + 1, question.question),
            Style::default().fg(Color::White),
        )));
        for (j, option) in question.options.iter().enumerate() {
            lines.push(Line::from(Span::styled(
                format!("    {}. {}", j, option),
                Style::default().fg(Color::Gray),
            )));
        }
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
