pub mod dashboard;
pub mod module_detail;
pub mod modules;
pub mod student_detail;
pub mod students;

// Ten-cell bar for a 0-100 percentage
pub(crate) fn percent_bar(percent: f64) -> String {
    let filled = (percent.clamp(0.0, 100.0) / 10.0).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

pub(crate) fn percent_color(percent: f64) -> ratatui::style::Color {
    use ratatui::style::Color;
    if percent >= 90.0 {
        Color::Green
    } else if percent >= 60.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
