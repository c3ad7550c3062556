use chrono::{DateTime, Local, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::models::{Alert, PackageStatus};

/// Renders a form input field, highlighted when focused
pub fn render_input<'a>(content: &'a str, title: &'a str, is_focused: bool) -> Paragraph<'a> {
    let style = if is_focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title);

    Paragraph::new(content).block(block)
}

/// Status color
pub fn status_color(status: PackageStatus) -> Color {
    match status {
        PackageStatus::Created => Color::Gray,
        PackageStatus::PickedUp => Color::Cyan,
        PackageStatus::InTransit => Color::Blue,
        PackageStatus::OutForDelivery => Color::Yellow,
        PackageStatus::Delivered => Color::Green,
        PackageStatus::Exception => Color::Red,
        PackageStatus::Cancelled => Color::DarkGray,
    }
}

/// Coarse age of a timestamp: "Just now", "5m ago", "2h 10m ago", "3d ago"
pub fn time_since(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h {}m ago", hours, minutes % 60);
    }
    format!("{}d ago", hours / 24)
}

/// "lat, lon" with the given number of decimals, or an em dash
pub fn format_location(location: Option<(f64, f64)>, precision: usize) -> String {
    match location {
        Some((lat, lon)) => format!("{:.*}, {:.*}", precision, lat, precision, lon),
        None => "\u{2014}".to_string(),
    }
}

/// Full local date and time
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Local wall-clock time only
pub fn format_clock(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// One alert banner line
pub fn alert_line(alert: &Alert) -> String {
    format!(
        "{}: {} ({})",
        alert.package_id,
        alert.message,
        format_clock(alert.created_at)
    )
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
