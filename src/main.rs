//! Courier Dash - actor-based terminal dashboard for courier packages
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Sync Layer (Tokio) - interval and focus driven polling of the backend
//! - Network Layer (Tokio) - one-shot submissions and lookups

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use crossterm::{
    event::{self, DisableFocusChange, EnableFocusChange, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use courier_dash::app::form::FormField;
use courier_dash::app::AppActor;
use courier_dash::config::AppConfig;
use courier_dash::constants::{APP_NAME, APP_VERSION};
use courier_dash::messages::ui_events::{key_to_ui_event, View};
use courier_dash::messages::{NetworkCommand, NetworkResponse, RenderState, SyncCommand, UiEvent};
use courier_dash::network::{ApiClient, NetworkActor};
use courier_dash::sync::{SyncActor, SyncSnapshot};
use courier_dash::ui::{
    alert_line, centered_rect, format_clock, format_location, format_timestamp, render_input,
    status_color, time_since,
};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableFocusChange, LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // Initialize logging to file; the terminal belongs to the UI
    let log_dir = config
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let log_name = config
        .log_file
        .file_name()
        .context("COURIER_LOG_FILE must name a file")?;
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    tracing::info!(
        base_url = %config.api_base_url,
        api_key = config.api_key.is_some(),
        "Starting {} v{}",
        APP_NAME,
        APP_VERSION
    );

    let api = Arc::new(ApiClient::new(&config.api_base_url, config.api_key.as_deref())?);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (sync_cmd_tx, sync_cmd_rx) = mpsc::unbounded_channel::<SyncCommand>();
    let (snapshot_tx, snapshot_rx) = mpsc::unbounded_channel::<SyncSnapshot>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(Arc::clone(&api), net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn sync actor
    let sync_actor = SyncActor::new(api, config.poll_interval, snapshot_tx);
    tokio::spawn(sync_actor.run(sync_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(net_cmd_tx, sync_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx, snapshot_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    tracing::info!("Exiting");
    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            let event = match event::read()? {
                Event::Key(key) => key_to_ui_event(key, current_state.key_context()),
                Event::FocusGained => Some(UiEvent::WindowFocused),
                _ => None,
            };
            if let Some(event) = event {
                let quit = matches!(event, UiEvent::Quit);
                let _ = ui_tx.send(event);
                if quit {
                    break;
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let banner_height = if state.alerts.is_empty() {
        0
    } else {
        state.alerts.len().min(4) as u16 + 2
    };

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Header
            Constraint::Length(banner_height), // Alerts
            Constraint::Min(0),                // Content
            Constraint::Length(1),             // Status bar
        ])
        .split(area);

    draw_header(f, state, main_chunks[0]);
    if !state.alerts.is_empty() {
        draw_alert_banner(f, state, main_chunks[1]);
    }

    match state.view {
        View::List => draw_package_list(f, state, main_chunks[2]),
        View::Detail => draw_detail(f, state, main_chunks[2]),
        View::Form => draw_form(f, state, main_chunks[2]),
    }

    draw_status_bar(f, state, main_chunks[3]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_header(f: &mut Frame, state: &RenderState, area: Rect) {
    let spans = vec![
        Span::styled(
            format!(" {} ", APP_NAME),
            Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
        ),
        Span::raw(format!(
            "  {}/{} packages  filter: {}",
            state.packages.len(),
            state.total_packages,
            state.status_filter.label()
        )),
    ];
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_alert_banner(f: &mut Frame, state: &RenderState, area: Rect) {
    let lines: Vec<Line> = state
        .alerts
        .iter()
        .map(|alert| Line::from(Span::styled(alert_line(alert), Style::default().fg(Color::Red))))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(format!(" Alerts ({}) ", state.alerts.len()));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_package_list(f: &mut Frame, state: &RenderState, area: Rect) {
    let search = if state.search_active {
        format!(" search: {}_ ", state.search)
    } else if !state.search.is_empty() {
        format!(" search: {} ", state.search)
    } else {
        String::new()
    };
    let border_style = if state.search_active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Packages ")
        .title_bottom(Line::from(search).right_aligned());

    let placeholder = if state.loading {
        Some(Paragraph::new("Loading packages...").style(Style::default().fg(Color::DarkGray)))
    } else if let Some(err) = &state.error {
        Some(Paragraph::new(err.as_str()).style(Style::default().fg(Color::Red)))
    } else if state.packages.is_empty() {
        Some(
            Paragraph::new("No packages match your criteria.")
                .style(Style::default().fg(Color::DarkGray)),
        )
    } else {
        None
    };
    if let Some(paragraph) = placeholder {
        f.render_widget(paragraph.block(block).wrap(Wrap { trim: false }), area);
        return;
    }

    let now = Utc::now();
    let rows: Vec<Row> = state
        .packages
        .iter()
        .enumerate()
        .map(|(i, pkg)| {
            let mut status = vec![Span::styled(
                pkg.current_status.label(),
                Style::default().fg(status_color(pkg.current_status)),
            )];
            if pkg.is_stuck_alert_triggered {
                status.push(Span::styled(" STUCK!", Style::default().fg(Color::Red).bold()));
            }
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(pkg.package_id.clone()),
                Cell::from(Line::from(status)),
                Cell::from(time_since(pkg.last_updated, now)),
                Cell::from(format_location(pkg.location(), 2)),
            ])
        })
        .collect();

    let header = Row::new(vec!["#", "Package", "Status", "Updated", "Location"])
        .style(Style::default().fg(Color::DarkGray).bold());
    let widths = [
        Constraint::Length(4),
        Constraint::Percentage(25),
        Constraint::Percentage(30),
        Constraint::Length(12),
        Constraint::Min(16),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().fg(Color::Yellow).bold())
        .highlight_symbol("> ");

    let mut table_state = TableState::default().with_selected(Some(state.selected));
    f.render_stateful_widget(table, area, &mut table_state);
}

fn draw_detail(f: &mut Frame, state: &RenderState, area: Rect) {
    let Some(detail) = &state.detail else {
        return;
    };

    let mut title = format!(" Package {} ", detail.package_id);
    if detail.loading {
        title.push_str("[...] ");
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);

    let label = |name: &str| Span::styled(format!("{:<18}", name), Style::default().fg(Color::DarkGray));
    let mut lines: Vec<Line> = Vec::new();

    if let Some(err) = &detail.error {
        lines.push(Line::from(Span::styled(err.clone(), Style::default().fg(Color::Red))));
        lines.push(Line::from(""));
    }

    if let Some(pkg) = &detail.package {
        if pkg.is_stuck_alert_triggered {
            lines.push(Line::from(Span::styled(
                "STUCK! No update received for too long",
                Style::default().fg(Color::White).bg(Color::Red).bold(),
            )));
            lines.push(Line::from(""));
        }
        lines.push(Line::from(vec![
            label("Status"),
            Span::styled(
                pkg.current_status.label(),
                Style::default().fg(status_color(pkg.current_status)).bold(),
            ),
        ]));
        lines.push(Line::from(vec![
            label("Last updated"),
            Span::raw(format!(
                "{} ({})",
                format_timestamp(pkg.last_updated),
                time_since(pkg.last_updated, Utc::now())
            )),
        ]));
        if let Some(ts) = pkg.current_status_timestamp {
            lines.push(Line::from(vec![label("Status reported"), Span::raw(format_timestamp(ts))]));
        }
        lines.push(Line::from(vec![label("Location"), Span::raw(format_location(pkg.location(), 4))]));
        lines.push(Line::from(vec![
            label("ETA"),
            Span::raw(pkg.eta.map(format_timestamp).unwrap_or_else(|| "\u{2014}".to_string())),
        ]));
        if let Some(ts) = pkg.received_at {
            lines.push(Line::from(vec![label("Received"), Span::raw(format_timestamp(ts))]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("History ({} events)", pkg.event_history.len()),
            Style::default().bold(),
        )));
        for event in pkg.history_newest_first() {
            lines.push(Line::from(vec![
                Span::raw(format!("{}  ", format_timestamp(event.timestamp))),
                Span::styled(
                    format!("{:<18}", event.status.label()),
                    Style::default().fg(status_color(event.status)),
                ),
                Span::raw(format_location(event.location(), 4)),
            ]));
            if let Some(note) = &event.note {
                lines.push(Line::from(Span::styled(
                    format!("    {}", note),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
    } else if detail.loading {
        lines.push(Line::from("Loading package..."));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((detail.scroll, 0));
    f.render_widget(paragraph, area);
}

fn draw_form(f: &mut Frame, state: &RenderState, area: Rect) {
    let form = &state.form;
    let title = if form.is_update() {
        format!(" Record update for {} ", form.package_id)
    } else {
        " New package update ".to_string()
    };
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Package id
            Constraint::Length(3), // Status
            Constraint::Length(3), // Latitude
            Constraint::Length(3), // Longitude
            Constraint::Length(3), // Note
            Constraint::Min(1),    // Messages
        ])
        .split(inner);

    let id_title = if form.is_update() {
        " Package ID (locked) "
    } else {
        " Package ID (blank creates a new one) "
    };
    let status = format!("< {} >", form.status.label());
    let fields = [
        (FormField::PackageId, form.package_id.as_str(), id_title),
        (FormField::Status, status.as_str(), " Status (\u{2190}/\u{2192}) "),
        (FormField::Latitude, form.lat.as_str(), " Latitude "),
        (FormField::Longitude, form.lon.as_str(), " Longitude "),
        (FormField::Note, form.note.as_str(), " Note "),
    ];
    for (i, (field, content, title)) in fields.into_iter().enumerate() {
        let focused = form.active_field == field;
        f.render_widget(render_input(content, title, focused), chunks[i]);
        if focused && field != FormField::Status && !form.submitting {
            let max_x = chunks[i].x + chunks[i].width.saturating_sub(2);
            let cursor_x = (chunks[i].x + content.chars().count() as u16 + 1).min(max_x);
            f.set_cursor_position(Position::new(cursor_x, chunks[i].y + 1));
        }
    }

    let message = if form.submitting {
        Line::from(Span::styled("Submitting...", Style::default().fg(Color::Yellow)))
    } else if let Some(err) = &form.error {
        Line::from(Span::styled(err.clone(), Style::default().fg(Color::Red)))
    } else if let Some(ok) = &form.success {
        Line::from(Span::styled(ok.clone(), Style::default().fg(Color::Green)))
    } else {
        Line::from(Span::styled(
            "Enter: submit | Tab: next field | Esc: close",
            Style::default().fg(Color::DarkGray),
        ))
    };
    f.render_widget(Paragraph::new(message).wrap(Wrap { trim: false }), chunks[5]);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let hints = match state.view {
        View::List if state.search_active => " Type to search | Enter/Esc: done ",
        View::List => " \u{2191}/\u{2193}:select | Enter:details | /:search | f:filter | n:new | r:refresh | ?:help | q:quit ",
        View::Detail => " \u{2191}/\u{2193}:scroll | u:update | r:reload | Esc:back | q:quit ",
        View::Form => " Tab:next field | Enter:submit | Esc:close ",
    };

    let mut spans = Vec::new();
    if state.loading {
        spans.push(Span::styled(" Refreshing... ", Style::default().fg(Color::Yellow)));
    }
    spans.push(Span::styled(hints, Style::default().fg(Color::DarkGray)));
    if let Some(ts) = state.last_synced {
        spans.push(Span::styled(
            format!(" Last sync: {} ", format_clock(ts)),
            Style::default().fg(Color::DarkGray),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 COURIER DASH - Keyboard Shortcuts

 PACKAGE LIST
   ↑ / ↓ (k / j)      Move selection
   Enter              Open package details
   /                  Search by package ID
   f                  Cycle status filter
   n                  New package update

 DETAILS
   ↑ / ↓              Scroll
   u                  Record an update for this package
   r                  Reload this package
   Esc / b            Back to list

 UPDATE FORM
   Tab / Shift+Tab    Next / previous field
   ← / → / Space      Change status
   Enter              Submit
   Esc                Close

 GENERAL
   r / Ctrl+R         Refresh now
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}
