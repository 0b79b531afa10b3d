//! Quiver TUI - Actor-based REST API client
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async HTTP execution

mod app;
mod assembler;
mod constants;
mod messages;
mod models;
mod network;
mod query;
mod ui;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use app::AppActor;
use messages::ui_events::{key_to_ui_event, AuthField, EditColumn, InputMode, Panel};
use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use models::{AuthKind, KeyValuePair, ResponseOutcome};
use network::NetworkActor;
use ui::{cursor_column, highlight_json, method_color, status_color};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", "quiver.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

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
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.active_panel,
                    current_state.input_mode,
                    current_state.show_help,
                ) {
                    if matches!(event, UiEvent::Quit) {
                        let _ = ui_tx.send(event);
                        break;
                    }
                    let _ = ui_tx.send(event);
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

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Method + URL
            Constraint::Length(1),  // Editor tabs
            Constraint::Length(10), // Editor panel (Params/Auth/Headers/Body)
            Constraint::Min(5),     // Response
            Constraint::Length(1),  // Status bar
        ])
        .split(area);

    draw_url_bar(f, state, chunks[0]);
    draw_editor_tabs(f, state, chunks[1]);
    draw_editor_panel(f, state, chunks[2]);
    draw_response(f, state, chunks[3]);
    draw_status_bar(f, state, chunks[4]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_url_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Url;
    let mcolor = method_color(state.method.as_str());

    let border_style = if is_focused && state.input_mode == InputMode::Editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let loading = if state.is_loading { " [...]" } else { "" };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {}{} ", state.method.as_str(), loading))
        .title_style(Style::default().fg(mcolor).bold());

    let input = Paragraph::new(state.url.as_str()).block(block);
    f.render_widget(input, area);

    // Cursor
    if is_focused && state.input_mode == InputMode::Editing {
        let max_x = area.x + area.width.saturating_sub(2);
        let column = cursor_column(&state.url, state.cursor_position);
        let cursor_x = (area.x + column + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, area.y + 1));
    }
}

fn enabled_count(rows: &[KeyValuePair]) -> usize {
    rows.iter().filter(|r| r.enabled && !r.key.is_empty()).count()
}

fn draw_editor_tabs(f: &mut Frame, state: &RenderState, area: Rect) {
    let params_count = enabled_count(&state.params);
    let headers_count = enabled_count(&state.headers);

    let titles = vec![
        if params_count > 0 {
            format!("Params ({})", params_count)
        } else {
            String::from("Params")
        },
        format!("Auth: {}", state.auth.kind.label()),
        if headers_count > 0 {
            format!("Headers ({})", headers_count)
        } else {
            String::from("Headers")
        },
        if state.body.trim().is_empty() {
            String::from("Body")
        } else {
            String::from("Body *")
        },
    ];

    let selected = match state.active_panel {
        Panel::Auth => 1,
        Panel::Headers => 2,
        Panel::Body => 3,
        _ => 0,
    };

    f.render_widget(ui::render_tabs(titles, selected), area);
}

fn draw_editor_panel(f: &mut Frame, state: &RenderState, area: Rect) {
    match state.active_panel {
        Panel::Auth => draw_auth_panel(f, state, area),
        Panel::Headers => draw_rows_panel(
            f,
            state,
            area,
            &state.headers,
            state.selected_header,
            state.active_panel == Panel::Headers,
            " Headers ",
        ),
        Panel::Body => draw_body_panel(f, state, area),
        // Params is also the default view while URL or Response is focused
        _ => draw_rows_panel(
            f,
            state,
            area,
            &state.params,
            state.selected_param,
            state.active_panel == Panel::Params,
            " Query Params (synced with URL) ",
        ),
    }
}

fn column_marker(editing: bool, active: EditColumn, column: EditColumn) -> &'static str {
    if editing && active == column {
        "*"
    } else {
        ""
    }
}

fn draw_rows_panel(
    f: &mut Frame,
    state: &RenderState,
    area: Rect,
    rows: &[KeyValuePair],
    selected: usize,
    is_focused: bool,
    title: &str,
) {
    let editing = is_focused && state.input_mode == InputMode::Editing;
    let border_style = if editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let header = Row::new(vec![
        Cell::from(""),
        Cell::from(format!(
            "Key{}",
            column_marker(editing, state.edit_column, EditColumn::Key)
        )),
        Cell::from(format!(
            "Value{}",
            column_marker(editing, state.edit_column, EditColumn::Value)
        )),
        Cell::from(format!(
            "Description{}",
            column_marker(editing, state.edit_column, EditColumn::Description)
        )),
    ])
    .style(Style::default().fg(Color::DarkGray));

    let body_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if !row.enabled {
                Style::default().fg(Color::DarkGray)
            } else if is_focused && i == selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let checkbox = if row.enabled { "[x]" } else { "[ ]" };
            Row::new(vec![
                Cell::from(checkbox),
                Cell::from(row.key.clone()),
                Cell::from(row.value.clone()),
                Cell::from(row.description.clone()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Percentage(30),
        Constraint::Percentage(35),
        Constraint::Percentage(35),
    ];

    let table = Table::new(body_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(format!("{}(a:add d:del Space:toggle e:edit) ", title)),
        )
        .row_highlight_style(Style::default().bold());

    let mut table_state = TableState::default();
    if is_focused && !rows.is_empty() {
        table_state.select(Some(selected));
    }

    f.render_stateful_widget(table, area, &mut table_state);
}

fn auth_field_label(field: AuthField) -> &'static str {
    match field {
        AuthField::Token => "Token",
        AuthField::Username => "Username",
        AuthField::Password => "Password",
        AuthField::ApiKeyName => "Key",
        AuthField::ApiKeyValue => "Value",
    }
}

fn draw_auth_panel(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Auth;
    let editing = is_focused && state.input_mode == InputMode::Editing;
    let border_style = if editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let show = |value: &str| -> String {
        if value.is_empty() {
            String::from("<empty>")
        } else {
            value.to_string()
        }
    };

    let auth = &state.auth;
    let mut lines: Vec<Line> = Vec::new();
    match auth.kind {
        AuthKind::None => {
            lines.push(Line::from("No authorization."));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Press 't' to cycle: None -> Bearer -> Basic -> API Key",
                Style::default().fg(Color::DarkGray),
            )));
        }
        AuthKind::Bearer => {
            lines.push(field_line("Token", &show(&auth.token), editing, state.auth_field, AuthField::Token));
        }
        AuthKind::Basic => {
            let masked = if auth.password.is_empty() {
                String::from("<empty>")
            } else {
                "*".repeat(auth.password.chars().count())
            };
            lines.push(field_line("Username", &show(&auth.username), editing, state.auth_field, AuthField::Username));
            lines.push(field_line("Password", &masked, editing, state.auth_field, AuthField::Password));
        }
        AuthKind::ApiKey => {
            lines.push(field_line("Key", &show(&auth.api_key_name), editing, state.auth_field, AuthField::ApiKeyName));
            lines.push(field_line("Value", &show(&auth.api_key_value), editing, state.auth_field, AuthField::ApiKeyValue));
        }
    }

    if editing {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Editing {} (Tab: next field, Esc: done)", auth_field_label(state.auth_field)),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" Auth: {} (t:cycle) ", state.auth.kind.label()));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn field_line(
    label: &str,
    value: &str,
    editing: bool,
    active: AuthField,
    field: AuthField,
) -> Line<'static> {
    let marker = if editing && active == field { "> " } else { "  " };
    Line::from(vec![
        Span::styled(
            format!("{}{:<10}", marker, label),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(value.to_string()),
    ])
}

fn draw_body_panel(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Body;
    let border_style = if is_focused && state.input_mode == InputMode::Editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let title = if state.method.has_body() {
        " Body (JSON or raw text) "
    } else {
        " Body (not sent for this method) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);

    let body = Paragraph::new(state.body.as_str())
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(body, area);

    if is_focused && state.input_mode == InputMode::Editing {
        let max_x = area.x + area.width.saturating_sub(2);
        let column = cursor_column(&state.body, state.cursor_position);
        let cursor_x = (area.x + column + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, area.y + 1));
    }
}

fn draw_response(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Response;
    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let (title, bottom) = response_titles(state);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
        .title_bottom(Line::from(bottom).right_aligned());

    let lines = response_lines(state);
    let response = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.response_scroll, 0));
    f.render_widget(response, area);
}

fn response_titles(state: &RenderState) -> (Line<'static>, String) {
    match &state.outcome {
        Some(ResponseOutcome::Success {
            status,
            status_text,
            elapsed_ms,
            size_bytes,
            ..
        }) => {
            let color = status_color(*status);
            (
                Line::from(Span::styled(
                    format!(" {} {} ", status, status_text),
                    Style::default().fg(color).bold(),
                )),
                format!(" {}ms | {} B ", elapsed_ms, size_bytes),
            )
        }
        Some(ResponseOutcome::Failure { status, status_text, elapsed_ms, .. }) => {
            let label = match (status, status_text) {
                (Some(code), Some(text)) => format!(" {} {} ", code, text),
                (Some(code), None) => format!(" {} ", code),
                _ => String::from(" Error "),
            };
            (
                Line::from(Span::styled(label, Style::default().fg(Color::Red).bold())),
                if *elapsed_ms > 0 {
                    format!(" {}ms ", elapsed_ms)
                } else {
                    String::new()
                },
            )
        }
        Option::None => (Line::from(" Response "), String::new()),
    }
}

fn response_lines(state: &RenderState) -> Vec<Line<'static>> {
    if state.is_loading {
        return vec![Line::from("Sending request...")];
    }

    match &state.outcome {
        Some(ResponseOutcome::Success { headers, body, .. }) => {
            let mut lines = highlight_json(body);
            if !headers.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "-- Response Headers --",
                    Style::default().fg(Color::DarkGray),
                )));
                for (key, value) in headers {
                    lines.push(Line::from(vec![
                        Span::styled(format!("{}: ", key), Style::default().fg(Color::Cyan)),
                        Span::raw(value.clone()),
                    ]));
                }
            }
            lines
        }
        Some(ResponseOutcome::Failure { message, body, .. }) => {
            let mut lines = vec![Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            ))];
            if let Some(data) = body {
                lines.push(Line::from(""));
                lines.extend(highlight_json(data));
            }
            lines
        }
        Option::None => vec![
            Line::from("Press 's' to send the request."),
            Line::from(""),
            Line::from(Span::styled(
                "Tab:panel  e:edit  m:method  ?:help",
                Style::default().fg(Color::DarkGray),
            )),
        ],
    }
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if state.is_loading {
        " Loading... "
    } else if state.input_mode == InputMode::Editing {
        " ESC:stop editing | arrows:move | Tab:next field "
    } else {
        " Tab:panel | e:edit | m:method | s:send | x:clear | ?:help | q:quit "
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 QUIVER TUI - Keyboard Shortcuts

 NAVIGATION
   Tab / Shift+Tab    Switch panels
   Up / Down          Select row / scroll response

 REQUEST
   m                  Cycle HTTP method
   s                  Send request
   e                  Edit current field
   Enter (URL edit)   Send request
   x                  Clear response

 PARAMS / HEADERS
   a                  Add new row
   d                  Delete selected row
   Enter / Space      Toggle row enabled
   Tab (editing)      Cycle key / value / description

 AUTH
   t                  Cycle auth type (None/Bearer/Basic/API Key)
   Tab (editing)      Switch between fields

 GENERAL
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

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
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
