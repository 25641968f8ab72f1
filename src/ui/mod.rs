pub mod color_parser;
pub mod components;
pub mod popups;
pub mod theme;

use crate::app::App;
use crate::form::{Field, FieldKind, FormRow};
use crate::models::InputMode;
use components::pad_to_width;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use theme::ThemeTokens;

const LABEL_WIDTH: usize = 24;
const SINGLE_LINE_EDITOR_HEIGHT: u16 = 3;
const MULTI_LINE_EDITOR_HEIGHT: u16 = 8;

pub fn ui(f: &mut Frame, app: &mut App) {
    let tokens = ThemeTokens::from_theme(&app.config.theme);
    let editor_height = match app.input_mode {
        InputMode::Navigate => 0,
        InputMode::Editing if app.editing_multiline() => MULTI_LINE_EDITOR_HEIGHT,
        InputMode::Editing => SINGLE_LINE_EDITOR_HEIGHT,
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(editor_height),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_form(f, app, chunks[0], &tokens);
    if app.input_mode == InputMode::Editing {
        render_editor(f, app, chunks[1], &tokens);
    }
    render_status_bar(f, app, chunks[2], &tokens);

    if app.show_help_popup {
        popups::render_help_popup(f, app, &tokens);
    }
    if app.show_calendar_popup {
        popups::render_calendar_popup(f, app, &tokens);
    }
    if app.show_login_popup {
        popups::render_login_popup(f, app, &tokens);
    }
}

fn render_form(f: &mut Frame, app: &App, area: Rect, tokens: &ThemeTokens) {
    let title = match &app.logged_in_as {
        Some(call_sign) => format!(" Session Editor · {call_sign} "),
        None => " Session Editor ".to_string(),
    };
    let border_color = if app.input_mode == InputMode::Editing {
        tokens.border_editing
    } else {
        tokens.border_default
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let help_width = (inner.width as usize).saturating_sub(LABEL_WIDTH + 1).max(10);
    let mut lines: Vec<Line> = Vec::new();
    let mut focus_line = 0usize;

    for (r, row) in app.document.rows().iter().enumerate() {
        if !row.visible {
            continue;
        }
        let focused_row = r == app.focus.row;
        if focused_row {
            focus_line = lines.len();
        }
        lines.extend(row_lines(row, focused_row.then_some(app.focus.field), tokens));
        if focused_row && let Some(help) = &row.help {
            for wrapped in textwrap::wrap(help, help_width) {
                lines.push(Line::from(vec![
                    Span::raw(" ".repeat(LABEL_WIDTH)),
                    Span::styled(wrapped.into_owned(), Style::default().fg(tokens.muted).italic()),
                ]));
            }
        }
        lines.push(Line::default());
    }

    let height = inner.height as usize;
    let scroll = if height == 0 || focus_line < height / 2 {
        0
    } else {
        focus_line - height / 2
    };
    f.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), inner);
}

/// One line per field; the row label sits on the first.
fn row_lines<'a>(row: &'a FormRow, focused: Option<usize>, tokens: &ThemeTokens) -> Vec<Line<'a>> {
    let label_style = Style::default().fg(tokens.label).add_modifier(Modifier::BOLD);
    row.fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let label = if i == 0 { row.label.as_str() } else { "" };
            let mut style = Style::default();
            if focused == Some(i) {
                style = style.bg(tokens.focus_bg).add_modifier(Modifier::BOLD);
            }
            Line::from(vec![
                Span::styled(pad_to_width(label, LABEL_WIDTH), label_style),
                field_span(field, style, tokens),
            ])
        })
        .collect()
}

fn field_span<'a>(field: &'a Field, style: Style, tokens: &ThemeTokens) -> Span<'a> {
    match &field.kind {
        FieldKind::Checkbox(checked) => {
            let mark = if *checked { "[x]" } else { "[ ]" };
            let style = if *checked { style.fg(tokens.checked) } else { style };
            Span::styled(format!("{mark} {}", field.label), style)
        }
        FieldKind::Radio { checked, .. } => {
            let mark = if *checked { "(•)" } else { "( )" };
            let style = if *checked { style.fg(tokens.checked) } else { style };
            Span::styled(format!("{mark} {}", field.label), style)
        }
        FieldKind::TextArea(value) => {
            let mut lines = value.lines();
            let first = lines.next().unwrap_or_default();
            let more = lines.count();
            let text = if more > 0 {
                format!("{}: {first} (+{more} more)", field.label)
            } else {
                format!("{}: {first}", field.label)
            };
            Span::styled(text, style)
        }
        FieldKind::Text(value) | FieldKind::Date(value) | FieldKind::Time(value) => {
            if value.is_empty() {
                Span::styled(format!("{}: —", field.label), style.fg(tokens.muted))
            } else {
                Span::styled(format!("{}: {value}", field.label), style)
            }
        }
    }
}

fn render_editor(f: &mut Frame, app: &mut App, area: Rect, tokens: &ThemeTokens) {
    let title = app
        .focused_field()
        .map(|field| format!(" {} ", field.label))
        .unwrap_or_default();
    let hint = if app.editing_multiline() {
        " Shift+Enter / Ctrl+S: save · Esc: cancel "
    } else {
        " Enter: save · Esc: cancel "
    };
    let block = Block::default()
        .title(title)
        .title_bottom(Line::from(hint).right_aligned())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(tokens.border_editing));
    app.textarea.set_block(block);
    app.textarea.set_cursor_style(Style::default().reversed());
    app.textarea.set_cursor_line_style(Style::default());
    f.render_widget(&app.textarea, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect, tokens: &ThemeTokens) {
    if let Some(toast) = app.toast_message.as_deref()
        && !toast.is_empty()
    {
        f.render_widget(
            Paragraph::new(Span::styled(toast, Style::default().fg(tokens.accent))),
            area,
        );
        return;
    }

    let mode = match app.input_mode {
        InputMode::Navigate => "NAVIGATE",
        InputMode::Editing => "EDIT",
    };
    let accepted = app.accepted_types();
    let accepted = if accepted.is_empty() {
        "none".to_string()
    } else {
        accepted.join(", ")
    };
    let user = app.logged_in_as.as_deref().unwrap_or("not logged in");
    let sends = app.message_type().map_or("?", |t| t.as_str());
    let length = app
        .session_length_days()
        .map(|days| format!("{days}d"))
        .unwrap_or_else(|| "?".to_string());
    let line = Line::from(vec![
        Span::styled(format!(" {mode} "), Style::default().fg(tokens.accent).bold()),
        Span::styled(
            format!(" {user} · {length} · {sends} · accepts: {accepted} · ? help"),
            Style::default().fg(tokens.muted),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chrono::NaiveDate;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(app: &mut App) -> String {
        let backend = TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal.draw(|f| ui(f, app)).expect("draw");
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> App<'static> {
        App::with_today(
            Config::default(),
            NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"),
        )
    }

    #[test]
    fn renders_dates_and_status() {
        let mut app = app();
        let screen = render(&mut app);
        assert!(screen.contains("Session Editor"));
        assert!(screen.contains("Date: 2024-01-01"));
        assert!(screen.contains("Date: 2024-01-08"));
        assert!(screen.contains("7d · any · accepts: plain"));
    }

    #[test]
    fn hidden_rows_are_not_drawn() {
        let mut app = app();
        let screen = render(&mut app);
        assert!(!screen.contains("Form Image"));
    }

    #[test]
    fn focused_row_shows_help() {
        let mut app = app();
        let screen = render(&mut app);
        assert!(screen.contains("Date and time when we start"));
        app.next_row();
        app.next_row();
        let screen = render(&mut app);
        assert!(!screen.contains("Date and time when we start"));
    }

    #[test]
    fn popups_render_over_form() {
        let mut app = app();
        app.open_calendar();
        let screen = render(&mut app);
        assert!(screen.contains("January 2024"));
        app.close_calendar();

        app.open_login();
        let screen = render(&mut app);
        assert!(screen.contains("Log In"));
        assert!(screen.contains("Password"));
    }
}
