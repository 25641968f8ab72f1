use super::components::{centered_fixed, centered_rect, pad_to_width};
use super::theme::ThemeTokens;
use crate::app::App;
use crate::config::KeyBindings;
use crate::models::{LoginField, LoginStatus};
use chrono::Datelike;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const HELP_KEY_WIDTH: usize = 22;
const WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

pub fn render_help_popup(f: &mut Frame, app: &App, tokens: &ThemeTokens) {
    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(tokens.border_default));
    let area = centered_rect(70, 80, f.area());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .margin(2)
        .split(area);

    let mut lines = Vec::new();
    for (title, entries) in help_sections(&app.config.keybindings) {
        lines.push(Line::from(Span::styled(
            title,
            Style::default().fg(tokens.label).add_modifier(Modifier::BOLD),
        )));
        for (keys, action) in entries {
            lines.push(Line::from(vec![
                Span::styled(pad_to_width(&keys, HELP_KEY_WIDTH), Style::default().fg(tokens.accent)),
                Span::raw(action),
            ]));
        }
        lines.push(Line::default());
    }
    f.render_widget(Paragraph::new(lines), inner[0]);
    f.render_widget(
        Paragraph::new("Esc / ?: close").style(Style::default().fg(tokens.muted)),
        inner[1],
    );
}

fn help_sections(kb: &KeyBindings) -> Vec<(&'static str, Vec<(String, &'static str)>)> {
    let keys = |bindings: &[String]| bindings.join(" / ");
    vec![
        (
            "Form",
            vec![
                (keys(&kb.form.next_field), "Next field"),
                (keys(&kb.form.prev_field), "Previous field"),
                (keys(&kb.form.next_row), "Next row"),
                (keys(&kb.form.prev_row), "Previous row"),
                (keys(&kb.form.edit), "Edit text field"),
                (keys(&kb.form.toggle), "Toggle checkbox / select option"),
            ],
        ),
        (
            "Editor",
            vec![
                (keys(&kb.editor.commit), "Save single-line field"),
                (keys(&kb.editor.commit_multiline), "Save multi-line field"),
                (keys(&kb.editor.cancel), "Discard changes"),
            ],
        ),
        (
            "Global",
            vec![
                (keys(&kb.global.login), "Log in"),
                (keys(&kb.global.calendar), "Session calendar"),
                (keys(&kb.global.help), "This help"),
                (keys(&kb.global.quit), "Quit"),
            ],
        ),
    ]
}

pub fn render_login_popup(f: &mut Frame, app: &App, tokens: &ThemeTokens) {
    let area = centered_fixed(48, 9, f.area());
    let block = Block::default()
        .title(" Log In ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(tokens.border_editing));
    f.render_widget(Clear, area);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let field_line = |label: &str, value: String, field: LoginField| {
        let active = app.login.field == field;
        let value_style = if active {
            Style::default().bg(tokens.focus_bg).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let cursor = if active { "_" } else { "" };
        Line::from(vec![
            Span::styled(pad_to_width(label, 11), Style::default().fg(tokens.label)),
            Span::styled(format!("{value}{cursor}"), value_style),
        ])
    };

    let status = match &app.login.status {
        LoginStatus::Idle => Span::raw(""),
        LoginStatus::Pending => Span::styled("Logging in…", Style::default().fg(tokens.muted)),
        LoginStatus::Incorrect => Span::styled("Login incorrect", Style::default().fg(tokens.error)),
        LoginStatus::Failed(message) => {
            Span::styled(message.clone(), Style::default().fg(tokens.error))
        }
    };

    let lines = vec![
        Line::default(),
        field_line("Call sign", app.login.call_sign.clone(), LoginField::CallSign),
        field_line(
            "Password",
            "*".repeat(app.login.password.chars().count()),
            LoginField::Password,
        ),
        Line::default(),
        Line::from(status),
        Line::from(Span::styled(
            "Tab: switch · Enter: log in · Esc: cancel",
            Style::default().fg(tokens.muted),
        )),
    ];
    f.render_widget(Paragraph::new(lines), inner);
}

pub fn render_calendar_popup(f: &mut Frame, app: &App, tokens: &ThemeTokens) {
    let Some(grid) = &app.calendar else {
        return;
    };
    let height = grid.weeks().count() as u16 + 6;
    let area = centered_fixed(32, height, f.area());
    let block = Block::default()
        .title(format!(" {} ", grid.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(tokens.border_default));
    f.render_widget(Clear, area);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = vec![Line::from(
        WEEKDAYS
            .iter()
            .map(|day| Span::styled(format!(" {day} "), Style::default().fg(tokens.label)))
            .collect::<Vec<_>>(),
    )];
    for (week_idx, week) in grid.weeks().enumerate() {
        let spans = week
            .iter()
            .enumerate()
            .map(|(day_idx, cell)| {
                let Some(cell) = cell else {
                    return Span::raw("    ");
                };
                let mut style = Style::default();
                if cell.net {
                    style = style.fg(tokens.checked).bold().underlined();
                }
                if week_idx * 7 + day_idx == app.calendar_selected {
                    style = style.bg(tokens.focus_bg).add_modifier(Modifier::BOLD);
                }
                Span::styled(format!(" {:>2} ", cell.date.day()), style)
            })
            .collect::<Vec<_>>();
        lines.push(Line::from(spans));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Enter: open report · Esc: close",
        Style::default().fg(tokens.muted),
    )));
    f.render_widget(Paragraph::new(lines), inner);
}
