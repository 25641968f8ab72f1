use crate::{app::App, config::key_match};
use crossterm::event::KeyEvent;

/// Keys while a field editor is open. Single-line fields commit on Enter;
/// multi-line fields take Enter as a newline and commit on the multiline
/// binding.
pub fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    let bindings = &app.config.keybindings.editor;
    if key_match(&key, &bindings.cancel) {
        app.cancel_edit();
        return;
    }
    if key_match(&key, &bindings.commit_multiline)
        || (!app.editing_multiline() && key_match(&key, &bindings.commit))
    {
        app.commit_edit();
        return;
    }
    app.textarea.input(key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::form::FieldStore;
    use crate::models::InputMode;
    use chrono::NaiveDate;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn app() -> App<'static> {
        App::with_today(
            Config::default(),
            NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"),
        )
    }

    fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        handle_editing_mode(app, KeyEvent::new(code, modifiers));
    }

    fn focus_on(app: &mut App, id: &str) {
        let (row, field) = app
            .document
            .rows()
            .iter()
            .enumerate()
            .find_map(|(r, row)| row.fields.iter().position(|f| f.id == id).map(|f| (r, f)))
            .expect("field");
        app.focus.row = row;
        app.focus.field = field;
    }

    #[test]
    fn typing_then_enter_commits_single_line() {
        let mut app = app();
        focus_on(&mut app, "prefix");
        app.start_edit();
        for c in "XSC".chars() {
            press(&mut app, KeyCode::Char(c), KeyModifiers::NONE);
        }
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.input_mode, InputMode::Navigate);
        assert_eq!(app.document.value("prefix").as_deref(), Some("XSC"));
    }

    #[test]
    fn enter_is_a_newline_in_text_areas() {
        let mut app = app();
        focus_on(&mut app, "reportToText");
        app.start_edit();
        press(&mut app, KeyCode::Char('a'), KeyModifiers::NONE);
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        press(&mut app, KeyCode::Char('b'), KeyModifiers::NONE);
        assert_eq!(app.input_mode, InputMode::Editing);
        press(&mut app, KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(app.input_mode, InputMode::Navigate);
        assert_eq!(app.document.value("reportToText").as_deref(), Some("a\nb"));
    }

    #[test]
    fn escape_discards() {
        let mut app = app();
        focus_on(&mut app, "prefix");
        app.start_edit();
        press(&mut app, KeyCode::Char('Z'), KeyModifiers::SHIFT);
        press(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(app.document.value("prefix").as_deref(), Some(""));
    }
}
