use crate::{app::App, config::key_match};
use crossterm::event::KeyEvent;

pub fn handle_navigate_mode(app: &mut App, key: KeyEvent) {
    let global = &app.config.keybindings.global;
    let form = &app.config.keybindings.form;

    if key_match(&key, &global.quit) {
        app.quit();
    } else if key_match(&key, &global.help) {
        app.show_help_popup = true;
    } else if key_match(&key, &global.login) {
        app.open_login();
    } else if key_match(&key, &global.calendar) {
        app.open_calendar();
    } else if key_match(&key, &form.next_field) {
        app.next_field();
    } else if key_match(&key, &form.prev_field) {
        app.prev_field();
    } else if key_match(&key, &form.next_row) {
        app.next_row();
    } else if key_match(&key, &form.prev_row) {
        app.prev_row();
    } else if key_match(&key, &form.edit) || key_match(&key, &form.toggle) {
        app.activate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::{Focus, InputMode};
    use chrono::NaiveDate;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn app() -> App<'static> {
        App::with_today(
            Config::default(),
            NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"),
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_navigate_mode(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn vim_keys_move_focus() {
        let mut app = app();
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.focus, Focus { row: 0, field: 1 });
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.focus, Focus { row: 1, field: 0 });
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.focus, Focus { row: 0, field: 0 });
    }

    #[test]
    fn enter_on_text_field_starts_editing() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Editing);
    }

    #[test]
    fn global_keys_open_popups_and_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help_popup);
        press(&mut app, KeyCode::Char('c'));
        assert!(app.show_calendar_popup);
        handle_navigate_mode(&mut app, KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL));
        assert!(app.show_login_popup);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
