use crate::{app::App, config::key_match, models::LoginStatus};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Routes keys to the open popup, if any. Returns `true` when the key was
/// consumed.
pub fn handle_popup_events(app: &mut App, key: KeyEvent) -> bool {
    if app.show_login_popup {
        handle_login_popup(app, key);
        return true;
    }
    if app.show_calendar_popup {
        handle_calendar_popup(app, key);
        return true;
    }
    if app.show_help_popup {
        if key_match(&key, &app.config.keybindings.popup.cancel)
            || key_match(&key, &app.config.keybindings.global.help)
        {
            app.show_help_popup = false;
        }
        return true;
    }
    false
}

fn handle_login_popup(app: &mut App, key: KeyEvent) {
    if key_match(&key, &app.config.keybindings.popup.cancel) {
        app.close_login();
        return;
    }
    if key_match(&key, &app.config.keybindings.popup.confirm) {
        app.submit_login();
        return;
    }
    if app.login.status == LoginStatus::Pending {
        return;
    }
    match key.code {
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => app.login.toggle_field(),
        KeyCode::Backspace => {
            app.login.active_mut().pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.login.active_mut().push(c);
        }
        _ => {}
    }
}

fn handle_calendar_popup(app: &mut App, key: KeyEvent) {
    let popup = &app.config.keybindings.popup;
    if key_match(&key, &popup.cancel) || key_match(&key, &app.config.keybindings.global.calendar) {
        app.close_calendar();
    } else if key_match(&key, &popup.confirm) {
        app.calendar_open_selected();
    } else if key_match(&key, &popup.left) {
        app.calendar_move(-1);
    } else if key_match(&key, &popup.right) {
        app.calendar_move(1);
    } else if key_match(&key, &popup.up) {
        app.calendar_move(-7);
    } else if key_match(&key, &popup.down) {
        app.calendar_move(7);
    }
}
