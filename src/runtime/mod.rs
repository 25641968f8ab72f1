use crate::app::App;
use crate::models::LoginStatus;
use chrono::Local;
use std::sync::mpsc::TryRecvError;

pub fn tick(app: &mut App) {
    handle_login_result(app);

    if let Some(expiry) = app.toast_expiry
        && Local::now() >= expiry
    {
        app.toast_expiry = None;
        app.toast_message = None;
    }
}

fn handle_login_result(app: &mut App) {
    let result = {
        let Some(receiver) = app.login_receiver.as_ref() else {
            return;
        };
        receiver.try_recv()
    };

    match result {
        Ok(outcome) => app.apply_login_outcome(outcome),
        Err(TryRecvError::Empty) => {}
        Err(TryRecvError::Disconnected) => {
            app.login_receiver = None;
            app.login.status = LoginStatus::Failed("login stopped".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::integrations::login::LoginOutcome;
    use chrono::{Duration, NaiveDate};
    use std::sync::mpsc;

    fn app() -> App<'static> {
        App::with_today(
            Config::default(),
            NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"),
        )
    }

    #[test]
    fn delivers_pending_login_outcome() {
        let mut app = app();
        app.open_login();
        let (sender, receiver) = mpsc::channel();
        app.login_receiver = Some(receiver);
        app.login.status = LoginStatus::Pending;

        tick(&mut app);
        assert_eq!(app.login.status, LoginStatus::Pending);

        sender.send(LoginOutcome::Incorrect).expect("send");
        tick(&mut app);
        assert_eq!(app.login.status, LoginStatus::Incorrect);
        assert!(app.login_receiver.is_none());
    }

    #[test]
    fn dropped_worker_marks_login_failed() {
        let mut app = app();
        let (sender, receiver) = mpsc::channel::<LoginOutcome>();
        app.login_receiver = Some(receiver);
        drop(sender);
        tick(&mut app);
        assert!(matches!(app.login.status, LoginStatus::Failed(_)));
    }

    #[test]
    fn expired_toast_is_cleared() {
        let mut app = app();
        app.toast("hello");
        tick(&mut app);
        assert!(app.toast_message.is_some());
        app.toast_expiry = Some(Local::now() - Duration::seconds(1));
        tick(&mut app);
        assert!(app.toast_message.is_none());
    }
}
