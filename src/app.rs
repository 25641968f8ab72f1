use crate::config::Config;
use crate::date_input::normalize_date_input;
use crate::form::controller::{END_DATE, Effect, START_DATE};
use crate::form::dates::parse_timestamp;
use crate::form::session::{MESSAGE_TYPE_NAME, session_editor};
use crate::form::{
    Field, FieldKind, FieldStore, FormDocument, FormEvent, MessageType, SyncController,
};
use crate::integrations::calendar::{self, MonthGrid};
use crate::integrations::login::{self, LoginOutcome};
use crate::models::{Focus, InputMode, LoginForm, LoginStatus};
use chrono::{DateTime, Duration, Local, NaiveDate};
use std::sync::mpsc::Receiver;
use tracing::{info, warn};
use tui_textarea::TextArea;

const PLACEHOLDER_FIELD: &str = "Type a value (Enter to save, Esc to cancel)";
const PLACEHOLDER_DATE: &str = "YYYY-MM-DD, today, +3d, next fri…";

pub struct App<'a> {
    pub config: Config,
    pub document: FormDocument,
    pub controller: SyncController,
    pub today: NaiveDate,

    pub input_mode: InputMode,
    pub focus: Focus,
    pub textarea: TextArea<'a>,

    pub show_help_popup: bool,
    pub show_login_popup: bool,
    pub login: LoginForm,
    pub login_receiver: Option<Receiver<LoginOutcome>>,
    pub logged_in_as: Option<String>,
    pub auth_token: Option<String>,

    pub show_calendar_popup: bool,
    pub calendar: Option<MonthGrid>,
    pub calendar_selected: usize,

    pub toast_message: Option<String>,
    pub toast_expiry: Option<DateTime<Local>>,
    pub should_quit: bool,
}

impl<'a> App<'a> {
    pub fn new(config: Config) -> App<'a> {
        Self::with_today(config, Local::now().date_naive())
    }

    pub fn with_today(config: Config, today: NaiveDate) -> App<'a> {
        let document = session_editor(&config.form, today);
        let mut controller = SyncController::new();
        controller.initialize(&document);
        if !controller.missing().is_empty() {
            warn!(missing = ?controller.missing(), "session editor is missing bound fields");
        }

        let mut app = App {
            config,
            document,
            controller,
            today,
            input_mode: InputMode::Navigate,
            focus: Focus::default(),
            textarea: TextArea::default(),
            show_help_popup: false,
            show_login_popup: false,
            login: LoginForm::default(),
            login_receiver: None,
            logged_in_as: None,
            auth_token: None,
            show_calendar_popup: false,
            calendar: None,
            calendar_selected: 0,
            toast_message: None,
            toast_expiry: None,
            should_quit: false,
        };
        app.clamp_focus();
        app
    }

    pub fn toast(&mut self, message: impl Into<String>) {
        self.toast_message = Some(message.into());
        self.toast_expiry = Some(Local::now() + Duration::seconds(2));
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn focused_field(&self) -> Option<&Field> {
        self.document.field_at(self.focus.row, self.focus.field)
    }

    // ── focus ──

    pub fn next_field(&mut self) {
        let len = self.row_len(self.focus.row);
        if self.focus.field + 1 < len {
            self.focus.field += 1;
        } else if let Some(row) = self.visible_row_after(self.focus.row) {
            self.focus = Focus { row, field: 0 };
        }
    }

    pub fn prev_field(&mut self) {
        if self.focus.field > 0 {
            self.focus.field -= 1;
        } else if let Some(row) = self.visible_row_before(self.focus.row) {
            let field = self.row_len(row).saturating_sub(1);
            self.focus = Focus { row, field };
        }
    }

    pub fn next_row(&mut self) {
        if let Some(row) = self.visible_row_after(self.focus.row) {
            self.focus = Focus { row, field: 0 };
        }
    }

    pub fn prev_row(&mut self) {
        if let Some(row) = self.visible_row_before(self.focus.row) {
            self.focus = Focus { row, field: 0 };
        }
    }

    fn row_len(&self, row: usize) -> usize {
        self.document.rows().get(row).map_or(0, |r| r.fields.len())
    }

    fn visible_row_after(&self, row: usize) -> Option<usize> {
        (row + 1..self.document.rows().len()).find(|&r| self.is_focusable(r))
    }

    fn visible_row_before(&self, row: usize) -> Option<usize> {
        (0..row).rev().find(|&r| self.is_focusable(r))
    }

    fn is_focusable(&self, row: usize) -> bool {
        self.document.is_row_visible(row) && self.row_len(row) > 0
    }

    /// Moves focus off a row that was just hidden.
    fn clamp_focus(&mut self) {
        if self.is_focusable(self.focus.row) {
            self.focus.field = self.focus.field.min(self.row_len(self.focus.row) - 1);
            return;
        }
        if let Some(row) = self
            .visible_row_after(self.focus.row)
            .or_else(|| self.visible_row_before(self.focus.row))
        {
            self.focus = Focus { row, field: 0 };
        }
    }

    // ── field interaction ──

    /// Edits, toggles, or selects the focused field depending on its kind.
    pub fn activate(&mut self) {
        let Some(field) = self.focused_field() else {
            return;
        };
        match field.kind {
            FieldKind::Checkbox(_) => self.toggle_focused(),
            FieldKind::Radio { .. } => self.select_focused(),
            _ => self.start_edit(),
        }
    }

    pub fn start_edit(&mut self) {
        let Some(field) = self.focused_field() else {
            return;
        };
        if !field.is_editable_text() {
            return;
        }
        let value = field.text_value().unwrap_or_default().to_string();
        let placeholder = if matches!(field.kind, FieldKind::Date(_)) {
            PLACEHOLDER_DATE
        } else {
            PLACEHOLDER_FIELD
        };

        let mut textarea = TextArea::from(value.lines().map(str::to_string).collect::<Vec<_>>());
        textarea.set_placeholder_text(placeholder);
        textarea.move_cursor(tui_textarea::CursorMove::Bottom);
        textarea.move_cursor(tui_textarea::CursorMove::End);
        self.textarea = textarea;
        self.input_mode = InputMode::Editing;
    }

    pub fn editing_multiline(&self) -> bool {
        self.input_mode == InputMode::Editing
            && self.focused_field().is_some_and(Field::is_multiline)
    }

    pub fn cancel_edit(&mut self) {
        self.textarea = TextArea::default();
        self.input_mode = InputMode::Navigate;
    }

    /// Writes the editor contents into the focused field and lets the
    /// controller react to the change.
    pub fn commit_edit(&mut self) {
        let Some(field) = self.focused_field() else {
            self.cancel_edit();
            return;
        };
        let id = field.id.clone();
        let raw = self.textarea.lines().join("\n");
        let value = if matches!(field.kind, FieldKind::Date(_)) {
            normalize_date_input(&raw, self.today)
        } else {
            raw
        };

        self.document.set_value(&id, &value);
        self.cancel_edit();
        let effects = self
            .controller
            .dispatch(&mut self.document, &FormEvent::FieldChanged { id, value });
        self.report_effects(&effects);
    }

    pub fn toggle_focused(&mut self) {
        let Some(field) = self.focused_field() else {
            return;
        };
        let FieldKind::Checkbox(was) = field.kind else {
            return;
        };
        let id = field.id.clone();
        self.document.set_checked(&id, !was);
        let effects = self.controller.dispatch(
            &mut self.document,
            &FormEvent::CheckboxToggled { id, checked: !was },
        );
        self.report_effects(&effects);
    }

    pub fn select_focused(&mut self) {
        let Some(field) = self.focused_field() else {
            return;
        };
        let id = field.id.clone();
        if !self.document.select_radio(&id) {
            return;
        }
        let effects = self
            .controller
            .dispatch(&mut self.document, &FormEvent::OptionSelected { id });
        self.report_effects(&effects);
    }

    fn report_effects(&mut self, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::SetValue { id, value } if id == START_DATE => {
                    self.toast(format!("Start date moved to {value}"));
                }
                Effect::SetChecked { id, checked: false } => {
                    self.toast(format!("Unchecked {id}"));
                }
                _ => {}
            }
        }
        self.clamp_focus();
    }

    /// Accepted message types, for the status line.
    pub fn accepted_types(&self) -> Vec<&str> {
        self.document.checked_values("mtype")
    }

    pub fn message_type(&self) -> Option<MessageType> {
        self.document
            .selected_radio(MESSAGE_TYPE_NAME)
            .and_then(MessageType::from_selector_id)
    }

    /// Whole days between the remembered start and end dates.
    pub fn session_length_days(&self) -> Option<i64> {
        let dates = self.controller.dates()?;
        let start = parse_timestamp(&dates.start)?;
        let end = parse_timestamp(&dates.end)?;
        Some((end - start).num_days())
    }

    // ── login ──

    pub fn open_login(&mut self) {
        self.login = LoginForm {
            call_sign: self.logged_in_as.clone().unwrap_or_default(),
            ..LoginForm::default()
        };
        self.show_login_popup = true;
    }

    pub fn close_login(&mut self) {
        self.show_login_popup = false;
        self.login.password.clear();
    }

    pub fn submit_login(&mut self) {
        if self.login.status == LoginStatus::Pending {
            return;
        }
        self.login.status = LoginStatus::Pending;
        self.login_receiver = Some(login::spawn_login(
            self.config.server.clone(),
            self.login.call_sign.clone(),
            self.login.password.clone(),
        ));
    }

    pub fn apply_login_outcome(&mut self, outcome: LoginOutcome) {
        self.login_receiver = None;
        match outcome {
            LoginOutcome::Success {
                call_sign,
                token,
                redirect,
            } => {
                info!(call_sign = %call_sign, redirect = %redirect, "session established");
                self.logged_in_as = Some(call_sign.clone());
                self.auth_token = token;
                self.close_login();
                self.open_calendar();
                self.toast(format!("Logged in as {call_sign}"));
            }
            LoginOutcome::Incorrect => {
                self.login.status = LoginStatus::Incorrect;
                self.login.password.clear();
            }
            LoginOutcome::Error(message) => {
                self.login.status = LoginStatus::Failed(message);
            }
        }
    }

    // ── calendar ──

    pub fn session_end(&self) -> Option<NaiveDate> {
        let value = self.document.value(END_DATE)?;
        parse_timestamp(&value).map(|ts| ts.date_naive())
    }

    pub fn open_calendar(&mut self) {
        let end = self.session_end();
        let anchor = end.unwrap_or(self.today);
        let session_dates: Vec<NaiveDate> = end.into_iter().collect();
        let grid = MonthGrid::new(anchor, &session_dates);
        self.calendar_selected = grid
            .position_of(anchor)
            .or_else(|| grid.cells.iter().position(Option::is_some))
            .unwrap_or(0);
        self.calendar = Some(grid);
        self.show_calendar_popup = true;
    }

    pub fn close_calendar(&mut self) {
        self.show_calendar_popup = false;
        self.calendar = None;
    }

    /// Moves the calendar selection by `delta` cells, staying on days of
    /// the month.
    pub fn calendar_move(&mut self, delta: isize) {
        let Some(grid) = &self.calendar else {
            return;
        };
        let target = self.calendar_selected as isize + delta;
        if target < 0 || target as usize >= grid.cells.len() {
            return;
        }
        if grid.cell(target as usize).is_some() {
            self.calendar_selected = target as usize;
        }
    }

    pub fn calendar_open_selected(&mut self) {
        let Some(cell) = self
            .calendar
            .as_ref()
            .and_then(|grid| grid.cell(self.calendar_selected))
        else {
            return;
        };
        match calendar::open_cell(&self.config.server.base_url, &cell) {
            Ok(Some(url)) => self.toast(format!("Opened {url}")),
            Ok(None) => self.toast("No session on this day"),
            Err(err) => {
                warn!(error = %err, "failed to open session report");
                self.toast(err.to_string());
            }
        }
    }
}
