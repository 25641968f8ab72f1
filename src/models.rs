#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Navigate,
    Editing,
}

/// Position of the focused field: row index, then field index within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Focus {
    pub row: usize,
    pub field: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    CallSign,
    Password,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginStatus {
    Idle,
    Pending,
    Incorrect,
    Failed(String),
}

/// Text field being edited in the login popup.
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub call_sign: String,
    pub password: String,
    pub field: LoginField,
    pub status: LoginStatus,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            call_sign: String::new(),
            password: String::new(),
            field: LoginField::CallSign,
            status: LoginStatus::Idle,
        }
    }
}

impl LoginForm {
    pub fn active_mut(&mut self) -> &mut String {
        match self.field {
            LoginField::CallSign => &mut self.call_sign,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn toggle_field(&mut self) {
        self.field = match self.field {
            LoginField::CallSign => LoginField::Password,
            LoginField::Password => LoginField::CallSign,
        };
    }
}
