use crate::form::MessageType;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

pub fn key_match(key: &KeyEvent, bindings: &[String]) -> bool {
    bindings.iter().any(|binding| is_match(key, binding))
}

fn parse_binding(binding: &str) -> (KeyModifiers, KeyCode) {
    let mut modifiers = KeyModifiers::NONE;
    let mut code = KeyCode::Null;

    for part in binding.to_lowercase().split('+') {
        match part {
            "ctrl" => modifiers.insert(KeyModifiers::CONTROL),
            "opt" | "alt" => modifiers.insert(KeyModifiers::ALT),
            "shift" => modifiers.insert(KeyModifiers::SHIFT),
            "enter" => code = KeyCode::Enter,
            "esc" => code = KeyCode::Esc,
            "backspace" => code = KeyCode::Backspace,
            "tab" => code = KeyCode::Tab,
            "backtab" => code = KeyCode::BackTab,
            "space" => code = KeyCode::Char(' '),
            "up" => code = KeyCode::Up,
            "down" => code = KeyCode::Down,
            "left" => code = KeyCode::Left,
            "right" => code = KeyCode::Right,
            "home" => code = KeyCode::Home,
            "end" => code = KeyCode::End,
            "pageup" => code = KeyCode::PageUp,
            "pagedown" => code = KeyCode::PageDown,
            c if c.chars().count() == 1 => {
                if let Some(ch) = c.chars().next() {
                    code = KeyCode::Char(ch);
                }
            }
            _ => {}
        }
    }
    (modifiers, code)
}

fn is_match(key: &KeyEvent, binding: &str) -> bool {
    let (target_mods, target_code) = parse_binding(binding);

    let code_matches = match (key.code, target_code) {
        (KeyCode::Char(c), KeyCode::Char(tc)) => c.to_lowercase().next() == Some(tc),
        (code, target) => code == target,
    };
    if !code_matches {
        return false;
    }

    // Enter is exact so `enter` and `shift+enter` can be bound separately;
    // elsewhere Shift is ignored unless the binding asks for it.
    if target_code == KeyCode::Enter {
        return key.modifiers == target_mods;
    }
    let mut key_mods = key.modifiers;
    if !target_mods.contains(KeyModifiers::SHIFT) {
        key_mods.remove(KeyModifiers::SHIFT);
    }
    key_mods.contains(target_mods)
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "scc-ares-races", "wppform")
}

pub fn default_data_dir() -> PathBuf {
    if let Some(path) = std::env::var_os("WPPFORM_DATA_DIR") {
        return PathBuf::from(path);
    }
    if let Some(dirs) = project_dirs() {
        return dirs.data_dir().to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".wppform")
}

pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("WPPFORM_CONFIG") {
        return PathBuf::from(path);
    }
    if let Some(dirs) = project_dirs() {
        return dirs.config_dir().join("config.toml");
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".wppform-config.toml")
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub keybindings: KeyBindings,
    pub theme: Theme,
    pub server: ServerConfig,
    pub form: FormConfig,
    pub log: LogConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://wpp.scc-ares-races.org".to_string(),
            timeout_seconds: 15,
        }
    }
}

/// Defaults for a freshly opened session form.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct FormConfig {
    pub bbses: Vec<String>,
    pub to_bbses: Vec<String>,
    pub down_bbses: Vec<String>,
    pub message_types: Vec<String>,
    pub accepted_types: Vec<String>,
    pub message_type: MessageType,
    /// Days between start and end when no dates are configured.
    pub session_days: i64,
    /// `YYYY-MM-DD` or relative (`today`, `+1w`, `next tue`).
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub name: String,
    pub call_sign: String,
    pub prefix: String,
    pub retrievals: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        let bbses: Vec<String> = ["W1XSC", "W2XSC", "W3XSC", "W4XSC", "W5XSC"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let message_types: Vec<String> = [
            "plain", "ICS213", "EOC213RR", "AHFacStat", "CheckIn", "JurisStat", "MuniStat",
            "SheltStat",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        Self {
            to_bbses: vec![bbses[0].clone()],
            down_bbses: Vec::new(),
            bbses,
            accepted_types: vec!["plain".to_string()],
            message_types,
            message_type: MessageType::Any,
            session_days: 7,
            start_date: None,
            end_date: None,
            start_time: "00:00".to_string(),
            end_time: "20:00".to_string(),
            name: "SPECS Net".to_string(),
            call_sign: String::new(),
            prefix: String::new(),
            retrievals: "every 1h".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` filter directive; `WPPFORM_LOG` takes precedence.
    pub level: String,
    pub file: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: default_data_dir().join("wppform.log"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct KeyBindings {
    pub global: GlobalBindings,
    pub form: FormBindings,
    pub editor: EditorBindings,
    pub popup: PopupBindings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GlobalBindings {
    pub quit: Vec<String>,
    pub help: Vec<String>,
    pub login: Vec<String>,
    pub calendar: Vec<String>,
}

impl Default for GlobalBindings {
    fn default() -> Self {
        Self {
            quit: vec!["ctrl+q".to_string(), "q".to_string()],
            help: vec!["?".to_string()],
            login: vec!["ctrl+l".to_string()],
            calendar: vec!["c".to_string()],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct FormBindings {
    pub next_field: Vec<String>,
    pub prev_field: Vec<String>,
    pub next_row: Vec<String>,
    pub prev_row: Vec<String>,
    pub edit: Vec<String>,
    pub toggle: Vec<String>,
}

impl Default for FormBindings {
    fn default() -> Self {
        Self {
            next_field: vec!["tab".to_string(), "l".to_string(), "right".to_string()],
            prev_field: vec!["backtab".to_string(), "h".to_string(), "left".to_string()],
            next_row: vec!["j".to_string(), "down".to_string()],
            prev_row: vec!["k".to_string(), "up".to_string()],
            edit: vec!["enter".to_string(), "e".to_string()],
            toggle: vec!["space".to_string(), "enter".to_string()],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct EditorBindings {
    /// Commits single-line fields; inserts a newline in multi-line ones.
    pub commit: Vec<String>,
    /// Commits multi-line fields.
    pub commit_multiline: Vec<String>,
    pub cancel: Vec<String>,
}

impl Default for EditorBindings {
    fn default() -> Self {
        Self {
            commit: vec!["enter".to_string()],
            commit_multiline: vec!["shift+enter".to_string(), "ctrl+s".to_string()],
            cancel: vec!["esc".to_string()],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PopupBindings {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl Default for PopupBindings {
    fn default() -> Self {
        Self {
            confirm: vec!["enter".to_string()],
            cancel: vec!["esc".to_string()],
            up: vec!["k".to_string(), "up".to_string()],
            down: vec!["j".to_string(), "down".to_string()],
            left: vec!["h".to_string(), "left".to_string()],
            right: vec!["l".to_string(), "right".to_string()],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Theme {
    pub border_default: String,
    pub border_editing: String,
    pub label: String,
    pub focus: String,
    pub checked: String,
    pub muted: String,
    pub error: String,
    pub accent: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border_default: "Reset".to_string(),
            border_editing: "Green".to_string(),
            label: "Yellow".to_string(),
            focus: "50,50,50".to_string(),
            checked: "Green".to_string(),
            muted: "DarkGray".to_string(),
            error: "LightRed".to_string(),
            accent: "Cyan".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        Self::load_from_path(&config_path())
    }

    pub fn load_from_path(config_path: &Path) -> Self {
        let mut config = match fs::read_to_string(config_path) {
            Ok(content) => match toml::from_str::<Config>(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!(path = ?config_path, error = %e, "failed to parse config, using defaults");
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        };

        let changed = config.normalize();
        if changed || !config_path.exists() {
            if let Err(e) = config.save_to_path(config_path) {
                warn!(path = ?config_path, error = %e, "failed to write config");
            }
        }

        config
    }

    pub fn save_to_path(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, content)
    }

    fn normalize(&mut self) -> bool {
        let mut changed = false;

        if self.log.file.as_os_str().is_empty() {
            self.log.file = LogConfig::default().file;
            changed = true;
        } else if self.log.file.is_relative() {
            self.log.file = default_data_dir().join(&self.log.file);
            changed = true;
        }

        let trimmed = self.server.base_url.trim_end_matches('/');
        if trimmed.len() != self.server.base_url.len() {
            self.server.base_url = trimmed.to_string();
            changed = true;
        }

        if self.form.session_days < 0 {
            self.form.session_days = 0;
            changed = true;
        }

        changed
    }
}
