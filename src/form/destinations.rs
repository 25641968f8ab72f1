use regex::Regex;
use std::sync::OnceLock;

pub const SEND_PREFIX: &str = "destbbs.";
pub const SUPPRESS_PREFIX: &str = "downbbs.";

fn send_name_regex() -> &'static Regex {
    static SEND_NAME: OnceLock<Regex> = OnceLock::new();
    SEND_NAME.get_or_init(|| Regex::new(r"^destbbs\.(.+)$").expect("valid send name pattern"))
}

/// Destination suffix of a "send" checkbox name, e.g. `W1XSC` for
/// `destbbs.W1XSC`.
pub fn destination_of(name: &str) -> Option<&str> {
    send_name_regex()
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn suppress_id(destination: &str) -> String {
    format!("{SUPPRESS_PREFIX}{destination}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Send,
    Suppress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationPair {
    pub destination: String,
    pub send_id: String,
    pub suppress_id: String,
}

impl DestinationPair {
    pub fn side_of(&self, id: &str) -> Option<Side> {
        if id == self.send_id {
            Some(Side::Send)
        } else if id == self.suppress_id {
            Some(Side::Suppress)
        } else {
            None
        }
    }

    /// Checkbox to force off after `side` was clicked into `checked`.
    pub fn on_toggle(&self, side: Side, checked: bool) -> Option<&str> {
        if !checked {
            return None;
        }
        match side {
            Side::Send => Some(&self.suppress_id),
            Side::Suppress => Some(&self.send_id),
        }
    }
}
