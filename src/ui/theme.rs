use crate::config::Theme;
use crate::ui::color_parser::parse_color;
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct ThemeTokens {
    pub border_default: Color,
    pub border_editing: Color,
    pub label: Color,
    pub focus_bg: Color,
    pub checked: Color,
    pub muted: Color,
    pub error: Color,
    pub accent: Color,
}

impl ThemeTokens {
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            border_default: parse_color(&theme.border_default),
            border_editing: parse_color(&theme.border_editing),
            label: parse_color(&theme.label),
            focus_bg: parse_color(&theme.focus),
            checked: parse_color(&theme.checked),
            muted: parse_color(&theme.muted),
            error: parse_color(&theme.error),
            accent: parse_color(&theme.accent),
        }
    }
}
