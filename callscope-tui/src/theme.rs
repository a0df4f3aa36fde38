//! Color palettes and status color lookups.

use callscope_core::{CallStatus, TranscriptRole};
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub bg_highlight: Color,
    pub primary: Color,
    pub secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl Theme {
    /// Palette by config name; anything but `light` is dark.
    pub fn named(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("light") {
            Self::light()
        } else {
            Self::dark()
        }
    }

    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb(18, 18, 18),
            bg_highlight: Color::Rgb(42, 42, 42),
            primary: Color::Rgb(0, 123, 255),
            secondary: Color::Rgb(111, 66, 193),
            success: Color::Rgb(40, 167, 69),
            warning: Color::Rgb(255, 193, 7),
            error: Color::Rgb(220, 53, 69),
            info: Color::Rgb(23, 162, 184),
            text: Color::Rgb(240, 240, 240),
            text_dim: Color::Rgb(136, 136, 136),
            border: Color::Rgb(68, 68, 68),
            border_focus: Color::Rgb(0, 123, 255),
        }
    }

    pub fn light() -> Self {
        Self {
            bg: Color::Rgb(255, 255, 255),
            bg_highlight: Color::Rgb(233, 236, 239),
            primary: Color::Rgb(0, 86, 179),
            secondary: Color::Rgb(89, 50, 160),
            success: Color::Rgb(30, 126, 52),
            warning: Color::Rgb(176, 122, 0),
            error: Color::Rgb(189, 33, 48),
            info: Color::Rgb(17, 122, 139),
            text: Color::Rgb(33, 37, 41),
            text_dim: Color::Rgb(108, 117, 125),
            border: Color::Rgb(173, 181, 189),
            border_focus: Color::Rgb(0, 86, 179),
        }
    }
}

/// Fixed status colors, the same in every palette.
pub fn call_status_color(status: &CallStatus) -> Color {
    match status {
        CallStatus::Created => Color::Rgb(0xff, 0xa5, 0x00),
        CallStatus::Registered => Color::Rgb(0x17, 0xa2, 0xb8),
        CallStatus::Ongoing => Color::Rgb(0x00, 0x7b, 0xff),
        CallStatus::Ended => Color::Rgb(0x28, 0xa7, 0x45),
        CallStatus::Other(_) => Color::Rgb(0x6c, 0x75, 0x7d),
    }
}

pub fn role_color(role: &TranscriptRole, theme: &Theme) -> Color {
    match role {
        TranscriptRole::Agent => theme.primary,
        TranscriptRole::User => theme.success,
        TranscriptRole::ToolCallInvocation | TranscriptRole::ToolCallResult => theme.secondary,
        TranscriptRole::Other(_) => theme.text_dim,
    }
}

pub fn flag_color(flag: Option<bool>, theme: &Theme) -> Color {
    match flag {
        Some(true) => theme.success,
        Some(false) => theme.error,
        None => theme.text_dim,
    }
}
