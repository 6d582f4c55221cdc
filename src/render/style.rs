//! ANSI styling helpers
//!
//! Every helper is a no-op when color is disabled, except where plain text
//! needs its own marker to stay distinguishable (see [`Style::null_marker`]).

/// Literal shown for null or missing cells
pub const NULL_MARKER: &str = "null";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub color: bool,
}

impl Style {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    fn wrap(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: &str) -> String {
        self.wrap("1", text)
    }

    pub fn dim(&self, text: &str) -> String {
        self.wrap("2", text)
    }

    pub fn red(&self, text: &str) -> String {
        self.wrap("31", text)
    }

    /// Foreground from a `#RRGGBB` color; unparsable colors leave text as-is
    pub fn hex(&self, hex: &str, text: &str) -> String {
        match parse_hex(hex) {
            Some((r, g, b)) => self.wrap(&format!("38;2;{};{};{}", r, g, b), text),
            None => text.to_string(),
        }
    }

    /// Marker for a null cell: dimmed italic `null`, or `[null]` without color
    pub fn null_marker(&self) -> String {
        if self.color {
            self.wrap("2;3", NULL_MARKER)
        } else {
            format!("[{}]", NULL_MARKER)
        }
    }

    /// Display width of the null marker
    pub fn null_marker_width(&self) -> usize {
        if self.color {
            NULL_MARKER.len()
        } else {
            NULL_MARKER.len() + 2
        }
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Pad `text` to `width` display columns, counting chars
pub fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

/// Truncate to at most `width` chars, marking the cut with `…`
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}
