//! ANSI styling for text output.

/// ANSI escape codes.
pub mod colors {
    pub const RESET: &str = "\x1b[0m";

    /// Bold reverse green for STRT tags.
    pub const TAG_START: &str = "\x1b[1;7;32m";
    /// Bold reverse cyan for GATE tags.
    pub const TAG_STARGATE: &str = "\x1b[1;7;36m";
    /// Bold reverse yellow for BRDG tags.
    pub const TAG_BRIDGE: &str = "\x1b[1;7;33m";
    /// Bold reverse magenta for TEMP tags.
    pub const TAG_TEMPORARY: &str = "\x1b[1;7;35m";

    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    pub const GRAY: &str = "\x1b[90m";
    pub const GREEN: &str = "\x1b[32m";
    pub const ORANGE: &str = "\x1b[38;5;208m";
    pub const RED: &str = "\x1b[31m";
}

/// Resolved color codes, or empty strings when color is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub tag_start: &'static str,
    pub tag_stargate: &'static str,
    pub tag_bridge: &'static str,
    pub tag_temporary: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub green: &'static str,
    pub orange: &'static str,
    pub red: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            tag_start: colors::TAG_START,
            tag_stargate: colors::TAG_STARGATE,
            tag_bridge: colors::TAG_BRIDGE,
            tag_temporary: colors::TAG_TEMPORARY,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            green: colors::GREEN,
            orange: colors::ORANGE,
            red: colors::RED,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            tag_start: "",
            tag_stargate: "",
            tag_bridge: "",
            tag_temporary: "",
            white_bold: "",
            gray: "",
            green: "",
            orange: "",
            red: "",
        }
    }

    /// Pick a palette from terminal capabilities.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    /// Color for a security status: green for high-sec, orange for low-sec, red for null.
    pub fn security(&self, security: f64) -> &'static str {
        if security >= 0.45 {
            self.green
        } else if security > 0.0 {
            self.orange
        } else {
            self.red
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Respects `NO_COLOR` (https://no-color.org/) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}
