//! Colour themes for the console.
//!
//! Three palettes, cycled at runtime with `t`.

use std::fmt;
use std::str::FromStr;

use ratatui::style::Color;

/// Named console theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Magenta and cyan on black.
    #[default]
    Neon,
    /// Blues and teals.
    Ocean,
    /// Greyscale only.
    Mono,
}

/// Concrete colours for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Titles, headers, highlighted controls.
    pub accent: Color,
    /// Block borders.
    pub border: Color,
    /// Ordinary log text.
    pub text: Color,
    /// Hints and timestamps.
    pub muted: Color,
    /// Success lines.
    pub success: Color,
    /// Error lines.
    pub error: Color,
    /// Busy controls.
    pub busy: Color,
    /// One bar colour per simulation kind.
    pub bars: [Color; 4],
}

impl Theme {
    /// Every theme, in cycle order.
    pub const ALL: [Theme; 3] = [Theme::Neon, Theme::Ocean, Theme::Mono];

    /// The theme after this one, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::Neon => Self::Ocean,
            Self::Ocean => Self::Mono,
            Self::Mono => Self::Neon,
        }
    }

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Neon => "neon",
            Self::Ocean => "ocean",
            Self::Mono => "mono",
        }
    }

    /// Colours for this theme.
    pub fn palette(self) -> Palette {
        match self {
            Self::Neon => Palette {
                accent: Color::Magenta,
                border: Color::Cyan,
                text: Color::White,
                muted: Color::DarkGray,
                success: Color::LightGreen,
                error: Color::LightRed,
                busy: Color::Yellow,
                bars: [Color::Cyan, Color::Magenta, Color::LightGreen, Color::LightRed],
            },
            Self::Ocean => Palette {
                accent: Color::LightBlue,
                border: Color::Blue,
                text: Color::Gray,
                muted: Color::DarkGray,
                success: Color::Cyan,
                error: Color::Red,
                busy: Color::LightCyan,
                bars: [Color::Blue, Color::Cyan, Color::LightBlue, Color::LightCyan],
            },
            Self::Mono => Palette {
                accent: Color::White,
                border: Color::Gray,
                text: Color::Gray,
                muted: Color::DarkGray,
                success: Color::White,
                error: Color::White,
                busy: Color::White,
                bars: [Color::White, Color::Gray, Color::White, Color::Gray],
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "neon" => Ok(Self::Neon),
            "ocean" => Ok(Self::Ocean),
            "mono" => Ok(Self::Mono),
            other => Err(format!("unknown theme '{other}' (expected neon, ocean or mono)")),
        }
    }
}
