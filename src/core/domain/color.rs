//! Deployment color.
//!
//! Blue/green tracks alternate as the active Kafka cluster. The color is
//! chosen once per run and never changes afterwards.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// One of the two parallel deployment tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Blue,
    Green,
}

impl Color {
    /// Every recognized color.
    pub const ALL: [Color; 2] = [Color::Blue, Color::Green];

    /// Lowercase name as used in secret suffixes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Blue => "blue",
            Color::Green => "green",
        }
    }

    /// The suffix appended to a base name, including the separator.
    pub fn suffix(&self) -> String {
        format!("-{}", self.as_str())
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blue" => Ok(Color::Blue),
            "green" => Ok(Color::Green),
            _ => Err(ConfigError::InvalidColor(s.trim().to_string())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
