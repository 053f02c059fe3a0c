//! Catalog section preference stored on each user.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const PREFERENCE_CINEMA: &str = "cinema";
pub const PREFERENCE_STREAMING: &str = "streaming";
pub const PREFERENCE_BOTH: &str = "both";

/// Which catalog sections (cinema, streaming, or both) a user sees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    Cinema,
    Streaming,
    #[default]
    Both,
}

impl Preference {
    /// Every variant in display order, for building `<select>` options.
    pub const ALL: [Preference; 3] = [Preference::Cinema, Preference::Streaming, Preference::Both];

    pub fn as_str(self) -> &'static str {
        match self {
            Preference::Cinema => PREFERENCE_CINEMA,
            Preference::Streaming => PREFERENCE_STREAMING,
            Preference::Both => PREFERENCE_BOTH,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Preference::Cinema => "Cinema",
            Preference::Streaming => "Streaming",
            Preference::Both => "Cinema & Streaming",
        }
    }

    pub fn shows_cinema(self) -> bool {
        matches!(self, Preference::Cinema | Preference::Both)
    }

    pub fn shows_streaming(self) -> bool {
        matches!(self, Preference::Streaming | Preference::Both)
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            PREFERENCE_CINEMA => Ok(Preference::Cinema),
            PREFERENCE_STREAMING => Ok(Preference::Streaming),
            PREFERENCE_BOTH => Ok(Preference::Both),
            other => Err(format!(
                "Preference must be one of cinema, streaming or both (got '{other}')"
            )),
        }
    }
}
