//! Boolean UI preferences

use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;

/// A recognized boolean preference.
///
/// The public name doubles as the storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preference {
    /// Haptic feedback when data finishes loading
    Vibrate,
    /// Skip thumbnail rendering in recipe lists
    FastMode,
    /// Dark color theme
    DarkMode,
}

impl Preference {
    pub const ALL: [Preference; 3] = [Preference::Vibrate, Preference::FastMode, Preference::DarkMode];

    pub fn key(self) -> &'static str {
        match self {
            Preference::Vibrate => "vibrate",
            Preference::FastMode => "fastMode",
            Preference::DarkMode => "darkMode",
        }
    }

    pub fn default_value(self) -> bool {
        matches!(self, Preference::Vibrate)
    }

    /// Stored form: the literal strings `"true"` / `"false"`
    pub fn encode(value: bool) -> &'static str {
        if value { "true" } else { "false" }
    }

    /// Parse a stored value. Anything but the two literals is malformed.
    pub fn decode(raw: &str) -> Option<bool> {
        match raw {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Preference {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preference::ALL
            .into_iter()
            .find(|p| p.key() == s)
            .ok_or_else(|| StoreError::InvalidPreference(s.to_string()))
    }
}
