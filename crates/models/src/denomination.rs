use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// One of the four fixed coin units a character can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Denomination {
    Copper,
    Silver,
    Gold,
    Platinum,
}

impl Denomination {
    /// Every denomination, lowest value first.
    pub const ALL: [Denomination; 4] = [
        Denomination::Copper,
        Denomination::Silver,
        Denomination::Gold,
        Denomination::Platinum,
    ];

    /// Key used in the persisted document and accepted from callers.
    pub const fn key(self) -> &'static str {
        match self {
            Denomination::Copper => "copper",
            Denomination::Silver => "silver",
            Denomination::Gold => "gold",
            Denomination::Platinum => "platinum",
        }
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Denomination {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Denomination::ALL
            .into_iter()
            .find(|d| d.key().eq_ignore_ascii_case(key))
            .ok_or_else(|| ModelError::InvalidDenomination(s.to_string()))
    }
}
