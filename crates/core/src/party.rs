use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fragment::plain_text;

/// Canonical legislative-control designation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PartyValue {
    Rep,
    Dem,
    Split,
}

impl PartyValue {
    pub const ALL: [PartyValue; 3] = [PartyValue::Rep, PartyValue::Dem, PartyValue::Split];

    pub fn as_str(&self) -> &'static str {
        match self {
            PartyValue::Rep => "Rep",
            PartyValue::Dem => "Dem",
            PartyValue::Split => "Split",
        }
    }
}

impl fmt::Display for PartyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parses an already-normalized value. Only the three canonical spellings
/// are accepted; use [`resolve_party_token`] for raw document text.
impl FromStr for PartyValue {
    type Err = UnknownParty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Rep" => Ok(PartyValue::Rep),
            "Dem" => Ok(PartyValue::Dem),
            "Split" => Ok(PartyValue::Split),
            other => Err(UnknownParty(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No such party {0:?}")]
pub struct UnknownParty(pub String);

/// Normalize a raw cell into a [`PartyValue`].
///
/// Footnote markers and emphasis markup are stripped first, then
/// `"Divided"` is read as `Split`. The returned error echoes the raw text.
pub fn resolve_party_token(raw: &str) -> Result<PartyValue, UnknownParty> {
    let cleaned = plain_text(raw);
    let canonical = match cleaned.as_str() {
        "Divided" => "Split",
        other => other,
    };
    canonical
        .parse()
        .map_err(|_| UnknownParty(raw.to_string()))
}

/// Like [`resolve_party_token`], but also accepts the `"S"` abbreviation
/// used by the multi-year tables.
pub fn resolve_range_cell(raw: &str) -> Result<PartyValue, UnknownParty> {
    if plain_text(raw) == "S" {
        return Ok(PartyValue::Split);
    }
    resolve_party_token(raw)
}
