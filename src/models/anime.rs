//! Anime domain types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier for a stored anime entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimeId(pub i32);

impl AnimeId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for AnimeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Broadcast season of an anime entry.
///
/// Stored and serialized as the uppercase season name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Parses a season name case-insensitively.
    pub fn parse(input: &str) -> Option<Self> {
        match input.to_ascii_uppercase().as_str() {
            "WINTER" => Some(Self::Winter),
            "SPRING" => Some(Self::Spring),
            "SUMMER" => Some(Self::Summer),
            "FALL" => Some(Self::Fall),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Winter => "WINTER",
            Self::Spring => "SPRING",
            Self::Summer => "SUMMER",
            Self::Fall => "FALL",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anime {
    pub id: AnimeId,
    pub title_romaji: String,
    pub title_english: Option<String>,
    pub genres: Vec<String>,
    pub season: Option<Season>,
    pub season_year: Option<i32>,
    pub episodes: Option<i32>,
    pub average_score: Option<i32>,
    pub popularity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating an anime entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnime {
    pub title_romaji: String,
    #[serde(default)]
    pub title_english: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub season: Option<Season>,
    #[serde(default)]
    pub season_year: Option<i32>,
    #[serde(default)]
    pub episodes: Option<i32>,
    #[serde(default)]
    pub average_score: Option<i32>,
    #[serde(default)]
    pub popularity: i32,
}

/// Partial anime update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeChanges {
    pub title_romaji: Option<String>,
    pub title_english: Option<String>,
    pub genres: Option<Vec<String>>,
    pub season: Option<Season>,
    pub season_year: Option<i32>,
    pub episodes: Option<i32>,
    pub average_score: Option<i32>,
    pub popularity: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_parse_is_case_insensitive() {
        assert_eq!(Season::parse("winter"), Some(Season::Winter));
        assert_eq!(Season::parse("WINTER"), Some(Season::Winter));
        assert_eq!(Season::parse("Fall"), Some(Season::Fall));
        assert_eq!(Season::parse("autumn"), None);
    }

    #[test]
    fn season_serializes_uppercase() {
        let json = serde_json::to_string(&Season::Spring).unwrap();
        assert_eq!(json, "\"SPRING\"");
        let back: Season = serde_json::from_str("\"SUMMER\"").unwrap();
        assert_eq!(back, Season::Summer);
    }
}
