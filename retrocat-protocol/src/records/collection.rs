use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a game sits in a user's personal collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionStatus {
    #[default]
    Owned,
    Wishlist,
    Playing,
    Completed,
}

impl CollectionStatus {
    pub const VALUES: &'static [&'static str] = &["owned", "wishlist", "playing", "completed"];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionStatus::Owned => "owned",
            CollectionStatus::Wishlist => "wishlist",
            CollectionStatus::Playing => "playing",
            CollectionStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for CollectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owned" => Ok(CollectionStatus::Owned),
            "wishlist" => Ok(CollectionStatus::Wishlist),
            "playing" => Ok(CollectionStatus::Playing),
            "completed" => Ok(CollectionStatus::Completed),
            other => Err(format!(
                "unknown collection status '{other}', expected one of {}",
                Self::VALUES.join(", ")
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionEntry {
    pub game_id: i64,
    #[serde(default)]
    pub status: CollectionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_values_match_serde_names() {
        for raw in CollectionStatus::VALUES {
            let parsed: CollectionStatus = raw.parse().unwrap();
            assert_eq!(serde_json::to_value(parsed).unwrap(), *raw);
        }
    }
}
