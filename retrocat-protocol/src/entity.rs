use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A managed resource type exposed by the catalog API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Games,
    Platforms,
    Genres,
    Developers,
    Articles,
    Collection,
}

impl Entity {
    pub fn all() -> &'static [Entity] {
        &[
            Entity::Games,
            Entity::Platforms,
            Entity::Genres,
            Entity::Developers,
            Entity::Articles,
            Entity::Collection,
        ]
    }

    /// Path segment of the entity's REST resource.
    pub fn path(&self) -> &'static str {
        match self {
            Entity::Games => "games",
            Entity::Platforms => "platforms",
            Entity::Genres => "genres",
            Entity::Developers => "developers",
            Entity::Articles => "articles",
            Entity::Collection => "collection",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Entity::Games => "Games",
            Entity::Platforms => "Platforms",
            Entity::Genres => "Genres",
            Entity::Developers => "Developers",
            Entity::Articles => "Articles",
            Entity::Collection => "Collection",
        }
    }

    /// Reference data managed through admin CRUD forms.
    pub fn is_reference_data(&self) -> bool {
        !matches!(self, Entity::Collection)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entity '{0}'")]
pub struct UnknownEntity(pub String);

impl FromStr for Entity {
    type Err = UnknownEntity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "games" | "game" => Ok(Entity::Games),
            "platforms" | "platform" => Ok(Entity::Platforms),
            "genres" | "genre" => Ok(Entity::Genres),
            "developers" | "developer" => Ok(Entity::Developers),
            "articles" | "article" => Ok(Entity::Articles),
            "collection" | "collections" => Ok(Entity::Collection),
            other => Err(UnknownEntity(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_singular_and_plural() {
        assert_eq!("Game".parse::<Entity>(), Ok(Entity::Games));
        assert_eq!("articles".parse::<Entity>(), Ok(Entity::Articles));
        assert!("consoles".parse::<Entity>().is_err());
    }

    #[test]
    fn display_matches_path() {
        for entity in Entity::all() {
            assert_eq!(entity.to_string(), entity.path());
        }
    }
}
