use serde::{Deserialize, Serialize};

use super::reference::NamedRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer: Option<NamedRef>,
    #[serde(default)]
    pub platforms: Vec<NamedRef>,
    #[serde(default)]
    pub genres: Vec<NamedRef>,
}

impl Game {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            release_year: None,
            rating: None,
            description: None,
            developer: None,
            platforms: Vec::new(),
            genres: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_nested_relations() {
        let game: Game = serde_json::from_value(json!({
            "id": 7,
            "title": "Super Mario World",
            "releaseYear": 1990,
            "developer": {"id": 1, "name": "Nintendo EAD"},
            "platforms": [{"id": 3, "name": "SNES"}]
        }))
        .unwrap();
        assert_eq!(game.release_year, Some(1990));
        assert_eq!(game.platforms[0].name, "SNES");
        assert!(game.genres.is_empty());
    }

    #[test]
    fn new_game_omits_unset_fields() {
        let value = serde_json::to_value(Game::new("Tetris")).unwrap();
        assert_eq!(value, json!({"title": "Tetris", "platforms": [], "genres": []}));
    }
}
