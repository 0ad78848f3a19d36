use serde::{Deserialize, Serialize};

/// Minimal `{id, name}` view of a related record embedded in another entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Genre {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Developer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founded_year: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reference_records_read_camel_case_payloads() {
        let platform: Platform = serde_json::from_value(json!({
            "id": 4, "name": "Mega Drive", "manufacturer": "Sega", "releaseYear": 1988
        }))
        .unwrap();
        assert_eq!(platform.release_year, Some(1988));

        let developer: Developer =
            serde_json::from_value(json!({ "name": "Treasure", "foundedYear": 1992 })).unwrap();
        assert_eq!(developer.id, None);
        assert_eq!(developer.founded_year, Some(1992));

        let genre: Genre = serde_json::from_value(json!({ "id": 2, "name": "Shmup" })).unwrap();
        assert_eq!(serde_json::to_value(&genre).unwrap(), json!({ "id": 2, "name": "Shmup" }));
    }
}
