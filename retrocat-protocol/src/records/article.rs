use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::reference::NamedRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl ArticleStatus {
    pub const VALUES: &'static [&'static str] = &["draft", "published", "archived"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Published => "published",
            ArticleStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub status: ArticleStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn article_defaults_to_draft_and_reads_author() {
        let article: Article = serde_json::from_value(json!({
            "id": 9,
            "title": "Why the SNES sound chip still matters",
            "author": { "id": 3, "name": "Ada" },
            "publishedAt": "2023-04-01T09:30:00Z"
        }))
        .unwrap();
        assert_eq!(article.status, ArticleStatus::Draft);
        assert_eq!(article.author.map(|author| author.name).as_deref(), Some("Ada"));
        assert!(article.published_at.is_some());
        assert_eq!(ArticleStatus::VALUES[1], ArticleStatus::Published.as_str());
    }
}
