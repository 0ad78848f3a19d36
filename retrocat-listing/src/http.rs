use reqwest::{Method, RequestBuilder, Response};
use retrocat_core::ClientConfig;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::FetchError;

/// Shared reqwest plumbing for the listing fetcher and the CRUD client.
#[derive(Clone)]
pub(crate) struct ApiHttp {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiHttp {
    pub(crate) fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("retrocat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            token: config.api_token.clone(),
        })
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(path)
            .map_err(|source| FetchError::InvalidUrl {
                url: format!("{}{}", self.base_url, path),
                source,
            })
    }

    /// Builds a request, attaching the bearer token when one is configured.
    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Like [`ApiHttp::request`] but fails locally when no token is configured.
    pub(crate) fn authorized(&self, method: Method, url: Url) -> Result<RequestBuilder, FetchError> {
        if self.token.is_none() {
            return Err(FetchError::Unauthorized);
        }
        Ok(self.request(method, url))
    }
}

pub(crate) async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    let response = ensure_success(response).await?;
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|err| FetchError::Decode(err.to_string()))
}

pub(crate) async fn ensure_success(response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(FetchError::Status {
        status,
        message: error_message(&body),
    })
}

// Error payloads come as `{"message": "..."}`, `{"message": ["...", "..."]}`
// or `{"error": "..."}`; anything else is passed through as plain text.
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    let Ok(Value::Object(payload)) = serde_json::from_str::<Value>(body) else {
        return Some(body.to_string());
    };
    ["message", "error"]
        .iter()
        .find_map(|key| match payload.get(*key) {
            Some(Value::String(text)) if !text.trim().is_empty() => Some(text.clone()),
            Some(Value::Array(items)) => {
                let joined = items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join("; ");
                (!joined.is_empty()).then_some(joined)
            }
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_message_shapes() {
        assert_eq!(
            error_message(r#"{"message": "title must not be empty"}"#).as_deref(),
            Some("title must not be empty")
        );
        assert_eq!(
            error_message(r#"{"statusCode": 400, "message": ["name too short", "year invalid"]}"#)
                .as_deref(),
            Some("name too short; year invalid")
        );
        assert_eq!(
            error_message(r#"{"error": "Forbidden"}"#).as_deref(),
            Some("Forbidden")
        );
        assert_eq!(error_message("Bad Gateway").as_deref(), Some("Bad Gateway"));
        assert_eq!(error_message(r#"{"code": 17}"#), None);
        assert_eq!(error_message("  "), None);
    }

    #[test]
    fn endpoints_keep_base_path() {
        let config = ClientConfig::new("http://localhost:9000/api").unwrap();
        let api = ApiHttp::new(&config).unwrap();
        assert_eq!(
            api.endpoint("games/datatable").unwrap().as_str(),
            "http://localhost:9000/api/games/datatable"
        );
    }

    #[test]
    fn authorized_requires_token() {
        let config = ClientConfig::new("http://localhost:9000/").unwrap();
        let api = ApiHttp::new(&config).unwrap();
        let url = api.endpoint("games").unwrap();
        assert!(matches!(
            api.authorized(Method::POST, url),
            Err(FetchError::Unauthorized)
        ));
    }
}
