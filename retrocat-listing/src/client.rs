use std::sync::Arc;

use reqwest::Method;
use retrocat_core::ClientConfig;
use retrocat_protocol::records::{CollectionEntry, CollectionStatus};
use retrocat_protocol::Entity;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::info;
use url::Url;

use crate::error::FetchError;
use crate::fetcher::{HttpListingFetcher, ListingFetcher};
use crate::http::{ensure_success, parse_response, ApiHttp};
use crate::table::{DataTable, TableConfig};

/// Typed HTTP client for the catalog's CRUD and collection endpoints.
///
/// Reads are public; create, update and delete need a bearer token.
#[derive(Clone)]
pub struct CatalogClient {
    api: ApiHttp,
    page_size: u32,
}

impl CatalogClient {
    pub fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        Ok(Self {
            api: ApiHttp::new(config)?,
            page_size: config.page_size,
        })
    }

    pub fn base_url(&self) -> &Url {
        self.api.base_url()
    }

    /// Listing fetcher sharing this client's connection pool and token.
    pub fn listing_fetcher(&self) -> HttpListingFetcher {
        HttpListingFetcher::from_api(self.api.clone())
    }

    /// New data table for `entity` using the configured page size.
    pub fn table(&self, entity: Entity) -> DataTable {
        let fetcher: Arc<dyn ListingFetcher> = Arc::new(self.listing_fetcher());
        DataTable::new(TableConfig::for_entity(entity, self.page_size), fetcher)
    }

    pub async fn get<T: DeserializeOwned>(&self, entity: Entity, id: i64) -> Result<T, FetchError> {
        let url = self.record_url(entity, id)?;
        let response = self.api.request(Method::GET, url).send().await?;
        parse_response(response).await
    }

    pub async fn create<P, T>(&self, entity: Entity, payload: &P) -> Result<T, FetchError>
    where
        P: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.api.endpoint(entity.path())?;
        let response = self
            .api
            .authorized(Method::POST, url)?
            .json(payload)
            .send()
            .await?;
        let created = parse_response(response).await?;
        info!(%entity, "record created");
        Ok(created)
    }

    pub async fn update<P, T>(&self, entity: Entity, id: i64, payload: &P) -> Result<T, FetchError>
    where
        P: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.record_url(entity, id)?;
        let response = self
            .api
            .authorized(Method::PUT, url)?
            .json(payload)
            .send()
            .await?;
        let updated = parse_response(response).await?;
        info!(%entity, id, "record updated");
        Ok(updated)
    }

    pub async fn delete(&self, entity: Entity, id: i64) -> Result<(), FetchError> {
        let url = self.record_url(entity, id)?;
        let response = self.api.authorized(Method::DELETE, url)?.send().await?;
        ensure_success(response).await?;
        info!(%entity, id, "record deleted");
        Ok(())
    }

    /// Adds a game to the signed-in user's collection.
    pub async fn add_to_collection(
        &self,
        game_id: i64,
        status: CollectionStatus,
    ) -> Result<CollectionEntry, FetchError> {
        let url = self.api.endpoint(Entity::Collection.path())?;
        let response = self
            .api
            .authorized(Method::POST, url)?
            .json(&json!({ "gameId": game_id, "status": status }))
            .send()
            .await?;
        let entry = parse_response(response).await?;
        info!(game_id, %status, "game added to collection");
        Ok(entry)
    }

    pub async fn remove_from_collection(&self, game_id: i64) -> Result<(), FetchError> {
        let url = self.record_url(Entity::Collection, game_id)?;
        let response = self.api.authorized(Method::DELETE, url)?.send().await?;
        ensure_success(response).await?;
        info!(game_id, "game removed from collection");
        Ok(())
    }

    fn record_url(&self, entity: Entity, id: i64) -> Result<Url, FetchError> {
        self.api.endpoint(&format!("{}/{}", entity.path(), id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[tokio::test]
    async fn writes_without_token_fail_before_any_request() {
        // Port 9 (discard) is never contacted because the token check comes first.
        let config = ClientConfig::new("http://127.0.0.1:9/api").unwrap();
        let client = CatalogClient::new(&config).unwrap();

        let created = client
            .create::<_, Value>(Entity::Genres, &json!({"name": "Shmup"}))
            .await;
        assert!(matches!(created, Err(FetchError::Unauthorized)));
        assert!(matches!(
            client.delete(Entity::Genres, 3).await,
            Err(FetchError::Unauthorized)
        ));
        assert!(matches!(
            client.add_to_collection(5, CollectionStatus::Wishlist).await,
            Err(FetchError::Unauthorized)
        ));
    }

    #[test]
    fn tables_use_configured_page_size() {
        let config = ClientConfig::new("http://127.0.0.1:9/").unwrap().with_page_size(25);
        let client = CatalogClient::new(&config).unwrap();
        let table = client.table(Entity::Platforms);
        assert_eq!(table.limit(), 25);
        assert_eq!(table.entity(), Entity::Platforms);
        assert_eq!(
            client.record_url(Entity::Games, 42).unwrap().as_str(),
            "http://127.0.0.1:9/games/42"
        );
    }
}
