use async_trait::async_trait;
use reqwest::Method;
use retrocat_core::ClientConfig;
use retrocat_protocol::listing::{ListingQuery, ListingResponse, ListingResult};
use retrocat_protocol::Entity;
use tracing::{debug, warn};
use url::Url;

use crate::error::FetchError;
use crate::http::{parse_response, ApiHttp};

/// Issues a paginated, sorted, filtered query against an entity's list endpoint.
#[async_trait]
pub trait ListingFetcher: Send + Sync {
    async fn fetch(&self, entity: Entity, query: &ListingQuery)
        -> Result<ListingResult, FetchError>;
}

/// [`ListingFetcher`] backed by the catalog's `POST /{entity}/datatable` endpoints.
#[derive(Clone)]
pub struct HttpListingFetcher {
    api: ApiHttp,
}

impl HttpListingFetcher {
    pub fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        Ok(Self {
            api: ApiHttp::new(config)?,
        })
    }

    pub(crate) fn from_api(api: ApiHttp) -> Self {
        Self { api }
    }

    pub fn base_url(&self) -> &Url {
        self.api.base_url()
    }
}

#[async_trait]
impl ListingFetcher for HttpListingFetcher {
    async fn fetch(
        &self,
        entity: Entity,
        query: &ListingQuery,
    ) -> Result<ListingResult, FetchError> {
        let url = self.api.endpoint(&format!("{}/datatable", entity.path()))?;
        debug!(
            %entity,
            page = query.page(),
            limit = query.limit(),
            sort_field = query.sort_field().unwrap_or("-"),
            sort_order = %query.sort_order(),
            filters = query.filters().len(),
            "fetching listing"
        );

        let response = self
            .api
            .request(Method::POST, url)
            .json(query)
            .send()
            .await?;
        let payload: ListingResponse = parse_response(response).await?;

        let reported_pages = payload.total_pages;
        let result = ListingResult::from_response(payload, query.limit());
        if let Some(reported) = reported_pages {
            if reported != result.total_pages {
                warn!(
                    %entity,
                    reported,
                    computed = result.total_pages,
                    total_items = result.total_items,
                    "backend totalPages disagrees with totalItems/limit; using computed value"
                );
            }
        }

        debug!(
            %entity,
            rows = result.rows.len(),
            total_items = result.total_items,
            total_pages = result.total_pages,
            "listing fetched"
        );
        Ok(result)
    }
}
