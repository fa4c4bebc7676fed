/// DramaBox catalog implementation.
use super::types::{UpstreamDrama, UpstreamEpisode, VipPage, decode_each};
use super::Catalog;
use crate::config::{ApiConfig, Endpoint};
use crate::http_client::{ApiClient, ApiError, QueryParams};
use crate::model::SearchParams;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Catalog backed by the DramaBox REST API.
///
/// A thin typed pass-through: each method sends the endpoint's query
/// parameters and decodes the payload, nothing more.
#[derive(Debug, Clone)]
pub struct DramaBoxService {
    client: ApiClient,
}

impl DramaBoxService {
    /// Creates a service for the given API configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        Ok(Self::with_client(ApiClient::new(config)?))
    }

    pub fn with_client(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Fetches a list payload, decoding each record on its own so one
    /// malformed record does not take the rest of the list with it.
    async fn list<T>(&self, endpoint: Endpoint, params: &QueryParams) -> Result<Vec<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let items: Vec<Value> = self.client.get(endpoint, params).await?;
        Ok(decode_each(items))
    }
}

#[async_trait]
impl Catalog for DramaBoxService {
    async fn vip(&self, page: Option<u32>) -> Result<VipPage, ApiError> {
        let params = QueryParams::new().with_opt("page", page);
        self.client.get(Endpoint::Vip, &params).await
    }

    async fn dubbed(
        &self,
        classify: Option<&str>,
        page: Option<u32>,
    ) -> Result<Vec<UpstreamDrama>, ApiError> {
        let params = QueryParams::new()
            .with_opt("classify", classify)
            .with_opt("page", page);
        self.list(Endpoint::Dubbed, &params).await
    }

    async fn random_drama(&self) -> Result<UpstreamDrama, ApiError> {
        self.client
            .get(Endpoint::RandomDrama, &QueryParams::new())
            .await
    }

    async fn for_you(&self) -> Result<Vec<UpstreamDrama>, ApiError> {
        self.list(Endpoint::ForYou, &QueryParams::new()).await
    }

    async fn latest(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<UpstreamDrama>, ApiError> {
        let params = QueryParams::new()
            .with_opt("page", page)
            .with_opt("limit", limit);
        self.list(Endpoint::Latest, &params).await
    }

    async fn trending(&self) -> Result<Vec<UpstreamDrama>, ApiError> {
        self.list(Endpoint::Trending, &QueryParams::new()).await
    }

    async fn popular_searches(&self) -> Result<Vec<String>, ApiError> {
        self.list(Endpoint::PopularSearch, &QueryParams::new())
            .await
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<UpstreamDrama>, ApiError> {
        debug!(query = %params.query, page = ?params.page, "searching catalog");
        let query = QueryParams::new()
            .with("query", &params.query)
            .with_opt("page", params.page)
            .with_opt("limit", params.limit);
        self.list(Endpoint::Search, &query).await
    }

    async fn detail(&self, id: &str) -> Result<UpstreamDrama, ApiError> {
        let params = QueryParams::new().with("bookId", id);
        self.client.get(Endpoint::Detail, &params).await
    }

    async fn all_episodes(&self, id: &str) -> Result<Vec<UpstreamEpisode>, ApiError> {
        let params = QueryParams::new().with("bookId", id);
        self.list(Endpoint::AllEpisodes, &params).await
    }
}
