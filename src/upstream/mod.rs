//! Access to the upstream drama catalog.
//!
//! The [`Catalog`] trait describes everything the upstream API offers. The
//! production implementation is [`DramaBoxService`]; tests substitute their
//! own implementations.
mod dramabox;
mod types;

pub use dramabox::DramaBoxService;
pub use types::{
    CdnEntry, TagV3, UpstreamDrama, UpstreamEpisode, VideoPath, VipColumn, VipPage,
};

use crate::http_client::ApiError;
use crate::model::SearchParams;
use async_trait::async_trait;

/// Trait for sources of raw catalog data.
///
/// Every method maps to one upstream endpoint and returns its payload
/// unchanged. Optional arguments are left out of the request when `None`.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// VIP home-screen columns.
    async fn vip(&self, page: Option<u32>) -> Result<VipPage, ApiError>;

    /// Indonesian-dub listing for a classification ("terbaru", ...).
    async fn dubbed(
        &self,
        classify: Option<&str>,
        page: Option<u32>,
    ) -> Result<Vec<UpstreamDrama>, ApiError>;

    /// A single randomly picked drama.
    async fn random_drama(&self) -> Result<UpstreamDrama, ApiError>;

    /// Personalized recommendations.
    async fn for_you(&self) -> Result<Vec<UpstreamDrama>, ApiError>;

    async fn latest(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<UpstreamDrama>, ApiError>;

    async fn trending(&self) -> Result<Vec<UpstreamDrama>, ApiError>;

    /// Currently popular search terms.
    async fn popular_searches(&self) -> Result<Vec<String>, ApiError>;

    async fn search(&self, params: &SearchParams) -> Result<Vec<UpstreamDrama>, ApiError>;

    /// Full record of one drama.
    async fn detail(&self, id: &str) -> Result<UpstreamDrama, ApiError>;

    /// Every chapter of one drama, with video URLs.
    async fn all_episodes(&self, id: &str) -> Result<Vec<UpstreamEpisode>, ApiError>;
}
