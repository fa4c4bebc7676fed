//! Fail-soft data access for pages
//!
//! [`Library`] is the boundary between the upstream catalog and everything
//! that renders. Each method fetches, normalizes, and on any error logs the
//! failure and returns an empty list or `None`. Nothing here ever returns an
//! error, so a page can always be assembled.

use crate::http_client::ApiError;
use crate::mapper::{
    map_episode_records_to_episodes, map_record_to_drama, map_record_to_drama_detail,
    map_records_to_dramas, placeholder_episodes,
};
use crate::model::{Drama, DramaDetail, Episode, SearchParams};
use crate::upstream::Catalog;
use tracing::{debug, error};

/// Normalized, fail-soft view of a [`Catalog`].
#[derive(Debug, Clone)]
pub struct Library<C> {
    catalog: C,
}

impl<C> Library<C>
where
    C: Catalog,
{
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub async fn trending(&self) -> Vec<Drama> {
        logged(self.catalog.trending().await, "trending dramas")
            .map(map_records_to_dramas)
            .unwrap_or_default()
    }

    pub async fn latest(&self, page: Option<u32>, limit: Option<u32>) -> Vec<Drama> {
        logged(self.catalog.latest(page, limit).await, "latest dramas")
            .map(map_records_to_dramas)
            .unwrap_or_default()
    }

    pub async fn for_you(&self) -> Vec<Drama> {
        logged(self.catalog.for_you().await, "for-you dramas")
            .map(map_records_to_dramas)
            .unwrap_or_default()
    }

    pub async fn detail(&self, id: &str) -> Option<DramaDetail> {
        logged(self.catalog.detail(id).await, "drama detail").map(map_record_to_drama_detail)
    }

    /// Episodes of a drama.
    ///
    /// When the upstream lists no episodes (or fails), placeholders are built
    /// from the episode count declared by the drama's detail record.
    pub async fn episodes(&self, drama_id: &str) -> Vec<Episode> {
        match self.catalog.all_episodes(drama_id).await {
            Ok(records) if !records.is_empty() => {
                return map_episode_records_to_episodes(records);
            }
            Ok(_) => debug!(drama_id, "upstream listed no episodes"),
            Err(e) => error!(drama_id, error = %e, "failed to fetch episodes"),
        }

        match self.detail(drama_id).await.and_then(|d| d.drama.total_episodes) {
            Some(total) if total > 0 => {
                debug!(drama_id, total, "synthesizing placeholder episodes");
                placeholder_episodes(drama_id, total)
            }
            _ => Vec::new(),
        }
    }

    /// A single episode of a drama, looked up by id.
    pub async fn episode(&self, drama_id: &str, episode_id: &str) -> Option<Episode> {
        self.episodes(drama_id)
            .await
            .into_iter()
            .find(|episode| episode.id == episode_id)
    }

    pub async fn search(&self, params: &SearchParams) -> Vec<Drama> {
        logged(self.catalog.search(params).await, "search results")
            .map(map_records_to_dramas)
            .unwrap_or_default()
    }

    /// Every drama of every VIP column, flattened.
    pub async fn vip(&self, page: Option<u32>) -> Vec<Drama> {
        logged(self.catalog.vip(page).await, "VIP dramas")
            .map(|vip| map_records_to_dramas(vip.into_books()))
            .unwrap_or_default()
    }

    pub async fn dubbed(&self, classify: Option<&str>, page: Option<u32>) -> Vec<Drama> {
        logged(self.catalog.dubbed(classify, page).await, "dubbed dramas")
            .map(map_records_to_dramas)
            .unwrap_or_default()
    }

    pub async fn random(&self) -> Option<Drama> {
        logged(self.catalog.random_drama().await, "random drama").map(map_record_to_drama)
    }

    pub async fn popular_searches(&self) -> Vec<String> {
        logged(self.catalog.popular_searches().await, "popular searches").unwrap_or_default()
    }
}

fn logged<T>(result: Result<T, ApiError>, what: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            error!(error = %e, status = ?e.status(), "failed to fetch {what}");
            None
        }
    }
}
