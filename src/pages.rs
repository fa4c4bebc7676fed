//! Page view models
//!
//! Each page gathers everything one screen of the browser needs from the
//! [`Library`]. Independent lookups run concurrently. A page that cannot be
//! shown is `None`; empty lists are a normal "nothing to show" state.

use crate::library::Library;
use crate::model::{Drama, DramaDetail, Episode, SearchParams};
use crate::pagination::DEFAULT_CLASSIFY;
use crate::upstream::Catalog;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::str::FromStr;

const HOME_TRENDING: usize = 6;
const HOME_CONTINUE_END: usize = 10;
const RANDOM_PICKS: usize = 10;
const LATEST_PAGE_SIZE: u32 = 20;

/// Landing page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    pub featured: Option<Drama>,
    pub trending: Vec<Drama>,
    pub continue_watching: Vec<Drama>,
    pub recommended: Vec<Drama>,
    /// Classification the recommended list continues with
    pub classify: String,
}

/// Browsing categories reachable from the navigation menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Vip,
    Dubindo,
    Random,
    Foryou,
    Latest,
    Trending,
    PopularSearch,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Vip,
        Category::Dubindo,
        Category::Random,
        Category::Foryou,
        Category::Latest,
        Category::Trending,
        Category::PopularSearch,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Category::Vip => "vip",
            Category::Dubindo => "dubindo",
            Category::Random => "random",
            Category::Foryou => "foryou",
            Category::Latest => "latest",
            Category::Trending => "trending",
            Category::PopularSearch => "popular-search",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::Vip => "VIP",
            Category::Dubindo => "Dubindo",
            Category::Random => "Random Drama",
            Category::Foryou => "For You",
            Category::Latest => "Terbaru",
            Category::Trending => "Trending",
            Category::PopularSearch => "Pencarian Populer",
        }
    }

    /// Whether further pages can be requested.
    pub fn paginated(self) -> bool {
        matches!(self, Category::Vip | Category::Dubindo | Category::Latest)
    }

    /// Classification passed to the dubbed listing, for categories built on it.
    pub fn classify(self) -> Option<&'static str> {
        match self {
            Category::Dubindo => Some(DEFAULT_CLASSIFY),
            _ => None,
        }
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(slug: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.slug() == slug)
            .ok_or_else(|| UnknownCategory(slug.to_string()))
    }
}

/// Error for a category slug that is not in the menu.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// One page of a category listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPage {
    pub category: Category,
    pub title: &'static str,
    pub page: u32,
    pub paginated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classify: Option<&'static str>,
    pub dramas: Vec<Drama>,
}

/// Drama detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailPage {
    pub drama: DramaDetail,
    pub episodes: Vec<Episode>,
}

/// Episode player page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodePage {
    pub drama: DramaDetail,
    pub episode: Episode,
    pub previous: Option<Episode>,
    pub next: Option<Episode>,
    pub episodes: Vec<Episode>,
}

/// Search results; an empty query shows popular search terms instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub query: String,
    pub results: Vec<Drama>,
    pub popular: Vec<String>,
}

impl<C> Library<C>
where
    C: Catalog,
{
    pub async fn home_page(&self) -> HomePage {
        let dramas = self.dubbed(Some(DEFAULT_CLASSIFY), Some(1)).await;

        HomePage {
            featured: dramas.first().cloned(),
            trending: dramas.iter().take(HOME_TRENDING).cloned().collect(),
            continue_watching: dramas
                .iter()
                .skip(HOME_TRENDING)
                .take(HOME_CONTINUE_END - HOME_TRENDING)
                .cloned()
                .collect(),
            recommended: dramas,
            classify: DEFAULT_CLASSIFY.to_string(),
        }
    }

    /// A category listing; `page` only matters for paginated categories.
    pub async fn category_page(&self, category: Category, page: u32) -> CategoryPage {
        let page = page.max(1);

        let dramas = match category {
            Category::Vip => self.vip(Some(page)).await,
            Category::Dubindo => self.dubbed(category.classify(), Some(page)).await,
            Category::Random => {
                let mut dramas = self.dubbed(Some(DEFAULT_CLASSIFY), Some(1)).await;
                dramas.shuffle(&mut rand::rng());
                dramas.truncate(RANDOM_PICKS);
                dramas
            }
            Category::Foryou => self.for_you().await,
            Category::Latest => self.latest(Some(page), Some(LATEST_PAGE_SIZE)).await,
            // Popular search yields terms, not dramas
            Category::Trending | Category::PopularSearch => self.trending().await,
        };

        CategoryPage {
            category,
            title: category.title(),
            page: if category.paginated() { page } else { 1 },
            paginated: category.paginated(),
            classify: category.classify(),
            dramas,
        }
    }

    pub async fn detail_page(&self, id: &str) -> Option<DetailPage> {
        let (drama, episodes) = tokio::join!(self.detail(id), self.episodes(id));

        Some(DetailPage {
            drama: drama?,
            episodes,
        })
    }

    pub async fn episode_page(&self, id: &str, episode_id: &str) -> Option<EpisodePage> {
        let (drama, episodes) = tokio::join!(self.detail(id), self.episodes(id));
        let drama = drama?;

        let position = episodes.iter().position(|e| e.id == episode_id)?;
        let episode = episodes[position].clone();
        let previous = position
            .checked_sub(1)
            .and_then(|i| episodes.get(i))
            .cloned();
        let next = episodes.get(position + 1).cloned();

        Some(EpisodePage {
            drama,
            episode,
            previous,
            next,
            episodes,
        })
    }

    pub async fn search_page(&self, query: &str) -> SearchPage {
        let query = query.trim();
        if query.is_empty() {
            return SearchPage {
                popular: self.popular_searches().await,
                ..SearchPage::default()
            };
        }

        SearchPage {
            query: query.to_string(),
            results: self.search(&SearchParams::new(query)).await,
            popular: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::tests::{FakeCatalog, listing};
    use serde_json::json;

    #[test]
    fn test_category_slugs_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.slug().parse::<Category>(), Ok(category));
        }
        assert_eq!(
            "anime".parse::<Category>(),
            Err(UnknownCategory("anime".to_string()))
        );
    }

    #[tokio::test]
    async fn test_home_page_sections() {
        let library = Library::new(FakeCatalog {
            listing: Some(listing(12)),
            ..FakeCatalog::default()
        });
        let home = library.home_page().await;

        assert_eq!(home.featured.unwrap().id, "b0");
        assert_eq!(home.trending.len(), 6);
        let continuing: Vec<&str> = home.continue_watching.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(continuing, vec!["b6", "b7", "b8", "b9"]);
        assert_eq!(home.recommended.len(), 12);
        assert_eq!(
            library.catalog().calls(),
            vec!["dubbed Some(\"terbaru\") Some(1)"]
        );
    }

    #[tokio::test]
    async fn test_home_page_degrades_to_empty() {
        let library = Library::new(FakeCatalog::default());
        let home = library.home_page().await;
        assert!(home.featured.is_none());
        assert!(home.recommended.is_empty());
    }

    #[tokio::test]
    async fn test_random_category_picks_ten() {
        let library = Library::new(FakeCatalog {
            listing: Some(listing(25)),
            ..FakeCatalog::default()
        });
        let page = library.category_page(Category::Random, 3).await;
        assert_eq!(page.dramas.len(), 10);
        assert_eq!(page.page, 1);
        assert!(!page.paginated);
    }

    #[tokio::test]
    async fn test_latest_category_requests_page_size() {
        let library = Library::new(FakeCatalog {
            listing: Some(listing(2)),
            ..FakeCatalog::default()
        });
        let page = library.category_page(Category::Latest, 2).await;
        assert_eq!(page.page, 2);
        assert_eq!(library.catalog().calls(), vec!["latest Some(2) Some(20)"]);
    }

    #[tokio::test]
    async fn test_episode_page_neighbours() {
        let library = Library::new(FakeCatalog {
            detail: Some(json!({"bookId": "d", "bookName": "Drama", "chapterCount": 3})),
            episodes: Some(json!([
                {"chapterId": "e1", "chapterIndex": 0},
                {"chapterId": "e2", "chapterIndex": 1},
                {"chapterId": "e3", "chapterIndex": 2}
            ])),
            ..FakeCatalog::default()
        });

        let page = library.episode_page("d", "e2").await.unwrap();
        assert_eq!(page.episode.number, 2);
        assert_eq!(page.previous.unwrap().id, "e1");
        assert_eq!(page.next.unwrap().id, "e3");

        let first = library.episode_page("d", "e1").await.unwrap();
        assert!(first.previous.is_none());

        assert!(library.episode_page("d", "missing").await.is_none());
    }

    #[tokio::test]
    async fn test_episode_page_fetches_each_resource_once() {
        let library = Library::new(FakeCatalog {
            detail: Some(json!({"bookId": "d", "chapterCount": 2})),
            episodes: Some(json!([
                {"chapterId": "e1", "chapterIndex": 0},
                {"chapterId": "e2", "chapterIndex": 1}
            ])),
            ..FakeCatalog::default()
        });

        let page = library.episode_page("d", "e2").await.unwrap();
        assert_eq!(page.episode.id, "e2");
        assert_eq!(page.episodes.len(), 2);

        let mut calls = library.catalog().calls();
        calls.sort();
        assert_eq!(calls, vec!["detail d", "episodes d"]);
    }

    #[tokio::test]
    async fn test_detail_page_requires_detail() {
        let library = Library::new(FakeCatalog {
            episodes: Some(json!([{"chapterId": "e1"}])),
            ..FakeCatalog::default()
        });
        assert!(library.detail_page("d").await.is_none());
    }

    #[tokio::test]
    async fn test_empty_search_shows_popular_terms() {
        let library = Library::new(FakeCatalog {
            popular: Some(vec!["ceo".to_string(), "revenge".to_string()]),
            ..FakeCatalog::default()
        });
        let page = library.search_page("   ").await;
        assert!(page.results.is_empty());
        assert_eq!(page.popular, vec!["ceo", "revenge"]);
    }
}
