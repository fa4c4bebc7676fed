//! Normalized catalog records
//!
//! These are the stable shapes the rest of the application works with,
//! independent of the upstream field names. Upstream fields that are neither
//! normalized nor known are kept in a separate [`Extra`] map, never mixed into
//! the typed fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Side-map of upstream fields without a typed counterpart.
pub type Extra = Map<String, Value>;

/// Corner badge shown on a drama cover ("New", "Hot", ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Corner {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_type: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A drama in the application's own schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drama {
    /// Upstream book identifier
    pub id: String,
    /// Trimmed display title
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default)]
    pub genre: Vec<String>,
    /// Play count exactly as the upstream formats it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_episodes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protagonist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner: Option<Corner>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Drama {
    /// Field names owned by the normalized schema.
    pub(crate) const FIELDS: &'static [&'static str] = &[
        "id",
        "title",
        "description",
        "thumbnail",
        "poster",
        "genre",
        "views",
        "totalEpisodes",
        "author",
        "protagonist",
        "corner",
    ];
}

/// A drama with the extra fields shown on its detail page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DramaDetail {
    #[serde(flatten)]
    pub drama: Drama,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shelf_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_shelf_time: Option<i64>,
}

impl DramaDetail {
    pub(crate) const FIELDS: &'static [&'static str] =
        &["longDescription", "shelfTime", "bookShelfTime"];
}

/// One quality variant of an episode video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoUrl {
    /// Vertical resolution, e.g. 720
    pub quality: u32,
    pub url: String,
    /// Requires a paid entitlement upstream
    pub is_vip: bool,
}

/// An episode in the application's own schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: String,
    /// 1-based episode number
    pub number: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// URL played by default, if any variant exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default)]
    pub video_urls: Vec<VideoUrl>,
    /// Whether the episode is paywalled, when the upstream says so
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_charge: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_type: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub need_interstitial_ad: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewing_duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite_snapshot_url: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Episode {
    pub(crate) const FIELDS: &'static [&'static str] = &[
        "id",
        "number",
        "title",
        "thumbnail",
        "videoUrl",
        "videoUrls",
        "isCharge",
        "chargeChapter",
        "chapterType",
        "needInterstitialAd",
        "viewingDuration",
        "spriteSnapshotUrl",
    ];

    /// Placeholder for an episode the upstream did not list.
    pub fn placeholder(drama_id: &str, number: u32) -> Self {
        Self {
            id: format!("{drama_id}-ep-{number}"),
            number,
            title: format!("Episode {number}"),
            ..Self::default()
        }
    }

    /// Whether the episode has anything to play.
    pub fn is_playable(&self) -> bool {
        self.video_url.is_some()
    }
}

/// Search request parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    pub query: String,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}
