/// DramaBox API response types for deserialization.
///
/// These structures mirror the JSON returned by the upstream catalog. Field
/// sets differ between endpoints, so almost everything is optional and
/// scalar fields accept either strings or numbers. A field whose value has
/// an unexpected shape decodes as absent instead of failing the record, and
/// list items that do not decode are skipped.
use crate::model::{Corner, Extra};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

/// A drama as returned by listing, search and detail endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamDrama {
    #[serde(default, deserialize_with = "string_or_number")]
    pub book_id: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub book_name: Option<String>,
    /// Cover used by listing endpoints
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub cover_wap: Option<String>,
    /// Cover used by search results
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub cover: Option<String>,
    #[serde(default, deserialize_with = "opt_integer")]
    pub chapter_count: Option<u32>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub introduction: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub tags: Option<Vec<String>>,
    /// Tag list used by search results
    #[serde(default, deserialize_with = "lenient_list")]
    pub tag_names: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub tag_v3s: Option<Vec<TagV3>>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub play_count: Option<String>,
    #[serde(default, deserialize_with = "opt_integer")]
    pub book_shelf_time: Option<i64>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub shelf_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub corner: Option<Corner>,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub protagonist: Option<String>,
    /// Everything the typed fields above do not cover
    #[serde(flatten)]
    pub extra: Extra,
}

/// Structured tag attached to some drama records.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagV3 {
    #[serde(default, deserialize_with = "opt_integer")]
    pub tag_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub tag_name: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub tag_en_name: Option<String>,
}

/// A single chapter (episode) from the all-episodes endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamEpisode {
    #[serde(default, deserialize_with = "string_or_number")]
    pub chapter_id: String,
    /// Zero-based position of the chapter
    #[serde(default, deserialize_with = "opt_integer")]
    pub chapter_index: Option<u32>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub chapter_name: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub chapter_img: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub cdn_list: Option<Vec<CdnEntry>>,
    #[serde(default, deserialize_with = "opt_integer")]
    pub chapter_type: Option<i64>,
    /// Paywall flag, 1 for paid chapters
    #[serde(default, deserialize_with = "opt_integer")]
    pub is_charge: Option<i64>,
    /// Alternate paywall flag used by some responses
    #[serde(default, deserialize_with = "opt_flag")]
    pub charge_chapter: Option<bool>,
    #[serde(default, deserialize_with = "opt_integer")]
    pub need_interstitial_ad: Option<i64>,
    #[serde(default, deserialize_with = "opt_integer")]
    pub viewing_duration: Option<i64>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub sprite_snapshot_url: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Video URLs grouped by delivery domain.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdnEntry {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub cdn_domain: Option<String>,
    #[serde(default, deserialize_with = "opt_integer")]
    pub is_default: Option<i64>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub video_path_list: Option<Vec<VideoPath>>,
}

/// One quality variant of a chapter video.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoPath {
    #[serde(default, deserialize_with = "opt_integer")]
    pub quality: Option<u32>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub video_path: Option<String>,
    #[serde(default, deserialize_with = "opt_integer")]
    pub is_default: Option<i64>,
    #[serde(default, deserialize_with = "opt_integer")]
    pub is_entry: Option<i64>,
    /// 1 when the variant requires a VIP entitlement
    #[serde(default, deserialize_with = "opt_integer")]
    pub is_vip_equity: Option<i64>,
}

/// The VIP endpoint's home-screen layout.
///
/// Only the columns are used; banners and recommendation blocks are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VipPage {
    #[serde(default, deserialize_with = "lenient_list")]
    pub column_vo_list: Option<Vec<VipColumn>>,
}

impl VipPage {
    /// All books of all columns, in column order.
    pub fn into_books(self) -> Vec<UpstreamDrama> {
        self.column_vo_list
            .unwrap_or_default()
            .into_iter()
            .flat_map(|column| column.book_list.unwrap_or_default())
            .collect()
    }
}

/// A titled row of dramas on the VIP page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VipColumn {
    #[serde(default, deserialize_with = "opt_integer")]
    pub column_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub sub_title: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub style: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub book_list: Option<Vec<UpstreamDrama>>,
    #[serde(rename = "type", default, deserialize_with = "opt_integer")]
    pub column_type: Option<i64>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_string_or_number(deserializer)?.unwrap_or_default())
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Ok(None),
    }
}

/// Flags sent as booleans, 0/1 or their string forms.
fn opt_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::Number(n)) => n.as_f64().map(|n| n != 0.0),
        Some(Value::String(s)) => match s.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// Any value of the expected shape, else `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(value) => serde_json::from_value(value).ok(),
    })
}

/// A list whose undecodable items are dropped; non-lists are `None`.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Some(decode_each(items)),
        _ => None,
    })
}

/// Decodes every item on its own, skipping the ones that do not fit `T`.
pub(crate) fn decode_each<T>(items: Vec<Value>) -> Vec<T>
where
    T: DeserializeOwned,
{
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                debug!(error = %e, "skipping undecodable upstream item");
                None
            }
        })
        .collect()
}

/// Integers that may arrive as numbers, numeric strings or booleans.
fn opt_integer<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let raw = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(Value::Bool(b)) => Some(i64::from(b)),
        Some(_) => None,
    };

    Ok(raw.and_then(|value| T::try_from(value).ok()))
}
