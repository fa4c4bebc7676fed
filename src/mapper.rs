//! Conversion of raw upstream records into normalized records.
//!
//! All functions here are total: any upstream record, however sparse,
//! produces a normalized record.

use crate::model::{Drama, DramaDetail, Episode, Extra, VideoUrl};
use crate::upstream::{UpstreamDrama, UpstreamEpisode, VideoPath};

/// Quality preferred for default playback.
const PREFERRED_QUALITY: u32 = 720;

/// Converts an upstream drama into a [`Drama`].
pub fn map_record_to_drama(record: UpstreamDrama) -> Drama {
    let cover = non_empty(record.cover_wap).or(non_empty(record.cover));

    let genre = record
        .tags
        .or(record.tag_names)
        .or_else(|| {
            record
                .tag_v3s
                .map(|tags| tags.into_iter().filter_map(|tag| tag.tag_name).collect())
        })
        .unwrap_or_default();

    Drama {
        id: record.book_id,
        title: record
            .book_name
            .map(|name| name.trim().to_string())
            .unwrap_or_default(),
        description: record.introduction,
        thumbnail: cover.clone(),
        poster: cover,
        genre,
        views: record.play_count,
        total_episodes: record.chapter_count,
        author: record.author,
        protagonist: record.protagonist,
        corner: record.corner,
        extra: without_fields(record.extra, Drama::FIELDS),
    }
}

/// Converts an upstream drama into a [`DramaDetail`].
pub fn map_record_to_drama_detail(record: UpstreamDrama) -> DramaDetail {
    let long_description = record.introduction.clone();
    let shelf_time = record.shelf_time.clone();
    let book_shelf_time = record.book_shelf_time;

    let mut drama = map_record_to_drama(record);
    drama.extra = without_fields(drama.extra, DramaDetail::FIELDS);

    DramaDetail {
        drama,
        long_description,
        shelf_time,
        book_shelf_time,
    }
}

pub fn map_records_to_dramas(records: Vec<UpstreamDrama>) -> Vec<Drama> {
    records.into_iter().map(map_record_to_drama).collect()
}

/// Converts an upstream chapter into an [`Episode`].
///
/// `index` is the chapter's position in its list and is only used when
/// neither the chapter index nor the chapter name yields a number.
pub fn map_episode_record_to_episode(record: UpstreamEpisode, index: usize) -> Episode {
    let video_urls = video_urls(&record);
    let video_url = default_video(&video_urls).map(|video| video.url.clone());
    let number = episode_number(&record, index);

    let is_charge = if record.is_charge == Some(1) || record.charge_chapter == Some(true) {
        Some(true)
    } else if record.is_charge == Some(0) || record.charge_chapter == Some(false) {
        Some(false)
    } else {
        None
    };

    let title = match record.chapter_name {
        Some(name) if !name.is_empty() => name,
        _ => format!("Episode {number}"),
    };

    Episode {
        id: record.chapter_id,
        number,
        title,
        thumbnail: record.chapter_img,
        video_url,
        video_urls,
        is_charge,
        chapter_type: record.chapter_type,
        need_interstitial_ad: record.need_interstitial_ad,
        viewing_duration: record.viewing_duration,
        sprite_snapshot_url: record.sprite_snapshot_url,
        extra: without_fields(record.extra, Episode::FIELDS),
    }
}

pub fn map_episode_records_to_episodes(records: Vec<UpstreamEpisode>) -> Vec<Episode> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| map_episode_record_to_episode(record, index))
        .collect()
}

/// Placeholder episodes `1..=total` for dramas without an episode listing.
pub fn placeholder_episodes(drama_id: &str, total: u32) -> Vec<Episode> {
    (1..=total)
        .map(|number| Episode::placeholder(drama_id, number))
        .collect()
}

/// Quality variants of the default CDN, or of the first CDN if none is
/// flagged as default.
fn video_urls(record: &UpstreamEpisode) -> Vec<VideoUrl> {
    let Some(cdns) = record.cdn_list.as_deref() else {
        return Vec::new();
    };

    let cdn = cdns
        .iter()
        .find(|cdn| cdn.is_default == Some(1))
        .or_else(|| cdns.first());

    cdn.and_then(|cdn| cdn.video_path_list.as_deref())
        .unwrap_or_default()
        .iter()
        .filter_map(to_video_url)
        .collect()
}

/// `None` for variants without a usable path.
fn to_video_url(path: &VideoPath) -> Option<VideoUrl> {
    let url = path.video_path.as_deref().filter(|url| !url.is_empty())?;

    Some(VideoUrl {
        quality: path.quality.unwrap_or_default(),
        url: url.to_string(),
        is_vip: path.is_vip_equity == Some(1),
    })
}

/// Free 720p, else any free variant, else whatever comes first.
fn default_video(videos: &[VideoUrl]) -> Option<&VideoUrl> {
    videos
        .iter()
        .find(|video| video.quality == PREFERRED_QUALITY && !video.is_vip)
        .or_else(|| videos.iter().find(|video| !video.is_vip))
        .or_else(|| videos.first())
}

/// `chapterIndex + 1`, else the digits of the chapter name, else `index + 1`.
fn episode_number(record: &UpstreamEpisode, index: usize) -> u32 {
    if let Some(chapter_index) = record.chapter_index {
        return chapter_index.saturating_add(1);
    }

    let positional = u32::try_from(index).unwrap_or(u32::MAX - 1) + 1;

    record
        .chapter_name
        .as_deref()
        .map(|name| name.chars().filter(char::is_ascii_digit).collect::<String>())
        .and_then(|digits| digits.parse::<u32>().ok())
        .filter(|number| *number != 0)
        .unwrap_or(positional)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Drops keys that would shadow normalized fields.
fn without_fields(mut extra: Extra, fields: &[&str]) -> Extra {
    extra.retain(|key, _| !fields.contains(&key.as_str()));
    extra
}
