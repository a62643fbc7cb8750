use serde::Deserialize;

use crate::{
    error::{Result, TitlesmithError},
    format::{format_count, format_publish_date},
    reference::{self, ChannelQuery},
    types::{Channel, ChannelFetch, Video},
};

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// How many recent videos a channel fetch returns at most.
const RECENT_VIDEOS_LIMIT: &str = "10";

/// Common Data API response envelope. The API reports failures as an
/// `error` payload in the body, sometimes alongside a 200 status, so the
/// envelope is checked before the items are touched.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    error: Option<ApiError>,
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

impl<T> ApiEnvelope<T> {
    fn into_items(self) -> Result<Vec<T>> {
        if let Some(error) = self.error {
            return Err(TitlesmithError::Upstream {
                message: error.message,
            });
        }
        Ok(self.items)
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    #[serde(default)]
    snippet: Snippet,
}

#[derive(Debug, Default, Deserialize)]
struct SearchItemId {
    #[serde(rename = "channelId")]
    channel_id: Option<String>,
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(rename = "publishedAt", default)]
    published_at: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    medium: Option<Thumbnail>,
    #[serde(rename = "default")]
    fallback: Option<Thumbnail>,
}

impl Thumbnails {
    fn into_url(self) -> String {
        self.medium
            .or(self.fallback)
            .map(|t| t.url)
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    id: String,
    #[serde(default)]
    snippet: Snippet,
    #[serde(default)]
    statistics: ChannelStatistics,
}

#[derive(Debug, Default, Deserialize)]
struct ChannelStatistics {
    #[serde(rename = "subscriberCount", default)]
    subscriber_count: String,
    #[serde(rename = "videoCount", default)]
    video_count: String,
}

#[derive(Debug, Default, Deserialize)]
struct VideoStatsItem {
    #[serde(default)]
    statistics: VideoStatistics,
}

#[derive(Debug, Default, Deserialize)]
struct VideoStatistics {
    #[serde(rename = "viewCount", default)]
    view_count: String,
}

/// Resolve a channel reference to channel metadata plus its most recent
/// videos with view counts.
///
/// All-or-nothing: a failure at any step aborts the whole resolution and
/// surfaces that step's message.
pub async fn resolve_channel(
    client: &reqwest::Client,
    reference: &str,
    api_key: &str,
) -> Result<ChannelFetch> {
    let channel_id = match reference::parse(reference) {
        ChannelQuery::Id(id) => id,
        ChannelQuery::Search(text) => search_channel_id(client, &text, api_key).await?,
    };

    let channel = fetch_channel(client, &channel_id, api_key).await?;
    let items = fetch_recent_videos(client, &channel_id, api_key).await?;

    let videos = if items.is_empty() {
        Vec::new()
    } else {
        let ids: Vec<&str> = items
            .iter()
            .filter_map(|item| item.id.video_id.as_deref())
            .collect();
        let stats = fetch_video_stats(client, &ids, api_key).await?;
        merge_view_counts(items, stats)
    };

    tracing::debug!(channel = %channel.title, videos = videos.len(), "channel resolved");
    Ok(ChannelFetch { channel, videos })
}

/// Find a channel ID by handle or free-text search; the first hit wins.
async fn search_channel_id(client: &reqwest::Client, query: &str, api_key: &str) -> Result<String> {
    tracing::debug!(query, "searching for channel");
    let envelope: ApiEnvelope<SearchItem> = client
        .get(format!("{API_BASE}/search"))
        .query(&[
            ("part", "snippet"),
            ("q", query),
            ("type", "channel"),
            ("key", api_key),
        ])
        .send()
        .await?
        .json()
        .await?;

    envelope
        .into_items()?
        .into_iter()
        .next()
        .and_then(|item| item.id.channel_id)
        .ok_or_else(|| TitlesmithError::NotFound {
            what: "Channel".to_string(),
        })
}

/// Fetch channel snippet and statistics in one call.
async fn fetch_channel(
    client: &reqwest::Client,
    channel_id: &str,
    api_key: &str,
) -> Result<Channel> {
    let envelope: ApiEnvelope<ChannelItem> = client
        .get(format!("{API_BASE}/channels"))
        .query(&[
            ("part", "snippet,statistics"),
            ("id", channel_id),
            ("key", api_key),
        ])
        .send()
        .await?
        .json()
        .await?;

    let item = envelope
        .into_items()?
        .into_iter()
        .next()
        .ok_or_else(|| TitlesmithError::NotFound {
            what: "Channel".to_string(),
        })?;

    Ok(Channel {
        id: item.id,
        title: item.snippet.title,
        thumbnail_url: item.snippet.thumbnails.into_url(),
        subscriber_count: format_count(&item.statistics.subscriber_count),
        video_count: format_count(&item.statistics.video_count),
    })
}

/// Fetch the channel's most recent videos, newest first.
async fn fetch_recent_videos(
    client: &reqwest::Client,
    channel_id: &str,
    api_key: &str,
) -> Result<Vec<SearchItem>> {
    let envelope: ApiEnvelope<SearchItem> = client
        .get(format!("{API_BASE}/search"))
        .query(&[
            ("part", "snippet"),
            ("channelId", channel_id),
            ("order", "date"),
            ("type", "video"),
            ("maxResults", RECENT_VIDEOS_LIMIT),
            ("key", api_key),
        ])
        .send()
        .await?
        .json()
        .await?;

    envelope.into_items()
}

/// Fetch view-count statistics for all videos in one comma-joined request.
async fn fetch_video_stats(
    client: &reqwest::Client,
    video_ids: &[&str],
    api_key: &str,
) -> Result<Vec<VideoStatsItem>> {
    let joined = video_ids.join(",");
    let envelope: ApiEnvelope<VideoStatsItem> = client
        .get(format!("{API_BASE}/videos"))
        .query(&[
            ("part", "statistics"),
            ("id", joined.as_str()),
            ("key", api_key),
        ])
        .send()
        .await?
        .json()
        .await?;

    envelope.into_items()
}

/// Zip search results with their statistics by position. A video with no
/// matching statistics entry falls back to a "0" view count.
fn merge_view_counts(items: Vec<SearchItem>, stats: Vec<VideoStatsItem>) -> Vec<Video> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let raw_views = stats
                .get(index)
                .map(|s| s.statistics.view_count.as_str())
                .filter(|v| !v.is_empty())
                .unwrap_or("0");
            Video {
                id: item.id.video_id.unwrap_or_default(),
                title: item.snippet.title,
                thumbnail_url: item.snippet.thumbnails.into_url(),
                published_at: format_publish_date(&item.snippet.published_at),
                view_count: format_count(raw_views),
                enhanced_title: None,
                reason: None,
                is_enhancing: false,
            }
        })
        .collect()
}
