use serde::{Deserialize, Serialize};

/// Channel metadata as shown to the user. Counts are pre-formatted display
/// strings, not raw integers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub subscriber_count: String,
    pub video_count: String,
}

/// One recent video of the current channel. `enhanced_title` and `reason`
/// are filled in together once its enhancement completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub published_at: String,
    pub view_count: String,
    pub enhanced_title: Option<String>,
    pub reason: Option<String>,
    #[serde(default)]
    pub is_enhancing: bool,
}

impl Video {
    pub fn is_enhanced(&self) -> bool {
        self.enhanced_title.is_some()
    }
}

/// Parsed model output for one title rewrite. The model occasionally drops
/// a field, so both default to empty rather than failing the parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enhancement {
    #[serde(rename = "enhancedTitle", default)]
    pub enhanced_title: String,
    #[serde(default)]
    pub reason: String,
}

/// Result of a successful channel resolution.
#[derive(Debug, Clone)]
pub struct ChannelFetch {
    pub channel: Channel,
    pub videos: Vec<Video>,
}
