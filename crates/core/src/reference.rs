use std::sync::LazyLock;

use regex::Regex;

// URL extractors in priority order; the first capture wins.
static URL_EXTRACTORS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        Regex::new(r"youtube\.com/channel/([a-zA-Z0-9_-]+)").unwrap(),
        Regex::new(r"youtube\.com/@([a-zA-Z0-9_-]+)").unwrap(),
        Regex::new(r"youtube\.com/c/([a-zA-Z0-9_-]+)").unwrap(),
        Regex::new(r"youtube\.com/user/([a-zA-Z0-9_-]+)").unwrap(),
    ]
});

static CHANNEL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^UC[a-zA-Z0-9_-]{22}$").unwrap());

/// How a normalized reference gets resolved against the Data API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelQuery {
    /// Literal `UC…` channel ID, looked up directly.
    Id(String),
    /// Handle or free-text, resolved through channel search.
    Search(String),
}

/// Pull the working identifier out of a user-supplied channel reference.
///
/// Recognizes the four channel URL shapes (`/channel/<id>`, `/@handle`,
/// `/c/<name>`, `/user/<name>`); anything else passes through trimmed, so a
/// bare `@handle`, a raw channel ID, or a channel name all survive as-is.
pub fn extract_identifier(reference: &str) -> String {
    for pattern in URL_EXTRACTORS.iter() {
        if let Some(caps) = pattern.captures(reference) {
            return caps[1].to_string();
        }
    }
    reference.trim().to_string()
}

/// Decide whether an identifier is already a channel ID or needs a search.
pub fn classify(identifier: &str) -> ChannelQuery {
    if CHANNEL_ID.is_match(identifier) {
        ChannelQuery::Id(identifier.to_string())
    } else {
        ChannelQuery::Search(identifier.to_string())
    }
}

/// Normalize a raw channel reference in one step.
pub fn parse(reference: &str) -> ChannelQuery {
    classify(&extract_identifier(reference))
}
