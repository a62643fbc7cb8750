use std::time::Duration;

use crate::{
    enhance::{Enhance, MISSING_TOKEN_MESSAGE},
    error::{Result, TitlesmithError},
    types::{Channel, Video},
    youtube,
};

/// Pause between consecutive batch enhancement requests, so the completion
/// provider is never hammered.
const BATCH_PAUSE: Duration = Duration::from_millis(500);

/// Everything one UI session holds: the two credentials, the current
/// channel with its videos, the current error message, and the
/// channel-fetch loading flag.
///
/// Credentials live in memory only; nothing here is persisted.
#[derive(Default)]
pub struct Session {
    pub youtube_api_key: String,
    pub completion_token: String,
    pub channel: Option<Channel>,
    pub videos: Vec<Video>,
    pub error: Option<String>,
    pub is_loading: bool,
    client: reqwest::Client,
}

impl Session {
    pub fn new(youtube_api_key: impl Into<String>, completion_token: impl Into<String>) -> Self {
        Self {
            youtube_api_key: youtube_api_key.into(),
            completion_token: completion_token.into(),
            ..Self::default()
        }
    }

    /// Record an error as the session's current message and hand it back.
    fn fail(&mut self, error: TitlesmithError) -> TitlesmithError {
        self.error = Some(error.to_string());
        error
    }

    /// Replace the video list with one element transformed. Updates to
    /// different videos stay independent; the last write to the same video
    /// wins.
    fn update_video(&mut self, id: &str, apply: impl Fn(&mut Video)) {
        self.videos = self
            .videos
            .iter()
            .map(|video| {
                let mut video = video.clone();
                if video.id == id {
                    apply(&mut video);
                }
                video
            })
            .collect();
    }

    /// Resolve a channel reference and load its recent videos into the
    /// session.
    ///
    /// All-or-nothing: any failure discards the partial channel/video state
    /// of this attempt and becomes the session's current error message.
    pub async fn fetch_channel(&mut self, reference: &str) -> Result<()> {
        if reference.trim().is_empty() {
            return Err(self.fail(TitlesmithError::missing_input(
                "Please enter a YouTube channel URL or ID",
            )));
        }
        if self.youtube_api_key.trim().is_empty() {
            return Err(self.fail(TitlesmithError::missing_input(
                "Please enter your YouTube API key",
            )));
        }

        self.is_loading = true;
        self.error = None;
        self.channel = None;
        self.videos.clear();

        let outcome = youtube::resolve_channel(&self.client, reference, &self.youtube_api_key).await;
        self.is_loading = false;

        match outcome {
            Ok(fetch) => {
                self.channel = Some(fetch.channel);
                self.videos = fetch.videos;
                Ok(())
            }
            Err(error) => Err(self.fail(error)),
        }
    }

    /// Enhance a single video's title.
    ///
    /// A failure is scoped to this video: its in-progress flag is cleared,
    /// the message becomes the session error, and everything else stays
    /// untouched.
    pub async fn enhance_video(&mut self, id: &str, enhancer: &dyn Enhance) -> Result<()> {
        if self.completion_token.trim().is_empty() {
            return Err(self.fail(TitlesmithError::missing_input(MISSING_TOKEN_MESSAGE)));
        }

        let Some(original_title) = self
            .videos
            .iter()
            .find(|video| video.id == id)
            .map(|video| video.title.clone())
        else {
            return Err(self.fail(TitlesmithError::NotFound {
                what: "Video".to_string(),
            }));
        };

        self.update_video(id, |video| video.is_enhancing = true);

        match enhancer.enhance(&original_title, &self.completion_token).await {
            Ok(enhancement) => {
                self.update_video(id, |video| {
                    video.enhanced_title = Some(enhancement.enhanced_title.clone());
                    video.reason = Some(enhancement.reason.clone());
                    video.is_enhancing = false;
                });
                Ok(())
            }
            Err(error) => {
                self.update_video(id, |video| video.is_enhancing = false);
                Err(self.fail(error))
            }
        }
    }

    /// Enhance every video that doesn't yet have a rewritten title.
    ///
    /// Deliberately sequential with a fixed pause between requests; a failed
    /// item records its message and the loop moves on to the next one.
    pub async fn enhance_all(&mut self, enhancer: &dyn Enhance) {
        let pending: Vec<String> = self
            .videos
            .iter()
            .filter(|video| !video.is_enhanced())
            .map(|video| video.id.clone())
            .collect();

        for id in pending {
            let _ = self.enhance_video(&id, enhancer).await;
            tokio::time::sleep(BATCH_PAUSE).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::time::Instant;

    use super::*;
    use crate::types::Enhancement;

    fn sample_video(id: &str, title: &str) -> Video {
        Video {
            id: id.to_string(),
            title: title.to_string(),
            thumbnail_url: String::new(),
            published_at: "2024-03-05".to_string(),
            view_count: "1.5K".to_string(),
            enhanced_title: None,
            reason: None,
            is_enhancing: false,
        }
    }

    fn session_with_videos(videos: Vec<Video>) -> Session {
        let mut session = Session::new("yt-key", "puter-token");
        session.videos = videos;
        session
    }

    /// Records every call with its start instant; fails for one configured
    /// title.
    struct ScriptedEnhancer {
        calls: Mutex<Vec<(String, Instant)>>,
        fail_on: Option<String>,
    }

    impl ScriptedEnhancer {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on: None,
            }
        }

        fn failing_on(title: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on: Some(title.to_string()),
            }
        }

        fn calls(&self) -> Vec<(String, Instant)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Enhance for ScriptedEnhancer {
        async fn enhance(&self, original_title: &str, _token: &str) -> Result<Enhancement> {
            self.calls
                .lock()
                .unwrap()
                .push((original_title.to_string(), Instant::now()));
            if self.fail_on.as_deref() == Some(original_title) {
                return Err(TitlesmithError::Upstream {
                    message: "model unavailable".to_string(),
                });
            }
            Ok(Enhancement {
                enhanced_title: format!("Better: {original_title}"),
                reason: "punchier".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn fetch_with_blank_reference_sets_error_and_keeps_state() {
        let mut session = Session::new("yt-key", "");
        let err = session.fetch_channel("   ").await.unwrap_err();
        assert!(matches!(err, TitlesmithError::MissingInput { .. }));
        assert_eq!(
            session.error.as_deref(),
            Some("Please enter a YouTube channel URL or ID")
        );
        assert!(!session.is_loading);
    }

    #[tokio::test]
    async fn fetch_with_blank_api_key_is_rejected_before_any_call() {
        let mut session = Session::new("  ", "");
        let err = session.fetch_channel("@Foo").await.unwrap_err();
        assert!(matches!(err, TitlesmithError::MissingInput { .. }));
        assert_eq!(
            session.error.as_deref(),
            Some("Please enter your YouTube API key")
        );
    }

    #[tokio::test]
    async fn enhance_updates_the_target_video_only() {
        let mut session =
            session_with_videos(vec![sample_video("a", "First"), sample_video("b", "Second")]);
        let enhancer = ScriptedEnhancer::new();

        session.enhance_video("b", &enhancer).await.unwrap();

        assert!(session.videos[0].enhanced_title.is_none());
        assert_eq!(
            session.videos[1].enhanced_title.as_deref(),
            Some("Better: Second")
        );
        assert_eq!(session.videos[1].reason.as_deref(), Some("punchier"));
        assert!(!session.videos[1].is_enhancing);
        assert!(session.error.is_none());
    }

    #[tokio::test]
    async fn enhance_failure_clears_flag_and_reports_globally() {
        let mut session =
            session_with_videos(vec![sample_video("a", "First"), sample_video("b", "Second")]);
        let enhancer = ScriptedEnhancer::failing_on("First");

        let err = session.enhance_video("a", &enhancer).await.unwrap_err();

        assert!(matches!(err, TitlesmithError::Upstream { .. }));
        assert_eq!(session.error.as_deref(), Some("model unavailable"));
        assert!(!session.videos[0].is_enhancing);
        assert!(session.videos[0].enhanced_title.is_none());
        // The other video is untouched.
        assert!(session.videos[1].enhanced_title.is_none());
    }

    #[tokio::test]
    async fn enhance_with_blank_token_never_calls_the_backend() {
        let mut session = session_with_videos(vec![sample_video("a", "First")]);
        session.completion_token = String::new();
        let enhancer = ScriptedEnhancer::new();

        let err = session.enhance_video("a", &enhancer).await.unwrap_err();

        assert!(matches!(err, TitlesmithError::MissingInput { .. }));
        assert!(enhancer.calls().is_empty());
        assert!(!session.videos[0].is_enhancing);
    }

    #[tokio::test]
    async fn enhance_unknown_video_reports_not_found() {
        let mut session = session_with_videos(vec![sample_video("a", "First")]);
        let enhancer = ScriptedEnhancer::new();

        let err = session.enhance_video("nope", &enhancer).await.unwrap_err();

        assert!(matches!(err, TitlesmithError::NotFound { .. }));
        assert!(enhancer.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn batch_runs_sequentially_with_a_pause_between_requests() {
        let mut session = session_with_videos(vec![
            sample_video("a", "First"),
            sample_video("b", "Second"),
            sample_video("c", "Third"),
        ]);
        let enhancer = ScriptedEnhancer::new();

        session.enhance_all(&enhancer).await;

        let calls = enhancer.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].0, "First");
        assert_eq!(calls[1].0, "Second");
        assert_eq!(calls[2].0, "Third");
        for pair in calls.windows(2) {
            assert!(pair[1].1 - pair[0].1 >= BATCH_PAUSE);
        }
        for video in &session.videos {
            assert!(!video.is_enhancing);
            assert!(video.enhanced_title.is_some());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn batch_skips_already_enhanced_videos() {
        let mut enhanced = sample_video("a", "First");
        enhanced.enhanced_title = Some("Already better".to_string());
        enhanced.reason = Some("done earlier".to_string());
        let mut session = session_with_videos(vec![enhanced, sample_video("b", "Second")]);
        let enhancer = ScriptedEnhancer::new();

        session.enhance_all(&enhancer).await;

        let calls = enhancer.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "Second");
        assert_eq!(
            session.videos[0].enhanced_title.as_deref(),
            Some("Already better")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn batch_continues_past_a_failed_item() {
        let mut session = session_with_videos(vec![
            sample_video("a", "First"),
            sample_video("b", "Second"),
            sample_video("c", "Third"),
        ]);
        let enhancer = ScriptedEnhancer::failing_on("Second");

        session.enhance_all(&enhancer).await;

        assert_eq!(enhancer.calls().len(), 3);
        assert!(session.videos[0].enhanced_title.is_some());
        assert!(session.videos[1].enhanced_title.is_none());
        assert!(!session.videos[1].is_enhancing);
        assert!(session.videos[2].enhanced_title.is_some());
        assert_eq!(session.error.as_deref(), Some("model unavailable"));
    }
}
