//! Keyword side-effects that run after a successful reply.
//!
//! Some commands carry a directly actionable request ("open youtube",
//! "play perfect") on top of whatever the assistant service answers. The
//! matching lives behind [`CommandMatcher`] so smarter matchers can replace
//! the keyword scan without touching the runner.

use crate::api::AssistantClient;
use crate::events::{EventSink, WidgetEvent};
use crate::gate::UrlOpener;
use std::sync::Arc;
use std::time::Duration;

/// Delay before a matched site opens, letting the spoken reply begin first.
const SITE_OPEN_DELAY: Duration = Duration::from_millis(500);

/// Well-known sites the keyword matcher can open directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteTarget {
    Google,
    YouTube,
    Facebook,
    LinkedIn,
}

impl SiteTarget {
    /// Canonical URL for the site.
    #[must_use]
    pub fn canonical_url(self) -> &'static str {
        match self {
            Self::Google => "https://www.google.com",
            Self::YouTube => "https://www.youtube.com",
            Self::Facebook => "https://www.facebook.com",
            Self::LinkedIn => "https://www.linkedin.com",
        }
    }

    /// Display name for the site.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::YouTube => "YouTube",
            Self::Facebook => "Facebook",
            Self::LinkedIn => "LinkedIn",
        }
    }
}

/// A directly actionable request found inside a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Open a well-known site.
    OpenSite(SiteTarget),
    /// Look up and play a song, by normalized library key.
    PlaySong(String),
}

/// Finds directly actionable requests in an already lowercased command.
pub trait CommandMatcher: Send + Sync {
    fn matches(&self, command: &str) -> Vec<SpecialCommand>;
}

/// Keyword scanner matching "open <site>" and "play <song>" phrasings.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordMatcher;

impl CommandMatcher for KeywordMatcher {
    fn matches(&self, command: &str) -> Vec<SpecialCommand> {
        let mut found = Vec::new();
        if command.contains("open") {
            // First matching site wins; "open google and youtube" only
            // opens Google.
            let site = if command.contains("google") {
                Some(SiteTarget::Google)
            } else if command.contains("youtube") {
                Some(SiteTarget::YouTube)
            } else if command.contains("facebook") {
                Some(SiteTarget::Facebook)
            } else if command.contains("linkedin") {
                Some(SiteTarget::LinkedIn)
            } else {
                None
            };
            if let Some(site) = site {
                found.push(SpecialCommand::OpenSite(site));
            }
        }
        if command.contains("play ") {
            found.push(SpecialCommand::PlaySong(normalize_song_key(command)));
        }
        found
    }
}

/// Normalize a "play ..." command into a song library key.
///
/// Strips the leading "play", trims, lowercases, and joins the remaining
/// words with underscores ("Play Shape of You" becomes `shape_of_you`).
#[must_use]
pub fn normalize_song_key(command: &str) -> String {
    let trimmed = command.trim();
    let rest = match trimmed.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("play") => &trimmed[4..],
        _ => trimmed,
    };
    rest.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Runs matched special commands after a reply succeeds.
pub struct SpecialCommandRunner {
    matcher: Arc<dyn CommandMatcher>,
    client: AssistantClient,
    opener: Arc<dyn UrlOpener>,
    events: EventSink,
    open_delay: Duration,
}

impl SpecialCommandRunner {
    pub fn new(
        matcher: Arc<dyn CommandMatcher>,
        client: AssistantClient,
        opener: Arc<dyn UrlOpener>,
        events: EventSink,
    ) -> Self {
        Self {
            matcher,
            client,
            opener,
            events,
            open_delay: SITE_OPEN_DELAY,
        }
    }

    /// Override the site-open delay (tests).
    #[must_use]
    pub fn with_open_delay(mut self, open_delay: Duration) -> Self {
        self.open_delay = open_delay;
        self
    }

    /// Match and execute special commands for a lowercased command string.
    pub async fn run(&self, command: &str) {
        for matched in self.matcher.matches(command) {
            match matched {
                SpecialCommand::OpenSite(site) => self.open_site(site),
                SpecialCommand::PlaySong(key) => self.play_song(&key).await,
            }
        }
    }

    fn open_site(&self, site: SiteTarget) {
        let opener = Arc::clone(&self.opener);
        let events = self.events.clone();
        let delay = self.open_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::info!(site = site.name(), "opening site");
            if !opener.open(site.canonical_url()) {
                events.emit(WidgetEvent::Warning(format!(
                    "Pop-up blocker may have prevented opening {}.",
                    site.name()
                )));
            }
        });
    }

    async fn play_song(&self, key: &str) {
        let songs = match self.client.songs().await {
            Ok(songs) => songs,
            Err(e) => {
                tracing::warn!(error = %e, "song library fetch failed");
                return;
            }
        };
        match songs.iter().find(|s| s.key == key) {
            Some(song) => {
                tracing::info!(song = %song.name, "playing song");
                if !self.opener.open(&song.url) {
                    tracing::debug!(song = %song.name, "song playback window was blocked");
                }
            }
            None => {
                tracing::debug!(%key, "no song in library for key");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn normalize_strips_play_prefix_and_joins_words() {
        assert_eq!(normalize_song_key("play Shape of You"), "shape_of_you");
        assert_eq!(normalize_song_key("Play Perfect"), "perfect");
        assert_eq!(normalize_song_key("  play   Believer  "), "believer");
    }

    #[test]
    fn normalize_without_prefix_still_normalizes() {
        assert_eq!(normalize_song_key("Shape of You"), "shape_of_you");
    }

    #[test]
    fn open_matches_first_site_in_precedence_order() {
        let matcher = KeywordMatcher;
        assert_eq!(
            matcher.matches("please open youtube for me"),
            vec![SpecialCommand::OpenSite(SiteTarget::YouTube)]
        );
        // Google outranks YouTube when both appear.
        assert_eq!(
            matcher.matches("open youtube and google"),
            vec![SpecialCommand::OpenSite(SiteTarget::Google)]
        );
    }

    #[test]
    fn open_without_known_site_matches_nothing() {
        assert!(KeywordMatcher.matches("open the pod bay doors").is_empty());
    }

    #[test]
    fn site_mention_without_open_matches_nothing() {
        assert!(KeywordMatcher.matches("what is youtube").is_empty());
    }

    #[test]
    fn play_yields_normalized_song_key() {
        assert_eq!(
            KeywordMatcher.matches("play shape of you"),
            vec![SpecialCommand::PlaySong("shape_of_you".into())]
        );
    }

    #[test]
    fn open_and_play_can_both_match() {
        let matched = KeywordMatcher.matches("open youtube and play perfect");
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0], SpecialCommand::OpenSite(SiteTarget::YouTube));
        assert!(matches!(&matched[1], SpecialCommand::PlaySong(k) if k.contains("perfect")));
    }

    #[test]
    fn site_targets_have_canonical_urls() {
        assert_eq!(SiteTarget::Google.canonical_url(), "https://www.google.com");
        assert_eq!(SiteTarget::YouTube.canonical_url(), "https://www.youtube.com");
        assert_eq!(SiteTarget::Facebook.canonical_url(), "https://www.facebook.com");
        assert_eq!(SiteTarget::LinkedIn.canonical_url(), "https://www.linkedin.com");
    }
}
