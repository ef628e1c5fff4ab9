//! Social platform statistics with a time-bounded cache.
//!
//! Live figures are cached for five minutes per platform. When a fetch
//! fails the caller still gets plausible numbers from
//! [`PlatformStats::fallback`], which are never cached so the next call
//! retries. [`StatsCache::collect`] also persists live figures and reads
//! them back, for up to an hour, for platforms that cannot be reached.

use super::storage::Storage;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// How long a fetched value is served from memory.
pub const LIVE_TTL_MS: u64 = 5 * 60 * 1000;
/// How long a persisted snapshot is trusted.
pub const STORAGE_TTL_MS: u64 = 60 * 60 * 1000;
/// Storage key of the persisted snapshot.
pub const STORAGE_KEY: &str = "socialMediaStats";

/// A social platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// GitHub
    GitHub,
    /// YouTube
    YouTube,
    /// Instagram
    Instagram,
    /// TikTok
    TikTok,
    /// Twitter / X
    Twitter,
}

impl Platform {
    /// Every platform in display order.
    pub const ALL: [Self; 5] = [
        Self::GitHub,
        Self::YouTube,
        Self::Instagram,
        Self::TikTok,
        Self::Twitter,
    ];

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::YouTube => "youtube",
            Self::Instagram => "instagram",
            Self::TikTok => "tiktok",
            Self::Twitter => "twitter",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// GitHub profile figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubStats {
    /// Public repositories
    pub public_repos: u64,
    /// Followers
    pub followers: u64,
    /// Recent commits
    pub commits: u64,
}

/// YouTube channel figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTubeStats {
    /// Uploaded videos
    pub video_count: u64,
    /// Subscribers
    pub subscriber_count: u64,
    /// Total views
    pub view_count: u64,
}

/// Instagram profile figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstagramStats {
    /// Posts
    pub post_count: u64,
    /// Followers
    pub followers: u64,
    /// Accounts followed
    pub following: u64,
}

/// TikTok profile figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TikTokStats {
    /// Uploaded videos
    pub video_count: u64,
    /// Followers
    pub followers: u64,
    /// Total likes
    pub likes: u64,
}

/// Twitter profile figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwitterStats {
    /// Tweets
    pub tweet_count: u64,
    /// Followers
    pub followers: u64,
    /// Accounts followed
    pub following: u64,
}

/// Figures for one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformStats {
    /// GitHub figures
    GitHub(GitHubStats),
    /// YouTube figures
    YouTube(YouTubeStats),
    /// Instagram figures
    Instagram(InstagramStats),
    /// TikTok figures
    TikTok(TikTokStats),
    /// Twitter figures
    Twitter(TwitterStats),
}

impl PlatformStats {
    /// The platform these figures belong to.
    #[must_use]
    pub const fn platform(&self) -> Platform {
        match self {
            Self::GitHub(_) => Platform::GitHub,
            Self::YouTube(_) => Platform::YouTube,
            Self::Instagram(_) => Platform::Instagram,
            Self::TikTok(_) => Platform::TikTok,
            Self::Twitter(_) => Platform::Twitter,
        }
    }

    /// Plausible figures shown when a platform cannot be reached.
    pub fn fallback<R: Rng>(platform: Platform, rng: &mut R) -> Self {
        match platform {
            Platform::GitHub => Self::GitHub(GitHubStats {
                public_repos: rng.gen_range(20..70),
                followers: rng.gen_range(50..150),
                commits: rng.gen_range(100..600),
            }),
            Platform::YouTube => Self::YouTube(YouTubeStats {
                video_count: 31,
                subscriber_count: rng.gen_range(800..1300),
                view_count: rng.gen_range(25_000..75_000),
            }),
            Platform::Instagram => Self::Instagram(InstagramStats {
                post_count: rng.gen_range(30..40),
                followers: rng.gen_range(500..1500),
                following: rng.gen_range(100..300),
            }),
            Platform::TikTok => Self::TikTok(TikTokStats {
                video_count: rng.gen_range(25..30),
                followers: rng.gen_range(300..800),
                likes: rng.gen_range(2000..7000),
            }),
            Platform::Twitter => Self::Twitter(TwitterStats {
                tweet_count: rng.gen_range(1400..1600),
                followers: rng.gen_range(1000..1500),
                following: rng.gen_range(150..350),
            }),
        }
    }
}

/// Stats for every platform at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialSnapshot {
    /// GitHub figures
    pub github: Option<GitHubStats>,
    /// YouTube figures
    pub youtube: Option<YouTubeStats>,
    /// Instagram figures
    pub instagram: Option<InstagramStats>,
    /// TikTok figures
    pub tiktok: Option<TikTokStats>,
    /// Twitter figures
    pub twitter: Option<TwitterStats>,
    /// When the snapshot was taken, in ms since the epoch
    pub last_updated: u64,
}

impl SocialSnapshot {
    /// Store one platform's figures.
    pub fn insert(&mut self, stats: PlatformStats) {
        match stats {
            PlatformStats::GitHub(s) => self.github = Some(s),
            PlatformStats::YouTube(s) => self.youtube = Some(s),
            PlatformStats::Instagram(s) => self.instagram = Some(s),
            PlatformStats::TikTok(s) => self.tiktok = Some(s),
            PlatformStats::Twitter(s) => self.twitter = Some(s),
        }
    }

    /// One platform's figures, if present.
    #[must_use]
    pub fn get(&self, platform: Platform) -> Option<PlatformStats> {
        match platform {
            Platform::GitHub => self.github.map(PlatformStats::GitHub),
            Platform::YouTube => self.youtube.map(PlatformStats::YouTube),
            Platform::Instagram => self.instagram.map(PlatformStats::Instagram),
            Platform::TikTok => self.tiktok.map(PlatformStats::TikTok),
            Platform::Twitter => self.twitter.map(PlatformStats::Twitter),
        }
    }
}

/// Why a live fetch failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The platform could not be reached
    #[error("{platform} API unavailable")]
    Unavailable {
        /// Platform queried
        platform: Platform,
    },
    /// The platform answered with an error status
    #[error("{platform} API returned status {status}")]
    Status {
        /// Platform queried
        platform: Platform,
        /// HTTP status code
        status: u16,
    },
    /// The answer could not be understood
    #[error("{platform} returned malformed stats: {reason}")]
    Malformed {
        /// Platform queried
        platform: Platform,
        /// What was wrong
        reason: String,
    },
}

/// Source of live platform figures.
pub trait StatsFetcher {
    /// Fetch current figures for `platform`.
    fn fetch(&self, platform: Platform) -> Result<PlatformStats, FetchError>;
}

impl<F> StatsFetcher for F
where
    F: Fn(Platform) -> Result<PlatformStats, FetchError>,
{
    fn fetch(&self, platform: Platform) -> Result<PlatformStats, FetchError> {
        self(platform)
    }
}

/// Parse one platform's figures from their camelCase JSON form, e.g.
/// `{"publicRepos":42,"followers":80,"commits":300}` for GitHub.
pub fn parse_platform_stats(platform: Platform, json: &str) -> Result<PlatformStats, FetchError> {
    let malformed = |err: serde_json::Error| FetchError::Malformed {
        platform,
        reason: err.to_string(),
    };
    Ok(match platform {
        Platform::GitHub => PlatformStats::GitHub(serde_json::from_str(json).map_err(malformed)?),
        Platform::YouTube => PlatformStats::YouTube(serde_json::from_str(json).map_err(malformed)?),
        Platform::Instagram => {
            PlatformStats::Instagram(serde_json::from_str(json).map_err(malformed)?)
        }
        Platform::TikTok => PlatformStats::TikTok(serde_json::from_str(json).map_err(malformed)?),
        Platform::Twitter => PlatformStats::Twitter(serde_json::from_str(json).map_err(malformed)?),
    })
}

/// Cache lifetimes and the storage key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsCacheConfig {
    /// How long a fetched value is served from memory
    pub live_ttl_ms: u64,
    /// How long a persisted snapshot is trusted
    pub storage_ttl_ms: u64,
    /// Storage key of the persisted snapshot
    pub storage_key: String,
}

impl Default for StatsCacheConfig {
    fn default() -> Self {
        Self {
            live_ttl_ms: LIVE_TTL_MS,
            storage_ttl_ms: STORAGE_TTL_MS,
            storage_key: STORAGE_KEY.to_string(),
        }
    }
}

impl StatsCacheConfig {
    /// Set the in-memory lifetime.
    #[must_use]
    pub const fn live_ttl_ms(mut self, ttl: u64) -> Self {
        self.live_ttl_ms = ttl;
        self
    }

    /// Set the persisted lifetime.
    #[must_use]
    pub const fn storage_ttl_ms(mut self, ttl: u64) -> Self {
        self.storage_ttl_ms = ttl;
        self
    }

    /// Set the storage key.
    #[must_use]
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct CachedStats {
    stats: PlatformStats,
    fetched_at: u64,
}

/// Persisted form of a snapshot.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSnapshot {
    data: SocialSnapshot,
    timestamp: u64,
}

/// Per-platform cache of live figures.
#[derive(Debug, Default)]
pub struct StatsCache {
    config: StatsCacheConfig,
    entries: BTreeMap<Platform, CachedStats>,
}

impl StatsCache {
    /// Create a cache with default lifetimes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache with custom lifetimes.
    #[must_use]
    pub fn with_config(config: StatsCacheConfig) -> Self {
        Self {
            config,
            entries: BTreeMap::new(),
        }
    }

    /// The cache configuration.
    #[must_use]
    pub const fn config(&self) -> &StatsCacheConfig {
        &self.config
    }

    /// The cached figures for `platform` if still fresh at `now_ms`.
    #[must_use]
    pub fn cached(&self, platform: Platform, now_ms: u64) -> Option<PlatformStats> {
        self.entries
            .get(&platform)
            .filter(|entry| now_ms.saturating_sub(entry.fetched_at) < self.config.live_ttl_ms)
            .map(|entry| entry.stats)
    }

    /// Figures for `platform`: cached if fresh, otherwise fetched.
    ///
    /// A failed fetch yields fallback figures, which are not cached.
    pub fn get<F, R>(&mut self, platform: Platform, now_ms: u64, fetcher: &F, rng: &mut R) -> PlatformStats
    where
        F: StatsFetcher + ?Sized,
        R: Rng,
    {
        self.live(platform, now_ms, fetcher).unwrap_or_else(|err| {
            warn!(%platform, error = %err, "stats fetch failed, using fallback");
            PlatformStats::fallback(platform, rng)
        })
    }

    fn live<F>(&mut self, platform: Platform, now_ms: u64, fetcher: &F) -> Result<PlatformStats, FetchError>
    where
        F: StatsFetcher + ?Sized,
    {
        if let Some(stats) = self.cached(platform, now_ms) {
            return Ok(stats);
        }

        let stats = fetcher.fetch(platform)?;
        if stats.platform() != platform {
            return Err(FetchError::Malformed {
                platform,
                reason: format!("got {} figures", stats.platform()),
            });
        }
        debug!(%platform, "stats fetched");
        self.entries.insert(
            platform,
            CachedStats {
                stats,
                fetched_at: now_ms,
            },
        );
        Ok(stats)
    }

    /// Figures for every platform.
    pub fn refresh_all<F, R>(&mut self, now_ms: u64, fetcher: &F, rng: &mut R) -> SocialSnapshot
    where
        F: StatsFetcher + ?Sized,
        R: Rng,
    {
        let mut snapshot = SocialSnapshot {
            last_updated: now_ms,
            ..SocialSnapshot::default()
        };
        for platform in Platform::ALL {
            snapshot.insert(self.get(platform, now_ms, fetcher, rng));
        }
        snapshot
    }

    /// Figures for every platform, with storage as the second tier.
    ///
    /// Live figures come from memory or the fetcher. A platform whose fetch
    /// fails takes its figures from the persisted snapshot while that is
    /// fresh, and fallback figures otherwise. Only live figures are
    /// persisted, and nothing is written when every fetch failed.
    pub fn collect<F, R>(&mut self, storage: &Storage, now_ms: u64, fetcher: &F, rng: &mut R) -> SocialSnapshot
    where
        F: StatsFetcher + ?Sized,
        R: Rng,
    {
        let mut snapshot = SocialSnapshot {
            last_updated: now_ms,
            ..SocialSnapshot::default()
        };
        let mut live = snapshot.clone();
        let mut any_live = false;
        let mut stored: Option<SocialSnapshot> = None;
        let mut stored_loaded = false;

        for platform in Platform::ALL {
            let stats = match self.live(platform, now_ms, fetcher) {
                Ok(stats) => {
                    live.insert(stats);
                    any_live = true;
                    stats
                }
                Err(err) => {
                    if !stored_loaded {
                        stored = self.load_snapshot(storage, now_ms);
                        stored_loaded = true;
                    }
                    let saved = stored.as_ref().and_then(|saved| saved.get(platform));
                    if let Some(stats) = saved {
                        debug!(%platform, error = %err, "stats fetch failed, using stored figures");
                        stats
                    } else {
                        warn!(%platform, error = %err, "stats fetch failed, using fallback");
                        PlatformStats::fallback(platform, rng)
                    }
                }
            };
            snapshot.insert(stats);
        }

        if any_live {
            self.save_snapshot(storage, &live, now_ms);
        }
        snapshot
    }

    /// Drop every cached value.
    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    /// Persist `snapshot` under the configured key.
    ///
    /// Failures are logged and otherwise ignored.
    pub fn save_snapshot(&self, storage: &Storage, snapshot: &SocialSnapshot, now_ms: u64) {
        let stored = StoredSnapshot {
            data: snapshot.clone(),
            timestamp: now_ms,
        };
        if let Err(err) = storage.set_json(&self.config.storage_key, &stored) {
            warn!(error = %err, "failed to save social stats");
        }
    }

    /// The persisted snapshot, if one exists and is younger than the
    /// storage lifetime.
    ///
    /// Unreadable data is logged and treated as absent.
    #[must_use]
    pub fn load_snapshot(&self, storage: &Storage, now_ms: u64) -> Option<SocialSnapshot> {
        match storage.get_json::<StoredSnapshot>(&self.config.storage_key) {
            Ok(Some(stored)) if now_ms.saturating_sub(stored.timestamp) < self.config.storage_ttl_ms => {
                Some(stored.data)
            }
            Ok(_) => None,
            Err(err) => {
                warn!(error = %err, "failed to load social stats");
                None
            }
        }
    }
}

/// Persist `snapshot` with the default configuration.
pub fn save_snapshot(storage: &Storage, snapshot: &SocialSnapshot, now_ms: u64) {
    StatsCache::new().save_snapshot(storage, snapshot, now_ms);
}

/// Load a persisted snapshot with the default configuration.
#[must_use]
pub fn load_snapshot(storage: &Storage, now_ms: u64) -> Option<SocialSnapshot> {
    StatsCache::new().load_snapshot(storage, now_ms)
}
