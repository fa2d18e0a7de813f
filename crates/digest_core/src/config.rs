use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::{BoardKind, FilterRules};

pub const DEFAULT_HOT_LIMIT: usize = 20;
pub const DEFAULT_COLD_LIMIT: usize = 10;
pub const DEFAULT_BASE_URL: &str = "https://www.gamer.com.tw/";
pub const DEFAULT_FORUM_BASE_URL: &str = "https://forum.gamer.com.tw/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

const DEFAULT_OUTPUT_PATH: &str = "README.md";
const DEFAULT_COMMIT_MESSAGE_PREFIX: &str = "Daily News Update";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_PAGE_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_SELECTOR_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSettings {
    pub enabled: bool,
    pub commit_message_prefix: String,
}

impl PublishSettings {
    /// Commit message for the given ISO date, e.g. `Daily News Update: 2024-05-01`.
    pub fn commit_message(&self, iso_date: &str) -> String {
        format!("{}: {}", self.commit_message_prefix, iso_date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserSettings {
    /// Browserless endpoint; without it pages are fetched over plain HTTP.
    pub browserless_url: Option<String>,
    pub browserless_token: Option<String>,
    /// Abort image, stylesheet, font and media requests while rendering.
    pub block_resources: bool,
    pub user_agent: String,
    pub page_timeout: Duration,
    pub selector_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub level: String,
    pub file: Option<PathBuf>,
}

/// Typed settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub hot_boards: Vec<String>,
    pub hot_limit: usize,
    pub cold_boards: Vec<String>,
    pub cold_limit: usize,
    pub base_url: String,
    pub forum_base_url: String,
    pub filter: FilterRules,
    pub output_path: PathBuf,
    pub publish: PublishSettings,
    pub browser: BrowserSettings,
    pub logging: LoggingSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self::resolve(&HashMap::new())
    }
}

impl Config {
    /// Build settings from environment-style key/value pairs.
    ///
    /// Never fails: missing or malformed values fall back to their defaults.
    pub fn resolve(env: &HashMap<String, String>) -> Self {
        let get = |key: &str| env.get(key).map(String::as_str);

        let defaults = FilterRules::default();
        let excluded_keywords = match get("EXCLUDE_KEYWORDS") {
            Some(raw) => parse_list(raw),
            None => defaults.excluded_keywords,
        };
        let recency_markers = get("RECENCY_MARKERS")
            .map(parse_list)
            .filter(|markers| !markers.is_empty())
            .unwrap_or(defaults.recency_markers);

        Self {
            hot_boards: get("HOT_BOARDS").map(parse_list).unwrap_or_default(),
            hot_limit: parse_limit(get("HOT_LIMIT"), DEFAULT_HOT_LIMIT),
            cold_boards: get("COLD_BOARDS").map(parse_list).unwrap_or_default(),
            cold_limit: parse_limit(get("COLD_LIMIT"), DEFAULT_COLD_LIMIT),
            base_url: parse_url(get("BASE_URL"), DEFAULT_BASE_URL),
            forum_base_url: parse_url(get("FORUM_BASE_URL"), DEFAULT_FORUM_BASE_URL),
            filter: FilterRules {
                excluded_keywords,
                recency_markers,
            },
            output_path: get("OUTPUT_PATH")
                .map(str::trim)
                .filter(|path| !path.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
            publish: PublishSettings {
                enabled: parse_bool(get("GIT_PUBLISH"), false),
                commit_message_prefix: non_empty(get("COMMIT_MESSAGE_PREFIX"))
                    .unwrap_or_else(|| DEFAULT_COMMIT_MESSAGE_PREFIX.to_string()),
            },
            browser: BrowserSettings {
                browserless_url: get("BROWSERLESS_URL")
                    .filter(|raw| Url::parse(raw.trim()).is_ok())
                    .map(|raw| raw.trim().to_string()),
                browserless_token: non_empty(get("BROWSERLESS_TOKEN")),
                block_resources: parse_bool(get("BLOCK_RESOURCES"), true),
                user_agent: non_empty(get("USER_AGENT"))
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
                page_timeout: parse_millis(get("PAGE_TIMEOUT_MS"), DEFAULT_PAGE_TIMEOUT_MS),
                selector_timeout: parse_millis(
                    get("SELECTOR_TIMEOUT_MS"),
                    DEFAULT_SELECTOR_TIMEOUT_MS,
                ),
            },
            logging: LoggingSettings {
                level: non_empty(get("LOG_LEVEL"))
                    .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
                file: non_empty(get("LOG_FILE")).map(PathBuf::from),
            },
        }
    }

    /// Listing page URL for a board, e.g. `https://forum.gamer.com.tw/B.php?bsn=60076`.
    pub fn board_url(&self, board_id: &str) -> String {
        format!("{}B.php?bsn={}", self.forum_base_url, board_id)
    }

    /// Configured board IDs and post limit for one category.
    pub fn boards(&self, kind: BoardKind) -> (&[String], usize) {
        match kind {
            BoardKind::Hot => (&self.hot_boards, self.hot_limit),
            BoardKind::Cold => (&self.cold_boards, self.cold_limit),
        }
    }
}

/// Split a comma list, trimming tokens and dropping empty ones.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Leading decimal digits are taken as the value (`"15abc"` is 15); no digits
/// or zero yields the default.
fn parse_limit(raw: Option<&str>, default: usize) -> usize {
    let Some(raw) = raw else {
        return default;
    };
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    match digits.parse::<usize>() {
        Ok(0) | Err(_) => default,
        Ok(value) => value,
    }
}

fn parse_bool(raw: Option<&str>, default: bool) -> bool {
    match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

fn parse_millis(raw: Option<&str>, default_ms: u64) -> Duration {
    let ms = raw
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .unwrap_or(default_ms);
    Duration::from_millis(ms)
}

/// Base URLs must parse; a missing trailing slash is added so paths can be
/// appended directly.
fn parse_url(raw: Option<&str>, default: &str) -> String {
    let Some(candidate) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return default.to_string();
    };
    match Url::parse(candidate) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
            let mut value = candidate.to_string();
            if !value.ends_with('/') {
                value.push('/');
            }
            value
        }
        _ => default.to_string(),
    }
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
