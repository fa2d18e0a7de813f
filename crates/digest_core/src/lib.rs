//! Digest core: configuration, data model, row filtering and Markdown rendering.
//!
//! Everything here is pure; fetching, DOM queries and file IO live in
//! `digest_engine`.
mod config;
mod filter;
mod model;
mod render;

pub use config::{
    BrowserSettings, Config, LoggingSettings, PublishSettings, DEFAULT_BASE_URL,
    DEFAULT_COLD_LIMIT, DEFAULT_FORUM_BASE_URL, DEFAULT_HOT_LIMIT, DEFAULT_USER_AGENT,
};
pub use filter::{
    FilterRules, ListingRow, RowVerdict, DEFAULT_EXCLUDED_KEYWORDS, DEFAULT_RECENCY_MARKERS,
};
pub use model::{
    fallback_board_name, BoardKind, BoardResult, Headline, HomepageSection, Post, ReportData,
};
pub use render::{format_brief, post_link, render_report, RenderOptions, BRIEF_MAX_CHARS};
