use crate::Post;

/// Title substrings that drop a row from the report.
pub const DEFAULT_EXCLUDED_KEYWORDS: &[&str] = &["集中", "新手", "梗圖"];

/// Time-label substrings meaning "posted within roughly the last three days":
/// just now, minutes ago, hours ago, yesterday. Anything else (an absolute
/// date) counts as stale.
pub const DEFAULT_RECENCY_MARKERS: &[&str] = &["剛剛", "分前", "小時前", "昨天"];

/// A board-listing row as read from the page, before any filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingRow {
    pub sticky: bool,
    pub title: Option<String>,
    pub url: Option<String>,
    pub time: Option<String>,
    pub brief: Option<String>,
}

/// Why a row was kept or dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowVerdict {
    Keep(Post),
    Sticky,
    MissingFields,
    ExcludedKeyword(String),
    Stale,
}

/// Keyword rules applied to every listing row.
///
/// Matching is plain substring search on the rendered text; time labels are
/// never parsed as dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRules {
    pub excluded_keywords: Vec<String>,
    pub recency_markers: Vec<String>,
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            excluded_keywords: to_owned_list(DEFAULT_EXCLUDED_KEYWORDS),
            recency_markers: to_owned_list(DEFAULT_RECENCY_MARKERS),
        }
    }
}

impl FilterRules {
    /// Run one row through sticky, presence, keyword and recency checks, in
    /// that order. The first failing check decides the verdict.
    pub fn classify(&self, row: ListingRow) -> RowVerdict {
        if row.sticky {
            return RowVerdict::Sticky;
        }

        let (title, time) = match (non_empty(row.title), non_empty(row.time)) {
            (Some(title), Some(time)) => (title, time),
            _ => return RowVerdict::MissingFields,
        };

        if let Some(keyword) = self.excluded_keyword(&title) {
            return RowVerdict::ExcludedKeyword(keyword.to_string());
        }

        if !self.is_recent(&time) {
            return RowVerdict::Stale;
        }

        RowVerdict::Keep(Post {
            title,
            url: row.url.unwrap_or_default(),
            time,
            brief: row.brief.unwrap_or_default(),
        })
    }

    /// Filter rows in document order, then keep the first `limit` survivors.
    pub fn select(&self, rows: impl IntoIterator<Item = ListingRow>, limit: usize) -> Vec<Post> {
        rows.into_iter()
            .filter_map(|row| match self.classify(row) {
                RowVerdict::Keep(post) => Some(post),
                _ => None,
            })
            .take(limit)
            .collect()
    }

    pub fn excluded_keyword(&self, title: &str) -> Option<&str> {
        self.excluded_keywords
            .iter()
            .map(String::as_str)
            .find(|keyword| !keyword.is_empty() && title.contains(keyword))
    }

    pub fn is_recent(&self, time_label: &str) -> bool {
        self.recency_markers
            .iter()
            .any(|marker| !marker.is_empty() && time_label.contains(marker.as_str()))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
