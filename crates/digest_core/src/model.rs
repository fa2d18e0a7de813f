/// One homepage carousel entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    pub title: String,
    pub url: String,
}

/// One surviving board-listing row. `title` and `time` are never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub title: String,
    /// Link as found in the listing, usually relative to the forum base URL.
    pub url: String,
    /// Relative-time label as rendered by the site, e.g. `5分前`.
    pub time: String,
    pub brief: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardResult {
    pub board_id: String,
    pub name: String,
    pub posts: Vec<Post>,
}

impl BoardResult {
    /// Result for a board whose listing could not be loaded.
    pub fn fallback(board_id: &str) -> Self {
        Self {
            board_id: board_id.to_string(),
            name: fallback_board_name(board_id),
            posts: Vec::new(),
        }
    }
}

/// Synthesized display name used when the page exposes none.
pub fn fallback_board_name(board_id: &str) -> String {
    format!("看板 ID {board_id}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardKind {
    Hot,
    Cold,
}

impl BoardKind {
    pub fn label(self) -> &'static str {
        match self {
            BoardKind::Hot => "熱門",
            BoardKind::Cold => "冷門",
        }
    }

    pub(crate) fn heading(self) -> &'static str {
        match self {
            BoardKind::Hot => "## 🛡️ 熱門看板 (近三日精選)",
            BoardKind::Cold => "## ❄️ 冷門看板 (近三日精選)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomepageSection {
    Extracted(Vec<Headline>),
    Failed,
}

/// Everything one run collected, ready to render.
///
/// `hot` and `cold` are `None` when no board of that kind was configured, in
/// which case the report omits the whole section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportData {
    pub generated_at: String,
    pub homepage: HomepageSection,
    pub hot: Option<Vec<BoardResult>>,
    pub cold: Option<Vec<BoardResult>>,
}

impl ReportData {
    pub fn boards(&self, kind: BoardKind) -> Option<&[BoardResult]> {
        match kind {
            BoardKind::Hot => self.hot.as_deref(),
            BoardKind::Cold => self.cold.as_deref(),
        }
    }
}
