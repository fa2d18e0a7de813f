use std::fmt::Write;

use crate::{BoardKind, BoardResult, HomepageSection, Post, ReportData};

/// Briefs longer than this many characters are cut and suffixed with `...`.
pub const BRIEF_MAX_CHARS: usize = 50;

const REPORT_TITLE: &str = "# 巴哈姆特爬蟲日報";
const HOMEPAGE_HEADING: &str = "## 🏠 首頁頭條";
const EXTRACTION_FAILED: &str = "*(抓取失敗)*";
const NO_MATCHING_POSTS: &str = "*(無符合條件的文章)*";
const TABLE_HEADER: &str = "| 文章標題 | 簡短說明 | 時間 |\n| :--- | :--- | :--- |\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prefix for relative post links.
    pub forum_base_url: String,
}

/// Render a full report. Output depends only on `data` and `options`.
pub fn render_report(data: &ReportData, options: &RenderOptions) -> String {
    let mut out = String::new();
    let _ = write!(out, "{REPORT_TITLE}\n\n📅 生成時間: {}\n\n", data.generated_at);

    out.push_str(HOMEPAGE_HEADING);
    out.push('\n');
    match &data.homepage {
        HomepageSection::Extracted(headlines) => {
            for headline in headlines {
                let _ = writeln!(out, "- [{}]({})", headline.title, headline.url);
            }
            out.push('\n');
        }
        HomepageSection::Failed => {
            out.push_str(EXTRACTION_FAILED);
            out.push_str("\n\n");
        }
    }

    for kind in [BoardKind::Hot, BoardKind::Cold] {
        if let Some(boards) = data.boards(kind) {
            render_board_section(&mut out, kind, boards, options);
        }
    }

    out
}

fn render_board_section(
    out: &mut String,
    kind: BoardKind,
    boards: &[BoardResult],
    options: &RenderOptions,
) {
    out.push_str(kind.heading());
    out.push('\n');
    for board in boards {
        let _ = writeln!(out, "### {}", board.name);
        render_table(out, &board.posts, options);
    }
}

fn render_table(out: &mut String, posts: &[Post], options: &RenderOptions) {
    if posts.is_empty() {
        out.push_str(NO_MATCHING_POSTS);
        out.push('\n');
        return;
    }

    out.push_str(TABLE_HEADER);
    for post in posts {
        let _ = writeln!(
            out,
            "| [{}]({}) | {} | {} |",
            escape_cell(&post.title),
            post_link(&options.forum_base_url, &post.url),
            format_brief(&post.brief),
            escape_cell(&post.time),
        );
    }
    out.push('\n');
}

/// Absolute links pass through; anything else is appended to the forum base.
pub fn post_link(forum_base_url: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("{forum_base_url}{url}")
    }
}

/// Flatten a brief to one table-safe line, cut to [`BRIEF_MAX_CHARS`].
pub fn format_brief(brief: &str) -> String {
    let flat = escape_cell(brief);
    if flat.chars().count() > BRIEF_MAX_CHARS {
        let mut cut: String = flat.chars().take(BRIEF_MAX_CHARS).collect();
        cut.push_str("...");
        cut
    } else {
        flat
    }
}

fn escape_cell(text: &str) -> String {
    text.replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
        .replace('|', "｜")
}
