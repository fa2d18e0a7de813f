use digest_core::{fallback_board_name, BoardResult, FilterRules, Headline, ListingRow};
use digest_logging::digest_debug;
use scraper::{ElementRef, Html, Selector};
use url::Url;

pub const HEADLINE_CONTAINER_SELECTOR: &str = ".headline-news__wrapper";
const HEADLINE_SLIDE_SELECTOR: &str = ".headline-news__wrapper .swiper-slide";
const HEADLINE_TITLE_SELECTOR: &str = ".headline-news__title";
const HEADLINE_LINK_SELECTOR: &str = "a.headline-news__content";

pub const BOARD_ROW_SELECTOR: &str = ".b-list__row";
const BOARD_NAME_SELECTOR: &str = r#"a[data-gtm="選單-看板名稱"]"#;
const LISTING_ROW_SELECTOR: &str = "tr.b-list__row";
const STICKY_CLASS: &str = "b-list__row--sticky";
const POST_TITLE_SELECTOR: &str = ".b-list__main__title";
const POST_BRIEF_SELECTOR: &str = ".b-list__brief";
const POST_TIME_SELECTOR: &str = ".b-list__time__edittime a";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("container {selector} not found")]
    MissingContainer { selector: &'static str },
    #[error("invalid selector {selector}: {message}")]
    Selector {
        selector: &'static str,
        message: String,
    },
}

/// Homepage carousel entries in document order.
///
/// Slides lacking a title or a link are skipped. Links are resolved against
/// `page_url`.
pub fn extract_headlines(html: &str, page_url: &str) -> Result<Vec<Headline>, ExtractError> {
    let doc = Html::parse_document(html);
    require_container(&doc, HEADLINE_CONTAINER_SELECTOR)?;

    let slide_sel = selector(HEADLINE_SLIDE_SELECTOR)?;
    let title_sel = selector(HEADLINE_TITLE_SELECTOR)?;
    let link_sel = selector(HEADLINE_LINK_SELECTOR)?;
    let base = Url::parse(page_url).ok();

    let headlines = doc
        .select(&slide_sel)
        .filter_map(|slide| {
            let title = slide.select(&title_sel).next().map(element_text)?;
            let href = slide.select(&link_sel).next()?.value().attr("href")?;
            Some(Headline {
                title,
                url: resolve_href(base.as_ref(), href),
            })
        })
        .collect();
    Ok(headlines)
}

/// Read one board listing page and keep the first `limit` rows that pass
/// `rules`.
pub fn extract_board_posts(
    html: &str,
    board_id: &str,
    limit: usize,
    rules: &FilterRules,
) -> Result<BoardResult, ExtractError> {
    let doc = Html::parse_document(html);
    require_container(&doc, BOARD_ROW_SELECTOR)?;

    let name_sel = selector(BOARD_NAME_SELECTOR)?;
    let name = doc
        .select(&name_sel)
        .next()
        .map(element_text)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| fallback_board_name(board_id));

    let rows = listing_rows(&doc)?;
    let total = rows.len();
    let posts = rules.select(rows, limit);
    digest_debug!(
        "board {} ({}): kept {} of {} rows (limit {})",
        board_id,
        name,
        posts.len(),
        total,
        limit
    );

    Ok(BoardResult {
        board_id: board_id.to_string(),
        name,
        posts,
    })
}

fn listing_rows(doc: &Html) -> Result<Vec<ListingRow>, ExtractError> {
    let row_sel = selector(LISTING_ROW_SELECTOR)?;
    let title_sel = selector(POST_TITLE_SELECTOR)?;
    let brief_sel = selector(POST_BRIEF_SELECTOR)?;
    let time_sel = selector(POST_TIME_SELECTOR)?;

    let rows = doc
        .select(&row_sel)
        .map(|row| {
            let title_el = row.select(&title_sel).next();
            ListingRow {
                sticky: row.value().classes().any(|class| class == STICKY_CLASS),
                title: title_el.map(element_text),
                url: title_el.and_then(|el| el.value().attr("href").map(str::to_string)),
                time: row.select(&time_sel).next().map(element_text),
                brief: row.select(&brief_sel).next().map(element_text),
            }
        })
        .collect();
    Ok(rows)
}

fn require_container(doc: &Html, css: &'static str) -> Result<(), ExtractError> {
    let sel = selector(css)?;
    if doc.select(&sel).next().is_none() {
        return Err(ExtractError::MissingContainer { selector: css });
    }
    Ok(())
}

fn selector(css: &'static str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|err| ExtractError::Selector {
        selector: css,
        message: err.to_string(),
    })
}

/// Visible text with whitespace runs collapsed, like a rendered `innerText`.
fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn resolve_href(base: Option<&Url>, href: &str) -> String {
    base.and_then(|base| base.join(href).ok())
        .map(|url| url.to_string())
        .unwrap_or_else(|| href.to_string())
}
