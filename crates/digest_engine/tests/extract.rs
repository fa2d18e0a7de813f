use digest_core::{FilterRules, Headline};
use digest_engine::{decode_html, extract_board_posts, extract_headlines, ExtractError};
use pretty_assertions::assert_eq;

const HOMEPAGE: &str = r#"
<html><body>
<div class="headline-news__wrapper">
  <div class="swiper-wrapper">
    <div class="swiper-slide">
      <a class="headline-news__content" href="https://gnn.gamer.com.tw/detail.php?sn=1">
        <p class="headline-news__title">  新作發表  </p>
      </a>
    </div>
    <div class="swiper-slide">
      <p class="headline-news__title">沒有連結</p>
    </div>
    <div class="swiper-slide">
      <a class="headline-news__content" href="/news/2"><p>沒有標題</p></a>
    </div>
    <div class="swiper-slide">
      <a class="headline-news__content" href="/gnn/3">
        <p class="headline-news__title">相對
          連結</p>
      </a>
    </div>
  </div>
</div>
</body></html>
"#;

fn row(class: &str, title: &str, time: &str, brief: &str) -> String {
    format!(
        r##"<tr class="{class}">
  <td class="b-list__main">
    <a class="b-list__main__title" href="C.php?bsn=100&amp;snA={title}">{title}</a>
    <p class="b-list__brief">{brief}</p>
  </td>
  <td class="b-list__time"><p class="b-list__time__edittime"><a href="#">{time}</a></p></td>
</tr>"##
    )
}

fn board_page(name: Option<&str>, rows: &[String]) -> String {
    let name = name
        .map(|n| format!(r#"<a data-gtm="選單-看板名稱" href="B.php?bsn=100">{n}</a>"#))
        .unwrap_or_default();
    format!(
        "<html><body><div class=\"b-menu\">{name}</div><table class=\"b-list\">{}</table></body></html>",
        rows.join("\n")
    )
}

#[test]
fn headlines_skip_incomplete_slides_and_resolve_links() {
    let headlines = extract_headlines(HOMEPAGE, "https://www.gamer.com.tw/").unwrap();
    assert_eq!(
        headlines,
        vec![
            Headline {
                title: "新作發表".into(),
                url: "https://gnn.gamer.com.tw/detail.php?sn=1".into(),
            },
            Headline {
                title: "相對 連結".into(),
                url: "https://www.gamer.com.tw/gnn/3".into(),
            },
        ]
    );
}

#[test]
fn missing_headline_container_is_an_error() {
    let err = extract_headlines("<html><body></body></html>", "https://www.gamer.com.tw/")
        .unwrap_err();
    assert_eq!(
        err,
        ExtractError::MissingContainer {
            selector: ".headline-news__wrapper"
        }
    );
}

#[test]
fn board_rows_are_filtered_in_order() {
    let html = board_page(
        Some("  測試看板 "),
        &[
            row("b-list__row b-list__row--sticky", "置頂公告", "剛剛", "sticky"),
            row("b-list__row", "【新手】教學", "剛剛", "newbie"),
            row("b-list__row", "舊文章", "2024-01-01", "old"),
            row("b-list__row", "新文章", "5分前", "line one"),
            row("b-list__row", "昨日文章", "昨天 21:00", ""),
        ],
    );

    let board = extract_board_posts(&html, "100", 20, &FilterRules::default()).unwrap();

    assert_eq!(board.name, "測試看板");
    assert_eq!(board.board_id, "100");
    let titles: Vec<_> = board.posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["新文章", "昨日文章"]);
    assert_eq!(board.posts[0].url, "C.php?bsn=100&snA=新文章");
    assert_eq!(board.posts[0].time, "5分前");
    assert_eq!(board.posts[0].brief, "line one");
}

#[test]
fn rows_without_time_are_dropped() {
    let html = board_page(
        Some("板"),
        &[r#"<tr class="b-list__row"><td><a class="b-list__main__title" href="C.php">無時間</a></td></tr>"#.to_string()],
    );
    let board = extract_board_posts(&html, "1", 10, &FilterRules::default()).unwrap();
    assert!(board.posts.is_empty());
}

#[test]
fn limit_applies_after_filtering() {
    let mut rows = Vec::new();
    for i in 0..15 {
        rows.push(row("b-list__row", &format!("舊{i}"), "01/02", ""));
        rows.push(row("b-list__row", &format!("新{i}"), "3小時前", ""));
    }
    let html = board_page(Some("板"), &rows);

    let board = extract_board_posts(&html, "1", 10, &FilterRules::default()).unwrap();

    let titles: Vec<_> = board.posts.iter().map(|p| p.title.clone()).collect();
    let expected: Vec<_> = (0..10).map(|i| format!("新{i}")).collect();
    assert_eq!(titles, expected);
}

#[test]
fn missing_board_name_uses_fallback() {
    let html = board_page(None, &[row("b-list__row", "新文章", "剛剛", "")]);
    let board = extract_board_posts(&html, "60076", 10, &FilterRules::default()).unwrap();
    assert_eq!(board.name, "看板 ID 60076");
    assert_eq!(board.posts.len(), 1);
}

#[test]
fn missing_row_container_is_an_error() {
    let html = board_page(Some("板"), &[]);
    let err = extract_board_posts(&html, "1", 10, &FilterRules::default()).unwrap_err();
    assert_eq!(
        err,
        ExtractError::MissingContainer {
            selector: ".b-list__row"
        }
    );
}

#[test]
fn decode_respects_charset_header() {
    let bytes = b"caf\xe9"; // iso-8859-1
    let decoded = decode_html(bytes, Some("text/html; charset=ISO-8859-1")).unwrap();
    assert_eq!(decoded.html, "café");
}

#[test]
fn decode_handles_utf8_bom() {
    let bytes = b"\xEF\xBB\xBFhello";
    let decoded = decode_html(bytes, Some("text/html")).unwrap();
    assert_eq!(decoded.html, "hello");
    assert_eq!(decoded.encoding_label, "UTF-8");
}

#[test]
fn decode_reads_meta_charset() {
    let mut bytes = b"<html><head><meta charset=\"big5\"></head><body>".to_vec();
    let (text, _, _) = encoding_rs::BIG5.encode("看板");
    bytes.extend_from_slice(&text);
    bytes.extend_from_slice(b"</body></html>");

    let decoded = decode_html(&bytes, None).unwrap();
    assert_eq!(decoded.encoding_label, "Big5");
    assert!(decoded.html.contains("看板"));
}
