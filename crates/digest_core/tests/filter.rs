use digest_core::{FilterRules, ListingRow, Post, RowVerdict};

fn row(title: &str, time: &str) -> ListingRow {
    ListingRow {
        sticky: false,
        title: Some(title.to_string()),
        url: Some(format!("C.php?title={title}")),
        time: Some(time.to_string()),
        brief: Some(format!("brief of {title}")),
    }
}

#[test]
fn sticky_rows_are_dropped_even_when_recent_and_clean() {
    let rules = FilterRules::default();
    let sticky = ListingRow {
        sticky: true,
        ..row("版規公告", "剛剛")
    };
    assert_eq!(rules.classify(sticky.clone()), RowVerdict::Sticky);
    assert!(rules.select(vec![sticky], 10).is_empty());
}

#[test]
fn rows_without_title_or_time_are_dropped() {
    let rules = FilterRules::default();
    let no_title = ListingRow {
        title: None,
        ..row("x", "剛剛")
    };
    let blank_time = ListingRow {
        time: Some("   ".into()),
        ..row("x", "剛剛")
    };
    assert_eq!(rules.classify(no_title), RowVerdict::MissingFields);
    assert_eq!(rules.classify(blank_time), RowVerdict::MissingFields);
}

#[test]
fn denylisted_title_is_dropped_regardless_of_recency() {
    let rules = FilterRules::default();
    assert_eq!(
        rules.classify(row("【新手】教學", "剛剛")),
        RowVerdict::ExcludedKeyword("新手".into())
    );
}

#[test]
fn denylist_is_configuration_not_code() {
    let rules = FilterRules {
        excluded_keywords: vec!["集中".into(), "梗圖".into(), "綜合".into()],
        ..FilterRules::default()
    };
    assert!(matches!(rules.classify(row("【新手】教學", "剛剛")), RowVerdict::Keep(_)));
    assert_eq!(
        rules.classify(row("【綜合】閒聊", "3小時前")),
        RowVerdict::ExcludedKeyword("綜合".into())
    );
}

#[test]
fn labels_without_recency_markers_are_stale() {
    let rules = FilterRules::default();
    assert_eq!(rules.classify(row("攻略", "2024-01-01")), RowVerdict::Stale);
    assert_eq!(rules.classify(row("攻略", "01/05")), RowVerdict::Stale);
    for label in ["剛剛", "5分前", "3小時前", "昨天 23:10"] {
        assert!(
            matches!(rules.classify(row("攻略", label)), RowVerdict::Keep(_)),
            "{label} should be recent"
        );
    }
}

#[test]
fn kept_rows_carry_trimmed_fields_and_default_brief() {
    let rules = FilterRules::default();
    let verdict = rules.classify(ListingRow {
        sticky: false,
        title: Some("  攻略心得 ".into()),
        url: None,
        time: Some(" 5分前 ".into()),
        brief: None,
    });
    assert_eq!(
        verdict,
        RowVerdict::Keep(Post {
            title: "攻略心得".into(),
            url: String::new(),
            time: "5分前".into(),
            brief: String::new(),
        })
    );
}

#[test]
fn truncation_happens_after_filtering() {
    let rules = FilterRules::default();
    let mut rows = Vec::new();
    for i in 0..15 {
        rows.push(row(&format!("stale {i}"), "2023-12-31"));
        rows.push(row(&format!("fresh {i}"), "剛剛"));
    }

    let posts = rules.select(rows, 10);

    assert_eq!(posts.len(), 10);
    let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
    let expected: Vec<String> = (0..10).map(|i| format!("fresh {i}")).collect();
    assert_eq!(titles, expected);
}

#[test]
fn limit_larger_than_survivors_keeps_everything() {
    let rules = FilterRules::default();
    let posts = rules.select(vec![row("a", "剛剛"), row("b", "昨天")], 20);
    assert_eq!(posts.len(), 2);
}
