#![cfg(test)]

use css_media_queries::{MediaTypeToken, matches_media_type, parse_media_list};

#[test]
fn screen_types_match() {
    for media in ["", "  ", "screen", "all", "only screen", "SCREEN", "print, screen"] {
        assert!(matches_media_type(media, false), "`{media}` should match");
    }
}

#[test]
fn other_types_do_not_match() {
    for media in ["print", "speech", "tv, print", "PRINT"] {
        assert!(!matches_media_type(media, false), "`{media}` should not match");
    }
}

#[test]
fn print_matches_when_kept() {
    assert!(matches_media_type("print", true));
    assert!(!matches_media_type("speech", true));
}

#[test]
fn anything_richer_fails_open() {
    for media in [
        "not print",
        "screen and (min-width: 100px)",
        "(prefers-color-scheme: dark)",
        "print and (orientation: landscape)",
        "(width > 1px) or print",
        "!!",
        "{}",
    ] {
        assert!(matches_media_type(media, false), "`{media}` should be kept");
    }
}

#[test]
fn media_list_tokens() {
    let list = parse_media_list("not print, only screen");
    assert_eq!(
        list.as_ref().map(|list| list.types.clone()),
        Some(vec![
            MediaTypeToken {
                name: "print".to_owned(),
                negated: true,
            },
            MediaTypeToken {
                name: "screen".to_owned(),
                negated: false,
            },
        ])
    );
    assert_eq!(list.map(|list| list.has_negation), Some(true));
    assert_eq!(parse_media_list("a { b }"), None);
}
