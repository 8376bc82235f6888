#![cfg(test)]

use css_syntax::{ImportLayer, ImportPrelude, parse_import_prelude};

#[test]
fn full_import_prelude() {
    assert_eq!(
        parse_import_prelude(
            "url(\"a.css\") layer(base.reset) supports(display: grid) screen and (min-width: 1px)"
        ),
        Some(ImportPrelude {
            url: "a.css".to_owned(),
            layer: Some(ImportLayer::Named("base.reset".to_owned())),
            supports: Some("display: grid".to_owned()),
            media: "screen and (min-width: 1px)".to_owned(),
        })
    );
}

#[test]
fn bare_layer_and_media() {
    let anonymous = parse_import_prelude("\"b.css\" layer");
    assert_eq!(
        anonymous.as_ref().and_then(|import| import.layer.clone()),
        Some(ImportLayer::Anonymous)
    );
    assert_eq!(anonymous.map(|import| import.media), Some(String::new()));

    let print = parse_import_prelude("url(c.css) print");
    assert_eq!(print.as_ref().map(|import| import.url.as_str()), Some("c.css"));
    assert_eq!(print.as_ref().map(|import| import.media.as_str()), Some("print"));
    assert_eq!(print.and_then(|import| import.layer), None);
}

#[test]
fn prelude_without_url_is_rejected() {
    assert_eq!(parse_import_prelude("screen"), None);
    assert_eq!(parse_import_prelude(""), None);
}
