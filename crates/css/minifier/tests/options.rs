#![cfg(test)]
#![allow(
    clippy::missing_errors_doc,
    reason = "Test helpers return Result for clear propagation"
)]

mod common;

use common::{build_page, minify_one};
use core::error::Error;
use css_cascade::UnlayeredPrecedence;
use css_minifier::MinifierOptions;

#[test]
fn options_parse_from_json() -> Result<(), Box<dyn Error>> {
    let options = MinifierOptions::from_json(
        r#"{"keepPrintStyleSheets": true, "unlayeredPrecedence": "aboveLayers"}"#,
    )?;
    assert!(options.keep_print_stylesheets);
    assert_eq!(options.unlayered_precedence, UnlayeredPrecedence::AboveLayers);

    assert_eq!(MinifierOptions::from_json("{}")?, MinifierOptions::default());
    assert!(MinifierOptions::from_json(r#"{"unlayeredPrecedence": "middle"}"#).ok().is_none());
    assert!(MinifierOptions::from_json("keepPrintStyleSheets").ok().is_none());
    Ok(())
}

#[test]
fn print_rules_survive_when_requested() -> Result<(), Box<dyn Error>> {
    let page = build_page()?;
    let css = "@media print { h1 { color: blue } } h1 { color: red }";
    let options = MinifierOptions::from_json(r#"{"keepPrintStyleSheets": true}"#)?;
    let (kept, stats) = minify_one(&page.dom, css, &[], options)?;
    assert_eq!(kept, "@media print{h1{color:blue}}h1{color:red}");
    assert_eq!(stats.discarded, 0);

    let (dropped, stats) = minify_one(&page.dom, css, &[], MinifierOptions::default())?;
    assert_eq!(dropped, "h1{color:red}");
    assert_eq!(stats.discarded, 1);
    Ok(())
}
