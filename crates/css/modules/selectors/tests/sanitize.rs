#![cfg(test)]
#![allow(
    clippy::missing_errors_doc,
    reason = "Test helpers return Result for clear propagation"
)]

use core::error::Error;
use css_selectors::{
    Selector, SelectorKey, SelectorSanitizer, expand_nested_selector, parse_selector_list,
    sanitize_selector,
};
use cssparser::ToCss;

fn selectors(text: &str) -> Result<Vec<Selector>, Box<dyn Error>> {
    Ok(parse_selector_list(text)?.selectors)
}

fn single(text: &str) -> Result<Selector, Box<dyn Error>> {
    selectors(text)?
        .into_iter()
        .next()
        .ok_or_else(|| format!("no selector in `{text}`").into())
}

fn expanded(child: &str, ancestors: &str) -> Result<Vec<String>, Box<dyn Error>> {
    Ok(expand_nested_selector(&single(child)?, &selectors(ancestors)?)
        .iter()
        .map(ToCss::to_css_string)
        .collect())
}

#[test]
fn strips_what_a_snapshot_cannot_match() -> Result<(), Box<dyn Error>> {
    assert_eq!(sanitize_selector(&single("a::before")?), "a");
    assert_eq!(sanitize_selector(&single("::selection")?), "*");
    assert_eq!(sanitize_selector(&single(".list > ::marker")?), ".list>*");
    assert_eq!(sanitize_selector(&single("svg|rect.x")?), "rect.x");
    assert_eq!(sanitize_selector(&single("*|*")?), "*");
    assert_eq!(sanitize_selector(&single("video:playing")?), "video");
    assert_eq!(sanitize_selector(&single(".a :past")?), ".a *");
    Ok(())
}

#[test]
fn rewritten_negation_is_dropped() -> Result<(), Box<dyn Error>> {
    assert_eq!(sanitize_selector(&single(".a:not(::before)")?), ".a");
    assert_eq!(sanitize_selector(&single(".a:not(.b)")?), ".a:not(.b)");
    Ok(())
}

#[test]
fn unresolved_nesting_is_dropped() -> Result<(), Box<dyn Error>> {
    assert_eq!(sanitize_selector(&single("& > .b")?), "*>.b");
    assert_eq!(sanitize_selector(&single("&")?), "*");
    Ok(())
}

#[test]
fn nesting_selector_is_substituted() -> Result<(), Box<dyn Error>> {
    assert_eq!(expanded("& > .b", ".a, .c")?, vec![".a>.b", ".c>.b"]);
    assert_eq!(expanded("&.b", "div")?, vec!["div.b"]);
    assert_eq!(expanded(".b&", ".a")?, vec![".b:is(.a)"]);
    assert_eq!(expanded(".b &", ".a")?, vec![".b .a"]);
    assert_eq!(expanded(":not(&)", ".a")?, vec![":not(.a)"]);
    Ok(())
}

#[test]
fn implicit_nesting_is_a_descendant() -> Result<(), Box<dyn Error>> {
    assert_eq!(expanded(".b", ".a, #x")?, vec![".a .b", "#x .b"]);
    assert_eq!(expanded("+ .b", ".a")?, vec![".a+.b"]);
    Ok(())
}

#[test]
fn expansion_is_deduplicated() -> Result<(), Box<dyn Error>> {
    assert_eq!(expanded("& .b", ".a, .a")?, vec![".a .b"]);
    let unchanged = expand_nested_selector(&single(".b &")?, &[]);
    assert_eq!(unchanged.len(), 1);
    assert_eq!(unchanged.first().map(ToCss::to_css_string).as_deref(), Some(".b &"));
    Ok(())
}

#[test]
fn sanitizer_memoizes_per_branch() -> Result<(), Box<dyn Error>> {
    let mut sanitizer = SelectorSanitizer::new();
    let ancestors = selectors(".a, .c")?;
    let key = SelectorKey { rule: 3, branch: 0 };
    assert_eq!(
        sanitizer.sanitize(key, &single("& > .b::after")?, &ancestors),
        ".a>.b,.c>.b"
    );
    // A cached branch is not rewritten again.
    assert_eq!(
        sanitizer.sanitize(key, &single(".other")?, &[]),
        ".a>.b,.c>.b"
    );
    assert_eq!(sanitizer.len(), 1);
    let other = SelectorKey { rule: 3, branch: 1 };
    assert_eq!(sanitizer.sanitize(other, &single(".other")?, &[]), ".other");
    assert_eq!(sanitizer.len(), 2);
    Ok(())
}
