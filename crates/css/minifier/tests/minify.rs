#![cfg(test)]
#![allow(
    clippy::missing_errors_doc,
    reason = "Test helpers return Result for clear propagation"
)]

mod common;

use common::{build_page, minify_one};
use core::error::Error;
use css_minifier::{
    InlineStyle, MinifierOptions, MinifyStats, RulesMinifier, StylesheetEntry, StylesheetSet,
};
use css_syntax::{Rule, Stylesheet, parse_stylesheet};

#[test]
fn losing_rules_and_print_media_are_removed() -> Result<(), Box<dyn Error>> {
    let page = build_page()?;
    let (output, stats) = minify_one(
        &page.dom,
        "h1 { color: black } h1 { color: red !important } @media print { h1 { color: blue } }",
        &[],
        MinifierOptions::default(),
    )?;
    assert_eq!(output, "h1{color:red!important}");
    assert_eq!(
        stats,
        MinifyStats {
            processed: 2,
            discarded: 2
        }
    );
    Ok(())
}

#[test]
fn second_run_changes_nothing() -> Result<(), Box<dyn Error>> {
    let page = build_page()?;
    let mut sheets = StylesheetSet::new();
    sheets.push(
        "inline",
        StylesheetEntry::new(parse_stylesheet(
            "h1, .missing { color: black; margin: 0 } .title { color: red } .gone { color: blue }",
        )),
    );
    let minifier = RulesMinifier::new(MinifierOptions::default());
    let first = minifier.process(&page.dom, &mut sheets, &[])?;
    let once = sheets
        .get(&"inline")
        .map(|entry| entry.stylesheet.to_string())
        .ok_or("missing sheet")?;
    assert_eq!(once, "h1{margin:0}.title{color:red}");
    assert_eq!(first.discarded, 1);

    let second = minifier.process(&page.dom, &mut sheets, &[])?;
    let twice = sheets
        .get(&"inline")
        .map(|entry| entry.stylesheet.to_string())
        .ok_or("missing sheet")?;
    assert_eq!(twice, once);
    assert_eq!(
        second,
        MinifyStats {
            processed: 2,
            discarded: 0
        }
    );
    Ok(())
}

#[test]
fn selector_branches_without_matches_are_dropped() -> Result<(), Box<dyn Error>> {
    let page = build_page()?;
    let (output, stats) = minify_one(
        &page.dom,
        ".missing, .wide, section > .box { color: red }",
        &[],
        MinifierOptions::default(),
    )?;
    assert_eq!(output, ".wide,section>.box{color:red}");
    assert_eq!(stats.discarded, 0);
    Ok(())
}

#[test]
fn dynamic_state_rules_are_kept_verbatim() -> Result<(), Box<dyn Error>> {
    let page = build_page()?;
    let (output, _) = minify_one(
        &page.dom,
        "h1:hover, .missing { color: red } h1 { color: blue } p::before { content: 'x' }",
        &[],
        MinifierOptions::default(),
    )?;
    assert_eq!(
        output,
        "h1:hover,.missing{color:red}h1{color:blue}p::before{content:'x'}"
    );
    Ok(())
}

#[test]
fn conditional_contexts_do_not_compete() -> Result<(), Box<dyn Error>> {
    let page = build_page()?;
    let css = "h1{color:red}@media (min-width: 500px){h1{color:blue}}@supports (display: grid){h1{color:green}}";
    let (output, _) = minify_one(&page.dom, css, &[], MinifierOptions::default())?;
    assert_eq!(output, css);
    Ok(())
}

#[test]
fn nested_rules_resolve_against_their_parent() -> Result<(), Box<dyn Error>> {
    let page = build_page()?;
    let (output, _) = minify_one(
        &page.dom,
        "section { .box { color: red } .none { color: blue } & > .wide { margin: 0 } }",
        &[],
        MinifierOptions::default(),
    )?;
    assert_eq!(output, "section{.box{color:red}&>.wide{margin:0}}");
    Ok(())
}

#[test]
fn declarations_of_nested_conditional_rules_are_wrapped() -> Result<(), Box<dyn Error>> {
    let page = build_page()?;
    let (output, _) = minify_one(
        &page.dom,
        ".title { color: red; @media (min-width: 1px) { color: blue } }",
        &[],
        MinifierOptions::default(),
    )?;
    assert_eq!(output, ".title{color:red;@media (min-width: 1px){&{color:blue}}}");
    Ok(())
}

#[test]
fn balanced_raw_blocks_are_reparsed() -> Result<(), Box<dyn Error>> {
    let page = build_page()?;
    let mut sheets = StylesheetSet::new();
    sheets.push(
        0_usize,
        StylesheetEntry::new(Stylesheet {
            rules: vec![
                Rule::Raw("h1 { color: red } .gone { color: blue }".to_owned()),
                Rule::Raw("a:::b { color: red }".to_owned()),
            ],
        }),
    );
    let stats = RulesMinifier::default().process(&page.dom, &mut sheets, &[])?;
    let output = sheets
        .get(&0)
        .map(|entry| entry.stylesheet.to_string())
        .ok_or("missing sheet")?;
    assert_eq!(output, "h1{color:red}a:::b { color: red }");
    assert_eq!(stats.processed, 2);
    Ok(())
}

#[test]
fn revert_is_always_kept() -> Result<(), Box<dyn Error>> {
    let page = build_page()?;
    let (output, _) = minify_one(
        &page.dom,
        "h1 { color: red } .title { color: revert }",
        &[],
        MinifierOptions::default(),
    )?;
    assert_eq!(output, "h1{color:red}.title{color:revert}");
    Ok(())
}

#[test]
fn inline_styles_take_part_in_the_cascade() -> Result<(), Box<dyn Error>> {
    let page = build_page()?;
    let inline = [InlineStyle::parse(page.heading, "color: blue")];
    let (output, _) = minify_one(
        &page.dom,
        "h1 { color: red; margin: 0 } .title { padding: 0 !important } .title { padding: 1px }",
        &inline,
        MinifierOptions::default(),
    )?;
    assert_eq!(output, "h1{margin:0}.title{padding:0!important}");

    let important = [InlineStyle::parse(page.heading, "color: blue")];
    let (output, _) = minify_one(
        &page.dom,
        "h1 { color: red !important }",
        &important,
        MinifierOptions::default(),
    )?;
    assert_eq!(output, "h1{color:red!important}");
    Ok(())
}

#[test]
fn inline_styles_keep_one_declaration_per_property() -> Result<(), Box<dyn Error>> {
    let page = build_page()?;
    let inline = InlineStyle::parse(
        page.heading,
        "color: green !important; color: blue; margin: 0",
    );
    let kept: Vec<_> = inline
        .declarations
        .iter()
        .map(|declaration| {
            (
                declaration.property.as_str(),
                declaration.value.as_str(),
                declaration.important,
            )
        })
        .collect();
    if kept != [("color", "green", true), ("margin", "0", false)] {
        return Err(format!("unexpected inline declarations {kept:?}").into());
    }

    let (output, _) = minify_one(
        &page.dom,
        "h1 { color: red !important; padding: 0 }",
        &[inline],
        MinifierOptions::default(),
    )?;
    assert_eq!(output, "h1{padding:0}");
    Ok(())
}

#[test]
fn stylesheet_media_and_scoping() -> Result<(), Box<dyn Error>> {
    let page = build_page()?;
    let mut sheets = StylesheetSet::new();
    sheets.push(
        "print",
        StylesheetEntry::new(parse_stylesheet("h1 { color: red } .title { margin: 0 }"))
            .with_media("print"),
    );
    sheets.push(
        "shadow",
        StylesheetEntry::new(parse_stylesheet(".gone { color: red }")).scoped(),
    );
    sheets.push(
        "screen",
        StylesheetEntry::new(parse_stylesheet("h1 { color: blue } .gone { color: red }"))
            .with_media("screen"),
    );
    let stats = RulesMinifier::default().process(&page.dom, &mut sheets, &[])?;
    let serialized = |key: &str| {
        sheets
            .get(&key)
            .map(|entry| entry.stylesheet.to_string())
            .unwrap_or_default()
    };
    assert_eq!(serialized("print"), "");
    assert_eq!(serialized("shadow"), ".gone{color:red}");
    assert_eq!(serialized("screen"), "h1{color:blue}");
    assert_eq!(
        stats,
        MinifyStats {
            processed: 2,
            discarded: 3
        }
    );
    Ok(())
}

#[test]
fn pushing_a_known_key_replaces_the_sheet() {
    let mut sheets = StylesheetSet::new();
    sheets.push(1_u8, StylesheetEntry::new(parse_stylesheet("a{color:red}")));
    sheets.push(2_u8, StylesheetEntry::new(parse_stylesheet("b{color:red}")));
    sheets.push(1_u8, StylesheetEntry::new(parse_stylesheet("c{color:red}")));
    assert_eq!(sheets.len(), 2);
    let order: Vec<u8> = sheets.iter().map(|(key, _)| *key).collect();
    assert_eq!(order, vec![1, 2]);
    assert_eq!(
        sheets.get(&1).map(|entry| entry.stylesheet.to_string()),
        Some("c{color:red}".to_owned())
    );
}

#[test]
fn closed_document_aborts_the_run() -> Result<(), Box<dyn Error>> {
    let mut page = build_page()?;
    page.dom.close();
    let mut sheets = StylesheetSet::new();
    sheets.push(0_usize, StylesheetEntry::new(parse_stylesheet("h1 { color: red }")));
    let Err(error) = RulesMinifier::default().process(&page.dom, &mut sheets, &[]) else {
        return Err("a closed document must fail the run".into());
    };
    assert!(format!("{error:#}").contains("Failed to match rules of stylesheet 0"));
    Ok(())
}
