#![cfg(test)]
#![allow(
    clippy::missing_errors_doc,
    reason = "Test helpers return Result for clear propagation"
)]

mod common;

use common::{build_page, minify_one};
use core::error::Error;
use css_cascade::UnlayeredPrecedence;
use css_minifier::{MinifierOptions, RulesMinifier, StylesheetEntry, StylesheetSet};
use css_syntax::{Rule, Stylesheet, parse_stylesheet};

const ABOVE_LAYERS: MinifierOptions = MinifierOptions {
    keep_print_stylesheets: false,
    unlayered_precedence: UnlayeredPrecedence::AboveLayers,
};

#[test]
fn later_layer_wins_normal_declarations() -> Result<(), Box<dyn Error>> {
    let page = build_page()?;
    let (output, _) = minify_one(
        &page.dom,
        "@layer base, theme; @layer theme { h1 { color: red } } @layer base { h1 { color: blue } }",
        &[],
        MinifierOptions::default(),
    )?;
    assert_eq!(output, "@layer base, theme;@layer theme{h1{color:red}}");
    Ok(())
}

#[test]
fn earlier_layer_wins_important_declarations() -> Result<(), Box<dyn Error>> {
    let page = build_page()?;
    let (output, _) = minify_one(
        &page.dom,
        "@layer base, theme; @layer theme { h1 { color: red !important } } @layer base { h1 { color: blue !important } }",
        &[],
        MinifierOptions::default(),
    )?;
    assert_eq!(output, "@layer base, theme;@layer base{h1{color:blue!important}}");
    Ok(())
}

#[test]
fn unlayered_precedence_is_configurable() -> Result<(), Box<dyn Error>> {
    let page = build_page()?;
    let css = "h1 { color: green } @layer base { .title { color: blue } }";

    let (below, _) = minify_one(&page.dom, css, &[], MinifierOptions::default())?;
    assert_eq!(below, "@layer base{.title{color:blue}}");

    let (above, _) = minify_one(&page.dom, css, &[], ABOVE_LAYERS)?;
    assert_eq!(above, "h1{color:green}");
    Ok(())
}

#[test]
fn nested_layers_follow_declaration_order() -> Result<(), Box<dyn Error>> {
    let page = build_page()?;
    let (output, _) = minify_one(
        &page.dom,
        "@layer a { h1 { color: red } @layer b { h1 { color: blue } } }",
        &[],
        MinifierOptions::default(),
    )?;
    assert_eq!(output, "@layer a{@layer b{h1{color:blue}}}");

    // `a.b` is declared before `a`, so `a` is the later layer.
    let (output, _) = minify_one(
        &page.dom,
        "@layer x; @layer a.b { h1 { color: red } } @layer a { h1 { color: blue } }",
        &[],
        MinifierOptions::default(),
    )?;
    assert_eq!(output, "@layer x;@layer a{h1{color:blue}}");
    Ok(())
}

#[test]
fn anonymous_layers_are_flattened() -> Result<(), Box<dyn Error>> {
    let page = build_page()?;
    let (output, _) = minify_one(
        &page.dom,
        "@layer { h1 { color: red } } h1 { color: blue }",
        &[],
        MinifierOptions::default(),
    )?;
    assert_eq!(output, "h1{color:blue}");

    let (output, _) = minify_one(
        &page.dom,
        "@layer base { h1 { color: red } } @layer { h1 { color: blue } }",
        &[],
        MinifierOptions::default(),
    )?;
    assert_eq!(output, "@layer base{h1{color:red}}");

    let (output, _) = minify_one(
        &page.dom,
        "@layer base { @layer { h1 { color: red } } } @layer theme { h1 { color: blue } }",
        &[],
        MinifierOptions::default(),
    )?;
    assert_eq!(output, "@layer theme{h1{color:blue}}");
    Ok(())
}

fn sheet_with_import(prelude: &str, imported: &str, rest: &str) -> Stylesheet {
    let mut sheet = parse_stylesheet(&format!("@import {prelude}; {rest}"));
    if let Some(Rule::At(import)) = sheet.rules.first_mut() {
        import.imported = Some(parse_stylesheet(imported).rules);
    }
    sheet
}

#[test]
fn imported_rules_cascade_in_their_layer() -> Result<(), Box<dyn Error>> {
    let page = build_page()?;
    let mut sheets = StylesheetSet::new();
    sheets.push(
        0_usize,
        StylesheetEntry::new(sheet_with_import(
            "url(a.css) layer(base)",
            "h1 { color: blue } .gone { color: red }",
            "h1 { color: green }",
        )),
    );
    let stats = RulesMinifier::default().process(&page.dom, &mut sheets, &[])?;
    let Some(entry) = sheets.get(&0) else {
        return Err("missing sheet".into());
    };
    assert_eq!(entry.stylesheet.to_string(), "@import url(a.css) layer(base);");
    let Some(Rule::At(import)) = entry.stylesheet.rules.first() else {
        return Err("the import rule must survive".into());
    };
    let imported = Stylesheet {
        rules: import.imported.clone().unwrap_or_default(),
    };
    assert_eq!(imported.to_string(), "h1{color:blue}");
    assert_eq!(stats.processed, 3);
    assert_eq!(stats.discarded, 2);
    Ok(())
}

#[test]
fn imports_for_other_media_are_dropped() -> Result<(), Box<dyn Error>> {
    let page = build_page()?;
    let mut sheets = StylesheetSet::new();
    sheets.push(
        0_usize,
        StylesheetEntry::new(sheet_with_import(
            "url(p.css) print",
            "h1 { color: blue }",
            "h1 { color: green }",
        )),
    );
    let stats = RulesMinifier::default().process(&page.dom, &mut sheets, &[])?;
    assert_eq!(
        sheets.get(&0).map(|entry| entry.stylesheet.to_string()),
        Some("h1{color:green}".to_owned())
    );
    assert_eq!(stats.discarded, 1);
    Ok(())
}

#[test]
fn unresolved_imports_are_kept() -> Result<(), Box<dyn Error>> {
    let page = build_page()?;
    let (output, _) = minify_one(
        &page.dom,
        "@import url(print.css) print; h1 { color: red }",
        &[],
        MinifierOptions::default(),
    )?;
    assert_eq!(output, "@import url(print.css) print;h1{color:red}");
    Ok(())
}
