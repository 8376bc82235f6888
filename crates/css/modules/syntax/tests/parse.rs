#![cfg(test)]
#![allow(
    clippy::missing_errors_doc,
    reason = "Test helpers return Result for clear propagation"
)]

use core::error::Error;
use css_syntax::{
    AtRuleBody, AtRuleBodyKind, Rule, at_rule_body_kind, parse_declaration_list, parse_rule_list,
    parse_stylesheet,
};

fn minified(css: &str) -> String {
    parse_stylesheet(css).to_string()
}

#[test]
fn style_rules_serialize_minified() {
    assert_eq!(
        minified("a , b > c { color : red ; margin:0 !important }"),
        "a,b>c{color:red;margin:0!important}"
    );
    assert_eq!(minified("p { COLOR: Red; --Brand: #F00 }"), "p{color:Red;--Brand:#F00}");
    assert_eq!(minified("p { color: red !IMPORTANT }"), "p{color:red!important}");
}

#[test]
fn invalid_declarations_are_dropped() {
    assert_eq!(minified("p { color red; margin: 0; : x; width: }"), "p{margin:0}");
}

#[test]
fn at_rules_keep_their_shape() {
    assert_eq!(
        minified("@media screen and (min-width: 10px) { .a { color: red } }"),
        "@media screen and (min-width: 10px){.a{color:red}}"
    );
    assert_eq!(
        minified("@import url(a.css) layer(base);"),
        "@import url(a.css) layer(base);"
    );
    assert_eq!(minified("@layer base, theme;"), "@layer base, theme;");
    assert_eq!(
        minified("@font-face { font-family: X; src: url(x.woff) }"),
        "@font-face{font-family:X;src:url(x.woff)}"
    );
    assert_eq!(
        minified("@keyframes spin { from { rotate: 0deg } }"),
        "@keyframes spin{from { rotate: 0deg }}"
    );
}

#[test]
fn nested_rules_follow_declarations() -> Result<(), Box<dyn Error>> {
    let sheet = parse_stylesheet(".a { color: red; .b { color: blue } &:hover { color: green } }");
    let Some(Rule::Style(outer)) = sheet.rules.first() else {
        return Err("expected a style rule".into());
    };
    assert_eq!(outer.block.declarations.len(), 1);
    assert_eq!(outer.block.rules.len(), 2);
    assert_eq!(
        sheet.to_string(),
        ".a{color:red;.b{color:blue}&:hover{color:green}}"
    );
    Ok(())
}

#[test]
fn nested_conditional_rules_hold_declarations() -> Result<(), Box<dyn Error>> {
    let sheet = parse_stylesheet(".a { @media (width > 1px) { color: red } }");
    let Some(Rule::Style(outer)) = sheet.rules.first() else {
        return Err("expected a style rule".into());
    };
    let Some(Rule::At(media)) = outer.block.rules.first() else {
        return Err("expected a nested @media".into());
    };
    let Some(AtRuleBody::Block(block)) = &media.body else {
        return Err("expected a block body".into());
    };
    assert_eq!(block.declarations.len(), 1);
    Ok(())
}

#[test]
fn unparsable_selectors_are_kept_raw() -> Result<(), Box<dyn Error>> {
    let sheet = parse_stylesheet("a:::b { color: red } p { color: blue }");
    assert_eq!(sheet.rules.len(), 2);
    let Some(Rule::Raw(raw)) = sheet.rules.first() else {
        return Err("expected a raw rule".into());
    };
    assert_eq!(raw, "a:::b{color: red}");
    assert_eq!(sheet.to_string(), "a:::b{color: red}p{color:blue}");
    Ok(())
}

#[test]
fn fragments_parse_with_nesting_context() {
    let nested = parse_rule_list("color: red; .b { color: blue }", true);
    assert_eq!(nested.declarations.len(), 1);
    assert_eq!(nested.rules.len(), 1);

    let top = parse_rule_list(".b { color: blue } .c { color: green }", false);
    assert!(top.declarations.is_empty());
    assert_eq!(top.rules.len(), 2);
}

#[test]
fn declaration_lists_skip_garbage() {
    let declarations = parse_declaration_list("color: red; bogus; margin: 0 !IMPORTANT");
    let summary: Vec<(&str, &str, bool)> = declarations
        .iter()
        .map(|declaration| {
            (
                declaration.property.as_str(),
                declaration.value.as_str(),
                declaration.important,
            )
        })
        .collect();
    assert_eq!(summary, vec![("color", "red", false), ("margin", "0", true)]);
}

#[test]
fn revert_keywords_are_recognized() {
    let declarations = parse_declaration_list("color: revert; margin: REVERT-LAYER; padding: 0");
    let reverting: Vec<bool> = declarations.iter().map(|decl| decl.is_revert()).collect();
    assert_eq!(reverting, vec![true, true, false]);
}

#[test]
fn body_kinds() {
    assert_eq!(at_rule_body_kind("media"), AtRuleBodyKind::Rules);
    assert_eq!(at_rule_body_kind("layer"), AtRuleBodyKind::Rules);
    assert_eq!(at_rule_body_kind("font-face"), AtRuleBodyKind::Declarations);
    assert_eq!(at_rule_body_kind("keyframes"), AtRuleBodyKind::Opaque);
    assert_eq!(at_rule_body_kind("unknown-thing"), AtRuleBodyKind::Opaque);
}
