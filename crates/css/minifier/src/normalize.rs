//! Tree fixups run before any other pass, so every pass sees the same rules.

use core::mem;
use css_selectors::{Component, Selector, SelectorList};
use css_syntax::{AtRuleBody, Block, Rule, StyleRule, parse_rule_list};
use log::debug;

/// Re-parse raw blocks and wrap bare declarations of nested conditional rules.
pub(crate) fn normalize_rules(rules: &mut Vec<Rule>, in_style_rule: bool) {
    let mut index = 0;
    while index < rules.len() {
        if let Some(Rule::Raw(text)) = rules.get(index)
            && let Some(replacement) = reparse_raw(text, in_style_rule)
        {
            // Spliced rules are visited by the next iteration.
            rules.splice(index..=index, replacement);
            continue;
        }
        if let Some(rule) = rules.get_mut(index) {
            normalize_rule(rule, in_style_rule);
        }
        index += 1;
    }
}

fn normalize_rule(rule: &mut Rule, in_style_rule: bool) {
    match rule {
        Rule::Style(style) => normalize_rules(&mut style.block.rules, true),
        Rule::At(at_rule) => {
            if let Some(AtRuleBody::Block(block)) = &mut at_rule.body {
                if in_style_rule && !block.declarations.is_empty() {
                    wrap_nested_declarations(block);
                }
                normalize_rules(&mut block.rules, in_style_rule);
            }
            if let Some(imported) = at_rule.imported.as_mut() {
                normalize_rules(imported, false);
            }
        }
        Rule::Raw(_) => {}
    }
}

/// A raw item with balanced braces is replaced by the rules it parses to, as long as
/// it parses completely into rules.
fn reparse_raw(text: &str, in_style_rule: bool) -> Option<Vec<Rule>> {
    if !text.contains('{') || !has_balanced_braces(text) {
        return None;
    }
    let fragment = parse_rule_list(text, in_style_rule);
    let complete = !fragment.rules.is_empty()
        && fragment.declarations.is_empty()
        && !fragment
            .rules
            .iter()
            .any(|rule| matches!(rule, Rule::Raw(_)));
    if !complete {
        debug!("[MINIFY] keeping raw block `{text}`");
        return None;
    }
    Some(fragment.rules)
}

fn has_balanced_braces(text: &str) -> bool {
    let mut depth = 0_usize;
    for character in text.chars() {
        match character {
            '{' => depth += 1,
            '}' => {
                let Some(next) = depth.checked_sub(1) else {
                    return false;
                };
                depth = next;
            }
            _ => {}
        }
    }
    depth == 0
}

/// `.a { @media x { color: red } }` holds its declarations in an implicit `& {}` rule.
fn wrap_nested_declarations(block: &mut Block) {
    let declarations = mem::take(&mut block.declarations);
    let nesting = SelectorList::new(vec![Selector::new(vec![Component::Nesting])]);
    block.rules.insert(
        0,
        Rule::Style(StyleRule::new(
            nesting,
            Block {
                declarations,
                rules: Vec::new(),
            },
        )),
    );
}
