//! Removal of losing declarations and of rules left empty.

use crate::{CascadeContext, DeclarationKey};
use css_syntax::{AtRule, Rule, StyleRule};

/// Drop every declaration that won for no element, bottom-up.
///
/// Untouched and never evaluated rules keep their declarations, and so does a rule
/// that still has a live nested rule.
pub(crate) fn remove_losing_declarations<E>(rules: &mut [Rule], ctx: &CascadeContext<E>) {
    for rule in rules {
        match rule {
            Rule::Style(style) => prune_style_rule(style, ctx),
            Rule::At(at_rule) => {
                if let Some(children) = at_rule.rules_mut() {
                    remove_losing_declarations(children, ctx);
                }
                if let Some(imported) = at_rule.imported.as_mut() {
                    remove_losing_declarations(imported, ctx);
                }
            }
            Rule::Raw(_) => {}
        }
    }
}

fn prune_style_rule<E>(style: &mut StyleRule, ctx: &CascadeContext<E>) {
    remove_losing_declarations(&mut style.block.rules, ctx);
    let Some(rule) = style.source_order else {
        return;
    };
    if ctx.untouched.contains(&rule) || style.block.rules.iter().any(|child| is_rule_live(child, ctx)) {
        return;
    }
    let mut index = 0_u32;
    style.block.declarations.retain(|declaration| {
        let key = DeclarationKey { rule, index };
        index = index.saturating_add(1);
        declaration.is_revert() || ctx.winners.contains(&key)
    });
}

/// Remove dead rules, bottom-up. Returns how many rules were removed.
pub(crate) fn clean_empty_rules<E>(rules: &mut Vec<Rule>, ctx: &CascadeContext<E>) -> usize {
    let mut removed = 0;
    for rule in rules.iter_mut() {
        match rule {
            Rule::Style(style) => removed += clean_empty_rules(&mut style.block.rules, ctx),
            Rule::At(at_rule) => {
                if is_grouping(at_rule)
                    && let Some(children) = at_rule.rules_mut()
                {
                    removed += clean_empty_rules(children, ctx);
                }
                if let Some(imported) = at_rule.imported.as_mut() {
                    removed += clean_empty_rules(imported, ctx);
                }
            }
            Rule::Raw(_) => {}
        }
    }
    let before = rules.len();
    rules.retain(|rule| is_rule_live(rule, ctx));
    removed + (before - rules.len())
}

/// Conditional and layer blocks: removed once they hold no live rule.
fn is_grouping(at_rule: &AtRule) -> bool {
    matches!(
        at_rule.name.as_str(),
        "media" | "supports" | "container" | "layer"
    ) && at_rule.body.is_some()
}

fn is_rule_live<E>(rule: &Rule, ctx: &CascadeContext<E>) -> bool {
    match rule {
        Rule::Style(style) => {
            !style.block.declarations.is_empty()
                || style
                    .source_order
                    .is_none_or(|order| ctx.untouched.contains(&order))
                || style.block.rules.iter().any(|child| is_rule_live(child, ctx))
        }
        Rule::At(at_rule) => {
            if is_grouping(at_rule) {
                at_rule
                    .rules()
                    .is_none_or(|children| children.iter().any(|child| is_rule_live(child, ctx)))
            } else if let Some(imported) = &at_rule.imported {
                imported.iter().any(|child| is_rule_live(child, ctx))
            } else {
                true
            }
        }
        Rule::Raw(_) => true,
    }
}
