//! Layer order collection: the first pass over every stylesheet.
//!
//! Anonymous layers get a synthetic per-sheet name here so they take a slot in the
//! order; the matcher flattens their rules into the enclosing layer.

use crate::CascadeContext;
use core::hash::Hash;
use css_cascade::{ConditionalRule, join_layer_name};
use css_syntax::{AtRule, AtRuleBody, ImportLayer, ImportPrelude, Rule, parse_import_prelude};

/// Declare every layer named in `rules`, outermost first.
pub(crate) fn collect_layer_order<E: Copy + Eq + Hash>(
    ctx: &mut CascadeContext<E>,
    sheet_index: usize,
    rules: &[Rule],
    layer_stack: &[String],
    conditional_stack: &[ConditionalRule],
) {
    for rule in rules {
        match rule {
            Rule::Style(style) => collect_layer_order(
                ctx,
                sheet_index,
                &style.block.rules,
                layer_stack,
                conditional_stack,
            ),
            Rule::At(at_rule) => {
                collect_at_rule(ctx, sheet_index, at_rule, layer_stack, conditional_stack);
            }
            Rule::Raw(_) => {}
        }
    }
}

fn collect_at_rule<E: Copy + Eq + Hash>(
    ctx: &mut CascadeContext<E>,
    sheet_index: usize,
    at_rule: &AtRule,
    layer_stack: &[String],
    conditional_stack: &[ConditionalRule],
) {
    match at_rule.name.as_str() {
        "layer" => match &at_rule.body {
            Some(AtRuleBody::Block(block)) => {
                let name = if at_rule.prelude.is_empty() {
                    ctx.next_anonymous_layer(sheet_index)
                } else {
                    at_rule.prelude.clone()
                };
                ctx.layers
                    .declare(&join_layer_name(layer_stack, &name), conditional_stack);
                let mut nested = layer_stack.to_vec();
                nested.push(name);
                collect_layer_order(ctx, sheet_index, &block.rules, &nested, conditional_stack);
            }
            None => {
                for name in at_rule.prelude.split(',').map(str::trim) {
                    if !name.is_empty() {
                        ctx.layers
                            .declare(&join_layer_name(layer_stack, name), conditional_stack);
                    }
                }
            }
            Some(AtRuleBody::Opaque(_)) => {}
        },
        "import" => {
            let Some(imported) = &at_rule.imported else {
                return;
            };
            let prelude = parse_import_prelude(&at_rule.prelude);
            let mut nested_layers = layer_stack.to_vec();
            if let Some(layer) = prelude.as_ref().and_then(|import| import.layer.as_ref()) {
                let name = match layer {
                    ImportLayer::Anonymous => ctx.next_anonymous_layer(sheet_index),
                    ImportLayer::Named(name) => name.clone(),
                };
                ctx.layers
                    .declare(&join_layer_name(layer_stack, &name), conditional_stack);
                nested_layers.push(name);
            }
            let mut nested_conditions = conditional_stack.to_vec();
            if let Some(import) = &prelude {
                nested_conditions.extend(import_conditions(import));
            }
            collect_layer_order(ctx, sheet_index, imported, &nested_layers, &nested_conditions);
        }
        "media" | "supports" | "container" => {
            if let Some(rules) = at_rule.rules() {
                let mut nested = conditional_stack.to_vec();
                nested.push(ConditionalRule::new(&at_rule.name, &at_rule.prelude));
                collect_layer_order(ctx, sheet_index, rules, layer_stack, &nested);
            }
        }
        _ => {}
    }
}

/// Conditions an `@import` places on the imported rules.
pub(crate) fn import_conditions(import: &ImportPrelude) -> Vec<ConditionalRule> {
    let mut conditions = Vec::new();
    if let Some(supports) = &import.supports {
        conditions.push(ConditionalRule::new("supports", supports));
    }
    if !import.media.is_empty() {
        conditions.push(ConditionalRule::new("media", &import.media));
    }
    conditions
}
