//! Selector matching: assigns source order, queries the document and drops
//! selector branches and conditional rules that cannot apply.

use crate::context::DeclarationSummary;
use crate::layers::import_conditions;
use crate::{CascadeContext, MatchedSelector, StylesheetEntry};
use core::hash::Hash;
use css_cascade::{ConditionalRule, ContextKey};
use css_media_queries::matches_media_type;
use css_selectors::{
    QueryError, Selector, SelectorKey, SelectorQuery, Specificity, compute_specificity,
    expand_nested_selector,
};
use css_syntax::{AtRule, ImportLayer, Rule, StyleRule, parse_import_prelude};
use log::{debug, trace};

/// Match every rule of one stylesheet.
///
/// A sheet whose own media list cannot apply is emptied.
pub(crate) fn process_stylesheet<D: SelectorQuery>(
    document: &D,
    ctx: &mut CascadeContext<D::Element>,
    sheet_index: usize,
    entry: &mut StylesheetEntry,
) -> Result<(), QueryError> {
    if !entry.applies(&ctx.options) {
        let removed = entry.stylesheet.rules.len();
        debug!(
            "[MINIFY] stylesheet {sheet_index} does not apply to `{}`, dropping {removed} rule(s)",
            entry.media_text.as_deref().unwrap_or_default()
        );
        entry.stylesheet.rules.clear();
        ctx.stats.discarded += removed;
        return Ok(());
    }
    let base_conditions: Vec<ConditionalRule> = entry
        .media_text
        .as_deref()
        .map(str::trim)
        .filter(|media| !media.is_empty())
        .map(|media| vec![ConditionalRule::new("media", media)])
        .unwrap_or_default();
    process_stylesheet_rules(
        document,
        ctx,
        &mut entry.stylesheet.rules,
        &[],
        &[],
        &base_conditions,
    )
}

/// Walk `rules` in order. Rules that cannot apply are removed once the walk
/// over this list is done, and counted as discarded.
pub(crate) fn process_stylesheet_rules<D: SelectorQuery>(
    document: &D,
    ctx: &mut CascadeContext<D::Element>,
    rules: &mut Vec<Rule>,
    ancestors: &[Selector],
    layer_stack: &[String],
    conditional_stack: &[ConditionalRule],
) -> Result<(), QueryError> {
    let mut keep = Vec::with_capacity(rules.len());
    for rule in rules.iter_mut() {
        let retained = match rule {
            Rule::Style(style) => process_style_rule(
                document,
                ctx,
                style,
                ancestors,
                layer_stack,
                conditional_stack,
            )?,
            Rule::At(at_rule) => process_at_rule(
                document,
                ctx,
                at_rule,
                ancestors,
                layer_stack,
                conditional_stack,
            )?,
            Rule::Raw(_) => true,
        };
        keep.push(retained);
    }
    ctx.stats.discarded += retain_by_mask(rules, &keep);
    Ok(())
}

fn process_style_rule<D: SelectorQuery>(
    document: &D,
    ctx: &mut CascadeContext<D::Element>,
    style: &mut StyleRule,
    ancestors: &[Selector],
    layer_stack: &[String],
    conditional_stack: &[ConditionalRule],
) -> Result<bool, QueryError> {
    let source_order = ctx.next_source_order();
    style.source_order = Some(source_order);
    ctx.stats.processed += 1;
    ctx.rules.insert(
        source_order,
        style
            .block
            .declarations
            .iter()
            .map(DeclarationSummary::from)
            .collect(),
    );

    let context = ContextKey::from_stack(conditional_stack);
    let layer = current_layer(ctx, layer_stack);
    let mut expansions = Vec::with_capacity(style.selectors.len());
    let mut matching = Vec::with_capacity(style.selectors.len());
    let mut exempt = false;
    for (branch, selector) in style.selectors.selectors.iter().enumerate() {
        let expanded = expand_nested_selector(selector, ancestors);
        if expanded
            .iter()
            .any(|full| full.has_pseudo_element() || full.has_dynamic_state())
        {
            trace!("[MINIFY] `{selector}` depends on runtime state, keeping rule {source_order}");
            exempt = true;
            matching.push(true);
            expansions.push(expanded);
            continue;
        }
        let specificity = expanded
            .iter()
            .map(compute_specificity)
            .max()
            .unwrap_or(Specificity::ZERO);
        let query = ctx.sanitizer.sanitize(
            SelectorKey {
                rule: source_order,
                branch,
            },
            selector,
            ancestors,
        );
        let elements = ctx.query(document, &query)?;
        for &element in &elements {
            ctx.record_match(
                element,
                MatchedSelector {
                    rule: source_order,
                    specificity,
                    layer,
                    context: context.clone(),
                },
            );
        }
        matching.push(!elements.is_empty());
        expansions.push(expanded);
    }

    if exempt {
        ctx.untouched.insert(source_order);
    } else {
        retain_by_mask(&mut style.selectors.selectors, &matching);
        retain_by_mask(&mut expansions, &matching);
    }
    if style.selectors.is_empty() {
        trace!("[MINIFY] rule {source_order} matches nothing");
        return Ok(false);
    }

    let nested_ancestors: Vec<Selector> = expansions.into_iter().flatten().collect();
    process_stylesheet_rules(
        document,
        ctx,
        &mut style.block.rules,
        &nested_ancestors,
        layer_stack,
        conditional_stack,
    )?;
    Ok(true)
}

fn process_at_rule<D: SelectorQuery>(
    document: &D,
    ctx: &mut CascadeContext<D::Element>,
    at_rule: &mut AtRule,
    ancestors: &[Selector],
    layer_stack: &[String],
    conditional_stack: &[ConditionalRule],
) -> Result<bool, QueryError> {
    let name = at_rule.name.clone();
    match name.as_str() {
        "import" => process_import(document, ctx, at_rule, layer_stack, conditional_stack),
        "layer" => {
            let prelude = at_rule.prelude.clone();
            let Some(rules) = at_rule.rules_mut() else {
                return Ok(true);
            };
            // Anonymous layers are flattened into the enclosing layer.
            let mut nested = layer_stack.to_vec();
            if !prelude.is_empty() {
                nested.push(prelude);
            }
            process_stylesheet_rules(
                document,
                ctx,
                rules,
                ancestors,
                &nested,
                conditional_stack,
            )?;
            Ok(true)
        }
        "media" | "supports" | "container" => {
            if at_rule.rules().is_none() {
                return Ok(true);
            }
            if name == "media"
                && !matches_media_type(&at_rule.prelude, ctx.options.keep_print_stylesheets)
            {
                debug!("[MINIFY] dropping `@media {}`", at_rule.prelude);
                return Ok(false);
            }
            let mut nested = conditional_stack.to_vec();
            nested.push(ConditionalRule::new(&at_rule.name, &at_rule.prelude));
            if let Some(rules) = at_rule.rules_mut() {
                process_stylesheet_rules(
                    document,
                    ctx,
                    rules,
                    ancestors,
                    layer_stack,
                    &nested,
                )?;
            }
            Ok(true)
        }
        _ => Ok(true),
    }
}

/// Walk the rules of a resolved `@import` in place of the import itself.
fn process_import<D: SelectorQuery>(
    document: &D,
    ctx: &mut CascadeContext<D::Element>,
    at_rule: &mut AtRule,
    layer_stack: &[String],
    conditional_stack: &[ConditionalRule],
) -> Result<bool, QueryError> {
    if at_rule.imported.is_none() {
        return Ok(true);
    }
    let prelude = parse_import_prelude(&at_rule.prelude);
    if let Some(import) = &prelude
        && !matches_media_type(&import.media, ctx.options.keep_print_stylesheets)
    {
        debug!("[MINIFY] dropping `@import {}`", at_rule.prelude);
        return Ok(false);
    }

    let mut nested_layers = layer_stack.to_vec();
    let mut nested_conditions = conditional_stack.to_vec();
    if let Some(import) = &prelude {
        if let Some(ImportLayer::Named(layer)) = &import.layer {
            nested_layers.push(layer.clone());
        }
        nested_conditions.extend(import_conditions(import));
    }
    if let Some(imported) = at_rule.imported.as_mut() {
        process_stylesheet_rules(
            document,
            ctx,
            imported,
            &[],
            &nested_layers,
            &nested_conditions,
        )?;
    }
    Ok(true)
}

/// Order of the layer named by the stack; `None` outside any layer.
fn current_layer<E: Copy + Eq + Hash>(
    ctx: &mut CascadeContext<E>,
    layer_stack: &[String],
) -> Option<usize> {
    (!layer_stack.is_empty()).then(|| ctx.layers.declare(&layer_stack.join("."), &[]))
}

/// Keep the items whose flag is set; returns how many were removed.
fn retain_by_mask<T>(items: &mut Vec<T>, keep: &[bool]) -> usize {
    let before = items.len();
    let mut flags = keep.iter().copied();
    items.retain(|_| flags.next().unwrap_or(true));
    before - items.len()
}
