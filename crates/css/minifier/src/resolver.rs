//! Per-element cascade resolution over the matches recorded by the matcher.

use crate::{CascadeContext, DeclarationKey, InlineStyle};
use core::hash::Hash;
use css_cascade::{CascadeCandidate, CascadePriority, ContextKey, resolve_cascade};
use log::trace;
use rustc_hash::FxHashMap;

/// Resolve the cascade of every matched element and record the winning declarations.
///
/// Inline declarations take part in the cascade but are never pruned, so they
/// carry no declaration identity.
pub(crate) fn compute_cascade<E: Copy + Eq + Hash>(
    ctx: &mut CascadeContext<E>,
    inline_styles: &[InlineStyle<E>],
) {
    let inline_by_element: FxHashMap<E, &InlineStyle<E>> = inline_styles
        .iter()
        .map(|inline| (inline.element, inline))
        .collect();

    for (element, matches) in &ctx.matched {
        let mut candidates: Vec<CascadeCandidate<Option<DeclarationKey>>> = Vec::new();
        for matched in matches {
            let Some(summaries) = ctx.rules.get(&matched.rule) else {
                continue;
            };
            for (index, summary) in summaries.iter().enumerate() {
                let index = u32::try_from(index).unwrap_or(u32::MAX);
                candidates.push(CascadeCandidate {
                    property: summary.property.clone(),
                    context: matched.context.clone(),
                    priority: CascadePriority::for_rule(
                        summary.important,
                        matched.layer,
                        matched.specificity,
                        matched.rule,
                        index,
                    ),
                    reverting: summary.reverting,
                    declaration: Some(DeclarationKey {
                        rule: matched.rule,
                        index,
                    }),
                });
            }
        }
        if let Some(inline) = inline_by_element.get(element) {
            for (position, declaration) in inline.declarations.iter().enumerate() {
                candidates.push(CascadeCandidate {
                    property: declaration.property.clone(),
                    context: ContextKey::unconditional(),
                    priority: CascadePriority::for_inline(
                        declaration.important,
                        u32::try_from(position).unwrap_or(u32::MAX),
                    ),
                    reverting: declaration.is_revert(),
                    declaration: None,
                });
            }
        }

        let resolved = resolve_cascade(candidates, ctx.options.unlayered_precedence);
        trace!(
            "[MINIFY] {} winning slot(s) for an element with {} matched rule(s)",
            resolved.winners.len(),
            matches.len()
        );
        ctx.winners.extend(
            resolved
                .winners
                .into_values()
                .filter_map(|(_, declaration)| declaration),
        );
        ctx.winners.extend(resolved.reverting.into_iter().flatten());
    }
}
