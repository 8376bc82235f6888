//! Resolution of nested style rule selectors against their ancestors.
//! See <https://www.w3.org/TR/css-nesting-1/#nest-selector>

use crate::{Combinator, Component, NthArgument, PseudoArgument, Selector, SelectorList};
use cssparser::ToCss as _;
use std::collections::HashSet;

/// True if `&` appears anywhere in the selector, including pseudo-class arguments.
pub fn contains_nesting(selector: &Selector) -> bool {
    selector.components.iter().any(|component| match component {
        Component::Nesting => true,
        Component::PseudoClass {
            argument: Some(PseudoArgument::Selectors(list)),
            ..
        } => list.selectors.iter().any(contains_nesting),
        Component::PseudoClass {
            argument:
                Some(PseudoArgument::Nth(NthArgument {
                    of: Some(list), ..
                })),
            ..
        } => list.selectors.iter().any(contains_nesting),
        _ => false,
    })
}

/// Expand a nested selector against every branch of its (already resolved) parent.
///
/// One selector is produced per ancestor branch, deduplicated by serialized text.
/// With `&` the ancestor takes its place; without it the child is combined as a
/// descendant (or with its own leading combinator). Without ancestors the selector
/// is returned unchanged.
pub fn expand_nested_selector(selector: &Selector, ancestors: &[Selector]) -> Vec<Selector> {
    if ancestors.is_empty() {
        return vec![selector.clone()];
    }
    let nested = contains_nesting(selector);
    let mut seen = HashSet::new();
    let mut expanded = Vec::with_capacity(ancestors.len());
    for ancestor in ancestors {
        let candidate = if nested {
            replace_nesting(selector, ancestor)
        } else {
            combine_with_ancestor(selector, ancestor)
        };
        if seen.insert(candidate.to_css_string()) {
            expanded.push(candidate);
        }
    }
    expanded
}

fn combine_with_ancestor(selector: &Selector, ancestor: &Selector) -> Selector {
    let mut components = ancestor.components.clone();
    if !selector.is_relative() {
        components.push(Component::Combinator(Combinator::Descendant));
    }
    components.extend(selector.components.iter().cloned());
    Selector::new(components)
}

/// Substitute `ancestor` for every `&`.
///
/// When `&` opens a compound the ancestor is spliced in textually; elsewhere
/// (`.a&`, or a relative ancestor) it is wrapped as `:is(ancestor)`, which has
/// the same specificity.
fn replace_nesting(selector: &Selector, ancestor: &Selector) -> Selector {
    let mut components = Vec::with_capacity(selector.components.len() + ancestor.components.len());
    let mut compound_start = true;
    for component in &selector.components {
        match component {
            Component::Nesting => {
                if compound_start && !ancestor.is_relative() {
                    components.extend(ancestor.components.iter().cloned());
                } else {
                    components.push(Component::PseudoClass {
                        name: "is".to_owned(),
                        argument: Some(PseudoArgument::Selectors(SelectorList::new(vec![
                            ancestor.clone(),
                        ]))),
                    });
                }
                compound_start = false;
            }
            Component::Combinator(_) => {
                components.push(component.clone());
                compound_start = true;
            }
            Component::PseudoClass {
                name,
                argument: Some(argument),
            } => {
                components.push(Component::PseudoClass {
                    name: name.clone(),
                    argument: Some(replace_in_argument(argument, ancestor)),
                });
                compound_start = false;
            }
            other => {
                components.push(other.clone());
                compound_start = false;
            }
        }
    }
    Selector::new(components)
}

fn replace_in_argument(argument: &PseudoArgument, ancestor: &Selector) -> PseudoArgument {
    let replace_list = |list: &SelectorList| {
        SelectorList::new(
            list.selectors
                .iter()
                .map(|inner| {
                    if contains_nesting(inner) {
                        replace_nesting(inner, ancestor)
                    } else {
                        inner.clone()
                    }
                })
                .collect(),
        )
    };
    match argument {
        PseudoArgument::Selectors(list) => PseudoArgument::Selectors(replace_list(list)),
        PseudoArgument::Nth(nth) => PseudoArgument::Nth(NthArgument {
            formula: nth.formula.clone(),
            of: nth.of.as_ref().map(replace_list),
        }),
        PseudoArgument::Raw(raw) => PseudoArgument::Raw(raw.clone()),
    }
}
