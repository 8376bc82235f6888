//! Rewriting of authored selectors into text a document query engine accepts.
//!
//! Pseudo-elements, pseudo-classes that cannot match a static snapshot, namespace
//! prefixes and unresolved `&` are removed. A compound emptied by the removal becomes
//! `*`, so the rewritten selector only ever matches more elements, never fewer.

use crate::{
    Component, NthArgument, PseudoArgument, Selector, SelectorList, expand_nested_selector,
    is_unmatchable_pseudo_class,
};
use cssparser::ToCss as _;
use std::collections::{HashMap, HashSet};

/// Identity of one selector branch during a run: owning rule and branch index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SelectorKey {
    /// Source order of the owning style rule.
    pub rule: u32,
    /// Index of the branch in the rule's selector list.
    pub branch: usize,
}

/// Memoizing sanitizer. Each branch is rewritten once per run.
#[derive(Debug, Default)]
pub struct SelectorSanitizer {
    cache: HashMap<SelectorKey, String>,
}

impl SelectorSanitizer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand `selector` against its ancestors and strip what cannot be queried.
    ///
    /// The result is a comma-separated list (one entry per distinct expansion),
    /// never empty: a selector with nothing left becomes `*`.
    pub fn sanitize(
        &mut self,
        key: SelectorKey,
        selector: &Selector,
        ancestors: &[Selector],
    ) -> String {
        if let Some(cached) = self.cache.get(&key) {
            return cached.clone();
        }
        let mut seen = HashSet::new();
        let mut parts = Vec::new();
        for expanded in expand_nested_selector(selector, ancestors) {
            let text = sanitize_selector(&expanded);
            if seen.insert(text.clone()) {
                parts.push(text);
            }
        }
        let text = parts.join(",");
        self.cache.insert(key, text.clone());
        text
    }

    /// Number of memoized branches.
    #[inline]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Uncached form of [`SelectorSanitizer::sanitize`] for a selector without ancestors.
pub fn sanitize_selector(selector: &Selector) -> String {
    strip_selector(selector, false).map_or_else(|| "*".to_owned(), |stripped| stripped.to_css_string())
}

/// Per-compound bookkeeping while stripping.
#[derive(Default)]
struct CompoundState {
    /// Something was written in this compound.
    touched: bool,
    /// Something survived in this compound.
    kept: bool,
}

impl CompoundState {
    fn close(&mut self, components: &mut Vec<Component>) {
        if self.touched && !self.kept {
            components.push(Component::Universal { namespace: None });
        }
        *self = Self::default();
    }
}

fn strip_selector(selector: &Selector, keep_leading_combinator: bool) -> Option<Selector> {
    let mut components: Vec<Component> = Vec::with_capacity(selector.components.len());
    let mut compound = CompoundState::default();
    for component in &selector.components {
        match component {
            Component::Combinator(combinator) => {
                compound.close(&mut components);
                if components.is_empty() && !keep_leading_combinator {
                    continue;
                }
                components.push(Component::Combinator(*combinator));
            }
            Component::PseudoElement { .. } | Component::Nesting => compound.touched = true,
            Component::PseudoClass { name, .. } if is_unmatchable_pseudo_class(name) => {
                compound.touched = true;
            }
            Component::PseudoClass {
                name,
                argument: Some(argument),
            } => {
                compound.touched = true;
                if let Some(stripped) = strip_argument(name, argument) {
                    components.push(Component::PseudoClass {
                        name: name.clone(),
                        argument: Some(stripped),
                    });
                    compound.kept = true;
                }
            }
            Component::Type {
                namespace: Some(_),
                name,
            } => {
                components.push(Component::Type {
                    namespace: None,
                    name: name.clone(),
                });
                compound.touched = true;
                compound.kept = true;
            }
            Component::Universal { namespace: Some(_) } => {
                components.push(Component::Universal { namespace: None });
                compound.touched = true;
                compound.kept = true;
            }
            other => {
                components.push(other.clone());
                compound.touched = true;
                compound.kept = true;
            }
        }
    }
    compound.close(&mut components);
    while matches!(components.last(), Some(Component::Combinator(_))) {
        components.pop();
    }
    let only_combinator = components
        .iter()
        .all(|component| matches!(component, Component::Combinator(_)));
    (!only_combinator).then(|| Selector::new(components))
}

/// Strip inside a functional pseudo-class; `None` means the pseudo-class must go.
///
/// A rewritten `:not()` argument would match more and so exclude more; such a
/// `:not()` is dropped instead.
fn strip_argument(name: &str, argument: &PseudoArgument) -> Option<PseudoArgument> {
    match argument {
        PseudoArgument::Selectors(list) => {
            let stripped = strip_list(list);
            if stripped.is_empty() || (name == "not" && stripped != *list) {
                return None;
            }
            Some(PseudoArgument::Selectors(stripped))
        }
        PseudoArgument::Nth(nth) => Some(PseudoArgument::Nth(NthArgument {
            formula: nth.formula.clone(),
            of: nth
                .of
                .as_ref()
                .map(strip_list)
                .filter(|list| !list.is_empty()),
        })),
        PseudoArgument::Raw(raw) => Some(PseudoArgument::Raw(raw.clone())),
    }
}

fn strip_list(list: &SelectorList) -> SelectorList {
    SelectorList::new(
        list.selectors
            .iter()
            .filter_map(|inner| strip_selector(inner, true))
            .collect(),
    )
}
