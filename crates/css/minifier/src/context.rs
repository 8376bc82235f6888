//! Scratch state of one minifier run.

use crate::{MinifierOptions, MinifyStats};
use core::fmt;
use core::hash::Hash;
use css_cascade::{ContextKey, LayerOrder, anonymous_layer_name};
use css_selectors::{QueryError, SelectorQuery, SelectorSanitizer, Specificity};
use css_syntax::Declaration;
use log::{trace, warn};
use rustc_hash::{FxHashMap, FxHashSet};

/// Identity of a declaration: the source order of its rule and its index in the block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclarationKey {
    pub rule: u32,
    pub index: u32,
}

/// A selector branch that matched an element, with its cascade metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchedSelector {
    /// Source order of the rule.
    pub rule: u32,
    /// Maximum specificity over the nesting expansion of the branch.
    pub specificity: Specificity,
    /// Order of the enclosing layer; `None` when unlayered.
    pub layer: Option<usize>,
    pub context: ContextKey,
}

/// What the resolver needs to know about a declaration.
#[derive(Clone, Debug)]
pub(crate) struct DeclarationSummary {
    pub property: String,
    pub important: bool,
    pub reverting: bool,
}

impl From<&Declaration> for DeclarationSummary {
    fn from(declaration: &Declaration) -> Self {
        Self {
            property: declaration.property.clone(),
            important: declaration.important,
            reverting: declaration.is_revert(),
        }
    }
}

/// Everything a run accumulates, owned by the run and dropped with it.
///
/// Matches are kept in a side table keyed by element identity, so the document
/// is only ever read.
pub struct CascadeContext<E> {
    pub(crate) options: MinifierOptions,
    pub(crate) layers: LayerOrder,
    anonymous_layers: usize,
    pub(crate) sanitizer: SelectorSanitizer,
    query_cache: FxHashMap<String, Vec<E>>,
    pub(crate) matched: FxHashMap<E, Vec<MatchedSelector>>,
    pub(crate) rules: FxHashMap<u32, Vec<DeclarationSummary>>,
    /// Rules with a branch that cannot be evaluated statically; kept verbatim.
    pub(crate) untouched: FxHashSet<u32>,
    pub(crate) winners: FxHashSet<DeclarationKey>,
    next_source_order: u32,
    pub(crate) stats: MinifyStats,
}

impl<E: fmt::Debug> fmt::Debug for CascadeContext<E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CascadeContext")
            .field("options", &self.options)
            .field("layers", &self.layers)
            .field("matched_elements", &self.matched.len())
            .field("rules", &self.rules.len())
            .field("untouched", &self.untouched.len())
            .field("winners", &self.winners.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<E: Copy + Eq + Hash> CascadeContext<E> {
    pub fn new(options: MinifierOptions) -> Self {
        Self {
            options,
            layers: LayerOrder::new(),
            anonymous_layers: 0,
            sanitizer: SelectorSanitizer::new(),
            query_cache: FxHashMap::default(),
            matched: FxHashMap::default(),
            rules: FxHashMap::default(),
            untouched: FxHashSet::default(),
            winners: FxHashSet::default(),
            next_source_order: 0,
            stats: MinifyStats::default(),
        }
    }

    #[inline]
    pub const fn options(&self) -> &MinifierOptions {
        &self.options
    }

    /// Layer order collected so far.
    #[inline]
    pub const fn layers(&self) -> &LayerOrder {
        &self.layers
    }

    #[inline]
    pub const fn stats(&self) -> MinifyStats {
        self.stats
    }

    /// Selectors that matched `element`, in source order.
    pub fn matched_selectors(&self, element: E) -> &[MatchedSelector] {
        self.matched.get(&element).map_or(&[], Vec::as_slice)
    }

    pub fn is_winner(&self, key: DeclarationKey) -> bool {
        self.winners.contains(&key)
    }

    pub fn is_untouched(&self, rule: u32) -> bool {
        self.untouched.contains(&rule)
    }

    /// Anonymous layers are numbered per stylesheet.
    pub(crate) const fn start_stylesheet(&mut self) {
        self.anonymous_layers = 0;
    }

    pub(crate) fn next_anonymous_layer(&mut self, sheet_index: usize) -> String {
        let name = anonymous_layer_name(sheet_index, self.anonymous_layers);
        self.anonymous_layers += 1;
        name
    }

    pub(crate) const fn next_source_order(&mut self) -> u32 {
        let order = self.next_source_order;
        self.next_source_order = self.next_source_order.saturating_add(1);
        order
    }

    /// Query the document, caching by selector text.
    ///
    /// Localized failures match nothing; a fatal one is returned.
    pub(crate) fn query<D>(&mut self, document: &D, selectors: &str) -> Result<Vec<E>, QueryError>
    where
        D: SelectorQuery<Element = E>,
    {
        if let Some(cached) = self.query_cache.get(selectors) {
            return Ok(cached.clone());
        }
        let found = match document.query_selector_all(selectors) {
            Ok(found) => found,
            Err(error) if error.is_fatal() => return Err(error),
            Err(error) => {
                warn!("[MINIFY] treating `{selectors}` as matching nothing: {error}");
                Vec::new()
            }
        };
        trace!("[MINIFY] `{selectors}` matched {} element(s)", found.len());
        self.query_cache.insert(selectors.to_owned(), found.clone());
        Ok(found)
    }

    /// Record a match, keeping one entry per (element, rule) with the highest specificity.
    pub(crate) fn record_match(&mut self, element: E, matched: MatchedSelector) {
        let entries = self.matched.entry(element).or_default();
        if let Some(last) = entries.last_mut()
            && last.rule == matched.rule
            && last.context == matched.context
        {
            last.specificity = last.specificity.max(matched.specificity);
            return;
        }
        entries.push(matched);
    }
}
