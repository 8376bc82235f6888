//! Cascade-driven stylesheet minifier.
//!
//! Given a captured document, the stylesheets that apply to it and the inline `style`
//! declarations of its elements, works out which declarations win the cascade on some
//! element and removes everything else: losing declarations, selector branches that
//! match nothing and rules left empty. Stylesheets are pruned in place.
//!
//! A run is a fixed sequence of passes over one [`CascadeContext`]:
//! 1. normalize raw and nested-declaration fragments,
//! 2. collect layer order,
//! 3. match selectors against the document,
//! 4. resolve the cascade per element,
//! 5. prune losing declarations and clean up empty rules.

#![forbid(unsafe_code)]

mod config;
mod context;
mod layers;
mod matcher;
mod normalize;
mod prune;
mod resolver;

pub use config::MinifierOptions;
pub use context::{CascadeContext, DeclarationKey, MatchedSelector};

use anyhow::{Context as _, Result};
use css_media_queries::matches_media_type;
use css_selectors::SelectorQuery;
use css_style_attr::normalize_style_attribute;
use css_syntax::{Declaration, Stylesheet};
use log::debug;
use serde::Serialize;

/// A stylesheet as handed to the minifier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StylesheetEntry {
    pub stylesheet: Stylesheet,
    /// Scoped sheets (shadow roots, `<style scoped>`) are left alone.
    pub scoped: bool,
    /// `media` attribute of the owning `<link>`/`<style>`.
    pub media_text: Option<String>,
}

impl StylesheetEntry {
    pub const fn new(stylesheet: Stylesheet) -> Self {
        Self {
            stylesheet,
            scoped: false,
            media_text: None,
        }
    }

    #[must_use]
    pub fn with_media(mut self, media_text: &str) -> Self {
        self.media_text = Some(media_text.to_owned());
        self
    }

    #[must_use]
    pub const fn scoped(mut self) -> Self {
        self.scoped = true;
        self
    }

    /// Whether the owning media list allows the sheet to apply.
    fn applies(&self, options: &MinifierOptions) -> bool {
        self.media_text
            .as_deref()
            .is_none_or(|media| matches_media_type(media, options.keep_print_stylesheets))
    }
}

/// Stylesheets in document order, keyed by their origin (owner node, URL, ...).
#[derive(Clone, Debug)]
pub struct StylesheetSet<K> {
    entries: Vec<(K, StylesheetEntry)>,
}

impl<K> Default for StylesheetSet<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq> StylesheetSet<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stylesheet; an existing entry with the same key is replaced in place.
    pub fn push(&mut self, key: K, entry: StylesheetEntry) {
        if let Some(slot) = self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            slot.1 = entry;
        } else {
            self.entries.push((key, entry));
        }
    }

    pub fn get(&self, key: &K) -> Option<&StylesheetEntry> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, entry)| entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(K, StylesheetEntry)> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (K, StylesheetEntry)> {
        self.entries.iter_mut()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Declarations of an element's `style` attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineStyle<E> {
    pub element: E,
    pub declarations: Vec<Declaration>,
}

impl<E> InlineStyle<E> {
    /// Parse the value of a `style` attribute, keeping one declaration per property.
    pub fn parse(element: E, style_attribute: &str) -> Self {
        Self {
            element,
            declarations: normalize_style_attribute(style_attribute),
        }
    }
}

/// Counters reported by a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MinifyStats {
    /// Style rules examined.
    pub processed: usize,
    /// Rules removed.
    pub discarded: usize,
}

/// Entry point of the minifier.
#[derive(Clone, Copy, Debug, Default)]
pub struct RulesMinifier {
    options: MinifierOptions,
}

impl RulesMinifier {
    pub const fn new(options: MinifierOptions) -> Self {
        Self { options }
    }

    #[inline]
    pub const fn options(&self) -> &MinifierOptions {
        &self.options
    }

    /// Prune `stylesheets` against `document`.
    ///
    /// # Errors
    /// When the document cannot be queried any more. Mutations already applied to
    /// the stylesheets stay applied.
    pub fn process<D, K>(
        &self,
        document: &D,
        stylesheets: &mut StylesheetSet<K>,
        inline_styles: &[InlineStyle<D::Element>],
    ) -> Result<MinifyStats>
    where
        D: SelectorQuery,
    {
        let mut ctx = CascadeContext::new(self.options);

        for (_, entry) in &mut stylesheets.entries {
            normalize::normalize_rules(&mut entry.stylesheet.rules, false);
        }

        for (sheet_index, (_, entry)) in stylesheets.entries.iter().enumerate() {
            if entry.scoped || !entry.applies(&self.options) {
                continue;
            }
            ctx.start_stylesheet();
            layers::collect_layer_order(&mut ctx, sheet_index, &entry.stylesheet.rules, &[], &[]);
        }
        debug!("[MINIFY] layer order: {:?}", ctx.layers.names());

        for (sheet_index, (_, entry)) in stylesheets.entries.iter_mut().enumerate() {
            if entry.scoped {
                continue;
            }
            ctx.start_stylesheet();
            matcher::process_stylesheet(document, &mut ctx, sheet_index, entry)
                .with_context(|| format!("Failed to match rules of stylesheet {sheet_index}"))?;
        }
        debug!(
            "[MINIFY] {} rule(s) processed, {} element(s) matched",
            ctx.stats.processed,
            ctx.matched.len()
        );

        resolver::compute_cascade(&mut ctx, inline_styles);
        debug!("[MINIFY] {} winning declaration(s)", ctx.winners.len());

        for (_, entry) in &mut stylesheets.entries {
            if entry.scoped {
                continue;
            }
            prune::remove_losing_declarations(&mut entry.stylesheet.rules, &ctx);
            let removed = prune::clean_empty_rules(&mut entry.stylesheet.rules, &ctx);
            ctx.stats.discarded += removed;
        }
        debug!(
            "[MINIFY] done: {} processed, {} discarded",
            ctx.stats.processed, ctx.stats.discarded
        );
        Ok(ctx.stats)
    }
}

/// Run a [`RulesMinifier`] once.
///
/// # Errors
/// See [`RulesMinifier::process`].
pub fn minify_stylesheets<D, K>(
    document: &D,
    stylesheets: &mut StylesheetSet<K>,
    inline_styles: &[InlineStyle<D::Element>],
    options: MinifierOptions,
) -> Result<MinifyStats>
where
    D: SelectorQuery,
{
    RulesMinifier::new(options).process(document, stylesheets, inline_styles)
}
