//! CSS Syntax Module Level 3: stylesheet model, parsing and serialization.
//! See <https://www.w3.org/TR/css-syntax-3/>
//!
//! Style rules keep a parsed selector list and may nest further rules
//! (<https://www.w3.org/TR/css-nesting-1/>). Anything that does not parse is kept
//! verbatim as [`Rule::Raw`] so a round trip never loses content.

#![forbid(unsafe_code)]

mod import;
mod parser;
mod serialize;

pub use import::{ImportLayer, ImportPrelude, parse_import_prelude};
pub use parser::{parse_declaration_list, parse_rule_list, parse_stylesheet};

use css_selectors::SelectorList;

/// A single CSS declaration (property: value [!important]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Property name; ASCII-lowercased unless it is a custom property.
    pub property: String,
    /// Raw value text (without trailing !important).
    pub value: String,
    /// Whether the declaration was marked as `!important`.
    pub important: bool,
}

impl Declaration {
    pub fn new(property: &str, value: &str, important: bool) -> Self {
        let property = if property.starts_with("--") {
            property.to_owned()
        } else {
            property.to_ascii_lowercase()
        };
        Self {
            property,
            value: value.to_owned(),
            important,
        }
    }

    /// `revert` / `revert-layer` roll the cascade back instead of setting a value.
    /// See <https://www.w3.org/TR/css-cascade-5/#default>
    pub fn is_revert(&self) -> bool {
        self.value.eq_ignore_ascii_case("revert") || self.value.eq_ignore_ascii_case("revert-layer")
    }
}

/// Contents of a `{}` block: declarations followed by nested rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Block {
    pub declarations: Vec<Declaration>,
    pub rules: Vec<Rule>,
}

impl Block {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.rules.is_empty()
    }
}

/// A style rule: selector list plus block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleRule {
    pub selectors: SelectorList,
    pub block: Block,
    /// Position of the rule in cascade order, assigned while rules are matched.
    pub source_order: Option<u32>,
}

impl StyleRule {
    pub const fn new(selectors: SelectorList, block: Block) -> Self {
        Self {
            selectors,
            block,
            source_order: None,
        }
    }
}

/// Body of an at-rule that has a block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AtRuleBody {
    /// Rules and/or declarations (`@media`, `@layer`, `@font-face`, ...).
    Block(Block),
    /// Content this model does not interpret (`@keyframes`, unknown at-rules).
    Opaque(String),
}

/// An at-rule. `name` is lowercased and excludes the `@`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtRule {
    pub name: String,
    /// Prelude text, trimmed.
    pub prelude: String,
    /// `None` for statement at-rules (`@import ...;`, `@layer a, b;`).
    pub body: Option<AtRuleBody>,
    /// Rules of the imported stylesheet for `@import`, when already resolved.
    pub imported: Option<Vec<Rule>>,
}

impl AtRule {
    /// Rules nested in the block, if the body holds rules.
    pub fn rules(&self) -> Option<&[Rule]> {
        match &self.body {
            Some(AtRuleBody::Block(block)) => Some(&block.rules),
            _ => None,
        }
    }

    /// Mutable access to the nested rules.
    pub fn rules_mut(&mut self) -> Option<&mut Vec<Rule>> {
        match &mut self.body {
            Some(AtRuleBody::Block(block)) => Some(&mut block.rules),
            _ => None,
        }
    }
}

/// A rule in a stylesheet or block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rule {
    Style(StyleRule),
    At(AtRule),
    /// Unparsed text kept verbatim.
    Raw(String),
}

/// A parsed stylesheet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stylesheet {
    /// Top-level rules in source order.
    pub rules: Vec<Rule>,
}

/// How the block of an at-rule is parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AtRuleBodyKind {
    /// Nested rules (plus declarations when nested in a style rule).
    Rules,
    /// A declaration list.
    Declarations,
    /// Kept as raw text.
    Opaque,
}

/// Body kind for an at-rule name (lowercase, without `@`).
pub fn at_rule_body_kind(name: &str) -> AtRuleBodyKind {
    match name {
        "media" | "supports" | "container" | "layer" | "scope" | "starting-style" | "document"
        | "-moz-document" => AtRuleBodyKind::Rules,
        "font-face" | "page" | "counter-style" | "property" | "font-palette-values"
        | "viewport" | "-ms-viewport" | "position-try" | "view-transition" => {
            AtRuleBodyKind::Declarations
        }
        _ => AtRuleBodyKind::Opaque,
    }
}
