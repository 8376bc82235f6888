//! Selectors Level 4: selector model, parsing, specificity and element matching.
//! See <https://www.w3.org/TR/selectors-4/>
//!
//! The model keeps enough structure to:
//! - compute specificity, including `:is()/:not()/:has()/:where()` and `:nth-child(… of S)`
//! - rewrite selectors for querying (nesting expansion, stripping unmatchable parts)
//! - match elements through an [`ElementAdapter`]
//! - serialize back to CSS text without losing authored escapes

#![forbid(unsafe_code)]

mod classify;
mod matcher;
mod nesting;
mod parser;
mod query;
mod sanitizer;
mod serialize;
mod specificity;

pub use classify::{is_dynamic_state_pseudo_class, is_unmatchable_pseudo_class};
pub use matcher::{matches_selector, matches_selector_list};
pub use nesting::{contains_nesting, expand_nested_selector};
pub use parser::{SelectorError, parse_selector_list};
pub use query::{QueryError, SelectorQuery, query_selector_all};
pub use sanitizer::{SelectorKey, SelectorSanitizer, sanitize_selector};
pub use specificity::{Specificity, compute_specificity, specificity_of_list};

/// An adapter that abstracts DOM access for selector matching.
/// Implement this for your DOM layer.
///
/// Section 3: Selectors overview and element matching
pub trait ElementAdapter {
    type Handle: Copy + Eq;

    /// Parent element if any (the document node is not an element).
    fn parent(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Previous sibling element, skipping text nodes.
    fn previous_sibling_element(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Next sibling element, skipping text nodes.
    fn next_sibling_element(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// First child element, skipping text nodes.
    fn first_child_element(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Tag name as authored; type selectors compare it ASCII case-insensitively.
    /// Section 5.1: Type selectors
    fn tag_name(&self, element: Self::Handle) -> &str;

    /// Returns Some(id) if the element has an id attribute, else None.
    /// Section 6.7: ID selectors
    fn element_id(&self, element: Self::Handle) -> Option<&str>;

    /// True if the element has the given class token.
    /// Section 6.6: Class selectors
    fn has_class(&self, element: Self::Handle, class: &str) -> bool;

    /// Returns the attribute value if present.
    /// Section 6: Attribute selectors
    fn attr(&self, element: Self::Handle, name: &str) -> Option<&str>;

    /// True if the element has no element children and no non-empty text.
    /// Section 13.2: `:empty`
    fn is_empty(&self, element: Self::Handle) -> bool;

    /// The document element (no parent element).
    /// Section 13.1: `:root`
    fn is_root(&self, element: Self::Handle) -> bool {
        self.parent(element).is_none()
    }
}

/// Combinators between compounds.
/// Section 15: Combinators
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Whitespace.
    Descendant,
    /// `>`
    Child,
    /// `+`
    NextSibling,
    /// `~`
    SubsequentSibling,
}

/// Attribute selector operators.
/// Section 6.1: Attribute presence and value selectors
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttrOperator {
    /// `=`
    Equal,
    /// `~=`
    Includes,
    /// `|=`
    DashMatch,
    /// `^=`
    Prefix,
    /// `$=`
    Suffix,
    /// `*=`
    Substring,
}

/// `[ns|name op "value" i]`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttributeSelector {
    /// `None` when no prefix was written, `Some("")` for `|name`, `Some("*")` for `*|name`.
    pub namespace: Option<String>,
    pub name: String,
    pub operator: Option<AttrOperator>,
    pub value: Option<String>,
    /// `Some(true)` for the `i` flag, `Some(false)` for `s`.
    pub case_insensitive: Option<bool>,
}

/// Argument of an `:nth-*()` pseudo-class.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NthArgument {
    /// The `An+B` text as written (`odd`, `2n+1`, ...).
    pub formula: String,
    /// The `of <selector-list>` clause, only for `:nth-child()`/`:nth-last-child()`.
    pub of: Option<SelectorList>,
}

/// Parsed argument of a functional pseudo-class.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PseudoArgument {
    /// `:is()`, `:where()`, `:not()`, `:has()` and their legacy aliases.
    Selectors(SelectorList),
    /// `:nth-child()` and friends.
    Nth(NthArgument),
    /// Anything else is kept verbatim (`:lang(en)`, `:dir(rtl)`, `:state(x)`).
    Raw(String),
}

/// One node of a complex selector. Compounds are the runs between combinators.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    Combinator(Combinator),
    /// `*` with optional namespace prefix.
    Universal { namespace: Option<String> },
    /// Type selector with optional namespace prefix.
    Type {
        namespace: Option<String>,
        name: String,
    },
    Id(String),
    Class(String),
    Attribute(AttributeSelector),
    PseudoClass {
        name: String,
        argument: Option<PseudoArgument>,
    },
    PseudoElement {
        name: String,
        argument: Option<String>,
    },
    /// The nesting selector `&`.
    Nesting,
}

/// A complex selector: compounds separated by combinators.
/// A leading combinator is allowed (relative selectors in nested rules and `:has()`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Selector {
    pub components: Vec<Component>,
}

impl Selector {
    /// Build a selector from its components.
    #[inline]
    pub const fn new(components: Vec<Component>) -> Self {
        Self { components }
    }

    /// True if the selector starts with a combinator (`> .a`, `+ li`).
    pub fn is_relative(&self) -> bool {
        matches!(self.components.first(), Some(Component::Combinator(_)))
    }

    /// True if any compound, at any depth, carries a pseudo-element.
    pub fn has_pseudo_element(&self) -> bool {
        self.components.iter().any(|component| match component {
            Component::PseudoElement { .. } => true,
            Component::PseudoClass {
                argument: Some(argument),
                ..
            } => argument_selectors(argument).any(Self::has_pseudo_element),
            _ => false,
        })
    }

    /// True if the selector depends on interaction state (`:hover`, `:focus`, ...),
    /// including inside functional pseudo-class arguments.
    pub fn has_dynamic_state(&self) -> bool {
        self.components.iter().any(|component| match component {
            Component::PseudoClass { name, argument } => {
                is_dynamic_state_pseudo_class(name)
                    || argument
                        .as_ref()
                        .is_some_and(|arg| argument_selectors(arg).any(Self::has_dynamic_state))
            }
            _ => false,
        })
    }
}

/// A selector list separated by commas.
/// Section 4.1: Selector lists
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct SelectorList {
    pub selectors: Vec<Selector>,
}

impl SelectorList {
    #[inline]
    pub const fn new(selectors: Vec<Selector>) -> Self {
        Self { selectors }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.selectors.len()
    }
}

/// Iterate the selectors nested in a pseudo-class argument.
fn argument_selectors(argument: &PseudoArgument) -> impl Iterator<Item = &Selector> {
    let list = match argument {
        PseudoArgument::Selectors(list) => Some(list),
        PseudoArgument::Nth(nth) => nth.of.as_ref(),
        PseudoArgument::Raw(_) => None,
    };
    list.into_iter().flat_map(|inner| inner.selectors.iter())
}
