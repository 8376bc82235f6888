//! `querySelectorAll`-style access to a document.

use crate::{ElementAdapter, Selector, SelectorError, matches_selector_list, parse_selector_list};
use core::error::Error;
use core::fmt;
use core::hash::Hash;

/// A document that can resolve selector text to the elements it matches.
///
/// Elements are opaque identities; callers keep side tables keyed by them.
pub trait SelectorQuery {
    type Element: Copy + Eq + Hash + fmt::Debug;

    /// All elements matching `selectors`, in document order.
    ///
    /// # Errors
    /// [`QueryError::InvalidSelector`] / [`QueryError::UnsupportedPseudoClass`] when the
    /// selector cannot be evaluated, [`QueryError::DocumentUnavailable`] when the document
    /// itself cannot be queried any more.
    fn query_selector_all(&self, selectors: &str) -> Result<Vec<Self::Element>, QueryError>;
}

/// Why a selector query failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryError {
    /// The engine rejected the selector text.
    InvalidSelector { selector: String, reason: String },
    /// The selector is valid but uses a pseudo-class the engine cannot evaluate.
    UnsupportedPseudoClass { name: String },
    /// The document is gone (detached, closed, crashed).
    DocumentUnavailable { reason: String },
}

impl QueryError {
    /// Fatal errors abort the whole run; the others only affect one selector.
    #[inline]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::DocumentUnavailable { .. })
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSelector { selector, reason } => {
                write!(formatter, "invalid selector `{selector}`: {reason}")
            }
            Self::UnsupportedPseudoClass { name } => {
                write!(formatter, "unsupported pseudo-class `:{name}`")
            }
            Self::DocumentUnavailable { reason } => {
                write!(formatter, "document unavailable: {reason}")
            }
        }
    }
}

impl Error for QueryError {}

impl From<SelectorError> for QueryError {
    fn from(error: SelectorError) -> Self {
        let reason = error.to_string();
        Self::InvalidSelector {
            selector: error.input,
            reason,
        }
    }
}

/// Evaluate `selectors` against `candidates`, keeping their order.
///
/// Relative selectors are rejected, as `querySelectorAll` does.
///
/// # Errors
/// See [`SelectorQuery::query_selector_all`].
pub fn query_selector_all<A, I>(
    adapter: &A,
    candidates: I,
    selectors: &str,
) -> Result<Vec<A::Handle>, QueryError>
where
    A: ElementAdapter,
    I: IntoIterator<Item = A::Handle>,
{
    let list = parse_selector_list(selectors)?;
    if list.selectors.iter().any(Selector::is_relative) {
        return Err(QueryError::InvalidSelector {
            selector: selectors.to_owned(),
            reason: "relative selectors need a scoping element".to_owned(),
        });
    }
    let mut found = Vec::new();
    for candidate in candidates {
        if matches_selector_list(adapter, candidate, &list)? {
            found.push(candidate);
        }
    }
    Ok(found)
}
