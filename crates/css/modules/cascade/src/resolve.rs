//! Winner selection among the declarations that apply to one element.

use crate::{CascadePriority, ContextKey, UnlayeredPrecedence, compare_priority};
use core::cmp::Ordering;
use std::collections::HashMap;

/// A declaration competing for one element.
#[derive(Clone, Debug)]
pub struct CascadeCandidate<T> {
    pub property: String,
    pub context: ContextKey,
    pub priority: CascadePriority,
    /// `revert` / `revert-layer`: recorded but never displaces anything.
    pub reverting: bool,
    /// Caller-side identity of the declaration.
    pub declaration: T,
}

/// A property within a conditional context.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CascadeSlot {
    pub context: ContextKey,
    pub property: String,
}

/// Outcome of [`resolve_cascade`].
#[derive(Clone, Debug)]
pub struct ResolvedCascade<T> {
    /// Winning declaration and its priority per slot.
    pub winners: HashMap<CascadeSlot, (CascadePriority, T)>,
    /// Reverting declarations, kept unconditionally.
    pub reverting: Vec<T>,
}

impl<T> Default for ResolvedCascade<T> {
    fn default() -> Self {
        Self {
            winners: HashMap::new(),
            reverting: Vec::new(),
        }
    }
}

/// Pick the cascade winner of every (context, property) slot.
/// See <https://www.w3.org/TR/css-cascade-5/#cascade-sort>
pub fn resolve_cascade<T, I>(candidates: I, unlayered: UnlayeredPrecedence) -> ResolvedCascade<T>
where
    I: IntoIterator<Item = CascadeCandidate<T>>,
{
    let mut resolved = ResolvedCascade::default();
    for candidate in candidates {
        if candidate.reverting {
            resolved.reverting.push(candidate.declaration);
            continue;
        }
        let slot = CascadeSlot {
            context: candidate.context,
            property: candidate.property,
        };
        let replaces = resolved.winners.get(&slot).is_none_or(|(current, _)| {
            compare_priority(&candidate.priority, current, unlayered) == Ordering::Greater
        });
        if replaces {
            resolved
                .winners
                .insert(slot, (candidate.priority, candidate.declaration));
        }
    }
    resolved
}
