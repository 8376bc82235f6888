//! CSS Cascading and Inheritance Level 5: cascade sorting with layers.
//! See <https://www.w3.org/TR/css-cascade-5/>

#![forbid(unsafe_code)]

mod context;
mod layers;
mod resolve;

pub use context::{ConditionalRule, ContextKey};
pub use layers::{LayerDeclaration, LayerOrder, anonymous_layer_name, join_layer_name};
pub use resolve::{CascadeCandidate, CascadeSlot, ResolvedCascade, resolve_cascade};

use core::cmp::Ordering;
use css_selectors::Specificity;
use serde::Deserialize;

/// Where unlayered declarations sit relative to layered ones.
/// Section 6.4: Cascade layers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnlayeredPrecedence {
    /// Unlayered declarations rank before every layer: they lose to layered normal
    /// declarations and win over layered `!important` ones.
    #[default]
    BelowLayers,
    /// Unlayered declarations form an implicit final layer, as CSS Cascade 5 orders them.
    AboveLayers,
}

/// Priority tuple used to order declarations in the cascade.
/// Section 6: Cascade sorting order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CascadePriority {
    /// Section 6.3: Importance
    pub important: bool,
    /// Declared in the element's `style` attribute.
    /// Section 6.1: Element-attached styles
    pub inline: bool,
    /// Order index of the declaring layer; `None` when unlayered.
    pub layer: Option<usize>,
    pub specificity: Specificity,
    /// Source order index of the declaring rule.
    pub source_order: u32,
    /// Index of the declaration inside its rule.
    pub position: u32,
}

impl CascadePriority {
    /// A declaration of a style rule.
    #[inline]
    pub const fn for_rule(
        important: bool,
        layer: Option<usize>,
        specificity: Specificity,
        source_order: u32,
        position: u32,
    ) -> Self {
        Self {
            important,
            inline: false,
            layer,
            specificity,
            source_order,
            position,
        }
    }

    /// A declaration of a `style` attribute.
    #[inline]
    pub const fn for_inline(important: bool, position: u32) -> Self {
        Self {
            important,
            inline: true,
            layer: None,
            specificity: Specificity::ZERO,
            source_order: u32::MAX,
            position,
        }
    }
}

/// Compare two `CascadePriority` values according to the cascade rules.
/// Return `Ordering::Greater` if `left` should win over `right`.
/// Section 6: Cascade sorting order
pub fn compare_priority(
    left: &CascadePriority,
    right: &CascadePriority,
    unlayered: UnlayeredPrecedence,
) -> Ordering {
    // Importance first (important wins)
    if left.important != right.important {
        return bool_order_desc(left.important, right.important);
    }

    if left.inline != right.inline {
        return bool_order_desc(left.inline, right.inline);
    }

    // Layers: later wins for normal declarations, earlier wins for important ones.
    let left_rank = layer_rank(left.layer, unlayered);
    let right_rank = layer_rank(right.layer, unlayered);
    if left_rank != right_rank {
        let ordering = left_rank.cmp(&right_rank);
        return if left.important {
            ordering.reverse()
        } else {
            ordering
        };
    }

    // Specificity: higher wins
    if left.specificity != right.specificity {
        return left.specificity.cmp(&right.specificity);
    }

    // Source order: later wins
    left.source_order
        .cmp(&right.source_order)
        .then(left.position.cmp(&right.position))
}

/// Return ordering where true > false.
const fn bool_order_desc(a_true_wins: bool, b_true_wins: bool) -> Ordering {
    match (a_true_wins, b_true_wins) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

/// Position of a layer in normal-declaration precedence order.
const fn layer_rank(layer: Option<usize>, unlayered: UnlayeredPrecedence) -> usize {
    match (layer, unlayered) {
        (Some(order), _) => order.saturating_add(1),
        (None, UnlayeredPrecedence::BelowLayers) => 0,
        (None, UnlayeredPrecedence::AboveLayers) => usize::MAX,
    }
}
