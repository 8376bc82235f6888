//! CSS selector specificity calculation.
//! See <https://www.w3.org/TR/selectors-4/#specificity-rules>

use crate::{Component, PseudoArgument, Selector, SelectorList};

/// Specificity triple (a, b, c): ids, classes/attributes/pseudo-classes, types/pseudo-elements.
/// Ordered lexicographically.
/// Section 17: Calculating a selector's specificity
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// Zero specificity, as contributed by `:where()`.
    pub const ZERO: Self = Self(0, 0, 0);

    #[inline]
    const fn saturating_add(self, other: Self) -> Self {
        Self(
            self.0.saturating_add(other.0),
            self.1.saturating_add(other.1),
            self.2.saturating_add(other.2),
        )
    }
}

/// Compute the specificity of a complex selector (sum over its compounds).
pub fn compute_specificity(selector: &Selector) -> Specificity {
    selector
        .components
        .iter()
        .fold(Specificity::ZERO, |total, component| {
            total.saturating_add(component_specificity(component))
        })
}

/// The most specific branch of a list; zero for an empty list.
/// Section 17: `:is()`, `:not()`, `:has()` take their most specific argument
pub fn specificity_of_list(list: &SelectorList) -> Specificity {
    list.selectors
        .iter()
        .map(compute_specificity)
        .max()
        .unwrap_or_default()
}

fn component_specificity(component: &Component) -> Specificity {
    match component {
        Component::Id(_) => Specificity(1, 0, 0),
        Component::Class(_) | Component::Attribute(_) => Specificity(0, 1, 0),
        Component::Type { .. } | Component::PseudoElement { .. } => Specificity(0, 0, 1),
        Component::PseudoClass { name, argument } => {
            pseudo_class_specificity(name, argument.as_ref())
        }
        Component::Universal { .. } | Component::Combinator(_) | Component::Nesting => {
            Specificity::ZERO
        }
    }
}

fn pseudo_class_specificity(name: &str, argument: Option<&PseudoArgument>) -> Specificity {
    match (name, argument) {
        ("where", _) => Specificity::ZERO,
        // `:scope` is counted with the type selectors.
        ("scope", _) => Specificity(0, 0, 1),
        (
            "is" | "not" | "has" | "matches" | "-webkit-any" | "-moz-any",
            Some(PseudoArgument::Selectors(list)),
        ) => specificity_of_list(list),
        ("nth-child" | "nth-last-child", Some(PseudoArgument::Nth(nth))) => {
            let of = nth
                .of
                .as_ref()
                .map(specificity_of_list)
                .unwrap_or_default();
            Specificity(0, 1, 0).saturating_add(of)
        }
        _ => Specificity(0, 1, 0),
    }
}
