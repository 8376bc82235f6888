//! Cascade layer ordering.
//! See <https://www.w3.org/TR/css-cascade-5/#layer-ordering>

use crate::ConditionalRule;
use log::trace;
use std::collections::HashMap;

/// The first declaration of a layer name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerDeclaration {
    /// Full dot-joined name (`base.reset`).
    pub name: String,
    /// Position in layer order; later layers win for normal declarations.
    pub order: usize,
    /// Conditional rules enclosing the declaration.
    pub conditional_context: Vec<ConditionalRule>,
}

/// Layer order for one run. The first time a name is declared fixes its position.
#[derive(Clone, Debug, Default)]
pub struct LayerOrder {
    declarations: Vec<LayerDeclaration>,
    positions: HashMap<String, usize>,
}

impl LayerOrder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` (a full dotted path) and return its order.
    ///
    /// Only the full name takes a slot: `@layer a.b {}` does not declare `a`.
    /// Section 6.4.2: Declaring a layer
    pub fn declare(&mut self, name: &str, conditional_context: &[ConditionalRule]) -> usize {
        if let Some(&order) = self.positions.get(name) {
            return order;
        }
        let order = self.declarations.len();
        trace!("[CASCADE] layer `{name}` declared at {order}");
        self.positions.insert(name.to_owned(), order);
        self.declarations.push(LayerDeclaration {
            name: name.to_owned(),
            order,
            conditional_context: conditional_context.to_vec(),
        });
        order
    }

    /// Order of a declared layer.
    #[inline]
    pub fn order_of(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Declarations in order.
    #[inline]
    pub fn declarations(&self) -> &[LayerDeclaration] {
        &self.declarations
    }

    /// Layer names in order.
    pub fn names(&self) -> Vec<&str> {
        self.declarations
            .iter()
            .map(|declaration| declaration.name.as_str())
            .collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Join a layer name with the enclosing layer path.
pub fn join_layer_name(enclosing: &[String], name: &str) -> String {
    if enclosing.is_empty() {
        return name.to_owned();
    }
    let mut joined = enclosing.join(".");
    joined.push('.');
    joined.push_str(name);
    joined
}

/// Synthetic name of an anonymous layer: `anonymous-<sheet>-<counter>`.
pub fn anonymous_layer_name(sheet_index: usize, counter: usize) -> String {
    format!("anonymous-{sheet_index}-{counter}")
}
