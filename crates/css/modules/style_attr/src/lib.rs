//! CSS Style Attributes: style="..." attribute processing.
//! See <https://www.w3.org/TR/css-style-attr/>

#![forbid(unsafe_code)]

use css_syntax::{Declaration, parse_declaration_list};
use std::collections::HashMap;

/// Parse the value of a `style` attribute into a list of declarations.
///
/// The attribute is a declaration list without braces; invalid items are skipped
/// and `!important` is honoured.
///
/// See <https://www.w3.org/TR/css-style-attr/#interpreting>
pub fn parse_style_attribute(input: &str) -> Vec<Declaration> {
    if input.trim().is_empty() {
        return Vec::new();
    }
    parse_declaration_list(input)
}

/// Keep only the declaration that wins for each property inside one attribute:
/// an `!important` one over a normal one, otherwise the last.
///
/// See <https://www.w3.org/TR/css-cascade-5/#cascade-sort>
pub fn normalize_style_attribute(input: &str) -> Vec<Declaration> {
    let declarations = parse_style_attribute(input);
    let mut winner_for_property: HashMap<&str, usize> = HashMap::new();
    for (index, declaration) in declarations.iter().enumerate() {
        let replaces = winner_for_property
            .get(declaration.property.as_str())
            .and_then(|&current| declarations.get(current))
            .is_none_or(|current| declaration.important || !current.important);
        if replaces {
            winner_for_property.insert(declaration.property.as_str(), index);
        }
    }
    declarations
        .iter()
        .enumerate()
        .filter(|(index, declaration)| {
            winner_for_property.get(declaration.property.as_str()) == Some(index)
        })
        .map(|(_, declaration)| declaration.clone())
        .collect()
}
