//! CSS selector matching engine.
//! See <https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element>

use crate::{
    AttrOperator, AttributeSelector, Combinator, Component, ElementAdapter, PseudoArgument,
    QueryError, Selector, SelectorList,
};
use core::mem;
use cssparser::{Parser, ParserInput, parse_nth};

/// A run of simple selectors plus the combinator that links it to the compound on its left.
struct Compound<'sel> {
    leading: Option<Combinator>,
    simples: Vec<&'sel Component>,
}

/// Match a selector list against an element (any branch).
///
/// # Errors
/// Fails when a branch uses a pseudo-class this engine cannot evaluate.
pub fn matches_selector_list<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    list: &SelectorList,
) -> Result<bool, QueryError> {
    any_matches(adapter, element, list, None)
}

/// Match a complex selector against an element.
///
/// # Errors
/// Fails when the selector uses a pseudo-class this engine cannot evaluate.
pub fn matches_selector<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    selector: &Selector,
) -> Result<bool, QueryError> {
    matches_in_scope(adapter, element, selector, None)
}

fn any_matches<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    list: &SelectorList,
    scope: Option<A::Handle>,
) -> Result<bool, QueryError> {
    for selector in &list.selectors {
        if matches_in_scope(adapter, element, selector, scope)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn matches_in_scope<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    selector: &Selector,
    scope: Option<A::Handle>,
) -> Result<bool, QueryError> {
    let compounds = split_compounds(selector);
    let Some(last) = compounds.len().checked_sub(1) else {
        return Ok(false);
    };
    match_from(adapter, &compounds, last, element, scope)
}

fn split_compounds(selector: &Selector) -> Vec<Compound<'_>> {
    let mut compounds = Vec::new();
    let mut current = Compound {
        leading: None,
        simples: Vec::new(),
    };
    for component in &selector.components {
        if let Component::Combinator(combinator) = component {
            let finished = mem::replace(
                &mut current,
                Compound {
                    leading: Some(*combinator),
                    simples: Vec::new(),
                },
            );
            if !finished.simples.is_empty() || finished.leading.is_some() {
                compounds.push(finished);
            }
        } else {
            current.simples.push(component);
        }
    }
    compounds.push(current);
    compounds
}

/// Right-to-left matching with backtracking over ancestors/siblings.
/// Section 15: Combinators
fn match_from<A: ElementAdapter>(
    adapter: &A,
    compounds: &[Compound<'_>],
    index: usize,
    element: A::Handle,
    scope: Option<A::Handle>,
) -> Result<bool, QueryError> {
    let Some(compound) = compounds.get(index) else {
        return Ok(false);
    };
    if !matches_compound(adapter, element, compound, scope)? {
        return Ok(false);
    }
    let (Some(combinator), Some(previous)) = (compound.leading, index.checked_sub(1)) else {
        return Ok(true);
    };
    match combinator {
        Combinator::Descendant => {
            let mut current = adapter.parent(element);
            while let Some(ancestor) = current {
                if match_from(adapter, compounds, previous, ancestor, scope)? {
                    return Ok(true);
                }
                current = adapter.parent(ancestor);
            }
            Ok(false)
        }
        Combinator::Child => match adapter.parent(element) {
            Some(parent) => match_from(adapter, compounds, previous, parent, scope),
            None => Ok(false),
        },
        Combinator::NextSibling => match adapter.previous_sibling_element(element) {
            Some(sibling) => match_from(adapter, compounds, previous, sibling, scope),
            None => Ok(false),
        },
        Combinator::SubsequentSibling => {
            let mut current = adapter.previous_sibling_element(element);
            while let Some(sibling) = current {
                if match_from(adapter, compounds, previous, sibling, scope)? {
                    return Ok(true);
                }
                current = adapter.previous_sibling_element(sibling);
            }
            Ok(false)
        }
    }
}

fn matches_compound<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    compound: &Compound<'_>,
    scope: Option<A::Handle>,
) -> Result<bool, QueryError> {
    for simple in &compound.simples {
        let matched = match simple {
            Component::Universal { .. } | Component::Combinator(_) => true,
            Component::Type { name, .. } => adapter.tag_name(element).eq_ignore_ascii_case(name),
            Component::Id(id) => adapter.element_id(element) == Some(id.as_str()),
            Component::Class(class) => adapter.has_class(element, class),
            Component::Attribute(attribute) => matches_attribute(adapter, element, attribute),
            Component::PseudoElement { .. } => false,
            Component::Nesting => is_scope(adapter, element, scope),
            Component::PseudoClass { name, argument } => {
                matches_pseudo_class(adapter, element, name, argument.as_ref(), scope)?
            }
        };
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn is_scope<A: ElementAdapter>(adapter: &A, element: A::Handle, scope: Option<A::Handle>) -> bool {
    scope.map_or_else(|| adapter.is_root(element), |anchor| anchor == element)
}

/// Section 6: Attribute selectors
fn matches_attribute<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    attribute: &AttributeSelector,
) -> bool {
    let Some(actual) = adapter.attr(element, &attribute.name) else {
        return false;
    };
    let (Some(operator), Some(expected)) = (attribute.operator, attribute.value.as_deref()) else {
        return true;
    };
    let (actual, expected) = if attribute.case_insensitive == Some(true) {
        (actual.to_ascii_lowercase(), expected.to_ascii_lowercase())
    } else {
        (actual.to_owned(), expected.to_owned())
    };
    match operator {
        AttrOperator::Equal => actual == expected,
        AttrOperator::Includes => {
            !expected.is_empty()
                && !expected.contains(char::is_whitespace)
                && actual
                    .split_ascii_whitespace()
                    .any(|token| token == expected)
        }
        AttrOperator::DashMatch => {
            actual == expected
                || actual
                    .strip_prefix(expected.as_str())
                    .is_some_and(|rest| rest.starts_with('-'))
        }
        AttrOperator::Prefix => !expected.is_empty() && actual.starts_with(expected.as_str()),
        AttrOperator::Suffix => !expected.is_empty() && actual.ends_with(expected.as_str()),
        AttrOperator::Substring => !expected.is_empty() && actual.contains(expected.as_str()),
    }
}

/// Which siblings count when computing a child index.
enum SiblingFilter<'sel> {
    All,
    SameType,
    Matching(&'sel SelectorList),
}

/// Sections 4, 13: Logical combinations and tree-structural pseudo-classes
fn matches_pseudo_class<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    name: &str,
    argument: Option<&PseudoArgument>,
    scope: Option<A::Handle>,
) -> Result<bool, QueryError> {
    match (name, argument) {
        (
            "is" | "where" | "matches" | "-webkit-any" | "-moz-any",
            Some(PseudoArgument::Selectors(list)),
        ) => any_matches(adapter, element, list, scope),
        ("not", Some(PseudoArgument::Selectors(list))) => {
            Ok(!any_matches(adapter, element, list, scope)?)
        }
        ("has", Some(PseudoArgument::Selectors(list))) => matches_has(adapter, element, list),
        ("root", None) => Ok(adapter.is_root(element)),
        ("scope", None) => Ok(is_scope(adapter, element, scope)),
        ("empty", None) => Ok(adapter.is_empty(element)),
        ("first-child", None) => Ok(adapter.previous_sibling_element(element).is_none()),
        ("last-child", None) => Ok(adapter.next_sibling_element(element).is_none()),
        ("only-child", None) => Ok(adapter.previous_sibling_element(element).is_none()
            && adapter.next_sibling_element(element).is_none()),
        ("first-of-type", None) => {
            Ok(sibling_position(adapter, element, false, &SiblingFilter::SameType, scope)? == 1)
        }
        ("last-of-type", None) => {
            Ok(sibling_position(adapter, element, true, &SiblingFilter::SameType, scope)? == 1)
        }
        ("only-of-type", None) => Ok(sibling_position(
            adapter,
            element,
            false,
            &SiblingFilter::SameType,
            scope,
        )? == 1
            && sibling_position(adapter, element, true, &SiblingFilter::SameType, scope)? == 1),
        (
            "nth-child" | "nth-last-child" | "nth-of-type" | "nth-last-of-type",
            Some(PseudoArgument::Nth(nth)),
        ) => {
            let Some((step, offset)) = parse_nth_formula(&nth.formula) else {
                return Err(QueryError::InvalidSelector {
                    selector: nth.formula.clone(),
                    reason: "invalid An+B formula".to_owned(),
                });
            };
            let filter = match (name, nth.of.as_ref()) {
                ("nth-of-type" | "nth-last-of-type", _) => SiblingFilter::SameType,
                (_, Some(of)) => {
                    if !any_matches(adapter, element, of, scope)? {
                        return Ok(false);
                    }
                    SiblingFilter::Matching(of)
                }
                (_, None) => SiblingFilter::All,
            };
            let from_end = name.starts_with("nth-last");
            let position = sibling_position(adapter, element, from_end, &filter, scope)?;
            Ok(nth_matches(step, offset, position))
        }
        ("link" | "any-link", None) => Ok(is_link(adapter, element)),
        ("defined", None) => Ok(true),
        ("disabled", None) => Ok(is_form_control(adapter, element)
            && adapter.attr(element, "disabled").is_some()),
        ("enabled", None) => Ok(is_form_control(adapter, element)
            && adapter.attr(element, "disabled").is_none()),
        ("required", None) => Ok(adapter.attr(element, "required").is_some()),
        ("optional", None) => Ok(is_form_control(adapter, element)
            && adapter.attr(element, "required").is_none()),
        ("lang", Some(PseudoArgument::Raw(range))) => Ok(matches_lang(adapter, element, range)),
        _ => Err(QueryError::UnsupportedPseudoClass {
            name: name.to_owned(),
        }),
    }
}

/// `:has()` anchors every relative branch at the subject element.
/// Section 4.5: The relational pseudo-class
fn matches_has<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    list: &SelectorList,
) -> Result<bool, QueryError> {
    for relative in &list.selectors {
        let mut components = vec![Component::PseudoClass {
            name: "scope".to_owned(),
            argument: None,
        }];
        if !relative.is_relative() {
            components.push(Component::Combinator(Combinator::Descendant));
        }
        components.extend(relative.components.iter().cloned());
        let anchored = Selector::new(components);

        let sibling_search = matches!(
            relative.components.first(),
            Some(Component::Combinator(
                Combinator::NextSibling | Combinator::SubsequentSibling
            ))
        );
        let candidates = if sibling_search {
            let mut found = Vec::new();
            let mut current = adapter.next_sibling_element(element);
            while let Some(sibling) = current {
                found.push(sibling);
                found.extend(descendants(adapter, sibling));
                current = adapter.next_sibling_element(sibling);
            }
            found
        } else {
            descendants(adapter, element)
        };
        for candidate in candidates {
            if matches_in_scope(adapter, candidate, &anchored, Some(element))? {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

fn descendants<A: ElementAdapter>(adapter: &A, element: A::Handle) -> Vec<A::Handle> {
    let mut found = Vec::new();
    let mut stack: Vec<A::Handle> = adapter.first_child_element(element).into_iter().collect();
    while let Some(node) = stack.pop() {
        found.push(node);
        if let Some(next) = adapter.next_sibling_element(node) {
            stack.push(next);
        }
        if let Some(child) = adapter.first_child_element(node) {
            stack.push(child);
        }
    }
    found
}

/// 1-based index of `element` among its siblings that pass `filter`.
fn sibling_position<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    from_end: bool,
    filter: &SiblingFilter<'_>,
    scope: Option<A::Handle>,
) -> Result<i32, QueryError> {
    let step = |node: A::Handle| {
        if from_end {
            adapter.next_sibling_element(node)
        } else {
            adapter.previous_sibling_element(node)
        }
    };
    let mut position = 1_i32;
    let mut current = step(element);
    while let Some(sibling) = current {
        let counts = match filter {
            SiblingFilter::All => true,
            SiblingFilter::SameType => adapter
                .tag_name(sibling)
                .eq_ignore_ascii_case(adapter.tag_name(element)),
            SiblingFilter::Matching(list) => any_matches(adapter, sibling, list, scope)?,
        };
        if counts {
            position = position.saturating_add(1);
        }
        current = step(sibling);
    }
    Ok(position)
}

fn parse_nth_formula(formula: &str) -> Option<(i32, i32)> {
    let mut input = ParserInput::new(formula);
    let mut parser = Parser::new(&mut input);
    let parsed = parse_nth(&mut parser).ok()?;
    parser.expect_exhausted().ok()?;
    Some(parsed)
}

/// True if some n >= 0 satisfies `step * n + offset == position`.
const fn nth_matches(step: i32, offset: i32, position: i32) -> bool {
    if step == 0 {
        return position == offset;
    }
    let distance = position - offset;
    distance % step == 0 && distance / step >= 0
}

fn is_link<A: ElementAdapter>(adapter: &A, element: A::Handle) -> bool {
    let tag = adapter.tag_name(element);
    ["a", "area"]
        .iter()
        .any(|candidate| tag.eq_ignore_ascii_case(candidate))
        && adapter.attr(element, "href").is_some()
}

fn is_form_control<A: ElementAdapter>(adapter: &A, element: A::Handle) -> bool {
    let tag = adapter.tag_name(element);
    [
        "button", "input", "select", "textarea", "optgroup", "option", "fieldset",
    ]
    .iter()
    .any(|candidate| tag.eq_ignore_ascii_case(candidate))
}

/// Section 7.2: The language pseudo-class
fn matches_lang<A: ElementAdapter>(adapter: &A, element: A::Handle, range: &str) -> bool {
    let wanted = range.trim().trim_matches(['"', '\'']).to_ascii_lowercase();
    let mut current = Some(element);
    while let Some(node) = current {
        if let Some(lang) = adapter.attr(node, "lang") {
            let lang = lang.to_ascii_lowercase();
            return lang == wanted
                || lang
                    .strip_prefix(wanted.as_str())
                    .is_some_and(|rest| rest.starts_with('-'));
        }
        current = adapter.parent(node);
    }
    false
}
