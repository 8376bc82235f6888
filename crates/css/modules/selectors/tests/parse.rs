#![cfg(test)]
#![allow(
    clippy::missing_errors_doc,
    reason = "Test helpers return Result for clear propagation"
)]

use core::error::Error;
use css_selectors::{Combinator, Component, parse_selector_list};
use cssparser::ToCss as _;

fn round_trip(text: &str) -> Result<String, Box<dyn Error>> {
    Ok(parse_selector_list(text)?.to_css_string())
}

#[test]
fn serializes_compactly() -> Result<(), Box<dyn Error>> {
    assert_eq!(round_trip("ul  >  li , a")?, "ul>li,a");
    assert_eq!(round_trip("a:before")?, "a::before");
    assert_eq!(round_trip("[data-x = \"y\" i]")?, "[data-x=\"y\" i]");
    assert_eq!(round_trip("svg|rect")?, "svg|rect");
    assert_eq!(round_trip(".a:is(.b, #c)")?, ".a:is(.b,#c)");
    assert_eq!(round_trip("& .child")?, "& .child");
    Ok(())
}

#[test]
fn keeps_combinators_in_the_component_list() -> Result<(), Box<dyn Error>> {
    let list = parse_selector_list("div > .a ~ p")?;
    let selector = list.selectors.first().ok_or("missing selector")?;
    let combinators: Vec<Combinator> = selector
        .components
        .iter()
        .filter_map(|component| match component {
            Component::Combinator(combinator) => Some(*combinator),
            _ => None,
        })
        .collect();
    assert_eq!(
        combinators,
        vec![Combinator::Child, Combinator::SubsequentSibling]
    );
    Ok(())
}

#[test]
fn classifies_branches() -> Result<(), Box<dyn Error>> {
    let list = parse_selector_list("a:hover, p::after, .x:not(:focus), > .y, .plain")?;
    let flags: Vec<(bool, bool, bool)> = list
        .selectors
        .iter()
        .map(|selector| {
            (
                selector.has_pseudo_element(),
                selector.has_dynamic_state(),
                selector.is_relative(),
            )
        })
        .collect();
    assert_eq!(
        flags,
        vec![
            (false, true, false),
            (true, false, false),
            (false, true, false),
            (false, false, true),
            (false, false, false),
        ]
    );
    Ok(())
}

#[test]
fn forgiving_lists_drop_invalid_branches() -> Result<(), Box<dyn Error>> {
    assert_eq!(round_trip(":is(.a, 1x)")?, ":is(.a)");
    Ok(())
}

#[test]
fn rejects_invalid_selectors() -> Result<(), Box<dyn Error>> {
    for invalid in ["", "a[", ".a,,.b", "a >", "a > > b", "#"] {
        if let Ok(parsed) = parse_selector_list(invalid) {
            return Err(format!("`{invalid}` should not parse, got {parsed}").into());
        }
    }
    Ok(())
}

#[test]
fn error_reports_the_input() -> Result<(), Box<dyn Error>> {
    let Err(error) = parse_selector_list("div > > p") else {
        return Err("`div > > p` should not parse".into());
    };
    assert_eq!(error.input, "div > > p");
    assert!(error.to_string().contains("div > > p"));
    Ok(())
}
