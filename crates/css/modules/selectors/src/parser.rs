//! Selector parser on top of the `cssparser` tokenizer.
//! See <https://www.w3.org/TR/selectors-4/#grammar>

use crate::{
    AttrOperator, AttributeSelector, Combinator, Component, NthArgument, PseudoArgument, Selector,
    SelectorList,
};
use core::error::Error;
use core::fmt;
use cssparser::{Delimiter, ParseError, Parser, ParserInput, Token};

/// Pseudo-elements that may be written with a single colon.
/// Section 14: Legacy pseudo-element syntax
const LEGACY_PSEUDO_ELEMENTS: &[&str] = &["before", "after", "first-line", "first-letter"];

/// A selector that could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorError {
    /// The selector text as given.
    pub input: String,
    /// 1-based line of the offending token.
    pub line: u32,
    /// 1-based column of the offending token.
    pub column: u32,
}

impl fmt::Display for SelectorError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "invalid selector `{}` at {}:{}",
            self.input, self.line, self.column
        )
    }
}

impl Error for SelectorError {}

/// Parse a comma-separated selector list.
///
/// Relative selectors (leading combinator) and the nesting selector `&` are accepted;
/// deciding whether they are meaningful is left to the caller.
///
/// # Errors
/// Returns a [`SelectorError`] when any branch is invalid.
pub fn parse_selector_list(input: &str) -> Result<SelectorList, SelectorError> {
    let mut parser_input = ParserInput::new(input);
    let mut parser = Parser::new(&mut parser_input);
    let result = parse_list(&mut parser, false).and_then(|list| {
        parser.expect_exhausted()?;
        Ok(list)
    });
    result.map_err(|err| SelectorError {
        input: input.to_owned(),
        line: err.location.line.saturating_add(1),
        column: err.location.column,
    })
}

/// Parse a selector list. In forgiving mode invalid branches are dropped
/// (`:is()`/`:where()` arguments); otherwise the first invalid branch fails the list.
fn parse_list<'i>(
    input: &mut Parser<'i, '_>,
    forgiving: bool,
) -> Result<SelectorList, ParseError<'i, ()>> {
    let mut selectors = Vec::new();
    loop {
        match input.parse_until_before(Delimiter::Comma, parse_selector) {
            Ok(selector) => selectors.push(selector),
            Err(err) => {
                if !forgiving {
                    return Err(err);
                }
            }
        }
        match input.next() {
            Ok(&Token::Comma) => {}
            Ok(_) => return Err(input.new_custom_error(())),
            Err(_) => break,
        }
    }
    Ok(SelectorList::new(selectors))
}

/// Parse one complex selector up to the end of the (delimited) input.
fn parse_selector<'i>(input: &mut Parser<'i, '_>) -> Result<Selector, ParseError<'i, ()>> {
    let mut components: Vec<Component> = Vec::new();
    let mut pending_descendant = false;
    loop {
        let token = match input.next_including_whitespace() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        let combinator = match token {
            Token::WhiteSpace(_) => {
                pending_descendant = components
                    .last()
                    .is_some_and(|last| !matches!(last, Component::Combinator(_)));
                continue;
            }
            Token::Delim('>') => Some(Combinator::Child),
            Token::Delim('+') => Some(Combinator::NextSibling),
            Token::Delim('~') => Some(Combinator::SubsequentSibling),
            _ => None,
        };
        if let Some(kind) = combinator {
            if matches!(components.last(), Some(Component::Combinator(_))) {
                return Err(input.new_custom_error(()));
            }
            pending_descendant = false;
            components.push(Component::Combinator(kind));
            continue;
        }
        if pending_descendant {
            components.push(Component::Combinator(Combinator::Descendant));
            pending_descendant = false;
        }
        let component = parse_simple(input, token)?;
        components.push(component);
    }
    if components.is_empty() || matches!(components.last(), Some(Component::Combinator(_))) {
        return Err(input.new_custom_error(()));
    }
    Ok(Selector::new(components))
}

/// Parse one simple selector that starts with `token`.
fn parse_simple<'i>(
    input: &mut Parser<'i, '_>,
    token: Token<'i>,
) -> Result<Component, ParseError<'i, ()>> {
    match token {
        Token::Ident(name) => {
            if try_namespace_separator(input) {
                return parse_after_namespace(input, Some(name.to_string()));
            }
            Ok(Component::Type {
                namespace: None,
                name: name.to_string(),
            })
        }
        Token::Delim('*') => {
            if try_namespace_separator(input) {
                return parse_after_namespace(input, Some("*".to_owned()));
            }
            Ok(Component::Universal { namespace: None })
        }
        Token::Delim('|') => parse_after_namespace(input, Some(String::new())),
        Token::IDHash(id) => Ok(Component::Id(id.to_string())),
        Token::Delim('.') => match input.next_including_whitespace()? {
            Token::Ident(class) => Ok(Component::Class(class.to_string())),
            other => {
                let unexpected = other.clone();
                Err(input.new_unexpected_token_error(unexpected))
            }
        },
        Token::Delim('&') => Ok(Component::Nesting),
        Token::SquareBracketBlock => {
            let attribute = input.parse_nested_block(parse_attribute)?;
            Ok(Component::Attribute(attribute))
        }
        Token::Colon => parse_pseudo(input),
        other => Err(input.new_unexpected_token_error(other)),
    }
}

/// Consume a `|` that directly follows the current token, if any.
fn try_namespace_separator(input: &mut Parser<'_, '_>) -> bool {
    input
        .try_parse(|lookahead| match lookahead.next_including_whitespace() {
            Ok(&Token::Delim('|')) => Ok(()),
            _ => Err(()),
        })
        .is_ok()
}

/// Parse the local part of `ns|name` / `ns|*`.
fn parse_after_namespace<'i>(
    input: &mut Parser<'i, '_>,
    namespace: Option<String>,
) -> Result<Component, ParseError<'i, ()>> {
    match input.next_including_whitespace()?.clone() {
        Token::Ident(name) => Ok(Component::Type {
            namespace,
            name: name.to_string(),
        }),
        Token::Delim('*') => Ok(Component::Universal { namespace }),
        other => Err(input.new_unexpected_token_error(other)),
    }
}

/// Parse what follows a `:`.
/// Section 3.6: Pseudo-classes and pseudo-elements
fn parse_pseudo<'i>(input: &mut Parser<'i, '_>) -> Result<Component, ParseError<'i, ()>> {
    match input.next_including_whitespace()?.clone() {
        Token::Colon => match input.next_including_whitespace()?.clone() {
            Token::Ident(name) => Ok(Component::PseudoElement {
                name: name.to_ascii_lowercase(),
                argument: None,
            }),
            Token::Function(name) => {
                let argument = input
                    .parse_nested_block(|block| Ok::<_, ParseError<'i, ()>>(consume_raw(block)))?;
                Ok(Component::PseudoElement {
                    name: name.to_ascii_lowercase(),
                    argument: Some(argument),
                })
            }
            other => Err(input.new_unexpected_token_error(other)),
        },
        Token::Ident(name) => {
            let lower = name.to_ascii_lowercase();
            if LEGACY_PSEUDO_ELEMENTS.contains(&lower.as_str()) {
                return Ok(Component::PseudoElement {
                    name: lower,
                    argument: None,
                });
            }
            Ok(Component::PseudoClass {
                name: lower,
                argument: None,
            })
        }
        Token::Function(name) => {
            let lower = name.to_ascii_lowercase();
            let argument = input.parse_nested_block(|block| parse_pseudo_argument(block, &lower))?;
            Ok(Component::PseudoClass {
                name: lower,
                argument: Some(argument),
            })
        }
        other => Err(input.new_unexpected_token_error(other)),
    }
}

/// Parse the argument of a functional pseudo-class based on its name.
fn parse_pseudo_argument<'i>(
    input: &mut Parser<'i, '_>,
    name: &str,
) -> Result<PseudoArgument, ParseError<'i, ()>> {
    match name {
        "is" | "where" | "matches" | "-webkit-any" | "-moz-any" => {
            Ok(PseudoArgument::Selectors(parse_list(input, true)?))
        }
        "not" | "has" => Ok(PseudoArgument::Selectors(parse_list(input, false)?)),
        "nth-child" | "nth-last-child" => Ok(PseudoArgument::Nth(parse_nth_argument(input, true)?)),
        "nth-of-type" | "nth-last-of-type" | "nth-col" | "nth-last-col" => {
            Ok(PseudoArgument::Nth(parse_nth_argument(input, false)?))
        }
        _ => Ok(PseudoArgument::Raw(consume_raw(input))),
    }
}

/// Parse `An+B [of S]`; the formula is kept as text.
/// Section 13.4: Child-indexed pseudo-classes
fn parse_nth_argument<'i>(
    input: &mut Parser<'i, '_>,
    allow_of: bool,
) -> Result<NthArgument, ParseError<'i, ()>> {
    let start = input.position();
    loop {
        let before = input.position();
        let token = match input.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        if allow_of && matches!(&token, Token::Ident(ident) if ident.eq_ignore_ascii_case("of")) {
            let formula = input.slice(start..before).trim().to_owned();
            if formula.is_empty() {
                return Err(input.new_custom_error(()));
            }
            let of = parse_list(input, false)?;
            return Ok(NthArgument {
                formula,
                of: Some(of),
            });
        }
    }
    let formula = input.slice_from(start).trim().to_owned();
    if formula.is_empty() {
        return Err(input.new_custom_error(()));
    }
    Ok(NthArgument { formula, of: None })
}

/// Parse the inside of `[...]`.
/// Section 6: Attribute selectors
fn parse_attribute<'i>(
    input: &mut Parser<'i, '_>,
) -> Result<AttributeSelector, ParseError<'i, ()>> {
    let (namespace, name) = match input.next()?.clone() {
        Token::Ident(first) => {
            if try_namespace_separator(input) {
                (Some(first.to_string()), expect_ident_owned(input)?)
            } else {
                (None, first.to_string())
            }
        }
        Token::Delim('*') => {
            if !try_namespace_separator(input) {
                return Err(input.new_custom_error(()));
            }
            (Some("*".to_owned()), expect_ident_owned(input)?)
        }
        Token::Delim('|') => (Some(String::new()), expect_ident_owned(input)?),
        other => return Err(input.new_unexpected_token_error(other)),
    };
    let operator = match input.next() {
        Err(_) => {
            return Ok(AttributeSelector {
                namespace,
                name,
                operator: None,
                value: None,
                case_insensitive: None,
            });
        }
        Ok(token) => match token.clone() {
            Token::Delim('=') => AttrOperator::Equal,
            Token::IncludeMatch => AttrOperator::Includes,
            Token::DashMatch => AttrOperator::DashMatch,
            Token::PrefixMatch => AttrOperator::Prefix,
            Token::SuffixMatch => AttrOperator::Suffix,
            Token::SubstringMatch => AttrOperator::Substring,
            other => return Err(input.new_unexpected_token_error(other)),
        },
    };
    let value = match input.next()?.clone() {
        Token::Ident(value) | Token::QuotedString(value) => value.to_string(),
        other => return Err(input.new_unexpected_token_error(other)),
    };
    let case_insensitive = input
        .try_parse(|flag_input| -> Result<bool, ParseError<'i, ()>> {
            let flag = flag_input.expect_ident()?.clone();
            if flag.eq_ignore_ascii_case("i") {
                Ok(true)
            } else if flag.eq_ignore_ascii_case("s") {
                Ok(false)
            } else {
                Err(flag_input.new_custom_error(()))
            }
        })
        .ok();
    Ok(AttributeSelector {
        namespace,
        name,
        operator: Some(operator),
        value: Some(value),
        case_insensitive,
    })
}

fn expect_ident_owned<'i>(input: &mut Parser<'i, '_>) -> Result<String, ParseError<'i, ()>> {
    match input.next_including_whitespace()?.clone() {
        Token::Ident(name) => Ok(name.to_string()),
        other => Err(input.new_unexpected_token_error(other)),
    }
}

/// Consume every remaining token and return the trimmed source text.
fn consume_raw(input: &mut Parser<'_, '_>) -> String {
    let start = input.position();
    while input.next_including_whitespace_and_comments().is_ok() {}
    input.slice_from(start).trim().to_owned()
}
