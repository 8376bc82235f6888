//! Media Queries Level 4: media type classification for a screen snapshot.
//! See <https://www.w3.org/TR/mediaqueries-4/>
//!
//! Only media *types* are evaluated. Anything richer (feature expressions,
//! `and`/`or`/`not`) is treated as possibly matching, so rules guarded by it are kept.

#![forbid(unsafe_code)]

use cssparser::{Parser, ParserInput, Token};
use log::debug;

/// A media type mentioned in a media query list.
/// Section 2.3: Media types
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaTypeToken {
    /// Lowercased type name (`screen`, `print`, `all`, ...).
    pub name: String,
    /// Preceded by `not`.
    pub negated: bool,
}

/// Flat view of a media query list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MediaList {
    pub types: Vec<MediaTypeToken>,
    /// A `( ... )` feature expression or function appears.
    pub has_features: bool,
    /// `and` / `or` appears.
    pub has_conjunction: bool,
    /// `not` appears.
    pub has_negation: bool,
}

/// Tokenize a media query list into a [`MediaList`].
///
/// Returns `None` when the text contains tokens a media query list cannot hold.
/// Section 3: Syntax
pub fn parse_media_list(media_text: &str) -> Option<MediaList> {
    let mut input = ParserInput::new(media_text);
    let mut parser = Parser::new(&mut input);
    let mut list = MediaList::default();
    let mut negate_next = false;
    loop {
        let token = match parser.next() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        match token {
            Token::Ident(ident) => {
                let lower = ident.to_ascii_lowercase();
                match lower.as_str() {
                    "and" | "or" => list.has_conjunction = true,
                    "not" => {
                        list.has_negation = true;
                        negate_next = true;
                    }
                    "only" => {}
                    _ => {
                        list.types.push(MediaTypeToken {
                            name: lower,
                            negated: negate_next,
                        });
                        negate_next = false;
                    }
                }
            }
            Token::ParenthesisBlock | Token::Function(_) => list.has_features = true,
            Token::Comma => negate_next = false,
            _ => return None,
        }
    }
    Some(list)
}

/// Decide whether rules under `media_text` can apply to a screen rendering.
///
/// - empty text → true
/// - feature expressions, `and`, `or` or `not` anywhere → true
/// - otherwise true if any non-negated type is `screen`, `all`, or `print` when
///   `keep_print_stylesheets` is set
/// - text that does not tokenize as a media list → true
pub fn matches_media_type(media_text: &str, keep_print_stylesheets: bool) -> bool {
    let text = media_text.trim();
    if text.is_empty() {
        return true;
    }
    let Some(list) = parse_media_list(text) else {
        debug!("[MEDIA] unparsable media list `{text}`, keeping it");
        return true;
    };
    if list.has_features || list.has_conjunction || list.has_negation || list.types.is_empty() {
        return true;
    }
    list.types.iter().any(|media_type| {
        !media_type.negated
            && match media_type.name.as_str() {
                "screen" | "all" => true,
                "print" => keep_print_stylesheets,
                _ => false,
            }
    })
}
