//! `@import` prelude: `<url> [layer | layer(<name>)]? [supports(<condition>)]? <media-query-list>?`
//! See <https://www.w3.org/TR/css-cascade-5/#at-import>

use cssparser::{ParseError, Parser, ParserInput, Token};

/// Layer clause of an `@import`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportLayer {
    /// Bare `layer`.
    Anonymous,
    /// `layer(name)`.
    Named(String),
}

/// Parsed `@import` prelude.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportPrelude {
    pub url: String,
    pub layer: Option<ImportLayer>,
    /// Condition inside `supports(...)`.
    pub supports: Option<String>,
    /// Trailing media query list; empty when absent.
    pub media: String,
}

fn nested_text<'i>(input: &mut Parser<'i, '_>) -> Option<String> {
    input
        .parse_nested_block(|block| {
            let start = block.position();
            while block.next_including_whitespace_and_comments().is_ok() {}
            Ok::<_, ParseError<'i, ()>>(block.slice_from(start).trim().to_owned())
        })
        .ok()
}

/// Parse an `@import` prelude. Returns `None` when it does not start with a URL.
pub fn parse_import_prelude(prelude: &str) -> Option<ImportPrelude> {
    let mut input = ParserInput::new(prelude);
    let mut parser = Parser::new(&mut input);
    let url = match parser.next().ok()?.clone() {
        Token::UnquotedUrl(url) | Token::QuotedString(url) => url.to_string(),
        Token::Function(name) if name.eq_ignore_ascii_case("url") => nested_text(&mut parser)?
            .trim_matches(|quote| quote == '"' || quote == '\'')
            .to_owned(),
        _ => return None,
    };

    let mut import = ImportPrelude {
        url,
        layer: None,
        supports: None,
        media: String::new(),
    };
    loop {
        let state = parser.state();
        let Ok(token) = parser.next().cloned() else {
            break;
        };
        match token {
            Token::Ident(ident)
                if ident.eq_ignore_ascii_case("layer")
                    && import.layer.is_none()
                    && import.supports.is_none() =>
            {
                import.layer = Some(ImportLayer::Anonymous);
            }
            Token::Function(name)
                if name.eq_ignore_ascii_case("layer")
                    && import.layer.is_none()
                    && import.supports.is_none() =>
            {
                let layer = nested_text(&mut parser)?;
                import.layer = Some(if layer.is_empty() {
                    ImportLayer::Anonymous
                } else {
                    ImportLayer::Named(layer)
                });
            }
            Token::Function(name)
                if name.eq_ignore_ascii_case("supports") && import.supports.is_none() =>
            {
                import.supports = Some(nested_text(&mut parser)?);
            }
            _ => {
                parser.reset(&state);
                let start = parser.position();
                while parser.next_including_whitespace_and_comments().is_ok() {}
                parser.slice_from(start).trim().clone_into(&mut import.media);
                break;
            }
        }
    }
    Some(import)
}
