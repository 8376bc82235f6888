//! Stylesheet parser on top of `cssparser`'s rule and declaration parsers.
//! See <https://www.w3.org/TR/css-syntax-3/#parsing>

use crate::{
    AtRule, AtRuleBody, AtRuleBodyKind, Block, Declaration, Rule, StyleRule, Stylesheet,
    at_rule_body_kind,
};
use css_selectors::{SelectorList, parse_selector_list};
use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, StyleSheetParser, Token,
};
use log::debug;

/// Selector prelude of a qualified rule; the raw text when it does not parse.
type StylePrelude = Result<SelectorList, String>;

/// Name and raw prelude of an at-rule.
struct AtPrelude {
    name: String,
    prelude: String,
}

/// An item of a rule body.
enum BodyItem {
    Declaration(Declaration),
    Rule(Rule),
}

/// Parse `!important` at the end of a value, returning (`value_without_important`, `important_flag`).
fn split_important_tail(value: &str) -> (String, bool) {
    let trimmed = value.trim();
    if let Some(bang) = trimmed.rfind('!')
        && let Some(tail) = trimmed.get(bang + 1..)
        && tail.trim().eq_ignore_ascii_case("important")
        && let Some(head) = trimmed.get(..bang)
    {
        return (head.trim_end().to_owned(), true);
    }
    (trimmed.to_owned(), false)
}

/// Consume every remaining token and return the trimmed source text.
fn consume_raw(input: &mut Parser<'_, '_>) -> String {
    let start = input.position();
    while input.next_including_whitespace_and_comments().is_ok() {}
    input.slice_from(start).trim().to_owned()
}

fn parse_style_prelude(input: &mut Parser<'_, '_>) -> StylePrelude {
    let raw = consume_raw(input);
    parse_selector_list(&raw).map_err(|err| {
        debug!("[SYNTAX] keeping unparsed rule: {err}");
        raw
    })
}

fn build_style_rule(prelude: StylePrelude, input: &mut Parser<'_, '_>) -> Rule {
    match prelude {
        Ok(selectors) => Rule::Style(StyleRule::new(
            selectors,
            parse_block_contents(input, true, true, true),
        )),
        Err(raw) => {
            let body = consume_raw(input);
            Rule::Raw(format!("{raw}{{{body}}}"))
        }
    }
}

fn build_at_rule(prelude: AtPrelude, input: &mut Parser<'_, '_>, in_style_rule: bool) -> Rule {
    let body = match at_rule_body_kind(&prelude.name) {
        AtRuleBodyKind::Rules => {
            AtRuleBody::Block(parse_block_contents(input, in_style_rule, true, in_style_rule))
        }
        AtRuleBodyKind::Declarations => {
            AtRuleBody::Block(parse_block_contents(input, true, false, false))
        }
        AtRuleBodyKind::Opaque => AtRuleBody::Opaque(consume_raw(input)),
    };
    Rule::At(AtRule {
        name: prelude.name,
        prelude: prelude.prelude,
        body: Some(body),
        imported: None,
    })
}

fn build_statement_at_rule(prelude: AtPrelude) -> Rule {
    Rule::At(AtRule {
        name: prelude.name,
        prelude: prelude.prelude,
        body: None,
        imported: None,
    })
}

/// Parse a block body into declarations and rules.
///
/// Items that fail to parse are dropped, except when they contain a `{}` block:
/// those are kept as [`Rule::Raw`] so nothing structural is lost.
fn parse_block_contents(
    input: &mut Parser<'_, '_>,
    declarations: bool,
    rules: bool,
    in_style_rule: bool,
) -> Block {
    let mut body = BodyParser {
        declarations,
        rules,
        in_style_rule,
    };
    let mut block = Block::default();
    for item in RuleBodyParser::new(input, &mut body) {
        match item {
            Ok(BodyItem::Declaration(declaration)) => block.declarations.push(declaration),
            Ok(BodyItem::Rule(rule)) => block.rules.push(rule),
            Err((_, slice)) => {
                let text = slice.trim();
                if text.contains('{') {
                    block.rules.push(Rule::Raw(text.to_owned()));
                } else if !text.is_empty() {
                    debug!("[SYNTAX] dropping invalid declaration `{text}`");
                }
            }
        }
    }
    block
}

/// Parser for the inside of a `{}` block.
struct BodyParser {
    declarations: bool,
    rules: bool,
    in_style_rule: bool,
}

impl<'i> DeclarationParser<'i> for BodyParser {
    type Declaration = BodyItem;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _declaration_start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let start = input.position();
        loop {
            let is_block = match input.next_including_whitespace_and_comments() {
                Ok(token) => matches!(token, Token::CurlyBracketBlock),
                Err(_) => break,
            };
            // `a:hover { ... }` inside a style rule is a nested rule, not a declaration.
            if is_block {
                return Err(input.new_custom_error(()));
            }
        }
        let (value, important) = split_important_tail(input.slice_from(start));
        if value.is_empty() {
            return Err(input.new_custom_error(()));
        }
        Ok(BodyItem::Declaration(Declaration::new(&name, &value, important)))
    }
}

impl<'i> AtRuleParser<'i> for BodyParser {
    type Prelude = AtPrelude;
    type AtRule = BodyItem;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Ok(AtPrelude {
            name: name.to_ascii_lowercase(),
            prelude: consume_raw(input),
        })
    }

    fn rule_without_block(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
    ) -> Result<Self::AtRule, ()> {
        Ok(BodyItem::Rule(build_statement_at_rule(prelude)))
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        Ok(BodyItem::Rule(build_at_rule(prelude, input, self.in_style_rule)))
    }
}

impl<'i> QualifiedRuleParser<'i> for BodyParser {
    type Prelude = StylePrelude;
    type QualifiedRule = BodyItem;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Ok(parse_style_prelude(input))
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        Ok(BodyItem::Rule(build_style_rule(prelude, input)))
    }
}

impl<'i> RuleBodyItemParser<'i, BodyItem, ()> for BodyParser {
    fn parse_declarations(&self) -> bool {
        self.declarations
    }

    fn parse_qualified(&self) -> bool {
        self.rules
    }
}

/// Top-level parser building [`Rule`]s.
struct TopLevelParser;

impl<'i> AtRuleParser<'i> for TopLevelParser {
    type Prelude = AtPrelude;
    type AtRule = Rule;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Ok(AtPrelude {
            name: name.to_ascii_lowercase(),
            prelude: consume_raw(input),
        })
    }

    fn rule_without_block(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
    ) -> Result<Self::AtRule, ()> {
        Ok(build_statement_at_rule(prelude))
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        Ok(build_at_rule(prelude, input, false))
    }
}

impl<'i> QualifiedRuleParser<'i> for TopLevelParser {
    type Prelude = StylePrelude;
    type QualifiedRule = Rule;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Ok(parse_style_prelude(input))
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        Ok(build_style_rule(prelude, input))
    }
}

/// Parse a full stylesheet.
pub fn parse_stylesheet(css: &str) -> Stylesheet {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut top = TopLevelParser;
    let mut sheet = Stylesheet::default();
    for item in StyleSheetParser::new(&mut parser, &mut top) {
        match item {
            Ok(rule) => sheet.rules.push(rule),
            Err((_, slice)) => {
                let text = slice.trim();
                if !text.is_empty() {
                    sheet.rules.push(Rule::Raw(text.to_owned()));
                }
            }
        }
    }
    sheet
}

/// Parse a fragment of rules as found inside a block.
///
/// With `in_style_rule` the fragment may also carry declarations (CSS Nesting).
pub fn parse_rule_list(css: &str, in_style_rule: bool) -> Block {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    parse_block_contents(&mut parser, in_style_rule, true, in_style_rule)
}

/// Parse a declaration list such as the value of a `style` attribute.
pub fn parse_declaration_list(css: &str) -> Vec<Declaration> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    parse_block_contents(&mut parser, true, false, false).declarations
}
