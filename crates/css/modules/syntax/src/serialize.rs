//! Minified serialization of the stylesheet model.

use crate::{AtRule, AtRuleBody, Block, Declaration, Rule, StyleRule, Stylesheet};
use core::fmt;
use cssparser::ToCss;

impl ToCss for Declaration {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(&self.property)?;
        dest.write_char(':')?;
        dest.write_str(&self.value)?;
        if self.important {
            dest.write_str("!important")?;
        }
        Ok(())
    }
}

impl ToCss for Block {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_char('{')?;
        for (index, declaration) in self.declarations.iter().enumerate() {
            if index > 0 {
                dest.write_char(';')?;
            }
            declaration.to_css(dest)?;
        }
        if !self.declarations.is_empty() && !self.rules.is_empty() {
            dest.write_char(';')?;
        }
        for rule in &self.rules {
            rule.to_css(dest)?;
        }
        dest.write_char('}')
    }
}

impl ToCss for StyleRule {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        self.selectors.to_css(dest)?;
        self.block.to_css(dest)
    }
}

impl ToCss for AtRule {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_char('@')?;
        dest.write_str(&self.name)?;
        if !self.prelude.is_empty() {
            dest.write_char(' ')?;
            dest.write_str(&self.prelude)?;
        }
        match &self.body {
            None => dest.write_char(';'),
            Some(AtRuleBody::Block(block)) => block.to_css(dest),
            Some(AtRuleBody::Opaque(text)) => {
                dest.write_char('{')?;
                dest.write_str(text)?;
                dest.write_char('}')
            }
        }
    }
}

impl ToCss for Rule {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        match self {
            Self::Style(style) => style.to_css(dest),
            Self::At(at_rule) => at_rule.to_css(dest),
            Self::Raw(text) => dest.write_str(text),
        }
    }
}

impl ToCss for Stylesheet {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        for rule in &self.rules {
            rule.to_css(dest)?;
        }
        Ok(())
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(formatter)
    }
}
