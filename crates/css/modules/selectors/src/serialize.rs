//! Serialization of selectors back to CSS text.
//! See <https://drafts.csswg.org/cssom/#serializing-selectors>

use crate::{
    AttrOperator, AttributeSelector, Combinator, Component, NthArgument, PseudoArgument, Selector,
    SelectorList,
};
use core::fmt;
use cssparser::{ToCss, serialize_identifier, serialize_string};

impl ToCss for SelectorList {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        for (index, selector) in self.selectors.iter().enumerate() {
            if index > 0 {
                dest.write_char(',')?;
            }
            selector.to_css(dest)?;
        }
        Ok(())
    }
}

impl ToCss for Selector {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        for component in &self.components {
            component.to_css(dest)?;
        }
        Ok(())
    }
}

impl ToCss for Combinator {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_char(match self {
            Self::Descendant => ' ',
            Self::Child => '>',
            Self::NextSibling => '+',
            Self::SubsequentSibling => '~',
        })
    }
}

impl ToCss for Component {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        match self {
            Self::Combinator(combinator) => combinator.to_css(dest),
            Self::Universal { namespace } => {
                write_namespace(namespace.as_deref(), dest)?;
                dest.write_char('*')
            }
            Self::Type { namespace, name } => {
                write_namespace(namespace.as_deref(), dest)?;
                serialize_identifier(name, dest)
            }
            Self::Id(id) => {
                dest.write_char('#')?;
                serialize_identifier(id, dest)
            }
            Self::Class(class) => {
                dest.write_char('.')?;
                serialize_identifier(class, dest)
            }
            Self::Attribute(attribute) => attribute.to_css(dest),
            Self::PseudoClass { name, argument } => {
                dest.write_char(':')?;
                dest.write_str(name)?;
                if let Some(argument) = argument {
                    dest.write_char('(')?;
                    argument.to_css(dest)?;
                    dest.write_char(')')?;
                }
                Ok(())
            }
            Self::PseudoElement { name, argument } => {
                dest.write_str("::")?;
                dest.write_str(name)?;
                if let Some(argument) = argument {
                    dest.write_char('(')?;
                    dest.write_str(argument)?;
                    dest.write_char(')')?;
                }
                Ok(())
            }
            Self::Nesting => dest.write_char('&'),
        }
    }
}

impl ToCss for PseudoArgument {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        match self {
            Self::Selectors(list) => list.to_css(dest),
            Self::Nth(nth) => nth.to_css(dest),
            Self::Raw(raw) => dest.write_str(raw),
        }
    }
}

impl ToCss for NthArgument {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(&self.formula)?;
        if let Some(of) = &self.of {
            dest.write_str(" of ")?;
            of.to_css(dest)?;
        }
        Ok(())
    }
}

impl ToCss for AttributeSelector {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_char('[')?;
        write_namespace(self.namespace.as_deref(), dest)?;
        serialize_identifier(&self.name, dest)?;
        if let (Some(operator), Some(value)) = (self.operator, self.value.as_deref()) {
            dest.write_str(match operator {
                AttrOperator::Equal => "=",
                AttrOperator::Includes => "~=",
                AttrOperator::DashMatch => "|=",
                AttrOperator::Prefix => "^=",
                AttrOperator::Suffix => "$=",
                AttrOperator::Substring => "*=",
            })?;
            serialize_string(value, dest)?;
            match self.case_insensitive {
                Some(true) => dest.write_str(" i")?,
                Some(false) => dest.write_str(" s")?,
                None => {}
            }
        }
        dest.write_char(']')
    }
}

fn write_namespace<W: fmt::Write>(namespace: Option<&str>, dest: &mut W) -> fmt::Result {
    match namespace {
        None => Ok(()),
        Some("*") => dest.write_str("*|"),
        Some(prefix) => {
            if !prefix.is_empty() {
                serialize_identifier(prefix, dest)?;
            }
            dest.write_char('|')
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(formatter)
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(formatter)
    }
}
