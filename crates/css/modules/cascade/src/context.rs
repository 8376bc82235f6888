//! Conditional contexts: the stack of `@media`/`@supports`/`@container` rules
//! enclosing a declaration.

use core::fmt;

/// One enclosing conditional group rule.
/// See <https://www.w3.org/TR/css-conditional-3/#processing>
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConditionalRule {
    /// At-rule name without `@` (`media`, `supports`, `container`).
    pub name: String,
    /// Condition text as written.
    pub prelude: String,
}

impl ConditionalRule {
    pub fn new(name: &str, prelude: &str) -> Self {
        Self {
            name: name.to_owned(),
            prelude: prelude.trim().to_owned(),
        }
    }
}

/// Serialized conditional stack. Declarations only compete with declarations
/// that share the exact same key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextKey(String);

impl ContextKey {
    /// The key of declarations outside any conditional rule.
    pub const fn unconditional() -> Self {
        Self(String::new())
    }

    /// Build the key from the stack, outermost first.
    pub fn from_stack(stack: &[ConditionalRule]) -> Self {
        let mut key = String::new();
        for (index, rule) in stack.iter().enumerate() {
            if index > 0 {
                key.push('|');
            }
            key.push_str(&rule.name);
            key.push('(');
            key.push_str(&rule.prelude);
            key.push(')');
        }
        Self(key)
    }

    #[inline]
    pub fn is_unconditional(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
