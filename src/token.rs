//! Token model and terminal equivalence.
//!
//! A [`Token`] is a single pre-lexed terminal occurrence. Two tokens of class
//! `identifiers` or `constants` are equivalent regardless of lexeme: the
//! *class* is the terminal the parser tables key on, not the lexeme. All
//! other classes compare by `(type, word)`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenClass {
    Identifiers,
    Constants,
    Keywords,
    Operators,
    Ends,
}

impl TokenClass {
    /// Classes whose tokens are equivalent regardless of lexeme.
    fn is_equivalence_class(self) -> bool {
        matches!(self, TokenClass::Identifiers | TokenClass::Constants)
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenClass::Identifiers => "identifiers",
            TokenClass::Constants => "constants",
            TokenClass::Keywords => "keywords",
            TokenClass::Operators => "operators",
            TokenClass::Ends => "ends",
        };
        f.write_str(s)
    }
}

/// A terminal occurrence: a pre-lexed token with source position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub line: usize,
    pub column: usize,
    #[serde(rename = "type")]
    pub class: TokenClass,
    pub word: String,
}

impl Token {
    pub fn new(line: usize, column: usize, class: TokenClass, word: impl Into<String>) -> Self {
        Self {
            line,
            column,
            class,
            word: word.into(),
        }
    }

    /// The distinguished end-of-input terminal `<ends,#>`.
    pub fn end() -> Self {
        Self::new(0, 0, TokenClass::Ends, "#")
    }

    /// Whether this token is the end-of-input terminal.
    pub fn is_end(&self) -> bool {
        self.class == TokenClass::Ends
    }
}

impl Default for Token {
    fn default() -> Self {
        Self::end()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{}>", self.class, self.word)
    }
}

/// Terminal-pattern equivalence: identifiers/constants ignore `word`.
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        if self.class != other.class {
            return false;
        }
        if self.class.is_equivalence_class() {
            return true;
        }
        self.word == other.word
    }
}

impl Eq for Token {}

/// Hashing mirrors equivalence: equivalence classes hash only on `class`.
impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.class.hash(state);
        if !self.class.is_equivalence_class() {
            self.word.hash(state);
        }
    }
}

/// Total order used for deterministic iteration (item-set dedup keys).
impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Token {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        let by_class = (self.class as u8).cmp(&(other.class as u8));
        if by_class != std::cmp::Ordering::Equal {
            return by_class;
        }
        if self.class.is_equivalence_class() {
            return std::cmp::Ordering::Equal;
        }
        self.word.cmp(&other.word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_equivalent_regardless_of_word() {
        let a = Token::new(1, 1, TokenClass::Identifiers, "x");
        let b = Token::new(2, 5, TokenClass::Identifiers, "y");
        assert_eq!(a, b);
    }

    #[test]
    fn operators_compare_by_word() {
        let plus = Token::new(1, 1, TokenClass::Operators, "+");
        let minus = Token::new(1, 1, TokenClass::Operators, "-");
        assert_ne!(plus, minus);
    }

    #[test]
    fn hash_matches_equivalence() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Token::new(1, 1, TokenClass::Constants, "1"));
        assert!(set.contains(&Token::new(9, 9, TokenClass::Constants, "42")));
    }

    #[test]
    fn default_is_end_of_input() {
        assert!(Token::default().is_end());
        assert_eq!(Token::default(), Token::end());
    }

    #[test]
    fn display_renders_simple_form() {
        let t = Token::new(1, 1, TokenClass::Operators, "+");
        assert_eq!(t.to_string(), "<operators,+>");
    }

    #[test]
    fn ord_agrees_with_eq_on_equivalence_classes() {
        let id = Token::new(0, 0, TokenClass::Identifiers, "id");
        let name = Token::new(0, 0, TokenClass::Identifiers, "name");
        assert_eq!(id, name);
        assert_eq!(id.cmp(&name), std::cmp::Ordering::Equal);

        use std::collections::BTreeSet;
        let mut set = BTreeSet::new();
        set.insert(id);
        set.insert(name);
        assert_eq!(set.len(), 1);
    }
}
