//! Productions and the indexed formula store.

use crate::element::{FormulaElement, Symbol};
use crate::error::GrammarLoadError;
use std::collections::HashMap;
use std::fmt;

/// A production `lhs -> rhs`. `rhs` is never empty (no epsilon productions).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Formula {
    pub lhs: Symbol,
    pub rhs: Vec<FormulaElement>,
}

impl Formula {
    pub fn new(lhs: Symbol, rhs: Vec<FormulaElement>) -> Self {
        Self { lhs, rhs }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rhs: Vec<String> = self.rhs.iter().map(|e| e.to_string()).collect();
        write!(f, "{} -> {}", self.lhs, rhs.join(" "))
    }
}

/// An ordered, indexed list of formulas plus an LHS lookup index.
///
/// Formula index is stable and doubles as the reduce-action payload
/// (`ActionEntry::Reduce(index)`). Index 0 is the augmented start production.
#[derive(Debug, Clone)]
pub struct FormulaStore {
    formulas: Vec<Formula>,
    by_lhs: HashMap<Symbol, Vec<usize>>,
}

impl FormulaStore {
    /// Builds a store from an ordered formula list. The first formula is the
    /// augmented start production; its LHS must not appear on the RHS of any
    /// other production.
    pub fn new(formulas: Vec<Formula>) -> Result<Self, GrammarLoadError> {
        if formulas.is_empty() {
            return Err(GrammarLoadError::EmptyInput);
        }
        for formula in &formulas {
            if formula.rhs.is_empty() {
                return Err(GrammarLoadError::EmptyProduction(formula.to_string()));
            }
        }

        let start_symbol = formulas[0].lhs.clone();
        for formula in &formulas[1..] {
            let appears = formula
                .rhs
                .iter()
                .any(|e| e.as_nonterminal() == Some(&start_symbol));
            if appears {
                return Err(GrammarLoadError::StartSymbolNotAugmented(
                    start_symbol.to_string(),
                ));
            }
        }

        let mut by_lhs: HashMap<Symbol, Vec<usize>> = HashMap::new();
        for (index, formula) in formulas.iter().enumerate() {
            by_lhs.entry(formula.lhs.clone()).or_default().push(index);
        }

        Ok(Self { formulas, by_lhs })
    }

    /// The stable ordinal of a formula index (trivially itself; kept as a
    /// named accessor since callers use it as the reduce-action payload).
    pub fn index(&self, formula_index: usize) -> usize {
        formula_index
    }

    pub fn formula(&self, index: usize) -> &Formula {
        &self.formulas[index]
    }

    pub fn formulas(&self) -> &[Formula] {
        &self.formulas
    }

    /// Indices of all formulas whose LHS equals `symbol`.
    pub fn productions_of(&self, symbol: &Symbol) -> &[usize] {
        self.by_lhs.get(symbol).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The first-inserted formula: the augmented start production.
    pub fn start(&self) -> &Formula {
        &self.formulas[0]
    }

    pub fn start_index(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Token, TokenClass};

    fn id_token() -> FormulaElement {
        FormulaElement::Terminal(Token::new(0, 0, TokenClass::Identifiers, ""))
    }

    #[test]
    fn rejects_empty_formula_list() {
        assert!(matches!(
            FormulaStore::new(vec![]),
            Err(GrammarLoadError::EmptyInput)
        ));
    }

    #[test]
    fn rejects_empty_rhs() {
        let f = Formula::new(Symbol::new("S"), vec![]);
        assert!(matches!(
            FormulaStore::new(vec![f]),
            Err(GrammarLoadError::EmptyProduction(_))
        ));
    }

    #[test]
    fn rejects_start_symbol_on_other_rhs() {
        let start = Formula::new(Symbol::new("S"), vec![FormulaElement::Nonterminal(Symbol::new("E"))]);
        let bad = Formula::new(
            Symbol::new("E"),
            vec![FormulaElement::Nonterminal(Symbol::new("S"))],
        );
        assert!(matches!(
            FormulaStore::new(vec![start, bad]),
            Err(GrammarLoadError::StartSymbolNotAugmented(_))
        ));
    }

    #[test]
    fn indexes_productions_by_lhs() {
        let f0 = Formula::new(Symbol::new("S"), vec![FormulaElement::Nonterminal(Symbol::new("E"))]);
        let f1 = Formula::new(Symbol::new("E"), vec![id_token()]);
        let f2 = Formula::new(Symbol::new("E"), vec![id_token(), id_token()]);
        let store = FormulaStore::new(vec![f0, f1, f2]).unwrap();
        assert_eq!(store.productions_of(&Symbol::new("E")), &[1, 2]);
        assert_eq!(store.start_index(), 0);
    }
}
