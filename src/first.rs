//! FIRST-set computation, cycle-guarded over possibly left-recursive grammars.

use crate::element::FormulaElement;
use crate::formula::FormulaStore;
use crate::token::Token;
use std::collections::HashSet;

/// FIRST(element), excluding nonterminals already in `excludes` to break
/// left-recursive cycles.
///
/// - Terminal element: `{ element.token }`.
/// - Nonterminal element `S`: union of `first(f.rhs[0], excludes ∪ {S})` over
///   every production `f` of `S` whose first RHS element is not excluded.
///
/// Only the leftmost RHS element of each production contributes (no
/// epsilon-productions are in scope, so there is nothing to skip past).
pub fn first(
    store: &FormulaStore,
    element: &FormulaElement,
    excludes: &HashSet<crate::element::Symbol>,
) -> HashSet<Token> {
    match element {
        FormulaElement::Terminal(token) => {
            let mut set = HashSet::new();
            set.insert(token.clone());
            set
        }
        FormulaElement::Nonterminal(symbol) => {
            let mut next_excludes = excludes.clone();
            next_excludes.insert(symbol.clone());

            let mut result = HashSet::new();
            for &formula_index in store.productions_of(symbol) {
                let formula = store.formula(formula_index);
                let Some(head) = formula.rhs.first() else {
                    continue;
                };
                if let FormulaElement::Nonterminal(head_symbol) = head {
                    if next_excludes.contains(head_symbol) {
                        continue;
                    }
                }
                result.extend(first(store, head, &next_excludes));
            }
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Symbol;
    use crate::formula::Formula;
    use crate::token::TokenClass;
    use std::collections::HashSet;

    fn terminal(word: &str) -> FormulaElement {
        FormulaElement::Terminal(Token::new(0, 0, TokenClass::Operators, word))
    }

    fn nonterminal(name: &str) -> FormulaElement {
        FormulaElement::Nonterminal(Symbol::new(name))
    }

    #[test]
    fn terminal_first_is_singleton() {
        let store = FormulaStore::new(vec![Formula::new(Symbol::new("S"), vec![terminal("a")])]).unwrap();
        let result = first(&store, &terminal("a"), &HashSet::new());
        assert_eq!(result.len(), 1);
        assert!(result.contains(&Token::new(0, 0, TokenClass::Operators, "a")));
    }

    #[test]
    fn left_recursive_grammar_terminates_and_computes_first() {
        // A -> A a | a
        let store = FormulaStore::new(vec![
            Formula::new(Symbol::new("A"), vec![nonterminal("A"), terminal("a")]),
            Formula::new(Symbol::new("A"), vec![terminal("a")]),
        ])
        .unwrap();
        let result = first(&store, &nonterminal("A"), &HashSet::new());
        assert_eq!(result.len(), 1);
        assert!(result.contains(&Token::new(0, 0, TokenClass::Operators, "a")));
    }

    #[test]
    fn nonterminal_first_unions_across_alternatives() {
        // E -> a | b
        let store = FormulaStore::new(vec![
            Formula::new(Symbol::new("E"), vec![terminal("a")]),
            Formula::new(Symbol::new("E"), vec![terminal("b")]),
        ])
        .unwrap();
        let result = first(&store, &nonterminal("E"), &HashSet::new());
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn mutually_recursive_grammar_terminates() {
        // S -> A x
        // A -> B
        // B -> A
        // (B -> A -> B cycle has no terminal contribution; FIRST(B) is empty)
        let store = FormulaStore::new(vec![
            Formula::new(Symbol::new("S"), vec![nonterminal("A"), terminal("x")]),
            Formula::new(Symbol::new("A"), vec![nonterminal("B")]),
            Formula::new(Symbol::new("B"), vec![nonterminal("A")]),
        ])
        .unwrap();
        let result = first(&store, &nonterminal("B"), &HashSet::new());
        assert!(result.is_empty());
    }
}
