//! Canonical LR(1) state enumeration.
//!
//! Produces the canonical collection of item sets and the transitions between
//! them via a worklist over `transition_elements`. StateId assignment is
//! insertion order; determinism follows from `transition_elements` returning
//! a sorted `BTreeSet` (see `item.rs`).

use crate::element::FormulaElement;
use crate::formula::FormulaStore;
use crate::item::{closure, goto, transition_elements, Item, ItemSet};
use crate::token::Token;
use std::collections::{HashMap, VecDeque};

/// A dense non-negative state identifier, assigned in insertion order.
pub type StateId = usize;

/// Observes build-time events without owning any state of its own.
///
/// Threaded explicitly through the enumerator and table synthesizer instead
/// of a process-wide singleton recorder, so builds stay composable and
/// testable.
pub trait BuildObserver {
    fn on_state_added(&mut self, _id: StateId, _items: &ItemSet) {}
    fn on_transition(&mut self, _from: StateId, _element: &FormulaElement, _to: StateId) {}
    fn on_conflict(&mut self, _conflict: &crate::table::Conflict) {}
}

/// Default observer: logs state additions at `debug` and conflicts at `warn`.
#[derive(Debug, Default)]
pub struct LoggingObserver;

impl BuildObserver for LoggingObserver {
    fn on_state_added(&mut self, id: StateId, items: &ItemSet) {
        log::debug!("state {id} added with {} items", items.len());
    }

    fn on_transition(&mut self, from: StateId, element: &FormulaElement, to: StateId) {
        log::debug!("transition ({from}, {element}) -> {to}");
    }

    fn on_conflict(&mut self, conflict: &crate::table::Conflict) {
        log::warn!("{conflict}");
    }
}

/// An observer that discards every event; useful in tests.
#[derive(Debug, Default)]
pub struct NullObserver;

impl BuildObserver for NullObserver {}

/// The canonical LR(1) collection of states and the transitions among them.
#[derive(Debug, Clone)]
pub struct StateTable {
    states: Vec<ItemSet>,
    index_of: HashMap<ItemSet, StateId>,
    /// `(from, element) -> to`.
    transitions: HashMap<(StateId, FormulaElement), StateId>,
}

impl StateTable {
    pub fn states(&self) -> &[ItemSet] {
        &self.states
    }

    pub fn state(&self, id: StateId) -> &ItemSet {
        &self.states[id]
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition(&self, from: StateId, element: &FormulaElement) -> Option<StateId> {
        self.transitions.get(&(from, element.clone())).copied()
    }

    pub fn transitions(&self) -> impl Iterator<Item = (StateId, &FormulaElement, StateId)> {
        self.transitions
            .iter()
            .map(|((from, element), to)| (*from, element, *to))
    }
}

/// Enumerates the canonical LR(1) collection starting from the closure of
/// `{(start_formula, 0, #)}`.
pub fn enumerate_states(
    store: &FormulaStore,
    observer: &mut dyn BuildObserver,
) -> StateTable {
    let initial = closure(
        store,
        ItemSet::from_items([Item::new(store.start_index(), 0, Token::end())]),
    );

    let mut states = vec![initial.clone()];
    let mut index_of = HashMap::new();
    index_of.insert(initial.clone(), 0usize);
    observer.on_state_added(0, &initial);

    let mut transitions: HashMap<(StateId, FormulaElement), StateId> = HashMap::new();
    let mut worklist: VecDeque<StateId> = VecDeque::new();
    worklist.push_back(0);

    while let Some(state_id) = worklist.pop_front() {
        let current = states[state_id].clone();
        for element in transition_elements(store, &current) {
            let next = closure(store, goto(store, &current, &element));
            let next_id = match index_of.get(&next) {
                Some(&id) => id,
                None => {
                    let id = states.len();
                    states.push(next.clone());
                    index_of.insert(next.clone(), id);
                    worklist.push_back(id);
                    observer.on_state_added(id, &next);
                    id
                }
            };
            transitions.insert((state_id, element.clone()), next_id);
            observer.on_transition(state_id, &element, next_id);
        }
    }

    StateTable {
        states,
        index_of,
        transitions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Symbol;
    use crate::formula::Formula;
    use crate::token::TokenClass;

    fn terminal(word: &str) -> FormulaElement {
        FormulaElement::Terminal(Token::new(0, 0, TokenClass::Operators, word))
    }

    fn nonterminal(name: &str) -> FormulaElement {
        FormulaElement::Nonterminal(Symbol::new(name))
    }

    fn toy_store() -> FormulaStore {
        FormulaStore::new(vec![
            Formula::new(Symbol::new("S'"), vec![nonterminal("E")]),
            Formula::new(
                Symbol::new("E"),
                vec![nonterminal("E"), terminal("+"), nonterminal("T")],
            ),
            Formula::new(Symbol::new("E"), vec![nonterminal("T")]),
            Formula::new(
                Symbol::new("T"),
                vec![FormulaElement::Terminal(Token::new(
                    0,
                    0,
                    TokenClass::Identifiers,
                    "",
                ))],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn state_zero_is_closure_of_augmented_start() {
        let store = toy_store();
        let mut obs = NullObserver;
        let table = enumerate_states(&store, &mut obs);
        assert_eq!(table.state_count() >= 1, true);
        assert!(table.state(0).iter().any(|i| i.formula == 0 && i.dot == 0));
    }

    #[test]
    fn enumeration_is_deterministic_across_independent_builds() {
        let store = toy_store();
        let mut obs1 = NullObserver;
        let mut obs2 = NullObserver;
        let t1 = enumerate_states(&store, &mut obs1);
        let t2 = enumerate_states(&store, &mut obs2);
        assert_eq!(t1.state_count(), t2.state_count());
        for id in 0..t1.state_count() {
            assert_eq!(t1.state(id), t2.state(id));
        }
        let trans1: std::collections::BTreeMap<_, _> =
            t1.transitions().map(|(f, e, to)| ((f, e.clone()), to)).collect();
        let trans2: std::collections::BTreeMap<_, _> =
            t2.transitions().map(|(f, e, to)| ((f, e.clone()), to)).collect();
        assert_eq!(trans1, trans2);
    }

    #[test]
    fn no_state_is_produced_twice() {
        let store = toy_store();
        let mut obs = NullObserver;
        let table = enumerate_states(&store, &mut obs);
        let unique: std::collections::HashSet<_> = table.states().iter().collect();
        assert_eq!(unique.len(), table.state_count());
    }
}
