//! ACTION/GOTO table synthesis with first-write-wins conflict recording.

use crate::element::{FormulaElement, Symbol};
use crate::formula::FormulaStore;
use crate::states::{BuildObserver, StateId, StateTable};
use crate::token::Token;
use std::collections::HashMap;
use std::fmt;

/// A synthesized ACTION-table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionEntry {
    Shift(StateId),
    Reduce(usize),
    Accept,
}

impl fmt::Display for ActionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionEntry::Shift(s) => write!(f, "S{s}"),
            ActionEntry::Reduce(r) => write!(f, "R{r}"),
            ActionEntry::Accept => write!(f, "accept"),
        }
    }
}

impl std::str::FromStr for ActionEntry {
    type Err = crate::error::TableLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "accept" {
            return Ok(ActionEntry::Accept);
        }
        let (tag, rest) = s.split_at(1.min(s.len()));
        let number = rest
            .parse::<usize>()
            .map_err(|_| crate::error::TableLoadError::UnknownActionTag(s.to_string()))?;
        match tag {
            "S" => Ok(ActionEntry::Shift(number)),
            "R" => Ok(ActionEntry::Reduce(number)),
            _ => Err(crate::error::TableLoadError::UnknownActionTag(s.to_string())),
        }
    }
}

/// Which table a conflict occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Action,
    Goto,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Action => f.write_str("action"),
            TableKind::Goto => f.write_str("goto"),
        }
    }
}

/// A recorded attempt to write two different values into the same table
/// cell. The first-inserted value wins; this is the data, not a thrown error.
#[derive(Debug, Clone)]
pub struct Conflict {
    pub table: TableKind,
    pub state: StateId,
    pub key: String,
    pub existing: String,
    pub attempted: String,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} conflict at state {}, {}: kept {}, discarded {}",
            self.table, self.state, self.key, self.existing, self.attempted
        )
    }
}

/// First-write-wins ACTION table, keyed by terminal-pattern equivalence.
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    cells: HashMap<(StateId, Token), ActionEntry>,
}

impl ActionTable {
    pub fn get(&self, state: StateId, token: &Token) -> Option<&ActionEntry> {
        self.cells.get(&(state, token.clone()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(StateId, Token), &ActionEntry)> {
        self.cells.iter()
    }

    fn insert(
        &mut self,
        state: StateId,
        token: Token,
        value: ActionEntry,
    ) -> Option<Conflict> {
        let key = (state, token.clone());
        if let Some(existing) = self.cells.get(&key) {
            return Some(Conflict {
                table: TableKind::Action,
                state,
                key: token.to_string(),
                existing: existing.to_string(),
                attempted: value.to_string(),
            });
        }
        self.cells.insert(key, value);
        None
    }

    /// Inserts a cell read back from a persisted table, unconditionally.
    /// Conflict resolution already happened at build time; a persisted table
    /// is assumed to hold at most one value per cell.
    pub fn insert_loaded(&mut self, state: StateId, token: Token, value: ActionEntry) {
        self.cells.insert((state, token), value);
    }
}

/// First-write-wins GOTO table.
#[derive(Debug, Clone, Default)]
pub struct GotoTable {
    cells: HashMap<(StateId, Symbol), StateId>,
}

impl GotoTable {
    pub fn get(&self, state: StateId, symbol: &Symbol) -> Option<StateId> {
        self.cells.get(&(state, symbol.clone())).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(StateId, Symbol), &StateId)> {
        self.cells.iter()
    }

    fn insert(&mut self, state: StateId, symbol: Symbol, value: StateId) -> Option<Conflict> {
        let key = (state, symbol.clone());
        if let Some(&existing) = self.cells.get(&key) {
            return Some(Conflict {
                table: TableKind::Goto,
                state,
                key: symbol.to_string(),
                existing: existing.to_string(),
                attempted: value.to_string(),
            });
        }
        self.cells.insert(key, value);
        None
    }

    /// Inserts a cell read back from a persisted table, unconditionally.
    pub fn insert_loaded(&mut self, state: StateId, symbol: Symbol, value: StateId) {
        self.cells.insert((state, symbol), value);
    }
}

/// Synthesizes ACTION/GOTO tables from the enumerated state collection.
///
/// Two passes, in order: (1) the transition pass emits Shift/Goto from state
/// transitions; (2) the completion pass emits Reduce/Accept from completed
/// items. Every discarded (conflicting) insert is recorded, not fatal.
pub fn synthesize(
    store: &FormulaStore,
    states: &StateTable,
    observer: &mut dyn BuildObserver,
) -> (ActionTable, GotoTable, Vec<Conflict>) {
    let mut action = ActionTable::default();
    let mut goto_table = GotoTable::default();
    let mut conflicts = Vec::new();

    // Pass 1: transitions.
    for (from, element, to) in states.transitions() {
        match element {
            FormulaElement::Terminal(token) => {
                if let Some(conflict) = action.insert(from, token.clone(), ActionEntry::Shift(to)) {
                    observer.on_conflict(&conflict);
                    conflicts.push(conflict);
                }
            }
            FormulaElement::Nonterminal(symbol) => {
                if let Some(conflict) = goto_table.insert(from, symbol.clone(), to) {
                    observer.on_conflict(&conflict);
                    conflicts.push(conflict);
                }
            }
        }
    }

    // Pass 2: completed items.
    for (state_id, item_set) in states.states().iter().enumerate() {
        for item in item_set.iter() {
            if !item.is_complete(store) {
                continue;
            }
            let entry = if item.formula == store.start_index() && item.lookahead.is_end() {
                ActionEntry::Accept
            } else {
                ActionEntry::Reduce(item.formula)
            };
            if let Some(conflict) = action.insert(state_id, item.lookahead.clone(), entry) {
                observer.on_conflict(&conflict);
                conflicts.push(conflict);
            }
        }
    }

    (action, goto_table, conflicts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Formula;
    use crate::states::{enumerate_states, NullObserver};
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
    fn accept_is_set_for_completed_start_with_end_lookahead() {
        let store = toy_store();
        let mut obs = NullObserver;
        let states = enumerate_states(&store, &mut obs);
        let (action, _goto, conflicts) = synthesize(&store, &states, &mut obs);
        assert!(conflicts.is_empty());
        let has_accept = action
            .iter()
            .any(|(_, entry)| matches!(entry, ActionEntry::Accept));
        assert!(has_accept);
    }

    #[test]
    fn shift_reduce_conflict_keeps_first_and_records_second() {
        // A contrived ambiguous grammar forcing a shift/reduce conflict on
        // '+' at the state after E -> E + E .
        let store = FormulaStore::new(vec![
            Formula::new(Symbol::new("S'"), vec![nonterminal("E")]),
            Formula::new(
                Symbol::new("E"),
                vec![nonterminal("E"), terminal("+"), nonterminal("E")],
            ),
            Formula::new(
                Symbol::new("E"),
                vec![FormulaElement::Terminal(Token::new(
                    0,
                    0,
                    TokenClass::Identifiers,
                    "",
                ))],
            ),
        ])
        .unwrap();
        let mut obs = NullObserver;
        let states = enumerate_states(&store, &mut obs);
        let (_action, _goto, conflicts) = synthesize(&store, &states, &mut obs);
        assert!(!conflicts.is_empty());
        assert!(conflicts.iter().all(|c| c.table == TableKind::Action));
    }

    #[test]
    fn action_entry_round_trips_through_display_and_from_str() {
        use std::str::FromStr;
        for entry in [ActionEntry::Shift(3), ActionEntry::Reduce(7), ActionEntry::Accept] {
            let rendered = entry.to_string();
            let parsed = ActionEntry::from_str(&rendered).unwrap();
            assert_eq!(parsed, entry);
        }
    }
}
