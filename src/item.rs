//! LR(1) items, item sets, closure, and GOTO.
//!
//! States are identified by the *value* of their item set, so `ItemSet` is
//! built on a `BTreeSet` rather than a `HashSet`: two structurally-equal sets
//! must iterate (and hash) in the same order for state deduplication and for
//! deterministic `StateId` assignment to hold.

use crate::element::FormulaElement;
use crate::first::first;
use crate::formula::FormulaStore;
use crate::token::Token;
use std::collections::{BTreeSet, HashSet};

/// An LR(1) item `(formula, dot position, lookahead)`.
///
/// `formula` is stored as a formula index into the owning [`FormulaStore`]
/// rather than a clone, since formulas may carry owned `Token`/`Symbol` data.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    pub formula: usize,
    pub dot: usize,
    pub lookahead: Token,
}

impl Item {
    pub fn new(formula: usize, dot: usize, lookahead: Token) -> Self {
        Self {
            formula,
            dot,
            lookahead,
        }
    }

    /// `rhs[dot]`, or `None` when the item is completed.
    pub fn current<'a>(&self, store: &'a FormulaStore) -> Option<&'a FormulaElement> {
        store.formula(self.formula).rhs.get(self.dot)
    }

    /// `rhs[dot + 1]`, or `None` past the end.
    pub fn after<'a>(&self, store: &'a FormulaStore) -> Option<&'a FormulaElement> {
        store.formula(self.formula).rhs.get(self.dot + 1)
    }

    /// A new item with the dot advanced by one position, same lookahead.
    pub fn advance(&self) -> Item {
        Item::new(self.formula, self.dot + 1, self.lookahead.clone())
    }

    pub fn is_complete(&self, store: &FormulaStore) -> bool {
        self.dot >= store.formula(self.formula).rhs.len()
    }
}

/// A deduplicated, hashable LR(1) item set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ItemSet {
    items: BTreeSet<Item>,
}

impl ItemSet {
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.items.contains(item)
    }
}

/// LR(1) closure: expand every item `(A -> α · B β, a)` with `B` a
/// nonterminal, adding `(B -> · γ, b)` for each production `B -> γ` and each
/// `b` in `first(β)` (or `{a}` if `β` is empty), iterated to a fixpoint.
pub fn closure(store: &FormulaStore, items: ItemSet) -> ItemSet {
    let mut result: BTreeSet<Item> = items.items;
    let mut changed = true;

    while changed {
        changed = false;
        let snapshot: Vec<Item> = result.iter().cloned().collect();

        for item in &snapshot {
            let Some(FormulaElement::Nonterminal(symbol)) = item.current(store) else {
                continue;
            };

            let lookaheads = forward_lookaheads(store, item);

            for &prod_index in store.productions_of(symbol) {
                for lookahead in &lookaheads {
                    let new_item = Item::new(prod_index, 0, lookahead.clone());
                    if result.insert(new_item) {
                        changed = true;
                    }
                }
            }
        }
    }

    ItemSet { items: result }
}

/// The lookahead set propagated into the closure of item `(A -> α · B β, a)`:
/// `first(β)` if `β` (the element after `B`) exists, else `{a}`.
fn forward_lookaheads(store: &FormulaStore, item: &Item) -> HashSet<Token> {
    match item.after(store) {
        Some(beta) => first(store, beta, &HashSet::new()),
        None => {
            let mut set = HashSet::new();
            set.insert(item.lookahead.clone());
            set
        }
    }
}

/// `goto(I, X)`: advance every item in `I` whose current element is `X`.
/// Does not apply closure; callers compose `closure(goto(store, I, X))`.
pub fn goto(store: &FormulaStore, items: &ItemSet, element: &FormulaElement) -> ItemSet {
    let advanced = items
        .iter()
        .filter(|item| item.current(store) == Some(element))
        .map(Item::advance);
    ItemSet::from_items(advanced)
}

/// The set of elements sitting immediately after the dot across all items.
/// Drives state expansion. Returned as a `BTreeSet` so callers iterate it in
/// a stable, sorted order (required for deterministic `StateId` assignment).
pub fn transition_elements(store: &FormulaStore, items: &ItemSet) -> BTreeSet<FormulaElement> {
    items
        .iter()
        .filter_map(|item| item.current(store).cloned())
        .collect()
}
