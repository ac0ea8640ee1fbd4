//! Table-driven shift/reduce parser with panic-mode error recovery.

use crate::element::{FormulaElement, Symbol};
use crate::formula::FormulaStore;
use crate::states::StateId;
use crate::table::{ActionEntry, ActionTable, GotoTable};
use crate::token::Token;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A syntax error anchored to the offending token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub token: Token,
    pub message: String,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error at {}:{} \"{}\": {}",
            self.token.line, self.token.column, self.token.word, self.message
        )
    }
}

/// Maps terminal patterns to human-readable diagnostics, falling back to a
/// single default string when a token has no specific entry.
#[derive(Debug, Clone, Default)]
pub struct MessageTable {
    by_token: HashMap<Token, String>,
    default: String,
}

impl MessageTable {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            by_token: HashMap::new(),
            default: default.into(),
        }
    }

    pub fn insert(&mut self, token: Token, message: impl Into<String>) {
        self.by_token.insert(token, message.into());
    }

    pub fn message_for(&self, token: &Token) -> &str {
        self.by_token
            .get(token)
            .map(String::as_str)
            .unwrap_or(&self.default)
    }
}

/// Immutable build output a driver parses against.
#[derive(Debug, Clone)]
pub struct Tables {
    pub action: ActionTable,
    pub goto: GotoTable,
}

/// A table-driven LR(1) parser. Cheap to clone and share across threads via
/// `Arc<Tables>`/`Arc<FormulaStore>`; nothing here is mutated after
/// construction, so concurrent `parse` calls need no synchronization.
#[derive(Debug, Clone)]
pub struct Parser {
    tables: Arc<Tables>,
    store: Arc<FormulaStore>,
    messages: Arc<MessageTable>,
}

impl Parser {
    pub fn new(tables: Arc<Tables>, store: Arc<FormulaStore>, messages: Arc<MessageTable>) -> Self {
        Self {
            tables,
            store,
            messages,
        }
    }

    /// Drives the stack machine to completion, returning every syntax error
    /// encountered in token order. `tokens` must end with an end-of-input
    /// sentinel (see `Token::end`).
    pub fn parse(&self, tokens: &[Token]) -> Vec<SyntaxError> {
        let mut status_stack: Vec<StateId> = vec![0];
        let mut symbol_stack: Vec<FormulaElement> =
            vec![FormulaElement::Terminal(Token::end())];
        let mut errors = Vec::new();
        let mut i = 0usize;
        let mut done = false;

        while !done && i < tokens.len() {
            let state = *status_stack.last().expect("status stack never empties");
            let token = &tokens[i];

            match self.tables.action.get(state, token) {
                None => {
                    i = self.handle_action_miss(tokens, i, &mut status_stack, &mut errors);
                    if i >= tokens.len() {
                        done = true;
                    }
                }
                Some(ActionEntry::Accept) => {
                    log::trace!("accept at token {i}");
                    done = true;
                }
                Some(ActionEntry::Shift(next)) => {
                    log::trace!("shift {token} -> state {next}");
                    status_stack.push(*next);
                    symbol_stack.push(FormulaElement::Terminal(token.clone()));
                    i += 1;
                }
                Some(ActionEntry::Reduce(formula_index)) => {
                    let formula_index = *formula_index;
                    done = self.step_reduce(
                        formula_index,
                        token,
                        &mut status_stack,
                        &mut symbol_stack,
                        &mut errors,
                    );
                }
            }
        }

        errors
    }

    /// ACTION-miss: record an error for the offending token, then advance the
    /// cursor while the current state still has no ACTION entry for it.
    fn handle_action_miss(
        &self,
        tokens: &[Token],
        mut i: usize,
        status_stack: &mut [StateId],
        errors: &mut Vec<SyntaxError>,
    ) -> usize {
        let state = *status_stack.last().expect("status stack never empties");
        let token = &tokens[i];
        log::warn!("no ACTION[{state}, {token}]; entering panic-mode recovery");
        errors.push(SyntaxError {
            token: token.clone(),
            message: self.messages.message_for(token).to_string(),
        });
        i += 1;
        while i < tokens.len() {
            let state = *status_stack.last().expect("status stack never empties");
            if self.tables.action.get(state, &tokens[i]).is_some() {
                break;
            }
            i += 1;
        }
        i
    }

    /// Reduce by `formula_index` and look up the GOTO for the exposed state.
    /// Returns `true` if the parse must stop (unrecoverable GOTO-miss).
    fn step_reduce(
        &self,
        formula_index: usize,
        lookahead: &Token,
        status_stack: &mut Vec<StateId>,
        symbol_stack: &mut Vec<FormulaElement>,
        errors: &mut Vec<SyntaxError>,
    ) -> bool {
        let formula = self.store.formula(formula_index);
        let n = formula.rhs.len();
        log::trace!("reduce by formula {formula_index} ({formula})");
        status_stack.truncate(status_stack.len() - n);
        symbol_stack.truncate(symbol_stack.len() - n);

        let exposed = *status_stack.last().expect("status stack never empties");
        match self.handle_goto(exposed, &formula.lhs) {
            Some(next) => {
                status_stack.push(next);
                symbol_stack.push(FormulaElement::Nonterminal(formula.lhs.clone()));
                false
            }
            None => {
                log::warn!("no GOTO[{exposed}, {}]; parse cannot continue", formula.lhs);
                errors.push(SyntaxError {
                    token: lookahead.clone(),
                    message: self.messages.message_for(lookahead).to_string(),
                });
                true
            }
        }
    }

    fn handle_goto(&self, state: StateId, symbol: &Symbol) -> Option<StateId> {
        self.tables.goto.get(state, symbol)
    }
}
