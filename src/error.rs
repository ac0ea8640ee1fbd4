//! Error types for the LR(1) parser generator and driver.

use thiserror::Error;

/// Errors that occur while loading or validating a grammar.
#[derive(Error, Debug)]
pub enum GrammarLoadError {
    #[error("malformed grammar JSON: {0}")]
    InvalidJson(String),

    #[error("empty formula list")]
    EmptyInput,

    #[error("invalid production format: {0}")]
    InvalidProduction(String),

    #[error("invalid terminal pattern: {0}")]
    InvalidTerminal(String),

    #[error("formula has an empty right-hand side: {0}")]
    EmptyProduction(String),

    #[error("start symbol {0:?} appears on the right-hand side of another production")]
    StartSymbolNotAugmented(String),
}

/// Errors that occur while loading a persisted sparse table.
#[derive(Error, Debug)]
pub enum TableLoadError {
    #[error("malformed table line: {0:?}")]
    MalformedLine(String),

    #[error("unknown action tag: {0:?}")]
    UnknownActionTag(String),

    #[error("invalid integer in table line {0:?}: {1}")]
    InvalidInteger(String, std::num::ParseIntError),

    #[error("invalid token pattern in table line {0:?}")]
    InvalidToken(String),
}

/// Top-level error type for the crate.
#[derive(Error, Debug)]
pub enum LrError {
    #[error("grammar load error: {0}")]
    Grammar(#[from] GrammarLoadError),

    #[error("table load error: {0}")]
    Table(#[from] TableLoadError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("message file error: {0}")]
    Message(String),
}

/// Type alias for `Result`s in this crate.
pub type Result<T> = std::result::Result<T, LrError>;
