//! Sparse on-disk form for ACTION/GOTO tables.
//!
//! Each nonzero cell is one line: `row col value`, whitespace-separated.
//! `value` for ACTION is `accept`, `S<num>`, or `R<num>`; for GOTO it is a
//! bare state number. Tokens serialize as `<type,word>`.

use crate::element::Symbol;
use crate::error::TableLoadError;
use crate::table::{ActionEntry, ActionTable, GotoTable};
use crate::token::{Token, TokenClass};
use std::io::{BufRead, Write};
use std::str::FromStr;

fn parse_token_pattern(s: &str) -> Result<Token, TableLoadError> {
    let inner = s
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .ok_or_else(|| TableLoadError::InvalidToken(s.to_string()))?;
    let (class_str, word) = inner
        .split_once(',')
        .ok_or_else(|| TableLoadError::InvalidToken(s.to_string()))?;
    let class = match class_str {
        "identifiers" => TokenClass::Identifiers,
        "constants" => TokenClass::Constants,
        "keywords" => TokenClass::Keywords,
        "operators" => TokenClass::Operators,
        "ends" => TokenClass::Ends,
        _ => return Err(TableLoadError::InvalidToken(s.to_string())),
    };
    Ok(Token::new(0, 0, class, word))
}

/// Writes the ACTION table as sparse text.
pub fn write_action_table(table: &ActionTable, mut out: impl Write) -> std::io::Result<()> {
    let mut rows: Vec<_> = table.iter().collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));
    for ((state, token), entry) in rows {
        writeln!(out, "{state} {token} {entry}")?;
    }
    Ok(())
}

/// Writes the GOTO table as sparse text.
pub fn write_goto_table(table: &GotoTable, mut out: impl Write) -> std::io::Result<()> {
    let mut rows: Vec<_> = table.iter().collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));
    for ((state, symbol), target) in rows {
        writeln!(out, "{state} {symbol} {target}")?;
    }
    Ok(())
}

fn split_table_line(line: &str) -> Result<(&str, &str, &str), TableLoadError> {
    let mut parts = line.split_whitespace();
    let row = parts
        .next()
        .ok_or_else(|| TableLoadError::MalformedLine(line.to_string()))?;
    let col = parts
        .next()
        .ok_or_else(|| TableLoadError::MalformedLine(line.to_string()))?;
    let value = parts
        .next()
        .ok_or_else(|| TableLoadError::MalformedLine(line.to_string()))?;
    if parts.next().is_some() {
        return Err(TableLoadError::MalformedLine(line.to_string()));
    }
    Ok((row, col, value))
}

/// Reads a previously-written ACTION table, appending into `table`.
pub fn read_action_table(
    table: &mut ActionTable,
    reader: impl BufRead,
) -> Result<(), TableLoadError> {
    for line in reader.lines() {
        let line = line.map_err(|e| TableLoadError::MalformedLine(e.to_string()))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (row, col, value) = split_table_line(line)?;
        let state: usize = row
            .parse()
            .map_err(|e| TableLoadError::InvalidInteger(line.to_string(), e))?;
        let token = parse_token_pattern(col)?;
        let entry = ActionEntry::from_str(value)?;
        table.insert_loaded(state, token, entry);
    }
    Ok(())
}

/// Reads a previously-written GOTO table, appending into `table`.
pub fn read_goto_table(
    table: &mut GotoTable,
    reader: impl BufRead,
) -> Result<(), TableLoadError> {
    for line in reader.lines() {
        let line = line.map_err(|e| TableLoadError::MalformedLine(e.to_string()))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (row, col, value) = split_table_line(line)?;
        let state: usize = row
            .parse()
            .map_err(|e| TableLoadError::InvalidInteger(line.to_string(), e))?;
        let target: usize = value
            .parse()
            .map_err(|e| TableLoadError::InvalidInteger(line.to_string(), e))?;
        table.insert_loaded(state, Symbol::new(col), target);
    }
    Ok(())
}
