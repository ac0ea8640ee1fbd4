//! JSON grammar/message loaders and the plain-text token-stream loader.

use crate::element::{FormulaElement, Symbol};
use crate::error::GrammarLoadError;
use crate::formula::{Formula, FormulaStore};
use crate::token::{Token, TokenClass};
use serde::{Deserialize, Serialize};

/// On-disk shape of `grammar.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarFile {
    pub formulas: Vec<String>,
}

/// On-disk shape of `message.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageFile {
    pub messages: Vec<MessageEntry>,
    #[serde(alias = "default")]
    pub defaults: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEntry {
    pub token: String,
    pub message: String,
}

fn token_class_from_str(s: &str) -> Result<TokenClass, GrammarLoadError> {
    match s {
        "identifiers" => Ok(TokenClass::Identifiers),
        "constants" => Ok(TokenClass::Constants),
        "keywords" => Ok(TokenClass::Keywords),
        "operators" => Ok(TokenClass::Operators),
        "ends" => Ok(TokenClass::Ends),
        other => Err(GrammarLoadError::InvalidTerminal(other.to_string())),
    }
}

/// Parses a terminal pattern `<type,word>`, tolerating optional whitespace
/// around the comma. This is the grammar-file literal shape, which is looser
/// than the token-stream loader's shape below.
fn parse_terminal_pattern(s: &str) -> Result<Token, GrammarLoadError> {
    let inner = s
        .trim()
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .ok_or_else(|| GrammarLoadError::InvalidTerminal(s.to_string()))?;
    let (class_str, word) = inner
        .split_once(',')
        .ok_or_else(|| GrammarLoadError::InvalidTerminal(s.to_string()))?;
    let class = token_class_from_str(class_str.trim())?;
    Ok(Token::new(0, 0, class, word.trim()))
}

/// Parses one RHS element: a bracketed terminal pattern or a bare nonterminal
/// name.
fn parse_element(s: &str) -> Result<FormulaElement, GrammarLoadError> {
    if s.starts_with('<') {
        Ok(FormulaElement::Terminal(parse_terminal_pattern(s)?))
    } else {
        Ok(FormulaElement::Nonterminal(Symbol::new(s)))
    }
}

/// Parses one `LHS -> E1 E2 ... En` production line.
fn parse_formula_line(line: &str) -> Result<Formula, GrammarLoadError> {
    let (lhs, rhs) = line
        .split_once("->")
        .ok_or_else(|| GrammarLoadError::InvalidProduction(line.to_string()))?;
    let lhs = lhs.trim();
    if lhs.is_empty() {
        return Err(GrammarLoadError::InvalidProduction(line.to_string()));
    }

    let mut elements = Vec::new();
    let mut rest = rhs.trim();
    while !rest.is_empty() {
        if let Some(start) = rest.find('<') {
            if start > 0 {
                for word in rest[..start].split_whitespace() {
                    elements.push(parse_element(word)?);
                }
            }
            let end = rest[start..]
                .find('>')
                .ok_or_else(|| GrammarLoadError::InvalidTerminal(rest.to_string()))?;
            elements.push(parse_element(&rest[start..start + end + 1])?);
            rest = rest[start + end + 1..].trim_start();
        } else {
            for word in rest.split_whitespace() {
                elements.push(parse_element(word)?);
            }
            rest = "";
        }
    }

    Ok(Formula::new(Symbol::new(lhs), elements))
}

/// Parses a [`GrammarFile`] into a [`FormulaStore`].
pub fn build_formula_store(file: &GrammarFile) -> Result<FormulaStore, GrammarLoadError> {
    let formulas = file
        .formulas
        .iter()
        .map(|line| parse_formula_line(line))
        .collect::<Result<Vec<_>, _>>()?;
    FormulaStore::new(formulas)
}

/// Parses a [`MessageFile`] into a [`crate::driver::MessageTable`].
pub fn build_message_table(
    file: &MessageFile,
) -> Result<crate::driver::MessageTable, GrammarLoadError> {
    let mut table = crate::driver::MessageTable::new(file.defaults.clone());
    for entry in &file.messages {
        let token = parse_terminal_pattern(&entry.token)?;
        table.insert(token, entry.message.clone());
    }
    Ok(table)
}

/// Parses one token-stream line, accepting both the simple 2-field literal
/// shape (`<type, word>`, line/column defaulted to 0) and the full 4-field
/// shape (`<line, column, type, word>`).
fn parse_stream_token(s: &str) -> Result<Token, GrammarLoadError> {
    let inner = s
        .trim()
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .ok_or_else(|| GrammarLoadError::InvalidTerminal(s.to_string()))?;
    let fields: Vec<&str> = inner.split(',').map(str::trim).collect();
    match fields.as_slice() {
        [class_str, word] => {
            let class = token_class_from_str(class_str)?;
            Ok(Token::new(0, 0, class, word))
        }
        [line, column, class_str, word] => {
            let line: usize = line
                .parse()
                .map_err(|_| GrammarLoadError::InvalidTerminal(s.to_string()))?;
            let column: usize = column
                .parse()
                .map_err(|_| GrammarLoadError::InvalidTerminal(s.to_string()))?;
            let class = token_class_from_str(class_str)?;
            Ok(Token::new(line, column, class, word))
        }
        _ => Err(GrammarLoadError::InvalidTerminal(s.to_string())),
    }
}

/// Reads a token stream, one token per line, appending the end-of-input
/// sentinel after the last line.
pub fn load_token_stream(reader: impl std::io::BufRead) -> Result<Vec<Token>, GrammarLoadError> {
    let mut tokens = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|e| GrammarLoadError::InvalidTerminal(e.to_string()))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        tokens.push(parse_stream_token(line)?);
    }
    tokens.push(Token::end());
    Ok(tokens)
}
