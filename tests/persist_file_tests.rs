//! Table persistence round-tripped through real files, not just in-memory buffers.

use lr1_parser::{ActionEntry, ActionTable, GotoTable, Symbol, Token, TokenClass};
use std::fs::File;
use std::io::{BufReader, BufWriter};

#[test]
fn action_table_round_trips_through_a_real_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("action.txt");

    let mut table = ActionTable::default();
    table.insert_loaded(0, Token::new(0, 0, TokenClass::Identifiers, ""), ActionEntry::Shift(1));
    table.insert_loaded(1, Token::end(), ActionEntry::Accept);

    {
        let file = BufWriter::new(File::create(&path).unwrap());
        lr1_parser::persist::write_action_table(&table, file).unwrap();
    }

    let mut loaded = ActionTable::default();
    let file = BufReader::new(File::open(&path).unwrap());
    lr1_parser::persist::read_action_table(&mut loaded, file).unwrap();

    assert_eq!(
        loaded.get(0, &Token::new(0, 0, TokenClass::Identifiers, "")),
        Some(&ActionEntry::Shift(1))
    );
    assert_eq!(loaded.get(1, &Token::end()), Some(&ActionEntry::Accept));
}

#[test]
fn goto_table_round_trips_through_a_real_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("goto.txt");

    let mut table = GotoTable::default();
    table.insert_loaded(0, Symbol::new("E"), 4);

    {
        let file = BufWriter::new(File::create(&path).unwrap());
        lr1_parser::persist::write_goto_table(&table, file).unwrap();
    }

    let mut loaded = GotoTable::default();
    let file = BufReader::new(File::open(&path).unwrap());
    lr1_parser::persist::read_goto_table(&mut loaded, file).unwrap();

    assert_eq!(loaded.get(0, &Symbol::new("E")), Some(4));
}
