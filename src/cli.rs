//! CLI glue for the `build` and `parse` subcommands.

use crate::driver::{MessageTable, Parser, Tables};
use crate::error::{LrError, Result};
use crate::grammar_io::{build_formula_store, build_message_table, load_token_stream, GrammarFile, MessageFile};
use crate::states::{enumerate_states, LoggingObserver};
use crate::table::synthesize;
use clap::{Parser as ClapParser, Subcommand};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, ClapParser)]
#[command(name = "lr1_parser", about = "LR(1) parser generator and driver")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Builds ACTION/GOTO tables from a grammar file.
    Build {
        #[arg(long)]
        grammar: PathBuf,
        #[arg(long)]
        messages: Option<PathBuf>,
        #[arg(long = "action-out")]
        action_out: PathBuf,
        #[arg(long = "goto-out")]
        goto_out: PathBuf,
        #[arg(long = "items-log")]
        items_log: Option<PathBuf>,
        #[arg(long = "conflicts-log")]
        conflicts_log: Option<PathBuf>,
    },
    /// Parses a token stream against previously-built tables.
    Parse {
        #[arg(long)]
        action: PathBuf,
        #[arg(long)]
        goto: PathBuf,
        #[arg(long)]
        grammar: PathBuf,
        #[arg(long)]
        messages: Option<PathBuf>,
        #[arg(long)]
        tokens: PathBuf,
        #[arg(long = "errors-out")]
        errors_out: Option<PathBuf>,
    },
}

/// Parses arguments from the process environment and dispatches.
pub fn run() -> Result<()> {
    let cli = Cli::parse_from(std::env::args());
    dispatch(cli.command)
}

fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Build {
            grammar,
            messages: _,
            action_out,
            goto_out,
            items_log,
            conflicts_log,
        } => run_build(
            &grammar,
            &action_out,
            &goto_out,
            items_log.as_deref(),
            conflicts_log.as_deref(),
        ),
        Command::Parse {
            action,
            goto,
            grammar,
            messages,
            tokens,
            errors_out,
        } => run_parse(
            &action,
            &goto,
            &grammar,
            messages.as_deref(),
            &tokens,
            errors_out.as_deref(),
        ),
    }
}

fn load_grammar_file(path: &std::path::Path) -> Result<GrammarFile> {
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader).map_err(|e| LrError::Grammar(crate::error::GrammarLoadError::InvalidJson(e.to_string())))
}

fn load_message_file(path: &std::path::Path) -> Result<MessageFile> {
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader).map_err(|e| LrError::Grammar(crate::error::GrammarLoadError::InvalidJson(e.to_string())))
}

fn run_build(
    grammar_path: &std::path::Path,
    action_out: &std::path::Path,
    goto_out: &std::path::Path,
    items_log: Option<&std::path::Path>,
    conflicts_log: Option<&std::path::Path>,
) -> Result<()> {
    let grammar_file = load_grammar_file(grammar_path)?;
    let store = build_formula_store(&grammar_file)?;

    let mut observer = LoggingObserver;
    let states = enumerate_states(&store, &mut observer);
    let (action, goto, conflicts) = synthesize(&store, &states, &mut observer);

    log::info!(
        "built {} states, {} conflicts",
        states.state_count(),
        conflicts.len()
    );

    {
        let mut out = BufWriter::new(File::create(action_out)?);
        crate::persist::write_action_table(&action, &mut out)?;
    }
    {
        let mut out = BufWriter::new(File::create(goto_out)?);
        crate::persist::write_goto_table(&goto, &mut out)?;
    }

    if let Some(path) = items_log {
        let mut out = BufWriter::new(File::create(path)?);
        for (id, item_set) in states.states().iter().enumerate() {
            writeln!(out, "state {id}:")?;
            for item in item_set.iter() {
                writeln!(out, "  {item:?}")?;
            }
        }
    }

    if let Some(path) = conflicts_log {
        let mut out = BufWriter::new(File::create(path)?);
        for conflict in &conflicts {
            writeln!(out, "{conflict}")?;
        }
    }

    Ok(())
}

fn run_parse(
    action_path: &std::path::Path,
    goto_path: &std::path::Path,
    grammar_path: &std::path::Path,
    messages_path: Option<&std::path::Path>,
    tokens_path: &std::path::Path,
    errors_out: Option<&std::path::Path>,
) -> Result<()> {
    let grammar_file = load_grammar_file(grammar_path)?;
    let store = Arc::new(build_formula_store(&grammar_file)?);

    let mut action = crate::table::ActionTable::default();
    crate::persist::read_action_table(&mut action, BufReader::new(File::open(action_path)?))?;
    let mut goto = crate::table::GotoTable::default();
    crate::persist::read_goto_table(&mut goto, BufReader::new(File::open(goto_path)?))?;
    let tables = Arc::new(Tables { action, goto });

    let messages = match messages_path {
        Some(path) => Arc::new(build_message_table(&load_message_file(path)?)?),
        None => Arc::new(MessageTable::new("syntax error")),
    };

    let tokens = load_token_stream(BufReader::new(File::open(tokens_path)?))
        .map_err(LrError::Grammar)?;

    let parser = Parser::new(tables, store, messages);
    let errors = parser.parse(&tokens);

    match errors_out {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            for error in &errors {
                writeln!(out, "{error}")?;
            }
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for error in &errors {
                writeln!(out, "{error}")?;
            }
        }
    }

    Ok(())
}
