//! `cadence shell`: interactive round-by-round REPL.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

use super::display;
use crate::config::SessionConfig;
use crate::domain::Symbol;
use crate::error::{CadenceError, Result};
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Record(Vec<Symbol>),
    Undo,
    Clear,
    Show,
    History,
    Weights,
    Help,
    Exit,
}

/// Parse one input line. Symbols may be separated (`a b t`), spelled out
/// (`side_a tie`) or packed (`aabt`).
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let command = match line.to_ascii_lowercase().as_str() {
        "undo" | "u" => ShellCommand::Undo,
        "clear" | "reset" => ShellCommand::Clear,
        "show" | "s" => ShellCommand::Show,
        "history" | "h" => ShellCommand::History,
        "weights" | "w" => ShellCommand::Weights,
        "help" | "?" => ShellCommand::Help,
        "exit" | "quit" | "q" => ShellCommand::Exit,
        _ => {
            let mut symbols = Vec::new();
            for token in line.split_whitespace() {
                match token.parse::<Symbol>() {
                    Ok(symbol) => symbols.push(symbol),
                    Err(_) => symbols.extend(
                        Symbol::parse_sequence(token)
                            .map_err(|_| CadenceError::InvalidSymbol(token.to_string()))?,
                    ),
                }
            }
            ShellCommand::Record(symbols)
        }
    };
    Ok(Some(command))
}

fn history_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cadence").join("history.txt"))
}

pub fn run(config: SessionConfig) -> anyhow::Result<()> {
    display::print_banner("Cadence Interactive Shell");
    println!("Record rounds with a / b / t (several per line), 'help' for commands, 'exit' to quit.");
    println!();

    let history_path = history_path();
    let mut rl = DefaultEditor::new()?;
    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    let mut session = Session::new(config);

    loop {
        match rl.readline("\x1b[36mcadence>\x1b[0m ") {
            Ok(line) => {
                let command = match parse_line(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        display::print_error(&e.to_string());
                        continue;
                    }
                };
                let _ = rl.add_history_entry(line.trim());

                match command {
                    ShellCommand::Record(symbols) => {
                        for symbol in symbols {
                            session.append(symbol);
                        }
                        display::print_history(session.history());
                        display::print_snapshot(session.snapshot());
                    }
                    ShellCommand::Undo => match session.undo() {
                        Some(symbol) => {
                            println!("Removed {}", display::paint(symbol));
                            display::print_snapshot(session.snapshot());
                        }
                        None => println!("(nothing to undo)"),
                    },
                    ShellCommand::Clear => {
                        session.clear();
                        display::print_success("Session cleared");
                    }
                    ShellCommand::Show => display::print_snapshot(session.snapshot()),
                    ShellCommand::History => display::print_history(session.history()),
                    ShellCommand::Weights => {
                        display::print_weights(session.weights(), session.stats())
                    }
                    ShellCommand::Help => print_shell_help(),
                    ShellCommand::Exit => break,
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("readline error: {e}");
                break;
            }
        }
    }

    if let Some(ref path) = history_path {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = rl.save_history(path);
    }

    Ok(())
}

fn print_shell_help() {
    println!("Available commands:");
    println!("  a | b | t    record rounds (side A, side B, tie); 'aabt' or 'side_a tie' also work");
    println!("  undo         remove the newest round");
    println!("  clear        start over (history and weights)");
    println!("  show         current analysis");
    println!("  history      recorded rounds");
    println!("  weights      adaptive rule weights and hit rate");
    println!("  help         (this message)");
    println!("  exit         (quit shell)");
}
