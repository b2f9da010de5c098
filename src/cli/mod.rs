//! Cadence CLI
//!
//! Commands:
//! - `cadence shell` - Interactive round-by-round session
//! - `cadence analyze` - One-shot analysis of a compact sequence
//! - `cadence serve` - HTTP JSON API over many sessions
//! - `cadence config` - Print the effective configuration

pub mod display;
pub mod shell;

use clap::{Parser, Subcommand};

use crate::config::{AppConfig, SessionConfig};
use crate::domain::Symbol;
use crate::session::{Session, SessionView};

/// Pattern engine for three-outcome round sequences
#[derive(Parser, Debug)]
#[command(name = "cadence")]
#[command(author, version, about = "Streak, alternation and tie-anchor analysis for round sequences")]
pub struct Cli {
    /// Directory holding default.toml and environment overrides
    #[arg(long, global = true, default_value = "config", env = "CADENCE_CONFIG_DIR")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive shell: record rounds and watch the analysis update
    Shell,

    /// Analyze a compact sequence such as AABTBA
    Analyze {
        sequence: String,
        /// Print the session view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve the HTTP session API
    Serve {
        /// Listen address (overrides server.bind)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// Feed `input` through a fresh session
pub fn analyze_sequence(config: SessionConfig, input: &str) -> crate::Result<SessionView> {
    let symbols = Symbol::parse_sequence(input)?;
    let mut session = Session::new(config);
    for symbol in symbols {
        session.append(symbol);
    }
    Ok(session.view())
}

pub fn run_analyze(config: SessionConfig, input: &str, json: bool) -> anyhow::Result<()> {
    let view = analyze_sequence(config, input)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    let line: Vec<String> = view.history.iter().map(|o| display::paint(o.symbol)).collect();
    println!("{} ({} rounds)", line.join(" "), view.history.len());
    display::print_snapshot(&view.snapshot);
    Ok(())
}

pub fn print_config(config: &AppConfig) -> anyhow::Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
