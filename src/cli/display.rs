//! Terminal rendering of snapshots, histories and weights.

use tabled::{Table, Tabled};

use crate::domain::{OutcomeSequence, Symbol};
use crate::engine::{AnalysisSnapshot, MotifWeights, Recommendation, RiskTier};
use crate::session::PredictionStats;

const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const CYAN: &str = "\x1b[36m";

#[derive(Debug, Tabled)]
struct MatchRow {
    motif: String,
    description: String,
}

#[derive(Debug, Tabled)]
struct WeightRow {
    rule: String,
    weight: String,
}

fn symbol_color(symbol: Symbol) -> &'static str {
    match symbol {
        Symbol::SideA => BLUE,
        Symbol::SideB => RED,
        Symbol::Tie => GREEN,
    }
}

/// Colored one-letter rendering of a symbol
pub fn paint(symbol: Symbol) -> String {
    format!("{}{}{}", symbol_color(symbol), symbol.code(), RESET)
}

pub fn print_history(history: &OutcomeSequence) {
    if history.is_empty() {
        println!("(empty)");
        return;
    }
    let line: Vec<String> = history.outcomes().map(|o| paint(o.symbol)).collect();
    println!("{} ({}/{})", line.join(" "), history.len(), history.capacity());
}

pub fn print_snapshot(snapshot: &AnalysisSnapshot) {
    if snapshot.insufficient_data {
        println!(
            "{YELLOW}Not enough history yet ({} recorded){RESET}",
            snapshot.history_len
        );
        return;
    }

    let tier_color = match snapshot.risk.level.tier() {
        RiskTier::Low => GREEN,
        RiskTier::Medium => YELLOW,
        RiskTier::High => RED,
    };
    let tags: Vec<&str> = snapshot.risk.tags.iter().map(|t| t.as_str()).collect();
    println!(
        "Risk: {tier_color}{}/9 ({}){RESET}  score {}  [{}]",
        snapshot.risk.level,
        snapshot.risk.level.tier(),
        snapshot.risk.score,
        tags.join(", ")
    );

    match &snapshot.prediction {
        Some(p) => println!(
            "Next: {}  confidence {}%  via {}  (A {:.0}% / B {:.0}% / T {:.0}%)",
            paint(p.symbol),
            p.confidence,
            p.rule,
            p.distribution.side_a * 100.0,
            p.distribution.side_b * 100.0,
            p.distribution.tie * 100.0
        ),
        None => println!("Next: -"),
    }

    let verdict_color = match snapshot.recommendation {
        Recommendation::Bet => GREEN,
        Recommendation::Watch => YELLOW,
        Recommendation::Avoid => RED,
    };
    println!(
        "Verdict: {verdict_color}{}{RESET}",
        snapshot.recommendation.to_string().to_uppercase()
    );

    if snapshot.matches.is_empty() {
        println!("(no patterns)");
    } else {
        let rows: Vec<MatchRow> = snapshot
            .matches
            .iter()
            .map(|m| MatchRow {
                motif: m.kind.to_string(),
                description: m.description.clone(),
            })
            .collect();
        println!("{}", Table::new(rows));
    }
}

pub fn print_weights(weights: &MotifWeights, stats: PredictionStats) {
    let rows: Vec<WeightRow> = weights
        .iter()
        .map(|(rule, weight)| WeightRow {
            rule: rule.to_string(),
            weight: weight.round_dp(2).to_string(),
        })
        .collect();
    println!("{}", Table::new(rows));
    match stats.hit_rate() {
        Some(rate) => println!(
            "Hit rate: {}/{} ({:.0}%)",
            stats.hits,
            stats.checked,
            rate * 100.0
        ),
        None => println!("Hit rate: -"),
    }
}

pub fn print_banner(title: &str) {
    println!("{CYAN}{title}{RESET}");
}

pub fn print_error(msg: &str) {
    eprintln!("{RED}{msg}{RESET}");
}

pub fn print_success(msg: &str) {
    println!("{GREEN}{msg}{RESET}");
}
