//! Replay a puzzle attempt and print the outcome as JSON.
//!
//! Usage: replay-puzzle --puzzle puzzle.json --attempt e2e4,g1f3 [--reveal] [--pretty] [--tree]

use std::fs;

use anyhow::Context;
use tracing::{info, warn};

use puzzle_tree::builder::{extend_tree, play_move};
use puzzle_tree::config::ReplayConfig;
use puzzle_tree::pgn::movetext;
use puzzle_tree::rules::ChessRules;
use puzzle_tree::{on_move, Puzzle, Transition};

fn load_puzzle(config: &ReplayConfig) -> anyhow::Result<Puzzle> {
    let path = config.puzzle_file()?;
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let puzzle = if path.extension().is_some_and(|ext| ext == "csv") {
        let line = contents
            .lines()
            .find(|line| !line.trim().is_empty() && !line.starts_with("PuzzleId"))
            .context("CSV file has no puzzle rows")?;
        Puzzle::from_lichess_line(line)?
    } else {
        Puzzle::from_json(&contents)?
    };
    Ok(puzzle)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().collect();
    let config = ReplayConfig::from_env().with_args(&args);
    let puzzle = load_puzzle(&config)?;
    let engine = ChessRules::new(puzzle.variant())
        .with_context(|| format!("Puzzle {} cannot be replayed", puzzle.id()))?;

    let (mut tree, mut session) = puzzle.start(&engine)?;
    let start = session
        .initial_path()
        .last()
        .context("Puzzle start path is empty")?;
    info!(puzzle = %puzzle.id(), variant = %puzzle.variant(), "Replaying attempt");

    if config.attempt.is_empty() {
        warn!("No attempt moves given");
    }

    let mut at = start;
    for native in &config.attempt {
        if session.verdict().is_final() {
            warn!(native = %native, "Attempt already decided, ignoring remaining moves");
            break;
        }

        at = play_move(&engine, &mut tree, at, native)?;
        let transition = on_move(&mut session, &puzzle, &mut tree, at)?;
        // Scripted replies are played for the opponent only.
        if let Transition::Good { reply } = transition {
            if tree.node(at)?.active_side != puzzle.side_to_solve() {
                at = play_move(&engine, &mut tree, at, reply.as_str())?;
                on_move(&mut session, &puzzle, &mut tree, at)?;
            }
        }
    }

    if session.verdict().is_final() {
        session.enter_view_mode();
    }
    if config.reveal_solution {
        extend_tree(&engine, &mut tree, start, puzzle.solution(), puzzle.side_to_solve())?;
    }

    let played = tree.path_to(at)?;
    let mut report = serde_json::json!({
        "puzzle": puzzle.id(),
        "variant": puzzle.variant(),
        "verdict": session.verdict(),
        "cursor": session.cursor(),
        "moves": movetext(&tree, &played)?,
    });
    if config.log_tree {
        report["tree"] = tree.to_json();
    }

    let output = if config.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{output}");

    Ok(())
}
