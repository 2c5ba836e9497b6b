//! Replay configuration from environment variables and command-line flags.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplayConfig {
    /// Puzzle definition: JSON, or a Lichess CSV export (`.csv`).
    pub puzzle_file: Option<PathBuf>,

    /// Moves the player tries, in any notation the variant accepts.
    pub attempt: Vec<String>,

    /// Graft the full solution into the tree after the attempt.
    pub reveal_solution: bool,

    /// Pretty-print the JSON report
    pub pretty: bool,

    /// Include the whole move tree in the report
    pub log_tree: bool,
}

fn parse_moves(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

impl ReplayConfig {
    /// Read `PUZZLE_FILE`, `PUZZLE_ATTEMPT`, `PUZZLE_REVEAL`, `PUZZLE_PRETTY`
    /// and `PUZZLE_LOG_TREE`. Unset variables take their defaults.
    pub fn from_env() -> Self {
        let flag = |name: &str| env::var(name).map(|v| parse_flag(&v)).unwrap_or(false);

        Self {
            puzzle_file: env::var("PUZZLE_FILE").ok().map(PathBuf::from),
            attempt: env::var("PUZZLE_ATTEMPT")
                .map(|v| parse_moves(&v))
                .unwrap_or_default(),
            reveal_solution: flag("PUZZLE_REVEAL"),
            pretty: flag("PUZZLE_PRETTY"),
            log_tree: flag("PUZZLE_LOG_TREE"),
        }
    }

    /// Apply `--puzzle <file>`, `--attempt e2e4,e7e5`, `--reveal`,
    /// `--pretty` and `--tree` on top of the environment.
    pub fn with_args(mut self, args: &[String]) -> Self {
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--puzzle" => {
                    if let Some(path) = args.get(i + 1) {
                        self.puzzle_file = Some(PathBuf::from(path));
                        i += 1;
                    }
                }
                "--attempt" => {
                    if let Some(moves) = args.get(i + 1) {
                        self.attempt = parse_moves(moves);
                        i += 1;
                    }
                }
                "--reveal" => self.reveal_solution = true,
                "--pretty" => self.pretty = true,
                "--tree" => self.log_tree = true,
                _ => {}
            }
            i += 1;
        }
        self
    }

    pub fn puzzle_file(&self) -> Result<&Path> {
        self.puzzle_file
            .as_deref()
            .ok_or(Error::Config("PUZZLE_FILE not set and no --puzzle given"))
    }
}
