//! Puzzle definitions and the import formats they arrive in.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::builder::build_from_move_list;
use crate::error::{Error, Result};
use crate::notation::{to_token, MoveToken};
use crate::rules::{RulesEngine, Side};
use crate::tree::MoveTree;
use crate::validator::ValidationSession;
use crate::variant::VariantKey;

/// Puzzle as stored by the persistence layer. Solution moves may be in any
/// notation [`to_token`] accepts for the variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PuzzleDefinition {
    id: String,
    #[serde(default)]
    variant: VariantKey,
    #[serde(alias = "fen")]
    initial_board_state: String,
    solution: Vec<String>,
    #[serde(alias = "color")]
    side_to_solve: Side,
    #[serde(default)]
    setup_line: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    id: String,
    variant: VariantKey,
    initial_board_state: String,
    solution: Vec<MoveToken>,
    side_to_solve: Side,
    setup_line: Vec<String>,
}

impl Puzzle {
    pub fn new<S: AsRef<str>>(
        id: impl Into<String>,
        variant: VariantKey,
        initial_board_state: impl Into<String>,
        solution: &[S],
        side_to_solve: Side,
    ) -> Result<Self> {
        let solution = solution
            .iter()
            .map(|mv| to_token(variant, mv.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        if solution.is_empty() {
            return Err(Error::InvalidPuzzle("empty solution".to_string()));
        }

        Ok(Self {
            id: id.into(),
            variant,
            initial_board_state: initial_board_state.into(),
            solution,
            side_to_solve,
            setup_line: Vec::new(),
        })
    }

    /// Moves replayed from the initial board state before solving starts.
    pub fn with_setup_line<S: AsRef<str>>(mut self, setup_line: &[S]) -> Self {
        self.setup_line = setup_line.iter().map(|mv| mv.as_ref().to_string()).collect();
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let def: PuzzleDefinition = serde_json::from_str(json)?;
        Ok(Self::new(
            def.id,
            def.variant,
            def.initial_board_state,
            &def.solution,
            def.side_to_solve,
        )?
        .with_setup_line(&def.setup_line))
    }

    /// Lichess puzzle CSV row: `PuzzleId,FEN,Moves,...`. The first move is
    /// the opponent's and becomes the setup line; the side to move after
    /// it solves.
    pub fn from_lichess_line(line: &str) -> Result<Self> {
        let mut fields = line.trim().split(',');
        let (Some(id), Some(fen), Some(moves)) = (fields.next(), fields.next(), fields.next()) else {
            return Err(Error::InvalidPuzzle(format!("expected id,fen,moves in '{line}'")));
        };

        let moves: Vec<&str> = moves.split_whitespace().collect();
        let Some((setup, solution)) = moves.split_first() else {
            return Err(Error::InvalidPuzzle(format!("puzzle {id} has no moves")));
        };
        let side_to_solve = match fen.split(' ').nth(1) {
            Some("w") => Side::P2,
            Some("b") => Side::P1,
            _ => {
                return Err(Error::InvalidBoardState {
                    board_state: fen.to_string(),
                    reason: "missing side to move".to_string(),
                })
            }
        };

        Ok(Self::new(id, VariantKey::Standard, fen, solution, side_to_solve)?.with_setup_line(&[*setup]))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn variant(&self) -> VariantKey {
        self.variant
    }

    pub fn initial_board_state(&self) -> &str {
        &self.initial_board_state
    }

    pub fn solution(&self) -> &[MoveToken] {
        &self.solution
    }

    pub fn side_to_solve(&self) -> Side {
        self.side_to_solve
    }

    pub fn setup_line(&self) -> &[String] {
        &self.setup_line
    }

    /// Build the tree up to the puzzle start and open a session there.
    pub fn start<E: RulesEngine>(&self, engine: &E) -> Result<(MoveTree, ValidationSession)> {
        if engine.variant() != self.variant {
            return Err(Error::InvalidPuzzle(format!(
                "puzzle {} is {} but the engine plays {}",
                self.id,
                self.variant,
                engine.variant()
            )));
        }

        let tree = build_from_move_list(engine, &self.initial_board_state, &self.setup_line)?;
        let start = tree.mainline();
        debug!(
            puzzle = %self.id,
            setup_moves = self.setup_line.len(),
            solution_moves = self.solution.len(),
            "Started puzzle"
        );
        Ok((tree, ValidationSession::new(start)))
    }
}
