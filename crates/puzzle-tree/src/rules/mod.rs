//! The seam between the move tree and a variant's rules.
//!
//! Legality, move application and check detection live behind
//! [`RulesEngine`]; the tree and the validator only see board-state
//! strings, tokens and flags.

mod chess;

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Not;

use serde::{Deserialize, Serialize};

pub use chess::ChessRules;

use crate::error::Result;
use crate::notation::MoveToken;
use crate::variant::VariantKey;

/// First mover (White, Sente, Red) or second mover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[serde(alias = "white")]
    P1,
    #[serde(alias = "black")]
    P2,
}

impl Not for Side {
    type Output = Side;

    fn not(self) -> Side {
        match self {
            Side::P1 => Side::P2,
            Side::P2 => Side::P1,
        }
    }
}

/// Legal destinations handed to the board renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destinations {
    /// Origin square to destination squares.
    pub moves: BTreeMap<String, BTreeSet<String>>,
    /// Role letter to the squares it may be dropped on.
    pub drops: BTreeMap<String, BTreeSet<String>>,
}

impl Destinations {
    pub fn add_move(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.moves.entry(from.into()).or_default().insert(to.into());
    }

    pub fn add_drop(&mut self, role: impl Into<String>, to: impl Into<String>) {
        self.drops.entry(role.into()).or_default().insert(to.into());
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty() && self.drops.is_empty()
    }
}

/// A variant's rules, as consumed by the builder.
pub trait RulesEngine {
    type Position: Clone;
    type Move: Clone;

    fn variant(&self) -> VariantKey;

    fn read_position(&self, board_state: &str) -> Result<Self::Position>;

    /// Resolve a native move string (any notation the engine understands)
    /// against `pos`. Fails with `IllegalMove` or `MalformedNotation`.
    fn parse_move(&self, pos: &Self::Position, native: &str) -> Result<Self::Move>;

    /// `mv` must come from `parse_move` on the same position.
    fn apply_move(&self, pos: &Self::Position, mv: &Self::Move) -> Self::Position;

    fn serialize(&self, pos: &Self::Position) -> String;

    /// Side to move.
    fn turn(&self, pos: &Self::Position) -> Side;

    /// Plies played before `pos`, derived from its move counters.
    fn ply(&self, pos: &Self::Position) -> u32;

    /// The side to move is in check.
    fn is_check(&self, pos: &Self::Position) -> bool;

    /// The side that just moved has won outright (checkmate or the
    /// variant's equivalent).
    fn is_checkmate_equivalent(&self, pos: &Self::Position) -> bool;

    fn move_token(&self, pos: &Self::Position, mv: &Self::Move) -> MoveToken;

    /// Display string in the variant's notation style; `pos` is the
    /// position before the move.
    fn move_notation(&self, pos: &Self::Position, mv: &Self::Move) -> String;

    fn is_castle(&self, _pos: &Self::Position, _mv: &Self::Move) -> bool {
        false
    }

    fn legal_destinations(&self, pos: &Self::Position) -> Destinations;
}
