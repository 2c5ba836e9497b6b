//! Puzzle move trees.
//!
//! Replays moves for a board-game variant into an annotated move tree and
//! checks a player's moves against a puzzle solution. Notation handling
//! covers SAN, coordinate (UCI), shogi (USI) and xiangqi (WXF) styles.
//! Rules come from a [`rules::RulesEngine`]; [`rules::ChessRules`] covers
//! the chess family through shakmaty.

pub mod builder;
pub mod config;
pub mod error;
pub mod notation;
pub mod pgn;
pub mod puzzle;
pub mod rules;
pub mod tree;
pub mod validator;
pub mod variant;

pub use error::{Error, Result};
pub use notation::MoveToken;
pub use puzzle::Puzzle;
pub use rules::{RulesEngine, Side};
pub use tree::{MoveTree, NodeId, TreePath};
pub use validator::{on_move, Transition, ValidationSession, Verdict};
pub use variant::VariantKey;
