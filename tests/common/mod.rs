//! Shared helpers for the integration tests.

#![allow(dead_code)]

use puzzle_tree::error::{Error, Result};
use puzzle_tree::notation::to_token;
use puzzle_tree::rules::{ChessRules, Destinations, RulesEngine, Side};
use puzzle_tree::{MoveToken, VariantKey};

pub const STANDARD_START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Both sides may castle either way; nothing stands between kings and rooks.
pub const CASTLING_READY: &str = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1";

pub fn standard() -> ChessRules {
    ChessRules::new(VariantKey::Standard).expect("standard chess is supported")
}

/// Two actions per turn, like amazons (move, then shoot). Any on-board
/// coordinate move is legal except a null move; landing on `a1` wins.
pub struct TwoActionEngine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwoActionPosition {
    pub ply: u32,
    pub turn: Side,
    pub actions_left: u8,
    pub won: bool,
}

fn side_code(side: Side) -> &'static str {
    match side {
        Side::P1 => "p1",
        Side::P2 => "p2",
    }
}

impl RulesEngine for TwoActionEngine {
    type Position = TwoActionPosition;
    type Move = MoveToken;

    fn variant(&self) -> VariantKey {
        VariantKey::Amazons
    }

    fn read_position(&self, board_state: &str) -> Result<TwoActionPosition> {
        let invalid = || Error::InvalidBoardState {
            board_state: board_state.to_string(),
            reason: "expected '<ply> <side> <actions> <won>'".to_string(),
        };
        let fields: Vec<&str> = board_state.split(' ').collect();
        let [ply, side, actions, won] = fields[..] else {
            return Err(invalid());
        };

        Ok(TwoActionPosition {
            ply: ply.parse().map_err(|_| invalid())?,
            turn: match side {
                "p1" => Side::P1,
                "p2" => Side::P2,
                _ => return Err(invalid()),
            },
            actions_left: actions.parse().map_err(|_| invalid())?,
            won: won == "1",
        })
    }

    fn parse_move(&self, pos: &TwoActionPosition, native: &str) -> Result<MoveToken> {
        let token = to_token(VariantKey::Amazons, native)?;
        let (from, to) = token.as_str().split_at(token.as_str().len() / 2);
        if from == to || pos.won {
            return Err(Error::IllegalMove {
                notation: native.to_string(),
                ply: pos.ply + 1,
                board_state: self.serialize(pos),
            });
        }
        Ok(token)
    }

    fn apply_move(&self, pos: &TwoActionPosition, mv: &MoveToken) -> TwoActionPosition {
        let (turn, actions_left) = if pos.actions_left > 1 {
            (pos.turn, pos.actions_left - 1)
        } else {
            (!pos.turn, 2)
        };
        TwoActionPosition {
            ply: pos.ply + 1,
            turn,
            actions_left,
            won: mv.as_str().ends_with("a1"),
        }
    }

    fn serialize(&self, pos: &TwoActionPosition) -> String {
        format!(
            "{} {} {} {}",
            pos.ply,
            side_code(pos.turn),
            pos.actions_left,
            u8::from(pos.won)
        )
    }

    fn turn(&self, pos: &TwoActionPosition) -> Side {
        pos.turn
    }

    fn ply(&self, pos: &TwoActionPosition) -> u32 {
        pos.ply
    }

    fn is_check(&self, _pos: &TwoActionPosition) -> bool {
        false
    }

    fn is_checkmate_equivalent(&self, pos: &TwoActionPosition) -> bool {
        pos.won
    }

    fn move_token(&self, _pos: &TwoActionPosition, mv: &MoveToken) -> MoveToken {
        mv.clone()
    }

    fn move_notation(&self, _pos: &TwoActionPosition, mv: &MoveToken) -> String {
        mv.to_string()
    }

    fn legal_destinations(&self, _pos: &TwoActionPosition) -> Destinations {
        Destinations::default()
    }
}

pub const TWO_ACTION_START: &str = "0 p1 2 0";
