//! Chess-family rules backed by shakmaty.

use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::uci::UciMove;
use shakmaty::variant::{Variant, VariantPosition};
use shakmaty::{CastlingMode, Color, EnPassantMode, KnownOutcome, Move, Outcome, Position};

use super::{Destinations, RulesEngine, Side};
use crate::error::{Error, Result};
use crate::notation::{self, MoveDisplay, MoveToken};
use crate::variant::VariantKey;

const NO_CASTLING_START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1";

/// Largest fullmove counter whose ply still fits in a `u32`.
const MAX_FULLMOVES: u32 = u32::MAX / 2;

#[derive(Debug, Clone, Copy)]
pub struct ChessRules {
    key: VariantKey,
    variant: Variant,
    mode: CastlingMode,
}

impl ChessRules {
    pub fn new(key: VariantKey) -> Result<Self> {
        use VariantKey::*;

        let (variant, mode) = match key {
            Standard | FromPosition | NoCastling => (Variant::Chess, CastlingMode::Standard),
            Chess960 => (Variant::Chess, CastlingMode::Chess960),
            Antichess => (Variant::Antichess, CastlingMode::Standard),
            KingOfTheHill => (Variant::KingOfTheHill, CastlingMode::Standard),
            ThreeCheck => (Variant::ThreeCheck, CastlingMode::Standard),
            Atomic => (Variant::Atomic, CastlingMode::Standard),
            Horde => (Variant::Horde, CastlingMode::Standard),
            RacingKings => (Variant::RacingKings, CastlingMode::Standard),
            Crazyhouse => (Variant::Crazyhouse, CastlingMode::Standard),
            FiveCheck | Monster | LinesOfAction | ScrambledEggs | Amazons | Shogi | Minishogi
            | Xiangqi | Minixiangqi => return Err(Error::UnsupportedVariant(key)),
        };

        Ok(Self { key, variant, mode })
    }

    /// Board state of the variant's initial position.
    pub fn start_board_state(&self) -> String {
        if self.key == VariantKey::NoCastling {
            return NO_CASTLING_START.to_string();
        }
        self.serialize(&VariantPosition::new(self.variant))
    }

    fn illegal(&self, pos: &VariantPosition, native: &str) -> Error {
        Error::IllegalMove {
            notation: native.to_string(),
            ply: self.ply(pos).saturating_add(1),
            board_state: self.serialize(pos),
        }
    }
}

impl RulesEngine for ChessRules {
    type Position = VariantPosition;
    type Move = Move;

    fn variant(&self) -> VariantKey {
        self.key
    }

    fn read_position(&self, board_state: &str) -> Result<VariantPosition> {
        let invalid = |reason: String| Error::InvalidBoardState {
            board_state: board_state.to_string(),
            reason,
        };
        let fen: Fen = board_state.trim().parse().map_err(|e| invalid(format!("{e}")))?;
        let pos = VariantPosition::from_setup(self.variant, fen.into_setup(), self.mode)
            .map_err(|e| invalid(e.to_string()))?;

        if pos.fullmoves().get() > MAX_FULLMOVES {
            return Err(invalid(format!("fullmove counter above {MAX_FULLMOVES}")));
        }
        Ok(pos)
    }

    fn parse_move(&self, pos: &VariantPosition, native: &str) -> Result<Move> {
        let native = native.trim();

        if let Ok(uci) = native.parse::<UciMove>() {
            return uci.to_move(pos).map_err(|_| self.illegal(pos, native));
        }
        if let Ok(san) = SanPlus::from_ascii(native.as_bytes()) {
            return san.san.to_move(pos).map_err(|_| self.illegal(pos, native));
        }

        Err(Error::MalformedNotation {
            variant: self.key,
            notation: native.to_string(),
        })
    }

    fn apply_move(&self, pos: &VariantPosition, mv: &Move) -> VariantPosition {
        let mut next = pos.clone();
        next.play_unchecked(*mv);
        next
    }

    fn serialize(&self, pos: &VariantPosition) -> String {
        Fen::from_position(pos, EnPassantMode::Legal).to_string()
    }

    fn turn(&self, pos: &VariantPosition) -> Side {
        match pos.turn() {
            Color::White => Side::P1,
            Color::Black => Side::P2,
        }
    }

    fn ply(&self, pos: &VariantPosition) -> u32 {
        let black_to_move = u32::from(pos.turn() == Color::Black);
        // Positions reached by play can run past MAX_FULLMOVES.
        (pos.fullmoves().get() - 1)
            .saturating_mul(2)
            .saturating_add(black_to_move)
    }

    fn is_check(&self, pos: &VariantPosition) -> bool {
        pos.is_check()
    }

    fn is_checkmate_equivalent(&self, pos: &VariantPosition) -> bool {
        match pos.outcome() {
            Outcome::Known(KnownOutcome::Decisive { winner }) => winner != pos.turn(),
            _ => false,
        }
    }

    fn move_token(&self, _pos: &VariantPosition, mv: &Move) -> MoveToken {
        MoveToken::new(mv.to_uci(self.mode).to_string())
    }

    fn move_notation(&self, pos: &VariantPosition, mv: &Move) -> String {
        let san = SanPlus::from_move(pos.clone(), *mv).to_string();
        let uci = self.move_token(pos, mv);
        let fen = self.serialize(&self.apply_move(pos, mv));
        let prev_fen = self.serialize(pos);

        let rendered = notation::display(
            self.key.notation_style(),
            &MoveDisplay {
                san: &san,
                uci: uci.as_str(),
                fen: &fen,
                prev_fen: Some(&prev_fen),
            },
            self.key,
        );
        rendered.unwrap_or(san)
    }

    fn is_castle(&self, _pos: &VariantPosition, mv: &Move) -> bool {
        mv.is_castle()
    }

    fn legal_destinations(&self, pos: &VariantPosition) -> Destinations {
        let mut dests = Destinations::default();

        for mv in pos.legal_moves() {
            match mv {
                Move::Put { role, to } => dests.add_drop(role.upper_char().to_string(), to.to_string()),
                Move::Castle { king, rook } => {
                    // Both the king's landing square and the rook square.
                    dests.add_move(king.to_string(), rook.to_string());
                    if let Some(side) = mv.castling_side() {
                        let king_to = side.king_to(pos.turn());
                        if king_to != king {
                            dests.add_move(king.to_string(), king_to.to_string());
                        }
                    }
                }
                Move::Normal { from, to, .. } | Move::EnPassant { from, to } => {
                    dests.add_move(from.to_string(), to.to_string())
                }
            }
        }

        dests
    }
}
