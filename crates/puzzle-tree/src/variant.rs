//! Variant capability table.
//!
//! Every per-variant decision the engine makes (notation style, castling
//! aliases, turn semantics, board geometry) is read from the record returned
//! by [`VariantKey::capabilities`], one exhaustive `match`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Castling spellings: king-to-rook square on the left, king-two-squares on
/// the right. Closed table; anything not listed is compared literally.
pub const ALT_CASTLES: &[(&str, &str)] = &[
    ("e1a1", "e1c1"),
    ("e1h1", "e1g1"),
    ("e8a8", "e8c8"),
    ("e8h8", "e8g8"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VariantKey {
    #[default]
    Standard,
    Chess960,
    FromPosition,
    NoCastling,
    Antichess,
    KingOfTheHill,
    ThreeCheck,
    FiveCheck,
    Atomic,
    Horde,
    RacingKings,
    Crazyhouse,
    Monster,
    LinesOfAction,
    ScrambledEggs,
    Amazons,
    Shogi,
    Minishogi,
    Xiangqi,
    Minixiangqi,
}

/// Move-string convention used by a variant's tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotationStyle {
    /// Standard algebraic notation.
    San,
    /// Coordinate notation, origin + destination.
    Uci,
    /// Shogi notation (`P-76`, `G49-58`, `P*54`).
    Usi,
    /// Xiangqi notation (`H2+3`, `K5=6`).
    Wxf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSize {
    pub files: u8,
    pub ranks: u8,
}

impl BoardSize {
    pub const fn new(files: u8, ranks: u8) -> Self {
        Self { files, ranks }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub notation_style: NotationStyle,
    pub castle_aliases: &'static [(&'static str, &'static str)],
    /// One side may act more than once before the turn passes.
    pub multi_action_per_turn: bool,
    pub board: BoardSize,
}

const NO_ALIASES: &[(&str, &str)] = &[];

impl VariantKey {
    pub const ALL: [VariantKey; 20] = [
        VariantKey::Standard,
        VariantKey::Chess960,
        VariantKey::FromPosition,
        VariantKey::NoCastling,
        VariantKey::Antichess,
        VariantKey::KingOfTheHill,
        VariantKey::ThreeCheck,
        VariantKey::FiveCheck,
        VariantKey::Atomic,
        VariantKey::Horde,
        VariantKey::RacingKings,
        VariantKey::Crazyhouse,
        VariantKey::Monster,
        VariantKey::LinesOfAction,
        VariantKey::ScrambledEggs,
        VariantKey::Amazons,
        VariantKey::Shogi,
        VariantKey::Minishogi,
        VariantKey::Xiangqi,
        VariantKey::Minixiangqi,
    ];

    pub fn capabilities(self) -> Capabilities {
        use NotationStyle::*;
        use VariantKey::*;

        let chess = BoardSize::new(8, 8);
        let (notation_style, castle_aliases, multi_action_per_turn, board) = match self {
            Standard | Chess960 | FromPosition | KingOfTheHill | ThreeCheck | FiveCheck
            | Atomic | Horde | Crazyhouse => (San, ALT_CASTLES, false, chess),
            Monster => (San, ALT_CASTLES, true, chess),
            NoCastling | Antichess | RacingKings => (San, NO_ALIASES, false, chess),
            LinesOfAction | ScrambledEggs => (Uci, NO_ALIASES, false, chess),
            Amazons => (Uci, NO_ALIASES, true, BoardSize::new(10, 10)),
            Shogi => (Usi, NO_ALIASES, false, BoardSize::new(9, 9)),
            Minishogi => (Usi, NO_ALIASES, false, BoardSize::new(5, 5)),
            Xiangqi => (Wxf, NO_ALIASES, false, BoardSize::new(9, 10)),
            Minixiangqi => (Wxf, NO_ALIASES, false, BoardSize::new(7, 7)),
        };

        Capabilities {
            notation_style,
            castle_aliases,
            multi_action_per_turn,
            board,
        }
    }

    pub fn notation_style(self) -> NotationStyle {
        self.capabilities().notation_style
    }

    pub fn has_castling(self) -> bool {
        !self.capabilities().castle_aliases.is_empty()
    }

    pub const fn key(self) -> &'static str {
        match self {
            VariantKey::Standard => "standard",
            VariantKey::Chess960 => "chess960",
            VariantKey::FromPosition => "fromPosition",
            VariantKey::NoCastling => "noCastling",
            VariantKey::Antichess => "antichess",
            VariantKey::KingOfTheHill => "kingOfTheHill",
            VariantKey::ThreeCheck => "threeCheck",
            VariantKey::FiveCheck => "fiveCheck",
            VariantKey::Atomic => "atomic",
            VariantKey::Horde => "horde",
            VariantKey::RacingKings => "racingKings",
            VariantKey::Crazyhouse => "crazyhouse",
            VariantKey::Monster => "monster",
            VariantKey::LinesOfAction => "linesOfAction",
            VariantKey::ScrambledEggs => "scrambledEggs",
            VariantKey::Amazons => "amazons",
            VariantKey::Shogi => "shogi",
            VariantKey::Minishogi => "minishogi",
            VariantKey::Xiangqi => "xiangqi",
            VariantKey::Minixiangqi => "minixiangqi",
        }
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for VariantKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VariantKey::ALL
            .into_iter()
            .find(|v| v.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownVariant(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trips_through_from_str() {
        for variant in VariantKey::ALL {
            assert_eq!(variant.key().parse::<VariantKey>().unwrap(), variant);
        }
        assert!(matches!(
            "checkers".parse::<VariantKey>(),
            Err(Error::UnknownVariant(_))
        ));
    }

    #[test]
    fn test_serde_uses_the_same_keys() {
        for variant in VariantKey::ALL {
            let json = serde_json::to_string(&variant).unwrap();
            assert_eq!(json, format!("\"{}\"", variant.key()));
        }
    }

    #[test]
    fn test_castling_only_where_castling_exists() {
        assert!(VariantKey::Standard.has_castling());
        assert!(VariantKey::Crazyhouse.has_castling());
        assert!(!VariantKey::Antichess.has_castling());
        assert!(!VariantKey::RacingKings.has_castling());
        assert!(!VariantKey::Shogi.has_castling());
    }

    #[test]
    fn test_notation_styles() {
        assert_eq!(VariantKey::Atomic.notation_style(), NotationStyle::San);
        assert_eq!(VariantKey::LinesOfAction.notation_style(), NotationStyle::Uci);
        assert_eq!(VariantKey::Minishogi.notation_style(), NotationStyle::Usi);
        assert_eq!(VariantKey::Xiangqi.notation_style(), NotationStyle::Wxf);
        assert_eq!(
            VariantKey::Xiangqi.capabilities().board,
            BoardSize::new(9, 10)
        );
    }

    #[test]
    fn test_multi_action_variants() {
        let multi: Vec<_> = VariantKey::ALL
            .into_iter()
            .filter(|v| v.capabilities().multi_action_per_turn)
            .collect();
        assert_eq!(multi, vec![VariantKey::Monster, VariantKey::Amazons]);
    }
}
