//! Notation adapter: native move strings to [`MoveToken`]s, castling alias
//! resolution and per-style display strings.
//!
//! Everything here is pure. Position-relative notations (SAN, WXF) cannot
//! be turned into tokens without a board; those go through
//! [`RulesEngine::parse_move`](crate::rules::RulesEngine::parse_move).

mod board;
mod usi;
mod wxf;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use shakmaty::san::SanPlus;

use crate::error::{Error, Result};
use crate::variant::{BoardSize, NotationStyle, VariantKey};

static COORDINATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z])([1-9][0-9]?)([a-z])([1-9][0-9]?)([qrbnk+=]?)$").unwrap()
});
static DROP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z])@([a-z])([1-9][0-9]?)$").unwrap());

/// A move in coordinate form: `e2e4`, `e7e8q`, `b10c8`, `N@f3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveToken(String);

impl MoveToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MoveToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MoveToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for MoveToken {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for MoveToken {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

fn square_on_board(file: &str, rank: &str, board: BoardSize) -> bool {
    let file_ok = file.bytes().next().is_some_and(|f| f - b'a' < board.files);
    let rank_ok = rank.parse::<u8>().is_ok_and(|r| (1..=board.ranks).contains(&r));
    file_ok && rank_ok
}

fn is_coordinate(native: &str, board: BoardSize) -> bool {
    if let Some(caps) = COORDINATE_RE.captures(native) {
        return square_on_board(&caps[1], &caps[2], board) && square_on_board(&caps[3], &caps[4], board);
    }
    DROP_RE
        .captures(native)
        .is_some_and(|caps| square_on_board(&caps[2], &caps[3], board))
}

/// Convert a native move string into a token for `variant`.
///
/// Coordinate notation is accepted for every variant. USI is converted for
/// the shogi family. Well-formed SAN or WXF yields
/// [`Error::PositionRequired`]; anything else is malformed.
pub fn to_token(variant: VariantKey, native: &str) -> Result<MoveToken> {
    let native = native.trim();
    let board = variant.capabilities().board;

    if is_coordinate(native, board) {
        return Ok(MoveToken::new(native));
    }

    let position_required = match variant.notation_style() {
        NotationStyle::Usi => {
            if let Some(token) = usi::to_uci(native, board) {
                return Ok(MoveToken::new(token));
            }
            false
        }
        NotationStyle::Wxf => wxf::is_wxf(native),
        NotationStyle::San => SanPlus::from_ascii(native.as_bytes()).is_ok(),
        NotationStyle::Uci => false,
    };

    if position_required {
        Err(Error::PositionRequired {
            variant,
            notation: native.to_string(),
        })
    } else {
        Err(Error::MalformedNotation {
            variant,
            notation: native.to_string(),
        })
    }
}

/// Canonical (king-two-squares) spelling of a castling token. Tokens not in
/// the alias table, or variants without castling, come back unchanged.
pub fn resolve_castle_alias(variant: VariantKey, token: &MoveToken) -> MoveToken {
    variant
        .capabilities()
        .castle_aliases
        .iter()
        .find(|(king_to_rook, _)| token == *king_to_rook)
        .map(|(_, canonical)| MoveToken::new(*canonical))
        .unwrap_or_else(|| token.clone())
}

/// Whether a played move satisfies an expected token. Aliases are only
/// consulted when the played move was a castling move.
pub fn tokens_match(
    variant: VariantKey,
    played: &MoveToken,
    played_is_castle: bool,
    expected: &MoveToken,
) -> bool {
    played == expected
        || (played_is_castle
            && resolve_castle_alias(variant, played) == resolve_castle_alias(variant, expected))
}

/// Inputs for rendering one move.
#[derive(Debug, Clone, Copy)]
pub struct MoveDisplay<'a> {
    pub san: &'a str,
    pub uci: &'a str,
    /// Position after the move.
    pub fen: &'a str,
    /// Position before the move; shogi display needs it.
    pub prev_fen: Option<&'a str>,
}

/// Render a move in `style` for `variant`'s board.
pub fn display(style: NotationStyle, mv: &MoveDisplay<'_>, variant: VariantKey) -> Result<String> {
    let board = variant.capabilities().board;
    let unreadable = || Error::InvalidBoardState {
        board_state: mv.fen.to_string(),
        reason: format!("no piece on the destination of '{}'", mv.uci),
    };

    match style {
        NotationStyle::San => Ok(mv.san.strip_prefix('P').unwrap_or(mv.san).to_string()),
        NotationStyle::Uci => Ok(mv.uci.to_string()),
        NotationStyle::Usi => {
            let prev_fen = mv.prev_fen.ok_or_else(|| Error::PositionRequired {
                variant,
                notation: mv.uci.to_string(),
            })?;
            usi::display(mv.uci, mv.fen, prev_fen, board).ok_or_else(unreadable)
        }
        NotationStyle::Wxf => wxf::display(mv.uci, mv.fen, board).ok_or_else(unreadable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(s: &str) -> MoveToken {
        MoveToken::new(s)
    }

    #[test]
    fn test_coordinate_tokens_for_every_variant() {
        assert_eq!(to_token(VariantKey::Standard, "e2e4").unwrap(), "e2e4");
        assert_eq!(to_token(VariantKey::Standard, "e7e8q").unwrap(), "e7e8q");
        assert_eq!(to_token(VariantKey::Crazyhouse, "N@f3").unwrap(), "N@f3");
        assert_eq!(to_token(VariantKey::Xiangqi, "b10c8").unwrap(), "b10c8");
        assert_eq!(to_token(VariantKey::Shogi, "c3c4").unwrap(), "c3c4");
        assert_eq!(to_token(VariantKey::Amazons, "j10j9").unwrap(), "j10j9");
    }

    #[test]
    fn test_coordinates_off_the_board_are_malformed() {
        assert!(matches!(
            to_token(VariantKey::Standard, "e2e9"),
            Err(Error::MalformedNotation { .. })
        ));
        assert!(matches!(
            to_token(VariantKey::Minishogi, "a1f1"),
            Err(Error::MalformedNotation { .. })
        ));
        assert!(matches!(
            to_token(VariantKey::LinesOfAction, "hello"),
            Err(Error::MalformedNotation { .. })
        ));
    }

    #[test]
    fn test_usi_is_converted() {
        assert_eq!(to_token(VariantKey::Shogi, "7g7f").unwrap(), "c3c4");
        assert_eq!(to_token(VariantKey::Shogi, "8h2b+").unwrap(), "b2h8+");
        assert_eq!(to_token(VariantKey::Shogi, "P*5e").unwrap(), "P@e5");
    }

    #[test]
    fn test_position_relative_notation() {
        for (variant, native) in [
            (VariantKey::Standard, "Nf3"),
            (VariantKey::Standard, "O-O"),
            (VariantKey::Atomic, "exd5+"),
            (VariantKey::Xiangqi, "H2+3"),
        ] {
            assert!(
                matches!(to_token(variant, native), Err(Error::PositionRequired { .. })),
                "{native}"
            );
        }
    }

    #[test]
    fn test_castle_alias_resolution() {
        let v = VariantKey::Standard;
        assert_eq!(resolve_castle_alias(v, &token("e1h1")), "e1g1");
        assert_eq!(resolve_castle_alias(v, &token("e8a8")), "e8c8");
        assert_eq!(resolve_castle_alias(v, &token("e1g1")), "e1g1");
        assert_eq!(resolve_castle_alias(v, &token("d1a1")), "d1a1");
        assert_eq!(resolve_castle_alias(VariantKey::Antichess, &token("e1h1")), "e1h1");
    }

    #[test]
    fn test_tokens_match_is_symmetric_for_castles() {
        let v = VariantKey::Standard;
        assert!(tokens_match(v, &token("e1a1"), true, &token("e1c1")));
        assert!(tokens_match(v, &token("e1c1"), true, &token("e1a1")));
        assert!(tokens_match(v, &token("e8g8"), true, &token("e8h8")));
        assert!(!tokens_match(v, &token("e1a1"), true, &token("e1g1")));
    }

    #[test]
    fn test_aliases_ignored_for_non_castling_moves() {
        assert!(!tokens_match(VariantKey::Standard, &token("e1h1"), false, &token("e1g1")));
        assert!(tokens_match(VariantKey::Standard, &token("e2e4"), false, &token("e2e4")));
    }

    #[test]
    fn test_display_styles() {
        let mv = MoveDisplay {
            san: "P@e4",
            uci: "P@e4",
            fen: "",
            prev_fen: None,
        };
        assert_eq!(display(NotationStyle::San, &mv, VariantKey::Crazyhouse).unwrap(), "@e4");
        assert_eq!(display(NotationStyle::Uci, &mv, VariantKey::Crazyhouse).unwrap(), "P@e4");

        let shogi = MoveDisplay {
            san: "",
            uci: "e3e4",
            fen: "lnsgkgsnl/1r5b1/ppppppppp/9/9/4P4/PPPP1PPPP/1B5R1/LNSGKGSNL[] b - - 1 1",
            prev_fen: None,
        };
        assert!(matches!(
            display(NotationStyle::Usi, &shogi, VariantKey::Shogi),
            Err(Error::PositionRequired { .. })
        ));
    }

    #[test]
    fn test_token_serializes_as_plain_string() {
        assert_eq!(serde_json::to_string(&token("e2e4")).unwrap(), "\"e2e4\"");
    }
}
