//! PGN import/export - lightweight regex-based.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::rules::Side;
use crate::tree::{MoveTree, TreePath};
use crate::variant::VariantKey;

const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\[(\w+)\s+"([^"]*)"\]"#).unwrap());
static HEADER_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]").unwrap());
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[^}]*\}|;[^\n]*").unwrap());
static VARIATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^()]*\)").unwrap());
static MOVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[KQRBN]?[a-h]?[1-8]?x?[a-h][1-8](?:=[QRBNK])?[+#]?|[PNBRQ]?@[a-h][1-8][+#]?|O-O-O[+#]?|O-O[+#]?",
    )
    .unwrap()
});

/// Headers and SAN movetext of one game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PgnGame {
    pub headers: BTreeMap<String, String>,
    pub variant: VariantKey,
    /// Starting position when the game has a `FEN` header.
    pub fen: Option<String>,
    pub moves: Vec<String>,
}

impl PgnGame {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn start_board_state(&self) -> &str {
        self.fen.as_deref().unwrap_or(STANDARD_START_FEN)
    }
}

/// `King of the Hill`, `Three-check`, `From Position` and the plain keys.
fn parse_variant_header(value: &str) -> Result<VariantKey> {
    let compact: String = value.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
    compact
        .parse()
        .map_err(|_| Error::UnknownVariant(value.to_string()))
}

pub fn parse_pgn(pgn: &str) -> Result<PgnGame> {
    let headers: BTreeMap<String, String> = HEADER_RE
        .captures_iter(pgn)
        .map(|cap| (cap[1].to_string(), cap[2].to_string()))
        .collect();

    let variant = match headers.get("Variant") {
        Some(value) => parse_variant_header(value)?,
        None => VariantKey::Standard,
    };
    let fen = headers.get("FEN").filter(|f| !f.is_empty()).cloned();

    Ok(PgnGame {
        moves: extract_moves(pgn),
        headers,
        variant,
        fen,
    })
}

/// SAN moves from PGN text, with headers, comments and variations removed.
pub fn extract_moves(pgn: &str) -> Vec<String> {
    let no_headers = HEADER_LINE_RE.replace_all(pgn, "");
    let mut text = COMMENT_RE.replace_all(&no_headers, "").into_owned();

    // innermost variations first
    while VARIATION_RE.is_match(&text) {
        text = VARIATION_RE.replace_all(&text, "").into_owned();
    }

    MOVE_RE
        .find_iter(&text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Movetext for the moves along `path`, numbered from each node's turn
/// index: `1. e4 e5 2. Nf3`, or `12... Qh4#` when the first move is P2's.
pub fn movetext(tree: &MoveTree, path: &TreePath) -> Result<String> {
    let mut parts: Vec<String> = Vec::new();
    let mut previous_mover: Option<Side> = None;

    for &id in path.ids() {
        let node = tree.node(id)?;
        let Some(mover) = node.side_that_moved else {
            continue;
        };
        let move_number = (node.turn_index + 1) / 2;

        match (mover, previous_mover) {
            (Side::P1, Some(Side::P1)) => parts.push(node.notation.clone()),
            (Side::P1, _) => parts.push(format!("{}. {}", move_number, node.notation)),
            (Side::P2, None) => parts.push(format!("{}... {}", move_number, node.notation)),
            (Side::P2, Some(_)) => parts.push(node.notation.clone()),
        }
        previous_mover = Some(mover);
    }

    Ok(parts.join(" "))
}

/// A complete PGN for `path`: `Variant`, `FEN`/`SetUp` when the tree does
/// not start from the standard position, then movetext and `*`.
pub fn export_pgn(tree: &MoveTree, path: &TreePath, variant: VariantKey) -> Result<String> {
    let root = tree.node(tree.root())?;
    let mut out = String::new();

    if variant != VariantKey::Standard {
        out.push_str(&format!("[Variant \"{}\"]\n", variant));
    }
    if root.board_state != STANDARD_START_FEN {
        out.push_str(&format!("[FEN \"{}\"]\n[SetUp \"1\"]\n", root.board_state));
    }
    if !out.is_empty() {
        out.push('\n');
    }

    let moves = movetext(tree, path)?;
    if moves.is_empty() {
        out.push('*');
    } else {
        out.push_str(&format!("{moves} *"));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_from_move_list;
    use crate::rules::ChessRules;

    #[test]
    fn test_parse_pgn_basic() {
        let pgn = r#"[White "Player1"]
[Black "Player2"]
[Result "1-0"]
[Date "2025.01.15"]

1. e4 e5 2. Nf3 {book} Nc6 (2... d6 3. d4 (3. Bc4)) 3. O-O-O+ 1-0"#;

        let game = parse_pgn(pgn).unwrap();
        assert_eq!(game.header("White"), Some("Player1"));
        assert_eq!(game.header("Missing"), None);
        assert_eq!(game.variant, VariantKey::Standard);
        assert_eq!(game.moves, ["e4", "e5", "Nf3", "Nc6", "O-O-O+"]);
        assert_eq!(game.start_board_state(), STANDARD_START_FEN);
    }

    #[test]
    fn test_parse_variant_and_fen_headers() {
        let pgn = r#"[Variant "King of the Hill"]
[FEN "4k3/8/8/8/8/3K4/8/8 w - - 0 1"]
[SetUp "1"]

1. Kd4 *"#;
        let game = parse_pgn(pgn).unwrap();
        assert_eq!(game.variant, VariantKey::KingOfTheHill);
        assert_eq!(game.start_board_state(), "4k3/8/8/8/8/3K4/8/8 w - - 0 1");

        let unknown = r#"[Variant "Checkers"]"#;
        assert!(matches!(parse_pgn(unknown), Err(Error::UnknownVariant(_))));
    }

    #[test]
    fn test_crazyhouse_drops_are_extracted() {
        assert_eq!(
            extract_moves("1. e4 d5 2. exd5 Qxd5 3. N@e4 @d4"),
            ["e4", "d5", "exd5", "Qxd5", "N@e4", "@d4"]
        );
    }

    #[test]
    fn test_movetext_numbers() {
        let engine = ChessRules::new(VariantKey::Standard).unwrap();
        let start = engine.start_board_state();
        let tree = build_from_move_list(&engine, &start, &["e4", "e5", "Nf3"]).unwrap();
        assert_eq!(movetext(&tree, &tree.mainline()).unwrap(), "1. e4 e5 2. Nf3");
        assert_eq!(export_pgn(&tree, &tree.mainline(), VariantKey::Standard).unwrap(), "1. e4 e5 2. Nf3 *");
    }

    #[test]
    fn test_movetext_starting_on_p2() {
        let engine = ChessRules::new(VariantKey::Standard).unwrap();
        let fen = "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2";
        let tree = build_from_move_list(&engine, fen, &["Qh4#"]).unwrap();

        assert_eq!(movetext(&tree, &tree.mainline()).unwrap(), "2... Qh4#");
        let pgn = export_pgn(&tree, &tree.mainline(), VariantKey::Standard).unwrap();
        assert!(pgn.starts_with(&format!("[FEN \"{fen}\"]\n[SetUp \"1\"]\n\n")));
        assert!(pgn.ends_with("2... Qh4# *"));
    }

    #[test]
    fn test_round_trip_through_builder() {
        let pgn = "1. d4 d5 2. c4 e6 3. Nc3 Nf6 *";
        let game = parse_pgn(pgn).unwrap();
        let engine = ChessRules::new(game.variant).unwrap();
        let tree = build_from_move_list(&engine, game.start_board_state(), &game.moves).unwrap();
        assert_eq!(movetext(&tree, &tree.mainline()).unwrap(), "1. d4 d5 2. c4 e6 3. Nc3 Nf6");
    }
}
