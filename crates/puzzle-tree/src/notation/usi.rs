//! Shogi notation: coordinate conversion for USI move strings and the
//! display form shown in move lists (`P-76`, `Px55`, `P*54`, `G49-58`).

use std::sync::LazyLock;

use regex::Regex;

use super::board::{coord_label, parse_uci_squares, BoardSnapshot, Coord};
use crate::variant::BoardSize;

static USI_MOVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([1-9])([a-i])([1-9])([a-i])(\+?)$").unwrap());
static USI_DROP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([PLNSGBR])\*([1-9])([a-i])$").unwrap());

/// `7g` (file 7, rank g) on a 9x9 board is the coordinate square `c3`.
fn usi_square_to_uci(file: &str, rank: &str, board: BoardSize) -> Option<String> {
    let file: u8 = file.parse().ok()?;
    let rank_index = rank.bytes().next()?.checked_sub(b'a')?;
    if file == 0 || file > board.files || rank_index >= board.ranks {
        return None;
    }
    let file_char = (b'a' + board.files - file) as char;
    Some(format!("{}{}", file_char, board.ranks - rank_index))
}

/// Convert `7g7f`, `8h2b+` or `P*5e` into a coordinate token.
pub(crate) fn to_uci(usi: &str, board: BoardSize) -> Option<String> {
    if let Some(caps) = USI_MOVE_RE.captures(usi) {
        let from = usi_square_to_uci(&caps[1], &caps[2], board)?;
        let to = usi_square_to_uci(&caps[3], &caps[4], board)?;
        return Some(format!("{from}{to}{}", &caps[5]));
    }
    let caps = USI_DROP_RE.captures(usi)?;
    let to = usi_square_to_uci(&caps[2], &caps[3], board)?;
    Some(format!("{}@{to}", &caps[1]))
}

/// Display form of a shogi move. `prev_fen` is the position before the move
/// and is needed to tell captures, drops and promotions apart.
pub(crate) fn display(uci: &str, fen: &str, prev_fen: &str, board: BoardSize) -> Option<String> {
    let (orig, dest) = parse_uci_squares(uci, board);
    let dest = dest?;
    let after = BoardSnapshot::read(fen, board);
    let before = BoardSnapshot::read(prev_fen, board);

    let drop = after.len() == before.len() + 1;
    let capture = before.len() == after.len() + 1;
    let prev_role = orig.and_then(|o| before.piece(o));

    let connector = if capture {
        'x'
    } else if drop {
        '*'
    } else {
        '-'
    };
    let piece = after.piece(dest)?.to_uppercase();
    let origin = match (orig, prev_role) {
        (Some(orig), Some(role)) if !drop && is_move_ambiguous(&after, dest, role) => {
            coord_label(orig)
        }
        _ => String::new(),
    };
    let dest_label = coord_label(dest);

    match promotion_symbol(&before, &after, orig, dest, drop, board) {
        "+" => Some(format!(
            "{}{origin}{connector}{dest_label}+",
            piece.trim_start_matches('+')
        )),
        symbol => Some(format!("{piece}{origin}{connector}{dest_label}{symbol}")),
    }
}

/// Whether another piece of the same role could also have reached `dest`.
/// Pins and obstruction are not considered.
fn is_move_ambiguous(after: &BoardSnapshot, dest: Coord, role: &str) -> bool {
    previous_locations(role, dest)
        .into_iter()
        .filter_map(|at| after.piece(at))
        .any(|piece| piece == role)
}

fn previous_locations(role: &str, (f, r): Coord) -> Vec<Coord> {
    let diagonals = || (1..=8).flat_map(move |i| [(f + i, r + i), (f + i, r - i), (f - i, r + i), (f - i, r - i)]);
    let orthogonals = || (1..=8).flat_map(move |i| [(f + i, r), (f - i, r), (f, r + i), (f, r - i)]);

    match role {
        "N" => vec![(f + 1, r + 2), (f - 1, r + 2)],
        "n" => vec![(f + 1, r - 2), (f - 1, r - 2)],
        "S" => vec![(f - 1, r + 1), (f, r + 1), (f + 1, r + 1), (f - 1, r - 1), (f + 1, r - 1)],
        "s" => vec![(f - 1, r - 1), (f, r - 1), (f + 1, r - 1), (f - 1, r + 1), (f + 1, r + 1)],
        "b" | "B" => diagonals().collect(),
        "r" | "R" => orthogonals().collect(),
        "+P" | "+L" | "+N" | "+S" | "G" => {
            vec![(f - 1, r + 1), (f, r + 1), (f + 1, r + 1), (f - 1, r), (f + 1, r), (f, r - 1)]
        }
        "+p" | "+l" | "+n" | "+s" | "g" => {
            vec![(f - 1, r - 1), (f, r - 1), (f + 1, r - 1), (f - 1, r), (f + 1, r), (f, r + 1)]
        }
        "+b" | "+B" => diagonals()
            .chain([(f + 1, r), (f - 1, r), (f, r + 1), (f, r - 1)])
            .collect(),
        "+r" | "+R" => orthogonals()
            .chain([(f + 1, r + 1), (f - 1, r + 1), (f + 1, r - 1), (f - 1, r - 1)])
            .collect(),
        // king, pawn, lance
        _ => Vec::new(),
    }
}

/// `+` promoted, `=` declined inside the promotion zone, empty otherwise.
fn promotion_symbol(
    before: &BoardSnapshot,
    after: &BoardSnapshot,
    orig: Option<Coord>,
    dest: Coord,
    drop: bool,
    board: BoardSize,
) -> &'static str {
    if drop {
        return "";
    }
    let prev_role = orig.and_then(|o| before.piece(o));
    let role = after.piece(dest);

    if prev_role != role {
        return "+";
    }
    if prev_role.is_some_and(|r| r.contains('+')) {
        return "";
    }

    let zone_depth = if board.ranks >= 9 { 3 } else { 1 };
    let (_, rank) = dest;
    let in_zone = if after.p1_moved {
        rank <= zone_depth
    } else {
        rank > board.ranks as i32 - zone_depth
    };
    let can_promote = role.is_some_and(|r| !matches!(r.to_ascii_lowercase().as_str(), "g" | "k"));

    if can_promote && in_zone {
        "="
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOGI: BoardSize = BoardSize::new(9, 9);

    fn usi(uci: &str, fen: &str, prev_fen: &str) -> String {
        display(uci, fen, prev_fen, SHOGI).unwrap()
    }

    #[test]
    fn test_to_uci() {
        assert_eq!(to_uci("7g7f", SHOGI).as_deref(), Some("c3c4"));
        assert_eq!(to_uci("8h2b+", SHOGI).as_deref(), Some("b2h8+"));
        assert_eq!(to_uci("P*5e", SHOGI).as_deref(), Some("P@e5"));
        assert_eq!(to_uci("5e5a", BoardSize::new(5, 5)).as_deref(), Some("a1a5"));
        assert_eq!(to_uci("9a9b", BoardSize::new(5, 5)), None);
        assert_eq!(to_uci("7g7f=", SHOGI), None);
    }

    #[test]
    fn test_pawn_move() {
        assert_eq!(
            usi(
                "e3e4",
                "lnsgkgsnl/1r5b1/ppppppppp/9/9/4P4/PPPP1PPPP/1B5R1/LNSGKGSNL[] b - - 1 1",
                "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL[] w - - 0 1",
            ),
            "P-56"
        );
    }

    #[test]
    fn test_lance_move() {
        assert_eq!(
            usi(
                "a1a2",
                "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/LB5R1/1NSGKGSNL[] b - - 1 1",
                "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL[] b - - 0 1",
            ),
            "L-98"
        );
    }

    #[test]
    fn test_knight_move_by_p2() {
        assert_eq!(
            usi(
                "h9g7",
                "lnsgkgs1l/1r5b1/ppppppnpp/6p2/9/2P6/PP1PPPPPP/LB5R1/1NSGKGSNL[] w - - 4 3",
                "lnsgkgsnl/1r5b1/pppppp1pp/6p2/9/2P6/PP1PPPPPP/LB5R1/1NSGKGSNL[] w - - 0 3",
            ),
            "N-33"
        );
    }

    #[test]
    fn test_promoted_bishop_move() {
        assert_eq!(
            usi(
                "h8e5",
                "lnsg1gb1l/1r1k1s3/p1pppp1pp/1p4p2/4+B4/2P6/PP1PPPPPP/L3RG3/1NSGK1SNL[N] b - - 4 7",
                "lnsg1gb1l/1r1k1s1+B1/p1pppp1pp/1p4p2/9/2P6/PP1PPPPPP/L3RG3/1NSGK1SNL[N] b - - 4 6",
            ),
            "+B-55"
        );
    }

    #[test]
    fn test_pawn_capture() {
        assert_eq!(
            usi(
                "e6e5",
                "lnsgkgsnl/1r5b1/pppp1pppp/9/4p4/9/PPPP1PPPP/1B5R1/LNSGKGSNL[p] w - - 0 3",
                "lnsgkgsnl/1r5b1/pppp1pppp/4p4/4P4/9/PPPP1PPPP/1B5R1/LNSGKGSNL[] b - - 3 2",
            ),
            "Px55"
        );
    }

    #[test]
    fn test_drops() {
        assert_eq!(
            usi(
                "P@e6",
                "lnsgkgsnl/1r5b1/pppp1pppp/4p4/9/4R4/PPPP1PPPP/1B7/LNSGKGSNL[P] w - - 1 5",
                "lnsgkgsnl/1r5b1/pppp1pppp/9/9/4R4/PPPP1PPPP/1B7/LNSGKGSNL[Pp] b - - 0 4",
            ),
            "P*54"
        );
        assert_eq!(
            usi(
                "N@b7",
                "lnsg2s1l/1r2g1kb1/1Np+R1p1pp/1p7/p2N5/2P6/PP1P1PNPP/9/L1SGKGS1L[PPPppb] b - - 2 14",
                "lnsg2s1l/1r2g1kb1/2p+R1p1pp/1p7/p2N5/2P6/PP1P1PNPP/9/L1SGKGS1L[NPPPppb] w - - 1 14",
            ),
            "N*83"
        );
    }

    #[test]
    fn test_promotion_taken_and_declined() {
        let before = "lnsg1gsnl/1r3k1b1/pppp1pppp/4R4/9/9/PPPP1PPPP/1B7/LNSGKGSNL[PP] w - - 1 6";
        assert_eq!(
            usi(
                "e6e7",
                "lnsg1gsnl/1r3k1b1/pppp+Rpppp/9/9/9/PPPP1PPPP/1B7/LNSGKGSNL[PP] b - - 2 6",
                before,
            ),
            "R-53+"
        );
        assert_eq!(
            usi(
                "e6e7",
                "lnsg1gsnl/1r3k1b1/ppppRpppp/9/9/9/PPPP1PPPP/1B7/LNSGKGSNL[PP] b - - 2 6",
                before,
            ),
            "R-53="
        );
    }

    #[test]
    fn test_promoted_rook_capture_has_no_suffix() {
        assert_eq!(
            usi(
                "e7d7",
                "lnsg1gsnl/1r4kb1/ppp+R1pppp/9/9/9/PPPP1PPPP/1B7/LNSGKGSNL[PPP] b - - 0 7",
                "lnsg1gsnl/1r4kb1/pppp+Rpppp/9/9/9/PPPP1PPPP/1B7/LNSGKGSNL[PP] w - - 3 7",
            ),
            "+Rx63"
        );
    }

    #[test]
    fn test_lance_capture_with_promotion() {
        assert_eq!(
            usi(
                "i9i1",
                "lnsg2sk1/4g2b1/1rp4p1/1p3+R3/p2N5/2P6/PP1P1PNP1/9/L1SGKGS1+l[PPPPPnlpppb] w - - 0 22",
                "lnsg2skl/4g2b1/1rp4p1/1p3+R3/p2N5/2P6/PP1P1PNP1/9/L1SGKGS1L[PPPPPnpppb] b - - 2 21",
            ),
            "Lx19+"
        );
    }

    #[test]
    fn test_ambiguous_moves_carry_origin() {
        assert_eq!(
            usi(
                "f1e2",
                "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B2G2R1/LNSGK1SNL w - 2",
                "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1",
            ),
            "G49-58"
        );
        assert_eq!(
            usi(
                "f5e7",
                "lnsgkgsnl/1r5b1/ppp1+Nppp1/3p4p/3N5/2P3P2/PP1P+pP1PP/1B5R1/L1SGKGS1L w p 14",
                "lnsgkgsnl/1r5b1/ppp2ppp1/3p4p/3N1N3/2P3P2/PP1P+pP1PP/1B5R1/L1SGKGS1L b p 13",
            ),
            "N45-53+"
        );
    }
}
