//! Xiangqi (WXF) move display: `H2+3`, `K5=6`, `P+=6`, `17+1`.

use std::sync::LazyLock;

use regex::Regex;

use super::board::{parse_uci_squares, BoardSnapshot};
use crate::variant::BoardSize;

static WXF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[KAEBRHNCP][1-9+\-]|[1-9]{2})[+\-=][1-9]$").unwrap()
});

/// Whether `s` has the shape of a WXF move. WXF is relative to the side
/// to move, so a match alone never identifies squares.
pub(crate) fn is_wxf(s: &str) -> bool {
    WXF_RE.is_match(s)
}

fn piece_letter(role: &str) -> String {
    match role {
        "n" | "N" => "H".to_string(),
        "b" | "B" => "E".to_string(),
        other => other.to_uppercase(),
    }
}

pub(crate) fn display(uci: &str, fen: &str, board: BoardSize) -> Option<String> {
    let (orig, dest) = parse_uci_squares(uci, board);
    let (orig, dest) = (orig?, dest?);
    let after = BoardSnapshot::read(fen, board);
    let role = after.piece(dest)?;
    let piece = piece_letter(role);

    let files = board.files as i32;
    let mover_file = |file: i32| if after.p1_moved { file } else { files + 1 - file };
    let (prev_file, prev_rank) = (mover_file(orig.0), orig.1);
    let (new_file, new_rank) = (mover_file(dest.0), dest.1);

    let diagonal = new_rank != prev_rank && new_file != prev_file;
    let direction = if new_rank == prev_rank {
        '='
    } else if (after.p1_moved && new_rank < prev_rank) || (!after.p1_moved && new_rank > prev_rank) {
        '+'
    } else {
        '-'
    };
    let movement = if direction == '=' || diagonal {
        new_file
    } else {
        (new_rank - prev_rank).abs()
    };

    if !role.eq_ignore_ascii_case("p") {
        return Some(format!("{piece}{prev_file}{direction}{movement}"));
    }

    // Several friendly pawns on one file are told apart by their order.
    let pawn_ranks = friendly_pawn_ranks(&after, orig, new_rank, new_file != prev_file, board);
    let index = pawn_ranks.iter().position(|&r| r == prev_rank).unwrap_or(0);

    let notation = match pawn_ranks.len() {
        2 => {
            let front = (index == 0 && after.p1_moved) || (index == 1 && !after.p1_moved);
            let op = if front { '+' } else { '-' };
            format!("{piece}{op}{direction}{movement}")
        }
        n if n > 2 => {
            let number = if after.p1_moved { index + 1 } else { n - index };
            format!("{number}{prev_file}{direction}{movement}")
        }
        _ => format!("{piece}{prev_file}{direction}{movement}"),
    };
    Some(notation)
}

/// Ranks (top to bottom) of the mover's pawns on the origin file, with the
/// moved pawn counted at its starting rank.
fn friendly_pawn_ranks(
    after: &BoardSnapshot,
    (orig_file, orig_rank): (i32, i32),
    new_rank: i32,
    left_file: bool,
    board: BoardSize,
) -> Vec<i32> {
    let pawn = if after.p1_moved { "P" } else { "p" };
    let mut ranks = Vec::new();

    for r in 1..=board.ranks as i32 {
        if left_file && r == orig_rank {
            ranks.push(orig_rank);
        }
        if after.piece((orig_file, r)) == Some(pawn) {
            if !left_file && r == new_rank {
                ranks.push(orig_rank);
            } else {
                ranks.push(r);
            }
        }
    }
    ranks
}
