//! Lightweight board reader used by the shogi and xiangqi notation writers.
//!
//! Coordinates are `(file, rank)` with files counted from the right-hand edge
//! of the board (as seen by P1) and ranks counted from the top, which is how
//! both shogi and xiangqi number their boards.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::variant::BoardSize;

pub(crate) type Coord = (i32, i32);

static UCI_SQUARE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z][1-9@]0?").unwrap());

/// Pieces keyed by coordinate, plus whether P1 made the last move.
#[derive(Debug, Clone, Default)]
pub(crate) struct BoardSnapshot {
    pieces: HashMap<Coord, String>,
    pub p1_moved: bool,
}

impl BoardSnapshot {
    /// Read the placement field of a FEN. Pockets (`[..]` or a trailing
    /// rank) and the remaining fields are ignored, except the side to move.
    pub fn read(fen: &str, board: BoardSize) -> Self {
        let mut fields = fen.split(' ');
        let placement = fields.next().unwrap_or("");
        let p1_moved = fields.next() == Some("b");

        let mut pieces = HashMap::new();
        let rows = placement.split('[').next().unwrap_or("").split('/');

        for (y, row) in rows.take(board.ranks as usize).enumerate() {
            let rank = y as i32 + 1;
            let mut file = board.files as i32;
            let mut promoted = false;
            let mut chars = row.chars().peekable();

            while let Some(c) = chars.next() {
                if c == '~' {
                    continue;
                }
                if let Some(digit) = c.to_digit(10) {
                    let mut empty = digit;
                    while let Some(next) = chars.peek().and_then(|n| n.to_digit(10)) {
                        empty = empty * 10 + next;
                        chars.next();
                    }
                    file -= empty as i32;
                } else if c == '+' {
                    promoted = true;
                } else {
                    let piece = if promoted { format!("+{c}") } else { c.to_string() };
                    pieces.insert((file, rank), piece);
                    file -= 1;
                    promoted = false;
                }
            }
        }

        Self { pieces, p1_moved }
    }

    pub fn piece(&self, at: Coord) -> Option<&str> {
        self.pieces.get(&at).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }
}

/// `e4` on a 9x9 board is `(5, 6)`.
pub(crate) fn uci_square_to_coord(square: &str, board: BoardSize) -> Option<Coord> {
    let mut chars = square.chars();
    let file_char = chars.next().filter(char::is_ascii_lowercase)?;
    let rank: i32 = chars.as_str().parse().ok()?;
    let file = board.files as i32 - (file_char as i32 - 'a' as i32);
    let rank = board.ranks as i32 + 1 - rank;

    let on_board = (1..=board.files as i32).contains(&file) && (1..=board.ranks as i32).contains(&rank);
    on_board.then_some((file, rank))
}

/// Split a coordinate token into origin and destination. Drops (`P@e6`)
/// have no origin.
pub(crate) fn parse_uci_squares(uci: &str, board: BoardSize) -> (Option<Coord>, Option<Coord>) {
    let mut squares = UCI_SQUARE_RE.find_iter(uci).map(|m| m.as_str());
    let orig = squares.next().and_then(|s| uci_square_to_coord(s, board));
    let dest = squares.next().and_then(|s| uci_square_to_coord(s, board));
    (orig, dest)
}

pub(crate) fn coord_label((file, rank): Coord) -> String {
    format!("{file}{rank}")
}
