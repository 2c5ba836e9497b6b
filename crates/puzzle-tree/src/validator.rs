//! Checks a player's moves against a puzzle solution.
//!
//! A session moves `Undetermined -> Good -> {Win, Fail}`. Win and fail are
//! final until [`ValidationSession::reset`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::notation::{tokens_match, MoveToken};
use crate::puzzle::Puzzle;
use crate::tree::{MoveTree, NodeId, PuzzleMark, TreePath};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    #[default]
    Undetermined,
    Good,
    Win,
    Fail,
}

impl Verdict {
    pub fn is_final(self) -> bool {
        matches!(self, Verdict::Win | Verdict::Fail)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    #[default]
    Play,
    View,
}

/// Outcome of feeding one move to the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Transition {
    /// Not evaluated: view mode, finished attempt, or outside the solving line.
    Inert,
    /// Opponent move, replayed without evaluation.
    Replayed,
    /// Correct move; `reply` is the scripted answer to play next.
    Good { reply: MoveToken },
    Win,
    Fail,
}

/// One attempt at a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSession {
    initial_path: TreePath,
    path: TreePath,
    verdict: Verdict,
    cursor: usize,
    mode: SessionMode,
}

impl ValidationSession {
    /// `initial_path` leads to the node the solver starts from.
    pub fn new(initial_path: TreePath) -> Self {
        Self {
            path: initial_path.clone(),
            initial_path,
            verdict: Verdict::Undetermined,
            cursor: 0,
            mode: SessionMode::Play,
        }
    }

    pub fn initial_path(&self) -> &TreePath {
        &self.initial_path
    }

    pub fn path(&self) -> &TreePath {
        &self.path
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Index of the next expected solution move.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.initial_path.clone());
    }

    pub fn enter_view_mode(&mut self) {
        self.mode = SessionMode::View;
    }
}

/// Evaluate the move that produced `node`.
pub fn on_move(
    session: &mut ValidationSession,
    puzzle: &Puzzle,
    tree: &mut MoveTree,
    node: NodeId,
) -> Result<Transition> {
    session.path = tree.path_to(node)?;

    if session.mode == SessionMode::View || session.verdict.is_final() {
        return Ok(Transition::Inert);
    }
    let start_len = session.initial_path.size();
    if !session.path.contains(&session.initial_path) || session.path.size() <= start_len {
        debug!(node = %node, "Move outside the solving line");
        return Ok(Transition::Inert);
    }

    let played = tree.node(node)?;
    let index = session.path.size() - start_len - 1;
    let solution = puzzle.solution();

    if let Some(off) = first_off_script_reply(puzzle, tree, &session.path.ids()[start_len..])? {
        debug!(node = %node, reply = %off, "Opponent left the solution line");
        return Ok(Transition::Inert);
    }

    if played.side_that_moved != Some(puzzle.side_to_solve()) {
        session.cursor = index + 1;
        debug!(node = %node, cursor = session.cursor, "Replayed opponent move");
        return Ok(Transition::Replayed);
    }

    let transition = if played.checkmate || index >= solution.len() {
        Transition::Win
    } else {
        let expected = &solution[index];
        let matched = played
            .token
            .as_ref()
            .is_some_and(|token| tokens_match(puzzle.variant(), token, played.castle, expected));

        if !matched {
            warn!(
                puzzle = %puzzle.id(),
                played = %played.token.as_ref().map(MoveToken::as_str).unwrap_or_default(),
                expected = %expected,
                "Deviated from solution"
            );
            Transition::Fail
        } else {
            session.cursor = index + 1;
            match solution.get(session.cursor) {
                Some(reply) => Transition::Good {
                    reply: reply.clone(),
                },
                None => Transition::Win,
            }
        }
    };

    let (verdict, mark) = match &transition {
        Transition::Win => (Verdict::Win, PuzzleMark::Win),
        Transition::Fail => (Verdict::Fail, PuzzleMark::Fail),
        _ => (Verdict::Good, PuzzleMark::Good),
    };
    session.verdict = verdict;
    tree.set_mark(node, mark)?;

    info!(
        puzzle = %puzzle.id(),
        node = %node,
        cursor = session.cursor,
        verdict = ?verdict,
        "Puzzle move evaluated"
    );
    Ok(transition)
}

/// First opponent node on `line` whose move differs from the scripted
/// reply at the same solution index. Replies past the end of the solution
/// are not compared.
fn first_off_script_reply(puzzle: &Puzzle, tree: &MoveTree, line: &[NodeId]) -> Result<Option<NodeId>> {
    let solution = puzzle.solution();

    for (index, &id) in line.iter().enumerate() {
        let node = tree.node(id)?;
        if node.side_that_moved == Some(puzzle.side_to_solve()) {
            continue;
        }
        let Some(expected) = solution.get(index) else {
            continue;
        };
        let scripted = node
            .token
            .as_ref()
            .is_some_and(|token| tokens_match(puzzle.variant(), token, node.castle, expected));
        if !scripted {
            return Ok(Some(id));
        }
    }
    Ok(None)
}
