//! Replays moves through a [`RulesEngine`] into a [`MoveTree`].

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::Result;
use crate::notation::MoveToken;
use crate::rules::{Destinations, RulesEngine, Side};
use crate::tree::{MoveTree, NodeId, PuzzleMark, TreeNode};

/// What the board renderer needs for one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardFeed {
    pub board_state: String,
    pub active_side: Side,
    pub check: bool,
    pub destinations: Destinations,
}

/// Consecutive actions by the same side share a turn index. The root counts
/// as moved by the side not on move.
pub fn next_turn_index(parent: &TreeNode, mover: Side) -> u32 {
    let parent_mover = parent.side_that_moved.unwrap_or(!parent.active_side);
    if mover == parent_mover {
        parent.turn_index
    } else {
        parent.turn_index + 1
    }
}

fn make_node<E: RulesEngine>(
    engine: &E,
    parent: &TreeNode,
    pos: &E::Position,
    mv: &E::Move,
) -> (TreeNode, E::Position) {
    let mover = engine.turn(pos);
    let next = engine.apply_move(pos, mv);

    let node = TreeNode {
        ply: parent.ply + 1,
        turn_index: next_turn_index(parent, mover),
        active_side: engine.turn(&next),
        side_that_moved: Some(mover),
        board_state: engine.serialize(&next),
        notation: engine.move_notation(pos, mv),
        token: Some(engine.move_token(pos, mv)),
        check: engine.is_check(&next),
        checkmate: engine.is_checkmate_equivalent(&next),
        castle: engine.is_castle(pos, mv),
        puzzle: None,
        parent: None,
        children: Vec::new(),
    };
    (node, next)
}

/// Root node for a position.
pub fn root_node<E: RulesEngine>(engine: &E, board_state: &str) -> Result<TreeNode> {
    let pos = engine.read_position(board_state)?;
    Ok(TreeNode::root(
        engine.ply(&pos),
        engine.turn(&pos),
        engine.serialize(&pos),
        engine.is_check(&pos),
    ))
}

/// Compute the node reached by playing `native` after `parent`, without
/// attaching it.
pub fn replay_step<E: RulesEngine>(engine: &E, parent: &TreeNode, native: &str) -> Result<TreeNode> {
    let pos = engine.read_position(&parent.board_state)?;
    let mv = engine.parse_move(&pos, native)?;
    Ok(make_node(engine, parent, &pos, &mv).0)
}

/// Compute a chain of nodes from `start`. Fails as a whole on the first
/// move the engine rejects.
fn replay_chain<E, S>(engine: &E, start: &TreeNode, moves: &[S]) -> Result<Vec<TreeNode>>
where
    E: RulesEngine,
    S: AsRef<str>,
{
    let mut pos = engine.read_position(&start.board_state)?;
    let mut chain: Vec<TreeNode> = Vec::with_capacity(moves.len());

    for native in moves {
        let native = native.as_ref();
        let parent = chain.last().unwrap_or(start);
        let mv = engine.parse_move(&pos, native)?;
        let (node, next) = make_node(engine, parent, &pos, &mv);
        trace!(
            ply = node.ply,
            native,
            token = %node.token.as_ref().map(MoveToken::as_str).unwrap_or_default(),
            notation = %node.notation,
            "Replayed move"
        );
        chain.push(node);
        pos = next;
    }

    Ok(chain)
}

/// Build a single-line tree from `initial_board_state` and native moves.
pub fn build_from_move_list<E, S>(engine: &E, initial_board_state: &str, moves: &[S]) -> Result<MoveTree>
where
    E: RulesEngine,
    S: AsRef<str>,
{
    let root = root_node(engine, initial_board_state)?;
    let chain = replay_chain(engine, &root, moves)?;

    let mut tree = MoveTree::new(root);
    let mut parent = tree.root();
    for node in chain {
        parent = tree.add_child(parent, node)?;
    }

    debug!(
        variant = %engine.variant(),
        moves = moves.len(),
        nodes = tree.len(),
        "Built move tree"
    );
    Ok(tree)
}

/// Graft the solution line under `at`. Nodes played by `solving_side` are
/// marked good unless already marked. Nothing is attached unless every move
/// replays.
pub fn extend_tree<E: RulesEngine>(
    engine: &E,
    tree: &mut MoveTree,
    at: NodeId,
    solution: &[MoveToken],
    solving_side: Side,
) -> Result<Vec<NodeId>> {
    let chain = replay_chain(engine, tree.node(at)?, solution)?;

    let before = tree.len();
    let mut ids = Vec::with_capacity(chain.len());
    let mut parent = at;
    for node in chain {
        let good = node.side_that_moved == Some(solving_side);
        let id = tree.add_child(parent, node)?;
        // Reused nodes keep the mark an earlier attempt gave them.
        if good && tree.node(id)?.puzzle.is_none() {
            tree.set_mark(id, PuzzleMark::Good)?;
        }
        ids.push(id);
        parent = id;
    }

    debug!(
        at = %at,
        added = tree.len() - before,
        reused = ids.len() - (tree.len() - before),
        "Extended tree with solution"
    );
    Ok(ids)
}

/// Play one native move after `at`, reusing an existing child when the
/// move was already explored.
pub fn play_move<E: RulesEngine>(engine: &E, tree: &mut MoveTree, at: NodeId, native: &str) -> Result<NodeId> {
    let node = replay_step(engine, tree.node(at)?, native)?;
    let ply = node.ply;
    let id = tree.add_child(at, node)?;
    trace!(at = %at, id = %id, ply, native, "Played move");
    Ok(id)
}

pub fn board_feed<E: RulesEngine>(engine: &E, tree: &MoveTree, id: NodeId) -> Result<BoardFeed> {
    let node = tree.node(id)?;
    let pos = engine.read_position(&node.board_state)?;

    Ok(BoardFeed {
        board_state: node.board_state.clone(),
        active_side: engine.turn(&pos),
        check: engine.is_check(&pos),
        destinations: engine.legal_destinations(&pos),
    })
}
