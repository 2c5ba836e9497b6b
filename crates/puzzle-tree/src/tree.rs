//! Arena-backed move tree.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};
use crate::notation::MoveToken;
use crate::rules::Side;

/// Handle to a node in a [`MoveTree`]. Only meaningful for the tree that
/// issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PuzzleMark {
    Good,
    Fail,
    Win,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub ply: u32,
    pub turn_index: u32,
    /// Side to move after this node.
    pub active_side: Side,
    /// `None` on the root.
    pub side_that_moved: Option<Side>,
    pub board_state: String,
    pub notation: String,
    /// `None` on the root.
    pub token: Option<MoveToken>,
    pub check: bool,
    pub checkmate: bool,
    pub castle: bool,
    pub puzzle: Option<PuzzleMark>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl TreeNode {
    pub fn root(ply: u32, active_side: Side, board_state: impl Into<String>, check: bool) -> Self {
        Self {
            ply,
            turn_index: ply,
            active_side,
            side_that_moved: None,
            board_state: board_state.into(),
            notation: String::new(),
            token: None,
            check,
            checkmate: false,
            castle: false,
            puzzle: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Ordered node ids from the root to some node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreePath(Vec<NodeId>);

impl TreePath {
    pub fn root() -> Self {
        Self(vec![NodeId::ROOT])
    }

    pub fn from_ids(ids: Vec<NodeId>) -> Self {
        Self(ids)
    }

    /// `prefix` is this path or one of its ancestors' paths.
    pub fn contains(&self, prefix: &TreePath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn size(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<NodeId> {
        self.0.last().copied()
    }

    /// Keep the first `len` ids; a no-op when the path is already shorter.
    pub fn truncate(&mut self, len: usize) {
        self.0.truncate(len);
    }

    pub fn push(&mut self, id: NodeId) {
        self.0.push(id);
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct MoveTree {
    nodes: Vec<TreeNode>,
}

impl MoveTree {
    pub fn new(mut root: TreeNode) -> Self {
        root.parent = None;
        root.children.clear();
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    pub fn node(&self, id: NodeId) -> Result<&TreeNode> {
        self.get(id).ok_or(Error::UnknownNode(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut TreeNode> {
        self.nodes.get_mut(id.0).ok_or(Error::UnknownNode(id))
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(self.node(id)?.children())
    }

    pub fn child_with_token(&self, id: NodeId, token: &MoveToken) -> Option<NodeId> {
        self.get(id)?
            .children
            .iter()
            .copied()
            .find(|&child| self.nodes[child.0].token.as_ref() == Some(token))
    }

    pub fn path_to(&self, id: NodeId) -> Result<TreePath> {
        let mut ids = vec![id];
        let mut current = self.node(id)?;
        while let Some(parent) = current.parent {
            ids.push(parent);
            current = &self.nodes[parent.0];
        }
        ids.reverse();
        Ok(TreePath(ids))
    }

    /// Last node of `path`, if every step is a parent-child link in this tree.
    pub fn node_at_path(&self, path: &TreePath) -> Option<&TreeNode> {
        let (&first, rest) = path.0.split_first()?;
        if first != NodeId::ROOT {
            return None;
        }
        let mut current = first;
        for &next in rest {
            if !self.get(current)?.children.contains(&next) {
                return None;
            }
            current = next;
        }
        self.get(current)
    }

    /// Path that always follows the first child.
    pub fn mainline(&self) -> TreePath {
        let mut path = TreePath::root();
        let mut current = &self.nodes[0];
        while let Some(&first) = current.children.first() {
            path.push(first);
            current = &self.nodes[first.0];
        }
        path
    }

    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.get(id).and_then(|n| n.parent);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.nodes[parent.0].parent;
        }
        false
    }

    /// Attach `node` under `parent`. A child with the same token is reused
    /// rather than duplicated.
    pub fn add_child(&mut self, parent: NodeId, mut node: TreeNode) -> Result<NodeId> {
        self.node(parent)?;
        if let Some(existing) = node
            .token
            .as_ref()
            .and_then(|token| self.child_with_token(parent, token))
        {
            return Ok(existing);
        }

        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    pub fn set_mark(&mut self, id: NodeId, mark: PuzzleMark) -> Result<()> {
        self.node_mut(id)?.puzzle = Some(mark);
        Ok(())
    }

    /// Nested JSON for the UI, children in insertion order.
    pub fn to_json(&self) -> JsonValue {
        self.node_to_json(NodeId::ROOT)
    }

    fn node_to_json(&self, id: NodeId) -> JsonValue {
        let node = &self.nodes[id.0];
        let children: Vec<JsonValue> = node
            .children
            .iter()
            .map(|&child| self.node_to_json(child))
            .collect();

        serde_json::json!({
            "id": id,
            "ply": node.ply,
            "turnIndex": node.turn_index,
            "activeSide": node.active_side,
            "sideThatMoved": node.side_that_moved,
            "boardState": node.board_state,
            "notation": node.notation,
            "token": node.token,
            "check": node.check,
            "checkmate": node.checkmate,
            "castle": node.castle,
            "puzzle": node.puzzle,
            "children": children,
        })
    }
}
