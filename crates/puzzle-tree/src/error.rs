//! Error types for move-tree building and puzzle validation

use thiserror::Error;

use crate::tree::NodeId;
use crate::variant::VariantKey;

#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed {variant} notation: '{notation}'")]
    MalformedNotation {
        variant: VariantKey,
        notation: String,
    },

    #[error("illegal move '{notation}' at ply {ply} from '{board_state}'")]
    IllegalMove {
        notation: String,
        ply: u32,
        board_state: String,
    },

    #[error("'{notation}' is position-relative {variant} notation and needs a board to resolve")]
    PositionRequired {
        variant: VariantKey,
        notation: String,
    },

    #[error("invalid board state '{board_state}': {reason}")]
    InvalidBoardState { board_state: String, reason: String },

    #[error("no rules engine for variant {0}")]
    UnsupportedVariant(VariantKey),

    #[error("unknown variant '{0}'")]
    UnknownVariant(String),

    #[error("invalid puzzle: {0}")]
    InvalidPuzzle(String),

    #[error("node {0} is not in the tree")]
    UnknownNode(NodeId),

    #[error("configuration error: {0}")]
    Config(&'static str),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
