use std::fmt;

use thiserror::Error;

/// Which collection an out-of-range index pointed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Timeline,
    Node,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Timeline => f.write_str("timeline"),
            IndexKind::Node => f.write_str("node"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("{kind} index {index} out of range (len {len}) at position {position}")]
    IndexOutOfRange {
        kind: IndexKind,
        position: usize,
        index: usize,
        len: usize,
    },
    #[error("sequence diagram `{0}` has messages but no timelines")]
    EmptyTimelines(String),
    #[error("no diagrams found in input")]
    NoDiagrams,
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid JSON5: {0}")]
    Json5(#[from] json5::Error),
}

pub type Result<T> = std::result::Result<T, DiagramError>;
