use crate::ids::NodeId;

/// Errors from content tree operations.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
    #[error("duplicate node id: {0}")]
    DuplicateNode(NodeId),
    #[error("missing parent {parent} for node {child}")]
    MissingParent { parent: NodeId, child: NodeId },
    #[error("tree already has root {existing}; cannot add second root {offered}")]
    RootAlreadySet { existing: NodeId, offered: NodeId },
    #[error("cannot remove the root node {0}")]
    CannotRemoveRoot(NodeId),
}
