//! Relative scroll/navigation addressing expressions.
//!
//! Three forms are recognized:
//!
//! - `@<kind> <signed int>` — relative by kind, e.g. `@block +1` is the
//!   next block after the reference node.
//! - `.<id>` — direct addressing by node identity.
//! - any other literal — treated as a direct node identity.

use crate::ids::NodeId;
use crate::kinds::NodeKind;
use crate::tree::ContentTree;

/// A parsed scroll/navigation target expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollTarget {
    /// `@kind offset` relative addressing.
    Relative { kind: NodeKind, offset: i32 },
    /// Direct node identity.
    Direct(NodeId),
}

impl ScrollTarget {
    /// Parse an addressing expression. Returns `None` for expressions that
    /// cannot name any node (empty, or a malformed `@` form).
    pub fn parse(expression: &str) -> Option<Self> {
        let expression = expression.trim();
        if expression.is_empty() {
            return None;
        }
        if let Some(rest) = expression.strip_prefix('@') {
            let mut parts = rest.split_whitespace();
            let kind = NodeKind::from_str(parts.next()?)?;
            let offset: i32 = parts.next()?.trim_start_matches('+').parse().ok()?;
            return Some(Self::Relative { kind, offset });
        }
        if let Some(rest) = expression.strip_prefix('.') {
            if rest.is_empty() {
                return None;
            }
            return Some(Self::Direct(NodeId::new(rest)));
        }
        Some(Self::Direct(NodeId::new(expression)))
    }

    /// Resolve this target against the tree, relative to `from`. Relative
    /// forms consider available nodes only; direct forms must name an
    /// existing node.
    pub fn resolve(&self, tree: &ContentTree, from: &NodeId) -> Option<NodeId> {
        match self {
            Self::Relative { kind, offset } => tree.find_relative(from, *kind, *offset, true),
            Self::Direct(id) => tree.contains(id).then(|| id.clone()),
        }
    }
}
