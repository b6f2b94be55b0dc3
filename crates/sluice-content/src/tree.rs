//! The content tree arena.

use crate::error::TreeError;
use crate::events::TreeEvent;
use crate::ids::NodeId;
use crate::kinds::NodeKind;
use crate::node::{ButtonState, ContentNode};
use std::collections::HashMap;
use tokio::sync::mpsc;

/// An arena of content nodes addressed by stable identity.
///
/// The tree holds the single root (the course) and every descendant; parent
/// and child links are id references resolved through the arena. Hosts load
/// the full document model, call [`ContentTree::mark_ready`], and from then
/// on mutate attributes only through the setters, which emit [`TreeEvent`]s
/// to the registered observer when a stored value actually changes.
#[derive(Debug, Default)]
pub struct ContentTree {
    nodes: HashMap<NodeId, ContentNode>,
    root: Option<NodeId>,
    ready: bool,
    observer: Option<mpsc::UnboundedSender<TreeEvent>>,
}

impl ContentTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the change observer. At most one observer is supported;
    /// a later registration replaces the earlier one.
    pub fn observe(&mut self, observer: mpsc::UnboundedSender<TreeEvent>) {
        self.observer = Some(observer);
    }

    fn emit(&self, event: TreeEvent) {
        if let Some(observer) = &self.observer {
            let _ = observer.send(event);
        }
    }

    /// Latch the data-ready flag. Configuration resolution refuses to run
    /// before this is set, because inheritance depends on complete parent
    /// links.
    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn root(&self) -> Option<&NodeId> {
        self.root.as_ref()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: &NodeId) -> Option<&ContentNode> {
        self.nodes.get(id)
    }

    fn get_mut(&mut self, id: &NodeId) -> Result<&mut ContentNode, TreeError> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.clone()))
    }

    /// Insert a node. The first parentless node becomes the root; every
    /// other node must name an existing parent and is appended to that
    /// parent's child list in insertion order.
    pub fn insert(&mut self, mut node: ContentNode) -> Result<(), TreeError> {
        if self.nodes.contains_key(&node.id) {
            return Err(TreeError::DuplicateNode(node.id));
        }
        match node.parent.clone() {
            None => {
                if let Some(existing) = &self.root {
                    return Err(TreeError::RootAlreadySet {
                        existing: existing.clone(),
                        offered: node.id,
                    });
                }
                self.root = Some(node.id.clone());
            }
            Some(parent_id) => {
                let child_id = node.id.clone();
                let parent = self.nodes.get_mut(&parent_id).ok_or(TreeError::MissingParent {
                    parent: parent_id,
                    child: child_id.clone(),
                })?;
                parent.children.push(child_id);
            }
        }
        node.children.clear();
        let id = node.id.clone();
        self.nodes.insert(id.clone(), node);
        self.emit(TreeEvent::NodeAdded { id });
        Ok(())
    }

    /// Insert `node` as a child of `parent`.
    pub fn insert_child(&mut self, parent: &NodeId, mut node: ContentNode) -> Result<(), TreeError> {
        node.parent = Some(parent.clone());
        self.insert(node)
    }

    /// Remove a node and its whole subtree, emitting one `NodeRemoved` per
    /// removed node (children first).
    pub fn remove(&mut self, id: &NodeId) -> Result<Vec<NodeId>, TreeError> {
        let node = self
            .nodes
            .get(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.clone()))?;
        if node.parent.is_none() {
            return Err(TreeError::CannotRemoveRoot(id.clone()));
        }
        let parent = node.parent.clone();
        let mut removed = self.descendants(id, false);
        removed.push(id.clone());
        for gone in &removed {
            self.nodes.remove(gone);
        }
        if let Some(parent_id) = parent {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.children.retain(|child| child != id);
            }
        }
        for gone in &removed {
            self.emit(TreeEvent::NodeRemoved { id: gone.clone() });
        }
        Ok(removed)
    }

    pub fn parent(&self, id: &NodeId) -> Option<&NodeId> {
        self.nodes.get(id).and_then(|node| node.parent.as_ref())
    }

    pub fn children(&self, id: &NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn available_children(&self, id: &NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .filter(|child| self.get(child).map(|node| node.is_available).unwrap_or(false))
            .cloned()
            .collect()
    }

    /// Ancestors walking upward, nearest first, root last.
    pub fn ancestors(&self, id: &NodeId, include_self: bool) -> Vec<NodeId> {
        let mut out = Vec::new();
        if include_self && self.contains(id) {
            out.push(id.clone());
        }
        let mut current = self.parent(id).cloned();
        while let Some(ancestor) = current {
            current = self.parent(&ancestor).cloned();
            out.push(ancestor);
        }
        out
    }

    /// All descendants of `id`, excluding `id` itself.
    ///
    /// `parent_first = true` yields pre-order (`a, b, c1, c2`); otherwise
    /// children precede their parent (`c1, c2, b, a`), matching sequential
    /// operations over the hierarchy.
    pub fn descendants(&self, id: &NodeId, parent_first: bool) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(id, parent_first, &mut out);
        out
    }

    fn collect_descendants(&self, id: &NodeId, parent_first: bool, out: &mut Vec<NodeId>) {
        for child in self.children(id).to_vec() {
            let is_leaf = self
                .get(&child)
                .map(|node| node.kind.is_leaf())
                .unwrap_or(true);
            if is_leaf {
                out.push(child);
                continue;
            }
            if parent_first {
                out.push(child.clone());
            }
            self.collect_descendants(&child, parent_first, out);
            if !parent_first {
                out.push(child);
            }
        }
    }

    /// The nearest unit (page) ancestor, including `id` itself.
    pub fn unit_of(&self, id: &NodeId) -> Option<NodeId> {
        if self.get(id)?.kind.is_unit() {
            return Some(id.clone());
        }
        self.ancestors(id, false)
            .into_iter()
            .find(|ancestor| {
                self.get(ancestor)
                    .map(|node| node.kind.is_unit())
                    .unwrap_or(false)
            })
    }

    /// True when `descendant` sits anywhere beneath `ancestor`.
    pub fn is_descendant_of(&self, descendant: &NodeId, ancestor: &NodeId) -> bool {
        self.ancestors(descendant, false).contains(ancestor)
    }

    // -----------------------------------------------------------------
    // Attribute setters
    // -----------------------------------------------------------------

    pub fn set_available(&mut self, id: &NodeId, is_available: bool) -> Result<(), TreeError> {
        let node = self.get_mut(id)?;
        if node.is_available == is_available {
            return Ok(());
        }
        node.is_available = is_available;
        self.emit(TreeEvent::AvailabilityChanged {
            id: id.clone(),
            is_available,
        });
        Ok(())
    }

    pub fn set_completion(
        &mut self,
        id: &NodeId,
        attribute: &str,
        value: bool,
    ) -> Result<(), TreeError> {
        let node = self.get_mut(id)?;
        if node.is_complete(attribute) == value {
            return Ok(());
        }
        node.completion.insert(attribute.to_string(), value);
        self.emit(TreeEvent::CompletionChanged {
            id: id.clone(),
            attribute: attribute.to_string(),
            value,
        });
        Ok(())
    }

    pub fn set_locked(&mut self, id: &NodeId, is_locked: bool) -> Result<(), TreeError> {
        let node = self.get_mut(id)?;
        if node.is_locked == is_locked {
            return Ok(());
        }
        node.is_locked = is_locked;
        self.emit(TreeEvent::LockChanged {
            id: id.clone(),
            is_locked,
        });
        Ok(())
    }

    pub fn set_optional(&mut self, id: &NodeId, is_optional: bool) -> Result<(), TreeError> {
        self.get_mut(id)?.is_optional = is_optional;
        Ok(())
    }

    pub fn set_gated(&mut self, id: &NodeId, is_gated: bool) -> Result<(), TreeError> {
        self.get_mut(id)?.is_gated = is_gated;
        Ok(())
    }

    pub fn set_config_source(
        &mut self,
        id: &NodeId,
        source: Option<NodeId>,
    ) -> Result<(), TreeError> {
        self.get_mut(id)?.config_source = source;
        Ok(())
    }

    pub fn set_lock_type(&mut self, id: &NodeId, lock_type: Option<String>) -> Result<(), TreeError> {
        self.get_mut(id)?.lock_type = lock_type;
        Ok(())
    }

    pub fn set_can_request_child(&mut self, id: &NodeId, value: bool) -> Result<(), TreeError> {
        self.get_mut(id)?.can_request_child = value;
        Ok(())
    }

    pub fn set_completion_blocked(&mut self, id: &NodeId, value: bool) -> Result<(), TreeError> {
        self.get_mut(id)?.is_completion_blocked = value;
        Ok(())
    }

    pub fn set_site_configured(&mut self, id: &NodeId, value: bool) -> Result<(), TreeError> {
        self.get_mut(id)?.is_site_configured = value;
        Ok(())
    }

    pub fn set_gating(
        &mut self,
        id: &NodeId,
        gating: Option<serde_json::Value>,
    ) -> Result<(), TreeError> {
        self.get_mut(id)?.gating = gating;
        Ok(())
    }

    pub fn set_button_state(
        &mut self,
        id: &NodeId,
        state: Option<ButtonState>,
    ) -> Result<(), TreeError> {
        self.get_mut(id)?.button_state = state;
        Ok(())
    }

    // -----------------------------------------------------------------
    // Relative addressing
    // -----------------------------------------------------------------

    /// Find a node of `kind` at the signed `offset` relative to `from`,
    /// scanning the children-first flattening of the whole tree.
    ///
    /// Offset 0 addresses the first match at or before `from` when looking
    /// at the same or an ancestor kind; positive offsets move forward in
    /// document order, negative backward. When `only_available` is set,
    /// unavailable nodes are invisible to the scan.
    pub fn find_relative(
        &self,
        from: &NodeId,
        kind: NodeKind,
        offset: i32,
        only_available: bool,
    ) -> Option<NodeId> {
        let root = self.root()?.clone();
        let from_kind = self.get(from)?.kind;
        let mut flattened = self.descendants(&root, false);
        if only_available {
            flattened.retain(|id| self.get(id).map(|node| node.is_available).unwrap_or(false));
        }
        let from_index = flattened.iter().position(|id| id == from)?;

        let find_ancestor_kind = from_kind.level() > kind.level();
        let find_same_kind = from_kind == kind;
        let (search_backwards, mut movement) = if find_same_kind || find_ancestor_kind {
            (offset <= 0, 0i32)
        } else if offset < 1 {
            (true, 0i32)
        } else {
            (false, 1i32)
        };

        if search_backwards {
            for id in flattened[..=from_index].iter().rev() {
                if self.get(id).map(|node| node.kind) == Some(kind) {
                    if -movement == offset {
                        return Some(id.clone());
                    }
                    movement += 1;
                }
            }
        } else {
            for id in &flattened[from_index..] {
                if self.get(id).map(|node| node.kind) == Some(kind) {
                    if movement == offset {
                        return Some(id.clone());
                    }
                    movement += 1;
                }
            }
        }
        None
    }
}
