use crate::error::{CoreError, CoreResult};
use crate::node::{Node, NodeId};

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// The runtime scene graph. Owns every node the build pipeline creates.
///
/// Nodes live in a generational arena. Destroying a node destroys its whole
/// subtree and invalidates every outstanding handle into it, so callers that
/// hold a [`NodeId`] across an unknown amount of time must check
/// [`Scene::is_alive`] before touching it.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Creation and destruction
    // -----------------------------------------------------------------------

    /// Create a root node.
    pub fn spawn(&mut self, name: impl Into<String>) -> NodeId {
        let node = Node::new(name);
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    /// Create a node as the last child of `parent`.
    pub fn spawn_child(&mut self, parent: NodeId, name: impl Into<String>) -> CoreResult<NodeId> {
        self.node(parent)?;
        let id = self.spawn(name);
        self.attach(id, parent);
        Ok(id)
    }

    /// Destroy a node and its whole subtree. Returns the number of nodes removed.
    pub fn destroy(&mut self, id: NodeId) -> CoreResult<usize> {
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent {
            if let Some(p) = self.get_mut(parent) {
                p.children.retain(|c| *c != id);
            }
        }

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let slot = &mut self.slots[current.index as usize];
            if let Some(node) = slot.node.take() {
                slot.generation += 1;
                self.free.push(current.index);
                stack.extend(node.children);
                removed += 1;
            }
        }
        self.live -= removed;
        Ok(removed)
    }

    // -----------------------------------------------------------------------
    // Access
    // -----------------------------------------------------------------------

    /// Returns true if the handle still refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Get a node, or `None` if the handle is stale or unknown.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_ref())
    }

    /// Get a node mutably, or `None` if the handle is stale or unknown.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
    }

    /// Get a node, distinguishing unknown handles from destroyed ones.
    pub fn node(&self, id: NodeId) -> CoreResult<&Node> {
        match self.slots.get(id.index as usize) {
            None => Err(CoreError::NodeNotFound(id)),
            Some(_) => self.get(id).ok_or(CoreError::NodeDestroyed(id)),
        }
    }

    /// Mutable variant of [`Scene::node`].
    pub fn node_mut(&mut self, id: NodeId) -> CoreResult<&mut Node> {
        if self.slots.get(id.index as usize).is_none() {
            return Err(CoreError::NodeNotFound(id));
        }
        self.get_mut(id).ok_or(CoreError::NodeDestroyed(id))
    }

    // -----------------------------------------------------------------------
    // Hierarchy
    // -----------------------------------------------------------------------

    /// Move `child` under `parent`, or to the root when `parent` is `None`.
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) -> CoreResult<()> {
        self.node(child)?;
        if let Some(parent) = parent {
            self.node(parent)?;
            if parent == child || self.is_ancestor(child, parent) {
                return Err(CoreError::ParentCycle { child, parent });
            }
        }

        self.detach(child);
        if let Some(parent) = parent {
            self.attach(child, parent);
        }
        Ok(())
    }

    /// Returns true if `ancestor` lies on the parent chain of `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.get(node).and_then(|n| n.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Direct children of a node. Empty for stale handles.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children()).unwrap_or_default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if the scene has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn attach(&mut self, child: NodeId, parent: NodeId) {
        if let Some(p) = self.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    fn detach(&mut self, child: NodeId) {
        let old_parent = self.get_mut(child).and_then(|c| c.parent.take());
        if let Some(old) = old_parent {
            if let Some(p) = self.get_mut(old) {
                p.children.retain(|c| *c != child);
            }
        }
    }
}
