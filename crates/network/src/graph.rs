//! Arena-indexed directed acyclic graph.
//!
//! Nodes and edges live in slot vectors and are addressed by typed indices.
//! Slots are never reused, so an id either refers to the node it was issued
//! for or to nothing. Edge insertion refuses anything that would close a
//! cycle, and multi-node removal validates every id before it touches the
//! arena.

use std::collections::{BTreeMap, HashSet, VecDeque};

use crate::error::NetworkError;

/// Index of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node's slot in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of an edge in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(usize);

impl EdgeId {
    /// Position of the edge's slot in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A directed edge. `capacity == None` means unbounded.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Upstream end.
    pub from: NodeId,
    /// Downstream end.
    pub to: NodeId,
    /// Upper bound on flow along the edge.
    pub capacity: Option<f64>,
}

#[derive(Debug, Clone)]
struct Slot<N> {
    name: String,
    weight: N,
    outgoing: Vec<EdgeId>,
    incoming: Vec<EdgeId>,
}

/// Directed acyclic graph with named nodes carrying a payload `N`.
#[derive(Debug, Clone)]
pub struct Graph<N> {
    nodes: Vec<Option<Slot<N>>>,
    edges: Vec<Option<Edge>>,
    index: BTreeMap<String, NodeId>,
    edge_count: usize,
}

impl<N> Graph<N> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            index: BTreeMap::new(),
            edge_count: 0,
        }
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.index.len()
    }

    /// Number of live edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Size of the edge arena, including removed slots.
    pub fn edge_bound(&self) -> usize {
        self.edges.len()
    }

    /// Size of the node arena, including removed slots.
    pub fn node_bound(&self) -> usize {
        self.nodes.len()
    }

    /// Inserts a node.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::DuplicateNode`] if `name` is taken.
    pub fn add_node(&mut self, name: impl Into<String>, weight: N) -> Result<NodeId, NetworkError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(NetworkError::DuplicateNode { name });
        }
        let id = NodeId(self.nodes.len());
        self.index.insert(name.clone(), id);
        self.nodes.push(Some(Slot {
            name,
            weight,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }));
        Ok(id)
    }

    /// Looks up a node by name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    /// Returns `true` if `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    /// Name of a live node.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.slot(id).map(|s| s.name.as_str())
    }

    /// Payload of a live node.
    pub fn weight(&self, id: NodeId) -> Option<&N> {
        self.slot(id).map(|s| &s.weight)
    }

    /// Mutable payload of a live node.
    pub fn weight_mut(&mut self, id: NodeId) -> Option<&mut N> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .map(|s| &mut s.weight)
    }

    /// Live node ids in name order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.index.values().copied()
    }

    /// Live nodes as `(id, name, payload)` in name order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &str, &N)> + '_ {
        self.index.values().filter_map(move |&id| {
            self.slot(id)
                .map(|s| (id, s.name.as_str(), &s.weight))
        })
    }

    /// Live edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (EdgeId(i), e)))
    }

    /// A live edge.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0).and_then(Option::as_ref)
    }

    /// A live edge, mutably.
    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Outgoing edges of a node, in insertion order.
    pub fn outgoing(&self, id: NodeId) -> &[EdgeId] {
        self.slot(id).map_or(&[], |s| s.outgoing.as_slice())
    }

    /// Incoming edges of a node, in insertion order.
    pub fn incoming(&self, id: NodeId) -> &[EdgeId] {
        self.slot(id).map_or(&[], |s| s.incoming.as_slice())
    }

    /// Nodes reached by the outgoing edges of `id`.
    pub fn successors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.outgoing(id)
            .iter()
            .filter_map(move |&e| self.edge(e).map(|e| e.to))
    }

    /// Nodes with an edge into `id`.
    pub fn predecessors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.incoming(id)
            .iter()
            .filter_map(move |&e| self.edge(e).map(|e| e.from))
    }

    /// Adds an edge `from -> to`.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::UnknownNodeId`] for a dead endpoint and
    /// [`NetworkError::Cycle`] if `from` is reachable from `to` (including
    /// `from == to`). The graph is unchanged on error.
    pub fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        capacity: Option<f64>,
    ) -> Result<EdgeId, NetworkError> {
        self.require(from)?;
        self.require(to)?;
        if self.reachable(to, from) {
            return Err(NetworkError::Cycle {
                from: self.slot_name(from),
                to: self.slot_name(to),
            });
        }

        let id = EdgeId(self.edges.len());
        self.edges.push(Some(Edge { from, to, capacity }));
        if let Some(s) = self.nodes[from.0].as_mut() {
            s.outgoing.push(id);
        }
        if let Some(s) = self.nodes[to.0].as_mut() {
            s.incoming.push(id);
        }
        self.edge_count += 1;
        Ok(id)
    }

    /// Removes an edge and returns it.
    pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let edge = self.edges.get_mut(id.0)?.take()?;
        if let Some(s) = self.nodes[edge.from.0].as_mut() {
            s.outgoing.retain(|&e| e != id);
        }
        if let Some(s) = self.nodes[edge.to.0].as_mut() {
            s.incoming.retain(|&e| e != id);
        }
        self.edge_count -= 1;
        Some(edge)
    }

    /// Returns `true` if `to` can be reached from `from` along edge
    /// direction. A node always reaches itself.
    pub fn reachable(&self, from: NodeId, to: NodeId) -> bool {
        if from == to {
            return true;
        }
        let mut seen = HashSet::from([from]);
        let mut queue = VecDeque::from([from]);
        while let Some(n) = queue.pop_front() {
            for next in self.successors(n) {
                if next == to {
                    return true;
                }
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        false
    }

    /// Breadth-first walk against edge direction starting at `start`.
    ///
    /// Nodes for which `skip` returns `true` are neither returned nor
    /// expanded. `start` itself is always returned first.
    pub fn upstream(&self, start: NodeId, skip: impl Fn(&N) -> bool) -> Vec<NodeId> {
        if !self.contains(start) {
            return Vec::new();
        }
        let mut order = vec![start];
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(n) = queue.pop_front() {
            for prev in self.predecessors(n) {
                if !seen.insert(prev) {
                    continue;
                }
                if self.weight(prev).is_some_and(&skip) {
                    continue;
                }
                order.push(prev);
                queue.push_back(prev);
            }
        }
        order
    }

    /// Removes a set of nodes and every edge touching them.
    ///
    /// Every id is checked before anything is removed, so either all nodes
    /// go or none do. Returns the removed `(name, payload)` pairs in the
    /// order given.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::UnknownNodeId`] if any id is dead or repeated.
    pub fn remove_nodes(&mut self, ids: &[NodeId]) -> Result<Vec<(String, N)>, NetworkError> {
        let mut unique = HashSet::with_capacity(ids.len());
        for &id in ids {
            self.require(id)?;
            if !unique.insert(id) {
                return Err(NetworkError::UnknownNodeId { index: id.0 });
            }
        }

        let mut doomed_edges: Vec<EdgeId> = ids
            .iter()
            .flat_map(|&id| self.outgoing(id).iter().chain(self.incoming(id)).copied())
            .collect();
        doomed_edges.sort_unstable();
        doomed_edges.dedup();
        for e in doomed_edges {
            self.remove_edge(e);
        }

        let mut removed = Vec::with_capacity(ids.len());
        for &id in ids {
            if let Some(slot) = self.nodes[id.0].take() {
                self.index.remove(&slot.name);
                removed.push((slot.name, slot.weight));
            }
        }
        Ok(removed)
    }

    fn slot(&self, id: NodeId) -> Option<&Slot<N>> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn slot_name(&self, id: NodeId) -> String {
        self.name(id).unwrap_or_default().to_string()
    }

    fn require(&self, id: NodeId) -> Result<(), NetworkError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(NetworkError::UnknownNodeId { index: id.0 })
        }
    }
}

impl<N> Default for Graph<N> {
    fn default() -> Self {
        Self::new()
    }
}
