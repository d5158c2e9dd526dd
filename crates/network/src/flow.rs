//! Maximum flow over the arena graph.
//!
//! Edmonds–Karp: repeatedly push flow along the shortest augmenting path in
//! the residual network. Breadth-first search visits arcs in edge insertion
//! order, so the result is fully deterministic for a given graph.

use std::collections::VecDeque;

use crate::graph::{EdgeId, Graph, NodeId};

/// Outcome of a max-flow computation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowResult {
    value: f64,
    edge_flow: Vec<f64>,
}

impl FlowResult {
    /// Total flow from source to sink.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Flow carried by an edge (zero for unknown edges).
    pub fn edge_flow(&self, id: EdgeId) -> f64 {
        self.edge_flow.get(id.index()).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy)]
struct ResidualArc {
    to: usize,
    residual: f64,
    /// Index of the paired arc.
    pair: usize,
}

/// Computes the maximum flow from `source` to `sink`.
///
/// Edges with `capacity == None` are unbounded. If an augmenting path has
/// no finite edge at all, the flow value is `f64::INFINITY`.
pub fn max_flow<N>(graph: &Graph<N>, source: NodeId, sink: NodeId) -> FlowResult {
    let n = graph.node_bound();
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut arcs: Vec<ResidualArc> = Vec::with_capacity(graph.edge_count() * 2);
    // forward arc index for each edge slot
    let mut forward: Vec<Option<usize>> = vec![None; graph.edge_bound()];

    for (id, edge) in graph.edges() {
        let cap = edge.capacity.unwrap_or(f64::INFINITY);
        let fwd = arcs.len();
        arcs.push(ResidualArc {
            to: edge.to.index(),
            residual: cap,
            pair: fwd + 1,
        });
        arcs.push(ResidualArc {
            to: edge.from.index(),
            residual: 0.0,
            pair: fwd,
        });
        adjacency[edge.from.index()].push(fwd);
        adjacency[edge.to.index()].push(fwd + 1);
        forward[id.index()] = Some(fwd);
    }

    let mut value = 0.0;
    if graph.contains(source) && graph.contains(sink) && source != sink {
        let (s, t) = (source.index(), sink.index());
        while let Some(path) = shortest_path(&adjacency, &arcs, s, t) {
            let bottleneck = path
                .iter()
                .map(|&a| arcs[a].residual)
                .fold(f64::INFINITY, f64::min);
            if bottleneck.is_infinite() {
                value = f64::INFINITY;
                break;
            }
            for &a in &path {
                arcs[a].residual -= bottleneck;
                let pair = arcs[a].pair;
                arcs[pair].residual += bottleneck;
            }
            value += bottleneck;
        }
    }

    // flow on an edge is what its reverse arc has accumulated
    let edge_flow = forward
        .iter()
        .map(|f| f.map_or(0.0, |fwd| arcs[arcs[fwd].pair].residual))
        .collect();

    FlowResult { value, edge_flow }
}

/// Breadth-first search for an augmenting path; returns its arcs in order.
fn shortest_path(adjacency: &[Vec<usize>], arcs: &[ResidualArc], s: usize, t: usize) -> Option<Vec<usize>> {
    let mut via: Vec<Option<usize>> = vec![None; adjacency.len()];
    let mut visited = vec![false; adjacency.len()];
    visited[s] = true;
    let mut queue = VecDeque::from([s]);

    while let Some(u) = queue.pop_front() {
        for &a in &adjacency[u] {
            let arc = arcs[a];
            if arc.residual > 0.0 && !visited[arc.to] {
                visited[arc.to] = true;
                via[arc.to] = Some(a);
                if arc.to == t {
                    let mut path = Vec::new();
                    let mut node = t;
                    while let Some(a) = via[node] {
                        path.push(a);
                        node = arcs[arcs[a].pair].to;
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(arc.to);
            }
        }
    }
    None
}
