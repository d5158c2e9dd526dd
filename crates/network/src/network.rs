//! Watershed network: topology edits, per-step runoff and routing.

use std::fs;
use std::path::Path;

use tracing::{debug, info, trace};
use tributary_runoff::{BucketParams, Catchment, RunoffError, check_forcing};

use crate::error::NetworkError;
use crate::flow::{FlowResult, max_flow};
use crate::graph::{EdgeId, Graph, NodeId};
use crate::node::{NodeInfo, NodeKind, NodeType};
use crate::topology::TopologyFile;

/// Name of the node that feeds every catchment.
pub const SOURCE_NAME: &str = "source";

/// Area and parameters used for catchments created by name only.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchmentTemplate {
    area: f64,
    params: BucketParams,
}

impl CatchmentTemplate {
    /// Creates a template with area 100 and default bucket parameters.
    pub fn new() -> Self {
        Self {
            area: 100.0,
            params: BucketParams::new(),
        }
    }

    /// Sets the catchment area.
    pub fn with_area(mut self, area: f64) -> Self {
        self.area = area;
        self
    }

    /// Sets the bucket parameters.
    pub fn with_params(mut self, params: BucketParams) -> Self {
        self.params = params;
        self
    }

    /// Catchment area.
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Bucket parameters.
    pub fn params(&self) -> &BucketParams {
        &self.params
    }

    /// Builds a fresh catchment from the template.
    ///
    /// # Errors
    ///
    /// Returns [`RunoffError`] if the area or parameters are invalid.
    pub fn build(&self) -> Result<Catchment, RunoffError> {
        Catchment::new(self.area, self.params.clone())
    }
}

impl Default for CatchmentTemplate {
    fn default() -> Self {
        Self::new()
    }
}

/// A watershed of catchments draining through junctions to one sink.
///
/// Every catchment is fed by the single source node and has exactly one
/// outgoing edge whose capacity is its latest outflow. Junction edges are
/// uncapped, so the maximum flow from source to sink equals the total
/// catchment outflow reaching the sink.
#[derive(Debug, Clone)]
pub struct WatershedNetwork {
    graph: Graph<NodeKind>,
    source: NodeId,
    sink: NodeId,
    template: CatchmentTemplate,
    flow: FlowResult,
    outflow: f64,
}

impl WatershedNetwork {
    /// Creates a network holding only the source and a sink named `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::DuplicateNode`] if `sink` is the source
    /// name.
    pub fn new(sink: impl Into<String>) -> Result<Self, NetworkError> {
        let mut graph = Graph::new();
        let source = graph.add_node(SOURCE_NAME, NodeKind::Source)?;
        let sink = graph.add_node(sink, NodeKind::Sink)?;
        Ok(Self {
            graph,
            source,
            sink,
            template: CatchmentTemplate::new(),
            flow: FlowResult::default(),
            outflow: 0.0,
        })
    }

    /// Replaces the template used by [`link_catchment`](Self::link_catchment).
    pub fn with_template(mut self, template: CatchmentTemplate) -> Self {
        self.template = template;
        self
    }

    /// The catchment template.
    pub fn template(&self) -> &CatchmentTemplate {
        &self.template
    }

    /// Adds a junction draining into `downstream`.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::DuplicateNode`], [`NetworkError::NodeNotFound`]
    /// or [`NetworkError::InvalidDownstream`]. The graph is unchanged on
    /// error.
    pub fn add_junction(&mut self, name: &str, downstream: &str) -> Result<NodeId, NetworkError> {
        self.check_free(name)?;
        let target = self.receiver(downstream)?;
        let id = self.graph.add_node(name, NodeKind::Junction)?;
        self.attach(id, &[(id, target, None)])?;
        debug!(name, downstream, "junction added");
        Ok(id)
    }

    /// Adds a catchment built from the template, draining into `downstream`.
    ///
    /// # Errors
    ///
    /// As [`add_junction`](Self::add_junction), plus
    /// [`NetworkError::Runoff`] if the template is invalid.
    pub fn link_catchment(&mut self, name: &str, downstream: &str) -> Result<NodeId, NetworkError> {
        let catchment = self.template.build()?;
        self.link_catchment_with(name, downstream, catchment)
    }

    /// Adds a caller-built catchment draining into `downstream`.
    ///
    /// # Errors
    ///
    /// As [`add_junction`](Self::add_junction).
    pub fn link_catchment_with(
        &mut self,
        name: &str,
        downstream: &str,
        catchment: Catchment,
    ) -> Result<NodeId, NetworkError> {
        self.check_free(name)?;
        let target = self.receiver(downstream)?;
        let capacity = Some(catchment.outflow());
        let id = self
            .graph
            .add_node(name, NodeKind::Catchment(Box::new(catchment)))?;
        self.attach(id, &[(self.source, id, None), (id, target, capacity)])?;
        debug!(name, downstream, "catchment linked");
        Ok(id)
    }

    /// Re-points every outgoing edge of a catchment or junction to
    /// `new_downstream`.
    ///
    /// The edge keeps its capacity. A junction with several outlets ends up
    /// with exactly one.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::ProtectedNode`] for the source or sink,
    /// [`NetworkError::Cycle`] if the new edge would close a loop, or a
    /// lookup error. The graph is unchanged on error.
    pub fn move_node(&mut self, name: &str, new_downstream: &str) -> Result<(), NetworkError> {
        let id = self.editable(name)?;
        let target = self.receiver(new_downstream)?;
        let old: Vec<EdgeId> = self.graph.outgoing(id).to_vec();
        let capacity = match self.kind(id) {
            Some(NodeKind::Catchment(c)) => old
                .first()
                .and_then(|&e| self.graph.edge(e))
                .map_or(Some(c.outflow()), |e| e.capacity),
            _ => None,
        };

        self.graph.add_edge(id, target, capacity)?;
        for e in old {
            self.graph.remove_edge(e);
        }
        debug!(name, new_downstream, "node moved");
        Ok(())
    }

    /// Adds an extra outlet from junction `from` to `to`.
    ///
    /// A junction with several outlets models a sub-basin shared by more
    /// than one downstream reach. Routing splits its flow between them.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::CatchmentOutlet`] when `from` is a
    /// catchment, [`NetworkError::ProtectedNode`] for the source or sink,
    /// [`NetworkError::Cycle`], or a lookup error.
    pub fn connect(&mut self, from: &str, to: &str) -> Result<EdgeId, NetworkError> {
        let id = self.editable(from)?;
        if matches!(self.kind(id), Some(NodeKind::Catchment(_))) {
            let downstream = self
                .graph
                .successors(id)
                .next()
                .and_then(|d| self.graph.name(d))
                .unwrap_or_default()
                .to_string();
            return Err(NetworkError::CatchmentOutlet {
                name: from.to_string(),
                downstream,
            });
        }
        let target = self.receiver(to)?;
        let edge = self.graph.add_edge(id, target, None)?;
        debug!(from, to, "junction outlet added");
        Ok(edge)
    }

    /// Deletes `name` and everything upstream of it, returning the removed
    /// names.
    ///
    /// The walk goes against edge direction and never crosses the source.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::NodeNotFound`] or
    /// [`NetworkError::ProtectedNode`]. Nothing is removed on error.
    pub fn delete_node(&mut self, name: &str) -> Result<Vec<String>, NetworkError> {
        let id = self.editable(name)?;
        let doomed = self
            .graph
            .upstream(id, |kind| matches!(kind, NodeKind::Source));
        let removed: Vec<String> = self
            .graph
            .remove_nodes(&doomed)?
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        debug!(name, removed = removed.len(), "subtree deleted");
        Ok(removed)
    }

    /// Makes junction `name` the basin outlet.
    ///
    /// The junction loses its outgoing edges and the previous sink becomes a
    /// junction with no downstream, so flow reaching it is no longer counted.
    /// Naming the current sink is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::NodeNotFound`],
    /// [`NetworkError::ProtectedNode`] for the source, or
    /// [`NetworkError::NotAJunction`]. The graph is unchanged on error.
    pub fn set_sink(&mut self, name: &str) -> Result<(), NetworkError> {
        if self.require(name)? == self.sink {
            return Ok(());
        }
        let id = self.editable(name)?;
        match self.kind(id) {
            Some(NodeKind::Junction) => {}
            Some(other) => {
                return Err(NetworkError::NotAJunction {
                    name: name.to_string(),
                    node_type: other.node_type(),
                });
            }
            None => return Err(not_found(name)),
        }

        let outlets: Vec<EdgeId> = self.graph.outgoing(id).to_vec();
        for e in outlets {
            self.graph.remove_edge(e);
        }
        if let Some(kind) = self.graph.weight_mut(self.sink) {
            *kind = NodeKind::Junction;
        }
        if let Some(kind) = self.graph.weight_mut(id) {
            *kind = NodeKind::Sink;
        }
        let previous = std::mem::replace(&mut self.sink, id);
        debug!(
            name,
            previous = self.graph.name(previous).unwrap_or_default(),
            "sink moved"
        );
        Ok(())
    }

    /// Read-only view of a node.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::NodeNotFound`] if `name` is absent.
    pub fn get_node(&self, name: &str) -> Result<NodeInfo<'_>, NetworkError> {
        let id = self.require(name)?;
        self.info(id).ok_or_else(|| not_found(name))
    }

    /// Views of every node in name order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeInfo<'_>> + '_ {
        self.graph.node_ids().filter_map(move |id| self.info(id))
    }

    /// The catchment stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::NodeNotFound`] or
    /// [`NetworkError::NotACatchment`].
    pub fn catchment(&self, name: &str) -> Result<&Catchment, NetworkError> {
        let id = self.require(name)?;
        match self.kind(id) {
            Some(NodeKind::Catchment(c)) => Ok(&**c),
            Some(other) => Err(NetworkError::NotACatchment {
                name: name.to_string(),
                node_type: other.node_type(),
            }),
            None => Err(not_found(name)),
        }
    }

    /// Mutable access to the catchment stored under `name`.
    ///
    /// # Errors
    ///
    /// As [`catchment`](Self::catchment).
    pub fn catchment_mut(&mut self, name: &str) -> Result<&mut Catchment, NetworkError> {
        let id = self.require(name)?;
        match self.graph.weight_mut(id) {
            Some(NodeKind::Catchment(c)) => Ok(&mut **c),
            Some(other) => Err(NetworkError::NotACatchment {
                name: name.to_string(),
                node_type: other.node_type(),
            }),
            None => Err(not_found(name)),
        }
    }

    /// Advances every catchment one step and routes the result to the sink.
    ///
    /// Each catchment's outflow becomes the capacity of its outgoing edge.
    /// Returns the basin outflow.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::Runoff`] if `precip` or `et` is negative or
    /// not finite. Forcing is checked before any catchment is touched.
    pub fn update(&mut self, precip: f64, et: f64) -> Result<f64, NetworkError> {
        check_forcing("precip", precip)?;
        check_forcing("et", et)?;

        let ids: Vec<NodeId> = self.graph.node_ids().collect();
        for id in ids {
            let outflow = match self.graph.weight_mut(id) {
                Some(NodeKind::Catchment(c)) => c.update_runoff(precip, et)?,
                _ => continue,
            };
            self.set_edge_capacity(id, outflow);
        }
        Ok(self.route())
    }

    /// Recomputes the max-flow with the current edge capacities and returns
    /// the basin outflow.
    pub fn route(&mut self) -> f64 {
        self.flow = max_flow(&self.graph, self.source, self.sink);
        self.outflow = self.flow.value();
        trace!(outflow = self.outflow, "network routed");
        self.outflow
    }

    /// Sets the outgoing edge capacity of a catchment directly.
    ///
    /// The value holds until the next [`update`](Self::update).
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidCapacity`] for a negative or
    /// non-finite value, [`NetworkError::NotACatchment`], or
    /// [`NetworkError::NodeNotFound`].
    pub fn set_outflow_capacity(&mut self, name: &str, value: f64) -> Result<(), NetworkError> {
        if !value.is_finite() || value < 0.0 {
            return Err(NetworkError::InvalidCapacity {
                name: name.to_string(),
                value,
            });
        }
        let id = self.require(name)?;
        self.catchment(name)?;
        self.set_edge_capacity(id, value);
        Ok(())
    }

    /// Basin outflow from the last routing.
    pub fn outflow(&self) -> f64 {
        self.outflow
    }

    /// Discharge through a node from the last routing.
    ///
    /// Catchments and the source report what leaves them; junctions and
    /// the sink report what arrives.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::NodeNotFound`] if `name` is absent.
    pub fn node_outflow(&self, name: &str) -> Result<f64, NetworkError> {
        let id = self.require(name)?;
        let edges = match self.kind(id).map(NodeKind::node_type) {
            Some(NodeType::Catchment | NodeType::Source) => self.graph.outgoing(id),
            _ => self.graph.incoming(id),
        };
        Ok(edges.iter().map(|&e| self.flow.edge_flow(e)).sum())
    }

    /// Replaces the whole network with the topology in `path`.
    ///
    /// The current template is the base for the file's `[defaults]`.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::FileRead`], [`NetworkError::Parse`] or
    /// [`NetworkError::InvalidTopology`]. The current network is kept on
    /// error.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<(), NetworkError> {
        let path = path.as_ref();
        let text = read_topology(path)?;
        let fresh = Self::build(&text, self.template.clone())?;
        *self = fresh;
        info!(
            path = %path.display(),
            nodes = self.node_count(),
            edges = self.edge_count(),
            "topology loaded"
        );
        Ok(())
    }

    /// Builds a network from topology text.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::Parse`] or [`NetworkError::InvalidTopology`].
    pub fn from_topology_str(text: &str) -> Result<Self, NetworkError> {
        Self::build(text, CatchmentTemplate::new())
    }

    /// Builds a network from a topology file.
    ///
    /// # Errors
    ///
    /// As [`load_from_file`](Self::load_from_file).
    pub fn from_topology_file(path: impl AsRef<Path>) -> Result<Self, NetworkError> {
        let path = path.as_ref();
        let network = Self::from_topology_str(&read_topology(path)?)?;
        info!(
            path = %path.display(),
            nodes = network.node_count(),
            edges = network.edge_count(),
            "topology loaded"
        );
        Ok(network)
    }

    /// Number of nodes, including the source and sink.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Catchment names in name order.
    pub fn catchment_names(&self) -> Vec<&str> {
        self.names_of(NodeType::Catchment)
    }

    /// Junction names in name order.
    pub fn junction_names(&self) -> Vec<&str> {
        self.names_of(NodeType::Junction)
    }

    /// Name of the source node.
    pub fn source_name(&self) -> &str {
        self.graph.name(self.source).unwrap_or(SOURCE_NAME)
    }

    /// Name of the sink node.
    pub fn sink_name(&self) -> &str {
        self.graph.name(self.sink).unwrap_or_default()
    }

    /// The underlying graph.
    pub fn graph(&self) -> &Graph<NodeKind> {
        &self.graph
    }

    fn build(text: &str, base: CatchmentTemplate) -> Result<Self, NetworkError> {
        let file = TopologyFile::parse(text)?;
        Self::from_topology(file, base).map_err(|e| match e {
            e if e.is_load() => e,
            e => NetworkError::InvalidTopology {
                reason: e.to_string(),
            },
        })
    }

    fn from_topology(file: TopologyFile, base: CatchmentTemplate) -> Result<Self, NetworkError> {
        let template = match &file.defaults {
            Some(d) => CatchmentTemplate {
                area: d.area.unwrap_or(base.area),
                params: d.params().apply(base.params),
            },
            None => base,
        };
        let mut net = Self::new(file.sink.as_str())?.with_template(template);

        // Nodes first so that entries may name a downstream defined later.
        let mut links = Vec::with_capacity(file.nodes.len());
        for entry in &file.nodes {
            let kind = match entry.node_type {
                NodeType::Source => {
                    debug!(name = %entry.name, "source entry ignored");
                    continue;
                }
                NodeType::Sink => {
                    return Err(NetworkError::InvalidTopology {
                        reason: format!(
                            "node '{}' is declared as a sink; the sink is set by the top-level `sink` key",
                            entry.name
                        ),
                    });
                }
                NodeType::Junction => {
                    if entry.area.is_some() || entry.params.is_some() {
                        return Err(NetworkError::InvalidTopology {
                            reason: format!(
                                "junction '{}' cannot carry `area` or `params`",
                                entry.name
                            ),
                        });
                    }
                    NodeKind::Junction
                }
                NodeType::Catchment => {
                    let area = entry.area.unwrap_or(net.template.area);
                    let params = match &entry.params {
                        Some(p) => p.apply(net.template.params.clone()),
                        None => net.template.params.clone(),
                    };
                    NodeKind::Catchment(Box::new(Catchment::new(area, params)?))
                }
            };
            let downstream = entry.downstream.as_deref().ok_or_else(|| {
                NetworkError::InvalidTopology {
                    reason: format!("node '{}' has no downstream", entry.name),
                }
            })?;
            let is_catchment = matches!(kind, NodeKind::Catchment(_));
            let id = net.graph.add_node(entry.name.as_str(), kind)?;
            links.push((id, downstream, is_catchment));
        }

        for (id, downstream, is_catchment) in links {
            let target = net.receiver(downstream)?;
            if is_catchment {
                net.graph.add_edge(net.source, id, None)?;
                net.graph.add_edge(id, target, Some(0.0))?;
            } else {
                net.graph.add_edge(id, target, None)?;
            }
        }
        Ok(net)
    }

    fn info(&self, id: NodeId) -> Option<NodeInfo<'_>> {
        let name = self.graph.name(id)?;
        let kind = self.graph.weight(id)?;
        Some(NodeInfo {
            name,
            kind,
            downstream: self.names(self.graph.successors(id)),
            upstream: self.names(self.graph.predecessors(id)),
        })
    }

    fn names(&self, ids: impl Iterator<Item = NodeId>) -> Vec<&str> {
        ids.filter_map(|n| self.graph.name(n)).collect()
    }

    fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.graph.weight(id)
    }

    fn names_of(&self, node_type: NodeType) -> Vec<&str> {
        self.graph
            .nodes()
            .filter(|(_, _, kind)| kind.node_type() == node_type)
            .map(|(_, name, _)| name)
            .collect()
    }

    fn set_edge_capacity(&mut self, id: NodeId, value: f64) {
        let edges: Vec<EdgeId> = self.graph.outgoing(id).to_vec();
        for e in edges {
            if let Some(edge) = self.graph.edge_mut(e) {
                edge.capacity = Some(value);
            }
        }
    }

    fn require(&self, name: &str) -> Result<NodeId, NetworkError> {
        self.graph.find(name).ok_or_else(|| not_found(name))
    }

    fn check_free(&self, name: &str) -> Result<(), NetworkError> {
        if self.graph.find(name).is_some() {
            return Err(NetworkError::DuplicateNode {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Looks up a node that may receive routed flow.
    fn receiver(&self, name: &str) -> Result<NodeId, NetworkError> {
        let id = self.require(name)?;
        match self.kind(id).map(NodeKind::node_type) {
            Some(t) if t.accepts_inflow() => Ok(id),
            Some(node_type) => Err(NetworkError::InvalidDownstream {
                name: name.to_string(),
                node_type,
            }),
            None => Err(not_found(name)),
        }
    }

    /// Looks up a node that edits may touch.
    fn editable(&self, name: &str) -> Result<NodeId, NetworkError> {
        let id = self.require(name)?;
        if id == self.source || id == self.sink {
            return Err(NetworkError::ProtectedNode {
                name: name.to_string(),
            });
        }
        Ok(id)
    }

    /// Adds the edges of a freshly inserted node, removing the node again
    /// if any edge is refused.
    fn attach(
        &mut self,
        id: NodeId,
        edges: &[(NodeId, NodeId, Option<f64>)],
    ) -> Result<(), NetworkError> {
        for &(from, to, capacity) in edges {
            if let Err(e) = self.graph.add_edge(from, to, capacity) {
                self.graph.remove_nodes(&[id])?;
                return Err(e);
            }
        }
        Ok(())
    }
}

fn read_topology(path: &Path) -> Result<String, NetworkError> {
    fs::read_to_string(path).map_err(|e| NetworkError::FileRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn not_found(name: &str) -> NetworkError {
    NetworkError::NodeNotFound {
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_level() -> WatershedNetwork {
        let mut net = WatershedNetwork::new("out").unwrap();
        net.add_junction("J1", "out").unwrap();
        net.link_catchment("C1", "J1").unwrap();
        net.link_catchment("C2", "out").unwrap();
        net
    }

    #[test]
    fn new_holds_source_and_sink() {
        let net = WatershedNetwork::new("out").unwrap();
        assert_eq!(net.node_count(), 2);
        assert_eq!(net.edge_count(), 0);
        assert_eq!(net.source_name(), SOURCE_NAME);
        assert_eq!(net.sink_name(), "out");
        assert!(WatershedNetwork::new(SOURCE_NAME).is_err());
    }

    #[test]
    fn link_adds_source_and_outlet_edges() {
        let net = two_level();
        assert_eq!(net.node_count(), 5);
        // J1->out, source->C1, C1->J1, source->C2, C2->out
        assert_eq!(net.edge_count(), 5);
        let c1 = net.get_node("C1").unwrap();
        assert_eq!(c1.node_type(), NodeType::Catchment);
        assert_eq!(c1.downstream, vec!["J1"]);
        assert_eq!(c1.upstream, vec![SOURCE_NAME]);
        assert_eq!(net.catchment_names(), vec!["C1", "C2"]);
        assert_eq!(net.junction_names(), vec!["J1"]);
    }

    #[test]
    fn catchment_cannot_receive_flow() {
        let mut net = two_level();
        let err = net.add_junction("J2", "C1").unwrap_err();
        assert!(matches!(
            err,
            NetworkError::InvalidDownstream {
                node_type: NodeType::Catchment,
                ..
            }
        ));
        assert!(net.link_catchment("C3", SOURCE_NAME).is_err());
        assert_eq!(net.node_count(), 5);
    }

    #[test]
    fn explicit_capacities_route_to_sink() {
        let mut net = two_level();
        net.set_outflow_capacity("C1", 1.5).unwrap();
        net.set_outflow_capacity("C2", 2.0).unwrap();
        assert_relative_eq!(net.route(), 3.5);
        assert_relative_eq!(net.node_outflow("J1").unwrap(), 1.5);
        assert_relative_eq!(net.node_outflow("out").unwrap(), 3.5);
        assert_relative_eq!(net.node_outflow("C2").unwrap(), 2.0);
    }

    #[test]
    fn set_outflow_capacity_validates() {
        let mut net = two_level();
        assert!(matches!(
            net.set_outflow_capacity("C1", -1.0),
            Err(NetworkError::InvalidCapacity { .. })
        ));
        assert!(matches!(
            net.set_outflow_capacity("J1", 1.0),
            Err(NetworkError::NotACatchment { .. })
        ));
        assert!(matches!(
            net.set_outflow_capacity("nope", 1.0),
            Err(NetworkError::NodeNotFound { .. })
        ));
    }

    #[test]
    fn update_rejects_bad_forcing_before_any_change() {
        let mut net = two_level();
        net.update(30.0, 0.25).unwrap();
        let before = net.catchment("C1").unwrap().clone();
        assert!(net.update(f64::NAN, 0.0).is_err());
        assert!(net.update(1.0, -0.1).is_err());
        assert_eq!(net.catchment("C1").unwrap(), &before);
    }

    #[test]
    fn move_keeps_capacity() {
        let mut net = two_level();
        net.add_junction("J2", "out").unwrap();
        net.set_outflow_capacity("C1", 4.0).unwrap();
        net.move_node("C1", "J2").unwrap();
        assert_eq!(net.get_node("C1").unwrap().downstream, vec!["J2"]);
        assert_relative_eq!(net.route(), 4.0);
        assert_relative_eq!(net.node_outflow("J2").unwrap(), 4.0);
        assert_eq!(net.node_outflow("J1").unwrap(), 0.0);
    }

    #[test]
    fn move_into_own_subtree_is_a_cycle() {
        let mut net = two_level();
        net.add_junction("J2", "J1").unwrap();
        let edges = net.edge_count();
        let err = net.move_node("J1", "J2").unwrap_err();
        assert!(matches!(err, NetworkError::Cycle { .. }));
        assert_eq!(net.edge_count(), edges);
        assert_eq!(net.get_node("J1").unwrap().downstream, vec!["out"]);
    }

    #[test]
    fn protected_nodes() {
        let mut net = two_level();
        for name in [SOURCE_NAME, "out"] {
            assert!(matches!(
                net.delete_node(name),
                Err(NetworkError::ProtectedNode { .. })
            ));
            assert!(matches!(
                net.move_node(name, "J1"),
                Err(NetworkError::ProtectedNode { .. })
            ));
        }
    }

    #[test]
    fn catchment_has_one_outlet() {
        let mut net = two_level();
        let err = net.connect("C1", "out").unwrap_err();
        assert_eq!(err.to_string(), "catchment 'C1' already drains into 'J1'");
    }

    #[test]
    fn catchment_mut_rejects_junction() {
        let mut net = two_level();
        assert!(net.catchment_mut("C1").is_ok());
        assert!(matches!(
            net.catchment_mut("J1"),
            Err(NetworkError::NotACatchment {
                node_type: NodeType::Junction,
                ..
            })
        ));
    }

    #[test]
    fn template_applies_to_linked_catchments() {
        let template = CatchmentTemplate::new().with_area(7.5);
        let mut net = WatershedNetwork::new("out").unwrap().with_template(template);
        net.link_catchment("C1", "out").unwrap();
        assert_eq!(net.catchment("C1").unwrap().area(), 7.5);

        let bad = CatchmentTemplate::new().with_area(0.0);
        let mut net = WatershedNetwork::new("out").unwrap().with_template(bad);
        assert!(matches!(
            net.link_catchment("C1", "out"),
            Err(NetworkError::Runoff(_))
        ));
        assert_eq!(net.node_count(), 2);
    }
}
