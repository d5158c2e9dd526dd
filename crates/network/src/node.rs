//! Node payloads of the watershed graph.

use std::fmt;

use serde::Deserialize;
use tributary_runoff::Catchment;

/// Role of a node, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// The single node feeding every catchment.
    Source,
    /// A contributing area.
    Catchment,
    /// A confluence point.
    Junction,
    /// The basin outlet.
    Sink,
}

impl NodeType {
    /// True for node types that may receive routed flow.
    pub fn accepts_inflow(self) -> bool {
        matches!(self, Self::Junction | Self::Sink)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Source => "source",
            Self::Catchment => "catchment",
            Self::Junction => "junction",
            Self::Sink => "sink",
        };
        f.pad(s)
    }
}

/// Payload stored on each graph node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// The single node feeding every catchment.
    Source,
    /// A contributing area and its runoff model.
    Catchment(Box<Catchment>),
    /// A confluence point.
    Junction,
    /// The basin outlet.
    Sink,
}

impl NodeKind {
    /// Returns the role of this node.
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Source => NodeType::Source,
            Self::Catchment(_) => NodeType::Catchment,
            Self::Junction => NodeType::Junction,
            Self::Sink => NodeType::Sink,
        }
    }

    /// Returns the catchment payload, if any.
    pub fn as_catchment(&self) -> Option<&Catchment> {
        match self {
            Self::Catchment(c) => Some(&**c),
            _ => None,
        }
    }

    /// Returns the catchment payload mutably, if any.
    pub fn as_catchment_mut(&mut self) -> Option<&mut Catchment> {
        match self {
            Self::Catchment(c) => Some(&mut **c),
            _ => None,
        }
    }
}

/// Read-only view of a node returned by
/// [`WatershedNetwork::get_node`](crate::WatershedNetwork::get_node).
#[derive(Debug, Clone)]
pub struct NodeInfo<'a> {
    /// Node name.
    pub name: &'a str,
    /// Node payload.
    pub kind: &'a NodeKind,
    /// Names of the nodes this one drains into.
    pub downstream: Vec<&'a str>,
    /// Names of the nodes draining into this one.
    pub upstream: Vec<&'a str>,
}

impl NodeInfo<'_> {
    /// Role of the node.
    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }
}
