//! Watershed routing network.
//!
//! A [`WatershedNetwork`] is a directed acyclic graph of catchments,
//! junctions and one sink, fed by a single source node. Each step every
//! catchment computes its outflow, that outflow becomes the capacity of the
//! catchment's outgoing edge, and a maximum flow from source to sink gives
//! the basin outflow. Junction edges are uncapped, so the flow reaching the
//! sink is the total outflow of every catchment upstream of it, including
//! sub-basins shared between several reaches.
//!
//! # Quick start
//!
//! ```rust
//! use tributary_network::WatershedNetwork;
//!
//! let mut net = WatershedNetwork::new("outlet").unwrap();
//! net.add_junction("J1", "outlet").unwrap();
//! net.link_catchment("C1", "J1").unwrap();
//! net.link_catchment("C2", "J1").unwrap();
//!
//! for _ in 0..10 {
//!     net.update(6.54, 0.25).unwrap();
//! }
//! let single = net.catchment("C1").unwrap().outflow();
//! assert!((net.outflow() - 2.0 * single).abs() < 1e-9);
//! ```
//!
//! Topologies can also be loaded from TOML; see [`topology`].

pub mod error;
pub mod flow;
pub mod graph;
pub mod network;
pub mod node;
pub mod topology;

pub use error::NetworkError;
pub use flow::{FlowResult, max_flow};
pub use graph::{Edge, EdgeId, Graph, NodeId};
pub use network::{CatchmentTemplate, SOURCE_NAME, WatershedNetwork};
pub use node::{NodeInfo, NodeKind, NodeType};
pub use topology::TopologyFile;
