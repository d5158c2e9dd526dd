//! Error types for the tributary-network crate.

use std::path::PathBuf;

use tributary_runoff::RunoffError;

use crate::node::NodeType;

/// Error type for all fallible operations in the tributary-network crate.
///
/// Topology variants are returned by edit operations, load variants by
/// topology loading. In both cases the network is left as it was before
/// the call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NetworkError {
    /// Returned when a node name is already taken.
    #[error("node '{name}' already exists")]
    DuplicateNode {
        /// The duplicated name.
        name: String,
    },

    /// Returned when a referenced node does not exist.
    #[error("node '{name}' does not exist")]
    NodeNotFound {
        /// The missing name.
        name: String,
    },

    /// Returned when a node id no longer refers to a live node.
    #[error("node id {index} is not in the graph")]
    UnknownNodeId {
        /// Arena index of the stale id.
        index: usize,
    },

    /// Returned when flow would be routed into a node that cannot receive it.
    #[error("node '{name}' ({node_type}) cannot receive flow")]
    InvalidDownstream {
        /// Name of the rejected downstream node.
        name: String,
        /// Its type.
        node_type: NodeType,
    },

    /// Returned when an edge would close a loop.
    #[error("edge '{from}' -> '{to}' would create a cycle")]
    Cycle {
        /// Upstream end of the rejected edge.
        from: String,
        /// Downstream end of the rejected edge.
        to: String,
    },

    /// Returned when an edit targets the source or the sink.
    #[error("node '{name}' is protected and cannot be edited")]
    ProtectedNode {
        /// Name of the protected node.
        name: String,
    },

    /// Returned when a catchment operation targets another node type.
    #[error("node '{name}' is a {node_type}, not a catchment")]
    NotACatchment {
        /// Name of the node.
        name: String,
        /// Its actual type.
        node_type: NodeType,
    },

    /// Returned when a junction operation targets another node type.
    #[error("node '{name}' is a {node_type}, not a junction")]
    NotAJunction {
        /// Name of the node.
        name: String,
        /// Its actual type.
        node_type: NodeType,
    },

    /// Returned when a second outlet is requested for a catchment.
    #[error("catchment '{name}' already drains into '{downstream}'")]
    CatchmentOutlet {
        /// Name of the catchment.
        name: String,
        /// Its current downstream node.
        downstream: String,
    },

    /// Returned when an explicit edge capacity is negative or not finite.
    #[error("invalid capacity for '{name}': {value}")]
    InvalidCapacity {
        /// Catchment whose edge was targeted.
        name: String,
        /// The rejected value.
        value: f64,
    },

    /// Returned when a topology file cannot be read.
    #[error("failed to read topology file {}: {reason}", path.display())]
    FileRead {
        /// Path that was read.
        path: PathBuf,
        /// Description of the I/O failure.
        reason: String,
    },

    /// Returned when topology text is not valid TOML for the expected layout.
    #[error("failed to parse topology: {reason}")]
    Parse {
        /// Description of the parse failure.
        reason: String,
    },

    /// Returned when a parsed topology does not describe a valid network.
    #[error("invalid topology: {reason}")]
    InvalidTopology {
        /// Description of the problem.
        reason: String,
    },

    /// Wraps a runoff model failure.
    #[error(transparent)]
    Runoff(#[from] RunoffError),
}

impl NetworkError {
    /// True for errors raised by topology edits.
    pub fn is_topology(&self) -> bool {
        matches!(
            self,
            Self::DuplicateNode { .. }
                | Self::NodeNotFound { .. }
                | Self::UnknownNodeId { .. }
                | Self::InvalidDownstream { .. }
                | Self::Cycle { .. }
                | Self::ProtectedNode { .. }
                | Self::NotACatchment { .. }
                | Self::NotAJunction { .. }
                | Self::CatchmentOutlet { .. }
        )
    }

    /// True for errors raised while loading a topology.
    pub fn is_load(&self) -> bool {
        matches!(
            self,
            Self::FileRead { .. } | Self::Parse { .. } | Self::InvalidTopology { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_duplicate_node() {
        let e = NetworkError::DuplicateNode {
            name: "J1".to_string(),
        };
        assert_eq!(e.to_string(), "node 'J1' already exists");
        assert!(e.is_topology());
        assert!(!e.is_load());
    }

    #[test]
    fn error_invalid_downstream() {
        let e = NetworkError::InvalidDownstream {
            name: "C1".to_string(),
            node_type: NodeType::Catchment,
        };
        assert_eq!(e.to_string(), "node 'C1' (catchment) cannot receive flow");
    }

    #[test]
    fn error_cycle() {
        let e = NetworkError::Cycle {
            from: "J1".to_string(),
            to: "J2".to_string(),
        };
        assert_eq!(e.to_string(), "edge 'J1' -> 'J2' would create a cycle");
        assert!(e.is_topology());
    }

    #[test]
    fn error_not_a_junction() {
        let e = NetworkError::NotAJunction {
            name: "C1".to_string(),
            node_type: NodeType::Catchment,
        };
        assert_eq!(e.to_string(), "node 'C1' is a catchment, not a junction");
        assert!(e.is_topology());
    }

    #[test]
    fn error_file_read() {
        let e = NetworkError::FileRead {
            path: PathBuf::from("basin.toml"),
            reason: "not found".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "failed to read topology file basin.toml: not found"
        );
        assert!(e.is_load());
    }

    #[test]
    fn error_runoff_is_neither() {
        let e = NetworkError::from(RunoffError::InvalidArea { value: 0.0 });
        assert!(!e.is_topology());
        assert!(!e.is_load());
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<NetworkError>();
    }
}
