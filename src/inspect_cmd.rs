//! Inspect command: summarize a topology file.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use tracing::info_span;

use tributary_network::{NodeKind, WatershedNetwork};

use crate::cli::InspectArgs;

/// Load a topology and print its nodes and edges.
pub fn run(args: InspectArgs) -> Result<()> {
    let _cmd = info_span!("inspect").entered();
    let network = WatershedNetwork::from_topology_file(&args.topology)
        .with_context(|| format!("failed to load topology: {}", args.topology.display()))?;
    print!("{}", summary(&network));
    Ok(())
}

/// Renders one line per node plus the totals.
pub fn summary(network: &WatershedNetwork) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "sink: {}  nodes: {}  edges: {}  catchments: {}  junctions: {}",
        network.sink_name(),
        network.node_count(),
        network.edge_count(),
        network.catchment_names().len(),
        network.junction_names().len(),
    );
    for node in network.nodes() {
        let detail = match node.kind {
            NodeKind::Catchment(c) => format!("  area={}", c.area()),
            NodeKind::Source | NodeKind::Junction | NodeKind::Sink => String::new(),
        };
        let downstream = if node.downstream.is_empty() {
            "-".to_string()
        } else {
            node.downstream.join(", ")
        };
        let _ = writeln!(
            out,
            "{:<12} {:<10} -> {}{}",
            node.name,
            node.node_type(),
            downstream,
            detail
        );
    }
    out
}
