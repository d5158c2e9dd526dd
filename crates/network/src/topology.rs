//! TOML layout of a topology file.
//!
//! ```toml
//! sink = "J3"
//!
//! [defaults]
//! area = 100.0
//! baseflow_index = 0.658
//!
//! [[nodes]]
//! name = "C1"
//! node_type = "catchment"
//! downstream = "J1"
//! area = 12.6
//!
//! [nodes.params]
//! surface_recession = 0.9
//! ```
//!
//! These structs only describe the file. Turning them into a network,
//! including every validation, happens in
//! [`WatershedNetwork::from_topology_str`](crate::WatershedNetwork::from_topology_str).

use serde::Deserialize;
use tributary_runoff::BucketParams;

use crate::error::NetworkError;
use crate::node::NodeType;

/// Root of a topology file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TopologyFile {
    /// Name of the outlet node. It is created as the sink and must not
    /// appear among `nodes`.
    pub sink: String,
    /// Catchment template overrides.
    #[serde(default)]
    pub defaults: Option<DefaultsSection>,
    /// Node entries in file order.
    #[serde(default)]
    pub nodes: Vec<NodeEntry>,
}

impl TopologyFile {
    /// Parses topology text.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::Parse`] for invalid TOML, unknown fields or
    /// unknown node types.
    pub fn parse(text: &str) -> Result<Self, NetworkError> {
        toml::from_str(text).map_err(|e| NetworkError::Parse {
            reason: e.to_string(),
        })
    }
}

/// `[defaults]`: the catchment template used for every catchment entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsSection {
    /// Default catchment area.
    pub area: Option<f64>,
    /// Fraction of the catchment drained by each bucket; sums to 1.
    #[serde(default)]
    pub partial_area_fraction: Option<Vec<f64>>,
    /// Depth capacity of each bucket, in mm.
    #[serde(default)]
    pub depth_capacity: Option<Vec<f64>>,
    /// Share of bucket overflow sent to baseflow.
    #[serde(default)]
    pub baseflow_index: Option<f64>,
    /// Daily recession constant of the surface store.
    #[serde(default)]
    pub surface_recession: Option<f64>,
    /// Daily recession constant of the baseflow store.
    #[serde(default)]
    pub baseflow_recession: Option<f64>,
}

impl DefaultsSection {
    /// The parameter part of the section.
    pub fn params(&self) -> ParamsSection {
        ParamsSection {
            partial_area_fraction: self.partial_area_fraction.clone(),
            depth_capacity: self.depth_capacity.clone(),
            baseflow_index: self.baseflow_index,
            surface_recession: self.surface_recession,
            baseflow_recession: self.baseflow_recession,
        }
    }
}

/// Optional bucket parameter overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamsSection {
    /// Bucket area fractions.
    #[serde(default)]
    pub partial_area_fraction: Option<Vec<f64>>,
    /// Bucket depth capacities, in mm.
    #[serde(default)]
    pub depth_capacity: Option<Vec<f64>>,
    /// Baseflow index.
    #[serde(default)]
    pub baseflow_index: Option<f64>,
    /// Surface store recession constant.
    #[serde(default)]
    pub surface_recession: Option<f64>,
    /// Baseflow store recession constant.
    #[serde(default)]
    pub baseflow_recession: Option<f64>,
}

impl ParamsSection {
    /// Returns `base` with every field present in this section replaced.
    ///
    /// Values are not validated here; the catchment constructor does that.
    pub fn apply(&self, base: BucketParams) -> BucketParams {
        let mut params = base;
        if let Some(f) = &self.partial_area_fraction {
            params = params.with_partial_area_fraction(f.clone());
        }
        if let Some(d) = &self.depth_capacity {
            params = params.with_depth_capacity(d.clone());
        }
        if let Some(bfi) = self.baseflow_index {
            params = params.with_baseflow_index(bfi);
        }
        if let Some(k) = self.surface_recession {
            params = params.with_surface_recession(k);
        }
        if let Some(k) = self.baseflow_recession {
            params = params.with_baseflow_recession(k);
        }
        params
    }
}

/// One `[[nodes]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeEntry {
    /// Unique node name.
    pub name: String,
    /// `catchment`, `junction` or `source`.
    pub node_type: NodeType,
    /// Required for catchments and junctions.
    #[serde(default)]
    pub downstream: Option<String>,
    /// Catchment area; overrides `defaults.area`. Rejected on junctions.
    #[serde(default)]
    pub area: Option<f64>,
    /// Catchment parameter overrides.
    #[serde(default)]
    pub params: Option<ParamsSection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal() {
        let file = TopologyFile::parse(r#"sink = "out""#).unwrap();
        assert_eq!(file.sink, "out");
        assert!(file.defaults.is_none());
        assert!(file.nodes.is_empty());
    }

    #[test]
    fn parse_nodes_and_overrides() {
        let text = r#"
sink = "J2"

[defaults]
area = 50.0
baseflow_index = 0.5

[[nodes]]
name = "source"
node_type = "source"

[[nodes]]
name = "C1"
node_type = "catchment"
downstream = "J1"
area = 12.6

[nodes.params]
surface_recession = 0.9

[[nodes]]
name = "J1"
node_type = "junction"
downstream = "J2"
"#;
        let file = TopologyFile::parse(text).unwrap();
        let defaults = file.defaults.unwrap();
        assert_eq!(defaults.area, Some(50.0));
        assert_eq!(file.nodes.len(), 3);
        assert_eq!(file.nodes[0].node_type, NodeType::Source);
        assert_eq!(file.nodes[1].area, Some(12.6));
        assert_eq!(file.nodes[1].downstream.as_deref(), Some("J1"));

        let params = file.nodes[1]
            .params
            .as_ref()
            .unwrap()
            .apply(defaults.params().apply(BucketParams::new()));
        assert_eq!(params.baseflow_index(), 0.5);
        assert_eq!(params.surface_recession(), 0.9);
        assert_eq!(params.baseflow_recession(), 0.309);
    }

    #[test]
    fn reject_unknown_field() {
        let text = r#"
sink = "J1"
[[nodes]]
name = "C1"
node_type = "catchment"
downstream = "J1"
colour = "blue"
"#;
        assert!(matches!(
            TopologyFile::parse(text),
            Err(NetworkError::Parse { .. })
        ));
    }

    #[test]
    fn reject_unknown_node_type() {
        let text = r#"
sink = "J1"
[[nodes]]
name = "R1"
node_type = "reservoir"
downstream = "J1"
"#;
        assert!(TopologyFile::parse(text).is_err());
    }

    #[test]
    fn reject_missing_sink() {
        assert!(TopologyFile::parse("[[nodes]]\nname = \"C1\"\nnode_type = \"catchment\"\n").is_err());
    }
}
