use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;

/// Top-level run configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Topology file, relative to the config file's directory.
    pub topology: PathBuf,

    /// First simulated day.
    pub start: NaiveDate,

    /// Number of daily steps.
    #[serde(default = "default_steps")]
    pub steps: u32,

    /// Output JSON path; stdout when unset.
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Unit tags of the forcing series and topology areas.
    #[serde(default)]
    pub units: UnitsToml,

    /// Forcing series.
    pub forcing: ForcingToml,
}

fn default_steps() -> u32 {
    365
}

/// Depth unit of the precipitation and ET series.
///
/// Forcing is converted to mm before it reaches the engine. Bucket depths in
/// the topology file are always mm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum DepthUnit {
    #[serde(rename = "mm")]
    Millimetre,
    #[serde(rename = "m")]
    Metre,
}

/// Unit of catchment areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum AreaUnit {
    #[serde(rename = "km2")]
    SquareKilometre,
    #[serde(rename = "ha")]
    Hectare,
    #[serde(rename = "m2")]
    SquareMetre,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitsToml {
    #[serde(default = "default_depth_unit")]
    pub depth: DepthUnit,
    #[serde(default = "default_area_unit")]
    pub area: AreaUnit,
}

impl Default for UnitsToml {
    fn default() -> Self {
        Self {
            depth: default_depth_unit(),
            area: default_area_unit(),
        }
    }
}

fn default_depth_unit() -> DepthUnit {
    DepthUnit::Millimetre
}
fn default_area_unit() -> AreaUnit {
    AreaUnit::SquareKilometre
}

/// Per-step precipitation and ET. Each series repeats when it is shorter
/// than the run.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForcingToml {
    pub precip: Vec<f64>,
    #[serde(default = "default_et")]
    pub et: Vec<f64>,
}

fn default_et() -> Vec<f64> {
    vec![0.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let text = r#"
topology = "basin.toml"
start = "2024-03-01"
steps = 10
output = "out.json"

[units]
depth = "mm"
area = "km2"

[forcing]
precip = [6.54, 0.0]
et = [0.25]
"#;
        let cfg: RunConfig = toml::from_str(text).unwrap();
        assert_eq!(cfg.topology, PathBuf::from("basin.toml"));
        assert_eq!(cfg.start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(cfg.steps, 10);
        assert_eq!(cfg.units.depth, DepthUnit::Millimetre);
        assert_eq!(cfg.units.area, AreaUnit::SquareKilometre);
        assert_eq!(cfg.forcing.precip, vec![6.54, 0.0]);
    }

    #[test]
    fn defaults_apply() {
        let text = r#"
topology = "basin.toml"
start = "2024-03-01"
[forcing]
precip = [1.0]
"#;
        let cfg: RunConfig = toml::from_str(text).unwrap();
        assert_eq!(cfg.steps, 365);
        assert!(cfg.output.is_none());
        assert_eq!(cfg.units.depth, DepthUnit::Millimetre);
        assert_eq!(cfg.forcing.et, vec![0.0]);
    }

    #[test]
    fn unknown_unit_tag_rejected() {
        let text = r#"
topology = "basin.toml"
start = "2024-03-01"
[units]
depth = "inch"
[forcing]
precip = [1.0]
"#;
        assert!(toml::from_str::<RunConfig>(text).is_err());
    }

    #[test]
    fn unknown_field_rejected() {
        let text = r#"
topology = "basin.toml"
start = "2024-03-01"
seed = 42
[forcing]
precip = [1.0]
"#;
        assert!(toml::from_str::<RunConfig>(text).is_err());
    }
}
