//! Pure conversion functions: TOML config structs -> runtime types.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::clock::Clock;
use crate::config::{AreaUnit, DepthUnit, ForcingToml, RunConfig, UnitsToml};
use crate::forcing::Forcing;

/// Validates the forcing series and converts them from `depth` to mm.
///
/// Both series must be non-empty and every value finite and non-negative.
pub fn build_forcing(forcing: &ForcingToml, depth: DepthUnit) -> Result<Forcing> {
    check_series("precip", &forcing.precip)?;
    check_series("et", &forcing.et)?;
    let scale = millimetres_per(depth);
    let to_mm = |series: &[f64]| series.iter().map(|v| v * scale).collect();
    Ok(Forcing::new(to_mm(&forcing.precip), to_mm(&forcing.et)))
}

/// Millimetres in one `depth` unit.
pub fn millimetres_per(depth: DepthUnit) -> f64 {
    match depth {
        DepthUnit::Millimetre => 1.0,
        DepthUnit::Metre => 1000.0,
    }
}

fn check_series(name: &str, values: &[f64]) -> Result<()> {
    if values.is_empty() {
        bail!("forcing.{name} must not be empty");
    }
    if let Some((i, v)) = values
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite() || **v < 0.0)
    {
        bail!("forcing.{name}[{i}] must be finite and non-negative, got {v}");
    }
    Ok(())
}

/// Builds the daily clock for the run.
pub fn build_clock(config: &RunConfig) -> Result<Clock> {
    if config.steps == 0 {
        bail!("steps must be at least 1");
    }
    Clock::new(config.start, config.steps)
}

/// Resolves the topology path against the config file's directory.
pub fn resolve_topology(config_path: &Path, config: &RunConfig) -> PathBuf {
    if config.topology.is_absolute() {
        return config.topology.clone();
    }
    config_path
        .parent()
        .map_or_else(|| config.topology.clone(), |dir| dir.join(&config.topology))
}

/// Cubic metres per (mm x area unit).
///
/// The engine always runs in mm, so only the area tag matters here.
/// With the default tag `mm x km2 = 1000 m3`.
pub fn volume_factor(units: &UnitsToml) -> f64 {
    let area_m2 = match units.area {
        AreaUnit::SquareKilometre => 1e6,
        AreaUnit::Hectare => 1e4,
        AreaUnit::SquareMetre => 1.0,
    };
    1e-3 * area_m2
}
