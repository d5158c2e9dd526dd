//! Simulate command: drive a watershed through a forcing series.

use std::collections::BTreeMap;
use std::fs;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, info_span, instrument};

use tributary_network::WatershedNetwork;

use crate::cli::SimulateArgs;
use crate::clock::Clock;
use crate::config::RunConfig;
use crate::convert;
use crate::forcing::Forcing;

/// JSON document written by `simulate`.
#[derive(Debug, Serialize)]
struct SimulationReport {
    topology: String,
    sink: String,
    /// Unit of every discharge value.
    units: &'static str,
    steps: Vec<StepRecord>,
}

/// One simulated day.
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub date: NaiveDate,
    pub precip: f64,
    pub et: f64,
    /// Discharge at the sink.
    pub outflow: f64,
    /// Discharge arriving at each junction.
    pub junctions: BTreeMap<String, f64>,
}

/// Run the simulation pipeline.
pub fn run(args: SimulateArgs) -> Result<()> {
    let _cmd = info_span!("simulate").entered();

    // 1. Load run config
    let toml_str = fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file: {}", args.config.display()))?;
    let config: RunConfig = toml::from_str(&toml_str).context("failed to parse TOML config")?;

    let forcing = convert::build_forcing(&config.forcing, config.units.depth)?;
    let mut clock = convert::build_clock(&config)?;
    if let Some(start) = args.start {
        clock.set_start(start)?;
    }
    if let Some(steps) = args.steps {
        anyhow::ensure!(steps >= 1, "--steps must be at least 1");
        clock.set_duration(steps)?;
    }
    let factor = convert::volume_factor(&config.units);

    // 2. Load topology
    let topology = convert::resolve_topology(&args.config, &config);
    let mut network = WatershedNetwork::from_topology_file(&topology)
        .with_context(|| format!("failed to load topology: {}", topology.display()))?;
    info!(
        catchments = network.catchment_names().len(),
        junctions = network.junction_names().len(),
        sink = network.sink_name(),
        "network ready"
    );

    // 3. Step through the run
    let steps = simulate(&mut network, &mut clock, &forcing, factor)?;
    let peak = steps.iter().map(|s| s.outflow).fold(0.0, f64::max);
    info!(n_steps = steps.len(), peak, "simulation complete");

    // 4. Write results
    let report = SimulationReport {
        topology: topology.display().to_string(),
        sink: network.sink_name().to_string(),
        units: "m3",
        steps,
    };
    let json = serde_json::to_string_pretty(&report).context("failed to serialize results")?;

    match args.output.or(config.output) {
        Some(path) => {
            fs::write(&path, &json)
                .with_context(|| format!("failed to write results: {}", path.display()))?;
            info!(path = %path.display(), "results written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Advances `network` once per clock day and records the discharges,
/// scaled by `factor` into cubic metres.
#[instrument(skip_all, fields(start = %clock.start(), end = %clock.end()))]
pub fn simulate(
    network: &mut WatershedNetwork,
    clock: &mut Clock,
    forcing: &Forcing,
    factor: f64,
) -> Result<Vec<StepRecord>> {
    let junctions: Vec<String> = network
        .junction_names()
        .into_iter()
        .map(str::to_string)
        .collect();

    let days = usize::try_from(clock.remaining().num_days()).unwrap_or(0);
    let mut records = Vec::with_capacity(days);
    while clock.is_running() {
        let date = clock.current();
        let (precip, et) = forcing.at(records.len());
        let outflow = network
            .update(precip, et)
            .with_context(|| format!("step {date} failed"))?;

        let mut at_junctions = BTreeMap::new();
        for name in &junctions {
            let q = network.node_outflow(name)?;
            at_junctions.insert(name.clone(), q * factor);
        }

        records.push(StepRecord {
            date,
            precip,
            et,
            outflow: outflow * factor,
            junctions: at_junctions,
        });
        clock.advance();
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    use approx::assert_relative_eq;
    use tributary_network::CatchmentTemplate;

    fn twin_basin() -> WatershedNetwork {
        let template = CatchmentTemplate::new().with_area(10.0);
        let mut net = WatershedNetwork::new("outlet")
            .unwrap()
            .with_template(template);
        net.add_junction("J", "outlet").unwrap();
        net.link_catchment("C1", "J").unwrap();
        net.link_catchment("C2", "J").unwrap();
        net
    }

    #[test]
    fn one_record_per_day() {
        let mut net = twin_basin();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut clock = Clock::new(start, 10).unwrap();
        let forcing = Forcing::new(vec![6.54], vec![0.25]);

        let records = simulate(&mut net, &mut clock, &forcing, 1000.0).unwrap();
        assert_eq!(records.len(), 10);
        assert_eq!(records[0].date, start);
        assert_eq!(records[9].date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());

        // last day: two catchments of area 10 at 6.3905... mm·km2 each
        let last = &records[9];
        assert_relative_eq!(last.outflow, 2.0 * 6.390533652973295 * 1000.0, max_relative = 1e-9);
        assert_relative_eq!(last.junctions["J"], last.outflow, max_relative = 1e-12);
        assert!(!clock.is_running());
    }

    const TOPOLOGY: &str = r#"
sink = "outlet"

[[nodes]]
name = "C1"
node_type = "catchment"
downstream = "outlet"
area = 10.0
"#;

    fn run_config(dir: &Path, name: &str, depth: &str, precip: f64, et: f64) -> PathBuf {
        let path = dir.join(name);
        let text = format!(
            "topology = \"basin.toml\"\nstart = \"2024-01-01\"\nsteps = 10\n\
             [units]\ndepth = \"{depth}\"\n\
             [forcing]\nprecip = [{precip:?}]\net = [{et:?}]\n"
        );
        fs::write(&path, text).unwrap();
        path
    }

    fn run_to_json(config: PathBuf, output: PathBuf, steps: Option<u32>) -> serde_json::Value {
        run(SimulateArgs {
            config,
            output: Some(output.clone()),
            start: None,
            steps,
        })
        .unwrap();
        serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap()
    }

    fn total_outflow(report: &serde_json::Value) -> f64 {
        report["steps"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["outflow"].as_f64().unwrap())
            .sum()
    }

    #[test]
    fn depth_unit_does_not_change_volumes() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("basin.toml"), TOPOLOGY).unwrap();
        let mm = run_config(dir.path(), "mm.toml", "mm", 65.4, 0.25);
        let m = run_config(dir.path(), "m.toml", "m", 0.0654, 0.00025);

        let in_mm = run_to_json(mm, dir.path().join("mm.json"), None);
        let in_m = run_to_json(m, dir.path().join("m.json"), None);

        assert_eq!(in_mm["units"], "m3");
        assert_eq!(in_mm["steps"].as_array().unwrap().len(), 10);
        let total = total_outflow(&in_mm);
        assert!(total > 0.0);
        assert_relative_eq!(total_outflow(&in_m), total, max_relative = 1e-9);
    }

    #[test]
    fn steps_flag_overrides_config() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("basin.toml"), TOPOLOGY).unwrap();
        let config = run_config(dir.path(), "run.toml", "mm", 6.54, 0.25);

        let report = run_to_json(config, dir.path().join("out.json"), Some(3));
        let steps = report["steps"].as_array().unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[2]["date"], "2024-01-03");
        assert_eq!(report["sink"], "outlet");
    }

    #[test]
    fn report_serializes_dates_as_strings() {
        let record = StepRecord {
            date: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
            precip: 1.0,
            et: 0.5,
            outflow: 2.0,
            junctions: BTreeMap::from([("J1".to_string(), 2.0)]),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["date"], "2024-05-17");
        assert_eq!(json["junctions"]["J1"], 2.0);
    }
}
