#![deny(warnings)]

//! Headless CLI: generate a tabletop exercise, print period KPIs and an
//! after-action summary, optionally dump JSON or a persona's prompt context.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;
use ttx_core::{PersonaLocation, ScenarioConfig, ScenarioResults, SimConfig};
use ttx_runtime::{PlanProvider, ScenarioStore, StaticPlan};

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    plan: Option<PathBuf>,
    adk: Option<PathBuf>,
    seed: Option<u64>,
    out: Option<PathBuf>,
    persona: Option<String>,
    period: Option<u32>,
    version: bool,
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => args.config = it.next().map(PathBuf::from),
            "--plan" => args.plan = it.next().map(PathBuf::from),
            "--adk" => args.adk = it.next().map(PathBuf::from),
            "--seed" => args.seed = it.next().and_then(|s| s.parse().ok()),
            "--out" => args.out = it.next().map(PathBuf::from),
            "--persona" => args.persona = it.next(),
            "--period" => args.period = it.next().and_then(|s| s.parse().ok()),
            "--version" => args.version = true,
            other => eprintln!("ignoring unknown argument {other}"),
        }
    }
    args
}

/// Layout of a `--config` YAML file.
#[derive(Debug, Deserialize)]
struct ExerciseFile {
    scenario: ScenarioConfig,
    #[serde(default)]
    sim: SimConfig,
}

fn default_scenario() -> ScenarioConfig {
    ScenarioConfig {
        scenario_type: "hurricane".into(),
        location: "Tampa Bay, FL".into(),
        severity: "major".into(),
        population: 2_700_000,
        agents: None,
        time: None,
    }
}

fn load_exercise(path: Option<&Path>) -> Result<(ScenarioConfig, SimConfig)> {
    let Some(path) = path else {
        return Ok((default_scenario(), SimConfig::default()));
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let file: ExerciseFile = serde_yaml::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok((file.scenario, file.sim))
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn print_report(r: &ScenarioResults) {
    let s = &r.ttx_script;
    println!(
        "{} | periods: {} | personas: {} | source: {:?} | status: {:?}",
        s.title, s.total_periods, s.persona_count, s.source, r.status
    );
    for p in &r.period_results {
        let loc = |k: PersonaLocation| p.aggregates.locations.get(&k).copied().unwrap_or_default();
        println!(
            "{} | injects: {} | actions: {} | home: {} | evacuating: {} | sheltered: {} | assist: {} | issues: {}",
            p.operational_period.label,
            p.injects.len(),
            p.eoc_actions.len(),
            loc(PersonaLocation::Home),
            loc(PersonaLocation::Evacuating),
            loc(PersonaLocation::Shelter) + loc(PersonaLocation::WithFamily),
            p.aggregates.needing_assistance,
            p.aggregates.critical_issues.len()
        );
    }
    let sum = ttx_runtime::summarize(r);
    println!(
        "AAR | peak evacuation: {} ({} on the road) | sheltered at end: {} | still home: {} | periods with issues: {:?} | mood at end: {}",
        sum.peak_evacuation_period
            .map(|p| format!("period {p}"))
            .unwrap_or_else(|| "none".into()),
        sum.peak_evacuating,
        sum.final_sheltered,
        sum.final_at_home,
        sum.periods_with_critical_issues,
        sum.dominant_final_sentiment
            .map(|s| s.as_str())
            .unwrap_or("n/a")
    );
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::DEBUG)
        .init();

    let args = parse_args();
    if args.version {
        println!("ttx {} ({})", env!("CARGO_PKG_VERSION"), env!("TTX_GIT_SHA"));
        return Ok(());
    }
    info!(?args, "starting CLI");
    if args.plan.is_some() && args.adk.is_some() {
        bail!("--plan and --adk are mutually exclusive");
    }

    let (scenario, mut sim) = load_exercise(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        sim.rng_seed = seed;
    }

    let results = match (&args.adk, &args.plan) {
        (Some(path), _) => ttx_adk::transform_adk_str(&read(path)?, &scenario, &sim)?,
        (None, Some(path)) => {
            let plan = StaticPlan::new(path.display().to_string(), read(path)?);
            ttx_runtime::generate_scenario(&scenario, &sim, Some(&plan as &dyn PlanProvider))?
        }
        (None, None) => ttx_runtime::generate_scenario(&scenario, &sim, None)?,
    };

    let mut store = ScenarioStore::new();
    store.subscribe(|r, rev| {
        info!(revision = rev, periods = r.period_results.len(), "scenario ready")
    });
    store.replace(results);
    let Some(results) = store.current() else {
        bail!("scenario store is empty after replace");
    };

    print_report(results);

    if let Some(out) = &args.out {
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(out, json).with_context(|| format!("writing {}", out.display()))?;
        info!(path = %out.display(), "results written");
    }

    if let Some(persona) = &args.persona {
        let period = args.period.unwrap_or(1);
        let knowledge = ttx_runtime::persona_knowledge(results, &sim, persona, period)?;
        println!();
        println!("{}", ttx_knowledge::format_knowledge_for_prompt(&knowledge));
    }

    Ok(())
}
