//! Offline checker for brewmaster tier configuration
//!
//! Prints both ladders and every skipped line, and can dry-run an upgrade
//! path on a synthetic potion with unlimited catalyst.

use std::path::PathBuf;

use brewmaster_core::brewing::{self, Axis, SlotOutcome, TierTable};
use brewmaster_core::commands::master_potion;
use brewmaster_core::config::read_config;
use brewmaster_core::{EffectKind, ItemStack};
use brewmaster_types::formatting::{format_amplifier, format_remaining};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Validate brewmaster tier configuration")]
struct Cli {
    /// Engine config file (TOML)
    #[arg(short, long)]
    config: PathBuf,

    /// Effect to dry-run an upgrade path on (e.g. `speed`, `fly`)
    #[arg(short, long)]
    simulate: Option<String>,

    /// Upgrade steps in order, e.g. `--path d,d,p`
    #[arg(short, long, value_delimiter = ',', requires = "simulate")]
    path: Vec<Step>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Step {
    #[value(name = "d", alias = "duration")]
    Duration,
    #[value(name = "p", alias = "power")]
    Power,
}

impl From<Step> for Axis {
    fn from(step: Step) -> Self {
        match step {
            Step::Duration => Axis::Duration,
            Step::Power => Axis::Power,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    // If BREWMASTER_LOG_PATH is set, append to that file
    if let Ok(path) = std::env::var("BREWMASTER_LOG_PATH") {
        if let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(file)
                .init();
            return;
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let config = match read_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Cannot read config");
            std::process::exit(1);
        }
    };

    let tiers = TierTable::parse(&config.duration_tiers, &config.power_tiers);
    print_tiers(&tiers);

    if let Some(effect) = &cli.simulate {
        simulate(&tiers, effect, &cli.path);
    }
}

fn print_tiers(tiers: &TierTable) {
    println!("Duration tiers (max {}):", tiers.max_duration_level());
    for tier in tiers.duration_tiers() {
        println!(
            "  {:>3}  cost {:>4}  {}",
            tier.level,
            tier.catalyst_cost,
            format_remaining(tier.duration_secs)
        );
    }

    println!("Power tiers (max {}):", tiers.max_power_level());
    for tier in tiers.power_tiers() {
        println!(
            "  {:>3}  cost {:>4}  amplifier {}",
            tier.level,
            tier.catalyst_cost,
            format_amplifier(tier.level)
        );
    }

    if tiers.skipped().is_empty() {
        println!("No skipped lines.");
    } else {
        println!("Skipped {} line(s):", tiers.skipped().len());
        for skipped in tiers.skipped() {
            println!("  [{}] {:?}: {}", skipped.axis, skipped.line, skipped.error);
        }
    }
}

fn simulate(tiers: &TierTable, effect: &str, path: &[Step]) {
    let Some(kind) = EffectKind::parse(effect) else {
        println!("Unknown effect {effect:?}; nothing to simulate.");
        return;
    };

    // flight has no vanilla potion, start it from a bare master item
    let mut item = match kind {
        EffectKind::Flight => match master_potion(tiers, kind, 0, 0) {
            Ok(item) => item,
            Err(e) => {
                println!("Cannot build a flight potion: {e}");
                return;
            }
        },
        EffectKind::Standard(id) => ItemStack::potion(id),
    };

    println!("Simulating {} ({} steps):", kind.display_name(), path.len());
    for (idx, step) in path.iter().enumerate() {
        let axis = Axis::from(*step);
        let label = axis.to_string();
        let mut available = u32::MAX;
        let outcome = brewing::upgrade_item(tiers, &mut item, axis, &mut available);

        match outcome {
            SlotOutcome::Upgraded { level, cost, .. } => {
                let state = brewing::decode(&item).unwrap_or_default();
                println!(
                    "  {:>2}. {label:<8} -> level {level} (cost {cost}), duration {}, power {}",
                    idx + 1,
                    state
                        .duration_secs
                        .map(format_remaining)
                        .unwrap_or_else(|| "-".to_string()),
                    state.power_level
                );
            }
            other => println!("  {:>2}. {label:<8} -> no change: {other:?}", idx + 1),
        }
    }

    if let Some(name) = &item.meta.display_name {
        println!("Result: {name}");
        for line in &item.meta.lore {
            println!("  {line}");
        }
    }
}
