#![deny(unsafe_code)]
//! Evolution engine demo binary.
//!
//! Mounts several simulated sessions against one shared context and walks
//! them through a number of evaluation ticks:
//! 1. events are generated per visitor persona
//! 2. each session is classified and scored
//! 3. the controller applies, keeps or rolls back layout mutations
//! 4. analytics are summarised (and optionally flushed)
//!
//! Time is simulated with a manual clock, so the run is instant and
//! reproducible for a given `--seed`.

mod workload;

use anyhow::Context;
use clap::Parser;
use evolution_analytics::EventKind;
use evolution_engine::{EngineConfig, EngineContext, EvolutionEngine, TickOutcome};
use evolution_mutation::{ImmediateStyleScheduler, InMemoryStyleTarget, StyleVar};
use evolution_types::ManualClock;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workload::{tick_activity, Persona};

/// Evolution engine demo CLI
#[derive(Parser)]
#[command(name = "evolution-demo")]
#[command(about = "Simulated walkthrough of the evolution engine", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "EVOLUTION_CONFIG")]
    config: Option<String>,

    /// Number of simulated sessions
    #[arg(long, default_value_t = 4)]
    sessions: usize,

    /// Evaluation ticks per session
    #[arg(long, default_value_t = 8)]
    ticks: usize,

    /// Workload seed
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Analytics endpoint to flush to at the end
    #[arg(long, env = "EVOLUTION_ANALYTICS_ENDPOINT")]
    analytics_endpoint: Option<String>,

    /// Log level
    #[arg(long, env = "EVOLUTION_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "EVOLUTION_LOG_JSON")]
    json: bool,
}

const BANNER: &str = r#"
 ╔══════════════════════════════════════════════════════════════╗
 ║          Evolution Intelligence Engine  --  Demo             ║
 ║                                                              ║
 ║   Behavior clustering, guarded layout mutations and          ║
 ║   reward-driven rollback over simulated sessions.            ║
 ╚══════════════════════════════════════════════════════════════╝
"#;

fn section(title: &str) {
    let width: usize = 60;
    let pad = width.saturating_sub(title.len() + 4);
    let left = pad / 2;
    let right = pad - left;
    println!();
    println!(" ┌{}┐", "─".repeat(width));
    println!(" │{}  {}  {}│", " ".repeat(left), title, " ".repeat(right));
    println!(" └{}┘", "─".repeat(width));
}

fn ok(msg: &str) {
    println!("   [OK]  {}", msg);
}

fn info(msg: &str) {
    println!("   [--]  {}", msg);
}

fn warn(msg: &str) {
    println!("   [!!]  {}", msg);
}

struct Visitor {
    persona: Persona,
    engine: EvolutionEngine,
    styles: Arc<InMemoryStyleTarget>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());

    if cli.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    }

    println!("{}", BANNER);

    if let Err(e) = run_demo(cli).await {
        eprintln!();
        eprintln!("   [FATAL]  Demo failed: {:#}", e);
        std::process::exit(1);
    }

    println!();
    println!(" ════════════════════════════════════════════════════════════════");
    println!("  Demo complete.");
    println!(" ════════════════════════════════════════════════════════════════");
    println!();
}

async fn run_demo(cli: Cli) -> anyhow::Result<()> {
    section("Configuration");

    let mut config =
        EngineConfig::load(cli.config.as_deref()).context("loading engine configuration")?;
    if cli.analytics_endpoint.is_some() {
        config.analytics.endpoint = cli.analytics_endpoint.clone();
    }
    info(&format!(
        "interval={}ms  cooldown={}ms  cap={}  floor={:.2}  min_samples={}",
        config.evaluation.interval_ms,
        config.controller.mutation_cooldown_ms,
        config.controller.max_mutations_per_session,
        config.controller.stability_floor,
        config.controller.min_samples_before_decision,
    ));

    tracing::debug!(
        sessions = cli.sessions,
        ticks = cli.ticks,
        seed = cli.seed,
        "Starting simulated run"
    );

    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let ctx = EngineContext::with_clock(clock.clone());

    section("Mounting sessions");

    let visitors: Vec<Visitor> = (0..cli.sessions)
        .map(|i| {
            let styles = Arc::new(InMemoryStyleTarget::new());
            let engine = EvolutionEngine::mount(
                ctx.clone(),
                config.clone(),
                Arc::new(ImmediateStyleScheduler::new(styles.clone())),
            );
            Visitor {
                persona: Persona::for_index(i),
                engine,
                styles,
            }
        })
        .collect();

    for v in &visitors {
        ok(&format!("{:<8} session={}", v.persona, v.engine.session_id()));
    }

    section("Evaluation");

    let mut rng = StdRng::seed_from_u64(cli.seed);
    for tick in 0..cli.ticks {
        for v in &visitors {
            let activity = tick_activity(v.persona, tick, &mut rng);
            for _ in 0..activity.impressions {
                v.engine.track_impression();
            }
            for event in activity.events {
                ctx.sessions.ingest_event(v.engine.session_id(), event);
            }
        }

        clock.advance(config.evaluation.interval_ms);

        for v in &visitors {
            match v.engine.evaluate() {
                TickOutcome::NotReady => info(&format!("t{} {:<8} no metrics yet", tick, v.persona)),
                TickOutcome::Evaluated(report) => {
                    let snap = &report.snapshot;
                    let active = snap
                        .active_mutation
                        .as_ref()
                        .map(|m| m.id.as_str())
                        .unwrap_or("-");
                    let line = format!(
                        "t{} {:<8} cluster={:<16} reward={:.3} stability={:.2} active={}",
                        tick, v.persona, snap.cluster.as_str(), snap.reward_score, snap.stability_score, active
                    );
                    if snap.performance_safe {
                        info(&line);
                    } else {
                        warn(&line);
                    }
                    if let Some(applied) = report.attempt.applied() {
                        ok(&format!("   applied {} ({})", applied.id, applied.label));
                    }
                    if let Some((id, status)) = report.feed.decision() {
                        ok(&format!("   {} -> {}", id, status));
                    }
                }
            }
        }
    }

    section("Final styles");

    for v in &visitors {
        let changed: Vec<String> = StyleVar::ALL
            .into_iter()
            .filter_map(|var| {
                let value = v.styles.value_of(var)?;
                (value != var.baseline()).then(|| format!("{}={}", var.name(), value))
            })
            .collect();
        if changed.is_empty() {
            info(&format!("{:<8} baseline", v.persona));
        } else {
            info(&format!("{:<8} {}", v.persona, changed.join("  ")));
        }
    }

    section("Analytics");

    let analytics = &ctx.analytics;
    info(&format!("events recorded: {}", analytics.len()));
    for stats in analytics.cluster_stats() {
        info(&format!(
            "{:<16} sessions={}  avg_reward={:.3}",
            stats.cluster.as_str(), stats.sessions, stats.avg_reward
        ));
    }
    info(&format!(
        "applied={}  reinforced={}  rolled_back={}",
        analytics.events(Some(EventKind::MutationApplied)).len(),
        analytics.events(Some(EventKind::MutationReinforced)).len(),
        analytics.events(Some(EventKind::MutationRolledBack)).len(),
    ));
    let trend: Vec<String> = analytics
        .reward_trend(10)
        .iter()
        .map(|r| format!("{:.2}", r))
        .collect();
    info(&format!("reward trend: [{}]", trend.join(", ")));
    info(&format!("ui health: {:.2}", analytics.ui_health_score()));

    if let Some(first) = visitors.first() {
        if let Some(endpoint) = first.engine.config().analytics.endpoint.as_deref() {
            info(&format!("flushing to {}", endpoint));
            first.engine.flush_analytics().await;
            ok("flush finished (delivery is best-effort)");
        }
    }

    Ok(())
}
