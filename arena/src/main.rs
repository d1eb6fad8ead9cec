//! Kitten Arena runner
//!
//! Loads configuration, wires the services to the in-memory store, loads an
//! optional seed file and resolves every pending battle in it. Prints a JSON
//! summary of the outcome to stdout.

use anyhow::Context;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kitten_arena::adapters::{MemoryDb, SeedData};
use kitten_arena::app::BattleQuery;
use kitten_arena::config::Config;
use kitten_arena::domain::entities::{BattleOutcome, Kitten};
use kitten_arena::error::AppError;
use kitten_arena::AppState;

#[derive(Serialize)]
struct RunSummary {
    resolved: Vec<BattleOutcome>,
    failed: usize,
    kittens: Vec<Kitten>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,kitten_arena=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Kitten Arena...");

    let config = Config::from_env().context("invalid configuration")?;
    tracing::info!(
        level_curve = %config.level_curve,
        skill_points_per_level = config.skill_points_per_level.get(),
        orphan_policy = %config.ability_orphan_policy,
        "Configuration loaded"
    );

    let db = MemoryDb::new();
    if let Some(path) = &config.seed_file {
        let seed = SeedData::from_path(path)
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        db.load_seed(seed).await.context("seed data rejected")?;
    } else {
        tracing::info!("No ARENA_SEED_FILE set, starting with an empty store");
    }

    let state = AppState::build(config, db);

    let battles = state.battle_service.find_all(BattleQuery::default()).await?;
    let mut resolved = Vec::new();
    let mut failed = 0;
    for battle in battles.iter().filter(|b| !b.is_resolved()) {
        match state
            .battle_service
            .resolve(&battle.id, &battle.created_by_user_id)
            .await
        {
            Ok(outcome) => resolved.push(outcome),
            Err(AppError::Domain(e)) if e.is_not_found() => {
                failed += 1;
                tracing::warn!(
                    battle_id = %battle.id,
                    error = %e,
                    "Battle references missing data"
                );
            }
            Err(e) => {
                failed += 1;
                tracing::error!(battle_id = %battle.id, error = %e, "Battle resolution failed");
            }
        }
    }

    let mut kittens: Vec<Kitten> = state.db.read().await.kittens.values().cloned().collect();
    kittens.sort_by(|a, b| b.level.cmp(&a.level).then(a.name.cmp(&b.name)));

    let summary = RunSummary {
        resolved,
        failed,
        kittens,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    tracing::info!(
        resolved = summary.resolved.len(),
        failed = summary.failed,
        "Run complete"
    );
    Ok(())
}
