use doom_watch::{
    config::{ScoringSettings, Settings},
    models::Snapshot,
    services::RiskEngine,
    utils::init_tracing,
};

use serde_json::{json, Value};
use std::io::Read;
use tracing::{debug, info};

/// Score a snapshot JSON document against the fixed reference statistics.
async fn score_document(
    raw: &str,
    settings: &ScoringSettings,
) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot: Snapshot = serde_json::from_str(raw)?;

    // Not recorded: a fresh history would hold only this snapshot
    let engine = RiskEngine::from_settings(settings);
    let risk = engine.score(&snapshot, false).await?;
    info!("Snapshot scored {:.3}", risk.score);

    let (score, scenarios) = risk.into_parts();
    Ok(json!({ "score": score, "scenarios": scenarios }))
}

/// Scores one snapshot and prints `{"score": .., "scenarios": [..]}`.
///
/// Usage: `score_snapshot [snapshot.json]`. Reads stdin when no path is given.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let settings = Settings::new()?;
    init_tracing(&settings.logging);

    let raw = match std::env::args().nth(1) {
        Some(path) => {
            debug!("Reading snapshot from {}", path);
            std::fs::read_to_string(path)?
        }
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    println!("{}", score_document(&raw, &settings.scoring).await?);
    Ok(())
}
