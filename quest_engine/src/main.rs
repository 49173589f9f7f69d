//! Scenario harness.
//!
//! Loads scenario fixtures, replays each through a fresh tracker and
//! compares score, level and canonical hash with the pinned values.
//! Exits non-zero if any scenario fails.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use quest_engine::hashing::tracker_hash;
use quest_engine::scenario::{load_scenarios, Scenario};

const FIXTURE_PATHS: [&str; 3] = [
    "scenarios.json",
    "tests/golden/scenarios.json",
    "quest_engine/tests/golden/scenarios.json",
];

fn check(scenario: &Scenario) -> Result<(), String> {
    let tracker = scenario.run().map_err(|e| e.to_string())?;

    if tracker.total_score() != scenario.expected_score {
        return Err(format!(
            "score {} != expected {}",
            tracker.total_score(),
            scenario.expected_score
        ));
    }
    if let Some(level) = scenario.expected_level {
        if tracker.level() != level {
            return Err(format!("level {} != expected {}", tracker.level(), level));
        }
    }
    if let Some(expected) = &scenario.expected_hash {
        let hash = tracker_hash(&tracker);
        if &hash != expected {
            return Err(format!("hash {} != expected {}", hash, expected));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("quest_engine=info")),
        )
        .init();

    let explicit = std::env::args().nth(1);
    let path = match explicit
        .as_deref()
        .or_else(|| FIXTURE_PATHS.into_iter().find(|p| Path::new(p).exists()))
    {
        Some(p) => p.to_string(),
        None => {
            error!("no scenario fixtures found; pass a path to scenarios.json");
            return ExitCode::FAILURE;
        }
    };

    let scenarios = match fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|data| load_scenarios(&data).map_err(|e| e.to_string()))
    {
        Ok(s) => s,
        Err(e) => {
            error!("failed to load {}: {}", path, e);
            return ExitCode::FAILURE;
        }
    };
    info!("loaded {} scenarios from {}", scenarios.len(), path);

    let mut passed = 0;
    for scenario in &scenarios {
        match check(scenario) {
            Ok(()) => {
                passed += 1;
                println!("PASS {}", scenario.name);
            }
            Err(reason) => println!("FAIL {}: {}", scenario.name, reason),
        }
    }

    println!("\n{}/{} scenarios passed", passed, scenarios.len());
    if passed == scenarios.len() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
