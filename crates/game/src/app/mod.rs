pub(crate) mod bootstrap;
pub(crate) mod loop_runner;
mod metrics;
mod scenario;
mod surface;

use std::path::PathBuf;

use crewship_engine::{LayoutError, SimError};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to read scenario '{path}': {source}")]
    ReadScenario {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scenario '{origin}'{}: {message}", at_path(.json_path))]
    ParseScenario {
        origin: String,
        json_path: String,
        message: String,
    },
    #[error("scenario script step {index} has an empty tick range {from_tick}..{to_tick}")]
    EmptyScriptStep {
        index: usize,
        from_tick: u64,
        to_tick: u64,
    },
    #[error("scenario script step {index} holds both speed tiers of one side")]
    ConflictingScriptStep { index: usize },
    #[error("environment variable {var} has invalid value '{value}': {reason}")]
    InvalidEnv {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Simulation(#[from] SimError),
}

fn at_path(json_path: &str) -> String {
    if json_path.is_empty() || json_path == "." {
        String::new()
    } else {
        format!(" at {json_path}")
    }
}
