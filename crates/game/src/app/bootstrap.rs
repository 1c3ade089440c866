use std::env;
use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use super::loop_runner::LoopConfig;
use super::scenario::{load_scenario, parse_scenario, Scenario, DEFAULT_SCENARIO};
use super::AppError;

pub(crate) const LAYOUT_ENV_VAR: &str = "CREWSHIP_LAYOUT";
pub(crate) const TICKS_ENV_VAR: &str = "CREWSHIP_TICKS";
pub(crate) const REALTIME_ENV_VAR: &str = "CREWSHIP_REALTIME";
const DEFAULT_TICKS: u64 = 600;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scenario: Scenario,
}

pub(crate) fn build_app() -> Result<AppWiring, AppError> {
    init_tracing();
    info!("=== Crewship Startup ===");

    let scenario = match env::var_os(LAYOUT_ENV_VAR) {
        Some(raw) => {
            let path = PathBuf::from(raw);
            info!(path = %path.display(), "scenario_file");
            load_scenario(&path)?
        }
        None => parse_scenario(DEFAULT_SCENARIO, "builtin")?,
    };
    let config = LoopConfig {
        total_ticks: parse_ticks(env::var(TICKS_ENV_VAR).ok().as_deref())?,
        realtime: parse_flag(REALTIME_ENV_VAR, env::var(REALTIME_ENV_VAR).ok().as_deref())?,
        ..LoopConfig::default()
    };

    Ok(AppWiring { config, scenario })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_ticks(raw: Option<&str>) -> Result<u64, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(DEFAULT_TICKS);
    };
    raw.parse::<u64>().map_err(|_| AppError::InvalidEnv {
        var: TICKS_ENV_VAR,
        value: raw.to_string(),
        reason: "expected a non-negative integer",
    })
}

fn parse_flag(var: &'static str, raw: Option<&str>) -> Result<bool, AppError> {
    match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("0") | Some("false") | Some("no") => Ok(false),
        Some("1") | Some("true") | Some("yes") => Ok(true),
        Some(other) => Err(AppError::InvalidEnv {
            var,
            value: other.to_string(),
            reason: "expected 1/0, true/false or yes/no",
        }),
    }
}
