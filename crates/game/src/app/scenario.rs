use std::fs;
use std::path::Path;

use crewship_engine::{Action, ActionSet, WorldLayout};
use serde::Deserialize;

use super::AppError;

pub(crate) const DEFAULT_SCENARIO: &str = include_str!("../../assets/default_scenario.json");

/// A world layout plus the scripted player input that drives a headless run.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    pub(crate) layout: WorldLayout,
    #[serde(default)]
    pub(crate) script: Vec<ScriptStep>,
}

/// Actions held for ticks `from_tick..to_tick`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ScriptStep {
    pub(crate) from_tick: u64,
    pub(crate) to_tick: u64,
    pub(crate) actions: Vec<Action>,
}

impl Scenario {
    /// Player intent for the tick about to run. Overlapping steps combine.
    pub(crate) fn intent_at(&self, tick: u64) -> ActionSet {
        self.script
            .iter()
            .filter(|step| (step.from_tick..step.to_tick).contains(&tick))
            .flat_map(|step| step.actions.iter().copied())
            .collect()
    }

    pub(crate) fn last_scripted_tick(&self) -> u64 {
        self.script.iter().map(|step| step.to_tick).max().unwrap_or(0)
    }
}

pub(crate) fn load_scenario(path: &Path) -> Result<Scenario, AppError> {
    let raw = fs::read_to_string(path).map_err(|source| AppError::ReadScenario {
        path: path.to_path_buf(),
        source,
    })?;
    parse_scenario(&raw, &path.display().to_string())
}

pub(crate) fn parse_scenario(raw: &str, origin: &str) -> Result<Scenario, AppError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let scenario: Scenario =
        serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
            let json_path = error.path().to_string();
            AppError::ParseScenario {
                origin: origin.to_string(),
                json_path,
                message: error.into_inner().to_string(),
            }
        })?;
    for (index, step) in scenario.script.iter().enumerate() {
        if step.from_tick >= step.to_tick {
            return Err(AppError::EmptyScriptStep {
                index,
                from_tick: step.from_tick,
                to_tick: step.to_tick,
            });
        }
        let held: ActionSet = step.actions.iter().copied().collect();
        if held.has_conflicting_tiers() {
            return Err(AppError::ConflictingScriptStep { index });
        }
    }
    Ok(scenario)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_scenario_parses() {
        let scenario = parse_scenario(DEFAULT_SCENARIO, "builtin").expect("default scenario");
        assert_eq!(scenario.layout.rooms.len(), 3);
        assert!(!scenario.script.is_empty());
        assert!(scenario.last_scripted_tick() > 0);
    }

    #[test]
    fn intent_combines_overlapping_steps() {
        let scenario = parse_scenario(
            r#"{
                "layout": { "rooms": ["bridge"] },
                "script": [
                    { "from_tick": 0, "to_tick": 10, "actions": ["right"] },
                    { "from_tick": 5, "to_tick": 6, "actions": ["jump", "act"] }
                ]
            }"#,
            "inline",
        )
        .expect("scenario");
        let at_five = scenario.intent_at(5);
        assert!(at_five.contains(Action::Right));
        assert!(at_five.contains(Action::Jump));
        assert!(at_five.contains(Action::Act));
        assert!(!scenario.intent_at(6).contains(Action::Jump));
        assert!(scenario.intent_at(10).is_empty());
    }

    #[test]
    fn parse_error_reports_json_path() {
        let err = parse_scenario(
            r#"{ "layout": { "rooms": ["bridge"], "crew": [ { "kind": "pilot", "x": 1.0 } ] } }"#,
            "inline",
        )
        .expect_err("unknown crew kind");
        let message = err.to_string();
        assert!(message.contains("layout.crew[0].kind"), "message: {message}");
    }

    #[test]
    fn empty_script_range_is_rejected() {
        let err = parse_scenario(
            r#"{ "layout": { "rooms": ["bridge"] },
                 "script": [ { "from_tick": 4, "to_tick": 4, "actions": [] } ] }"#,
            "inline",
        )
        .expect_err("empty range");
        assert!(matches!(err, AppError::EmptyScriptStep { index: 0, .. }));
    }

    #[test]
    fn step_holding_both_left_tiers_is_rejected() {
        let err = parse_scenario(
            r#"{ "layout": { "rooms": ["bridge"] },
                 "script": [
                     { "from_tick": 0, "to_tick": 2, "actions": ["right"] },
                     { "from_tick": 2, "to_tick": 4, "actions": ["left", "slow_left"] }
                 ] }"#,
            "inline",
        )
        .expect_err("conflicting tiers");
        assert!(matches!(err, AppError::ConflictingScriptStep { index: 1 }));
    }

    #[test]
    fn loads_scenario_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(DEFAULT_SCENARIO.as_bytes()).expect("write");
        let scenario = load_scenario(file.path()).expect("load");
        assert_eq!(scenario.layout.furniture.len(), 3);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = load_scenario(&dir.path().join("absent.json")).expect_err("missing");
        assert!(matches!(err, AppError::ReadScenario { .. }));
    }
}
