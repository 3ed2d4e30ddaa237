//! Scenario runner: builds a room from configuration, admits the roster,
//! and applies the action list, journaling every operation.

use crate::appliances::{Appliance, ApplianceKind};
use crate::config::{ActionConfig, ApplianceConfig, ConfigError, ScenarioConfig};
use crate::journal::JournalRow;
use crate::room::Room;
use crate::source::PowerSource;

/// Aggregate figures for a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSummary {
    /// Highest total draw observed after any operation (kW).
    pub peak_kw: f32,
    /// Operations that took effect.
    pub ops_applied: usize,
    /// Operations soft-rejected by admission control.
    pub ops_rejected: usize,
    /// Whether the breaker tripped during the run.
    pub tripped: bool,
    /// Appliances still plugged in at the end.
    pub appliances_left: usize,
}

/// Journal and summary of a finished run.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub journal: Vec<JournalRow>,
    pub summary: ScenarioSummary,
}

/// Builds the room described by the scenario, with its kind policy applied.
///
/// # Errors
///
/// Returns a `ConfigError` if the room parameters are invalid.
pub fn build_room(config: &ScenarioConfig) -> Result<Room, ConfigError> {
    let mut room = Room::new(&config.room.name, config.room.sockets, config.room.max_kw)
        .map_err(|e| ConfigError {
            field: "room.max_kw".to_string(),
            message: e.to_string(),
        })?;
    for name in &config.room.forbidden {
        if let Some(kind) = ApplianceKind::from_name(name) {
            room.add_forbidden(kind);
        }
    }
    Ok(room)
}

/// Builds one roster appliance.
///
/// # Errors
///
/// Returns a `ConfigError` if the kind is unknown or the appliance
/// parameters fail construction validation.
pub fn build_appliance(config: &ApplianceConfig) -> Result<Appliance, ConfigError> {
    let kind = ApplianceKind::from_name(&config.kind).ok_or_else(|| ConfigError {
        field: "appliances.kind".to_string(),
        message: format!("unknown kind \"{}\"", config.kind),
    })?;
    let built = match kind {
        ApplianceKind::Heater => Appliance::heater(
            &config.brand,
            &config.model,
            &config.serial,
            config.rated_kw,
        ),
        ApplianceKind::Tv => Appliance::tv(
            &config.brand,
            &config.model,
            &config.serial,
            config.rated_kw,
            config.brightness,
        ),
        ApplianceKind::Fridge => Appliance::fridge(
            &config.brand,
            &config.model,
            &config.serial,
            config.rated_kw,
            config.compressors,
        ),
    };
    built.map_err(|e| ConfigError {
        field: format!("appliances (serial \"{}\")", config.serial),
        message: e.to_string(),
    })
}

fn record(journal: &mut Vec<JournalRow>, op: &str, target: &str, accepted: bool, room: &Room) {
    journal.push(JournalRow {
        seq: journal.len(),
        op: op.to_string(),
        serial: target.to_string(),
        accepted,
        total_kw: room.current_consumption_kw(),
        plugged: room.appliance_count(),
        tripped: room.is_tripped(),
    });
}

/// Admits every roster appliance, journaling each admission.
pub(crate) fn admit_roster(
    room: &mut Room,
    config: &ScenarioConfig,
    journal: &mut Vec<JournalRow>,
) -> Result<(), ConfigError> {
    for app_cfg in &config.appliances {
        let appliance = build_appliance(app_cfg)?;
        let accepted = room.add_appliance(&appliance);
        record(journal, "add", &app_cfg.serial, accepted, room);
    }
    Ok(())
}

fn apply_action(
    room: &mut Room,
    config: &ScenarioConfig,
    action: &ActionConfig,
    journal: &mut Vec<JournalRow>,
) -> Result<(), ConfigError> {
    match action.op.as_str() {
        "turn_on" => {
            let accepted = room.turn_on(&action.serial);
            record(journal, "turn_on", &action.serial, accepted, room);
        }
        "turn_off" => {
            let accepted = room.turn_off(&action.serial);
            record(journal, "turn_off", &action.serial, accepted, room);
        }
        "set_brightness" => {
            let accepted = room.set_brightness(&action.serial, action.level);
            record(journal, "set_brightness", &action.serial, accepted, room);
        }
        "remove" => {
            let accepted = room.remove_appliance(&action.serial).is_some();
            record(journal, "remove", &action.serial, accepted, room);
        }
        "add" => {
            // Re-admit from the roster, e.g. after a remove.
            let roster = config.appliances.iter().find(|a| a.serial == action.serial);
            let accepted = match roster {
                Some(app_cfg) => room.add_appliance(&build_appliance(app_cfg)?),
                None => false,
            };
            record(journal, "add", &action.serial, accepted, room);
        }
        "forbid" => {
            if let Some(kind) = ApplianceKind::from_name(&action.kind) {
                room.add_forbidden(kind);
            }
            record(journal, "forbid", &action.kind, true, room);
        }
        "allow" => {
            if let Some(kind) = ApplianceKind::from_name(&action.kind) {
                room.clear_forbidden(kind);
            }
            record(journal, "allow", &action.kind, true, room);
        }
        other => {
            return Err(ConfigError {
                field: "actions.op".to_string(),
                message: format!("unknown op \"{other}\""),
            });
        }
    }
    Ok(())
}

/// Reduces a finished run to its summary figures.
pub(crate) fn summarize(journal: &[JournalRow], room: &Room) -> ScenarioSummary {
    let peak_kw = journal.iter().map(|r| r.total_kw).fold(0.0, f32::max);
    let ops_applied = journal.iter().filter(|r| r.accepted).count();
    ScenarioSummary {
        peak_kw,
        ops_applied,
        ops_rejected: journal.len() - ops_applied,
        tripped: room.is_tripped(),
        appliances_left: room.appliance_count(),
    }
}

/// Runs a scenario end to end: validate, build the room, admit the roster,
/// apply every action in order.
///
/// # Errors
///
/// Returns the first `ConfigError` reported by
/// [`ScenarioConfig::validate`], or an error surfaced while building the
/// room or an appliance.
pub fn run_scenario(config: &ScenarioConfig) -> Result<ScenarioResult, ConfigError> {
    if let Some(error) = config.validate().into_iter().next() {
        return Err(error);
    }

    let mut room = build_room(config)?;
    let mut journal = Vec::with_capacity(config.appliances.len() + config.actions.len());

    admit_roster(&mut room, config, &mut journal)?;
    for action in &config.actions {
        apply_action(&mut room, config, action, &mut journal)?;
    }

    let summary = summarize(&journal, &room);
    Ok(ScenarioResult { journal, summary })
}
