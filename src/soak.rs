//! Seeded random exerciser over a scenario roster.
//!
//! Applies a reproducible stream of panel operations (toggles, brightness
//! changes, removals, re-admissions) against the scenario's room and
//! roster, journaling each one. Deterministic for a fixed seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{ConfigError, ScenarioConfig};
use crate::journal::JournalRow;
use crate::runner::{ScenarioResult, admit_roster, build_appliance, build_room, summarize};
use crate::source::PowerSource;

/// Exerciser parameters.
#[derive(Debug, Clone, Copy)]
pub struct SoakConfig {
    /// Number of random operations to apply after roster admission.
    pub steps: usize,
    /// Random seed.
    pub seed: u64,
}

impl Default for SoakConfig {
    fn default() -> Self {
        Self { steps: 200, seed: 42 }
    }
}

/// Runs a random operation stream against the scenario's room.
///
/// The scenario's `actions` list is ignored; only the room and roster are
/// used. Targets are drawn uniformly from the roster serials. Brightness
/// levels are drawn from `0..=110`, so out-of-range soft rejections get
/// exercised too.
///
/// # Errors
///
/// Returns the first `ConfigError` reported by
/// [`ScenarioConfig::validate`], or an error surfaced while building the
/// room or an appliance.
pub fn run_soak(scenario: &ScenarioConfig, soak: &SoakConfig) -> Result<ScenarioResult, ConfigError> {
    if let Some(error) = scenario.validate().into_iter().next() {
        return Err(error);
    }

    let mut room = build_room(scenario)?;
    let mut journal = Vec::with_capacity(scenario.appliances.len() + soak.steps);
    admit_roster(&mut room, scenario, &mut journal)?;

    if scenario.appliances.is_empty() {
        let summary = summarize(&journal, &room);
        return Ok(ScenarioResult { journal, summary });
    }

    let mut rng = StdRng::seed_from_u64(soak.seed);
    for _ in 0..soak.steps {
        let app_cfg = &scenario.appliances[rng.random_range(0..scenario.appliances.len())];
        let serial = app_cfg.serial.as_str();
        let roll: u32 = rng.random_range(0..100);

        let (op, accepted) = match roll {
            0..=39 => ("turn_on", room.turn_on(serial)),
            40..=74 => ("turn_off", room.turn_off(serial)),
            75..=84 => {
                let level: u8 = rng.random_range(0..=110);
                ("set_brightness", room.set_brightness(serial, level))
            }
            85..=92 => ("remove", room.remove_appliance(serial).is_some()),
            _ => ("add", room.add_appliance(&build_appliance(app_cfg)?)),
        };

        journal.push(JournalRow {
            seq: journal.len(),
            op: op.to_string(),
            serial: serial.to_string(),
            accepted,
            total_kw: room.current_consumption_kw(),
            plugged: room.appliance_count(),
            tripped: room.is_tripped(),
        });
    }

    let summary = summarize(&journal, &room);
    Ok(ScenarioResult { journal, summary })
}
