//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::appliances::ApplianceKind;

/// Operation names accepted in `[[actions]]` tables.
pub const OPS: &[&str] = &[
    "turn_on",
    "turn_off",
    "set_brightness",
    "remove",
    "add",
    "forbid",
    "allow",
];

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the bedroom scenario. Load from TOML
/// with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::bedroom`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Room name, socket count, budget, and kind policy.
    #[serde(default)]
    pub room: RoomConfig,
    /// Appliance roster admitted before any action runs.
    #[serde(default)]
    pub appliances: Vec<ApplianceConfig>,
    /// Operations applied in order after admission.
    #[serde(default)]
    pub actions: Vec<ActionConfig>,
}

/// Room parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoomConfig {
    /// Room name (truncated for display).
    pub name: String,
    /// Socket count (admission capacity).
    pub sockets: usize,
    /// Power budget (kW, must be > 0).
    pub max_kw: f32,
    /// Kind names forbidden at admission: `"heater"`, `"tv"`, `"fridge"`.
    pub forbidden: Vec<String>,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            name: "Bedroom".to_string(),
            sockets: 5,
            max_kw: 2.1,
            forbidden: Vec::new(),
        }
    }
}

/// One roster appliance.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApplianceConfig {
    /// Kind name: `"heater"`, `"tv"`, or `"fridge"`.
    pub kind: String,
    /// Brand (must not be empty).
    pub brand: String,
    /// Model (must not be empty).
    pub model: String,
    /// Serial number (must not be empty, unique within the roster).
    pub serial: String,
    /// Rated power (kW, must be > 0).
    pub rated_kw: f32,
    /// Initial brightness for TVs (0..=100).
    pub brightness: u8,
    /// Compressor count for fridges (must be > 0).
    pub compressors: u32,
}

impl Default for ApplianceConfig {
    fn default() -> Self {
        Self {
            kind: "heater".to_string(),
            brand: "Generic".to_string(),
            model: "Generic".to_string(),
            serial: "SN-0".to_string(),
            rated_kw: 1.0,
            brightness: 100,
            compressors: 1,
        }
    }
}

/// One scripted operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActionConfig {
    /// Operation name, one of [`OPS`].
    pub op: String,
    /// Target serial (required for all ops except `forbid`/`allow`).
    pub serial: String,
    /// Brightness level for `set_brightness`.
    pub level: u8,
    /// Kind name for `forbid`/`allow`.
    pub kind: String,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            op: "turn_on".to_string(),
            serial: String::new(),
            level: 100,
            kind: String::new(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"room.max_kw"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the bedroom scenario: a 2.1 kW panel whose policy refuses
    /// the TV, leaving a single heater running.
    pub fn bedroom() -> Self {
        Self {
            room: RoomConfig {
                forbidden: vec!["fridge".to_string(), "tv".to_string()],
                ..RoomConfig::default()
            },
            appliances: vec![
                ApplianceConfig {
                    kind: "heater".to_string(),
                    brand: "Peshy".to_string(),
                    model: "Mega heat".to_string(),
                    serial: "P MH140-7765d".to_string(),
                    rated_kw: 2.0,
                    ..ApplianceConfig::default()
                },
                ApplianceConfig {
                    kind: "tv".to_string(),
                    brand: "Sony".to_string(),
                    model: "Mony".to_string(),
                    serial: "SN123".to_string(),
                    rated_kw: 0.25,
                    ..ApplianceConfig::default()
                },
            ],
            actions: vec![ActionConfig {
                op: "turn_on".to_string(),
                serial: "P MH140-7765d".to_string(),
                ..ActionConfig::default()
            }],
        }
    }

    /// Returns the overload preset: a brightness raise on a loaded panel
    /// that trips the breaker.
    pub fn overload() -> Self {
        Self {
            room: RoomConfig {
                name: "Guestroom".to_string(),
                ..RoomConfig::default()
            },
            appliances: vec![
                ApplianceConfig {
                    kind: "heater".to_string(),
                    brand: "Peshy".to_string(),
                    model: "Mega heat".to_string(),
                    serial: "H-1".to_string(),
                    rated_kw: 2.0,
                    ..ApplianceConfig::default()
                },
                ApplianceConfig {
                    kind: "tv".to_string(),
                    brand: "Sony".to_string(),
                    model: "Mony".to_string(),
                    serial: "TV-1".to_string(),
                    rated_kw: 0.25,
                    brightness: 20,
                    ..ApplianceConfig::default()
                },
            ],
            actions: vec![
                ActionConfig {
                    op: "turn_on".to_string(),
                    serial: "H-1".to_string(),
                    ..ActionConfig::default()
                },
                ActionConfig {
                    op: "turn_on".to_string(),
                    serial: "TV-1".to_string(),
                    ..ActionConfig::default()
                },
                ActionConfig {
                    op: "set_brightness".to_string(),
                    serial: "TV-1".to_string(),
                    level: 100,
                    ..ActionConfig::default()
                },
            ],
        }
    }

    /// Returns the open-house preset: a roomy 6 kW panel exercising all
    /// three kinds without tripping.
    pub fn open_house() -> Self {
        Self {
            room: RoomConfig {
                name: "Open house".to_string(),
                sockets: 8,
                max_kw: 6.0,
                forbidden: Vec::new(),
            },
            appliances: vec![
                ApplianceConfig {
                    kind: "heater".to_string(),
                    serial: "H-1".to_string(),
                    rated_kw: 2.0,
                    ..ApplianceConfig::default()
                },
                ApplianceConfig {
                    kind: "tv".to_string(),
                    serial: "TV-1".to_string(),
                    rated_kw: 0.25,
                    ..ApplianceConfig::default()
                },
                ApplianceConfig {
                    kind: "fridge".to_string(),
                    brand: "Arctic".to_string(),
                    model: "Chill".to_string(),
                    serial: "F-1".to_string(),
                    rated_kw: 0.4,
                    compressors: 3,
                    ..ApplianceConfig::default()
                },
            ],
            actions: vec![
                ActionConfig {
                    op: "turn_on".to_string(),
                    serial: "H-1".to_string(),
                    ..ActionConfig::default()
                },
                ActionConfig {
                    op: "turn_on".to_string(),
                    serial: "TV-1".to_string(),
                    ..ActionConfig::default()
                },
                ActionConfig {
                    op: "turn_on".to_string(),
                    serial: "F-1".to_string(),
                    ..ActionConfig::default()
                },
                ActionConfig {
                    op: "turn_off".to_string(),
                    serial: "TV-1".to_string(),
                    ..ActionConfig::default()
                },
                ActionConfig {
                    op: "remove".to_string(),
                    serial: "H-1".to_string(),
                    ..ActionConfig::default()
                },
            ],
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["bedroom", "overload", "open_house"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "bedroom" => Ok(Self::bedroom()),
            "overload" => Ok(Self::overload()),
            "open_house" => Ok(Self::open_house()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.room.max_kw <= 0.0 {
            errors.push(ConfigError {
                field: "room.max_kw".into(),
                message: "must be > 0".into(),
            });
        }
        for (i, name) in self.room.forbidden.iter().enumerate() {
            if ApplianceKind::from_name(name).is_none() {
                errors.push(ConfigError {
                    field: format!("room.forbidden[{i}]"),
                    message: format!("unknown kind \"{name}\""),
                });
            }
        }

        for (i, app) in self.appliances.iter().enumerate() {
            let kind = ApplianceKind::from_name(&app.kind);
            if kind.is_none() {
                errors.push(ConfigError {
                    field: format!("appliances[{i}].kind"),
                    message: format!("unknown kind \"{}\"", app.kind),
                });
            }
            for (field, value) in [
                ("brand", &app.brand),
                ("model", &app.model),
                ("serial", &app.serial),
            ] {
                if value.is_empty() {
                    errors.push(ConfigError {
                        field: format!("appliances[{i}].{field}"),
                        message: "must not be empty".into(),
                    });
                }
            }
            if app.rated_kw <= 0.0 {
                errors.push(ConfigError {
                    field: format!("appliances[{i}].rated_kw"),
                    message: "must be > 0".into(),
                });
            }
            if app.brightness > 100 {
                errors.push(ConfigError {
                    field: format!("appliances[{i}].brightness"),
                    message: "must be <= 100".into(),
                });
            }
            if kind == Some(ApplianceKind::Fridge) && app.compressors == 0 {
                errors.push(ConfigError {
                    field: format!("appliances[{i}].compressors"),
                    message: "must be > 0".into(),
                });
            }
            if self.appliances[..i].iter().any(|a| a.serial == app.serial) {
                errors.push(ConfigError {
                    field: format!("appliances[{i}].serial"),
                    message: format!("duplicate serial \"{}\"", app.serial),
                });
            }
        }

        for (i, action) in self.actions.iter().enumerate() {
            if !OPS.contains(&action.op.as_str()) {
                errors.push(ConfigError {
                    field: format!("actions[{i}].op"),
                    message: format!("unknown op \"{}\", available: {}", action.op, OPS.join(", ")),
                });
                continue;
            }
            match action.op.as_str() {
                "forbid" | "allow" => {
                    if ApplianceKind::from_name(&action.kind).is_none() {
                        errors.push(ConfigError {
                            field: format!("actions[{i}].kind"),
                            message: format!("unknown kind \"{}\"", action.kind),
                        });
                    }
                }
                "set_brightness" => {
                    if action.serial.is_empty() {
                        errors.push(ConfigError {
                            field: format!("actions[{i}].serial"),
                            message: "must not be empty".into(),
                        });
                    }
                    if action.level > 100 {
                        errors.push(ConfigError {
                            field: format!("actions[{i}].level"),
                            message: "must be <= 100".into(),
                        });
                    }
                }
                _ => {
                    if action.serial.is_empty() {
                        errors.push(ConfigError {
                            field: format!("actions[{i}].serial"),
                            message: "must not be empty".into(),
                        });
                    }
                }
            }
        }

        errors
    }
}
