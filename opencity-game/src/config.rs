//! Session start-up configuration.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_STARTING_CASH, WANTED_MAX, WANTED_MIN};
use crate::vehicle::Vehicle;
use crate::world::WorldGraph;

/// Location the player spawns at when the config does not name one.
pub const DEFAULT_START_LOCATION: &str = "dt_square";

const MIN_LOCATIONS: usize = 2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: i32,
        value: i32,
    },
    #[error("{field} must be between {min} and {max} (got {value})")]
    RangeViolation {
        field: &'static str,
        min: i32,
        max: i32,
        value: i32,
    },
    #[error("initial vehicle '{id}' has invalid stats")]
    InvalidVehicle { id: String },
    #[error("start location '{id}' is not part of the world")]
    UnknownStartLocation { id: String },
    #[error("world needs at least {min} locations (got {count})")]
    WorldTooSmall { min: usize, count: usize },
    #[error("failed to parse session config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "SessionConfig::default_initial_cash")]
    pub initial_cash: i32,
    #[serde(default)]
    pub initial_wanted: i32,
    #[serde(default)]
    pub initial_vehicle: Vehicle,
    /// Fixed seed for reproducible sessions; `None` draws one from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub start_location: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_cash: Self::default_initial_cash(),
            initial_wanted: 0,
            initial_vehicle: Vehicle::compact(),
            seed: None,
            start_location: None,
        }
    }
}

impl SessionConfig {
    const fn default_initial_cash() -> i32 {
        DEFAULT_STARTING_CASH
    }

    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parse a config from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` when the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Location id the player spawns at.
    #[must_use]
    pub fn start_location_id(&self) -> &str {
        self.start_location
            .as_deref()
            .unwrap_or(DEFAULT_START_LOCATION)
    }

    /// Validate the profile-facing fields.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when any field violates the documented bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_cash < 0 {
            return Err(ConfigError::MinViolation {
                field: "initial_cash",
                min: 0,
                value: self.initial_cash,
            });
        }
        if !(WANTED_MIN..=WANTED_MAX).contains(&self.initial_wanted) {
            return Err(ConfigError::RangeViolation {
                field: "initial_wanted",
                min: WANTED_MIN,
                max: WANTED_MAX,
                value: self.initial_wanted,
            });
        }
        if !self.initial_vehicle.is_valid() {
            return Err(ConfigError::InvalidVehicle {
                id: self.initial_vehicle.id.clone(),
            });
        }
        Ok(())
    }

    /// Validate the config together with the world it will run in.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for invalid fields, a world with fewer than two
    /// locations, or a start location the world does not contain.
    pub fn validate_for(&self, world: &WorldGraph) -> Result<(), ConfigError> {
        self.validate()?;
        let count = world.locations().len();
        if count < MIN_LOCATIONS {
            return Err(ConfigError::WorldTooSmall {
                min: MIN_LOCATIONS,
                count,
            });
        }
        let start = self.start_location_id();
        if !world.contains(start) {
            return Err(ConfigError::UnknownStartLocation {
                id: start.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_new_game() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.initial_cash, 1_500);
        assert_eq!(cfg.initial_wanted, 0);
        assert_eq!(cfg.initial_vehicle, Vehicle::compact());
        assert_eq!(cfg.start_location_id(), "dt_square");
        assert!(cfg.validate_for(&WorldGraph::default_city()).is_ok());
    }

    #[test]
    fn json_fills_missing_fields() {
        let cfg = SessionConfig::from_json(r#"{"seed": 42, "initial_wanted": 85}"#).unwrap();
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.initial_wanted, 85);
        assert_eq!(cfg.initial_cash, 1_500);
        assert!(matches!(
            SessionConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn out_of_range_fields_are_rejected() {
        let cfg = SessionConfig {
            initial_wanted: 101,
            ..SessionConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::RangeViolation {
                field: "initial_wanted",
                ..
            })
        ));
        let cfg = SessionConfig {
            initial_cash: -1,
            ..SessionConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::MinViolation { .. })
        ));
        let mut cfg = SessionConfig::default();
        cfg.initial_vehicle.stealth = 2.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidVehicle { .. })
        ));
    }

    #[test]
    fn world_checks() {
        let cfg = SessionConfig {
            start_location: Some("moon".to_string()),
            ..SessionConfig::default()
        };
        assert!(matches!(
            cfg.validate_for(&WorldGraph::default_city()),
            Err(ConfigError::UnknownStartLocation { .. })
        ));
        assert!(matches!(
            SessionConfig::default().validate_for(&WorldGraph::new()),
            Err(ConfigError::WorldTooSmall { count: 0, .. })
        ));
    }
}
