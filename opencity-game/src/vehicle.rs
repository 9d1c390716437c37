//! Player vehicles and the fixed market catalog
use serde::{Deserialize, Serialize};

/// The car the player currently drives. Exactly one exists per profile;
/// buying a new one drops the old value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    /// Purchase price in dollars
    pub price: i32,
    #[serde(default = "Vehicle::default_speed")]
    pub speed: f32,
    /// Chance modifier for getaways (0.0-1.0)
    #[serde(default)]
    pub stealth: f32,
}

impl Default for Vehicle {
    fn default() -> Self {
        Self::compact()
    }
}

impl Vehicle {
    const fn default_speed() -> f32 {
        1.0
    }

    /// Starting car.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            id: "civic".to_string(),
            name: "Compact".to_string(),
            price: 0,
            speed: Self::default_speed(),
            stealth: 0.2,
        }
    }

    #[must_use]
    pub fn sedan() -> Self {
        Self {
            id: "sedan".to_string(),
            name: "Sedan".to_string(),
            price: 1_200,
            speed: 1.2,
            stealth: 0.3,
        }
    }

    #[must_use]
    pub fn sport() -> Self {
        Self {
            id: "sport".to_string(),
            name: "Sport".to_string(),
            price: 3_200,
            speed: 1.9,
            stealth: 0.4,
        }
    }

    /// Apply a garage tune-up. Stealth is capped at 1.0.
    pub fn upgrade(&mut self, speed_gain: f32, stealth_gain: f32) {
        if speed_gain > 0.0 {
            self.speed += speed_gain;
        }
        if stealth_gain > 0.0 {
            self.stealth = (self.stealth + stealth_gain).clamp(0.0, 1.0);
        }
    }

    /// Stealth as used by getaway probability math.
    #[must_use]
    pub fn stealth_factor(&self) -> f64 {
        f64::from(self.stealth.clamp(0.0, 1.0))
    }

    /// Structural checks used by config validation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.price >= 0
            && self.speed.is_finite()
            && self.speed > 0.0
            && (0.0..=1.0).contains(&self.stealth)
    }
}
