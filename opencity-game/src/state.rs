//! Player profile with invariant-preserving mutators.
//!
//! Fields are private so that every change to cash or wanted passes through
//! a method that clamps: cash never drops below zero and wanted stays within
//! `0..=100` after every single mutation. Only the owning session mutates a
//! profile; outside the crate it is read-only:
//!
//! ```compile_fail
//! use opencity_game::{PlayerProfile, Vehicle};
//!
//! let mut profile = PlayerProfile::new("dt_square", 0, 0, Vehicle::compact());
//! profile.credit(1_000);
//! ```
use serde::{Deserialize, Serialize};

use crate::constants::{WANTED_MAX, WANTED_MIN};
use crate::vehicle::Vehicle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    current_location_id: String,
    cash: i32,
    wanted: i32,
    personal_power: u32,
    vehicle: Vehicle,
    #[serde(default)]
    missions_completed: u32,
    #[serde(default)]
    missions_abandoned: u32,
}

impl PlayerProfile {
    /// Build a profile; out-of-range cash and wanted values are clamped.
    #[must_use]
    pub fn new(location_id: &str, cash: i32, wanted: i32, vehicle: Vehicle) -> Self {
        Self {
            current_location_id: location_id.to_string(),
            cash: cash.max(0),
            wanted: clamp_wanted(wanted),
            personal_power: 0,
            vehicle,
            missions_completed: 0,
            missions_abandoned: 0,
        }
    }

    #[must_use]
    pub fn current_location_id(&self) -> &str {
        &self.current_location_id
    }

    #[must_use]
    pub const fn cash(&self) -> i32 {
        self.cash
    }

    #[must_use]
    pub const fn wanted(&self) -> i32 {
        self.wanted
    }

    #[must_use]
    pub const fn personal_power(&self) -> u32 {
        self.personal_power
    }

    #[must_use]
    pub const fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    #[must_use]
    pub const fn missions_completed(&self) -> u32 {
        self.missions_completed
    }

    #[must_use]
    pub const fn missions_abandoned(&self) -> u32 {
        self.missions_abandoned
    }

    pub(crate) fn relocate(&mut self, location_id: &str) {
        location_id.clone_into(&mut self.current_location_id);
    }

    /// Add winnings. Negative amounts are ignored.
    pub(crate) fn credit(&mut self, amount: i32) {
        if amount > 0 {
            self.cash = self.cash.saturating_add(amount);
        }
    }

    /// Take money away, flooring at zero. Negative amounts are ignored.
    pub(crate) fn debit(&mut self, amount: i32) {
        if amount > 0 {
            self.cash = self.cash.saturating_sub(amount).max(0);
        }
    }

    /// Pay `cost` only if the player can afford it.
    pub(crate) fn try_spend(&mut self, cost: i32) -> bool {
        let cost = cost.max(0);
        if self.cash < cost {
            return false;
        }
        self.cash -= cost;
        true
    }

    /// Shift wanted by `delta`, clamped to `0..=100`.
    pub(crate) fn adjust_wanted(&mut self, delta: i32) {
        self.wanted = clamp_wanted(self.wanted.saturating_add(delta));
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn set_cash(&mut self, cash: i32) {
        self.cash = cash.max(0);
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn set_wanted(&mut self, wanted: i32) {
        self.wanted = clamp_wanted(wanted);
    }

    pub(crate) fn add_power(&mut self, amount: u32) {
        self.personal_power = self.personal_power.saturating_add(amount);
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn set_personal_power(&mut self, personal_power: u32) {
        self.personal_power = personal_power;
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn set_vehicle(&mut self, vehicle: Vehicle) {
        self.replace_vehicle(vehicle);
    }

    pub(crate) const fn vehicle_mut(&mut self) -> &mut Vehicle {
        &mut self.vehicle
    }

    /// Swap in a new vehicle, dropping the previous one.
    pub(crate) fn replace_vehicle(&mut self, vehicle: Vehicle) {
        self.vehicle = vehicle;
    }

    pub(crate) const fn record_completion(&mut self) {
        self.missions_completed = self.missions_completed.saturating_add(1);
    }

    pub(crate) const fn record_abandon(&mut self) {
        self.missions_abandoned = self.missions_abandoned.saturating_add(1);
    }

    /// True when the cash and wanted invariants hold.
    #[must_use]
    pub const fn invariants_hold(&self) -> bool {
        self.cash >= 0 && self.wanted >= WANTED_MIN && self.wanted <= WANTED_MAX
    }
}

const fn clamp_wanted(value: i32) -> i32 {
    if value < WANTED_MIN {
        WANTED_MIN
    } else if value > WANTED_MAX {
        WANTED_MAX
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> PlayerProfile {
        PlayerProfile::new("dt_square", 1_500, 0, Vehicle::compact())
    }

    #[test]
    fn constructor_clamps_inputs() {
        let p = PlayerProfile::new("x", -20, 140, Vehicle::compact());
        assert_eq!(p.cash(), 0);
        assert_eq!(p.wanted(), 100);
        assert!(p.invariants_hold());
    }

    #[test]
    fn debit_floors_at_zero() {
        let mut p = profile();
        p.debit(2_000);
        assert_eq!(p.cash(), 0);
        p.debit(-50);
        assert_eq!(p.cash(), 0);
        p.credit(-50);
        assert_eq!(p.cash(), 0);
        p.credit(150);
        assert_eq!(p.cash(), 150);
    }

    #[test]
    fn wanted_is_clamped_both_ways() {
        let mut p = profile();
        p.adjust_wanted(-25);
        assert_eq!(p.wanted(), 0);
        p.adjust_wanted(85);
        p.adjust_wanted(25);
        assert_eq!(p.wanted(), 100);
        p.adjust_wanted(i32::MIN);
        assert_eq!(p.wanted(), 0);
    }

    #[test]
    fn try_spend_requires_full_amount() {
        let mut p = profile();
        p.set_cash(100);
        assert!(!p.try_spend(1_200));
        assert_eq!(p.cash(), 100);
        assert!(p.try_spend(100));
        assert_eq!(p.cash(), 0);
        assert!(p.try_spend(0));
    }

    #[test]
    fn replacing_vehicle_drops_old_one() {
        let mut p = profile();
        p.replace_vehicle(Vehicle::sport());
        assert_eq!(p.vehicle().id, "sport");
        p.vehicle_mut().upgrade(0.2, 0.05);
        assert!(p.vehicle().stealth > 0.4);
    }
}
