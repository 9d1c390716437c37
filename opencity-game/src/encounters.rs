//! Travel encounter selection
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    ENCOUNTER_CHANCE_CAP, ENCOUNTER_ROLL_SPAN, HIGH_WANTED_THRESHOLD, RAID_CHANCE,
    RAID_WANTED_THRESHOLD,
};
use crate::rng::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterType {
    PoliceCheck,
    GangAmbush,
    StreetDeal,
    FoundCash,
}

impl EncounterType {
    pub const ALL: [Self; 4] = [
        Self::PoliceCheck,
        Self::GangAmbush,
        Self::StreetDeal,
        Self::FoundCash,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::PoliceCheck => "police_check",
            Self::GangAmbush => "gang_ambush",
            Self::StreetDeal => "street_deal",
            Self::FoundCash => "found_cash",
        }
    }
}

impl fmt::Display for EncounterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Cumulative `(upper_bound_exclusive, type)` thresholds over a `0..100` roll.
type EncounterTable = [(i32, EncounterType)];

const HIGH_WANTED_TABLE: &EncounterTable = &[
    (50, EncounterType::PoliceCheck),
    (85, EncounterType::GangAmbush),
    (ENCOUNTER_ROLL_SPAN, EncounterType::StreetDeal),
];

const BASELINE_TABLE: &EncounterTable = &[
    (20, EncounterType::FoundCash),
    (50, EncounterType::StreetDeal),
    (75, EncounterType::PoliceCheck),
    (ENCOUNTER_ROLL_SPAN, EncounterType::GangAmbush),
];

/// Stateless encounter roller. Every draw goes through the caller's
/// [`RandomSource`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncounterEngine;

impl EncounterEngine {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Probability (in percent) that arriving somewhere triggers an encounter.
    #[must_use]
    pub fn encounter_chance(danger: u8, wanted: i32) -> i32 {
        (i32::from(danger) / 2 + wanted / 2).clamp(0, ENCOUNTER_CHANCE_CAP)
    }

    /// Roll for an encounter on arrival.
    ///
    /// Draws one int for the occurrence check and, only when it fires, a
    /// second int that selects the type.
    pub fn try_generate<R: RandomSource + ?Sized>(
        &self,
        danger: u8,
        wanted: i32,
        rng: &mut R,
    ) -> Option<EncounterType> {
        let chance = Self::encounter_chance(danger, wanted);
        let roll = rng.next_int(0, ENCOUNTER_ROLL_SPAN);
        log::trace!("encounter roll {roll} against chance {chance}");
        if roll >= chance {
            return None;
        }
        let pick = rng.next_int(0, ENCOUNTER_ROLL_SPAN);
        let table = if wanted > HIGH_WANTED_THRESHOLD {
            HIGH_WANTED_TABLE
        } else {
            BASELINE_TABLE
        };
        let kind = select_from_table(table, pick);
        log::trace!("encounter type roll {pick} selected {kind}");
        Some(kind)
    }

    /// Police raid check, evaluated before the regular encounter roll.
    /// Draws nothing unless wanted is above the raid threshold.
    pub fn try_police_raid<R: RandomSource + ?Sized>(&self, wanted: i32, rng: &mut R) -> bool {
        if wanted <= RAID_WANTED_THRESHOLD {
            return false;
        }
        let roll = rng.next_float01();
        log::trace!("raid roll {roll:.4} against {RAID_CHANCE}");
        roll < RAID_CHANCE
    }
}

fn select_from_table(table: &EncounterTable, roll: i32) -> EncounterType {
    table
        .iter()
        .find(|(bound, _)| roll < *bound)
        .or_else(|| table.last())
        .map_or(EncounterType::StreetDeal, |(_, kind)| *kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ScriptedRandom, SeededRandom};

    #[test]
    fn chance_is_halved_and_capped() {
        assert_eq!(EncounterEngine::encounter_chance(35, 0), 17);
        assert_eq!(EncounterEngine::encounter_chance(55, 15), 34);
        assert_eq!(EncounterEngine::encounter_chance(100, 100), 90);
        assert_eq!(EncounterEngine::encounter_chance(0, 0), 0);
    }

    #[test]
    fn zero_chance_never_fires() {
        let engine = EncounterEngine::new();
        let mut rng = SeededRandom::new(5);
        for _ in 0..200 {
            assert!(engine.try_generate(0, 1, &mut rng).is_none());
        }
    }

    #[test]
    fn baseline_table_thresholds() {
        let engine = EncounterEngine::new();
        let cases = [
            (0, EncounterType::FoundCash),
            (19, EncounterType::FoundCash),
            (20, EncounterType::StreetDeal),
            (49, EncounterType::StreetDeal),
            (50, EncounterType::PoliceCheck),
            (74, EncounterType::PoliceCheck),
            (75, EncounterType::GangAmbush),
            (99, EncounterType::GangAmbush),
        ];
        for (pick, expected) in cases {
            let mut rng = ScriptedRandom::new().with_ints([0, pick]);
            assert_eq!(engine.try_generate(55, 0, &mut rng), Some(expected));
        }
    }

    #[test]
    fn high_wanted_table_thresholds() {
        let engine = EncounterEngine::new();
        let cases = [
            (49, EncounterType::PoliceCheck),
            (50, EncounterType::GangAmbush),
            (84, EncounterType::GangAmbush),
            (85, EncounterType::StreetDeal),
        ];
        for (pick, expected) in cases {
            let mut rng = ScriptedRandom::new().with_ints([0, pick]);
            assert_eq!(engine.try_generate(35, 61, &mut rng), Some(expected));
        }
    }

    #[test]
    fn occurrence_roll_must_be_below_chance() {
        let engine = EncounterEngine::new();
        let mut rng = ScriptedRandom::new().with_ints([17, 0]);
        assert_eq!(engine.try_generate(35, 0, &mut rng), None);
        assert_eq!(rng.remaining(), (1, 0));
        let mut rng = ScriptedRandom::new().with_ints([16, 0]);
        assert_eq!(
            engine.try_generate(35, 0, &mut rng),
            Some(EncounterType::FoundCash)
        );
    }

    #[test]
    fn raid_requires_high_wanted() {
        let engine = EncounterEngine::new();
        let mut rng = ScriptedRandom::new().with_floats([0.0]);
        assert!(!engine.try_police_raid(80, &mut rng));
        assert_eq!(rng.remaining(), (0, 1));
        assert!(engine.try_police_raid(81, &mut rng));
        let mut rng = ScriptedRandom::new().with_floats([0.35]);
        assert!(!engine.try_police_raid(100, &mut rng));
    }
}
