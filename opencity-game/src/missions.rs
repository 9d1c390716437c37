//! Procedural mission generation.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    DELIVERY_REWARD_BASE, DELIVERY_REWARD_PER_RISK, DELIVERY_RISK_RANGE, HEIST_REWARD_BASE,
    HEIST_REWARD_PER_RISK, HEIST_RISK_RANGE, TAIL_REWARD_BASE, TAIL_REWARD_PER_RISK,
    TAIL_RISK_RANGE,
};
use crate::numbers::{i32_to_f32, round_f32_to_i32};
use crate::rng::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionKind {
    Delivery,
    Heist,
    Tail,
}

impl MissionKind {
    pub const ALL: [Self; 3] = [Self::Delivery, Self::Heist, Self::Tail];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Delivery => "delivery",
            Self::Heist => "heist",
            Self::Tail => "tail",
        }
    }

    const fn risk_range(self) -> (i32, i32) {
        match self {
            Self::Delivery => DELIVERY_RISK_RANGE,
            Self::Heist => HEIST_RISK_RANGE,
            Self::Tail => TAIL_RISK_RANGE,
        }
    }

    /// `round(base + risk * per_risk)` for this kind.
    #[must_use]
    pub fn reward_for(self, risk: i32) -> i32 {
        let (base, per_risk) = match self {
            Self::Delivery => (DELIVERY_REWARD_BASE, DELIVERY_REWARD_PER_RISK),
            Self::Heist => (HEIST_REWARD_BASE, HEIST_REWARD_PER_RISK),
            Self::Tail => (TAIL_REWARD_BASE, TAIL_REWARD_PER_RISK),
        };
        round_f32_to_i32(i32_to_f32(risk).mul_add(per_risk, base))
    }
}

impl fmt::Display for MissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub id: String,
    pub kind: MissionKind,
    pub from_location_id: String,
    pub to_location_id: String,
    pub reward: i32,
    /// Risk rating (0-100)
    pub risk: i32,
    #[serde(default)]
    pub accepted: bool,
    #[serde(default)]
    pub completed: bool,
}

impl Mission {
    /// Delivery and Tail run between two distinct locations; a Heist starts
    /// and ends at its target.
    #[must_use]
    pub fn endpoints_valid(&self) -> bool {
        match self.kind {
            MissionKind::Heist => self.from_location_id == self.to_location_id,
            MissionKind::Delivery | MissionKind::Tail => {
                self.from_location_id != self.to_location_id
            }
        }
    }

    #[must_use]
    pub fn summary(&self) -> MissionSummary {
        MissionSummary {
            id: self.id.clone(),
            kind: self.kind,
            from_location_id: self.from_location_id.clone(),
            to_location_id: self.to_location_id.clone(),
            reward: self.reward,
            risk: self.risk,
        }
    }
}

/// Read-only mission view carried in snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionSummary {
    pub id: String,
    pub kind: MissionKind,
    pub from_location_id: String,
    pub to_location_id: String,
    pub reward: i32,
    pub risk: i32,
}

/// Builds missions over a fixed set of location ids.
///
/// Ids are `<kind>-<serial>` with a per-factory serial, so two sessions with
/// the same seed hand out identical ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissionFactory {
    location_ids: Vec<String>,
    next_serial: u32,
}

impl MissionFactory {
    #[must_use]
    pub const fn new(location_ids: Vec<String>) -> Self {
        Self {
            location_ids,
            next_serial: 0,
        }
    }

    #[must_use]
    pub fn location_ids(&self) -> &[String] {
        &self.location_ids
    }

    /// Courier job between two distinct locations.
    pub fn create_delivery<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Option<Mission> {
        let (from, to) = self.distinct_pair(rng)?;
        Some(self.build(MissionKind::Delivery, from, to, rng))
    }

    /// Robbery of a single target location.
    pub fn create_heist<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Option<Mission> {
        let target = self.pick_location(rng)?;
        Some(self.build(MissionKind::Heist, target.clone(), target, rng))
    }

    /// Follow a mark between two distinct locations.
    pub fn create_tail<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Option<Mission> {
        let (from, to) = self.distinct_pair(rng)?;
        Some(self.build(MissionKind::Tail, from, to, rng))
    }

    pub fn create<R: RandomSource + ?Sized>(
        &mut self,
        kind: MissionKind,
        rng: &mut R,
    ) -> Option<Mission> {
        match kind {
            MissionKind::Delivery => self.create_delivery(rng),
            MissionKind::Heist => self.create_heist(rng),
            MissionKind::Tail => self.create_tail(rng),
        }
    }

    /// Replace `pool` with one mission of each kind, in Delivery, Heist, Tail
    /// order. Kinds that cannot be generated are skipped.
    pub fn refresh_pool<R: RandomSource + ?Sized>(&mut self, pool: &mut Vec<Mission>, rng: &mut R) {
        pool.clear();
        for kind in MissionKind::ALL {
            if let Some(mission) = self.create(kind, rng) {
                pool.push(mission);
            }
        }
        log::trace!("mission pool refreshed with {} entries", pool.len());
    }

    fn build<R: RandomSource + ?Sized>(
        &mut self,
        kind: MissionKind,
        from: String,
        to: String,
        rng: &mut R,
    ) -> Mission {
        let (lo, hi) = kind.risk_range();
        let risk = rng.next_int(lo, hi);
        self.next_serial = self.next_serial.saturating_add(1);
        Mission {
            id: format!("{}-{:04}", kind.key(), self.next_serial),
            kind,
            from_location_id: from,
            to_location_id: to,
            reward: kind.reward_for(risk),
            risk,
            accepted: false,
            completed: false,
        }
    }

    fn pick_location<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Option<String> {
        let idx = rng.pick_index(self.location_ids.len())?;
        self.location_ids.get(idx).cloned()
    }

    /// Uniform ordered pair of distinct locations. The destination is drawn
    /// from the other `len - 1` ids, so exactly two draws are made.
    fn distinct_pair<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Option<(String, String)> {
        let len = self.location_ids.len();
        if len < 2 {
            return None;
        }
        let from_idx = rng.pick_index(len)?;
        let mut to_idx = rng.pick_index(len - 1)?;
        if to_idx >= from_idx {
            to_idx += 1;
        }
        let from = self.location_ids.get(from_idx)?.clone();
        let to = self.location_ids.get(to_idx)?.clone();
        Some((from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ScriptedRandom, SeededRandom};

    fn ids() -> Vec<String> {
        ["dt_square", "bank_dt", "harbor_pier", "garage_sb"]
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn reward_formulas() {
        assert_eq!(MissionKind::Delivery.reward_for(20), 310);
        assert_eq!(MissionKind::Delivery.reward_for(10), 230);
        assert_eq!(MissionKind::Heist.reward_for(40), 1_400);
        assert_eq!(MissionKind::Tail.reward_for(69), 990);
    }

    #[test]
    fn delivery_destination_skips_origin() {
        let mut factory = MissionFactory::new(ids());
        let mut rng = ScriptedRandom::new().with_ints([0, 1, 20]);
        let mission = factory.create_delivery(&mut rng).unwrap();
        assert_eq!(mission.from_location_id, "dt_square");
        assert_eq!(mission.to_location_id, "harbor_pier");
        assert_eq!(mission.risk, 20);
        assert_eq!(mission.reward, 310);
        assert_eq!(mission.id, "delivery-0001");
        assert!(!mission.accepted && !mission.completed);

        let mut rng = ScriptedRandom::new().with_ints([2, 1]);
        let mission = factory.create_tail(&mut rng).unwrap();
        assert_eq!(mission.from_location_id, "harbor_pier");
        assert_eq!(mission.to_location_id, "bank_dt");
        assert_eq!(mission.id, "tail-0002");
    }

    #[test]
    fn exhausted_script_still_generates_distinct_endpoints() {
        let mut factory = MissionFactory::new(ids());
        let mut rng = ScriptedRandom::new();
        let mission = factory.create_delivery(&mut rng).unwrap();
        assert_eq!(mission.from_location_id, "garage_sb");
        assert_eq!(mission.to_location_id, "harbor_pier");
        assert_eq!(mission.risk, 59);
    }

    #[test]
    fn heist_uses_one_location() {
        let mut factory = MissionFactory::new(ids());
        let mut rng = ScriptedRandom::new().with_ints([1, 40]);
        let mission = factory.create_heist(&mut rng).unwrap();
        assert_eq!(mission.from_location_id, "bank_dt");
        assert!(mission.endpoints_valid());
        assert_eq!(mission.reward, 1_400);
    }

    #[test]
    fn too_few_locations_yield_nothing() {
        let mut rng = SeededRandom::new(1);
        let mut empty = MissionFactory::new(Vec::new());
        assert!(empty.create_heist(&mut rng).is_none());
        let mut single = MissionFactory::new(vec!["only".to_string()]);
        assert!(single.create_delivery(&mut rng).is_none());
        assert!(single.create_tail(&mut rng).is_none());
        assert!(single.create_heist(&mut rng).is_some());
    }

    #[test]
    fn refresh_pool_has_one_of_each_kind() {
        let mut factory = MissionFactory::new(ids());
        let mut rng = SeededRandom::new(1337);
        let mut pool = Vec::new();
        for _ in 0..50 {
            factory.refresh_pool(&mut pool, &mut rng);
            let kinds: Vec<MissionKind> = pool.iter().map(|m| m.kind).collect();
            assert_eq!(kinds, MissionKind::ALL);
            for mission in &pool {
                assert!(mission.endpoints_valid());
                assert!(mission.reward > 0);
                assert!((0..=100).contains(&mission.risk));
            }
        }
    }

    #[test]
    fn ids_are_unique_and_deterministic() {
        let mut a = MissionFactory::new(ids());
        let mut b = MissionFactory::new(ids());
        let mut rng_a = SeededRandom::new(9);
        let mut rng_b = SeededRandom::new(9);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..20 {
            let left = a.create_tail(&mut rng_a).unwrap();
            let right = b.create_tail(&mut rng_b).unwrap();
            assert_eq!(left, right);
            assert!(seen.insert(left.id));
        }
    }
}
