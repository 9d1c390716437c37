//! Renderable description of a session, returned after every action.
use serde::Serialize;
use smallvec::SmallVec;

use crate::actions::{Action, MenuEntry};
use crate::encounters::EncounterType;
use crate::missions::{Mission, MissionKind, MissionSummary};
use crate::vehicle::Vehicle;

/// Progress through the active mission, derived from the mission and the
/// player's current location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionPhase {
    DeliveryAtPickup,
    DeliveryEnRoute,
    DeliveryAtDrop,
    HeistEnRoute,
    HeistAtTarget,
    TailInProgress,
}

impl MissionPhase {
    #[must_use]
    pub fn of(mission: &Mission, current_location_id: &str) -> Self {
        match mission.kind {
            MissionKind::Delivery if current_location_id == mission.to_location_id => {
                Self::DeliveryAtDrop
            }
            MissionKind::Delivery if current_location_id == mission.from_location_id => {
                Self::DeliveryAtPickup
            }
            MissionKind::Delivery => Self::DeliveryEnRoute,
            MissionKind::Heist if current_location_id == mission.to_location_id => {
                Self::HeistAtTarget
            }
            MissionKind::Heist => Self::HeistEnRoute,
            MissionKind::Tail => Self::TailInProgress,
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::DeliveryAtPickup => "delivery_at_pickup",
            Self::DeliveryEnRoute => "delivery_en_route",
            Self::DeliveryAtDrop => "delivery_at_drop",
            Self::HeistEnRoute => "heist_en_route",
            Self::HeistAtTarget => "heist_at_target",
            Self::TailInProgress => "tail_in_progress",
        }
    }
}

/// What the presentation layer should be showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    Idle,
    Menu,
    Travel,
    MissionBrowsing,
    MissionInProgress {
        kind: MissionKind,
        phase: MissionPhase,
    },
    Raid,
    Encounter {
        encounter: EncounterType,
    },
    Garage,
    Market,
    Auction,
    Status,
}

/// One selectable option. Applying `action` is the same as picking it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferedOption {
    pub label_key: String,
    pub action: Action,
}

impl OfferedOption {
    #[must_use]
    pub fn new(label_key: impl Into<String>, action: Action) -> Self {
        Self {
            label_key: label_key.into(),
            action,
        }
    }
}

pub type OfferedOptions = SmallVec<[OfferedOption; 3]>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Offer {
    pub title_key: String,
    pub body_key: String,
    pub options: OfferedOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuView {
    pub entries: Vec<MenuEntry>,
    pub cursor: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeighborView {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusBlock {
    pub cash: i32,
    pub wanted: i32,
    pub personal_power: u32,
    pub vehicle: Vehicle,
    pub missions_completed: u32,
    pub missions_abandoned: u32,
    pub active_mission: Option<MissionSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub turn: u64,
    pub seed: Option<u64>,
    pub location_id: String,
    pub location_name: String,
    pub district_name: String,
    pub district_danger: u8,
    pub neighbors: Vec<NeighborView>,
    pub status: StatusBlock,
    pub view: View,
    pub offer: Offer,
    /// Present only while the menu is open.
    pub menu: Option<MenuView>,
    pub available_missions: Vec<MissionSummary>,
    /// Outcome key recorded by the action that produced this snapshot.
    pub log_key: Option<String>,
}

impl Snapshot {
    /// Serialize for hashing or reporting.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mission(kind: MissionKind, from: &str, to: &str) -> Mission {
        Mission {
            id: "m".to_string(),
            kind,
            from_location_id: from.to_string(),
            to_location_id: to.to_string(),
            reward: 300,
            risk: 20,
            accepted: true,
            completed: false,
        }
    }

    #[test]
    fn delivery_phases_follow_location() {
        let m = mission(MissionKind::Delivery, "a", "b");
        assert_eq!(MissionPhase::of(&m, "a"), MissionPhase::DeliveryAtPickup);
        assert_eq!(MissionPhase::of(&m, "c"), MissionPhase::DeliveryEnRoute);
        assert_eq!(MissionPhase::of(&m, "b"), MissionPhase::DeliveryAtDrop);
    }

    #[test]
    fn heist_and_tail_phases() {
        let heist = mission(MissionKind::Heist, "b", "b");
        assert_eq!(MissionPhase::of(&heist, "a"), MissionPhase::HeistEnRoute);
        assert_eq!(MissionPhase::of(&heist, "b"), MissionPhase::HeistAtTarget);
        let tail = mission(MissionKind::Tail, "a", "b");
        assert_eq!(MissionPhase::of(&tail, "z"), MissionPhase::TailInProgress);
    }

    #[test]
    fn view_serializes_with_tag() {
        let json = serde_json::to_string(&View::MissionInProgress {
            kind: MissionKind::Heist,
            phase: MissionPhase::HeistAtTarget,
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"view":"mission_in_progress","kind":"heist","phase":"heist_at_target"}"#
        );
    }
}
