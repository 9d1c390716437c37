use std::fmt;

use opencity_game::{Action, Choice, EncounterType, MissionPhase, Snapshot, View};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Decision returned by a [`PlayerPolicy`]
#[derive(Debug, Clone)]
pub struct PolicyDecision {
    pub choice_index: usize,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub fn new(choice_index: usize, rationale: Option<String>) -> Self {
        Self {
            choice_index,
            rationale,
        }
    }
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Select one of the options offered by the snapshot.
    fn pick_option(&mut self, snapshot: &Snapshot) -> PolicyDecision;
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameplayStrategy {
    Cautious,
    Reckless,
    Random,
}

impl GameplayStrategy {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            GameplayStrategy::Cautious => "Cautious",
            GameplayStrategy::Reckless => "Reckless",
            GameplayStrategy::Random => "Random",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            GameplayStrategy::Cautious => Box::new(MissionRunnerPolicy::new(Temperament::Cautious)),
            GameplayStrategy::Reckless => Box::new(MissionRunnerPolicy::new(Temperament::Reckless)),
            GameplayStrategy::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Temperament {
    Cautious,
    Reckless,
}

impl Temperament {
    const fn pick(self, safe: Choice, risky: Choice) -> Choice {
        match self {
            Self::Cautious => safe,
            Self::Reckless => risky,
        }
    }

    fn encounter_choice(self, encounter: EncounterType) -> Choice {
        match encounter {
            EncounterType::PoliceCheck | EncounterType::GangAmbush => {
                self.pick(Choice::Primary, Choice::Secondary)
            }
            EncounterType::StreetDeal | EncounterType::FoundCash => {
                self.pick(Choice::Secondary, Choice::Primary)
            }
        }
    }

    /// The action this temperament wants to take on the current screen.
    fn preferred_action(self, view: View) -> Action {
        match view {
            View::Raid => Action::ChooseEncounterOption {
                choice: self.pick(Choice::Primary, Choice::Secondary),
            },
            View::Encounter { encounter } => Action::ChooseEncounterOption {
                choice: self.encounter_choice(encounter),
            },
            View::MissionInProgress { phase, .. } => match phase {
                MissionPhase::DeliveryAtDrop => Action::DeliverMission,
                MissionPhase::DeliveryAtPickup
                | MissionPhase::DeliveryEnRoute
                | MissionPhase::HeistEnRoute => Action::TravelToMissionTarget,
                MissionPhase::HeistAtTarget => Action::ChooseMissionMethod {
                    choice: self.pick(Choice::Primary, Choice::Secondary),
                },
                MissionPhase::TailInProgress => Action::ChooseMissionMethod {
                    choice: self.pick(Choice::Secondary, Choice::Primary),
                },
            },
            View::MissionBrowsing => Action::AcceptMission,
            View::Idle => Action::ShowMissions,
            View::Menu
            | View::Travel
            | View::Garage
            | View::Market
            | View::Auction
            | View::Status => Action::Back,
        }
    }
}

/// Works the mission loop, resolving pending events by temperament.
struct MissionRunnerPolicy {
    temperament: Temperament,
}

impl MissionRunnerPolicy {
    const fn new(temperament: Temperament) -> Self {
        Self { temperament }
    }
}

impl PlayerPolicy for MissionRunnerPolicy {
    fn name(&self) -> &'static str {
        match self.temperament {
            Temperament::Cautious => "Cautious",
            Temperament::Reckless => "Reckless",
        }
    }

    fn pick_option(&mut self, snapshot: &Snapshot) -> PolicyDecision {
        let preferred = self.temperament.preferred_action(snapshot.view);
        if let Some(idx) = position_of(snapshot, &preferred) {
            return PolicyDecision::new(idx, Some(preferred.name().to_string()));
        }
        let idx = position_of(snapshot, &Action::Back).unwrap_or(0);
        PolicyDecision::new(idx, Some(format!("{} unavailable", preferred.name())))
    }
}

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl PlayerPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn pick_option(&mut self, snapshot: &Snapshot) -> PolicyDecision {
        let offered = snapshot.offer.options.len().max(1);
        let idx = self.rng.gen_range(0..offered);
        PolicyDecision::new(idx, Some(format!("roll {idx}/{offered}")))
    }
}

fn position_of(snapshot: &Snapshot, action: &Action) -> Option<usize> {
    snapshot
        .offer
        .options
        .iter()
        .position(|option| &option.action == action)
}
