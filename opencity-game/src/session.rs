//! Game session orchestrator.
//!
//! A [`GameSession`] owns one player profile, the active-mission slot, the
//! mission pool and the randomness stream. Every input is an [`Action`]; the
//! session validates it against the current [`Screen`], applies it and hands
//! back a [`Snapshot`]. Failed actions leave the session untouched.
use serde::{Deserialize, Serialize};
use smallvec::smallvec;
use std::sync::Arc;

use crate::actions::{Action, Choice, MenuEntry, ShopSku};
use crate::config::{ConfigError, SessionConfig};
use crate::constants::{
    AUCTION_SABOTAGE_BASE, AUCTION_SABOTAGE_HEAT, AUCTION_SABOTAGE_PAYOUT,
    COMPLETION_HEAT_PER_RISK, FOUND_CASH_AMOUNT, GANG_FLEE_CHANCE, GANG_FLEE_ESCAPE_HEAT,
    GANG_FLEE_ROBBED, GANG_TRIBUTE, GARAGE_SPEED_GAIN, GARAGE_STEALTH_GAIN,
    HEIST_AGGRESSIVE_BASE, HEIST_AGGRESSIVE_BONUS, HEIST_AGGRESSIVE_FAIL_HEAT,
    HEIST_AGGRESSIVE_FAIL_LOSS, HEIST_AGGRESSIVE_HEAT, HEIST_SILENT_BASE, HEIST_SILENT_FAIL_HEAT,
    HEIST_SILENT_FAIL_LOSS, HEIST_SILENT_HEAT, LOG_AUCTION_BID, LOG_AUCTION_SABOTAGE_BURNED,
    LOG_AUCTION_SABOTAGE_PAID, LOG_CASH_LEFT, LOG_CASH_TAKEN, LOG_DEAL_ACCEPTED,
    LOG_DEAL_DECLINED, LOG_ENCOUNTER_TRIGGERED, LOG_GANG_FLEE_ESCAPED, LOG_GANG_FLEE_ROBBED,
    LOG_GANG_PAID, LOG_GARAGE_UPGRADED, LOG_HEIST_FAILED, LOG_MISSION_ACCEPTED,
    LOG_MISSION_CANCELLED, LOG_MISSION_COMPLETED, LOG_MISSION_POOL_EMPTY,
    LOG_POLICE_COMPLY_CLEARED, LOG_POLICE_COMPLY_FINED, LOG_POLICE_FLEE_CAUGHT,
    LOG_POLICE_FLEE_ESCAPED, LOG_POWER_GAINED, LOG_RAID_FLEE_CAUGHT, LOG_RAID_FLEE_ESCAPED,
    LOG_RAID_SURRENDER, LOG_RAID_TRIGGERED, LOG_SESSION_START, LOG_SHOP_DECLINED,
    LOG_TAIL_LOST, LOG_TAIL_SPOTTED, LOG_TRAVEL_ARRIVED, LOG_TRAVEL_NO_NEIGHBORS,
    LOG_VEHICLE_PURCHASED, LOG_WANTED_REDUCED, POLICE_COMPLY_CLEAR_CHANCE, POLICE_COMPLY_FINE,
    POLICE_COMPLY_FINE_HEAT, POLICE_COMPLY_RELIEF, POLICE_FLEE_BASE, POLICE_FLEE_CAUGHT_FINE,
    POLICE_FLEE_CAUGHT_HEAT, POLICE_FLEE_ESCAPE_HEAT, POLICE_FLEE_STEALTH_WEIGHT,
    POWER_PURCHASE_GAIN, RAID_FLEE_BASE, RAID_FLEE_CAUGHT_FINE, RAID_FLEE_CAUGHT_HEAT,
    RAID_FLEE_ESCAPE_HEAT, RAID_FLEE_STEALTH_WEIGHT, RAID_SURRENDER_FINE,
    RAID_SURRENDER_WANTED_RELIEF, STREET_DEAL_HEAT, STREET_DEAL_PAYOUT, TAIL_CLOSE_BASE,
    TAIL_CLOSE_FAIL_HEAT, TAIL_DISTANT_BASE, WANTED_REDUCTION_AMOUNT,
};
use crate::encounters::{EncounterEngine, EncounterType};
use crate::error::GameError;
use crate::missions::{Mission, MissionFactory, MissionKind};
use crate::numbers::scale_round;
use crate::power::boosted_chance;
use crate::rng::{RandomSource, SeededRandom};
use crate::snapshot::{
    MenuView, MissionPhase, NeighborView, Offer, OfferedOption, OfferedOptions, Snapshot,
    StatusBlock, View,
};
use crate::state::PlayerProfile;
use crate::vehicle::Vehicle;
use crate::world::WorldGraph;

/// The currently offered choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Idle,
    Menu,
    Travel,
    Missions,
    Raid,
    Encounter(EncounterType),
    Garage,
    Market,
    Auction,
    Status,
}

impl Screen {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Menu => "menu",
            Self::Travel => "travel",
            Self::Missions => "missions",
            Self::Raid => "raid",
            Self::Encounter(_) => "encounter",
            Self::Garage => "garage",
            Self::Market => "market",
            Self::Auction => "auction",
            Self::Status => "status",
        }
    }

    /// Raids and encounters must be resolved before anything else happens.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Raid | Self::Encounter(_))
    }

    const fn for_menu_entry(entry: MenuEntry) -> Self {
        match entry {
            MenuEntry::Travel => Self::Travel,
            MenuEntry::Missions => Self::Missions,
            MenuEntry::Garage => Self::Garage,
            MenuEntry::Market => Self::Market,
            MenuEntry::Auction => Self::Auction,
            MenuEntry::Status => Self::Status,
        }
    }
}

/// One outcome key recorded in the session journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub turn: u64,
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct GameSession<R: RandomSource = SeededRandom> {
    world: Arc<WorldGraph>,
    profile: PlayerProfile,
    active_mission: Option<Mission>,
    available: Vec<Mission>,
    encounters: EncounterEngine,
    factory: MissionFactory,
    rng: R,
    screen: Screen,
    menu_cursor: usize,
    journal: Vec<JournalEntry>,
    seed: Option<u64>,
    turn: u64,
}

impl GameSession<SeededRandom> {
    /// Start a session in the default city.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the configuration is invalid.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        Self::with_world(config, Arc::new(WorldGraph::default_city()))
    }

    /// Start a session in a caller-supplied world. Without a configured seed
    /// one is drawn from entropy and reported in every snapshot.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the configuration does not fit the world.
    pub fn with_world(config: SessionConfig, world: Arc<WorldGraph>) -> Result<Self, ConfigError> {
        let rng = config
            .seed
            .map_or_else(SeededRandom::from_entropy, SeededRandom::new);
        let seed = rng.seed();
        let mut session = Self::with_world_and_rng(config, world, rng)?;
        session.seed = Some(seed);
        Ok(session)
    }
}

impl<R: RandomSource> GameSession<R> {
    /// Start a session with an explicit randomness source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the configuration does not fit the world.
    pub fn with_world_and_rng(
        config: SessionConfig,
        world: Arc<WorldGraph>,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate_for(&world)?;
        let profile = PlayerProfile::new(
            config.start_location_id(),
            config.initial_cash,
            config.initial_wanted,
            config.initial_vehicle.clone(),
        );
        let factory = MissionFactory::new(world.location_ids());
        let mut session = Self {
            world,
            profile,
            active_mission: None,
            available: Vec::new(),
            encounters: EncounterEngine::new(),
            factory,
            rng,
            screen: Screen::Idle,
            menu_cursor: 0,
            journal: Vec::new(),
            seed: config.seed,
            turn: 0,
        };
        session.refresh_pool();
        session.journal.push(JournalEntry {
            turn: 0,
            key: LOG_SESSION_START.to_string(),
        });
        log::debug!(
            "session started at {} with {} missions available",
            session.profile.current_location_id(),
            session.available.len()
        );
        Ok(session)
    }

    #[must_use]
    pub const fn profile(&self) -> &PlayerProfile {
        &self.profile
    }

    #[cfg(any(test, feature = "test-support"))]
    /// Mutate the profile directly. Profile setters clamp, so invariants
    /// hold whatever the closure does.
    pub fn with_profile_mut<F, T>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut PlayerProfile) -> T,
    {
        f(&mut self.profile)
    }

    #[must_use]
    pub fn world(&self) -> &WorldGraph {
        &self.world
    }

    /// Shared handle to the world, for starting sibling sessions.
    #[must_use]
    pub fn world_handle(&self) -> Arc<WorldGraph> {
        Arc::clone(&self.world)
    }

    #[must_use]
    pub const fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub const fn active_mission(&self) -> Option<&Mission> {
        self.active_mission.as_ref()
    }

    #[must_use]
    pub fn available_missions(&self) -> &[Mission] {
        &self.available
    }

    #[must_use]
    pub fn journal(&self) -> &[JournalEntry] {
        &self.journal
    }

    /// Journal keys in the order they were recorded.
    #[must_use]
    pub fn logs(&self) -> Vec<&str> {
        self.journal.iter().map(|entry| entry.key.as_str()).collect()
    }

    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    #[must_use]
    pub const fn turn(&self) -> u64 {
        self.turn
    }

    #[must_use]
    pub const fn menu_cursor(&self) -> usize {
        self.menu_cursor
    }

    #[must_use]
    pub const fn rng(&self) -> &R {
        &self.rng
    }

    #[cfg(any(test, feature = "test-support"))]
    /// Direct access to the randomness stream, for queueing scripted draws.
    pub const fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    #[cfg(any(test, feature = "test-support"))]
    /// Replace the available pool, e.g. to stage a specific job.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NotFound` when a mission references an unknown
    /// location. The pool is left unchanged in that case.
    pub fn replace_available_missions(&mut self, missions: Vec<Mission>) -> Result<(), GameError> {
        for mission in &missions {
            self.world.location(&mission.from_location_id)?;
            self.world.location(&mission.to_location_id)?;
        }
        self.available = missions
            .into_iter()
            .map(|mut mission| {
                mission.accepted = false;
                mission.completed = false;
                mission
            })
            .collect();
        Ok(())
    }

    /// Apply one action and describe the resulting state.
    ///
    /// # Errors
    ///
    /// Returns `GameError` when the action is not valid in the current state;
    /// the session is unchanged in that case.
    pub fn apply(&mut self, action: Action) -> Result<Snapshot, GameError> {
        log::debug!(
            "turn {}: {} on {} screen",
            self.turn + 1,
            action.name(),
            self.screen.name()
        );
        if let Err(err) = self.dispatch(&action) {
            log::debug!("rejected {}: {err}", action.name());
            return Err(err);
        }
        self.turn = self.turn.saturating_add(1);
        Ok(self.snapshot())
    }

    /// Apply the `index`-th currently offered option.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidAction` for an index past the offered
    /// options, or whatever the chosen action returns.
    pub fn choose(&mut self, index: usize) -> Result<Snapshot, GameError> {
        let action = self
            .offer()
            .options
            .into_iter()
            .nth(index)
            .map(|option| option.action)
            .ok_or(GameError::InvalidAction {
                action: "choose",
                screen: self.screen.name(),
            })?;
        self.apply(action)
    }

    /// # Errors
    ///
    /// Fails while a raid or encounter is pending.
    pub fn open_menu(&mut self) -> Result<Snapshot, GameError> {
        self.apply(Action::OpenMenu)
    }

    /// # Errors
    ///
    /// Fails outside the menu screen.
    pub fn select_menu(&mut self) -> Result<Snapshot, GameError> {
        self.apply(Action::SelectMenu)
    }

    /// # Errors
    ///
    /// Fails while a raid or encounter is pending.
    pub fn back(&mut self) -> Result<Snapshot, GameError> {
        self.apply(Action::Back)
    }

    /// # Errors
    ///
    /// Fails while a raid or encounter is pending.
    pub fn show_travel(&mut self) -> Result<Snapshot, GameError> {
        self.apply(Action::ShowTravel)
    }

    /// # Errors
    ///
    /// Fails while a raid or encounter is pending.
    pub fn show_missions(&mut self) -> Result<Snapshot, GameError> {
        self.apply(Action::ShowMissions)
    }

    /// Move to `target`, then roll for a raid or an encounter.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, `InvalidTarget` when the target is
    /// neither adjacent nor the active mission's destination.
    pub fn travel(&mut self, target: &str) -> Result<Snapshot, GameError> {
        self.apply(Action::Travel {
            target: target.to_string(),
        })
    }

    /// # Errors
    ///
    /// Fails while a raid or encounter is pending.
    pub fn travel_random(&mut self) -> Result<Snapshot, GameError> {
        self.apply(Action::TravelRandom)
    }

    /// # Errors
    ///
    /// `InvalidAction` without an active mission.
    pub fn travel_to_mission_target(&mut self) -> Result<Snapshot, GameError> {
        self.apply(Action::TravelToMissionTarget)
    }

    /// # Errors
    ///
    /// `InvalidAction` when a mission is already active.
    pub fn accept_mission(&mut self) -> Result<Snapshot, GameError> {
        self.apply(Action::AcceptMission)
    }

    /// # Errors
    ///
    /// Fails while a raid or encounter is pending.
    pub fn cancel_mission(&mut self) -> Result<Snapshot, GameError> {
        self.apply(Action::CancelMission)
    }

    /// # Errors
    ///
    /// `InvalidAction` unless a delivery is active and the player stands at
    /// its drop-off.
    pub fn deliver_mission(&mut self) -> Result<Snapshot, GameError> {
        self.apply(Action::DeliverMission)
    }

    /// # Errors
    ///
    /// `InvalidAction` when no raid or encounter is pending.
    pub fn choose_encounter_option(&mut self, choice: Choice) -> Result<Snapshot, GameError> {
        self.apply(Action::ChooseEncounterOption { choice })
    }

    /// # Errors
    ///
    /// `InvalidAction` unless a heist is active at its target or a tail is
    /// active.
    pub fn choose_mission_method(&mut self, choice: Choice) -> Result<Snapshot, GameError> {
        self.apply(Action::ChooseMissionMethod { choice })
    }

    /// # Errors
    ///
    /// Fails while a raid or encounter is pending.
    pub fn shop(&mut self, sku: ShopSku) -> Result<Snapshot, GameError> {
        self.apply(Action::Shop { sku })
    }

    fn dispatch(&mut self, action: &Action) -> Result<(), GameError> {
        if self.screen.is_pending() && !matches!(action, Action::ChooseEncounterOption { .. }) {
            return Err(self.invalid(action));
        }
        match action {
            Action::OpenMenu => {
                if self.screen == Screen::Menu {
                    self.menu_cursor = (self.menu_cursor + 1) % MenuEntry::ALL.len();
                } else {
                    self.screen = Screen::Menu;
                }
            }
            Action::SelectMenu => {
                if self.screen != Screen::Menu {
                    return Err(self.invalid(action));
                }
                let entry = MenuEntry::ALL
                    .get(self.menu_cursor)
                    .copied()
                    .unwrap_or(MenuEntry::Travel);
                self.screen = Screen::for_menu_entry(entry);
            }
            Action::Back => self.screen = Screen::Idle,
            Action::ShowTravel => self.screen = Screen::Travel,
            Action::ShowMissions => self.screen = Screen::Missions,
            Action::Travel { target } => self.travel_to(target)?,
            Action::TravelRandom => self.travel_to_random_neighbor()?,
            Action::TravelToMissionTarget => {
                let target = self
                    .active_mission
                    .as_ref()
                    .map(|mission| mission.to_location_id.clone())
                    .ok_or_else(|| self.invalid(action))?;
                self.travel_to(&target)?;
            }
            Action::AcceptMission => self.accept(action)?,
            Action::CancelMission => self.cancel(),
            Action::DeliverMission => self.deliver(action)?,
            Action::ChooseEncounterOption { choice } => match self.screen {
                Screen::Raid => self.resolve_raid(*choice),
                Screen::Encounter(kind) => self.resolve_encounter(kind, *choice),
                _ => return Err(self.invalid(action)),
            },
            Action::ChooseMissionMethod { choice } => self.run_mission_method(action, *choice)?,
            Action::Shop { sku } => self.purchase(*sku),
        }
        Ok(())
    }

    fn invalid(&self, action: &Action) -> GameError {
        GameError::InvalidAction {
            action: action.name(),
            screen: self.screen.name(),
        }
    }

    fn record(&mut self, key: &str) {
        self.journal.push(JournalEntry {
            turn: self.turn + 1,
            key: key.to_string(),
        });
    }

    fn refresh_pool(&mut self) {
        self.factory.refresh_pool(&mut self.available, &mut self.rng);
    }

    fn power(&self) -> u32 {
        self.profile.personal_power()
    }

    fn travel_to(&mut self, target: &str) -> Result<(), GameError> {
        let world = Arc::clone(&self.world);
        let destination = world.location(target)?;
        let district = world.district(&destination.district_id)?;
        let current = self.profile.current_location_id();
        let mission_shortcut = self
            .active_mission
            .as_ref()
            .is_some_and(|mission| mission.to_location_id == target);
        if !destination.is_adjacent_to(current) && !mission_shortcut {
            return Err(GameError::invalid_target(current, target));
        }

        log::debug!("travel {current} -> {target}");
        self.profile.relocate(target);
        self.record(LOG_TRAVEL_ARRIVED);

        let wanted = self.profile.wanted();
        if self.encounters.try_police_raid(wanted, &mut self.rng) {
            log::debug!("police raid at {target} (wanted {wanted})");
            self.record(LOG_RAID_TRIGGERED);
            self.screen = Screen::Raid;
            return Ok(());
        }
        self.screen = match self
            .encounters
            .try_generate(district.danger, wanted, &mut self.rng)
        {
            Some(kind) => {
                log::debug!("encounter {kind} at {target}");
                self.record(LOG_ENCOUNTER_TRIGGERED);
                Screen::Encounter(kind)
            }
            None => Screen::Idle,
        };
        Ok(())
    }

    fn travel_to_random_neighbor(&mut self) -> Result<(), GameError> {
        let world = Arc::clone(&self.world);
        let neighbors = world.neighbors_of(self.profile.current_location_id())?;
        let Some(target) = self
            .rng
            .pick_index(neighbors.len())
            .and_then(|idx| neighbors.get(idx))
        else {
            self.record(LOG_TRAVEL_NO_NEIGHBORS);
            self.screen = Screen::Idle;
            return Ok(());
        };
        self.travel_to(target)
    }

    fn accept(&mut self, action: &Action) -> Result<(), GameError> {
        if self.active_mission.is_some() {
            return Err(self.invalid(action));
        }
        match self.rng.pick_index(self.available.len()) {
            Some(idx) => {
                let mut mission = self.available.remove(idx);
                mission.accepted = true;
                log::debug!("accepted mission {}", mission.id);
                self.active_mission = Some(mission);
                self.record(LOG_MISSION_ACCEPTED);
            }
            None => self.record(LOG_MISSION_POOL_EMPTY),
        }
        self.screen = Screen::Idle;
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(mission) = self.active_mission.take() {
            self.profile.record_abandon();
            log::info!("mission {} abandoned", mission.id);
            self.refresh_pool();
            self.record(LOG_MISSION_CANCELLED);
        }
        self.screen = Screen::Idle;
    }

    fn deliver(&mut self, action: &Action) -> Result<(), GameError> {
        let here = self.profile.current_location_id();
        let Some(mission) = self.active_mission.as_ref().filter(|mission| {
            mission.kind == MissionKind::Delivery && mission.to_location_id == here
        }) else {
            return Err(self.invalid(action));
        };
        let payout = mission.reward;
        let heat = completion_heat(mission.risk);
        self.finish_mission(payout, heat);
        Ok(())
    }

    fn run_mission_method(&mut self, action: &Action, choice: Choice) -> Result<(), GameError> {
        let Some(mission) = self.active_mission.as_ref() else {
            return Err(self.invalid(action));
        };
        let phase = MissionPhase::of(mission, self.profile.current_location_id());
        let (reward, risk) = (mission.reward, mission.risk);
        let power = self.power();
        match (phase, choice) {
            (MissionPhase::HeistAtTarget, Choice::Primary) => {
                if self.rng.chance(boosted_chance(HEIST_SILENT_BASE, power)) {
                    self.finish_mission(reward, HEIST_SILENT_HEAT);
                } else {
                    self.fail_heist(HEIST_SILENT_FAIL_LOSS, HEIST_SILENT_FAIL_HEAT);
                }
            }
            (MissionPhase::HeistAtTarget, Choice::Secondary) => {
                if self.rng.chance(boosted_chance(HEIST_AGGRESSIVE_BASE, power)) {
                    let payout = scale_round(reward, HEIST_AGGRESSIVE_BONUS);
                    self.finish_mission(payout, HEIST_AGGRESSIVE_HEAT);
                } else {
                    self.fail_heist(HEIST_AGGRESSIVE_FAIL_LOSS, HEIST_AGGRESSIVE_FAIL_HEAT);
                }
            }
            (MissionPhase::TailInProgress, _) => {
                let base = match choice {
                    Choice::Primary => TAIL_CLOSE_BASE,
                    Choice::Secondary => TAIL_DISTANT_BASE,
                };
                if self.rng.chance(boosted_chance(base, power)) {
                    self.finish_mission(reward, completion_heat(risk));
                } else if choice == Choice::Primary {
                    self.profile.adjust_wanted(TAIL_CLOSE_FAIL_HEAT);
                    self.record(LOG_TAIL_SPOTTED);
                    self.screen = Screen::Idle;
                } else {
                    self.record(LOG_TAIL_LOST);
                    self.screen = Screen::Idle;
                }
            }
            _ => return Err(self.invalid(action)),
        }
        Ok(())
    }

    fn fail_heist(&mut self, loss: i32, heat: i32) {
        self.profile.debit(loss);
        self.profile.adjust_wanted(heat);
        self.record(LOG_HEIST_FAILED);
        self.screen = Screen::Idle;
    }

    fn finish_mission(&mut self, payout: i32, heat: i32) {
        self.profile.credit(payout);
        self.profile.adjust_wanted(heat);
        if let Some(mut mission) = self.active_mission.take() {
            mission.completed = true;
            self.profile.record_completion();
            log::info!("mission {} completed for ${payout}", mission.id);
        }
        self.refresh_pool();
        self.record(LOG_MISSION_COMPLETED);
        self.screen = Screen::Idle;
    }

    fn resolve_raid(&mut self, choice: Choice) {
        match choice {
            Choice::Primary => {
                self.profile.debit(RAID_SURRENDER_FINE);
                self.profile.adjust_wanted(-RAID_SURRENDER_WANTED_RELIEF);
                self.record(LOG_RAID_SURRENDER);
            }
            Choice::Secondary => {
                let stealth = self.profile.vehicle().stealth_factor();
                let escape = stealth.mul_add(RAID_FLEE_STEALTH_WEIGHT, RAID_FLEE_BASE);
                if self.rng.chance(escape) {
                    self.profile.adjust_wanted(RAID_FLEE_ESCAPE_HEAT);
                    self.record(LOG_RAID_FLEE_ESCAPED);
                } else {
                    self.profile.debit(RAID_FLEE_CAUGHT_FINE);
                    self.profile.adjust_wanted(RAID_FLEE_CAUGHT_HEAT);
                    self.record(LOG_RAID_FLEE_CAUGHT);
                }
            }
        }
        self.screen = Screen::Idle;
    }

    fn resolve_encounter(&mut self, kind: EncounterType, choice: Choice) {
        match (kind, choice) {
            (EncounterType::PoliceCheck, Choice::Primary) => {
                if self.rng.chance(POLICE_COMPLY_CLEAR_CHANCE) {
                    self.profile.adjust_wanted(-POLICE_COMPLY_RELIEF);
                    self.record(LOG_POLICE_COMPLY_CLEARED);
                } else {
                    self.profile.debit(POLICE_COMPLY_FINE);
                    self.profile.adjust_wanted(POLICE_COMPLY_FINE_HEAT);
                    self.record(LOG_POLICE_COMPLY_FINED);
                }
            }
            (EncounterType::PoliceCheck, Choice::Secondary) => {
                let stealth = self.profile.vehicle().stealth_factor();
                let escape = stealth.mul_add(POLICE_FLEE_STEALTH_WEIGHT, POLICE_FLEE_BASE);
                if self.rng.chance(escape) {
                    self.profile.adjust_wanted(POLICE_FLEE_ESCAPE_HEAT);
                    self.record(LOG_POLICE_FLEE_ESCAPED);
                } else {
                    self.profile.debit(POLICE_FLEE_CAUGHT_FINE);
                    self.profile.adjust_wanted(POLICE_FLEE_CAUGHT_HEAT);
                    self.record(LOG_POLICE_FLEE_CAUGHT);
                }
            }
            (EncounterType::GangAmbush, Choice::Primary) => {
                self.profile.debit(GANG_TRIBUTE);
                self.record(LOG_GANG_PAID);
            }
            (EncounterType::GangAmbush, Choice::Secondary) => {
                if self.rng.chance(GANG_FLEE_CHANCE) {
                    self.profile.adjust_wanted(GANG_FLEE_ESCAPE_HEAT);
                    self.record(LOG_GANG_FLEE_ESCAPED);
                } else {
                    self.profile.debit(GANG_FLEE_ROBBED);
                    self.record(LOG_GANG_FLEE_ROBBED);
                }
            }
            (EncounterType::StreetDeal, Choice::Primary) => {
                self.profile.credit(STREET_DEAL_PAYOUT);
                self.profile.adjust_wanted(STREET_DEAL_HEAT);
                self.record(LOG_DEAL_ACCEPTED);
            }
            (EncounterType::StreetDeal, Choice::Secondary) => self.record(LOG_DEAL_DECLINED),
            (EncounterType::FoundCash, Choice::Primary) => {
                self.profile.credit(FOUND_CASH_AMOUNT);
                self.record(LOG_CASH_TAKEN);
            }
            (EncounterType::FoundCash, Choice::Secondary) => self.record(LOG_CASH_LEFT),
        }
        self.screen = Screen::Idle;
    }

    fn purchase(&mut self, sku: ShopSku) {
        self.screen = Screen::Idle;
        if !self.profile.try_spend(sku.cost()) {
            log::debug!(
                "cannot afford {} (cash {}, cost {})",
                sku.key(),
                self.profile.cash(),
                sku.cost()
            );
            self.record(LOG_SHOP_DECLINED);
            return;
        }
        match sku {
            ShopSku::GarageUpgrade => {
                self.profile
                    .vehicle_mut()
                    .upgrade(GARAGE_SPEED_GAIN, GARAGE_STEALTH_GAIN);
                self.record(LOG_GARAGE_UPGRADED);
            }
            ShopSku::BuySedan => {
                self.profile.replace_vehicle(Vehicle::sedan());
                self.record(LOG_VEHICLE_PURCHASED);
            }
            ShopSku::BuySport => {
                self.profile.replace_vehicle(Vehicle::sport());
                self.record(LOG_VEHICLE_PURCHASED);
            }
            ShopSku::AuctionBid => self.record(LOG_AUCTION_BID),
            ShopSku::AuctionSabotage => {
                let power = self.power();
                if self.rng.chance(boosted_chance(AUCTION_SABOTAGE_BASE, power)) {
                    self.profile.credit(AUCTION_SABOTAGE_PAYOUT);
                    self.record(LOG_AUCTION_SABOTAGE_PAID);
                } else {
                    self.profile.adjust_wanted(AUCTION_SABOTAGE_HEAT);
                    self.record(LOG_AUCTION_SABOTAGE_BURNED);
                }
            }
            ShopSku::BuyPower => {
                self.profile.add_power(POWER_PURCHASE_GAIN);
                self.record(LOG_POWER_GAINED);
            }
            ShopSku::ReduceWanted => {
                self.profile.adjust_wanted(-WANTED_REDUCTION_AMOUNT);
                self.record(LOG_WANTED_REDUCED);
            }
        }
    }

    /// Resolved view of the current screen.
    #[must_use]
    pub fn view(&self) -> View {
        match self.screen {
            Screen::Idle => View::Idle,
            Screen::Menu => View::Menu,
            Screen::Travel => View::Travel,
            Screen::Missions => match &self.active_mission {
                None => View::MissionBrowsing,
                Some(mission) => View::MissionInProgress {
                    kind: mission.kind,
                    phase: MissionPhase::of(mission, self.profile.current_location_id()),
                },
            },
            Screen::Raid => View::Raid,
            Screen::Encounter(encounter) => View::Encounter { encounter },
            Screen::Garage => View::Garage,
            Screen::Market => View::Market,
            Screen::Auction => View::Auction,
            Screen::Status => View::Status,
        }
    }

    /// Options currently on offer, each carrying the action it applies.
    #[must_use]
    pub fn offer(&self) -> Offer {
        let back = || OfferedOption::new("option.back", Action::Back);
        let (prefix, options): (String, OfferedOptions) = match self.view() {
            View::Idle => (
                "screen.idle".to_string(),
                smallvec![
                    OfferedOption::new("option.menu", Action::OpenMenu),
                    OfferedOption::new(
                        if self.active_mission.is_some() {
                            "option.mission"
                        } else {
                            "option.missions"
                        },
                        Action::ShowMissions
                    ),
                    OfferedOption::new("option.travel", Action::ShowTravel),
                ],
            ),
            View::Menu => (
                "screen.menu".to_string(),
                smallvec![
                    OfferedOption::new("option.select", Action::SelectMenu),
                    OfferedOption::new("option.next", Action::OpenMenu),
                    back(),
                ],
            ),
            View::Travel => {
                let mut options = OfferedOptions::new();
                let has_neighbors = self
                    .world
                    .neighbors_of(self.profile.current_location_id())
                    .is_ok_and(|neighbors| !neighbors.is_empty());
                if has_neighbors {
                    options.push(OfferedOption::new(
                        "option.travel_random",
                        Action::TravelRandom,
                    ));
                }
                if self.active_mission.is_some() {
                    options.push(OfferedOption::new(
                        "option.travel_to_target",
                        Action::TravelToMissionTarget,
                    ));
                }
                options.push(back());
                ("screen.travel".to_string(), options)
            }
            View::MissionBrowsing => {
                let mut options = OfferedOptions::new();
                if !self.available.is_empty() {
                    options.push(OfferedOption::new(
                        "option.accept_random",
                        Action::AcceptMission,
                    ));
                }
                options.push(back());
                ("screen.missions".to_string(), options)
            }
            View::MissionInProgress { phase, .. } => {
                let options: OfferedOptions = match phase {
                    MissionPhase::DeliveryAtDrop => smallvec![
                        OfferedOption::new("option.deliver", Action::DeliverMission),
                        OfferedOption::new("option.cancel", Action::CancelMission),
                        back(),
                    ],
                    MissionPhase::DeliveryAtPickup
                    | MissionPhase::DeliveryEnRoute
                    | MissionPhase::HeistEnRoute => smallvec![
                        OfferedOption::new(
                            "option.travel_to_target",
                            Action::TravelToMissionTarget
                        ),
                        OfferedOption::new("option.cancel", Action::CancelMission),
                        back(),
                    ],
                    MissionPhase::HeistAtTarget => smallvec![
                        OfferedOption::new(
                            "option.heist.silent",
                            Action::ChooseMissionMethod {
                                choice: Choice::Primary
                            }
                        ),
                        OfferedOption::new(
                            "option.heist.aggressive",
                            Action::ChooseMissionMethod {
                                choice: Choice::Secondary
                            }
                        ),
                        back(),
                    ],
                    MissionPhase::TailInProgress => smallvec![
                        OfferedOption::new(
                            "option.tail.close",
                            Action::ChooseMissionMethod {
                                choice: Choice::Primary
                            }
                        ),
                        OfferedOption::new(
                            "option.tail.distant",
                            Action::ChooseMissionMethod {
                                choice: Choice::Secondary
                            }
                        ),
                        back(),
                    ],
                };
                (format!("mission.{}", phase.key()), options)
            }
            View::Raid => (
                "screen.raid".to_string(),
                pending_options("option.raid.surrender", "option.raid.flee"),
            ),
            View::Encounter { encounter } => {
                let (primary, secondary) = match encounter {
                    EncounterType::PoliceCheck => ("option.police.comply", "option.police.flee"),
                    EncounterType::GangAmbush => ("option.gang.pay", "option.gang.flee"),
                    EncounterType::StreetDeal => ("option.deal.accept", "option.deal.decline"),
                    EncounterType::FoundCash => ("option.found_cash.take", "option.found_cash.leave"),
                };
                (
                    format!("encounter.{}", encounter.key()),
                    pending_options(primary, secondary),
                )
            }
            View::Garage => (
                "screen.garage".to_string(),
                smallvec![shop_option(ShopSku::GarageUpgrade), back()],
            ),
            View::Market => (
                "screen.market".to_string(),
                smallvec![
                    shop_option(ShopSku::BuySedan),
                    shop_option(ShopSku::BuySport),
                    back(),
                ],
            ),
            View::Auction => (
                "screen.auction".to_string(),
                smallvec![
                    shop_option(ShopSku::AuctionBid),
                    shop_option(ShopSku::AuctionSabotage),
                    back(),
                ],
            ),
            View::Status => (
                "screen.status".to_string(),
                smallvec![
                    shop_option(ShopSku::BuyPower),
                    shop_option(ShopSku::ReduceWanted),
                    back(),
                ],
            ),
        };
        Offer {
            title_key: format!("{prefix}.title"),
            body_key: format!("{prefix}.body"),
            options,
        }
    }

    /// Describe the full session state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let location_id = self.profile.current_location_id();
        let location = self.world.location(location_id).ok();
        let district = self.world.district_of(location_id).ok();
        let neighbors = location
            .map(|node| {
                node.neighbors()
                    .iter()
                    .map(|id| NeighborView {
                        id: id.clone(),
                        display_name: self.world.name_of(id).to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Snapshot {
            turn: self.turn,
            seed: self.seed,
            location_id: location_id.to_string(),
            location_name: self.world.name_of(location_id).to_string(),
            district_name: district.map(|d| d.display_name.clone()).unwrap_or_default(),
            district_danger: district.map_or(0, |d| d.danger),
            neighbors,
            status: StatusBlock {
                cash: self.profile.cash(),
                wanted: self.profile.wanted(),
                personal_power: self.profile.personal_power(),
                vehicle: self.profile.vehicle().clone(),
                missions_completed: self.profile.missions_completed(),
                missions_abandoned: self.profile.missions_abandoned(),
                active_mission: self.active_mission.as_ref().map(Mission::summary),
            },
            view: self.view(),
            offer: self.offer(),
            menu: (self.screen == Screen::Menu).then(|| MenuView {
                entries: MenuEntry::ALL.to_vec(),
                cursor: self.menu_cursor,
            }),
            available_missions: self.available.iter().map(Mission::summary).collect(),
            log_key: self
                .journal
                .last()
                .filter(|entry| entry.turn == self.turn)
                .map(|entry| entry.key.clone()),
        }
    }
}

fn completion_heat(risk: i32) -> i32 {
    scale_round(risk, COMPLETION_HEAT_PER_RISK)
}

fn pending_options(primary: &str, secondary: &str) -> OfferedOptions {
    smallvec![
        OfferedOption::new(
            primary,
            Action::ChooseEncounterOption {
                choice: Choice::Primary
            }
        ),
        OfferedOption::new(
            secondary,
            Action::ChooseEncounterOption {
                choice: Choice::Secondary
            }
        ),
    ]
}

fn shop_option(sku: ShopSku) -> OfferedOption {
    OfferedOption::new(format!("option.shop.{}", sku.key()), Action::Shop { sku })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRandom;

    fn quiet_session() -> GameSession<ScriptedRandom> {
        GameSession::with_world_and_rng(
            SessionConfig::with_seed(1),
            Arc::new(WorldGraph::default_city()),
            ScriptedRandom::new(),
        )
        .unwrap()
    }

    #[test]
    fn new_session_starts_idle_with_full_pool() {
        let session = GameSession::new(SessionConfig::with_seed(1337)).unwrap();
        assert_eq!(session.screen(), Screen::Idle);
        assert_eq!(session.profile().cash(), 1_500);
        let kinds: Vec<MissionKind> = session
            .available_missions()
            .iter()
            .map(|m| m.kind)
            .collect();
        assert_eq!(kinds, MissionKind::ALL);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.seed, Some(1337));
        assert_eq!(snapshot.log_key.as_deref(), Some("log.session.start"));
        assert_eq!(snapshot.neighbors.len(), 3);
    }

    #[test]
    fn menu_cursor_wraps_and_selects() {
        let mut session = quiet_session();
        let snap = session.open_menu().unwrap();
        assert_eq!(snap.menu.as_ref().map(|m| m.cursor), Some(0));
        for _ in 0..MenuEntry::ALL.len() {
            session.open_menu().unwrap();
        }
        assert_eq!(session.menu_cursor(), 0);
        session.open_menu().unwrap();
        session.open_menu().unwrap();
        let snap = session.select_menu().unwrap();
        assert_eq!(snap.view, View::Garage);
        assert!(snap.menu.is_none());
        assert!(matches!(
            session.select_menu(),
            Err(GameError::InvalidAction { .. })
        ));
    }

    #[test]
    fn pending_screen_blocks_other_actions() {
        let mut session = quiet_session();
        session.with_profile_mut(|p| p.set_wanted(90));
        session.rng_mut().push_float(0.1);
        let snap = session.travel("bank_dt").unwrap();
        assert_eq!(snap.view, View::Raid);
        let before = session.snapshot();
        for action in [
            Action::Back,
            Action::OpenMenu,
            Action::Travel {
                target: "dt_square".to_string(),
            },
            Action::Shop {
                sku: ShopSku::BuyPower,
            },
        ] {
            assert!(matches!(
                session.apply(action),
                Err(GameError::InvalidAction { screen: "raid", .. })
            ));
        }
        assert_eq!(session.snapshot(), before);
        session.choose_encounter_option(Choice::Primary).unwrap();
        assert_eq!(session.screen(), Screen::Idle);
        assert_eq!(session.profile().wanted(), 65);
        assert_eq!(session.profile().cash(), 1_200);
    }

    #[test]
    fn travel_errors_leave_state_untouched() {
        let mut session = quiet_session();
        let before = session.snapshot();
        assert!(matches!(
            session.travel("atlantis"),
            Err(GameError::NotFound { .. })
        ));
        session.travel("bank_dt").unwrap();
        let before_second = session.snapshot();
        assert!(matches!(
            session.travel("harbor_pier"),
            Err(GameError::InvalidTarget { .. })
        ));
        assert!(matches!(
            session.travel("bank_dt"),
            Err(GameError::InvalidTarget { .. })
        ));
        assert_eq!(session.snapshot(), before_second);
        assert_ne!(before, before_second);
    }

    #[test]
    fn choose_applies_offered_option() {
        let mut session = quiet_session();
        let snap = session.choose(2).unwrap();
        assert_eq!(snap.view, View::Travel);
        assert_eq!(snap.offer.options[0].action, Action::TravelRandom);
        assert!(matches!(
            session.choose(7),
            Err(GameError::InvalidAction {
                action: "choose",
                ..
            })
        ));
    }

    #[test]
    fn encounter_choice_outside_pending_screen_is_rejected() {
        let mut session = quiet_session();
        assert!(matches!(
            session.choose_encounter_option(Choice::Primary),
            Err(GameError::InvalidAction { screen: "idle", .. })
        ));
        assert!(matches!(
            session.deliver_mission(),
            Err(GameError::InvalidAction { .. })
        ));
        assert!(matches!(
            session.travel_to_mission_target(),
            Err(GameError::InvalidAction { .. })
        ));
    }
}
