//! OpenCity Game Engine
//!
//! Platform-agnostic simulation core for the OpenCity crime game: the
//! location graph, the player profile, travel encounters, procedural missions
//! and the session state machine that ties them together. No rendering or
//! input handling lives here; callers drive a [`GameSession`] with
//! [`Action`]s and render the returned [`Snapshot`].

pub mod actions;
pub mod config;
pub mod constants;
pub mod encounters;
pub mod error;
pub mod missions;
pub mod numbers;
pub mod power;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod vehicle;
pub mod world;

// Re-export commonly used types
pub use actions::{Action, Choice, MenuEntry, ShopSku};
pub use config::{ConfigError, DEFAULT_START_LOCATION, SessionConfig};
pub use encounters::{EncounterEngine, EncounterType};
pub use error::GameError;
pub use missions::{Mission, MissionFactory, MissionKind, MissionSummary};
pub use power::{boosted_chance, risk_multiplier};
pub use rng::{RandomSource, ScriptedRandom, SeededRandom};
pub use session::{GameSession, JournalEntry, Screen};
pub use snapshot::{
    MenuView, MissionPhase, NeighborView, Offer, OfferedOption, OfferedOptions, Snapshot,
    StatusBlock, View,
};
pub use state::PlayerProfile;
pub use vehicle::Vehicle;
pub use world::{District, LocationNode, WorldGraph};

use std::sync::Arc;

/// Spawns sessions that share one read-only world.
#[derive(Debug, Clone)]
pub struct GameEngine {
    world: Arc<WorldGraph>,
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(WorldGraph::default_city())
    }
}

impl GameEngine {
    /// Create an engine around a fully built world.
    #[must_use]
    pub fn new(world: WorldGraph) -> Self {
        Self {
            world: Arc::new(world),
        }
    }

    #[must_use]
    pub fn world(&self) -> &WorldGraph {
        &self.world
    }

    /// Start a new seeded session in this engine's world.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid for the world.
    pub fn create_session(&self, config: SessionConfig) -> Result<GameSession, ConfigError> {
        GameSession::with_world(config, Arc::clone(&self.world))
    }

    /// Start a session driven by a caller-supplied randomness source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid for the world.
    pub fn create_session_with_rng<R: RandomSource>(
        &self,
        config: SessionConfig,
        rng: R,
    ) -> Result<GameSession<R>, ConfigError> {
        GameSession::with_world_and_rng(config, Arc::clone(&self.world), rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn sessions_share_world_but_not_state() {
        let engine = GameEngine::default();
        let mut first = engine.create_session(SessionConfig::with_seed(1)).unwrap();
        let second = engine.create_session(SessionConfig::with_seed(1)).unwrap();
        assert!(Arc::ptr_eq(&first.world_handle(), &second.world_handle()));

        first.with_profile_mut(|profile| profile.set_cash(10));
        assert_eq!(first.profile().cash(), 10);
        assert_eq!(second.profile().cash(), 1_500);
    }

    #[test]
    fn sessions_run_concurrently_and_match_per_seed() {
        let engine = GameEngine::default();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = engine.clone();
                thread::spawn(move || {
                    let mut session = engine.create_session(SessionConfig::with_seed(77)).unwrap();
                    let mut snapshots = Vec::new();
                    for _ in 0..40 {
                        let snapshot = match session.choose(0) {
                            Ok(snapshot) => snapshot,
                            Err(_) => session.choose(1).unwrap(),
                        };
                        snapshots.push(snapshot);
                    }
                    snapshots
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for run in &results[1..] {
            assert_eq!(run, &results[0]);
        }
    }

    #[test]
    fn scripted_sessions_report_configured_seed() {
        let engine = GameEngine::default();
        let session = engine
            .create_session_with_rng(SessionConfig::default(), ScriptedRandom::new())
            .unwrap();
        assert_eq!(session.seed(), None);
        assert!(engine.world().contains("dt_square"));
    }
}
