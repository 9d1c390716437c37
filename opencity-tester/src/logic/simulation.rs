use anyhow::{Context, Result};
use opencity_game::{GameEngine, GameSession, MissionKind, SessionConfig, Snapshot, WorldGraph};
use sha2::{Digest, Sha256};

use crate::logic::policy::{GameplayStrategy, PlayerPolicy};

pub const DEFAULT_MAX_TURNS: u32 = 200;

/// Configuration for a simulation session.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub seed: u64,
    pub strategy: GameplayStrategy,
    pub max_turns: u32,
}

impl SimulationConfig {
    #[must_use]
    pub fn new(strategy: GameplayStrategy, seed: u64) -> Self {
        Self {
            seed,
            strategy,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    #[must_use]
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }
}

/// One option picked by a policy.
#[derive(Debug, Clone)]
pub struct DecisionRecord {
    pub turn: u64,
    pub view: String,
    pub choice_index: usize,
    pub choice_label: String,
    pub policy_name: String,
    pub rationale: Option<String>,
}

/// Result of advancing the simulation by one action.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub decision: DecisionRecord,
    pub log_key: Option<String>,
    pub violations: Vec<String>,
}

/// Deterministic policy-driven driver around one [`GameSession`].
pub struct SimulationSession {
    session: GameSession,
    snapshot: Snapshot,
    hasher: Sha256,
    max_turns: u32,
    turns_taken: u32,
}

impl SimulationSession {
    /// Start a session from `base`, overriding its seed.
    ///
    /// # Errors
    ///
    /// Fails when the configuration is rejected or the first snapshot cannot
    /// be serialized.
    pub fn new(engine: &GameEngine, base: &SessionConfig, config: SimulationConfig) -> Result<Self> {
        let session_config = SessionConfig {
            seed: Some(config.seed),
            ..base.clone()
        };
        let session = engine
            .create_session(session_config)
            .context("failed to start session")?;
        let snapshot = session.snapshot();
        let mut hasher = Sha256::new();
        hash_snapshot(&mut hasher, &snapshot)?;
        Ok(Self {
            session,
            snapshot,
            hasher,
            max_turns: config.max_turns,
            turns_taken: 0,
        })
    }

    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.turns_taken >= self.max_turns
    }

    /// Let the policy pick an offered option and apply it.
    ///
    /// # Errors
    ///
    /// Fails when the session rejects the chosen option.
    pub fn advance(&mut self, policy: &mut dyn PlayerPolicy) -> Result<TurnOutcome> {
        let decision = policy.pick_option(&self.snapshot);
        let choice_label = self
            .snapshot
            .offer
            .options
            .get(decision.choice_index)
            .map_or_else(|| "-".to_string(), |option| option.label_key.clone());
        let view = view_label(&self.snapshot)?;
        let turn = self.snapshot.turn;

        let next = self
            .session
            .choose(decision.choice_index)
            .with_context(|| format!("turn {turn}: option {choice_label} rejected"))?;
        hash_snapshot(&mut self.hasher, &next)?;
        let violations = check_invariants(&next, self.session.world());
        self.snapshot = next;
        self.turns_taken += 1;

        log::trace!("turn {turn} {view} -> {choice_label}");

        Ok(TurnOutcome {
            decision: DecisionRecord {
                turn,
                view,
                choice_index: decision.choice_index,
                choice_label,
                policy_name: policy.name().to_string(),
                rationale: decision.rationale,
            },
            log_key: self.snapshot.log_key.clone(),
            violations,
        })
    }

    /// Consume the session, returning the final snapshot and the SHA-256
    /// digest over every snapshot's JSON in order.
    #[must_use]
    pub fn finish(self) -> (Snapshot, [u8; 32]) {
        let digest = self.hasher.finalize();
        let mut bytes = [0_u8; 32];
        bytes.copy_from_slice(&digest);
        (self.snapshot, bytes)
    }
}

fn hash_snapshot(hasher: &mut Sha256, snapshot: &Snapshot) -> Result<()> {
    let json = snapshot.to_json().context("snapshot serialization")?;
    hasher.update(json.as_bytes());
    Ok(())
}

fn view_label(snapshot: &Snapshot) -> Result<String> {
    let value = serde_json::to_value(snapshot.view).context("view serialization")?;
    Ok(value
        .get("view")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("unknown")
        .to_string())
}

/// Profile and mission-pool invariants that must hold after every action.
#[must_use]
pub fn check_invariants(snapshot: &Snapshot, world: &WorldGraph) -> Vec<String> {
    let mut violations = Vec::new();
    let status = &snapshot.status;
    if status.cash < 0 {
        violations.push(format!("cash {} below zero", status.cash));
    }
    if !(0..=100).contains(&status.wanted) {
        violations.push(format!("wanted {} outside 0..=100", status.wanted));
    }
    if !world.contains(&snapshot.location_id) {
        violations.push(format!("unknown location {}", snapshot.location_id));
    }
    let offered = snapshot.offer.options.len();
    if offered == 0 || offered > 3 {
        violations.push(format!("{offered} options offered"));
    }
    for mission in &snapshot.available_missions {
        let same_endpoints = mission.from_location_id == mission.to_location_id;
        let endpoints_ok = match mission.kind {
            MissionKind::Heist => same_endpoints,
            MissionKind::Delivery | MissionKind::Tail => !same_endpoints,
        };
        if !endpoints_ok {
            violations.push(format!("mission {} has invalid endpoints", mission.id));
        }
        if !(0..=100).contains(&mission.risk) || mission.reward <= 0 {
            violations.push(format!("mission {} out of bounds", mission.id));
        }
    }
    if let Some(active) = &status.active_mission
        && snapshot.available_missions.iter().any(|m| m.id == active.id)
    {
        violations.push(format!("active mission {} still in pool", active.id));
    }
    violations
}
