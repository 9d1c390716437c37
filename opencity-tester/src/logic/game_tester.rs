use anyhow::Result;
use colored::Colorize;
use opencity_game::{GameEngine, SessionConfig, Snapshot};
use std::sync::Arc;

use crate::common::util::hex_digest;
use crate::logic::policy::GameplayStrategy;
use crate::logic::simulation::{
    DEFAULT_MAX_TURNS, DecisionRecord, SimulationConfig, SimulationSession,
};

#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub strategy: GameplayStrategy,
    pub max_turns: Option<u32>,
    /// Run the same seed a second time and keep its digest.
    pub replay: bool,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub fn new(strategy: GameplayStrategy) -> Self {
        Self {
            strategy,
            max_turns: None,
            replay: false,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    #[must_use]
    pub const fn with_replay(mut self) -> Self {
        self.replay = true;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// Complete record of a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub strategy: GameplayStrategy,
    pub initial_snapshot: Snapshot,
    pub final_snapshot: Snapshot,
    pub decisions: Vec<DecisionRecord>,
    pub violations: Vec<String>,
    pub outcome_keys: Vec<String>,
    pub digest: [u8; 32],
    pub replay_digest: Option<[u8; 32]>,
}

impl SimulationSummary {
    #[must_use]
    pub fn digest_hex(&self) -> String {
        hex_digest(&self.digest)
    }
}

/// Headless deterministic runner for the engine.
#[derive(Debug, Clone)]
pub struct GameTester {
    engine: GameEngine,
    base_config: SessionConfig,
    max_turns_override: Option<u32>,
    verbose: bool,
}

impl GameTester {
    #[must_use]
    pub fn new(base_config: SessionConfig, verbose: bool) -> Self {
        Self {
            engine: GameEngine::default(),
            base_config,
            max_turns_override: None,
            verbose,
        }
    }

    /// Cap every plan at `max_turns`, ignoring the plan's own budget.
    #[must_use]
    pub fn with_max_turns(mut self, max_turns: Option<u32>) -> Self {
        self.max_turns_override = max_turns;
        self
    }

    #[must_use]
    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    /// Drive one seeded playthrough under the plan's strategy.
    ///
    /// # Errors
    ///
    /// Fails when the session cannot start or rejects an offered option.
    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> Result<SimulationSummary> {
        let max_turns = self
            .max_turns_override
            .or(plan.max_turns)
            .unwrap_or(DEFAULT_MAX_TURNS);
        let config = SimulationConfig::new(plan.strategy, seed).with_max_turns(max_turns);

        if self.verbose {
            println!(
                "🎮 Starting simulation | seed:{seed} policy:{} turns:{max_turns}",
                plan.strategy.label()
            );
        }

        let mut summary = self.run_once(config)?;
        if plan.replay {
            summary.replay_digest = Some(self.run_once(config)?.digest);
        }

        if self.verbose {
            let status = &summary.final_snapshot.status;
            println!(
                "📊 Final | cash:${} wanted:{} power:{} completed:{} abandoned:{} digest:{}",
                status.cash,
                status.wanted,
                status.personal_power,
                status.missions_completed,
                status.missions_abandoned,
                summary.digest_hex().dimmed()
            );
        }

        Ok(summary)
    }

    fn run_once(&self, config: SimulationConfig) -> Result<SimulationSummary> {
        let mut session = SimulationSession::new(&self.engine, &self.base_config, config)?;
        let mut policy = config.strategy.create_policy(config.seed);
        let initial_snapshot = session.snapshot().clone();
        let mut decisions = Vec::new();
        let mut violations = Vec::new();
        let mut outcome_keys = Vec::new();

        while !session.is_finished() {
            let outcome = session.advance(policy.as_mut())?;
            violations.extend(
                outcome
                    .violations
                    .into_iter()
                    .map(|v| format!("turn {}: {v}", outcome.decision.turn)),
            );
            outcome_keys.extend(outcome.log_key);
            decisions.push(outcome.decision);
        }

        let (final_snapshot, digest) = session.finish();
        Ok(SimulationSummary {
            seed: config.seed,
            strategy: config.strategy,
            initial_snapshot,
            final_snapshot,
            decisions,
            violations,
            outcome_keys,
            digest,
            replay_digest: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tester() -> GameTester {
        GameTester::new(SessionConfig::default(), false)
    }

    #[test]
    fn run_plan_honours_plan_budget() {
        let plan = SimulationPlan::new(GameplayStrategy::Random).with_max_turns(25);
        let summary = tester().run_plan(&plan, 7).unwrap();
        assert_eq!(summary.decisions.len(), 25);
        assert_eq!(summary.final_snapshot.turn, 25);
        assert_eq!(summary.initial_snapshot.turn, 0);
        assert!(summary.replay_digest.is_none());
    }

    #[test]
    fn override_beats_plan_budget() {
        let plan = SimulationPlan::new(GameplayStrategy::Cautious).with_max_turns(25);
        let summary = tester()
            .with_max_turns(Some(4))
            .run_plan(&plan, 7)
            .unwrap();
        assert_eq!(summary.decisions.len(), 4);
    }

    #[test]
    fn replay_reproduces_digest() {
        let plan = SimulationPlan::new(GameplayStrategy::Random)
            .with_max_turns(60)
            .with_replay();
        let summary = tester().run_plan(&plan, 1337).unwrap();
        assert_eq!(summary.replay_digest, Some(summary.digest));
        assert_eq!(summary.digest_hex().len(), 64);
    }

    #[test]
    fn cautious_runs_complete_missions() {
        let plan = SimulationPlan::new(GameplayStrategy::Cautious);
        for seed in [1, 2, 3, 1337] {
            let summary = tester().run_plan(&plan, seed).unwrap();
            assert!(summary.violations.is_empty(), "{:?}", summary.violations);
            assert!(summary.final_snapshot.status.missions_completed >= 1);
            assert!(
                summary
                    .outcome_keys
                    .iter()
                    .any(|key| key == "log.mission.completed")
            );
        }
    }

    #[test]
    fn expectations_see_the_summary() {
        let plan = SimulationPlan::new(GameplayStrategy::Reckless)
            .with_max_turns(3)
            .with_expectation(|summary: &SimulationSummary| -> Result<()> {
                anyhow::ensure!(summary.decisions.len() == 3, "wrong turn count");
                Ok(())
            });
        let summary = tester().run_plan(&plan, 2).unwrap();
        for expectation in &plan.expectations {
            expectation.evaluate(&summary).unwrap();
        }
    }
}
