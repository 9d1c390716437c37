use anyhow::{Result, ensure};
use opencity_game::MissionKind;

use crate::logic::{GameplayStrategy, SimulationPlan, SimulationSummary};

// Logic test scenario
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

fn smoke_expectation(summary: &SimulationSummary) -> Result<()> {
    let kinds: Vec<MissionKind> = summary
        .initial_snapshot
        .available_missions
        .iter()
        .map(|mission| mission.kind)
        .collect();
    ensure!(
        kinds == MissionKind::ALL,
        "initial pool should hold one mission of each kind, got {kinds:?}"
    );
    ensure!(
        !summary.decisions.is_empty(),
        "first action should be accepted"
    );
    ensure!(
        u64::try_from(summary.decisions.len()) == Ok(summary.final_snapshot.turn),
        "turn counter should advance once per action"
    );
    Ok(())
}

fn invariant_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.violations.is_empty(),
        "invariants broken: {}",
        summary.violations.join("; ")
    );
    Ok(())
}

fn determinism_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.replay_digest == Some(summary.digest),
        "replay of seed {} diverged from digest {}",
        summary.seed,
        summary.digest_hex()
    );
    Ok(())
}

fn mission_loop_expectation(summary: &SimulationSummary) -> Result<()> {
    invariant_expectation(summary)?;
    ensure!(
        summary.final_snapshot.status.missions_completed >= 1,
        "no mission completed within {} turns",
        summary.decisions.len()
    );
    Ok(())
}

fn smoke_scenario() -> TestScenario {
    TestScenario::simulation(
        "Smoke Test",
        SimulationPlan::new(GameplayStrategy::Cautious)
            .with_max_turns(1)
            .with_expectation(smoke_expectation),
    )
}

fn invariants_scenario(name: &str, strategy: GameplayStrategy) -> TestScenario {
    TestScenario::simulation(
        name,
        SimulationPlan::new(strategy).with_expectation(invariant_expectation),
    )
}

fn determinism_scenario() -> TestScenario {
    TestScenario::simulation(
        "Deterministic Replay",
        SimulationPlan::new(GameplayStrategy::Random)
            .with_replay()
            .with_expectation(determinism_expectation),
    )
}

fn mission_loop_scenario() -> TestScenario {
    TestScenario::simulation(
        "Mission Loop",
        SimulationPlan::new(GameplayStrategy::Cautious).with_expectation(mission_loop_expectation),
    )
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    match name.to_lowercase().as_str() {
        "smoke" => Some(smoke_scenario()),
        "invariants" => Some(invariants_scenario(
            "Invariant Sweep",
            GameplayStrategy::Random,
        )),
        "reckless" | "reckless-invariants" => Some(invariants_scenario(
            "Reckless Invariant Sweep",
            GameplayStrategy::Reckless,
        )),
        "determinism" | "deterministic" => Some(determinism_scenario()),
        "mission-loop" | "missions" => Some(mission_loop_scenario()),
        _ => None,
    }
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("smoke", "Smoke Test"),
        ("invariants", "Invariant Sweep"),
        ("reckless", "Reckless Invariant Sweep"),
        ("determinism", "Deterministic Replay"),
        ("mission-loop", "Mission Loop"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::GameTester;
    use opencity_game::SessionConfig;

    fn run(name: &str, seed: u64) -> Result<()> {
        let scenario = get_scenario(name).unwrap();
        let summary =
            GameTester::new(SessionConfig::default(), false).run_plan(&scenario.plan, seed)?;
        for expectation in &scenario.plan.expectations {
            expectation.evaluate(&summary)?;
        }
        Ok(())
    }

    #[test]
    fn every_listed_scenario_resolves() {
        for (key, description) in list_scenarios() {
            let scenario = get_scenario(key).unwrap();
            assert_eq!(scenario.name, description);
        }
        assert!(get_scenario("SMOKE").is_some());
        assert!(get_scenario("unknown").is_none());
    }

    #[test]
    fn listed_scenarios_pass_on_default_seed() {
        for (key, _) in list_scenarios() {
            run(key, 1337).unwrap_or_else(|err| panic!("{key}: {err:#}"));
        }
    }

    #[test]
    fn determinism_expectation_rejects_mismatch() {
        let scenario = get_scenario("determinism").unwrap();
        let mut summary = GameTester::new(SessionConfig::default(), false)
            .run_plan(&scenario.plan.clone().with_max_turns(5), 3)
            .unwrap();
        summary.replay_digest = Some([0; 32]);
        assert!(determinism_expectation(&summary).is_err());
    }
}
