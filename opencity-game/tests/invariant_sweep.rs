use opencity_game::{
    Action, GameSession, MissionKind, SessionConfig, Snapshot, View, WorldGraph,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

const SEEDS: [u64; 6] = [1, 7, 42, 1337, 0xDEAD_BEEF, u64::MAX];
const TURNS: usize = 400;

fn assert_snapshot_invariants(snapshot: &Snapshot, world: &WorldGraph) {
    let status = &snapshot.status;
    assert!(status.cash >= 0, "cash went negative: {}", status.cash);
    assert!(
        (0..=100).contains(&status.wanted),
        "wanted out of range: {}",
        status.wanted
    );
    assert!(world.contains(&snapshot.location_id));
    assert!(snapshot.offer.options.len() <= 3);
    assert!(!snapshot.offer.options.is_empty());
    for mission in &snapshot.available_missions {
        assert!(mission.reward > 0);
        assert!((0..=100).contains(&mission.risk));
    }
    if matches!(snapshot.view, View::Raid | View::Encounter { .. }) {
        assert_eq!(snapshot.offer.options.len(), 2);
        assert!(snapshot.offer.options.iter().all(|option| matches!(
            option.action,
            Action::ChooseEncounterOption { .. }
        )));
    }
}

fn run_sweep(seed: u64) {
    let mut session = GameSession::new(SessionConfig::with_seed(seed)).unwrap();
    let world = WorldGraph::default_city();
    let mut picker = ChaCha20Rng::seed_from_u64(seed ^ 0x5EED);
    let mut last_completed = 0;

    for _ in 0..TURNS {
        let offered = session.offer().options.len();
        let index = picker.gen_range(0..offered);
        let snapshot = session.choose(index).unwrap();
        assert_snapshot_invariants(&snapshot, &world);
        assert!(session.profile().invariants_hold());
        for mission in session.available_missions() {
            assert!(mission.endpoints_valid(), "bad endpoints on {}", mission.id);
        }

        if snapshot.status.missions_completed > last_completed {
            last_completed = snapshot.status.missions_completed;
            let kinds: Vec<MissionKind> =
                snapshot.available_missions.iter().map(|m| m.kind).collect();
            assert_eq!(kinds, MissionKind::ALL);
        }
        if let Some(active) = &snapshot.status.active_mission {
            assert!(
                snapshot.available_missions.iter().all(|m| m.id != active.id),
                "active mission still in pool"
            );
        }
    }
}

#[test]
fn random_playthroughs_hold_invariants() {
    for seed in SEEDS {
        run_sweep(seed);
    }
}

#[test]
fn invalid_actions_never_mutate() {
    let mut session = GameSession::new(SessionConfig::with_seed(99)).unwrap();
    let mut picker = ChaCha20Rng::seed_from_u64(99);
    let probes = [
        Action::Travel {
            target: "nowhere".to_string(),
        },
        Action::DeliverMission,
        Action::SelectMenu,
        Action::TravelToMissionTarget,
    ];
    for _ in 0..200 {
        for probe in &probes {
            let before = session.snapshot();
            if session.apply(probe.clone()).is_err() {
                assert_eq!(session.snapshot(), before);
            }
        }
        let offered = session.offer().options.len();
        session.choose(picker.gen_range(0..offered)).unwrap();
    }
}
