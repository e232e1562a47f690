//! End-to-end engagements built from the shared fixtures.

use proptest::prelude::*;
use skirmish_core::agent::{Agent, AgentId, Weapon};
use skirmish_core::error::SimError;
use skirmish_core::evaluation::{health_and_halved_shield, health_and_shield, IntEvaluation};
use skirmish_core::simulator::Simulator;
use skirmish_test_utils::determinism::strategies::{arb_agent_list, arb_coordinate};
use skirmish_test_utils::fixtures::{
    bunker, hydralisk, line_of, marine, medic, mutalisk, scourge, scv, sieged_tank, zealot,
};
use skirmish_test_utils::init_tracing;

/// Mirror axis for y. Odd and one below a tile boundary, so mirrored
/// agents also sit in mirrored collision tiles.
const MIRROR: i32 = 2015;

fn mirrored(sim: &mut Simulator, agents: &[Agent]) {
    for agent in agents {
        let (x, y) = agent.position();
        sim.add_agent_a(agent.clone()).unwrap();
        sim.add_agent_b(agent.clone().with_position(x, MIRROR - y)).unwrap();
    }
}

#[test]
fn test_symmetric_attackers_cancel_out() {
    init_tracing();
    let mut sim = Simulator::default();
    mirrored(&mut sim, &line_of(&hydralisk(), 4, (1000, 800), 20));

    sim.simulate(5000);
    let eval = sim.eval_to_int(health_and_shield);
    assert_eq!(eval.delta(), 0);
    assert_eq!(sim.agents_a().len(), sim.agents_b().len());
}

#[test]
fn test_symmetric_marines_and_medics_stay_even() {
    init_tracing();
    let mut force = line_of(&marine(), 4, (1000, 900), 20);
    force.push(medic().with_position(1010, 880));
    force.push(medic().with_position(1050, 880));

    let mut sim = Simulator::default();
    mirrored(&mut sim, &force);
    let before = sim.eval_to_int(health_and_shield);
    assert_eq!(before.delta(), 0);

    sim.simulate_default();
    let after = sim.eval_to_int(health_and_shield);
    assert!(after.eval_a < before.eval_a, "the forces should have engaged");
    assert!(after.eval_b < before.eval_b, "the forces should have engaged");
    let share = after.share_a();
    assert!((0.49..=0.51).contains(&share), "share {share} for mirrored forces");
}

#[test]
fn test_overwhelming_force_versus_nothing() {
    let mut sim = Simulator::default();
    for agent in line_of(&zealot(), 5, (500, 500), 20) {
        sim.add_agent_a(agent).unwrap();
    }

    assert_eq!(sim.simulate_default(), 96);
    let eval = sim.eval_to_int(health_and_shield);
    assert_eq!(eval, IntEvaluation::new(5 * 160, 0));
    assert!((eval.share_a() - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_empty_versus_empty_is_neutral() {
    let mut sim = Simulator::default();
    assert_eq!(sim.simulate(48), 48);
    let eval = sim.eval_to_int(health_and_halved_shield);
    assert_eq!(eval.delta(), 0);
    assert!((eval.share_a() - 0.5).abs() < f64::EPSILON);
}

#[test]
fn test_repairer_sticks_with_its_patient() {
    let mut sim = Simulator::default();
    sim.add_agent_a(scv().with_position(100, 100)).unwrap();
    let tank = sim
        .add_agent_a(sieged_tank().with_health(100).with_position(103, 100))
        .unwrap();
    sim.add_agent_b(Agent::new("Beacon").with_max_health(10).with_position(4000, 4000))
        .unwrap();

    sim.simulate(1);
    let scv_state = &sim.agents_a()[0];
    assert_eq!(scv_state.restore_target(), Some(tank));

    // A closer damaged machine shows up next to the repairer
    let goliath = Agent::new("Goliath")
        .with_max_health(125)
        .with_health(50)
        .with_mechanic(true)
        .with_position(100, 101);
    let goliath = sim.add_agent_a(goliath).unwrap();

    let tank_health = |sim: &Simulator| {
        let agent = sim.agents_a().iter().find(|agent| agent.id() == tank).unwrap();
        agent.health()
    };
    let health_before = tank_health(&sim);
    sim.simulate(4);

    assert_eq!(sim.agents_a()[0].restore_target(), Some(tank));
    assert!(tank_health(&sim) > health_before);
    let goliath_state = sim.agents_a().iter().find(|agent| agent.id() == goliath).unwrap();
    assert_eq!(goliath_state.health(), 50);
}

#[test]
fn test_splash_hits_cluster_with_falloff() {
    let mut sim = Simulator::default();
    sim.add_agent_a(sieged_tank().with_position(1000, 1000)).unwrap();
    let main = sim.add_agent_b(hydralisk().with_position(1000, 1200)).unwrap();
    let median = sim.add_agent_b(hydralisk().with_position(1015, 1200)).unwrap();
    let outer = sim.add_agent_b(hydralisk().with_position(1000, 1230)).unwrap();

    sim.simulate(1);
    let loss = |id: AgentId| {
        let agent = sim.agents_b().iter().find(|agent| agent.id() == id).unwrap();
        agent.max_health() - agent.health()
    };

    assert!(loss(median) > 0);
    assert!(loss(outer) > 0);
    assert!(loss(main) > loss(median));
    assert!(loss(median) > loss(outer));
}

#[test]
fn test_map_edge_boundary() {
    let mut sim = Simulator::default();
    assert!(sim.add_agent_a(marine().with_position(8191, 8191)).is_ok());

    let err = sim.add_agent_b(marine().with_position(8192, 8191)).unwrap_err();
    assert!(matches!(err, SimError::PositionOutOfBounds { x: 8192, .. }));
    assert!(sim.agents_b().is_empty());
    assert_eq!(sim.collision().total(), 1);
}

#[test]
fn test_destroyed_bunker_releases_marines() {
    let mut sim = Simulator::default();
    sim.add_agent_a(bunker().with_position(600, 600)).unwrap();
    sim.add_agent_b(
        Agent::new("Nuke")
            .with_max_health(10)
            .with_ground_weapon(Weapon::new(500, 400, 1000))
            .with_position(600, 800),
    )
    .unwrap();

    sim.simulate(1);
    let survivors = sim.agents_a();
    assert_eq!(survivors.len(), 4);
    assert!(survivors.iter().all(|agent| agent.name() == "Marine"));
    assert!(survivors.iter().all(|agent| agent.position() == (600, 600)));
    assert_eq!(sim.collision().occupancy(600, 600), 4);
}

#[test]
fn test_scourge_detonates_on_contact() {
    let mut sim = Simulator::default();
    sim.add_agent_a(scourge().with_position(1000, 1000)).unwrap();
    sim.add_agent_b(mutalisk().with_position(1000, 1005)).unwrap();

    sim.simulate(1);
    assert!(sim.agents_a().is_empty());
    // 110 damage scaled by 255/256, then one frame of regeneration
    assert_eq!(sim.agents_b()[0].health(), 10);
}

#[test]
fn test_medic_heals_wounded_marine() {
    let mut sim = Simulator::default();
    sim.add_agent_a(marine().with_health(20).with_position(300, 300)).unwrap();
    sim.add_agent_a(medic().with_position(310, 300)).unwrap();
    sim.add_agent_b(Agent::new("Beacon").with_max_health(10).with_position(5000, 5000))
        .unwrap();

    sim.simulate(10);
    let marine_state = &sim.agents_a()[0];
    let medic_state = &sim.agents_a()[1];
    assert!(marine_state.health() > 20);
    assert!(medic_state.energy() < 200);
}

#[test]
fn test_snapshot_copies_diverge_only_by_input() {
    let mut sim = Simulator::default();
    for agent in line_of(&marine(), 4, (1000, 1000), 20) {
        sim.add_agent_a(agent).unwrap();
    }
    for agent in line_of(&hydralisk(), 3, (1000, 1200), 20) {
        sim.add_agent_b(agent).unwrap();
    }
    let snapshot = sim.snapshot();

    let mut what_if = Simulator::default();
    what_if.restore(&snapshot).unwrap();
    what_if.add_agent_a(medic().with_position(1030, 960)).unwrap();

    sim.simulate_default();
    what_if.simulate_default();
    let mut replay = Simulator::default();
    replay.restore(&snapshot).unwrap();
    replay.simulate_default();

    assert_eq!(replay.state_hash(), sim.state_hash());
    assert_ne!(what_if.state_hash(), sim.state_hash());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_any_on_map_position_is_accepted(x in arb_coordinate(), y in arb_coordinate()) {
        let mut sim = Simulator::default();
        let id = sim.add_agent_a(marine().with_position(x, y)).unwrap();
        prop_assert_eq!(sim.collision().occupancy(x, y), 1);
        prop_assert!(sim.remove_agent_a(id).is_some());
        prop_assert_eq!(sim.collision().total(), 0);
    }

    #[test]
    fn prop_vitals_stay_in_bounds(
        side_a in arb_agent_list(6),
        side_b in arb_agent_list(6),
        frame_skip in 1i32..4,
        frames in 1i32..200,
    ) {
        let mut sim = Simulator::builder().with_frame_skip(frame_skip).build().unwrap();
        for agent in side_a {
            sim.add_agent_a(agent).unwrap();
        }
        for agent in side_b {
            sim.add_agent_b(agent).unwrap();
        }

        let left = sim.simulate(frames);
        prop_assert!(left >= 0);
        prop_assert!(left < frames + frame_skip);

        for agent in sim.agents_a().iter().chain(sim.agents_b()) {
            prop_assert!(agent.is_alive());
            prop_assert!(agent.health() <= agent.max_health());
            prop_assert!(agent.shields() >= 0 && agent.shields() <= agent.max_shields());
            prop_assert!(agent.energy() >= 0 && agent.energy() <= agent.max_energy());
            prop_assert!(agent.cooldown() >= 0);
            let (x, y) = agent.position();
            prop_assert!((0..8192).contains(&x) && (0..8192).contains(&y));
        }
    }
}
