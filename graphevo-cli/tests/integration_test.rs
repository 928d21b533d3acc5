//! Integration tests for GRAPHEVO
//!
//! Tests the full stack: graph generators, update rules, sessions and
//! fixation estimation

use graphevo_core::{
    cooperator_count, donation_to_matrix, is_fixated,
    topology::{barabasi_albert, erdos_renyi, lattice, ring},
    GameMatrix, GameSpec, Graph, GraphConfig, SimRng, Strategy, Topology,
};
use graphevo_dynamics::{DynamicsConfig, SimulationSession, UpdateRule};
use graphevo_fixation::{estimate_fixation, CancelToken, FixationConfig, FixationEstimator, TrialOutcome};

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn donation(b: f64, c: f64, rule: UpdateRule) -> DynamicsConfig {
    DynamicsConfig::new(GameSpec::Donation { b, c }, rule)
}

fn assert_simple_undirected(graph: &Graph) {
    assert!(graph.is_symmetric());
    for node in 0..graph.len() {
        assert!(!graph.has_edge(node, node), "self-loop at {}", node);
        let mut neighbors = graph.neighbors(node).to_vec();
        neighbors.sort_unstable();
        neighbors.dedup();
        assert_eq!(neighbors.len(), graph.degree(node), "duplicate edge at {}", node);
    }
}

// ============================================================================
// GRAPH GENERATORS
// ============================================================================

#[test]
fn test_every_topology_is_simple_and_symmetric() {
    let mut rng = SimRng::new(42);
    let graphs = vec![
        ring(30, 6).unwrap(),
        lattice(36).unwrap(),
        erdos_renyi(60, 0.1, &mut rng).unwrap(),
        barabasi_albert(80, 5, 3, &mut rng).unwrap(),
    ];
    for graph in &graphs {
        assert_simple_undirected(graph);
    }
}

#[test]
fn test_ring_degrees() {
    let graph = ring(10, 4).unwrap();
    assert!(graph.degrees().iter().all(|&d| d == 4));
    assert_eq!(graph.edge_count(), 20);
}

#[test]
fn test_lattice_degrees() {
    let graph = lattice(16).unwrap();
    assert!(graph.degrees().iter().all(|&d| d == 4));
    assert_eq!(graph.edge_count(), 32);
}

#[test]
fn test_erdos_renyi_extremes() {
    let mut rng = SimRng::new(7);
    assert_eq!(erdos_renyi(100, 0.0, &mut rng).unwrap().edge_count(), 0);
    assert_eq!(erdos_renyi(100, 1.0, &mut rng).unwrap().edge_count(), 4950);
}

#[test]
fn test_barabasi_albert_growth() {
    let mut rng = SimRng::new(42);
    let graph = barabasi_albert(50, 6, 2, &mut rng).unwrap();
    assert_eq!(graph.len(), 50);
    for node in 6..50 {
        assert!(graph.degree(node) >= 2);
    }
}

#[test]
fn test_graph_config_reproducible() {
    let config = GraphConfig::new(Topology::BarabasiAlbert { m0: 4, m: 2 }, 60).with_seed(9);
    assert_eq!(config.build().unwrap(), config.build().unwrap());
}

#[test]
fn test_invalid_parameters_rejected() {
    let mut rng = SimRng::new(1);
    assert!(ring(10, 3).is_err());
    assert!(lattice(15).is_err());
    assert!(erdos_renyi(10, 1.5, &mut rng).is_err());
    assert!(barabasi_albert(10, 1, 1, &mut rng).is_err());
    assert!(barabasi_albert(10, 3, 3, &mut rng).is_err());
}

// ============================================================================
// GAME AND RANDOMNESS
// ============================================================================

#[test]
fn test_donation_matrix() {
    assert_eq!(donation_to_matrix(3.0, 1.0), GameMatrix::new(2.0, -1.0, 3.0, 0.0));
}

#[test]
fn test_rng_determinism() {
    let mut a = SimRng::new(123);
    let mut b = SimRng::new(123);
    for _ in 0..100 {
        assert_eq!(a.random(), b.random());
        assert_eq!(a.int(17), b.int(17));
    }
}

#[test]
fn test_is_fixated() {
    assert!(is_fixated(&[Strategy::Cooperate; 5]));
    assert!(is_fixated(&[Strategy::Defect]));
    assert!(!is_fixated(&[Strategy::Cooperate, Strategy::Defect]));
}

// ============================================================================
// DYNAMICS
// ============================================================================

#[test]
fn test_fixed_population_stays_fixed_under_every_rule() {
    for rule in UpdateRule::ALL {
        for fraction in [0.0, 1.0] {
            let config = donation(3.0, 1.0, rule).with_intensity(1.0).with_initial_cooperators(fraction);
            let mut session = SimulationSession::new(lattice(25).unwrap(), &config, 5).unwrap();
            let before = session.cooperator_count();
            session.run(500);
            assert!(session.is_fixated(), "{} lost fixation", rule.name());
            assert_eq!(session.cooperator_count(), before);
        }
    }
}

#[test]
fn test_session_reproducible() {
    let config = donation(4.0, 1.0, UpdateRule::Imitation).with_intensity(0.5);
    let mut a = SimulationSession::new(ring(40, 4).unwrap(), &config, 77).unwrap();
    let mut b = SimulationSession::new(ring(40, 4).unwrap(), &config, 77).unwrap();
    a.run(1000);
    b.run(1000);
    assert_eq!(a.strategies(), b.strategies());
    assert_eq!(a.tick(), 1000);
}

#[test]
fn test_session_initial_cooperators_exact() {
    let config = donation(3.0, 1.0, UpdateRule::BirthDeath).with_initial_cooperators(0.3);
    let session = SimulationSession::new(lattice(100).unwrap(), &config, 3).unwrap();
    assert_eq!(cooperator_count(session.strategies()), 30);
}

#[test]
fn test_session_rejects_bad_mutation_rate() {
    let config = donation(3.0, 1.0, UpdateRule::DeathBirth).with_mutation_rate(1.5);
    assert!(SimulationSession::new(ring(10, 2).unwrap(), &config, 1).is_err());
}

// ============================================================================
// FIXATION
// ============================================================================

#[test]
fn test_fixation_counts_sum_to_trials() {
    let graph = ring(12, 2).unwrap();
    let result = estimate_fixation(
        &graph,
        &donation(3.0, 1.0, UpdateRule::DeathBirth),
        &FixationConfig::new(100, 100_000),
    )
    .unwrap();

    assert_eq!(result.counts.total(), 100);
    assert_eq!(result.trials_completed, 100);
    assert_eq!(result.cooperator_invasion.total(), 50);
    assert_eq!(result.defector_invasion.total(), 50);
}

#[test]
fn test_cooperation_favored_on_ring_when_benefit_high() {
    // b/c = 10 is far above the ring degree 2, so death-birth favors a lone
    // cooperator well beyond neutral drift
    let graph = ring(20, 2).unwrap();
    let config = FixationConfig::new(400, 200_000).with_seed(2024);
    let selected = estimate_fixation(&graph, &donation(10.0, 1.0, UpdateRule::DeathBirth).with_intensity(0.1), &config)
        .unwrap();
    let neutral = estimate_fixation(&graph, &donation(10.0, 1.0, UpdateRule::DeathBirth).with_intensity(0.0), &config)
        .unwrap();

    assert_eq!(selected.counts.count(TrialOutcome::Timeout), 0);
    assert_eq!(neutral.counts.count(TrialOutcome::Timeout), 0);

    let rho_c = selected.cooperator_fixation_probability();
    assert!(
        rho_c > 2.0 * selected.neutral_baseline(),
        "rho_C = {} not clearly above 1/N",
        rho_c
    );
    assert!(
        rho_c > neutral.cooperator_fixation_probability() + 0.05,
        "rho_C = {} vs neutral {}",
        rho_c,
        neutral.cooperator_fixation_probability()
    );
    assert!(selected.defector_fixation_probability() < selected.neutral_baseline());
    assert!(selected.defector_fixation_probability() < neutral.defector_fixation_probability());
}

#[test]
fn test_fixation_parallel_matches_sequential() {
    let graph = lattice(16).unwrap();
    let dynamics = donation(3.0, 1.0, UpdateRule::Imitation).with_intensity(1.0);
    let config = FixationConfig::new(40, 50_000).with_seed(11);

    let parallel = estimate_fixation(&graph, &dynamics, &config).unwrap();
    let sequential = estimate_fixation(&graph, &dynamics, &config.clone().sequential()).unwrap();
    assert_eq!(parallel, sequential);
}

#[test]
fn test_cancelled_batch_runs_nothing() {
    let graph = ring(10, 2).unwrap();
    let token = CancelToken::new();
    token.cancel();

    let result = FixationEstimator::new(&graph, &donation(3.0, 1.0, UpdateRule::BirthDeath), FixationConfig::new(50, 1000))
        .unwrap()
        .cancel_token(token)
        .run();

    assert_eq!(result.trials_completed, 0);
    assert_eq!(result.trials_skipped(), 50);
    assert_eq!(result.counts.total(), 0);
}
