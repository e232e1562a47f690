//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the simulator
//! produces identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! Bots run the same engagement many times with small changes and compare
//! the outcomes, so any drift between two runs of the same input makes the
//! comparison meaningless. Sources of non-determinism include:
//!
//! - **Floating-point math**: Different CPUs can produce different results.
//!   Vitals and speeds use fixed-point via [`skirmish_core::math`].
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Groups are plain vectors iterated in index order.
//!
//! - **Shared state across threads**: Each worker owns its simulator and
//!   starts from the same [`Snapshot`].
//!
//! # Test Levels
//!
//! 1. **Unit tests**: Individual phases (damage, movement, regeneration)
//! 2. **Property tests**: Random inputs must still produce deterministic outputs
//! 3. **Integration tests**: Full engagements are reproducible
//! 4. **Parallel tests**: Running N simulators in parallel all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use skirmish_core::simulator::Simulator;
use skirmish_core::snapshot::Snapshot;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of steps simulated.
    pub steps: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for deterministic simulation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the simulation was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the simulation produced different hashes across runs.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Simulation is non-deterministic!\n\
                 Runs: {}\n\
                 Steps: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.steps,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Result of parallel simulator runs.
#[derive(Debug, Clone)]
pub struct ParallelSimResult {
    /// Final state hash from each simulator.
    pub hashes: Vec<u64>,
    /// Frames each simulator was asked to run.
    pub frames: i32,
    /// Number of simulators run.
    pub num_sims: usize,
}

impl ParallelSimResult {
    /// Check if all simulators produced identical results.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }

    /// Assert all simulators matched.
    ///
    /// # Panics
    ///
    /// Panics if simulators produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic() {
            let mut unique: Vec<u64> = self.hashes.clone();
            unique.sort_unstable();
            unique.dedup();
            panic!(
                "Parallel simulations diverged!\n\
                 Simulators: {}\n\
                 Frames: {}\n\
                 Unique hashes: {}\n\
                 All hashes: {:?}",
                self.num_sims,
                self.frames,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a simulation multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the simulation
/// * `steps` - Number of times `step` is called per run
/// * `setup` - Function to create initial simulation state
/// * `step` - Function to advance the simulation
/// * `hash` - Function to compute state hash
///
/// # Example
///
/// ```
/// use skirmish_test_utils::determinism::verify_determinism;
///
/// let result = verify_determinism(3, 10, || 0u64, |n| *n += 1, |n| *n);
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    steps: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..steps {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        steps,
    }
}

/// Simplified determinism verification for [`Simulator`].
///
/// Runs the setup twice, simulates `frames` frames on each and verifies the
/// final state hashes match exactly.
pub fn verify_simulator_determinism<F>(setup_fn: F, frames: i32) -> bool
where
    F: Fn() -> Simulator,
{
    let result = verify_determinism(
        2,
        1,
        &setup_fn,
        |sim| {
            sim.simulate(frames);
        },
        Simulator::state_hash,
    );
    result.is_deterministic
}

/// Run N simulators on scoped threads and collect final hashes.
///
/// This is useful for catching non-determinism that only manifests
/// under thread scheduling variations, memory layout differences, etc.
///
/// # Example
///
/// ```
/// use skirmish_core::simulator::Simulator;
/// use skirmish_test_utils::determinism::run_parallel_simulations_scoped;
/// use skirmish_test_utils::fixtures::{marine, zergling};
///
/// let result = run_parallel_simulations_scoped(
///     || {
///         let mut sim = Simulator::default();
///         sim.add_agent_a(marine().with_position(100, 100)).unwrap();
///         sim.add_agent_b(zergling().with_position(300, 100)).unwrap();
///         sim
///     },
///     4,
///     96,
/// );
/// result.assert_deterministic();
/// ```
pub fn run_parallel_simulations_scoped<F>(setup_fn: F, num_sims: usize, frames: i32) -> ParallelSimResult
where
    F: Fn() -> Simulator + Sync,
{
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..num_sims)
            .map(|_| {
                s.spawn(|| {
                    let mut sim = setup_fn();
                    sim.simulate(frames);
                    sim.state_hash()
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    ParallelSimResult {
        hashes,
        frames,
        num_sims,
    }
}

/// Restore one snapshot into N simulators on scoped threads and collect
/// final hashes.
///
/// # Panics
///
/// Panics if the snapshot cannot be restored.
pub fn run_parallel_from_snapshot(snapshot: &Snapshot, num_sims: usize, frames: i32) -> ParallelSimResult {
    run_parallel_simulations_scoped(
        || {
            let mut sim = Simulator::default();
            sim.restore(snapshot).unwrap();
            sim
        },
        num_sims,
        frames,
    )
}

/// Compare two simulator runs step by step, finding first divergence.
///
/// Useful for debugging non-determinism by finding exactly when
/// simulators start to differ.
///
/// # Returns
///
/// `None` if the runs agree, `Some(frame)` with the frames simulated when
/// they first disagreed.
pub fn find_first_divergence<F>(setup_fn: F, frames: i32) -> Option<i32>
where
    F: Fn() -> Simulator,
{
    let mut sim1 = setup_fn();
    let mut sim2 = setup_fn();

    // Check initial state
    if sim1.state_hash() != sim2.state_hash() {
        return Some(0);
    }

    let frame_skip = sim1.frame_skip();
    let mut frame = 0;
    while frame < frames {
        sim1.simulate(frame_skip);
        sim2.simulate(frame_skip);
        frame += frame_skip;

        if sim1.state_hash() != sim2.state_hash() {
            return Some(frame);
        }
    }

    None
}

/// Verify that a snapshot round-trip through bincode preserves the state
/// exactly, and that both copies keep agreeing afterwards.
pub fn verify_snapshot_determinism<F>(setup_fn: F, frames: i32) -> bool
where
    F: Fn() -> Simulator,
{
    let mut sim = setup_fn();
    sim.simulate(frames);

    let bytes = match sim.snapshot().to_bytes() {
        Ok(b) => b,
        Err(_) => return false,
    };
    let snapshot = match Snapshot::from_bytes(&bytes) {
        Ok(s) => s,
        Err(_) => return false,
    };

    let mut restored = setup_fn();
    if restored.restore(&snapshot).is_err() {
        return false;
    }
    if restored.state_hash() != sim.state_hash() {
        return false;
    }

    sim.simulate(frames);
    restored.simulate(frames);
    sim.state_hash() == restored.state_hash()
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for determinism testing.
///
/// These strategies generate random but reproducible inputs for
/// property-based testing of the simulator.
pub mod strategies {
    use fixed::types::I32F32;
    use proptest::prelude::*;
    use skirmish_core::agent::{Agent, DamageType, UnitSize, Weapon};
    use skirmish_core::collision::MAP_SIZE;

    /// Generate a coordinate anywhere on the map.
    pub fn arb_coordinate() -> impl Strategy<Value = i32> {
        0..MAP_SIZE
    }

    /// Generate a coordinate inside a small arena so agents engage.
    pub fn arb_arena_coordinate() -> impl Strategy<Value = i32> {
        1000i32..1400i32
    }

    /// Generate a movement speed.
    ///
    /// Range: 0 to 8 (sub-tile units per frame)
    pub fn arb_speed() -> impl Strategy<Value = I32F32> {
        (0i32..=8i32).prop_map(I32F32::from_num)
    }

    /// Generate health values (1-500).
    pub fn arb_health() -> impl Strategy<Value = i32> {
        1i32..500i32
    }

    /// Generate damage values (1-100).
    pub fn arb_damage() -> impl Strategy<Value = i32> {
        1i32..100i32
    }

    /// Generate a damage type.
    pub fn arb_damage_type() -> impl Strategy<Value = DamageType> {
        prop_oneof![
            Just(DamageType::Normal),
            Just(DamageType::Concussive),
            Just(DamageType::Explosive),
        ]
    }

    /// Generate a unit size.
    pub fn arb_unit_size() -> impl Strategy<Value = UnitSize> {
        prop_oneof![
            Just(UnitSize::Small),
            Just(UnitSize::Medium),
            Just(UnitSize::Large),
            Just(UnitSize::Irrelevant),
        ]
    }

    /// Generate a single-target weapon.
    pub fn arb_weapon() -> impl Strategy<Value = Weapon> {
        (arb_damage(), 10i32..200i32, 1i32..40i32, arb_damage_type()).prop_map(
            |(damage, range, cooldown, damage_type)| {
                Weapon::new(damage, range, cooldown).with_damage_type(damage_type)
            },
        )
    }

    /// Generate a ground agent placed inside the arena.
    pub fn arb_agent() -> impl Strategy<Value = Agent> {
        (
            (arb_arena_coordinate(), arb_arena_coordinate()),
            arb_health(),
            0i32..100i32,
            0i32..3i32,
            arb_unit_size(),
            arb_weapon(),
            arb_speed(),
        )
            .prop_map(|((x, y), health, shields, armor, size, weapon, speed)| {
                Agent::new("Generated")
                    .with_position(x, y)
                    .with_max_health(health)
                    .with_max_shields(shields)
                    .with_armor(armor)
                    .with_size(size)
                    .with_ground_weapon(weapon)
                    .with_speed(speed)
            })
    }

    /// Generate a list of agents.
    pub fn arb_agent_list(max_agents: usize) -> impl Strategy<Value = Vec<Agent>> {
        proptest::collection::vec(arb_agent(), 1..max_agents)
    }
}
