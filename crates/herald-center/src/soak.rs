//! Randomised soak workload.
//!
//! Drives a [`NotificationCenter`] through random batches of adds, triplet
//! removals, whole-observer removals, full sweeps and posts, auditing the
//! registry after every batch. A full sweep removes every triplet that
//! could ever have been added, after which the registry must be empty.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use herald_registry::{Dispatch, RegistryError, StoreSnapshot};
use herald_types::{Notification, ObserverId, Target};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::center::NotificationCenter;
use crate::config::{CenterConfig, SoakConfig};
use crate::error::CenterError;

/// Largest batch of operations in one round.
const MAX_BATCH: usize = 50;

/// Outcome of a soak run.
#[derive(Debug, Clone, Serialize)]
pub struct SoakReport {
    /// Seed used, so a failing run can be replayed.
    pub seed: u64,
    pub runs: u32,
    pub adds: usize,
    pub triplet_removals: usize,
    pub observer_removals: usize,
    pub sweeps: usize,
    pub posts: usize,
    pub dispatches: usize,
    /// State of the registry when the run finished.
    pub final_state: StoreSnapshot<String>,
}

/// Counts dispatches; clones share the count.
#[derive(Clone, Default)]
struct DispatchCounter(Arc<AtomicUsize>);

impl DispatchCounter {
    fn get(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }
}

impl Dispatch<String, String, u8> for DispatchCounter {
    fn dispatch(&self, _: &Target<String, u8>, _: Notification<'_, String, String>) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

/// Value pools the workload draws from.
struct Pools {
    observers: Vec<ObserverId>,
    names: Vec<String>,
    keys: Vec<Option<String>>,
    callbacks: Vec<u8>,
}

impl Pools {
    fn build(config: &SoakConfig, rng: &mut StdRng) -> Self {
        let unscoped = if config.unscoped_ratio.is_nan() {
            0.0
        } else {
            config.unscoped_ratio.clamp(0.0, 1.0)
        };
        Self {
            observers: (0..config.observers.max(1)).map(|_| ObserverId::new()).collect(),
            names: (0..config.events.max(1)).map(|i| format!("event_{i}")).collect(),
            keys: (0..config.payloads.max(1))
                .map(|i| (!rng.gen_bool(unscoped)).then(|| format!("payload_{i}")))
                .collect(),
            callbacks: (1..=config.callbacks.max(1)).collect(),
        }
    }

    fn observer(&self, rng: &mut StdRng) -> ObserverId {
        self.observers.choose(rng).copied().unwrap_or_default()
    }

    fn name(&self, rng: &mut StdRng) -> String {
        self.names.choose(rng).cloned().unwrap_or_default()
    }

    fn key(&self, rng: &mut StdRng) -> Option<String> {
        self.keys.choose(rng).cloned().flatten()
    }

    fn callback(&self, rng: &mut StdRng) -> u8 {
        self.callbacks.choose(rng).copied().unwrap_or(1)
    }
}

/// Runs the soak workload described by `config`.
///
/// # Errors
///
/// Returns `CenterError::Registry` as soon as an audit fails or a full
/// sweep leaves anything behind.
pub fn run_soak(config: &SoakConfig) -> Result<SoakReport, CenterError> {
    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    let pools = Pools::build(config, &mut rng);

    let counter = DispatchCounter::default();
    let center: NotificationCenter<String, String, u8> =
        NotificationCenter::with_config(counter.clone(), &CenterConfig::default());

    let mut report = SoakReport {
        seed,
        runs: config.runs,
        adds: 0,
        triplet_removals: 0,
        observer_removals: 0,
        sweeps: 0,
        posts: 0,
        dispatches: 0,
        final_state: center.snapshot(),
    };

    tracing::info!(seed, runs = config.runs, "soak run starting");

    for round in 0..config.runs {
        let roll = rng.gen_range(0..=100);
        let batch = rng.gen_range(0..=MAX_BATCH);

        if roll < 10 {
            sweep(&center, &pools)?;
            report.sweeps += 1;
        } else if roll < 30 {
            for _ in 0..batch {
                let name = pools.name(&mut rng);
                let key = pools.key(&mut rng);
                center.remove_observer(pools.observer(&mut rng), Some(&name), key.as_ref())?;
                report.triplet_removals += 1;
            }
        } else if roll < 50 {
            for _ in 0..batch {
                center.remove_observer_entirely(pools.observer(&mut rng));
                report.observer_removals += 1;
            }
        } else {
            for _ in 0..batch {
                center.add_observer(
                    pools.observer(&mut rng),
                    pools.callback(&mut rng),
                    Some(pools.name(&mut rng)),
                    pools.key(&mut rng),
                )?;
                report.adds += 1;
            }
            let name = pools.name(&mut rng);
            center.post(&name, None);
            report.posts += 1;
        }

        if let Err(e) = center.check_consistency() {
            tracing::warn!(seed, round, "registry audit failed: {}", e);
            return Err(e);
        }

        if round % 100 == 0 {
            tracing::debug!(round, registrations = center.len(), "soak progress");
        }
    }

    report.dispatches = counter.get();
    report.final_state = center.snapshot();
    tracing::info!(
        seed,
        adds = report.adds,
        dispatches = report.dispatches,
        "soak run finished"
    );
    Ok(report)
}

/// Removes every triplet the pools can form and requires an empty registry.
fn sweep(center: &NotificationCenter<String, String, u8>, pools: &Pools) -> Result<(), CenterError> {
    for &observer in &pools.observers {
        for name in &pools.names {
            for key in &pools.keys {
                center.remove_observer(observer, Some(name), key.as_ref())?;
            }
        }
    }

    if !center.is_empty() {
        let state = center.snapshot();
        return Err(RegistryError::ResidualNode(format!(
            "{} registrations across {} observers survived a full sweep",
            state.registrations, state.observers
        ))
        .into());
    }
    Ok(())
}
