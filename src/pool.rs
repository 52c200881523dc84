//! Worker-pool sizing for concurrent ingestion.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// 0 means unconfigured: fall back to the hardware default.
static PARALLEL_TASKS: AtomicUsize = AtomicUsize::new(0);

const MIN_PARALLEL_TASKS: usize = 2;

fn hardware_default() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(MIN_PARALLEL_TASKS)
}

/// Number of parser workers an ingestion call will spawn.
///
/// Defaults to the hardware parallelism until [`set_parallel_tasks`]
/// configures it.
pub fn parallel_tasks() -> usize {
    match PARALLEL_TASKS.load(Ordering::Relaxed) {
        0 => hardware_default(),
        n => n,
    }
}

/// Configure the worker count for subsequent ingestion calls.
///
/// Requests are clamped to at least 2 and at most twice the hardware
/// parallelism. Returns the value that took effect.
pub fn set_parallel_tasks(n: usize) -> usize {
    let effective = n.clamp(MIN_PARALLEL_TASKS, hardware_default() * 2);
    PARALLEL_TASKS.store(effective, Ordering::Relaxed);
    effective
}
