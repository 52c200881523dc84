//! Concurrent env-file ingestion: scan, parallel parse, ordered apply.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam_channel::bounded;
use log::{debug, trace};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::expand::expand;
use crate::parse;
use crate::pool;
use crate::store::EnvStore;

/// Lines queued between the reader and the parser workers.
const LINE_QUEUE_DEPTH: usize = 128;

/// A line lifted from the file, before parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub text: String,
    /// 0-based position in the file; ordering key for the apply phase.
    pub number: usize,
}

/// An assignment parsed off a worker, not yet applied.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ParsedEntry {
    key: String,
    value: String,
    /// Value still holds `$` references the apply phase must resolve.
    expandable: bool,
    line: RawLine,
}

/// Knobs controlling how parsed assignments reach the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    /// Substitute `$VAR` references against the live store.
    pub expand: bool,
    /// Overwrite keys the store already has.
    pub update: bool,
    /// Drop malformed lines instead of failing the whole call.
    pub forced: bool,
}

/// Read the env-file at `path` and apply its assignments to `store`.
///
/// Lines are parsed on a pool of [`parallel_tasks`](pool::parallel_tasks)
/// worker threads, then applied in file order on the calling thread:
/// a later assignment always observes the effect of earlier ones, no
/// matter which worker parsed it first.
///
/// Unless `policy.forced` is set, the first malformed line aborts the
/// call with [`Error::Parse`] and the store is left untouched.
pub fn ingest<S: EnvStore + ?Sized>(
    path: impl AsRef<Path>,
    store: &mut S,
    policy: Policy,
) -> Result<(), Error> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let workers = pool::parallel_tasks();
    debug!("ingesting {} with {workers} workers ({policy:?})", path.display());

    let (line_tx, line_rx) = bounded::<RawLine>(LINE_QUEUE_DEPTH);
    let cancelled = AtomicBool::new(false);
    let entries = Mutex::new(Vec::new());
    let first_error = Mutex::new(None::<Error>);
    let mut read_error = None;

    thread::scope(|scope| {
        let cancelled = &cancelled;
        let entries = &entries;
        let first_error = &first_error;

        for _ in 0..workers {
            let line_rx = line_rx.clone();
            scope.spawn(move || {
                for line in line_rx {
                    // Keep draining after a failure so the bounded
                    // queue never blocks the reader.
                    if cancelled.load(Ordering::Relaxed) {
                        continue;
                    }
                    if parse::is_blank(&line.text) {
                        continue;
                    }
                    match parse::parse_expression(&line.text) {
                        Ok((key, value)) => {
                            let expandable = policy.expand && value.contains('$');
                            entries.lock().push(ParsedEntry {
                                key,
                                value,
                                expandable,
                                line,
                            });
                        }
                        Err(err) if policy.forced => {
                            trace!("dropping malformed line {}: {err}", line.number + 1);
                        }
                        Err(err) => {
                            let mut slot = first_error.lock();
                            if slot.is_none() {
                                *slot = Some(Error::Parse {
                                    line: line.number + 1,
                                    source: err,
                                });
                            }
                            drop(slot);
                            cancelled.store(true, Ordering::Relaxed);
                        }
                    }
                }
            });
        }
        drop(line_rx);

        let reader = BufReader::new(file);
        for (number, line) in reader.lines().enumerate() {
            if cancelled.load(Ordering::Relaxed) {
                break;
            }
            match line {
                Ok(text) => {
                    if line_tx.send(RawLine { text, number }).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    read_error = Some(err);
                    cancelled.store(true, Ordering::Relaxed);
                    break;
                }
            }
        }
        drop(line_tx);
    });

    if let Some(err) = read_error {
        return Err(Error::Io(err));
    }
    if let Some(err) = first_error.into_inner() {
        return Err(err);
    }

    let mut entries = entries.into_inner();
    entries.sort_unstable_by_key(|entry| entry.line.number);
    debug!("parsed {} assignments from {}", entries.len(), path.display());

    // Apply in file order on this thread only. With expansion on, each
    // value must see the store exactly as the lines above it left it.
    for entry in entries {
        if store.exists(&entry.key) && !policy.update {
            trace!("keeping existing {}", entry.key);
            continue;
        }
        let value = if entry.expandable {
            expand(store, &entry.value)
        } else {
            entry.value
        };
        if let Err(source) = store.set(&entry.key, &value) {
            return Err(Error::Store {
                key: entry.key,
                source,
            });
        }
    }
    Ok(())
}
