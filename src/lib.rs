//! envfile: concurrent `.env` ingestion with quote-aware parsing and
//! variable expansion.
//!
//! Files are read line by line, parsed on a pool of worker threads, and
//! applied to an [`EnvStore`] in file order, so `$VAR` references always
//! resolve against the values the preceding lines established. The
//! process environment is just one store among several: anything
//! implementing [`EnvStore`] can receive a file.
//!
//! # Architecture
//!
//! - **[`parse`]** — Line classification, assignment parsing, group-aware tokenizer.
//! - **[`pipeline`]** — Scan / parallel parse / ordered apply, driven by a [`Policy`].
//! - **[`store`]** — The [`EnvStore`] trait plus process-backed and in-memory stores.
//! - **[`expand`]** — `$VAR` and `${VAR}` substitution against a store.
//! - **[`pool`]** — Worker-pool sizing for the parse phase.
//! - **[`error`]** — Error taxonomy for the crate.

/// Crate error types.
pub mod error;
/// `$VAR` substitution against a store.
pub mod expand;
/// Group-aware tokenizer, line classifier, and assignment parser.
pub mod parse;
/// Concurrent scan/parse/apply pipeline.
pub mod pipeline;
/// Worker-pool sizing.
pub mod pool;
/// Store trait and implementations.
pub mod store;

use std::path::Path;

pub use error::{Error, ParseError, StoreError};
pub use expand::expand;
pub use pipeline::{Policy, ingest};
pub use pool::{parallel_tasks, set_parallel_tasks};
pub use store::{EnvStore, MemoryEnv, ProcessEnv, exists_all};

/// Load assignments from `path` into `store`, expanding `$` references.
/// Keys the store already has are kept.
pub fn load<S: EnvStore + ?Sized>(path: impl AsRef<Path>, store: &mut S) -> Result<(), Error> {
    ingest(
        path,
        store,
        Policy {
            expand: true,
            update: false,
            forced: false,
        },
    )
}

/// Like [`load`], but `$` references are stored verbatim.
pub fn load_safe<S: EnvStore + ?Sized>(
    path: impl AsRef<Path>,
    store: &mut S,
) -> Result<(), Error> {
    ingest(
        path,
        store,
        Policy {
            expand: false,
            update: false,
            forced: false,
        },
    )
}

/// Load assignments from `path` into `store`, expanding `$` references
/// and overwriting keys the store already has.
pub fn update<S: EnvStore + ?Sized>(path: impl AsRef<Path>, store: &mut S) -> Result<(), Error> {
    ingest(
        path,
        store,
        Policy {
            expand: true,
            update: true,
            forced: false,
        },
    )
}

/// Like [`update`], but `$` references are stored verbatim.
pub fn update_safe<S: EnvStore + ?Sized>(
    path: impl AsRef<Path>,
    store: &mut S,
) -> Result<(), Error> {
    ingest(
        path,
        store,
        Policy {
            expand: false,
            update: true,
            forced: false,
        },
    )
}
