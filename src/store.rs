//! Environment stores: the [`EnvStore`] trait plus process-backed and
//! in-memory implementations.

use std::collections::BTreeMap;
use std::env;

use crate::error::StoreError;

/// Key/value backend an ingestion call writes into.
///
/// The pipeline needs nothing beyond these operations, so env-file
/// contents can land in the real process environment or in an isolated
/// test double alike.
pub trait EnvStore {
    /// Value of `key`, or `None` when unset.
    fn get(&self, key: &str) -> Option<String>;

    /// Insert `key` or overwrite its value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn unset(&mut self, key: &str) -> Result<(), StoreError>;

    /// True when `key` is present, even with an empty value.
    fn exists(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove every key.
    fn clear(&mut self);

    /// Snapshot of the store as `"KEY=VALUE"` strings.
    fn environ(&self) -> Vec<String>;
}

/// True when every key in `keys` is present in `store`.
pub fn exists_all<S: EnvStore + ?Sized>(store: &S, keys: &[&str]) -> bool {
    keys.iter().all(|key| store.exists(key))
}

/// Keys must be non-empty and free of `=` and NUL; values free of NUL.
/// Checked up front so `std::env` never gets input it would panic on.
fn validate(key: &str, value: &str) -> Result<(), StoreError> {
    validate_key(key)?;
    if value.contains('\0') {
        return Err(StoreError::InvalidValue(key.to_string()));
    }
    Ok(())
}

fn validate_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() || key.contains('=') || key.contains('\0') {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Store backed by the process environment.
#[derive(Debug)]
pub struct ProcessEnv {
    _priv: (),
}

impl ProcessEnv {
    /// Create a handle on the process environment.
    ///
    /// # Safety
    ///
    /// Mutating the process environment is not thread-safe on POSIX:
    /// another thread reading it through libc while `set`, `unset`, or
    /// `clear` runs is undefined behavior. The caller must guarantee
    /// that nothing else touches the environment while this handle is
    /// used for writes.
    pub unsafe fn new() -> Self {
        ProcessEnv { _priv: () }
    }
}

impl EnvStore for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        validate(key, value)?;
        // SAFETY: upheld by the `ProcessEnv::new` contract.
        unsafe { env::set_var(key, value) };
        Ok(())
    }

    fn unset(&mut self, key: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        // SAFETY: upheld by the `ProcessEnv::new` contract.
        unsafe { env::remove_var(key) };
        Ok(())
    }

    fn exists(&self, key: &str) -> bool {
        env::var_os(key).is_some()
    }

    fn clear(&mut self) {
        for (key, _) in env::vars_os() {
            // SAFETY: upheld by the `ProcessEnv::new` contract.
            unsafe { env::remove_var(&key) };
        }
    }

    fn environ(&self) -> Vec<String> {
        env::vars_os()
            .map(|(k, v)| format!("{}={}", k.to_string_lossy(), v.to_string_lossy()))
            .collect()
    }
}

/// In-memory store for tests and isolated ingestion.
///
/// Rejects the same keys and values the process environment would, so
/// the two stay interchangeable. Iteration order is sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryEnv {
    vars: BTreeMap<String, String>,
}

impl MemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl EnvStore for MemoryEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        validate(key, value)?;
        self.vars.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn unset(&mut self, key: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        self.vars.remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    fn clear(&mut self) {
        self.vars.clear();
    }

    fn environ(&self) -> Vec<String> {
        self.vars.iter().map(|(k, v)| format!("{k}={v}")).collect()
    }
}
