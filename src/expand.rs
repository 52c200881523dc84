//! `$VAR` and `${VAR}` substitution against an [`EnvStore`].

use crate::store::EnvStore;

/// Replace `$NAME` and `${NAME}` references in `value` with the
/// store's current values. Unset names expand to the empty string,
/// and a `$` that starts no valid reference is kept as-is.
pub fn expand<S: EnvStore + ?Sized>(store: &S, value: &str) -> String {
    shellexpand::env_with_context_no_errors(value, |name| {
        Some(store.get(name).unwrap_or_default())
    })
    .into_owned()
}
