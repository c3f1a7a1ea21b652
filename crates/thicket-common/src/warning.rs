//! Selector engine warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the finder to report recognized-but-unsupported pseudo-classes and
//! forgiven selector errors when a caller opts into diagnostics.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

fn warned_set() -> MutexGuard<'static, Option<HashSet<String>>> {
    // A panic while holding the lock leaves the set itself intact.
    WARNED.lock().unwrap_or_else(PoisonError::into_inner)
}

fn key(component: &str, message: &str) -> String {
    format!("[{component}] {message}")
}

/// Warn about an unsupported feature (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("Selector", "unsupported pseudo-class :visited");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let should_print = warned_set()
        .get_or_insert_with(HashSet::new)
        .insert(key(component, message));

    if should_print {
        eprintln!("{}", format!("[thicket {component}] ⚠ {message}").yellow());
    }
}

/// Whether `warn_once` has already printed this message.
pub fn warned(component: &str, message: &str) -> bool {
    warned_set()
        .as_ref()
        .is_some_and(|set| set.contains(&key(component, message)))
}

/// Clear all recorded warnings
pub fn clear_warnings() {
    if let Some(set) = warned_set().as_mut() {
        set.clear();
    }
}
