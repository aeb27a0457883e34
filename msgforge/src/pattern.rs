//! Cached regex matching for pattern validators.
//!
//! Generated validation code calls [`matches_pattern`] with patterns that
//! are compile-time constants of the schema, so the global cache stays
//! small and each pattern compiles once per process.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use regex::Regex;

fn cache() -> &'static Mutex<HashMap<String, Regex>> {
    static CACHE: OnceLock<Mutex<HashMap<String, Regex>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Whether `value` matches `pattern`.
///
/// An invalid pattern never matches; schema validation rejects malformed
/// patterns at compile time, so this path is unreachable for generated
/// callers.
pub fn matches_pattern(pattern: &str, value: &str) -> bool {
    let mut cache = cache().lock().expect("pattern cache poisoned");

    if let Some(regex) = cache.get(pattern) {
        return regex.is_match(value);
    }

    match Regex::new(pattern) {
        Ok(regex) => {
            let result = regex.is_match(value);
            cache.insert(pattern.to_string(), regex);
            result
        }
        Err(_) => false,
    }
}

/// Check a pattern for well-formedness, for compile-time validation.
pub fn check_pattern(pattern: &str) -> Result<(), String> {
    Regex::new(pattern).map(|_| ()).map_err(|e| e.to_string())
}
