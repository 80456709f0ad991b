//! In-memory snapshot of the trigger -> snippet mapping.
//!
//! The store holds whatever the persistence layer last reported and nothing
//! else: snapshots are replaced wholesale on [`TriggerStore::refresh`], never
//! patched. Keys are validated upstream; a malformed key simply never matches
//! because the scanner only ever produces well-formed or empty tokens.

use std::collections::HashMap;

use tracing::debug;

/// Mapping from trigger token (`/sig`, `#addr`) to snippet text.
pub type TriggerMap = HashMap<String, String>;

/// Holds the current trigger snapshot for the lifetime of the hosting page
/// or session. Created empty; refreshed whenever the persistence layer
/// reports a new snapshot.
#[derive(Debug, Default)]
pub struct TriggerStore {
    map: TriggerMap,
}

impl TriggerStore {
    /// Creates an empty store ("no triggers defined").
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `map`.
    pub fn with_map(map: TriggerMap) -> Self {
        Self { map }
    }

    /// The latest snapshot; empty until the first refresh.
    pub fn current(&self) -> &TriggerMap {
        &self.map
    }

    /// Looks up a scanned token.
    ///
    /// The empty token is the scanner's "no trigger present" outcome and
    /// never matches, even if the snapshot were to contain an empty key.
    pub fn get(&self, token: &str) -> Option<&str> {
        if token.is_empty() {
            return None;
        }
        self.map.get(token).map(String::as_str)
    }

    /// Replaces the held snapshot wholesale. An absent payload (a cleared or
    /// malformed notification) is treated as the empty map.
    pub fn refresh(&mut self, new_map: Option<TriggerMap>) {
        let map = new_map.unwrap_or_default();
        debug!(triggers = map.len(), "Trigger snapshot refreshed");
        self.map = map;
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_of(pairs: &[(&str, &str)]) -> TriggerMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = TriggerStore::new();
        assert!(store.is_empty());
        assert!(store.current().is_empty());
        assert_eq!(store.get("/sig"), None);
    }

    #[test]
    fn test_refresh_replaces_snapshot_wholesale() {
        let mut store = TriggerStore::new();
        store.refresh(Some(map_of(&[("/a", "alpha"), ("/b", "beta")])));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("/a"), Some("alpha"));

        // A later snapshot fully supersedes the previous one.
        store.refresh(Some(map_of(&[("/c", "gamma")])));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("/a"), None);
        assert_eq!(store.get("/c"), Some("gamma"));
    }

    #[test]
    fn test_refresh_with_absent_payload_yields_empty_map() {
        let mut store = TriggerStore::with_map(map_of(&[("/a", "alpha")]));
        store.refresh(None);
        assert!(store.is_empty());
        assert_eq!(store.get("/a"), None);
    }

    #[test]
    fn test_empty_token_never_matches() {
        // Even a (malformed) empty key in the snapshot must not match the
        // scanner's empty "no trigger" outcome.
        let store = TriggerStore::with_map(map_of(&[("", "oops")]));
        assert_eq!(store.get(""), None);
    }

    #[test]
    fn test_empty_snippet_is_a_valid_value() {
        let store = TriggerStore::with_map(map_of(&[("/clear", "")]));
        assert_eq!(store.get("/clear"), Some(""));
    }
}
