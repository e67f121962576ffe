//! Recency store: a bounded, deduplicated, most-recent-first list of
//! previously searched cities, plus the single last-city value used to
//! pre-populate the next session. Persisted as a whole on every mutation.

use tracing::warn;

use crate::store::KeyValueStore;

/// Maximum number of remembered searches.
pub const MAX_RECENT: usize = 5;

const RECENT_KEY: &str = "recent_searches";
const LAST_CITY_KEY: &str = "last_city";

#[derive(Debug)]
pub struct RecentSearches<S: KeyValueStore> {
    store: S,
    entries: Vec<String>,
}

impl<S: KeyValueStore> RecentSearches<S> {
    /// Load the persisted list from `store`. Absent or malformed data is
    /// not an error — it degrades to an empty list.
    pub fn load(store: S) -> Self {
        let entries = match store.get(RECENT_KEY) {
            Some(json) => match serde_json::from_str::<Vec<String>>(&json) {
                Ok(list) => list,
                Err(err) => {
                    warn!(%err, "discarding malformed recent-search list");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Self { store, entries }
    }

    /// Record a successful lookup: canonicalize casing, drop any
    /// case-insensitive duplicate, insert at the front, truncate to
    /// [`MAX_RECENT`], persist. Returns the updated list so the caller can
    /// re-render the recency UI.
    pub fn record(&mut self, city: &str) -> &[String] {
        let canonical = canonicalize(city);

        self.entries
            .retain(|existing| !existing.eq_ignore_ascii_case(&canonical));
        self.entries.insert(0, canonical);
        self.entries.truncate(MAX_RECENT);

        self.persist();
        &self.entries
    }

    /// Empty the list and remove the persisted record. Confirmation is the
    /// caller's responsibility; this method is unconditional.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.store.remove(RECENT_KEY);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn set_last_city(&mut self, city: &str) {
        self.store.set(LAST_CITY_KEY, city.to_string());
    }

    pub fn last_city(&self) -> Option<String> {
        self.store.get(LAST_CITY_KEY)
    }

    fn persist(&mut self) {
        match serde_json::to_string(&self.entries) {
            Ok(json) => self.store.set(RECENT_KEY, json),
            Err(err) => warn!(%err, "failed to serialize recent-search list"),
        }
    }
}

/// Display form used for both storage and dedup comparison: first letter
/// upper-cased, remainder lower-cased.
fn canonicalize(city: &str) -> String {
    let mut chars = city.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
