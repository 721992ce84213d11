use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::route::{Fingerprint, Route};

/// Process-wide route cache keyed by fingerprint.
///
/// An entry past its TTL is logically absent: lookups evict it lazily and
/// `remove_expired` sweeps proactively. A live entry is never replaced;
/// re-deriving the same fingerprint after expiry installs a fresh Route
/// rather than resurrecting the old one.
pub struct RoutingTable {
    table: DashMap<Fingerprint, Route>,
}

impl RoutingTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            table: DashMap::new(),
        }
    }

    /// Insert unless a live entry already exists for the fingerprint.
    /// Returns true if the route was installed.
    pub fn insert_if_absent(&self, route: Route, now: DateTime<Utc>) -> bool {
        match self.table.entry(route.fingerprint) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_expired(now) {
                    occupied.insert(route);
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(route);
                true
            }
        }
    }

    /// Look up a live route. Expired entries are evicted and reported
    /// absent.
    pub fn lookup(&self, fingerprint: &Fingerprint, now: DateTime<Utc>) -> Option<Route> {
        {
            let entry = self.table.get(fingerprint)?;
            if !entry.is_expired(now) {
                return Some(entry.clone());
            }
        }
        // The guard is dropped before eviction; re-check under the entry
        // lock in case a fresh route raced in.
        self.table.remove_if(fingerprint, |_, route| route.is_expired(now));
        None
    }

    /// Remove every expired entry. Returns the number removed.
    pub fn remove_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.table.len();
        self.table.retain(|_, route| !route.is_expired(now));
        before - self.table.len()
    }

    /// Number of entries currently stored, live or not yet swept.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::new()
    }
}
