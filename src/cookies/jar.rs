//! In-memory cookie jar: one run's snapshot of the browser's cookie store.
//!
//! The jar is a two-level mapping, host → cookie name → record. It is built
//! fresh from the store on every run and discarded afterwards; nothing in
//! here persists.

use std::collections::HashMap;
use std::fmt;

/// A single cookie's data, minus its host and name (those are the jar keys).
///
/// The value field is intentionally redacted in Debug output to prevent
/// accidental logging of sensitive cookie data.
#[derive(Clone, PartialEq, Eq)]
pub struct CookieRecord {
    /// Unix timestamp for expiry, as stored by the browser.
    pub expiry: i64,
    /// Whether the cookie should only be sent over HTTPS.
    pub secure: bool,
    /// Cookie value (sensitive — never log).
    value: String,
}

impl CookieRecord {
    /// Creates a new record.
    #[must_use]
    pub fn new(value: String, expiry: i64, secure: bool) -> Self {
        Self {
            expiry,
            secure,
            value,
        }
    }

    /// Returns the cookie value.
    ///
    /// Cookie values are sensitive — avoid logging the return value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

// Custom Debug impl that redacts the cookie value.
impl fmt::Debug for CookieRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieRecord")
            .field("expiry", &self.expiry)
            .field("secure", &self.secure)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// The cookies of one host, in the order the store yielded them.
///
/// Names are unique within a host. Re-inserting an existing name replaces
/// the record but keeps its original position, so export order is stable
/// across runs against an unchanged store.
#[derive(Debug, Clone, Default)]
pub struct HostCookies {
    entries: Vec<(String, CookieRecord)>,
}

impl HostCookies {
    fn insert(&mut self, name: String, record: CookieRecord) {
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|(existing_name, _)| *existing_name == name)
        {
            existing.1 = record;
        } else {
            self.entries.push((name, record));
        }
    }

    /// Looks up a cookie by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CookieRecord> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, record)| record)
    }

    /// Iterates cookies in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CookieRecord)> {
        self.entries
            .iter()
            .map(|(name, record)| (name.as_str(), record))
    }

    /// Number of cookies for this host.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this host has no cookies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-run snapshot of all cookies, grouped by host.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    hosts: HashMap<String, HostCookies>,
}

impl CookieJar {
    /// Creates an empty jar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a cookie, overwriting any prior entry for the same
    /// (host, name) pair.
    pub fn insert(&mut self, host: String, name: String, record: CookieRecord) {
        self.hosts.entry(host).or_default().insert(name, record);
    }

    /// Looks up all cookies for a host.
    #[must_use]
    pub fn host(&self, host: &str) -> Option<&HostCookies> {
        self.hosts.get(host)
    }

    /// Looks up a single cookie by host and name.
    #[must_use]
    pub fn get(&self, host: &str, name: &str) -> Option<&CookieRecord> {
        self.hosts.get(host)?.get(name)
    }

    /// Number of distinct hosts in the jar.
    #[must_use]
    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    /// Total number of cookies across all hosts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hosts.values().map(HostCookies::len).sum()
    }

    /// Whether the jar holds no cookies at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}
