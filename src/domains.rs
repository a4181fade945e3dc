//! Deduplicating accumulator of normalized block entries.

use std::collections::HashSet;

/// IP address every blocked domain is pointed at.
pub const BLOCK_IP: &str = "0.0.0.0";

/// Format a bare, already-normalized domain as a hosts entry.
///
/// ```
/// use hostsmate::domains::entry_for;
/// assert_eq!(entry_for("ads.example.com"), "0.0.0.0 ads.example.com\n");
/// ```
pub fn entry_for(domain: &str) -> String {
    format!("{} {}\n", BLOCK_IP, domain)
}

/// Set of `0.0.0.0 <domain>\n` entries, created fresh for every update run.
#[derive(Debug, Default, Clone)]
pub struct DomainSet {
    entries: HashSet<String>,
}

impl DomainSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an already-normalized entry. Returns `false` if it was present.
    pub fn add(&mut self, entry: String) -> bool {
        self.entries.insert(entry)
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.entries.contains(entry)
    }

    /// Number of unique entries.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the set, yielding every entry in unspecified order.
    pub fn all(self) -> impl Iterator<Item = String> {
        self.entries.into_iter()
    }
}

impl Extend<String> for DomainSet {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}
