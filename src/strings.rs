//! Deduplicating string-to-ID store backing literal identifiers in the trie.
//!
//! Every [`crate::Router`] owns its own [`StringPool`] instance. A single
//! process-wide table would tie every router's lifetime to whichever lives
//! longest; per-router pools avoid that coupling entirely.

/// A stable identifier for an interned string. IDs are assigned in
/// insertion order and are never reused or invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StringId(u32);

impl StringId {
    #[must_use]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

const PAGE_LEN: usize = 64;

/// Deduplicating, append-only string table.
///
/// Organized into fixed-size pages the way the node [`crate::pool::Pool`]
/// is, so `get` is an `O(1)` page/offset computation rather than a linear
/// scan; `find`/`find_nocase` remain linear scans over the interned set.
pub struct StringPool {
    pages: Vec<Vec<Box<str>>>,
}

impl StringPool {
    #[must_use]
    pub fn new() -> Self {
        StringPool { pages: Vec::new() }
    }

    /// Always inserts, returning a fresh id even if an equal string already exists.
    pub fn insert(&mut self, s: &str) -> StringId {
        if self.pages.last().map_or(true, |p| p.len() == PAGE_LEN) {
            self.pages.push(Vec::with_capacity(PAGE_LEN));
        }
        let ordinal = self.len();
        self.pages.last_mut().unwrap().push(s.into());
        StringId(ordinal as u32)
    }

    /// Insert `s` only if no existing entry compares equal under `cmp`;
    /// otherwise returns the existing id.
    pub fn insert_distinct(&mut self, s: &str, cmp: impl Fn(&str, &str) -> bool) -> StringId {
        if let Some(id) = self.find_by(|existing| cmp(existing, s)) {
            return id;
        }
        self.insert(s)
    }

    /// The interned string for `id`. Panics if `id` was not produced by this pool.
    #[must_use]
    pub fn get(&self, id: StringId) -> &str {
        let i = id.as_usize();
        &self.pages[i / PAGE_LEN][i % PAGE_LEN]
    }

    /// Linear scan for a string comparing equal under `cmp`.
    pub fn find(&self, s: &str, cmp: impl Fn(&str, &str) -> bool) -> Option<StringId> {
        self.find_by(|existing| cmp(existing, s))
    }

    /// Case-insensitive find — the common case for HTTP path segments and pattern identifiers.
    #[must_use]
    pub fn find_nocase(&self, s: &str) -> Option<StringId> {
        self.find(s, |a, b| a.eq_ignore_ascii_case(b))
    }

    fn find_by(&self, pred: impl Fn(&str) -> bool) -> Option<StringId> {
        let mut ordinal = 0u32;
        for page in &self.pages {
            for entry in page {
                if pred(entry) {
                    return Some(StringId(ordinal));
                }
                ordinal += 1;
            }
        }
        None
    }

    /// Length in bytes of the interned string `id`.
    #[must_use]
    pub fn strlen(&self, id: StringId) -> usize {
        self.get(id).len()
    }

    /// Total number of interned strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build a fresh pool from the non-empty (or, with `keep_empty`, all)
    /// substrings of `s` split on `separator`.
    #[must_use]
    pub fn split(separator: char, keep_empty: bool, s: &str) -> Self {
        let mut pool = StringPool::new();
        for part in s.split(separator) {
            if keep_empty || !part.is_empty() {
                pool.insert(part);
            }
        }
        pool
    }
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get_round_trip() {
        let mut pool = StringPool::new();
        let a = pool.insert("devices");
        let b = pool.insert("bus");
        assert_eq!(pool.get(a), "devices");
        assert_eq!(pool.get(b), "bus");
    }

    #[test]
    fn insert_distinct_dedupes_case_insensitively() {
        let mut pool = StringPool::new();
        let a = pool.insert_distinct("Devices", |x, y| x.eq_ignore_ascii_case(y));
        let b = pool.insert_distinct("devices", |x, y| x.eq_ignore_ascii_case(y));
        assert_eq!(a, b);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn find_nocase_locates_entries() {
        let mut pool = StringPool::new();
        pool.insert("Bus");
        assert!(pool.find_nocase("bus").is_some());
        assert!(pool.find_nocase("car").is_none());
    }

    #[test]
    fn ids_stay_stable_across_a_page_boundary() {
        let mut pool = StringPool::new();
        let mut ids = Vec::new();
        for i in 0..(PAGE_LEN * 2 + 3) {
            ids.push(pool.insert(&format!("s{i}")));
        }
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(pool.get(*id), format!("s{i}"));
        }
    }

    #[test]
    fn split_produces_non_empty_segments_by_default() {
        let pool = StringPool::split('/', false, "/api//devices/");
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get(StringId(0)), "api");
        assert_eq!(pool.get(StringId(1)), "devices");
    }
}
