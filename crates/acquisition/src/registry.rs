use core_types::TagToken;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct RegistryInner {
    seen: HashSet<TagToken>,
    // Acceptance order, for display. Same members as `seen`.
    order: Vec<TagToken>,
}

/// Set of distinct tag tokens observed since the last clear.
///
/// Every operation takes one short lock, so `count()` from the foreground
/// always sees a value the set actually held, and insert-or-reject is a
/// single step for the background reader.
#[derive(Default)]
pub struct DedupRegistry {
    inner: Mutex<RegistryInner>,
}

impl DedupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the set half-updated
    // (each mutation is a single insert/push pair), so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add `token` if absent. Returns false and changes nothing for a duplicate.
    pub fn try_insert(&self, token: TagToken) -> bool {
        self.insert_if_new(token).is_some()
    }

    /// Like [`try_insert`](Self::try_insert), but returns the count that
    /// includes the new token, read under the same lock.
    pub fn insert_if_new(&self, token: TagToken) -> Option<usize> {
        let mut inner = self.lock();
        if inner.seen.contains(&token) {
            return None;
        }
        inner.seen.insert(token.clone());
        inner.order.push(token);
        Some(inner.seen.len())
    }

    pub fn count(&self) -> usize {
        self.lock().seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn contains(&self, token: &TagToken) -> bool {
        self.lock().seen.contains(token)
    }

    /// Snapshot of accepted tokens in the order they were first seen.
    pub fn tags(&self) -> Vec<TagToken> {
        self.lock().order.clone()
    }

    /// Forget every token. Only call while no session is connecting or reading.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.seen.clear();
        inner.order.clear();
    }
}

impl std::fmt::Debug for DedupRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DedupRegistry")
            .field("count", &self.count())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn tag(s: &str) -> TagToken {
        TagToken::new(s).unwrap()
    }

    #[test]
    fn test_second_insert_is_rejected() {
        let registry = DedupRegistry::new();
        assert!(registry.try_insert(tag("E200")));
        assert!(!registry.try_insert(tag("E200")));
        assert_eq!(registry.count(), 1);
        assert!(registry.contains(&tag("E200")));
    }

    #[test]
    fn test_insert_if_new_reports_count() {
        let registry = DedupRegistry::new();
        assert_eq!(registry.insert_if_new(tag("A1")), Some(1));
        assert_eq!(registry.insert_if_new(tag("B2")), Some(2));
        assert_eq!(registry.insert_if_new(tag("A1")), None);
        assert_eq!(registry.tags(), vec![tag("A1"), tag("B2")]);
    }

    #[test]
    fn test_clear_behaves_like_fresh_registry() {
        let registry = DedupRegistry::new();
        registry.try_insert(tag("A1"));
        registry.try_insert(tag("B2"));
        registry.clear();

        assert!(registry.is_empty());
        assert!(registry.tags().is_empty());
        assert_eq!(registry.insert_if_new(tag("B2")), Some(1));
        assert_eq!(registry.insert_if_new(tag("A1")), Some(2));
        assert!(!registry.try_insert(tag("A1")));
    }

    #[test]
    fn test_concurrent_reader_sees_monotonic_count() {
        let registry = Arc::new(DedupRegistry::new());
        let writer_registry = Arc::clone(&registry);

        let writer = std::thread::spawn(move || {
            for i in 0..500 {
                writer_registry.try_insert(tag(&format!("T{i}")));
                writer_registry.try_insert(tag(&format!("T{i}")));
            }
        });

        let mut last = 0;
        while !writer.is_finished() {
            let now = registry.count();
            assert!(now >= last, "count went backwards: {last} → {now}");
            last = now;
        }
        writer.join().unwrap();
        assert_eq!(registry.count(), 500);
        assert_eq!(registry.tags().len(), 500);
    }
}
