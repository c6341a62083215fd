// ── Generic record collection ──
//
// Insertion-ordered storage with push-based change notification via a
// `watch` version counter.

use std::hash::Hash;

use indexmap::IndexMap;
use tokio::sync::watch;

/// Records of one kind, iterated in first-seen order.
///
/// Every mutation bumps a version counter that subscribers can await.
#[derive(Debug)]
pub(crate) struct RecordCollection<K, T> {
    records: IndexMap<K, T>,
    version: watch::Sender<u64>,
}

impl<K: Hash + Eq + Clone, T> RecordCollection<K, T> {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        Self {
            records: IndexMap::new(),
            version,
        }
    }

    /// Merge into the record at `key`, creating it first if needed.
    /// Returns `true` if the key was new.
    pub(crate) fn upsert_with(
        &mut self,
        key: K,
        create: impl FnOnce(K) -> T,
        merge: impl FnOnce(&mut T),
    ) -> bool {
        let is_new = !self.records.contains_key(&key);
        let record = self.records.entry(key.clone()).or_insert_with(|| create(key));
        merge(record);
        self.bump_version();
        is_new
    }

    pub(crate) fn get(&self, key: &K) -> Option<&T> {
        self.records.get(key)
    }

    pub(crate) fn keys(&self) -> Vec<K> {
        self.records.keys().cloned().collect()
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &T> {
        self.records.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    pub(crate) fn version(&self) -> u64 {
        *self.version.borrow()
    }

    fn bump_version(&self) {
        // `send_modify` updates unconditionally, even with zero receivers.
        self.version.send_modify(|v| *v += 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_seen_order_and_bumps_version() {
        let mut collection: RecordCollection<String, Vec<u8>> = RecordCollection::new();
        let rx = collection.subscribe();

        assert!(collection.upsert_with("b".into(), |_| Vec::new(), |v| v.push(1)));
        assert!(collection.upsert_with("a".into(), |_| Vec::new(), |v| v.push(2)));
        assert!(!collection.upsert_with("b".into(), |_| Vec::new(), |v| v.push(3)));

        assert_eq!(collection.keys(), vec!["b".to_owned(), "a".to_owned()]);
        assert_eq!(collection.get(&"b".to_owned()), Some(&vec![1, 3]));
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.version(), 3);
        assert!(rx.has_changed().unwrap_or(false));
    }
}
