//! In-memory item storage.

use dashmap::DashMap;
use std::sync::Arc;

use crate::items::model::{Item, ItemId};
use crate::observability::metrics;

/// Storage contract used by the request handlers.
///
/// Implementations must be safe to share across concurrently running
/// handlers. Neither operation can fail.
pub trait ItemStore: Send + Sync {
    /// Look up the item stored under `id`.
    fn get(&self, id: ItemId) -> Option<Item>;

    /// Store `item` under `id`, replacing any previous entry.
    fn put(&self, id: ItemId, item: Item);

    /// Number of stored items.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local store backed by a sharded concurrent map.
///
/// Cloning is cheap and yields a handle to the same map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<DashMap<ItemId, Item>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ItemStore for MemoryStore {
    fn get(&self, id: ItemId) -> Option<Item> {
        self.inner.get(&id).map(|r| r.value().clone())
    }

    fn put(&self, id: ItemId, item: Item) {
        if self.inner.insert(id, item).is_some() {
            tracing::trace!(item_id = id, "Replaced existing item");
        }
        metrics::record_store_size(self.inner.len());
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, price: f64) -> Item {
        Item {
            name: name.to_string(),
            price,
            is_offer: None,
        }
    }

    #[test]
    fn test_put_then_get() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        let foo = Item {
            is_offer: Some(true),
            ..item("Foo", 3.5)
        };
        store.put(5, foo.clone());

        assert_eq!(store.get(5), Some(foo));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unknown_id_is_absent() {
        let store = MemoryStore::new();
        store.put(1, item("a", 1.0));
        assert!(store.get(999).is_none());
        assert!(store.get(-1).is_none());
    }

    #[test]
    fn test_put_is_idempotent() {
        let store = MemoryStore::new();
        for _ in 0..3 {
            store.put(7, item("same", 2.0));
        }
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(7), Some(item("same", 2.0)));
    }

    #[test]
    fn test_last_write_wins() {
        let store = MemoryStore::new();
        store.put(1, item("A", 1.0));
        store.put(1, item("B", 2.0));
        assert_eq!(store.get(1), Some(item("B", 2.0)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_extreme_ids() {
        let store = MemoryStore::new();
        store.put(i64::MIN, item("min", 0.0));
        store.put(i64::MAX, item("max", 0.0));
        assert_eq!(store.get(i64::MIN).map(|i| i.name), Some("min".to_string()));
        assert_eq!(store.get(i64::MAX).map(|i| i.name), Some("max".to_string()));
    }

    #[test]
    fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let handle = store.clone();
        handle.put(3, item("shared", 9.0));
        assert_eq!(store.get(3), Some(item("shared", 9.0)));
    }

    #[test]
    fn test_concurrent_writers() {
        let store = MemoryStore::new();
        let threads: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        store.put(t * 100 + i, item("x", i as f64));
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(store.len(), 800);
    }
}
