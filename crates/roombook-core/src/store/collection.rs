// ── Generic reactive entity collection ──
//
// Ordered storage for one entity type. The `watch` sender is the
// storage itself: every mutation publishes a fresh snapshot.

use std::sync::Arc;

use roombook_types::{Booking, Room};
use tokio::sync::watch;

/// Entities addressable by a server-assigned string id.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Room {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Booking {
    fn key(&self) -> &str {
        &self.id
    }
}

/// An ordered, reactive collection for a single entity type.
///
/// Order is whatever the server returned, with new entities appended.
/// Snapshots are `Arc<Vec<Arc<T>>>`, so readers never block writers
/// for longer than a pointer clone.
pub(crate) struct EntityCollection<T: Keyed + Send + Sync + 'static> {
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Keyed + Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self { snapshot }
    }

    /// Replace the whole collection.
    pub(crate) fn replace_all(&self, entities: Vec<T>) {
        let values: Vec<Arc<T>> = entities.into_iter().map(Arc::new).collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }

    /// Append an entity and return the shared handle.
    pub(crate) fn push(&self, entity: T) -> Arc<T> {
        let entity = Arc::new(entity);
        self.snapshot
            .send_modify(|snap| Arc::make_mut(snap).push(Arc::clone(&entity)));
        entity
    }

    /// Swap the entity with the same key in place. Returns `false` when
    /// no entity has that key; the collection is then left untouched.
    pub(crate) fn replace(&self, entity: T) -> bool {
        let entity = Arc::new(entity);
        self.snapshot.send_if_modified(|snap| {
            let Some(pos) = snap.iter().position(|e| e.key() == entity.key()) else {
                return false;
            };
            Arc::make_mut(snap)[pos] = Arc::clone(&entity);
            true
        })
    }

    /// Remove an entity by key. Returns the removed entity if it existed.
    pub(crate) fn remove(&self, key: &str) -> Option<Arc<T>> {
        let mut removed = None;
        self.snapshot.send_if_modified(|snap| {
            let Some(pos) = snap.iter().position(|e| e.key() == key) else {
                return false;
            };
            removed = Some(Arc::make_mut(snap).remove(pos));
            true
        });
        removed
    }

    pub(crate) fn get(&self, key: &str) -> Option<Arc<T>> {
        self.snapshot
            .borrow()
            .iter()
            .find(|e| e.key() == key)
            .map(Arc::clone)
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn clear(&self) {
        self.replace_all(Vec::new());
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: &'static str,
        value: u32,
    }

    impl Keyed for Item {
        fn key(&self) -> &str {
            self.id
        }
    }

    fn item(id: &'static str, value: u32) -> Item {
        Item { id, value }
    }

    #[test]
    fn push_appends_in_order() {
        let col = EntityCollection::new();
        col.push(item("a", 1));
        col.push(item("b", 2));

        let ids: Vec<_> = col.snapshot().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn replace_keeps_position() {
        let col = EntityCollection::new();
        col.replace_all(vec![item("a", 1), item("b", 2), item("c", 3)]);

        assert!(col.replace(item("b", 20)));
        let values: Vec<_> = col.snapshot().iter().map(|e| e.value).collect();
        assert_eq!(values, vec![1, 20, 3]);
    }

    #[test]
    fn replace_unknown_key_is_noop() {
        let col = EntityCollection::new();
        col.push(item("a", 1));
        let rx = col.subscribe();

        assert!(!col.replace(item("zz", 9)));
        assert!(!rx.has_changed().unwrap());
        assert_eq!(col.len(), 1);
    }

    #[test]
    fn remove_returns_entity() {
        let col = EntityCollection::new();
        col.replace_all(vec![item("a", 1), item("b", 2)]);

        assert_eq!(col.remove("a").unwrap().value, 1);
        assert!(col.remove("a").is_none());
        assert!(col.get("a").is_none());
        assert_eq!(col.get("b").unwrap().value, 2);
    }

    #[test]
    fn old_snapshots_are_not_mutated() {
        let col = EntityCollection::new();
        col.push(item("a", 1));
        let before = col.snapshot();

        col.push(item("b", 2));
        col.replace(item("a", 10));

        assert_eq!(before.len(), 1);
        assert_eq!(before[0].value, 1);
        assert_eq!(col.snapshot().len(), 2);
    }

    #[test]
    fn subscribers_see_changes() {
        let col = EntityCollection::new();
        let mut rx = col.subscribe();
        col.push(item("a", 1));

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);

        col.clear();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow().is_empty());
    }
}
