//! Tenant-scoped, write-through entity collections.
//!
//! An [`EntityStore`] owns one ordered `Vec` of entities. It is hydrated from
//! the key-value store on open (seeding when the snapshot is absent or
//! malformed), and every mutation re-serializes the whole collection back to
//! the same key before subscribers are notified.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use ulid::Ulid;

use crate::error::{PortalError, PortalResult};
use crate::observer::{Subscribers, Subscription};
use crate::storage::KeyValueStore;
use crate::tenant::TenantRegistry;

pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Logical collection name, the last segment of the storage key.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    /// Canonical dataset materialized when nothing usable is persisted.
    fn seed() -> Vec<Self>;
}

/// 26-character ULID: millisecond timestamp plus 80 random bits.
pub fn generate_id() -> String {
    Ulid::new().to_string()
}

/// Midnight UTC on the given day; the Unix epoch if the date is invalid.
pub(crate) fn calendar_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

pub struct EntityStore<E: Entity> {
    kv: KeyValueStore,
    storage_key: String,
    items: Vec<E>,
    subscribers: Subscribers<[E]>,
}

impl<E: Entity> EntityStore<E> {
    pub fn open(kv: KeyValueStore, registry: &TenantRegistry) -> Self {
        let storage_key = registry.storage_key_for(E::COLLECTION);
        let items = hydrate::<E>(&kv, &storage_key);
        Self {
            kv,
            storage_key,
            items,
            subscribers: Subscribers::new(),
        }
    }

    /// Points the store at the registry's current tenant namespace. The
    /// previous tenant's collection is left untouched in storage.
    pub fn rebind(&mut self, registry: &TenantRegistry) {
        let storage_key = registry.storage_key_for(E::COLLECTION);
        if storage_key == self.storage_key {
            return;
        }
        self.items = hydrate::<E>(&self.kv, &storage_key);
        self.storage_key = storage_key;
        self.subscribers.notify(&self.items);
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn list(&self) -> &[E] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&E> {
        self.items.iter().find(|e| e.id() == id)
    }

    /// Always reports success; deleting an unknown id still rewrites the
    /// snapshot.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|e| e.id() != id);
        debug!(
            collection = E::COLLECTION,
            id,
            removed = before - self.items.len(),
            "delete"
        );
        self.commit();
        true
    }

    pub fn filter(&self, predicate: impl Fn(&E) -> bool) -> Vec<E> {
        self.items.iter().filter(|e| predicate(e)).cloned().collect()
    }

    pub fn subscribe(&self, callback: impl Fn(&[E]) + Send + Sync + 'static) -> Subscription {
        self.subscribers.subscribe(callback)
    }

    pub(crate) fn push(&mut self, entity: E) -> E {
        self.items.push(entity.clone());
        self.commit();
        entity
    }

    /// Applies `apply` to a copy of the entity with `id` and stores the copy
    /// only if `apply` succeeds, so a failed nested lookup leaves the
    /// collection untouched.
    pub(crate) fn modify(
        &mut self,
        id: &str,
        not_found: impl FnOnce() -> PortalError,
        apply: impl FnOnce(&mut E) -> PortalResult<()>,
    ) -> PortalResult<E> {
        let index = self
            .items
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(not_found)?;

        let mut updated = self.items[index].clone();
        apply(&mut updated)?;
        self.items[index] = updated.clone();
        self.commit();
        Ok(updated)
    }

    fn commit(&mut self) {
        persist(&self.kv, &self.storage_key, &self.items);
        self.subscribers.notify(&self.items);
    }
}

fn hydrate<E: Entity>(kv: &KeyValueStore, key: &str) -> Vec<E> {
    match kv.read(key) {
        Some(raw) => match serde_json::from_str::<Vec<E>>(&raw) {
            Ok(items) => {
                debug!(key, count = items.len(), "hydrated collection");
                return items;
            }
            Err(err) => warn!(key, error = %err, "malformed snapshot, reseeding"),
        },
        None => debug!(key, "no snapshot, seeding"),
    }

    let seed = E::seed();
    persist(kv, key, &seed);
    seed
}

fn persist<E: Entity>(kv: &KeyValueStore, key: &str, items: &[E]) {
    match serde_json::to_string(items) {
        Ok(raw) => kv.write(key, &raw),
        Err(err) => warn!(key, error = %err, "failed to serialize collection"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde::Deserialize;

    use super::*;
    use crate::tenant::{StaticConfigSource, TenantKey};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        body: String,
    }

    impl Entity for Note {
        const COLLECTION: &'static str = "notes";

        fn id(&self) -> &str {
            &self.id
        }

        fn seed() -> Vec<Self> {
            vec![Note {
                id: "seed".into(),
                body: "hello".into(),
            }]
        }
    }

    fn registry(kv: &KeyValueStore) -> TenantRegistry {
        let mut registry = TenantRegistry::new(
            kv.clone(),
            StaticConfigSource::new(),
            TenantKey::parse("amani").unwrap(),
        );
        registry.initialize();
        registry
    }

    fn note(id: &str) -> Note {
        Note {
            id: id.into(),
            body: String::new(),
        }
    }

    #[test]
    fn seeds_and_persists_when_empty() {
        let kv = KeyValueStore::in_memory();
        let store: EntityStore<Note> = EntityStore::open(kv.clone(), &registry(&kv));
        assert_eq!(store.list(), Note::seed().as_slice());
        assert!(kv.read("donors-app::amani::notes").is_some());
    }

    #[test]
    fn malformed_snapshot_is_replaced_by_seed() {
        let kv = KeyValueStore::in_memory();
        kv.write("donors-app::amani::notes", "[{\"id\": 7");
        let store: EntityStore<Note> = EntityStore::open(kv.clone(), &registry(&kv));
        assert_eq!(store.len(), 1);
        let raw = kv.read("donors-app::amani::notes").unwrap();
        let persisted: Vec<Note> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, Note::seed());
    }

    #[test]
    fn empty_snapshot_is_respected() {
        let kv = KeyValueStore::in_memory();
        kv.write("donors-app::amani::notes", "[]");
        let store: EntityStore<Note> = EntityStore::open(kv.clone(), &registry(&kv));
        assert!(store.is_empty());
    }

    #[test]
    fn delete_is_idempotent() {
        let kv = KeyValueStore::in_memory();
        let mut store: EntityStore<Note> = EntityStore::open(kv.clone(), &registry(&kv));
        store.push(note("a"));
        assert_eq!(store.len(), 2);
        assert!(store.delete("a"));
        assert!(store.delete("a"));
        assert_eq!(store.len(), 1);
        assert!(store.delete("never-existed"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn failed_modify_changes_nothing() {
        let kv = KeyValueStore::in_memory();
        let mut store: EntityStore<Note> = EntityStore::open(kv.clone(), &registry(&kv));
        let before = kv.read(store.storage_key());

        let err = store
            .modify(
                "seed",
                || PortalError::Other("missing".into()),
                |n| {
                    n.body = "changed".into();
                    Err(PortalError::Other("nested lookup failed".into()))
                },
            )
            .unwrap_err();
        assert!(matches!(err, PortalError::Other(_)));
        assert_eq!(store.get_by_id("seed").unwrap().body, "hello");
        assert_eq!(kv.read(store.storage_key()), before);

        let err = store
            .modify("ghost", || PortalError::Other("ghost".into()), |_| Ok(()))
            .unwrap_err();
        assert_eq!(err.to_string(), "ghost");
    }

    #[test]
    fn subscribers_receive_post_write_snapshots() {
        let kv = KeyValueStore::in_memory();
        let mut store: EntityStore<Note> = EntityStore::open(kv.clone(), &registry(&kv));
        let sizes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&sizes);
        let probe = kv.clone();
        let key = store.storage_key().to_string();
        let handle = store.subscribe(move |notes: &[Note]| {
            let persisted: Vec<Note> =
                serde_json::from_str(&probe.read(&key).unwrap()).unwrap();
            assert_eq!(persisted.as_slice(), notes);
            sink.lock().unwrap().push(notes.len());
        });

        store.push(note("a"));
        store.delete("seed");
        handle.unsubscribe();
        store.push(note("b"));

        assert_eq!(*sizes.lock().unwrap(), vec![2, 1]);
    }

    #[test]
    fn works_without_a_backend() {
        let kv = KeyValueStore::unavailable();
        let mut store: EntityStore<Note> = EntityStore::open(kv.clone(), &registry(&kv));
        store.push(note("a"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn generated_ids_are_ulids() {
        let a = generate_id();
        let b = generate_id();
        assert_eq!(a.len(), 26);
        assert!(Ulid::from_string(&a).is_ok());
        assert_ne!(a, b);
    }

    #[test]
    fn calendar_dates_are_midnight_utc() {
        assert_eq!(
            calendar_date(2024, 6, 1).to_rfc3339(),
            "2024-06-01T00:00:00+00:00"
        );
        assert_eq!(calendar_date(2024, 2, 30).timestamp(), 0);
    }
}
