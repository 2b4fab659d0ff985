//! Storage, matching and flushing.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::config::RegistryConfig;
use crate::entry::{EntryId, Record};
use crate::error::Result;
use crate::group::GroupRecord;
use crate::listener::ListenerRecord;

/// A position in one of the registry's collections.
///
/// Flushing an entry leaves a tombstone in its slot so that no other entry's
/// id ever shifts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<R> {
    Live(R),
    Removed,
}

impl<R> Slot<R> {
    pub fn as_live(&self) -> Option<&R> {
        match self {
            Self::Live(record) => Some(record),
            Self::Removed => None,
        }
    }

    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed)
    }
}

/// Backing collections, indexed by [`EntryId`].
#[derive(Debug, Default)]
pub struct Store {
    pub(crate) listeners: Vec<Slot<ListenerRecord>>,
    pub(crate) groups: Vec<Slot<GroupRecord>>,
}

/// Live and removed counts for one collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub live: usize,
    pub removed: usize,
}

impl CollectionStats {
    fn count<R>(slots: &[Slot<R>]) -> Self {
        let removed = slots.iter().filter(|slot| slot.is_removed()).count();
        Self {
            live: slots.len() - removed,
            removed,
        }
    }
}

/// Counts across the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub listeners: CollectionStats,
    pub groups: CollectionStats,
}

#[derive(Default)]
struct Inner {
    config: RegistryConfig,
    store: RwLock<Store>,
}

/// The event subscription registry.
///
/// Cloning is cheap and every clone sees the same entries. Separate
/// registries are fully isolated from each other.
///
/// # Matching
///
/// [`match_event`](Self::match_event) returns listeners keyed directly to the
/// name first, then the listeners reached through groups keyed to it, in
/// group id order and each group's fire order:
///
/// ```text
/// match_event("deploy")
///     │
///     ├─► listeners on "deploy"            (direct, ascending id)
///     │
///     └─► groups on "deploy"               (ascending id)
///             └─► for each fire target: match_event(target)
/// ```
#[derive(Clone, Default)]
pub struct Registry {
    inner: Arc<Inner>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with validated settings.
    pub fn with_config(config: RegistryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(Inner {
                config,
                store: RwLock::default(),
            }),
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.inner.config
    }

    /// Every listener that should react to `name`.
    ///
    /// Names are compared exactly. A listener reachable along several paths
    /// appears once per path. A group already being expanded further up the
    /// current path is skipped, so cyclic fire chains terminate.
    pub fn match_event(&self, name: &str) -> Vec<ListenerRecord> {
        let store = self.inner.store.read();
        let mut matched = Vec::new();
        let mut path = SmallVec::<[EntryId; 8]>::new();
        store.collect(name, &mut path, &mut matched);
        matched
    }

    /// Deregister `name`.
    ///
    /// Entries keyed only to `name` are tombstoned. Entries with other names
    /// lose `name` and stay persisted under the rest.
    pub fn flush(&self, name: &str) {
        let mut store = self.inner.store.write();
        let (listeners_removed, listeners_narrowed) = flush_slots(&mut store.listeners, name);
        let (groups_removed, groups_narrowed) = flush_slots(&mut store.groups, name);

        debug!(
            name,
            removed = listeners_removed + groups_removed,
            narrowed = listeners_narrowed + groups_narrowed,
            "flushed event name"
        );
    }

    /// Snapshot of the listener collection, tombstones included.
    pub fn listeners(&self) -> Vec<Slot<ListenerRecord>> {
        self.inner.store.read().listeners.clone()
    }

    /// Snapshot of the group collection, tombstones included.
    pub fn groups(&self) -> Vec<Slot<GroupRecord>> {
        self.inner.store.read().groups.clone()
    }

    pub fn listener(&self, id: EntryId) -> Option<ListenerRecord> {
        self.read::<ListenerRecord>(id)
    }

    pub fn group(&self, id: EntryId) -> Option<GroupRecord> {
        self.read::<GroupRecord>(id)
    }

    pub fn stats(&self) -> RegistryStats {
        let store = self.inner.store.read();
        RegistryStats {
            listeners: CollectionStats::count(&store.listeners),
            groups: CollectionStats::count(&store.groups),
        }
    }

    /// Take ownership of a ready record and give it the next id.
    pub(crate) fn persist<R: Record>(&self, mut record: R) -> EntryId {
        let mut store = self.inner.store.write();
        let slots = R::slots_mut(&mut store);
        let id = slots.len();
        record.assign_id(id);
        slots.push(Slot::Live(record));

        debug!(kind = %R::KIND, id, "entry persisted");
        id
    }

    /// Apply `f` to a live record. Returns `false` if the slot is a tombstone.
    pub(crate) fn update<R: Record>(&self, id: EntryId, f: impl FnOnce(&mut R)) -> bool {
        let mut store = self.inner.store.write();
        match R::slots_mut(&mut store).get_mut(id) {
            Some(Slot::Live(record)) => {
                f(record);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn read<R: Record>(&self, id: EntryId) -> Option<R> {
        let store = self.inner.store.read();
        R::slots(&store).get(id).and_then(Slot::as_live).cloned()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.inner.config)
            .field("stats", &self.stats())
            .finish()
    }
}

impl Store {
    fn collect(
        &self,
        name: &str,
        path: &mut SmallVec<[EntryId; 8]>,
        out: &mut Vec<ListenerRecord>,
    ) {
        out.extend(
            self.listeners
                .iter()
                .filter_map(Slot::as_live)
                .filter(|listener| listener.listens_to(name))
                .cloned(),
        );

        let groups = self
            .groups
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_live().map(|group| (id, group)))
            .filter(|(_, group)| group.listens_to(name));

        for (id, group) in groups {
            if path.contains(&id) {
                warn!(group = id, name, "cyclic group expansion, skipping");
                continue;
            }
            path.push(id);
            for target in group.fire() {
                self.collect(target, path, out);
            }
            path.pop();
        }
    }
}

/// Returns `(removed, narrowed)`.
fn flush_slots<R: Record>(slots: &mut [Slot<R>], name: &str) -> (usize, usize) {
    let mut removed = 0;
    let mut narrowed = 0;

    for slot in slots.iter_mut() {
        let Slot::Live(record) = slot else {
            continue;
        };
        if !record.listens_to(name) {
            continue;
        }

        record.event_names_mut().retain(|n| n.as_str() != name);
        if record.event_names().is_empty() {
            *slot = Slot::Removed;
            removed += 1;
        } else {
            narrowed += 1;
        }
    }

    (removed, narrowed)
}
