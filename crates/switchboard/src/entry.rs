//! The capability shared by listeners and group listeners.
//!
//! An entity is built through a [`Handle`]. While it is incomplete the handle
//! owns a draft record. The first time the record becomes ready (see
//! [`Record::is_ready`]) it moves into the [`Registry`], which assigns its id.
//! From then on the handle only remembers the id, so every later builder call
//! writes straight into the stored record and storage never holds a stale copy.
//!
//! ```text
//! Unsaved ──(ready)──► Saved ──(flush of its only name)──► Removed
//! ```

use std::fmt;

use smallvec::SmallVec;
use tracing::trace;

use crate::name::EventName;
use crate::registry::Registry;

/// Identifier of a persisted entry: its index in the owning collection.
pub type EntryId = usize;

/// Event names an entry is keyed to. Most entries carry one or two.
pub type EventNames = SmallVec<[String; 2]>;

/// Which collection an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Listener,
    Group,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listener => f.write_str("listener"),
            Self::Group => f.write_str("group"),
        }
    }
}

pub(crate) mod sealed {
    use super::{EntryId, EventNames};
    use crate::registry::{Slot, Store};

    /// Storage plumbing for [`Record`](super::Record), out of reach of users.
    pub trait Sealed: Sized {
        fn assign_id(&mut self, id: EntryId);

        fn event_names_mut(&mut self) -> &mut EventNames;

        fn slots(store: &Store) -> &[Slot<Self>];

        fn slots_mut(store: &mut Store) -> &mut Vec<Slot<Self>>;
    }
}

/// A record the registry can store.
///
/// Implemented by [`ListenerRecord`](crate::ListenerRecord) and
/// [`GroupRecord`](crate::GroupRecord) only.
pub trait Record: sealed::Sealed + Clone + Default + fmt::Debug + Send + Sync + 'static {
    const KIND: EntryKind;

    /// `None` until persisted.
    fn id(&self) -> Option<EntryId>;

    fn event_names(&self) -> &[String];

    /// Whether the record has everything it needs to be persisted.
    fn is_ready(&self) -> bool;

    /// Whether `name` is one of this record's event names.
    fn listens_to(&self, name: &str) -> bool {
        self.event_names().iter().any(|n| n == name)
    }
}

#[derive(Debug)]
enum State<R> {
    Draft(R),
    Saved(EntryId),
}

/// Builder handle for one entry.
///
/// Use it through its aliases, [`Listener`](crate::Listener) and
/// [`GroupListener`](crate::GroupListener). Every builder method returns
/// `&mut Self` so calls chain, whether or not the input was accepted.
#[derive(Debug)]
pub struct Handle<R: Record> {
    registry: Registry,
    state: State<R>,
}

impl<R: Record> Handle<R> {
    /// Start an unsaved entry against `registry`.
    pub fn new(registry: &Registry) -> Self {
        Self {
            registry: registry.clone(),
            state: State::Draft(R::default()),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn id(&self) -> Option<EntryId> {
        match self.state {
            State::Draft(_) => None,
            State::Saved(id) => Some(id),
        }
    }

    pub fn is_saved(&self) -> bool {
        self.id().is_some()
    }

    /// Whether a flush has tombstoned the stored record.
    pub fn is_removed(&self) -> bool {
        match self.state {
            State::Draft(_) => false,
            State::Saved(id) => self.registry.read::<R>(id).is_none(),
        }
    }

    /// Current state of the entry: the draft before persistence, the stored
    /// record after. `None` once the entry has been removed.
    pub fn record(&self) -> Option<R> {
        match &self.state {
            State::Draft(record) => Some(record.clone()),
            State::Saved(id) => self.registry.read::<R>(*id),
        }
    }

    /// Event names of the entry; empty once removed.
    pub fn event_names(&self) -> Vec<String> {
        self.record()
            .map(|record| record.event_names().to_vec())
            .unwrap_or_default()
    }

    /// Key the entry to another event name. Empty names are ignored.
    pub fn add_event_name<N>(&mut self, name: N) -> &mut Self
    where
        N: TryInto<EventName>,
        <N as TryInto<EventName>>::Error: fmt::Display,
    {
        match name.try_into() {
            Ok(name) => self.update(|record| record.event_names_mut().push(name.into_string())),
            Err(err) => trace!(kind = %R::KIND, %err, "ignoring event name"),
        }
        self
    }

    /// Apply `f` to the entry, then persist it if it just became ready.
    pub(crate) fn update(&mut self, f: impl FnOnce(&mut R)) {
        match &mut self.state {
            State::Draft(record) => {
                f(record);
                if record.is_ready() {
                    let record = std::mem::take(record);
                    let id = self.registry.persist(record);
                    self.state = State::Saved(id);
                }
            }
            State::Saved(id) => {
                if !self.registry.update::<R>(*id, f) {
                    trace!(kind = %R::KIND, id = *id, "entry removed, ignoring update");
                }
            }
        }
    }
}
