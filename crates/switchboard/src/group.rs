//! Group listeners: event names that fan out to other event names.

use std::fmt;

use tracing::trace;

use crate::entry::{sealed, EntryId, EntryKind, EventNames, Handle, Record};
use crate::name::EventName;
use crate::registry::{Slot, Store};

/// Builder handle for a group listener.
pub type GroupListener = Handle<GroupRecord>;

/// Stored state of a group listener.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupRecord {
    id: Option<EntryId>,
    event_names: EventNames,
    fire: Vec<String>,
}

impl GroupRecord {
    /// Names resolved, in order, when the group is matched.
    pub fn fire(&self) -> &[String] {
        &self.fire
    }
}

impl sealed::Sealed for GroupRecord {
    fn assign_id(&mut self, id: EntryId) {
        self.id = Some(id);
    }

    fn event_names_mut(&mut self) -> &mut EventNames {
        &mut self.event_names
    }

    fn slots(store: &Store) -> &[Slot<Self>] {
        &store.groups
    }

    fn slots_mut(store: &mut Store) -> &mut Vec<Slot<Self>> {
        &mut store.groups
    }
}

impl Record for GroupRecord {
    const KIND: EntryKind = EntryKind::Group;

    fn id(&self) -> Option<EntryId> {
        self.id
    }

    fn event_names(&self) -> &[String] {
        &self.event_names
    }

    fn is_ready(&self) -> bool {
        !self.event_names.is_empty() && !self.fire.is_empty()
    }
}

impl Handle<GroupRecord> {
    /// Add a name to fire when the group matches. Empty names are ignored.
    pub fn add_fire<N>(&mut self, name: N) -> &mut Self
    where
        N: TryInto<EventName>,
        <N as TryInto<EventName>>::Error: fmt::Display,
    {
        match name.try_into() {
            Ok(name) => self.update(|record| record.fire.push(name.into_string())),
            Err(err) => trace!(%err, "ignoring fire target"),
        }
        self
    }
}
