//! Listeners: event names paired with logic, predicates and dependencies.

use std::fmt;
use std::sync::Arc;

use crate::entry::{sealed, EntryId, EntryKind, EventNames, Handle, Record};
use crate::registry::{Slot, Store};

/// Work to run when a listener reacts to an event.
pub type Logic = Arc<dyn Fn(&str) -> anyhow::Result<()> + Send + Sync>;

/// Guard deciding whether a listener should react to an event.
pub type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Work that must complete before a listener's logic runs.
pub type Dependency = Arc<dyn Fn(&str) -> anyhow::Result<()> + Send + Sync>;

/// Builder handle for a listener.
pub type Listener = Handle<ListenerRecord>;

/// Stored state of a listener.
///
/// The registry never calls the attached callables; they are carried for
/// whoever dispatches the listeners returned by
/// [`Registry::match_event`](crate::Registry::match_event).
#[derive(Clone, Default)]
pub struct ListenerRecord {
    id: Option<EntryId>,
    event_names: EventNames,
    logic: Vec<Logic>,
    predicates: Vec<Predicate>,
    dependencies: Vec<Dependency>,
}

impl ListenerRecord {
    pub fn logic(&self) -> &[Logic] {
        &self.logic
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }
}

impl fmt::Debug for ListenerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRecord")
            .field("id", &self.id)
            .field("event_names", &self.event_names)
            .field("logic", &self.logic.len())
            .field("predicates", &self.predicates.len())
            .field("dependencies", &self.dependencies.len())
            .finish()
    }
}

impl sealed::Sealed for ListenerRecord {
    fn assign_id(&mut self, id: EntryId) {
        self.id = Some(id);
    }

    fn event_names_mut(&mut self) -> &mut EventNames {
        &mut self.event_names
    }

    fn slots(store: &Store) -> &[Slot<Self>] {
        &store.listeners
    }

    fn slots_mut(store: &mut Store) -> &mut Vec<Slot<Self>> {
        &mut store.listeners
    }
}

impl Record for ListenerRecord {
    const KIND: EntryKind = EntryKind::Listener;

    fn id(&self) -> Option<EntryId> {
        self.id
    }

    fn event_names(&self) -> &[String] {
        &self.event_names
    }

    fn is_ready(&self) -> bool {
        !self.event_names.is_empty() && !self.logic.is_empty()
    }
}

impl Handle<ListenerRecord> {
    /// Attach logic. The first logic on a named listener persists it.
    pub fn add_logic<F>(&mut self, logic: F) -> &mut Self
    where
        F: Fn(&str) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let logic: Logic = Arc::new(logic);
        self.update(|record| record.logic.push(logic));
        self
    }

    /// Attach a guard. Guards never persist a listener on their own.
    pub fn add_predicate<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        let predicate: Predicate = Arc::new(predicate);
        self.update(|record| record.predicates.push(predicate));
        self
    }

    /// Attach a dependency. Dependencies never persist a listener on their own.
    pub fn add_dependency<F>(&mut self, dependency: F) -> &mut Self
    where
        F: Fn(&str) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let dependency: Dependency = Arc::new(dependency);
        self.update(|record| record.dependencies.push(dependency));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Registry;

    fn noop(_: &str) -> anyhow::Result<()> {
        Ok(())
    }

    fn always(_: &str) -> bool {
        true
    }

    #[test]
    fn new_listener_is_empty() {
        let registry = Registry::new();
        let record = Listener::new(&registry).record().unwrap();

        assert_eq!(record.id(), None);
        assert!(record.event_names().is_empty());
        assert!(record.logic().is_empty());
        assert!(record.predicates().is_empty());
        assert!(record.dependencies().is_empty());
    }

    #[test]
    fn callables_are_appended_with_duplicates() {
        let registry = Registry::new();
        let mut listener = Listener::new(&registry);
        listener
            .add_logic(noop)
            .add_logic(noop)
            .add_predicate(always)
            .add_dependency(noop)
            .add_dependency(noop)
            .add_dependency(noop);

        let record = listener.record().unwrap();
        assert_eq!(record.logic().len(), 2);
        assert_eq!(record.predicates().len(), 1);
        assert_eq!(record.dependencies().len(), 3);
        assert!(!listener.is_saved());
    }

    #[test]
    fn persists_once_named_and_given_logic() {
        let registry = Registry::new();
        let mut listener = Listener::new(&registry);
        let start = registry.listeners().len();

        assert!(!listener.add_event_name("name").is_saved());
        assert!(!listener.add_predicate(always).is_saved());
        assert!(!listener.add_dependency(noop).is_saved());
        assert!(listener.add_logic(noop).is_saved());

        assert_eq!(registry.listeners().len(), start + 1);
        assert_eq!(listener.id(), Some(start));
    }

    #[test]
    fn persists_when_logic_comes_first() {
        let registry = Registry::new();
        let mut listener = Listener::new(&registry);

        assert!(!listener.add_logic(noop).is_saved());
        assert!(listener.add_event_name("late").is_saved());
        assert_eq!(registry.match_event("late").len(), 1);
    }

    #[test]
    fn stored_record_mirrors_the_handle() {
        let registry = Registry::new();
        let mut listener = Listener::new(&registry);
        listener
            .add_event_name("p:name")
            .add_logic(noop)
            .add_predicate(always)
            .add_dependency(noop);

        let id = listener.id().unwrap();
        let stored = registry.listener(id).unwrap();
        let seen = listener.record().unwrap();

        assert_eq!(stored.id(), Some(id));
        assert_eq!(stored.event_names(), seen.event_names());
        assert_eq!(stored.logic().len(), 1);
        assert_eq!(stored.predicates().len(), 1);
        assert_eq!(stored.dependencies().len(), 1);
        assert!(Arc::ptr_eq(&stored.logic()[0], &seen.logic()[0]));
    }

    #[test]
    fn callables_added_after_save_reach_storage() {
        let registry = Registry::new();
        let mut listener = Listener::new(&registry);
        listener.add_event_name("name").add_logic(noop);
        listener.add_predicate(always).add_logic(noop);

        let stored = registry.listener(listener.id().unwrap()).unwrap();
        assert_eq!(stored.logic().len(), 2);
        assert_eq!(stored.predicates().len(), 1);
    }
}
