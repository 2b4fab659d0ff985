//! Testing utilities for the switchboard registry.
//!
//! Fixtures build saved entries in one call so scenarios read as a list of
//! registrations followed by assertions on [`Registry::match_event`].

use switchboard::{EntryId, GroupListener, Listener, ListenerRecord, Record, Registry, Slot};

/// Logic that does nothing.
pub fn noop(_: &str) -> anyhow::Result<()> {
    Ok(())
}

/// Predicate that always holds.
pub fn always(_: &str) -> bool {
    true
}

/// A saved listener keyed to `names`, with one no-op logic.
pub fn listener_on(registry: &Registry, names: &[&str]) -> Listener {
    let mut listener = Listener::new(registry);
    for name in names {
        listener.add_event_name(*name);
    }
    listener.add_logic(noop);
    listener
}

/// A group keyed to `names` that fires `targets`.
pub fn group_on(registry: &Registry, names: &[&str], targets: &[&str]) -> GroupListener {
    let mut group = GroupListener::new(registry);
    for name in names {
        group.add_event_name(*name);
    }
    for target in targets {
        group.add_fire(*target);
    }
    group
}

/// Ids of matched listeners, in result order.
pub fn matched_ids(registry: &Registry, name: &str) -> Vec<EntryId> {
    registry
        .match_event(name)
        .iter()
        .filter_map(ListenerRecord::id)
        .collect()
}

/// Ids of the live slots, in order.
pub fn live_ids<R>(slots: &[Slot<R>]) -> Vec<EntryId> {
    slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| !slot.is_removed())
        .map(|(id, _)| id)
        .collect()
}

/// Assert that `name` resolves to exactly `expected` listeners.
#[track_caller]
pub fn assert_matches(registry: &Registry, name: &str, expected: usize) {
    let matched = registry.match_event(name);
    assert_eq!(
        matched.len(),
        expected,
        "match_event({name:?}) returned {matched:?}"
    );
}
