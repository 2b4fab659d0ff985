//! Fluent subscription builders over [`Listener`] and [`GroupListener`].
//!
//! ```ignore
//! let registry = Registry::new();
//!
//! Subscribe::new(&registry, "build:css").then(|_| compile_css());
//! Subscribe::new(&registry, "build:js").when(|_| js_enabled()).then(|_| bundle_js());
//!
//! // "build" now resolves to both tasks, in order.
//! GroupSubscribe::new(&registry, "build").tasks("build", [":css", "js"]);
//!
//! // Start "build" over from scratch.
//! GroupSubscribe::new(&registry, "build").replace().task("build", "js");
//! ```

use tracing::debug;

use crate::error::Result;
use crate::group::GroupListener;
use crate::listener::Listener;
use crate::name::EventName;
use crate::registry::Registry;

/// A listener keyed to one event name from the start.
#[derive(Debug)]
pub struct Subscribe {
    name: String,
    listener: Listener,
}

impl Subscribe {
    pub fn new(registry: &Registry, name: impl Into<String>) -> Self {
        let name = name.into();
        let mut listener = Listener::new(registry);
        listener.add_event_name(name.clone());
        Self { name, listener }
    }

    /// Subscribe to `task` under `namespace`, joined with the registry's
    /// separator.
    pub fn task(registry: &Registry, namespace: &str, task: &str) -> Result<Self> {
        let name = EventName::join(namespace, task, registry.config().separator)?;
        Ok(Self::new(registry, name))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn listener(&self) -> &Listener {
        &self.listener
    }

    /// Also react to `name`.
    pub fn on(&mut self, name: impl Into<String>) -> &mut Self {
        let name: String = name.into();
        self.listener.add_event_name(name);
        self
    }

    /// Run `logic` when the event fires.
    pub fn then<F>(&mut self, logic: F) -> &mut Self
    where
        F: Fn(&str) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.listener.add_logic(logic);
        self
    }

    /// Only react while `predicate` holds.
    pub fn when<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.listener.add_predicate(predicate);
        self
    }

    /// Require `dependency` to run first.
    pub fn after<F>(&mut self, dependency: F) -> &mut Self
    where
        F: Fn(&str) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.listener.add_dependency(dependency);
        self
    }

    /// Flush every name of this subscription and start a fresh one under
    /// its first name.
    pub fn replace(self) -> Self {
        let registry = self.listener.registry().clone();
        let mut names = self.listener.event_names();
        if !names.contains(&self.name) {
            names.push(self.name.clone());
        }
        for name in &names {
            registry.flush(name);
        }
        Self::new(&registry, self.name)
    }
}

/// A group listener keyed to one event name from the start.
#[derive(Debug)]
pub struct GroupSubscribe {
    name: String,
    group: GroupListener,
}

impl GroupSubscribe {
    pub fn new(registry: &Registry, name: impl Into<String>) -> Self {
        let name = name.into();
        let mut group = GroupListener::new(registry);
        group.add_event_name(name.clone());
        Self { name, group }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &GroupListener {
        &self.group
    }

    /// Fire each of `names` when the group matches.
    pub fn events<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name: String = name.into();
            self.group.add_fire(name);
        }
        self
    }

    /// Fire `name` when the group matches.
    pub fn event(&mut self, name: impl Into<String>) -> &mut Self {
        self.events([name])
    }

    /// Fire each task of `namespace` when the group matches.
    ///
    /// Tasks are joined onto `namespace` with the registry's separator; a
    /// leading separator on a task is dropped. Tasks that leave nothing after
    /// the separator are skipped.
    pub fn tasks<I, S>(&mut self, namespace: &str, tasks: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let separator = self.group.registry().config().separator;
        for task in tasks {
            match EventName::join(namespace, task.as_ref(), separator) {
                Ok(name) => {
                    self.group.add_fire(name);
                }
                Err(err) => debug!(group = %self.name, %err, "skipping task"),
            }
        }
        self
    }

    /// Fire one task of `namespace` when the group matches.
    pub fn task(&mut self, namespace: &str, task: &str) -> &mut Self {
        self.tasks(namespace, [task])
    }

    /// Flush every entry keyed to this group's name and start a fresh group
    /// under it.
    pub fn replace(self) -> Self {
        let registry = self.group.registry().clone();
        registry.flush(&self.name);
        Self::new(&registry, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Record, RegistryConfig};

    fn noop(_: &str) -> anyhow::Result<()> {
        Ok(())
    }

    fn fire(group: &GroupSubscribe) -> Vec<String> {
        group.group().record().unwrap().fire().to_vec()
    }

    #[test]
    fn group_is_keyed_to_its_name() {
        let registry = Registry::new();
        let group = GroupSubscribe::new(&registry, "default-group-name");

        assert_eq!(group.group().event_names(), vec!["default-group-name"]);
        assert!(!group.group().is_saved());
    }

    #[test]
    fn events_add_fire_targets() {
        let registry = Registry::new();
        let mut group = GroupSubscribe::new(&registry, "g");

        group.event("name1");
        assert_eq!(fire(&group), vec!["name1"]);

        group.events(["name2", "name3"]);
        assert_eq!(fire(&group), vec!["name1", "name2", "name3"]);
        assert!(group.group().is_saved());
    }

    #[test]
    fn events_with_nothing_is_chainable() {
        let registry = Registry::new();
        let mut group = GroupSubscribe::new(&registry, "g");
        let expected: *const GroupSubscribe = &group;

        assert!(std::ptr::eq(group.events(Vec::<String>::new()), expected));
        assert!(std::ptr::eq(group.tasks("event", Vec::<&str>::new()), expected));
    }

    #[test]
    fn tasks_join_namespace_and_task() {
        let registry = Registry::new();
        let mut group = GroupSubscribe::new(&registry, "g");

        group
            .tasks("event", ["task", "last"])
            .task("event", "task:subtask")
            .tasks("event", [":first", ":"]);

        assert_eq!(
            fire(&group),
            vec!["event:task", "event:last", "event:task:subtask", "event:first"]
        );
    }

    #[test]
    fn tasks_follow_configured_separator() {
        let registry = Registry::with_config(RegistryConfig::default().with_separator('/')).unwrap();
        let mut group = GroupSubscribe::new(&registry, "g");
        group.task("event", "/task");

        assert_eq!(fire(&group), vec!["event/task"]);
    }

    #[test]
    fn subscribe_builds_a_listener() {
        let registry = Registry::new();
        let mut sub = Subscribe::new(&registry, "event");
        sub.when(|_| true).after(noop).then(noop).on("other");

        let record = sub.listener().record().unwrap();
        assert!(sub.listener().is_saved());
        assert_eq!(record.event_names(), ["event", "other"]);
        assert_eq!(record.predicates().len(), 1);
        assert_eq!(record.dependencies().len(), 1);
        assert_eq!(registry.match_event("other").len(), 1);
    }

    #[test]
    fn subscribe_task_joins_name() {
        let registry = Registry::new();
        let sub = Subscribe::task(&registry, "event", ":task").unwrap();
        assert_eq!(sub.name(), "event:task");

        assert!(Subscribe::task(&registry, "", "task").is_err());
    }

    #[test]
    fn subscribe_replace_flushes_every_name() {
        let registry = Registry::new();
        let mut sub = Subscribe::new(&registry, "a");
        sub.on("b").then(noop);
        assert_eq!(registry.match_event("b").len(), 1);

        let mut sub = sub.replace();
        assert!(registry.match_event("a").is_empty());
        assert!(registry.match_event("b").is_empty());
        assert_eq!(sub.listener().event_names(), vec!["a"]);

        sub.then(noop);
        assert_eq!(registry.match_event("a").len(), 1);
        assert!(registry.match_event("b").is_empty());
    }

    #[test]
    fn subscribe_replace_after_flush_still_clears_first_name() {
        let registry = Registry::new();
        Subscribe::new(&registry, "a").then(noop);
        let mut sub = Subscribe::new(&registry, "a");
        sub.then(noop);
        registry.flush("a");
        Subscribe::new(&registry, "a").then(noop);

        let _ = sub.replace();
        assert!(registry.match_event("a").is_empty());
    }

    #[test]
    fn subscribe_replace_drops_earlier_listeners() {
        let registry = Registry::new();
        Subscribe::new(&registry, "event").then(noop);
        Subscribe::new(&registry, "event").then(noop);
        assert_eq!(registry.match_event("event").len(), 2);

        let mut sub = Subscribe::new(&registry, "event").replace();
        assert!(registry.match_event("event").is_empty());

        sub.then(noop);
        assert_eq!(registry.match_event("event").len(), 1);
    }
}
