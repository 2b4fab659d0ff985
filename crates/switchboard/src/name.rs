//! Validated event names.

use crate::error::{Result, SwitchboardError};

/// A non-empty event name.
///
/// Names are compared by exact string equality. Any structure inside a name
/// (such as `build:assets:css`) is a convention of the caller; the registry
/// never matches on prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventName(String);

impl EventName {
    /// Validate a name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SwitchboardError::EmptyEventName);
        }
        Ok(Self(name))
    }

    /// Compose `namespace`, `separator` and `task` into one name.
    ///
    /// A single leading separator on `task` is dropped, so `("event", ":task")`
    /// and `("event", "task")` both give `event:task`. Separators inside the
    /// task are kept.
    pub fn join(namespace: &str, task: &str, separator: char) -> Result<Self> {
        if namespace.is_empty() {
            return Err(SwitchboardError::EmptyNamespace);
        }
        let task = task.strip_prefix(separator).unwrap_or(task);
        if task.is_empty() {
            return Err(SwitchboardError::EmptyTask {
                namespace: namespace.to_string(),
            });
        }
        Ok(Self(format!("{namespace}{separator}{task}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for EventName {
    type Error = SwitchboardError;

    fn try_from(name: String) -> Result<Self> {
        Self::new(name)
    }
}

impl TryFrom<&str> for EventName {
    type Error = SwitchboardError;

    fn try_from(name: &str) -> Result<Self> {
        Self::new(name)
    }
}

impl From<EventName> for String {
    fn from(name: EventName) -> Self {
        name.0
    }
}
