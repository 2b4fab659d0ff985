//! # Switchboard
//!
//! An in-process event subscription registry: listeners persist the moment
//! they are complete, groups fan out to other event names, and flushes never
//! renumber what survives.
//!
//! ## Core Concepts
//!
//! - [`Listener`] = event names + logic, optional predicates and dependencies
//! - [`GroupListener`] = event names + a list of other names to fire
//! - [`Registry`] = owns both collections, answers [`Registry::match_event`]
//!   and [`Registry::flush`]
//!
//! ## Lifecycle
//!
//! ```text
//! Listener::new(&registry)
//!     │
//!     ▼ add_event_name / add_logic / add_predicate / add_dependency
//! Unsaved (draft owned by the handle)
//!     │
//!     ▼ first time ≥1 name && ≥1 logic
//! Saved (record owned by the registry, id = index)
//!     │                                   ▲
//!     │ further builder calls ────────────┘ write through, id unchanged
//!     │
//!     ▼ flush(name) where name was its only name
//! Removed (tombstone, id never reused)
//! ```
//!
//! Group listeners follow the same path, with "≥1 fire target" in place of
//! "≥1 logic".
//!
//! ## Key Invariants
//!
//! 1. **Ids are indices** - assigned as the collection length at persistence
//! 2. **Ids are stable** - flushing writes a tombstone instead of compacting
//! 3. **Handles never go stale** - after persistence a handle only holds an id
//! 4. **Specificity wins** - direct matches precede group-derived matches
//! 5. **Nothing fails** - rejected input is a silent no-op, unknown names
//!    match nothing and flush nothing
//!
//! ## Example
//!
//! ```ignore
//! use switchboard::{GroupSubscribe, Registry, Subscribe};
//!
//! let registry = Registry::new();
//!
//! Subscribe::new(&registry, "build:css").then(|_| Ok(()));
//! Subscribe::new(&registry, "build:js").then(|_| Ok(()));
//! Subscribe::new(&registry, "build").then(|_| Ok(()));
//!
//! GroupSubscribe::new(&registry, "build").tasks("build", ["css", "js"]);
//!
//! // The direct "build" listener first, then css, then js.
//! assert_eq!(registry.match_event("build").len(), 3);
//!
//! registry.flush("build");
//! assert!(registry.match_event("build").is_empty());
//! assert_eq!(registry.match_event("build:css").len(), 1);
//! ```
//!
//! ## What This Is Not
//!
//! Switchboard does not invoke anything. Logic, predicates and dependencies
//! are carried for a dispatcher to run; only their presence and count matter
//! here. Entries live in memory for as long as the registry does.

mod config;
mod entry;
mod error;
mod group;
mod listener;
mod name;
mod registry;
mod subscribe;

// Re-export entry types
pub use crate::entry::{EntryId, EntryKind, EventNames, Handle, Record};

// Re-export listener types
pub use crate::listener::{Dependency, Listener, ListenerRecord, Logic, Predicate};

// Re-export group types
pub use crate::group::{GroupListener, GroupRecord};

// Re-export registry types
pub use crate::registry::{CollectionStats, Registry, RegistryStats, Slot};

// Re-export DSL types
pub use crate::subscribe::{GroupSubscribe, Subscribe};

// Re-export naming and configuration
pub use crate::config::{RegistryConfig, DEFAULT_SEPARATOR};
pub use crate::name::EventName;

// Re-export error types
pub use crate::error::{Result, SwitchboardError};
