//! Entity model: issues and their events.
//!
//! Both are read-only once loaded. Aggregators never mutate them,
//! they only derive counts, tables and scalars.

pub mod event;
pub mod issue;

// Re-export main types
pub use event::{Event, EventType};
pub use issue::{Issue, IssueState};
