//! Core data model for the media-progress tracker.
//!
//! An [`Entry`] is a game or show with an ordered list of [`Milestone`]s.
//! Its `progress` is derived from how many milestones are done, except for
//! entries without milestones, whose progress is tracked by hand.
//!
//! Anything that arrives from outside the process (a local snapshot, a remote
//! fetch, a user import) goes through [`validate_entries`] before it is
//! trusted.

mod entry;
mod error;
mod progress;
mod validate;

pub use entry::{Entry, EntryKind, Milestone};
pub use error::{ModelError, ModelResult};
pub use progress::{clamp_progress, compute_progress};
pub use validate::{check_records, is_entry_collection, parse_entries, validate_entries};
