//! Pipeline entry points for announcer operations.
//!
//! - `run_announcer`: one scheduled invocation (fetch, diff, announce, commit)
//! - `inspect_backlog`: fetch and diff only
//! - `preview_announcement`: render the next announcement without sending it

pub mod announce;
pub mod diff;
pub mod dispatch;

pub use announce::{inspect_backlog, preview_announcement, run_announcer};
pub use diff::{DiffResult, calculate_diff};
pub use dispatch::{Dispatcher, Inspection, RunOutcome};
