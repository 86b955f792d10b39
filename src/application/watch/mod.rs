//! Watch Use Case
//!
//! Rebuilds the in-place library whenever a tracked file changes.
//!
//! ## Architecture
//!
//! - `WatchUseCase` - loop thread: filesystem events, debounce, staleness
//! - `WatchSession` - pure state machine (Idle, Debouncing, Building, Testing)
//! - `TrackedFiles` - inclusion closure plus config file, hashed to drop no-op saves
//! - `WatchRunner` - pipeline steps, run on a worker thread
//! - `WatchEvent` - events emitted during watch operation
//!
//! ## Usage
//!
//! ```ignore
//! let runner = PipelineRunner::from_options(&options);
//! let use_case = WatchUseCase::new(options, runner);
//! use_case.start(running, |event| { ... })?;
//! ```

mod event;
mod runner;
mod session;
mod tracked;
mod use_case;

#[cfg(test)]
mod tests;

pub use event::{WatchEvent, WatchOptions};
pub use runner::{PipelineRunner, TestOutcome, WatchRunner};
pub use session::{Finished, Phase, StartBuild, WatchSession};
pub use tracked::{ChangeKind, TrackedFiles};
pub use use_case::WatchUseCase;
