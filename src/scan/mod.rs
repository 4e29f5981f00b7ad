//! Penetration test scan lifecycle
//!
//! [`ScanApi`] talks to the scanning backends, [`poll_to_completion`]
//! drives one scan to a terminal status, and [`ScanOrchestrator`] tracks a
//! single scan through launch, polling, and cancellation.

pub mod api;
#[cfg(test)]
pub mod mock;
pub mod orchestrator;
pub mod poll;

pub use api::{ScanApi, ScanService};
pub use orchestrator::{ScanOrchestrator, ScanPhase, ScanState};
pub use poll::{PollOptions, poll_to_completion};
