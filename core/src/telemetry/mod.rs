//! telemetry/mod.rs
//! Per-operation counters, stage timers and immutable snapshots.
//!
//! A snapshot is attached to every write/read outcome and logged at debug level.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
