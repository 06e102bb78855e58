//! wisense-core — domain logic for the live Wi-Fi signal visualizer.
//!
//! Everything terminal-independent lives here: the `wdutil` metric source
//! and parser, the bounded live data store, per-material statistics, the
//! CSV export log, and the error taxonomy. The TUI crate only renders
//! snapshots of this state and routes user input back into it.

pub mod constants;
pub mod error;
pub mod export;
pub mod material;
pub mod platform;
pub mod stats;
pub mod store;
pub mod wdutil;

pub use error::SenseError;
pub use material::{Band, Material};
pub use store::{LiveData, Sample, SharedLiveData};
