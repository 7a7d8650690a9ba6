//! The polling loop, its change tracker and its crash supervisor.

pub mod poll;
pub mod supervisor;
pub mod tracker;

pub use poll::{CycleReport, DeliveryGuarantee, Monitor, NewCommit};
pub use supervisor::RestartPolicy;
pub use tracker::ChangeTracker;
