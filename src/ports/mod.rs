//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the client core and something it
//! does not control (wall-clock time, the remote task service).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod task_api;

pub use clock::Clock;
pub use task_api::{ApiFuture, TaskApi};
