//! Live adapters talking to the real clock and task service.

pub mod clock;
pub mod task_api;

pub use clock::LiveClock;
pub use task_api::LiveTaskApi;
