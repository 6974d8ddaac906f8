//! Error normalization and response parsing for the task service API.
//!
//! The transport itself sits behind the [`TaskApi`](crate::ports::TaskApi)
//! port; this module holds the pieces every adapter shares.

pub mod error;
pub mod payload;

pub use error::{extract_message, ApiError, ApiErrorKind, FALLBACK_MESSAGE};
pub use payload::{parse_acknowledgement, parse_payload};
