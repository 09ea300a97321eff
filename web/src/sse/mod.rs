//! HTTP glue for event streams.
//!
//! The scheduler itself lives in the `sse` crate; this module only turns an
//! `EventStream` into an axum response with the event-stream headers.

pub mod response;

pub use response::{sse_response, stream_events};
