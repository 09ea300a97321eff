//! Server-Sent Events delivery for patch events.
//!
//! This crate turns an ordered list of events into the byte stream of one
//! long-lived response. It knows nothing about HTTP; the `web` crate wraps an
//! [`EventStream`] in a response body.
//!
//! # Architecture
//!
//! - **One scheduler per connection**: each [`EventStream`] owns its timers.
//!   Nothing is shared between connections.
//! - **Initial frames first**: every item is rendered once, in list order,
//!   before any timer can fire.
//! - **Independent timers**: each repeating item ticks on its own cadence.
//!   No ordering is promised between different timers.
//! - **Idle close**: a stream with nothing to repeat ends once its initial
//!   frames are read.
//! - **Cancellation**: dropping or cancelling the stream disarms all timers
//!   at once. Render failures are logged and skip a single emission.
//!
//! # Example
//!
//! ```rust,ignore
//! use events::{repeat, Event, Fragment, MergeFragments};
//! use sse::{EventStream, StreamItem};
//!
//! let clock = Event::from(MergeFragments::new(Fragment::dynamic(render_clock)).selector("#clock"));
//! let stream = EventStream::new([StreamItem::from(repeat(clock, 1000)?)]);
//! ```
//!
//! # Modules
//!
//! - `item`: stream entries, including heartbeat comment frames
//! - `stream`: the `EventStream` scheduler

pub mod item;
pub mod stream;

pub use item::{Heartbeat, StreamItem};
pub use stream::EventStream;
