//! Typed patch events and their event-stream text encoding.
//!
//! This crate has no async or I/O dependencies. It turns event values into
//! text blocks; delivering those blocks over a connection is the job of the
//! `sse` crate.
//!
//! # Architecture
//!
//! - **Event model**: [`Event`] wraps one of five patch payloads
//!   ([`MergeFragments`], [`MergeSignals`], [`RemoveFragments`],
//!   [`RemoveSignals`], [`ExecuteScript`]) plus an optional reconnect hint.
//! - **Factory**: [`create`] builds an event from a kind and an option set,
//!   validating required fields. Typed builders are the infallible path.
//! - **Line encoder**: [`encoder`] renders `event:`/`retry:`/`data:` lines.
//!   Generators are evaluated on every render, never cached.
//! - **Repeat wrapper**: [`repeat`] marks an event for periodic re-emission.
//!   Wrappers nest and keep a reference to what they wrap.
//!
//! # Example
//!
//! ```rust
//! use events::{Event, RemoveSignals};
//!
//! let event = Event::from(RemoveSignals::new(["foo", "nested.baz"]));
//! assert_eq!(
//!     event.render().unwrap(),
//!     "event: datastar-remove-signals\ndata: paths foo\ndata: paths nested.baz\n\n"
//! );
//! ```

pub mod encoder;
pub mod error;
pub mod event;
pub mod factory;
pub mod generator;
pub mod kind;
pub mod minify;
pub mod repeat;

pub use error::{Error, Result};
pub use event::{
    AttributeValue, Event, ExecuteScript, Fragment, MergeFragments, MergeSignals, Patch,
    RemoveFragments, RemoveSignals, ScriptAttribute, SignalEntries, SignalValue, Signals,
};
pub use factory::{create, create_by_name, EventOptions};
pub use generator::Generator;
pub use kind::{EventKind, EventType, MergeMode};
pub use repeat::{repeat, Repeatable, RepeatingEvent};
