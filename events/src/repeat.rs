use crate::error::{Error, Result, ValidationErrorKind};
use crate::event::Event;
use crate::kind::{EventKind, EventType};
use std::sync::Arc;
use std::time::Duration;

/// Anything a [`RepeatingEvent`] can wrap: a plain event or another wrapper.
#[derive(Debug, Clone)]
pub enum Repeatable {
    Event(Arc<Event>),
    Repeating(Arc<RepeatingEvent>),
}

impl Repeatable {
    pub fn kind(&self) -> EventKind {
        match self {
            Repeatable::Event(event) => event.kind(),
            Repeatable::Repeating(repeating) => repeating.kind(),
        }
    }

    pub fn render(&self) -> Result<String> {
        match self {
            Repeatable::Event(event) => event.render(),
            Repeatable::Repeating(repeating) => repeating.render(),
        }
    }
}

impl From<Event> for Repeatable {
    fn from(event: Event) -> Self {
        Repeatable::Event(Arc::new(event))
    }
}

impl From<Arc<Event>> for Repeatable {
    fn from(event: Arc<Event>) -> Self {
        Repeatable::Event(event)
    }
}

impl From<RepeatingEvent> for Repeatable {
    fn from(repeating: RepeatingEvent) -> Self {
        Repeatable::Repeating(Arc::new(repeating))
    }
}

impl From<Arc<RepeatingEvent>> for Repeatable {
    fn from(repeating: Arc<RepeatingEvent>) -> Self {
        Repeatable::Repeating(repeating)
    }
}

/// An event re-emitted every `frequency_ms` until its stream is cancelled.
///
/// Rendering delegates to the wrapped event, so each emission reflects the
/// wrapped event's generators at that moment.
#[derive(Debug, Clone)]
pub struct RepeatingEvent {
    frequency_ms: u64,
    original: Repeatable,
}

impl RepeatingEvent {
    pub fn new(event: impl Into<Repeatable>, frequency_ms: u64) -> Result<Self> {
        if frequency_ms == 0 {
            return Err(Error::validation(ValidationErrorKind::InvalidFrequency));
        }

        Ok(Self {
            frequency_ms,
            original: event.into(),
        })
    }

    pub fn frequency_ms(&self) -> u64 {
        self.frequency_ms
    }

    pub fn frequency(&self) -> Duration {
        Duration::from_millis(self.frequency_ms)
    }

    /// The value this wrapper was built from, which may itself repeat.
    pub fn original(&self) -> &Repeatable {
        &self.original
    }

    /// The plain event at the bottom of the wrapper chain.
    pub fn innermost(&self) -> &Arc<Event> {
        let mut current = &self.original;
        loop {
            match current {
                Repeatable::Event(event) => return event,
                Repeatable::Repeating(repeating) => current = &repeating.original,
            }
        }
    }

    pub fn kind(&self) -> EventKind {
        self.original.kind()
    }

    pub fn render(&self) -> Result<String> {
        self.original.render()
    }
}

impl EventType for RepeatingEvent {
    fn event_type(&self) -> &'static str {
        self.kind().event_type()
    }
}

/// Wraps `event` so a stream re-emits it every `frequency_ms` milliseconds.
/// A zero frequency is rejected.
pub fn repeat(event: impl Into<Repeatable>, frequency_ms: u64) -> Result<RepeatingEvent> {
    RepeatingEvent::new(event, frequency_ms)
}
