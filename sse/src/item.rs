use events::encoder::render_comment;
use events::{Event, EventType, Generator, RepeatingEvent};
use std::sync::Arc;
use std::time::Duration;

/// A comment frame re-emitted on a fixed interval to keep a connection warm.
#[derive(Debug, Clone)]
pub struct Heartbeat {
    frequency_ms: u64,
    text: Generator<String>,
}

impl Heartbeat {
    pub fn new(frequency_ms: u64, text: Generator<String>) -> events::Result<Self> {
        if frequency_ms == 0 {
            return Err(events::Error::validation(
                events::error::ValidationErrorKind::InvalidFrequency,
            ));
        }
        Ok(Self { frequency_ms, text })
    }

    pub fn frequency_ms(&self) -> u64 {
        self.frequency_ms
    }

    pub fn render(&self) -> events::Result<String> {
        self.text
            .call()
            .map(|text| render_comment(&text))
            .map_err(|e| events::Error::generator("heartbeat", e))
    }
}

/// One entry in the ordered list handed to an [`crate::EventStream`].
#[derive(Debug, Clone)]
pub enum StreamItem {
    Event(Arc<Event>),
    Repeating(Arc<RepeatingEvent>),
    Heartbeat(Heartbeat),
}

impl StreamItem {
    /// How often the item repeats, if it repeats at all.
    pub fn frequency(&self) -> Option<Duration> {
        match self {
            StreamItem::Event(_) => None,
            StreamItem::Repeating(repeating) => Some(repeating.frequency()),
            StreamItem::Heartbeat(heartbeat) => {
                Some(Duration::from_millis(heartbeat.frequency_ms()))
            }
        }
    }

    pub fn render(&self) -> events::Result<String> {
        match self {
            StreamItem::Event(event) => event.render(),
            StreamItem::Repeating(repeating) => repeating.render(),
            StreamItem::Heartbeat(heartbeat) => heartbeat.render(),
        }
    }

    /// Short name for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            StreamItem::Event(event) => event.event_type(),
            StreamItem::Repeating(repeating) => repeating.event_type(),
            StreamItem::Heartbeat(_) => "heartbeat",
        }
    }
}

impl From<Event> for StreamItem {
    fn from(event: Event) -> Self {
        StreamItem::Event(Arc::new(event))
    }
}

impl From<Arc<Event>> for StreamItem {
    fn from(event: Arc<Event>) -> Self {
        StreamItem::Event(event)
    }
}

impl From<RepeatingEvent> for StreamItem {
    fn from(repeating: RepeatingEvent) -> Self {
        StreamItem::Repeating(Arc::new(repeating))
    }
}

impl From<Arc<RepeatingEvent>> for StreamItem {
    fn from(repeating: Arc<RepeatingEvent>) -> Self {
        StreamItem::Repeating(repeating)
    }
}

impl From<Heartbeat> for StreamItem {
    fn from(heartbeat: Heartbeat) -> Self {
        StreamItem::Heartbeat(heartbeat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use events::{repeat, RemoveFragments};

    #[test]
    fn test_only_repeating_items_have_a_frequency() {
        let event = Event::from(RemoveFragments::new("#a"));
        let once = StreamItem::from(event.clone());
        let repeating = StreamItem::from(repeat(event, 1500).unwrap());
        let heartbeat = StreamItem::from(Heartbeat::new(1000, Generator::new(String::new)).unwrap());

        assert_eq!(once.frequency(), None);
        assert_eq!(repeating.frequency(), Some(Duration::from_millis(1500)));
        assert_eq!(heartbeat.frequency(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_heartbeat_renders_a_comment_frame() {
        let heartbeat = Heartbeat::new(1000, Generator::new(|| "12:00:00:123".to_string())).unwrap();
        assert_eq!(heartbeat.render().unwrap(), ": 12:00:00:123\n\n");
        assert_eq!(StreamItem::from(heartbeat).label(), "heartbeat");
    }

    #[test]
    fn test_heartbeat_rejects_zero_frequency() {
        assert!(Heartbeat::new(0, Generator::new(String::new))
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_label_uses_wire_name() {
        let item = StreamItem::from(Event::from(RemoveFragments::new("#a")));
        assert_eq!(item.label(), "datastar-remove-fragments");
    }
}
