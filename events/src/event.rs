//! The typed event model: one struct per patch kind, wrapped by [`Event`].
//!
//! Field values are kept exactly as supplied. Generators are only evaluated
//! when the event is rendered, see [`crate::encoder`].

use crate::encoder;
use crate::error::Result;
use crate::generator::Generator;
use crate::kind::{EventKind, EventType, MergeMode};
use serde_json::{Map, Value};
use std::fmt;

/// Markup for a merge-fragments event, either literal or produced on demand.
#[derive(Debug, Clone)]
pub enum Fragment {
    Markup(String),
    Generator(Generator<String>),
}

impl Fragment {
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Fragment::Generator(Generator::new(f))
    }
}

impl From<&str> for Fragment {
    fn from(markup: &str) -> Self {
        Fragment::Markup(markup.to_string())
    }
}

impl From<String> for Fragment {
    fn from(markup: String) -> Self {
        Fragment::Markup(markup)
    }
}

impl From<Generator<String>> for Fragment {
    fn from(generator: Generator<String>) -> Self {
        Fragment::Generator(generator)
    }
}

/// A single signal value. Generators are called at render time; nested
/// structures in literal values are passed through unchanged.
#[derive(Debug, Clone)]
pub enum SignalValue {
    Value(Value),
    Generator(Generator<Value>),
}

impl SignalValue {
    pub fn value(value: impl Into<Value>) -> Self {
        SignalValue::Value(value.into())
    }

    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        SignalValue::Generator(Generator::new(f))
    }
}

impl From<Value> for SignalValue {
    fn from(value: Value) -> Self {
        SignalValue::Value(value)
    }
}

impl From<Generator<Value>> for SignalValue {
    fn from(generator: Generator<Value>) -> Self {
        SignalValue::Generator(generator)
    }
}

/// Literal signals in insertion order. Built with [`SignalEntries::with`]
/// and converted into [`Signals`].
#[derive(Debug, Clone, Default)]
pub struct SignalEntries(Vec<(String, SignalValue)>);

impl SignalEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a signal. A replaced signal keeps its original position.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<SignalValue>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SignalValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for SignalEntries
where
    K: Into<String>,
    V: Into<SignalValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(SignalEntries::new(), |entries, (name, value)| {
                entries.with(name, value)
            })
    }
}

/// Name to value mapping merged into client state.
#[derive(Debug, Clone)]
pub enum Signals {
    Entries(SignalEntries),
    /// The whole mapping is produced on demand.
    Generator(Generator<Map<String, Value>>),
}

impl Signals {
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn() -> Map<String, Value> + Send + Sync + 'static,
    {
        Signals::Generator(Generator::new(f))
    }
}

impl From<SignalEntries> for Signals {
    fn from(entries: SignalEntries) -> Self {
        Signals::Entries(entries)
    }
}

impl From<Map<String, Value>> for Signals {
    fn from(map: Map<String, Value>) -> Self {
        Signals::Entries(map.into_iter().collect())
    }
}

impl<K, V> FromIterator<(K, V)> for Signals
where
    K: Into<String>,
    V: Into<SignalValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Signals::Entries(iter.into_iter().collect())
    }
}

/// Value of a script element attribute. Flags render as `true`/`false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Text(String),
    Flag(bool),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AttributeValue::Text(text) => write!(f, "{text}"),
            AttributeValue::Flag(flag) => write!(f, "{flag}"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(text: &str) -> Self {
        AttributeValue::Text(text.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(text: String) -> Self {
        AttributeValue::Text(text)
    }
}

impl From<bool> for AttributeValue {
    fn from(flag: bool) -> Self {
        AttributeValue::Flag(flag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptAttribute {
    pub name: String,
    pub value: AttributeValue,
}

impl ScriptAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MergeFragments {
    pub fragment: Fragment,
    pub selector: Option<String>,
    pub merge_mode: Option<MergeMode>,
    pub use_view_transition: Option<bool>,
}

impl MergeFragments {
    pub fn new(fragment: impl Into<Fragment>) -> Self {
        Self {
            fragment: fragment.into(),
            selector: None,
            merge_mode: None,
            use_view_transition: None,
        }
    }

    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    pub fn merge_mode(mut self, merge_mode: MergeMode) -> Self {
        self.merge_mode = Some(merge_mode);
        self
    }

    pub fn use_view_transition(mut self, use_view_transition: bool) -> Self {
        self.use_view_transition = Some(use_view_transition);
        self
    }
}

#[derive(Debug, Clone)]
pub struct MergeSignals {
    pub signals: Signals,
    pub only_if_missing: Option<bool>,
}

impl MergeSignals {
    pub fn new(signals: impl Into<Signals>) -> Self {
        Self {
            signals: signals.into(),
            only_if_missing: None,
        }
    }

    pub fn only_if_missing(mut self, only_if_missing: bool) -> Self {
        self.only_if_missing = Some(only_if_missing);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveFragments {
    pub selector: String,
}

impl RemoveFragments {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveSignals {
    /// Dotted signal paths, e.g. `nested.baz`.
    pub paths: Vec<String>,
}

impl RemoveSignals {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteScript {
    pub scripts: Vec<String>,
    pub attributes: Vec<ScriptAttribute>,
    pub auto_remove: Option<bool>,
}

impl ExecuteScript {
    pub fn new<I, S>(scripts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scripts: scripts.into_iter().map(Into::into).collect(),
            attributes: Vec::new(),
            auto_remove: None,
        }
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.push(ScriptAttribute::new(name, value));
        self
    }

    pub fn auto_remove(mut self, auto_remove: bool) -> Self {
        self.auto_remove = Some(auto_remove);
        self
    }
}

/// The variant-specific payload of an [`Event`].
#[derive(Debug, Clone)]
pub enum Patch {
    MergeFragments(MergeFragments),
    MergeSignals(MergeSignals),
    RemoveFragments(RemoveFragments),
    RemoveSignals(RemoveSignals),
    ExecuteScript(ExecuteScript),
}

impl Patch {
    pub fn kind(&self) -> EventKind {
        match self {
            Patch::MergeFragments(_) => EventKind::MergeFragments,
            Patch::MergeSignals(_) => EventKind::MergeSignals,
            Patch::RemoveFragments(_) => EventKind::RemoveFragments,
            Patch::RemoveSignals(_) => EventKind::RemoveSignals,
            Patch::ExecuteScript(_) => EventKind::ExecuteScript,
        }
    }
}

/// A patch plus the optional reconnect hint shared by every kind.
///
/// The payload is only reachable by shared reference, so an event's kind is
/// fixed once it is built.
#[derive(Debug, Clone)]
pub struct Event {
    patch: Patch,
    retry: Option<u64>,
}

impl Event {
    pub fn new(patch: impl Into<Patch>) -> Self {
        Self {
            patch: patch.into(),
            retry: None,
        }
    }

    /// Attaches a client reconnect delay in milliseconds.
    pub fn with_retry(mut self, retry_ms: u64) -> Self {
        self.retry = Some(retry_ms);
        self
    }

    pub(crate) fn with_optional_retry(mut self, retry_ms: Option<u64>) -> Self {
        self.retry = retry_ms;
        self
    }

    pub fn kind(&self) -> EventKind {
        self.patch.kind()
    }

    pub fn retry(&self) -> Option<u64> {
        self.retry
    }

    pub fn patch(&self) -> &Patch {
        &self.patch
    }

    /// Encodes the event's current field values. Not cached: generators run
    /// on every call.
    pub fn render(&self) -> Result<String> {
        encoder::render(self)
    }
}

impl EventType for Event {
    fn event_type(&self) -> &'static str {
        self.kind().event_type()
    }
}

macro_rules! impl_patch_variant {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Patch {
                fn from(payload: $variant) -> Self {
                    Patch::$variant(payload)
                }
            }

            impl From<$variant> for Event {
                fn from(payload: $variant) -> Self {
                    Event::new(payload)
                }
            }
        )*
    };
}

impl_patch_variant!(
    MergeFragments,
    MergeSignals,
    RemoveFragments,
    RemoveSignals,
    ExecuteScript,
);
