use crate::error::{Error, ValidationErrorKind};
use std::fmt;
use std::str::FromStr;

/// Trait for getting the SSE event type name
pub trait EventType {
    fn event_type(&self) -> &'static str;
}

/// The five patch kinds a client knows how to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MergeFragments,
    MergeSignals,
    RemoveFragments,
    RemoveSignals,
    ExecuteScript,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::MergeFragments,
        EventKind::MergeSignals,
        EventKind::RemoveFragments,
        EventKind::RemoveSignals,
        EventKind::ExecuteScript,
    ];

    /// Short name used when building events by kind, e.g. `merge-fragments`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::MergeFragments => "merge-fragments",
            EventKind::MergeSignals => "merge-signals",
            EventKind::RemoveFragments => "remove-fragments",
            EventKind::RemoveSignals => "remove-signals",
            EventKind::ExecuteScript => "execute-script",
        }
    }
}

impl EventType for EventKind {
    fn event_type(&self) -> &'static str {
        match self {
            EventKind::MergeFragments => "datastar-merge-fragments",
            EventKind::MergeSignals => "datastar-merge-signals",
            EventKind::RemoveFragments => "datastar-remove-fragments",
            EventKind::RemoveSignals => "datastar-remove-signals",
            EventKind::ExecuteScript => "datastar-execute-script",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = Error;

    /// Accepts both the short name and the wire name.
    fn from_str(name: &str) -> Result<EventKind, Self::Err> {
        let short = name.strip_prefix("datastar-").unwrap_or(name);
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == short)
            .ok_or_else(|| Error::validation(ValidationErrorKind::UnknownKind(name.to_string())))
    }
}

/// Strategy for combining new markup with the markup already at the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    Morph,
    Inner,
    Outer,
    Prepend,
    Append,
    Before,
    After,
    UpsertAttributes,
}

impl MergeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeMode::Morph => "morph",
            MergeMode::Inner => "inner",
            MergeMode::Outer => "outer",
            MergeMode::Prepend => "prepend",
            MergeMode::Append => "append",
            MergeMode::Before => "before",
            MergeMode::After => "after",
            MergeMode::UpsertAttributes => "upsertAttributes",
        }
    }
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct MergeModeParseError;

impl FromStr for MergeMode {
    type Err = MergeModeParseError;

    fn from_str(mode: &str) -> Result<MergeMode, Self::Err> {
        match mode {
            "morph" => Ok(MergeMode::Morph),
            "inner" => Ok(MergeMode::Inner),
            "outer" => Ok(MergeMode::Outer),
            "prepend" => Ok(MergeMode::Prepend),
            "append" => Ok(MergeMode::Append),
            "before" => Ok(MergeMode::Before),
            "after" => Ok(MergeMode::After),
            "upsertAttributes" => Ok(MergeMode::UpsertAttributes),
            _ => Err(MergeModeParseError),
        }
    }
}
