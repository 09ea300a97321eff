//! Builds events by kind from a loose option set, validating required fields.
//!
//! Typed builders like [`MergeFragments::new`] cannot be missing a required
//! field. [`create`] is for callers that only learn the kind at runtime.

use crate::error::{Error, Result};
use crate::event::{
    Event, ExecuteScript, Fragment, MergeFragments, MergeSignals, Patch, RemoveFragments,
    RemoveSignals, ScriptAttribute, Signals,
};
use crate::kind::{EventKind, MergeMode};

/// Every field any event kind accepts. Fields outside a kind's schema are
/// ignored by [`create`].
#[derive(Debug, Clone, Default)]
pub struct EventOptions {
    pub fragment: Option<Fragment>,
    pub selector: Option<String>,
    pub merge_mode: Option<MergeMode>,
    pub use_view_transition: Option<bool>,
    pub signals: Option<Signals>,
    pub only_if_missing: Option<bool>,
    pub paths: Option<Vec<String>>,
    pub scripts: Option<Vec<String>>,
    pub attributes: Option<Vec<ScriptAttribute>>,
    pub auto_remove: Option<bool>,
    pub retry: Option<u64>,
}

impl EventOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fragment(mut self, fragment: impl Into<Fragment>) -> Self {
        self.fragment = Some(fragment.into());
        self
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

    pub fn signals(mut self, signals: impl Into<Signals>) -> Self {
        self.signals = Some(signals.into());
        self
    }

    pub fn only_if_missing(mut self, only_if_missing: bool) -> Self {
        self.only_if_missing = Some(only_if_missing);
        self
    }

    pub fn paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths = Some(paths.into_iter().map(Into::into).collect());
        self
    }

    pub fn scripts<I, S>(mut self, scripts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scripts = Some(scripts.into_iter().map(Into::into).collect());
        self
    }

    pub fn attributes(mut self, attributes: Vec<ScriptAttribute>) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn auto_remove(mut self, auto_remove: bool) -> Self {
        self.auto_remove = Some(auto_remove);
        self
    }

    pub fn retry(mut self, retry_ms: u64) -> Self {
        self.retry = Some(retry_ms);
        self
    }
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T> {
    value.ok_or_else(|| Error::missing_field(field))
}

/// Builds an event of `kind`, failing on the first missing required field in
/// the kind's declared order.
pub fn create(kind: EventKind, options: EventOptions) -> Result<Event> {
    let patch = match kind {
        EventKind::MergeFragments => Patch::MergeFragments(MergeFragments {
            fragment: required(options.fragment, "fragment")?,
            selector: options.selector,
            merge_mode: options.merge_mode,
            use_view_transition: options.use_view_transition,
        }),
        EventKind::MergeSignals => Patch::MergeSignals(MergeSignals {
            signals: required(options.signals, "signals")?,
            only_if_missing: options.only_if_missing,
        }),
        EventKind::RemoveFragments => {
            let selector = required(options.selector, "selector")?;
            if selector.is_empty() {
                return Err(Error::empty_field("selector"));
            }
            Patch::RemoveFragments(RemoveFragments { selector })
        }
        EventKind::RemoveSignals => Patch::RemoveSignals(RemoveSignals {
            paths: required(options.paths, "paths")?,
        }),
        EventKind::ExecuteScript => Patch::ExecuteScript(ExecuteScript {
            scripts: required(options.scripts, "scripts")?,
            attributes: required(options.attributes, "attributes")?,
            auto_remove: options.auto_remove,
        }),
    };

    Ok(Event::new(patch).with_optional_retry(options.retry))
}

/// Like [`create`], taking the kind by name (`remove-fragments` or
/// `datastar-remove-fragments`).
pub fn create_by_name(kind: &str, options: EventOptions) -> Result<Event> {
    create(kind.parse()?, options)
}
