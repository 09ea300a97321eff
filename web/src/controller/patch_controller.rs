use axum::extract::State;
use axum::response::IntoResponse;
use chrono::Local;
use events::{
    create, repeat, Event, EventKind, EventOptions, Fragment, Generator, MergeFragments,
    ScriptAttribute, SignalEntries,
};
use log::*;
use serde_json::json;
use sse::{Heartbeat, StreamItem};

use crate::sse::stream_events;
use crate::{AppState, Error};

const LISTING_NAMES: [&str; 4] = ["John", "Jane", "Jim", "Jill"];

/// Frequency of the `#clock` fragment on the merge-fragments-repeating stream.
const REPEATING_CLOCK_MS: u64 = 1000;

fn listing_markup(names: &[&str]) -> String {
    let items: String = names
        .iter()
        .map(|name| format!("        <li>{name}</li>\n"))
        .collect();
    format!("<ul id=\"listing\">\n{items}</ul>\n")
}

/// Wall clock as `HH:MM:SS:millis`.
fn clock_text() -> String {
    let now = Local::now();
    format!("{}:{}", now.format("%H:%M:%S"), now.timestamp_subsec_millis())
}

fn clock_fragment() -> Fragment {
    Fragment::dynamic(|| format!("<div id=\"clock\">{}</div>", clock_text()))
}

/// GET a one-shot merge of the name listing
pub async fn merge_fragments(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let event = create(
        EventKind::MergeFragments,
        EventOptions::new()
            .fragment(listing_markup(&LISTING_NAMES))
            .selector("#listing"),
    )?;

    Ok(stream_events(&app_state, [event]))
}

/// GET the `#clock` fragment, re-rendered every second
pub async fn merge_fragments_repeating(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let event = Event::from(MergeFragments::new(clock_fragment()).selector("#clock"));
    let clock = repeat(event, REPEATING_CLOCK_MS)?;

    Ok(stream_events(&app_state, [clock]))
}

/// GET a one-shot merge of nested signals
pub async fn merge_signals(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let event = create(
        EventKind::MergeSignals,
        EventOptions::new().signals(
            SignalEntries::new()
                .with("foo", json!("merged"))
                .with("nested", json!({ "baz": "merged" })),
        ),
    )?;

    Ok(stream_events(&app_state, [event]))
}

/// GET a one-shot removal of `#content-to-remove`
pub async fn remove_fragments(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let event = create(
        EventKind::RemoveFragments,
        EventOptions::new().selector("#content-to-remove"),
    )?;

    Ok(stream_events(&app_state, [event]))
}

/// GET a one-shot removal of the signals merged by `/merge-signals`
pub async fn remove_signals(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let event = create(
        EventKind::RemoveSignals,
        EventOptions::new().paths(["foo", "nested.baz"]),
    )?;

    Ok(stream_events(&app_state, [event]))
}

/// GET a one-shot module script that removes itself after running
pub async fn execute_script(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let event = create(
        EventKind::ExecuteScript,
        EventOptions::new()
            .auto_remove(true)
            .attributes(vec![
                ScriptAttribute::new("type", "module"),
                ScriptAttribute::new("defer", true),
            ])
            .scripts([
                "console.log(\"Hello from the execute script event!\");",
                "alert(document.getElementById(\"display-in-alert\").textContent);",
            ]),
    )?;

    Ok(stream_events(&app_state, [event]))
}

/// GET a comment frame with the current time at the configured heartbeat interval
pub async fn heartbeat(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let interval_ms = app_state.config.heartbeat_interval_ms;
    let heartbeat = Heartbeat::new(interval_ms, Generator::new(clock_text))?;

    debug!("Starting heartbeat stream every {interval_ms}ms");
    Ok(stream_events(&app_state, [StreamItem::from(heartbeat)]))
}

/// GET the clock fragment at the configured clock interval
pub async fn clock(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let interval_ms = app_state.config.clock_interval_ms;
    let clock = repeat(Event::from(MergeFragments::new(clock_fragment())), interval_ms)?;

    debug!("Starting clock stream every {interval_ms}ms");
    Ok(stream_events(&app_state, [clock]))
}
