//! Line encoder for the event-stream wire grammar.
//!
//! ```text
//! event: <kind>
//! retry: <integer>          (optional, at most one)
//! data: <field> <value>     (zero or more, in per-kind field order)
//!                           (blank line terminates the block)
//! ```

use crate::error::{Error, Result};
use crate::event::{Event, Fragment, Patch, SignalValue, Signals};
use crate::kind::EventType;
use crate::minify::minify_html;
use serde_json::{Map, Value};
use std::fmt;

/// How a single field is laid out on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// `data: <field> <value>`
    Scalar(String),
    /// One `data: <field> <element>` line per element, in order.
    Lines(Vec<String>),
    /// `data: <field> <json>`, keys in insertion order.
    Structured(Value),
}

fn scalar(value: impl fmt::Display) -> FieldValue {
    FieldValue::Scalar(value.to_string())
}

/// Splits `value` on any SSE line terminator (`\n`, `\r\n`, `\r`). A raw
/// terminator inside a field would end the line, or the whole block, early.
fn wire_lines(value: &str) -> Vec<&str> {
    let pieces: Vec<&str> = value.lines().flat_map(|line| line.split('\r')).collect();
    if pieces.is_empty() {
        vec![""]
    } else {
        pieces
    }
}

fn push_data(lines: &mut Vec<String>, name: &str, value: &str) {
    lines.extend(
        wire_lines(value)
            .into_iter()
            .map(|piece| format!("data: {name} {piece}")),
    );
}

/// Encodes an already-resolved field list. Fields are written in the order given.
/// A value spanning several lines becomes one `data:` line per source line.
pub fn render_fields(
    event_type: &str,
    retry: Option<u64>,
    fields: &[(&str, FieldValue)],
) -> Result<String> {
    let mut lines = vec![format!("event: {event_type}")];

    if let Some(retry) = retry {
        lines.push(format!("retry: {retry}"));
    }

    for (name, value) in fields {
        match value {
            FieldValue::Scalar(value) => push_data(&mut lines, name, value),
            FieldValue::Lines(elements) => {
                for element in elements {
                    push_data(&mut lines, name, element);
                }
            }
            FieldValue::Structured(value) => {
                lines.push(format!("data: {name} {}", serde_json::to_string(value)?))
            }
        }
    }

    Ok(lines.join("\n") + "\n\n")
}

/// Renders an event from its current field values, running any generators.
pub fn render(event: &Event) -> Result<String> {
    let fields = resolve_fields(event.patch())?;
    render_fields(event.event_type(), event.retry(), &fields)
}

/// Renders an SSE comment block. Clients ignore these; they keep idle
/// connections from being reaped by proxies.
pub fn render_comment(text: &str) -> String {
    let mut block: String = wire_lines(text)
        .into_iter()
        .map(|line| format!(": {line}\n"))
        .collect();
    block.push('\n');
    block
}

fn resolve_fields(patch: &Patch) -> Result<Vec<(&'static str, FieldValue)>> {
    let fields: Vec<(&'static str, Option<FieldValue>)> = match patch {
        Patch::MergeFragments(merge) => {
            let markup = match &merge.fragment {
                Fragment::Markup(markup) => minify_html(markup),
                Fragment::Generator(generator) => {
                    let markup = generator
                        .call()
                        .map_err(|e| Error::generator("fragment", e))?;
                    minify_html(&markup)
                }
            };
            vec![
                ("fragments", Some(FieldValue::Scalar(markup))),
                ("selector", merge.selector.as_deref().map(scalar)),
                ("mergeMode", merge.merge_mode.map(scalar)),
                ("useViewTransition", merge.use_view_transition.map(scalar)),
            ]
        }
        Patch::MergeSignals(merge) => vec![
            (
                "signals",
                Some(FieldValue::Structured(resolve_signals(&merge.signals)?)),
            ),
            ("onlyIfMissing", merge.only_if_missing.map(scalar)),
        ],
        Patch::RemoveFragments(remove) => {
            vec![("selector", Some(scalar(&remove.selector)))]
        }
        Patch::RemoveSignals(remove) => {
            vec![("paths", Some(FieldValue::Lines(remove.paths.clone())))]
        }
        Patch::ExecuteScript(execute) => vec![
            ("autoRemove", execute.auto_remove.map(scalar)),
            (
                "attributes",
                Some(FieldValue::Lines(
                    execute
                        .attributes
                        .iter()
                        .map(|attr| format!("{} {}", attr.name, attr.value))
                        .collect(),
                )),
            ),
            ("script", Some(FieldValue::Lines(execute.scripts.clone()))),
        ],
    };

    Ok(fields
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name, value)))
        .collect())
}

fn resolve_signals(signals: &Signals) -> Result<Value> {
    match signals {
        Signals::Entries(entries) => {
            let mut map = Map::new();
            for (name, value) in entries.iter() {
                let value = match value {
                    SignalValue::Value(value) => value.clone(),
                    SignalValue::Generator(generator) => generator
                        .call()
                        .map_err(|e| Error::generator("signals", e))?,
                };
                map.insert(name.to_string(), value);
            }
            Ok(Value::Object(map))
        }
        Signals::Generator(generator) => generator
            .call()
            .map(Value::Object)
            .map_err(|e| Error::generator("signals", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, RenderErrorKind};
    use crate::event::{
        ExecuteScript, MergeFragments, MergeSignals, RemoveFragments, RemoveSignals,
        SignalEntries,
    };
    use crate::generator::Generator;
    use crate::kind::MergeMode;
    use serde_json::json;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_render_fields_retry_line_follows_event_line() {
        let text = render_fields(
            "test-event",
            Some(1234),
            &[("foo", FieldValue::Scalar("bar".to_string()))],
        )
        .unwrap();
        assert_eq!(text, "event: test-event\nretry: 1234\ndata: foo bar\n\n");
    }

    #[test]
    fn test_render_fields_structured_and_line_fields() {
        let text = render_fields(
            "test-event",
            None,
            &[
                ("other", FieldValue::Structured(json!([1, 2, 3]))),
                (
                    "paths",
                    FieldValue::Lines(vec!["foo.bar".to_string(), "baz".to_string()]),
                ),
            ],
        )
        .unwrap();
        assert_eq!(
            text,
            "event: test-event\ndata: other [1,2,3]\ndata: paths foo.bar\ndata: paths baz\n\n"
        );
    }

    #[test]
    fn test_merge_fragments_with_selector() {
        let event = Event::from(MergeFragments::new("<div>Test</div>").selector("#target"));
        assert_eq!(
            event.render().unwrap(),
            "event: datastar-merge-fragments\ndata: fragments <div>Test</div>\ndata: selector #target\n\n"
        );
    }

    #[test]
    fn test_merge_fragments_minifies_markup() {
        let markup = "<ul id=\"listing\">\n    <li>John</li>\n    <li>Jane</li>\n</ul>\n";
        let event = Event::from(MergeFragments::new(markup));
        assert_eq!(
            event.render().unwrap(),
            "event: datastar-merge-fragments\ndata: fragments <ul id=\"listing\"><li>John</li><li>Jane</li></ul>\n\n"
        );
    }

    #[test]
    fn test_merge_fragments_optional_fields_in_order() {
        let event = Event::from(
            MergeFragments::new("<p>x</p>")
                .use_view_transition(false)
                .merge_mode(MergeMode::UpsertAttributes)
                .selector("#p"),
        )
        .with_retry(300);
        assert_eq!(
            event.render().unwrap(),
            "event: datastar-merge-fragments\nretry: 300\ndata: fragments <p>x</p>\ndata: selector #p\ndata: mergeMode upsertAttributes\ndata: useViewTransition false\n\n"
        );
    }

    #[test]
    fn test_dynamic_fragment_is_evaluated_per_render() {
        let ticks = Arc::new(AtomicU64::new(0));
        let counter = ticks.clone();
        let event = Event::from(
            MergeFragments::new(Fragment::dynamic(move || {
                format!("<div id=\"clock\">{}</div>", counter.fetch_add(1, Ordering::SeqCst))
            }))
            .selector("#clock"),
        );

        let first = event.render().unwrap();
        let second = event.render().unwrap();
        assert!(first.contains("data: fragments <div id=\"clock\">0</div>\n"));
        assert!(second.contains("data: fragments <div id=\"clock\">1</div>\n"));
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_merge_signals_example() {
        let event = Event::from(MergeSignals::new(SignalEntries::new().with("foo", json!("bar"))));
        assert_eq!(
            event.render().unwrap(),
            "event: datastar-merge-signals\ndata: signals {\"foo\":\"bar\"}\n\n"
        );
    }

    #[test]
    fn test_merge_signals_nested_keys_keep_insertion_order() {
        let event = Event::from(
            MergeSignals::new(
                SignalEntries::new()
                    .with("zeta", json!("bar"))
                    .with("nested", json!({"baz": 42, "alpha": true})),
            )
            .only_if_missing(true),
        );
        assert_eq!(
            event.render().unwrap(),
            "event: datastar-merge-signals\ndata: signals {\"zeta\":\"bar\",\"nested\":{\"baz\":42,\"alpha\":true}}\ndata: onlyIfMissing true\n\n"
        );
    }

    #[test]
    fn test_literal_events_render_idempotently() {
        let fragments = Event::from(MergeFragments::new("<b>hi</b>"));
        let signals = Event::from(MergeSignals::new(SignalEntries::new().with("a", json!([1, 2]))));
        assert_eq!(fragments.render().unwrap(), fragments.render().unwrap());
        assert_eq!(signals.render().unwrap(), signals.render().unwrap());
    }

    #[test]
    fn test_dynamic_signal_value_changes_between_renders() {
        let ticks = Arc::new(AtomicU64::new(0));
        let counter = ticks.clone();
        let event = Event::from(MergeSignals::new(
            SignalEntries::new()
                .with("static", json!("s"))
                .with(
                    "tick",
                    SignalValue::dynamic(move || json!(counter.fetch_add(1, Ordering::SeqCst))),
                ),
        ));

        let first = event.render().unwrap();
        let second = event.render().unwrap();
        assert!(first.contains("data: signals {\"static\":\"s\",\"tick\":0}\n"));
        assert!(second.contains("data: signals {\"static\":\"s\",\"tick\":1}\n"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_whole_signals_generator() {
        let event = Event::from(MergeSignals::new(Signals::dynamic(|| {
            let mut map = Map::new();
            map.insert("timestamp".to_string(), json!("12:00:00"));
            map
        })));
        assert!(event
            .render()
            .unwrap()
            .contains("data: signals {\"timestamp\":\"12:00:00\"}\n"));
    }

    #[test]
    fn test_failing_generator_is_a_render_error() {
        let event = Event::from(MergeFragments::new(Fragment::Generator(
            Generator::fallible(|| Err("template missing".into())),
        )));
        let err = event.render().unwrap_err();
        assert_eq!(
            err.error_kind,
            ErrorKind::Render(RenderErrorKind::Generator("fragment"))
        );
    }

    #[test]
    fn test_remove_fragments() {
        let event = Event::from(RemoveFragments::new("#content-to-remove"));
        assert_eq!(
            event.render().unwrap(),
            "event: datastar-remove-fragments\ndata: selector #content-to-remove\n\n"
        );
    }

    #[test]
    fn test_remove_signals_one_line_per_path() {
        let event = Event::from(RemoveSignals::new(["foo", "nested.baz"]));
        assert_eq!(
            event.render().unwrap(),
            "event: datastar-remove-signals\ndata: paths foo\ndata: paths nested.baz\n\n"
        );
    }

    #[test]
    fn test_remove_signals_with_no_paths_emits_only_the_event_line() {
        let event = Event::from(RemoveSignals::new(Vec::<String>::new()));
        assert_eq!(event.render().unwrap(), "event: datastar-remove-signals\n\n");
    }

    #[test]
    fn test_execute_script_with_retry() {
        let event = Event::from(
            ExecuteScript::new(["console.log(1)"]).attribute("type", "module"),
        )
        .with_retry(5000);
        assert_eq!(
            event.render().unwrap(),
            "event: datastar-execute-script\nretry: 5000\ndata: attributes type module\ndata: script console.log(1)\n\n"
        );
    }

    #[test]
    fn test_execute_script_multiple_scripts_and_flag_attributes() {
        let event = Event::from(
            ExecuteScript::new(["console.log(\"first\")", "console.log(\"second\")"])
                .attribute("type", "module")
                .attribute("defer", true)
                .auto_remove(true),
        );
        assert_eq!(
            event.render().unwrap(),
            "event: datastar-execute-script\ndata: autoRemove true\ndata: attributes type module\ndata: attributes defer true\ndata: script console.log(\"first\")\ndata: script console.log(\"second\")\n\n"
        );
    }

    #[test]
    fn test_every_kind_frames_correctly_with_and_without_retry() {
        let events = vec![
            Event::from(MergeFragments::new("<i></i>")),
            Event::from(MergeSignals::new(SignalEntries::new().with("a", json!(1)))),
            Event::from(RemoveFragments::new("#a")),
            Event::from(RemoveSignals::new(["a"])),
            Event::from(ExecuteScript::new(["a()"])),
        ];

        for event in events {
            let plain = event.render().unwrap();
            let retried = event.clone().with_retry(0).render().unwrap();

            for text in [&plain, &retried] {
                assert!(text.starts_with(&format!("event: {}\n", event.event_type())));
                assert!(text.ends_with("\n\n"));
                assert!(!text[..text.len() - 2].contains("\n\n"));
            }
            assert_eq!(plain.matches("retry:").count(), 0);
            assert_eq!(retried.matches("\nretry: 0\n").count(), 1);
        }
    }

    #[test]
    fn test_multi_line_script_gets_one_data_line_per_source_line() {
        let event = Event::from(ExecuteScript::new([
            "if (ready) {\n  start();\n}",
            "done()",
        ]));
        assert_eq!(
            event.render().unwrap(),
            "event: datastar-execute-script\ndata: script if (ready) {\ndata: script   start();\ndata: script }\ndata: script done()\n\n"
        );
    }

    #[test]
    fn test_blank_line_in_a_value_cannot_end_the_block() {
        let event = Event::from(ExecuteScript::new(["a()\n\nevent: injected"]));
        let text = event.render().unwrap();

        assert_eq!(
            text,
            "event: datastar-execute-script\ndata: script a()\ndata: script \ndata: script event: injected\n\n"
        );
        assert_eq!(text.matches("\n\n").count(), 1);
        assert!(text.lines().skip(1).all(|line| line.is_empty() || line.starts_with("data: ")));
    }

    #[test]
    fn test_carriage_returns_split_scalar_and_path_values() {
        let selector = Event::from(RemoveFragments::new("#a\r\nevent: x"));
        assert_eq!(
            selector.render().unwrap(),
            "event: datastar-remove-fragments\ndata: selector #a\ndata: selector event: x\n\n"
        );

        let paths = Event::from(RemoveSignals::new(["foo\rbar"]));
        assert_eq!(
            paths.render().unwrap(),
            "event: datastar-remove-signals\ndata: paths foo\ndata: paths bar\n\n"
        );
    }

    #[test]
    fn test_render_comment() {
        assert_eq!(render_comment("12:00:00:123"), ": 12:00:00:123\n\n");
        assert_eq!(render_comment("one\ntwo"), ": one\n: two\n\n");
    }
}
