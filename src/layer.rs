use std::collections::BTreeMap;
use std::io::Write;

use chrono::Utc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::context;
use crate::layout::JsonLayout;
use crate::record::{LayoutEvent, SourceLocation};

/// `tracing_subscriber` layer that runs every event through a
/// [`JsonLayout`] and writes the resulting line through a [`MakeWriter`].
///
/// This is the plumbing between the host framework and the layout: it
/// snapshots the calling thread's ambient context, folds the event's own
/// fields on top of it (event fields win), extracts the message via a
/// field visitor and maps `tracing` metadata onto the record's source
/// location. The module path stands in for the class name and the
/// enclosing span name for the method name.
///
/// Writing is synchronous; buffering or shipping, if wanted, belongs to
/// the writer (e.g. `tracing_appender::non_blocking`).
pub struct JsonLayoutLayer<W> {
    layout: JsonLayout,
    make_writer: W,
}

impl<W> JsonLayoutLayer<W> {
    /// Wrap a layout and a writer factory into a layer.
    pub fn new(layout: JsonLayout, make_writer: W) -> Self {
        JsonLayoutLayer {
            layout,
            make_writer,
        }
    }
}

impl<S, W> Layer<S> for JsonLayoutLayer<W>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut fields = context::snapshot();
        let mut message: Option<String> = None;

        let mut visitor = FieldVisitor {
            context: &mut fields,
            message: &mut message,
        };
        event.record(&mut visitor);

        let meta = event.metadata();
        let source = SourceLocation {
            class_name: meta
                .module_path()
                .map(str::to_string)
                .or_else(|| Some(meta.target().to_string())),
            method_name: ctx.event_span(event).map(|span| span.name().to_string()),
            line: meta.line(),
        };

        let layout_event = LayoutEvent {
            timestamp_millis: Utc::now().timestamp_millis(),
            message: message.unwrap_or_default(),
            level: meta.level().to_string(),
            thread_name: std::thread::current()
                .name()
                .unwrap_or_default()
                .to_string(),
            source: Some(source),
            context: fields,
        };

        match self.layout.format(&layout_event) {
            Ok(line) => {
                let mut writer = self.make_writer.make_writer();
                if let Err(e) = writer.write_all(line.as_bytes()) {
                    eprintln!("failed to write log record: {}", e);
                }
            }
            Err(e) => {
                eprintln!("failed to format log record: {}", e);
            }
        }
    }
}

/// Extracts the `message` field as text and every other event field as a
/// context entry, stringified.
struct FieldVisitor<'a> {
    context: &'a mut BTreeMap<String, String>,
    message: &'a mut Option<String>,
}

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.context.insert(field.name().to_string(), value.to_string());
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.context.insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.context.insert(field.name().to_string(), value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.context.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.context
                .insert(field.name().to_string(), format!("{:?}", value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use serde_json::Value;
    use std::sync::{Arc, Mutex};
    use tracing::info;
    use tracing_subscriber::layer::SubscriberExt;

    /// Captures written lines for assertions.
    #[derive(Clone, Default)]
    struct TestWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl TestWriter {
        fn lines(&self) -> Vec<Value> {
            let buffer = self.buffer.lock().unwrap();
            String::from_utf8_lossy(&buffer)
                .split("\r\n")
                .filter(|l| !l.is_empty())
                .map(|l| serde_json::from_str(l).unwrap())
                .collect()
        }
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.buffer.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for TestWriter {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn layer_with_writer(config: LayoutConfig) -> (JsonLayoutLayer<TestWriter>, TestWriter) {
        let writer = TestWriter::default();
        let layer = JsonLayoutLayer::new(JsonLayout::new(config), writer.clone());
        (layer, writer)
    }

    #[test]
    fn event_becomes_one_json_line() {
        let config = LayoutConfig {
            environment: "dev".to_string(),
            application: "demo".to_string(),
            ..LayoutConfig::default()
        };
        let (layer, writer) = layer_with_writer(config);
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            info!("it happened");
        });

        let lines = writer.lines();
        assert_eq!(lines.len(), 1);

        let record = &lines[0];
        assert_eq!(record["log"], "it happened");
        assert_eq!(record["logLevel"], "INFO");
        assert_eq!(record["environment"], "DEV");
        assert_eq!(record["application"], "demo");
        assert!(record["codeLine"].as_u64().unwrap() > 0);
        assert_eq!(record["customLog"], serde_json::json!({}));
    }

    #[test]
    fn event_fields_resolve_template_placeholders() {
        let config = LayoutConfig {
            custom_log: r#"{"order":"%X{order_id}"}"#.to_string(),
            ..LayoutConfig::default()
        };
        let (layer, writer) = layer_with_writer(config);
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            info!(order_id = "ord-9", "created");
        });

        let record = &writer.lines()[0];
        assert_eq!(record["customLog"], serde_json::json!({"order": "ord-9"}));
    }

    #[test]
    fn thread_context_resolves_template_placeholders() {
        let config = LayoutConfig {
            custom_log: r#"{"user":"%X{uid}"}"#.to_string(),
            ..LayoutConfig::default()
        };
        let (layer, writer) = layer_with_writer(config);
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            let _guard = context::scoped("uid", "42");
            info!("with ambient context");
        });

        let record = &writer.lines()[0];
        assert_eq!(record["customLog"], serde_json::json!({"user": "42"}));
    }

    #[test]
    fn event_fields_shadow_thread_context() {
        let config = LayoutConfig {
            custom_log: r#"{"user":"%X{uid}"}"#.to_string(),
            ..LayoutConfig::default()
        };
        let (layer, writer) = layer_with_writer(config);
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            let _guard = context::scoped("uid", "ambient");
            info!(uid = "event", "shadowed");
        });

        let record = &writer.lines()[0];
        assert_eq!(record["customLog"], serde_json::json!({"user": "event"}));
    }

    #[test]
    fn enclosing_span_name_becomes_method_name() {
        let (layer, writer) = layer_with_writer(LayoutConfig::default());
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("handle_request");
            let _enter = span.enter();
            info!("inside");
        });

        let record = &writer.lines()[0];
        assert_eq!(record["methodName"], "handle_request");
    }

    #[test]
    fn event_outside_spans_uses_method_sentinel() {
        let (layer, writer) = layer_with_writer(LayoutConfig::default());
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            info!("no span here");
        });

        let record = &writer.lines()[0];
        assert_eq!(record["methodName"], "unknow-method");
    }
}
