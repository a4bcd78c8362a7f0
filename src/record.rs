use std::collections::BTreeMap;

/// Caller location attached to a [`LayoutEvent`], when the host knows it.
///
/// The names keep the shape of the downstream record: in Rust terms the
/// module path stands in for the class name and the enclosing span name
/// for the method name. Any of them may be missing independently; the
/// layout substitutes documented sentinels for whatever is absent.
#[derive(Debug, Clone, Default)]
pub struct SourceLocation {
    pub class_name: Option<String>,
    pub method_name: Option<String>,
    pub line: Option<u32>,
}

/// One log event as seen by the layout.
///
/// Transient: built by the host (or the bundled [`crate::layer`] adapter)
/// for a single [`format`](crate::layout::JsonLayout::format) call and
/// dropped afterwards. `context` is the ambient per-thread key/value
/// mapping snapshotted at event time; the layout consults it for
/// `%X{key}` substitution but never owns or caches it.
#[derive(Debug, Clone)]
pub struct LayoutEvent {
    /// Event time as epoch milliseconds, UTC.
    pub timestamp_millis: i64,
    /// Fully formatted message text.
    pub message: String,
    /// Severity level name, emitted verbatim.
    pub level: String,
    /// Name of the thread that produced the event.
    pub thread_name: String,
    /// Caller location, absent when the host could not resolve one.
    pub source: Option<SourceLocation>,
    /// Ambient context mapping, key -> value.
    pub context: BTreeMap<String, String>,
}

impl LayoutEvent {
    /// Create an event with the given timestamp, level and message and
    /// everything else empty. Convenient for hosts that fill the rest
    /// field by field, and for tests.
    pub fn new(timestamp_millis: i64, level: impl Into<String>, message: impl Into<String>) -> Self {
        LayoutEvent {
            timestamp_millis,
            message: message.into(),
            level: level.into(),
            thread_name: String::new(),
            source: None,
            context: BTreeMap::new(),
        }
    }
}
