use chrono::{SecondsFormat, TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::config::LayoutConfig;
use crate::env::{self, APP_NAME_ENV, HOSTNAME_ENV, USERNAME_ENV, USER_ENV};
use crate::error::LayoutError;
use crate::record::{LayoutEvent, SourceLocation};
use crate::template;

/// Line terminator appended to every serialized record.
pub const DEFAULT_EOL: &str = "\r\n";

/// Sentinel line number when the source location is unknown.
pub const UNKNOW_LINE_NUMBER: u32 = 0;
/// Sentinel method name when the source location is unknown.
pub const UNKNOW_METHOD: &str = "unknow-method";
/// Sentinel class name when the source location is unknown.
pub const UNKNOW_CLASS: &str = "unknow-class";

const UNKNOWN_HOST: &str = "unknown";

/// Structured event formatter: one [`LayoutEvent`] in, one single-line
/// JSON record out.
///
/// Holds its [`LayoutConfig`] read-only, so a single instance may be
/// shared across threads and called concurrently without locking. Each
/// call resolves the custom-log template against the event's context,
/// enriches the record with timestamp, caller, host and process fields,
/// serializes compactly and appends `\r\n`.
pub struct JsonLayout {
    config: LayoutConfig,
}

impl JsonLayout {
    /// Build a layout from its static configuration.
    pub fn new(config: LayoutConfig) -> Self {
        JsonLayout { config }
    }

    /// The configuration this layout was built with.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Format one event into a JSON record terminated by `\r\n`.
    ///
    /// **Returns**
    /// - `Ok(line)` with the serialized record.
    /// - `Err(..)` only when the custom-log template does not resolve to
    ///   a JSON object after substitution; that points at a misconfigured
    ///   template, so it is surfaced rather than swallowed. Every other
    ///   lookup degrades to a documented sentinel or empty field.
    pub fn format(&self, event: &LayoutEvent) -> Result<String, LayoutError> {
        let interpolated = template::substitute(&self.config.custom_log, &event.context);
        let custom_log: Value = serde_json::from_str(&interpolated)?;
        if !custom_log.is_object() {
            return Err(LayoutError::TemplateNotAnObject);
        }

        let source = event.source.as_ref();
        let record = OutputRecord {
            time_stamp: format_timestamp(event.timestamp_millis),
            log: &event.message,
            custom_log,
            code_line: line_number(source),
            thread_name: &event.thread_name,
            method_name: method_name(source),
            log_level: &event.level,
            process_id: class_name(source),
            machine_id: machine_id(),
            user_id: user_id(),
            environment: self.config.environment.to_uppercase(),
            application: &self.config.application,
            extension_type: &self.config.extension_type,
            system: &self.config.system,
            sub_system: &self.config.sub_system,
            sub_application: &self.config.sub_application,
            component: &self.config.component,
            app_key: &self.config.app_key,
            paas_project: &self.config.paas_project,
            paas_app: env::env_or(APP_NAME_ENV, ""),
            paas_app_version: &self.config.paas_app_version,
            app_init: &self.config.app_init,
            session_id: "",
            correlation_trace_id: "",
            correlation_span_id: "",
            platform_log: "",
            technology: "",
            server_id: env::env_or(HOSTNAME_ENV, ""),
        };

        let mut line = serde_json::to_string(&record)?;
        line.push_str(DEFAULT_EOL);
        Ok(line)
    }
}

/// Wire shape of one record. Field names are the downstream contract,
/// historical misspellings included; every field is always present.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputRecord<'a> {
    time_stamp: String,
    log: &'a str,
    custom_log: Value,
    code_line: u32,
    thread_name: &'a str,
    method_name: &'a str,
    log_level: &'a str,
    process_id: &'a str,
    machine_id: String,
    user_id: String,
    environment: String,
    application: &'a str,
    extension_type: &'a str,
    system: &'a str,
    sub_system: &'a str,
    sub_application: &'a str,
    component: &'a str,
    app_key: &'a str,
    paas_project: &'a str,
    paas_app: String,
    paas_app_version: &'a str,
    app_init: &'a str,
    session_id: &'a str,
    correlation_trace_id: &'a str,
    correlation_span_id: &'a str,
    platform_log: &'a str,
    technology: &'a str,
    server_id: String,
}

/// Epoch milliseconds as an ISO-8601 UTC instant with millisecond
/// precision. An out-of-range epoch degrades to an empty string.
fn format_timestamp(millis: i64) -> String {
    match Utc.timestamp_millis_opt(millis).single() {
        Some(ts) => ts.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => String::new(),
    }
}

fn line_number(source: Option<&SourceLocation>) -> u32 {
    source.and_then(|s| s.line).unwrap_or(UNKNOW_LINE_NUMBER)
}

fn method_name(source: Option<&SourceLocation>) -> &str {
    source
        .and_then(|s| s.method_name.as_deref())
        .unwrap_or(UNKNOW_METHOD)
}

fn class_name(source: Option<&SourceLocation>) -> &str {
    source
        .and_then(|s| s.class_name.as_deref())
        .unwrap_or(UNKNOW_CLASS)
}

/// Local machine hostname, best-effort. A name that is not valid UTF-8
/// is reported on stderr and replaced by `"unknown"`; the format call
/// itself never fails on this.
///
/// The warning goes to stderr, not through `tracing`: the layout may be
/// running inside the global subscriber, and a `tracing` event here
/// would re-enter the layer.
fn machine_id() -> String {
    match gethostname::gethostname().into_string() {
        Ok(name) => name,
        Err(raw) => {
            eprintln!("hostname can't be resolved: {:?}", raw);
            UNKNOWN_HOST.to_string()
        }
    }
}

fn user_id() -> String {
    std::env::var(USER_ENV)
        .or_else(|_| std::env::var(USERNAME_ENV))
        .unwrap_or_default()
}
