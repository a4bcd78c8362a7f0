/// Errors produced while formatting an event.
///
/// Only the custom-log template can fail: a template that does not
/// resolve to a JSON object after substitution points at a misconfigured
/// host, so it is surfaced per event rather than swallowed. Every other
/// lookup (hostname, user, env vars, source location) degrades to a
/// documented sentinel instead of erroring.
#[derive(thiserror::Error, Debug)]
pub enum LayoutError {
    #[error("custom log template is not valid JSON after substitution: {0}")]
    Template(#[from] serde_json::Error),

    #[error("custom log template resolved to a JSON value that is not an object")]
    TemplateNotAnObject,
}
