use std::collections::BTreeMap;

/// Placeholder tokens look like `%X{key}`.
const TOKEN_PREFIX: &str = "%X{";
const TOKEN_CLOSE: char = '}';

/// Resolve a custom-log template against the ambient context.
///
/// First every `%X{key}` whose key is present in `context` is replaced by
/// the context value, as plain text substitution. Then any token that is
/// still unresolved is blanked to the literal `null`, consuming at most
/// one double quote on either side of it, so an unknown placeholder in a
/// string position degrades to JSON `null` instead of leaving the raw
/// token behind.
///
/// Templates that are empty or exactly `{}` are returned unchanged
/// without touching the context at all.
pub fn substitute(template: &str, context: &BTreeMap<String, String>) -> String {
    if template.is_empty() || template == "{}" {
        return template.to_string();
    }

    let mut resolved = template.to_string();
    for (key, value) in context {
        let token = format!("{}{}{}", TOKEN_PREFIX, key, TOKEN_CLOSE);
        resolved = resolved.replace(&token, value);
    }

    blank_unresolved(&resolved)
}

/// Second pass: replace every remaining `%X{...}` token with `null`.
///
/// A single quote immediately before and/or after the token is folded
/// into the replacement, turning `"%X{missing}"` into an unquoted
/// `null`. A token with no closing brace is left as-is. A linear scan,
/// so no pathological inputs exist.
fn blank_unresolved(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    loop {
        let Some(start) = rest.find(TOKEN_PREFIX) else {
            out.push_str(rest);
            return out;
        };

        let body = start + TOKEN_PREFIX.len();
        let Some(close) = rest[body..].find(TOKEN_CLOSE) else {
            // Unterminated token, keep the tail untouched.
            out.push_str(rest);
            return out;
        };
        let end = body + close + 1;

        let mut literal = &rest[..start];
        if literal.ends_with('"') {
            literal = &literal[..literal.len() - 1];
        }
        out.push_str(literal);
        out.push_str("null");

        rest = &rest[end..];
        if let Some(tail) = rest.strip_prefix('"') {
            rest = tail;
        }
    }
}
