//! Storage path templates.

use stowage_core::constants::{PLACEHOLDER_FILENAME, PLACEHOLDER_TYPE, PLACEHOLDER_USER_ID};
use stowage_core::FileType;

/// Expand a path template into a backend-relative path.
///
/// `{user_id}`, `{type}` and `{filename}` are substituted in a single left-to-right
/// pass; substituted text is never rescanned, so a filename containing `{type}` is
/// kept verbatim. An absent user id becomes an empty segment. Leading and trailing
/// `/` and `\` are trimmed from the result.
pub fn resolve_path(
    template: &str,
    user_id: Option<i64>,
    file_type: FileType,
    filename: &str,
) -> String {
    let user_id = user_id.map(|id| id.to_string()).unwrap_or_default();
    let replacements = [
        (PLACEHOLDER_USER_ID, user_id.as_str()),
        (PLACEHOLDER_TYPE, file_type.as_str()),
        (PLACEHOLDER_FILENAME, filename),
    ];

    let mut out = String::with_capacity(template.len() + filename.len());
    let mut rest = template;
    'scan: while let Some(c) = rest.chars().next() {
        if c == '{' {
            for (placeholder, value) in replacements {
                if let Some(tail) = rest.strip_prefix(placeholder) {
                    out.push_str(value);
                    rest = tail;
                    continue 'scan;
                }
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    out.trim_matches(['/', '\\']).to_string()
}
