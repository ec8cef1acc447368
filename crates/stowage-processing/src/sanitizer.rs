//! Filesystem-safe names from untrusted client filenames.

/// Characters replaced with `-` in a sanitized name.
const REPLACED: [char; 4] = ['#', '/', '\\', ' '];

/// Unicode "Other" categories that `char::is_control` misses: format characters
/// (Cf, e.g. bidi overrides and zero-width joiners) and private use (Co).
const FORMAT_AND_PRIVATE_RANGES: &[(u32, u32)] = &[
    (0x00AD, 0x00AD),
    (0x0600, 0x0605),
    (0x061C, 0x061C),
    (0x06DD, 0x06DD),
    (0x070F, 0x070F),
    (0x0890, 0x0891),
    (0x08E2, 0x08E2),
    (0x180E, 0x180E),
    (0x200B, 0x200F),
    (0x202A, 0x202E),
    (0x2060, 0x2064),
    (0x2066, 0x206F),
    (0xE000, 0xF8FF),
    (0xFEFF, 0xFEFF),
    (0xFFF9, 0xFFFB),
    (0x110BD, 0x110BD),
    (0x110CD, 0x110CD),
    (0x13430, 0x1343F),
    (0x1BCA0, 0x1BCA3),
    (0x1D173, 0x1D17A),
    (0xE0001, 0xE0001),
    (0xE0020, 0xE007F),
    (0xF0000, 0xFFFFD),
    (0x100000, 0x10FFFD),
];

fn is_other_category(c: char) -> bool {
    if c.is_control() {
        return true;
    }
    let code = c as u32;
    FORMAT_AND_PRIVATE_RANGES
        .iter()
        .any(|&(start, end)| (start..=end).contains(&code))
}

fn strip_other_category(value: &str) -> String {
    value.chars().filter(|c| !is_other_category(*c)).collect()
}

/// Normalize a name as a relative path: backslashes become `/`, control and
/// format characters are dropped, empty and `.` segments are removed and `..`
/// pops the previous segment (or is discarded at the start).
pub fn normalize_path(raw: &str) -> String {
    let unified = strip_other_category(&raw.replace('\\', "/"));

    let mut parts: Vec<&str> = Vec::new();
    for part in unified.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}

/// Derive a filesystem-safe base name from an untrusted filename.
///
/// The result never contains `/`, `\`, `#`, a space or a control character.
/// Empty input yields an empty string.
pub fn sanitize(raw: &str) -> String {
    let normalized = normalize_path(raw);
    strip_other_category(&normalized).replace(REPLACED, "-")
}

/// Make a client-reported extension safe to append to a stored filename.
///
/// Same character rules as [`sanitize`], without path normalization: `sub/dir`
/// becomes `sub-dir` rather than `dir`.
pub fn sanitize_extension(raw: &str) -> String {
    strip_other_category(raw).replace(REPLACED, "-")
}
