//! Filesystem-safe filename sanitization.
//!
//! Produces names that are valid on every major platform, Windows being the
//! strictest: forbidden characters and control characters are removed,
//! trailing dots and spaces stripped, reserved device names escaped and the
//! total length capped at 255 bytes.

/// Fallback used when sanitization leaves nothing behind.
pub const DEFAULT_FILENAME: &str = "default_filename";

const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

const MAX_FILENAME_BYTES: usize = 255;

const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Sanitize `name` using `_` as the replacement for forbidden characters.
pub fn sanitize_filename_default(name: &str) -> String {
    sanitize_filename(name, "_")
}

/// Turn an arbitrary string into a filesystem-safe file name.
///
/// `replacement` stands in for each forbidden character and is appended to
/// reserved device names. Control characters in `replacement` itself are
/// dropped so the result never contains them; when nothing of it survives,
/// reserved names are escaped with `_` instead.
pub fn sanitize_filename(name: &str, replacement: &str) -> String {
    let replacement: String = replacement
        .chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c) && !is_control(*c))
        .collect();

    let mut sanitized = String::with_capacity(name.len());
    for c in name.chars() {
        if FORBIDDEN_CHARS.contains(&c) {
            sanitized.push_str(&replacement);
        } else if !is_control(c) {
            sanitized.push(c);
        }
    }

    let mut sanitized = trim_trailing(&sanitized).to_string();

    if sanitized.len() > MAX_FILENAME_BYTES {
        sanitized = truncate_preserving_extension(&sanitized, MAX_FILENAME_BYTES);
    }

    let stem = split_extension(&sanitized).0.to_ascii_uppercase();
    if RESERVED_NAMES.contains(&stem.as_str()) {
        sanitized.push_str(if replacement.is_empty() { "_" } else { &replacement });
        if sanitized.len() > MAX_FILENAME_BYTES {
            sanitized = truncate_preserving_extension(&sanitized, MAX_FILENAME_BYTES);
        }
    }

    if sanitized.is_empty() {
        return DEFAULT_FILENAME.to_string();
    }

    sanitized
}

const fn is_control(c: char) -> bool {
    (c as u32) < 0x20
}

fn trim_trailing(s: &str) -> &str {
    s.trim_end_matches([' ', '.'])
}

/// Split into `(stem, extension)` where the extension includes its dot.
///
/// A leading dot (hidden file) is not treated as an extension separator.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

fn truncate_preserving_extension(name: &str, max_bytes: usize) -> String {
    let (stem, ext) = split_extension(name);
    // An extension that alone blows the budget is not worth preserving.
    let (stem, ext) = if ext.len() >= max_bytes {
        (name, "")
    } else {
        (stem, ext)
    };

    let budget = max_bytes - ext.len();
    let mut cut = budget.min(stem.len());
    while !stem.is_char_boundary(cut) {
        cut -= 1;
    }

    let base = trim_trailing(&stem[..cut]);
    format!("{base}{ext}")
}
