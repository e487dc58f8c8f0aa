//! Byte helpers for the `.hidden` control file.
//!
//! The file is a plain list of names, one per line, each terminated by `\n`.
//! Names are arbitrary bytes, so nothing here assumes UTF-8 and lines the
//! tool does not own are passed through untouched.

pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

pub fn entry_line(entry: &str) -> Vec<u8> {
    let mut line = Vec::with_capacity(entry.len() + 1);
    line.extend_from_slice(entry.as_bytes());
    line.push(b'\n');
    line
}

/// Literal substring test, so `NotEncrypted\n` also satisfies `Encrypted`.
pub fn contains_entry(content: &[u8], entry: &str) -> bool {
    let line = entry_line(entry);
    content.windows(line.len()).any(|window| window == line.as_slice())
}

/// True when appending straight away would glue onto an unterminated last line.
pub fn needs_separator(content: &[u8]) -> bool {
    content.last().is_some_and(|&b| b != b'\n')
}

/// Drops every line exactly equal to `entry`. Returns `None` if nothing matched.
///
/// Only `\n` separates lines; a `\r` stays part of the line it sits on.
pub fn remove_entry(content: &[u8], entry: &str) -> Option<Vec<u8>> {
    let mut kept = Vec::with_capacity(content.len());
    let mut removed = false;

    for line in content.split_inclusive(|&b| b == b'\n') {
        if is_entry(line, entry) {
            removed = true;
        } else {
            kept.extend_from_slice(line);
        }
    }

    removed.then_some(kept)
}

fn is_entry(line: &[u8], entry: &str) -> bool {
    line.strip_suffix(b"\n").unwrap_or(line) == entry.as_bytes()
}
