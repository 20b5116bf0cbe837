//! Container name derivation.
//!
//! The pure half of the name allocator: derive a store-safe container
//! name from a human-readable dataset name plus ordered suffix segments.
//! The impure half (existence probing and disambiguation) lives in the
//! storage crate.

use crate::{CONTAINER_NAME_FALLBACK, MIN_CONTAINER_NAME_LEN};
use time::Date;

/// Single-character disambiguators appended when a derived name collides.
///
/// Digits and lowercase letters, excluding the visually ambiguous
/// `0`, `1`, `i`, `l`, and `o`.
pub const DISAMBIGUATION_ALPHABET: &str = "23456789abcdefghjkmnpqrstuvwxyz";

/// Derive a container name from a dataset name and ordered suffixes.
///
/// Characters outside `[A-Za-z0-9]` are stripped and the rest lowercased.
/// If the stripped base is shorter than the minimum usable length it is
/// replaced by the fallback token. The base is truncated so that the
/// final name, including one `-<suffix>` segment per suffix, fits within
/// `max_len`.
pub fn derive_name(dataset_name: &str, suffixes: &[&str], max_len: usize) -> String {
    let mut base: String = dataset_name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if base.len() < MIN_CONTAINER_NAME_LEN {
        base = CONTAINER_NAME_FALLBACK.to_string();
    }

    let reserved: usize = suffixes.iter().map(|s| s.len() + 1).sum();
    base.truncate(max_len.saturating_sub(reserved));

    for suffix in suffixes {
        base.push('-');
        base.push_str(suffix);
    }
    base
}

/// The date-stamped suffix for update-session (shadow) containers.
///
/// Concurrent edit sessions on different days get distinct default names.
pub fn update_suffix(date: Date) -> String {
    format!(
        "u{:04}{:02}{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
