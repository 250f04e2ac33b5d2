//! Lenient RFC 5322 header helpers: unfolding, raw lookup, and date parsing.
//!
//! These back up `mail-parser` when a header it could not interpret still
//! holds something usable.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use tracing::warn;

/// Decode raw header bytes to a string.
///
/// Tries UTF-8 first, then falls back to Windows-1252 (which accepts every byte).
pub fn decode_header_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

/// Unfold headers: join continuation lines with the previous header.
///
/// Stops at the first blank line. Returns `(lowercase_name, raw_value)` pairs.
pub fn unfold_headers(text: &str) -> Vec<(String, String)> {
    let mut result: Vec<(String, String)> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            break;
        }
        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some(last) = result.last_mut() {
                last.1.push(' ');
                last.1.push_str(line.trim());
            }
        } else if let Some(colon_pos) = line.find(':') {
            let name = line[..colon_pos].trim().to_lowercase();
            let value = line[colon_pos + 1..].trim().to_string();
            result.push((name, value));
        }
    }

    result
}

/// First raw value of a header in a message (name is case-insensitive).
pub fn raw_header(message: &[u8], name: &str) -> Option<String> {
    let name = name.to_lowercase();
    unfold_headers(&decode_header_bytes(message))
        .into_iter()
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

/// Parse an email date string, keeping its UTC offset.
///
/// Supports RFC 2822, RFC 3339 and common broken variants. Dates without
/// any zone information are taken as `+0000`.
pub fn parse_date(date_str: &str) -> Option<DateTime<FixedOffset>> {
    let trimmed = date_str.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt);
    }

    // Trailing comments such as "(UTC)" break the strict parsers
    let no_comment = match trimmed.find('(') {
        Some(pos) => trimmed[..pos].trim(),
        None => trimmed,
    };
    let candidate = replace_named_tz(strip_day_of_week(no_comment));

    const ZONED: [&str; 3] = [
        "%d %b %Y %H:%M:%S %z",
        "%d %b %Y %H:%M %z",
        "%Y-%m-%d %H:%M:%S %z",
    ];
    const NAIVE: [&str; 4] = [
        "%d %b %Y %H:%M:%S",
        "%b %d %H:%M:%S %Y",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ];

    for fmt in ZONED {
        if let Ok(dt) = DateTime::parse_from_str(&candidate, fmt) {
            return Some(dt);
        }
    }
    for fmt in NAIVE {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(&candidate, fmt) {
            return Some(ndt.and_utc().fixed_offset());
        }
    }

    warn!(date = trimmed, "Could not parse date");
    None
}

/// Parse the date carried by an MBOX separator line.
///
/// `From sender@example.com Thu Jan  4 10:00:00 2024` → 2024-01-04 10:00:00 +0000
pub fn parse_separator_date(line: &str) -> Option<DateTime<FixedOffset>> {
    let rest = line.trim().strip_prefix("From ")?;
    // Skip the envelope sender, then normalize runs of spaces ("Jan  4")
    let mut words = rest.split_whitespace().skip(1);
    let _day_of_week = words.next()?;
    let asctime = words.collect::<Vec<_>>().join(" ");
    NaiveDateTime::parse_from_str(&asctime, "%b %d %H:%M:%S %Y")
        .ok()
        .map(|ndt| ndt.and_utc().fixed_offset())
}

/// Strip leading day-of-week prefix (e.g. "Thu, " or "Thu ").
fn strip_day_of_week(s: &str) -> &str {
    const DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
    for day in DAYS {
        if let Some(rest) = s.strip_prefix(day) {
            if rest.starts_with(',') || rest.starts_with(' ') {
                return rest.trim_start_matches(',').trim();
            }
        }
    }
    s
}

/// Replace a trailing timezone abbreviation with its numeric offset.
fn replace_named_tz(s: &str) -> String {
    // Longer names first: "CEST" also ends with "EST"
    const TZS: [(&str, &str); 13] = [
        ("CEST", "+0200"),
        ("EST", "-0500"),
        ("EDT", "-0400"),
        ("CST", "-0600"),
        ("CDT", "-0500"),
        ("MST", "-0700"),
        ("MDT", "-0600"),
        ("PST", "-0800"),
        ("PDT", "-0700"),
        ("GMT", "+0000"),
        ("UTC", "+0000"),
        ("CET", "+0100"),
        ("JST", "+0900"),
    ];
    for (name, offset) in TZS {
        if let Some(head) = s.strip_suffix(name) {
            return format!("{}{offset}", head);
        }
    }
    s.to_string()
}
