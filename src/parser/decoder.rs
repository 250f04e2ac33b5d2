//! Raw message → [`MessageRecord`].
//!
//! Uses `mail-parser` for MIME structure, encoded words and body selection,
//! with fallbacks from [`header`](super::header) for the sender and date.

use mail_parser::{Address, MessageParser};
use tracing::debug;

use crate::error::{PulseError, Result};
use crate::model::address::EmailAddress;
use crate::model::message::MessageRecord;
use crate::parser::header;

/// Decode one raw MBOX message (separator line included or not).
///
/// Fails with [`PulseError::Decode`] when the bytes hold no message headers,
/// and with [`PulseError::MissingDate`] when no date can be recovered from
/// either the `Date:` header or the separator line.
pub fn decode_message(raw: &[u8], sequence: u64) -> Result<MessageRecord> {
    let (separator, message_bytes) = split_from_line(raw);

    let parsed = MessageParser::default()
        .parse(message_bytes)
        .ok_or_else(|| PulseError::Decode {
            sequence,
            reason: "not an RFC 5322 message".to_string(),
        })?;

    if parsed.headers().is_empty() {
        return Err(PulseError::Decode {
            sequence,
            reason: "message has no headers".to_string(),
        });
    }

    let sender = parsed
        .from()
        .and_then(first_address)
        .or_else(|| {
            header::raw_header(message_bytes, "from").and_then(|v| EmailAddress::parse(&v))
        });

    let recipients = parsed.to().map(all_addresses).unwrap_or_default();

    let subject = parsed.subject().unwrap_or_default().to_string();

    let date = parsed
        .date()
        .and_then(|d| chrono::DateTime::parse_from_rfc3339(&d.to_rfc3339()).ok())
        .or_else(|| header::raw_header(message_bytes, "date").and_then(|v| header::parse_date(&v)))
        .or_else(|| {
            debug!(sequence, "No Date header, using separator date");
            separator.and_then(header::parse_separator_date)
        })
        .ok_or(PulseError::MissingDate { sequence })?;

    let body_text = parsed.body_text(0).map(|t| t.into_owned());

    Ok(MessageRecord {
        sender,
        recipients,
        subject,
        date,
        body_text,
        sequence,
    })
}

/// Split off the leading `From ` separator line, if present.
fn split_from_line(data: &[u8]) -> (Option<&str>, &[u8]) {
    let data = data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data);

    if data.starts_with(b"From ") {
        if let Some(pos) = data.iter().position(|&b| b == b'\n') {
            let line = std::str::from_utf8(&data[..pos]).ok();
            return (line, &data[pos + 1..]);
        }
    }
    (None, data)
}

fn to_email(addr: &mail_parser::Addr<'_>) -> Option<EmailAddress> {
    let address = addr.address.as_deref()?;
    if !address.contains('@') {
        return None;
    }
    Some(EmailAddress::new(addr.name.as_deref(), address))
}

fn first_address(address: &Address<'_>) -> Option<EmailAddress> {
    match address {
        Address::List(list) => list.iter().find_map(to_email),
        Address::Group(groups) => groups
            .iter()
            .flat_map(|g| g.addresses.iter())
            .find_map(to_email),
    }
}

fn all_addresses(address: &Address<'_>) -> Vec<EmailAddress> {
    match address {
        Address::List(list) => list.iter().filter_map(to_email).collect(),
        Address::Group(groups) => groups
            .iter()
            .flat_map(|g| g.addresses.iter())
            .filter_map(to_email)
            .collect(),
    }
}
