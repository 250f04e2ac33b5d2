//! Decoded message record.

use chrono::{DateTime, Datelike, FixedOffset};

use super::address::EmailAddress;

/// A single decoded message, as handed to the report engine.
///
/// Records are immutable once decoded. The date keeps the UTC offset the
/// message was written with, so the day of month is the sender's local day.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MessageRecord {
    /// Sender (first `From:` address). `None` when the header was missing or empty.
    pub sender: Option<EmailAddress>,

    /// Primary recipients (`To:`).
    pub recipients: Vec<EmailAddress>,

    /// Decoded subject line. Empty when absent.
    pub subject: String,

    /// Message date with its original offset.
    pub date: DateTime<FixedOffset>,

    /// Plain-text body, if the message had one.
    pub body_text: Option<String>,

    /// Position of the raw message within its mailbox (0, 1, 2, …).
    pub sequence: u64,
}

impl MessageRecord {
    /// Bare sender address, if known.
    pub fn sender_address(&self) -> Option<&str> {
        self.sender
            .as_ref()
            .map(|s| s.address.as_str())
            .filter(|a| !a.is_empty())
    }

    /// Day of month (1–31) in the message's own offset.
    pub fn day_of_month(&self) -> u32 {
        self.date.day()
    }

    /// Body length in UTF-16 code units (0 without a body). Characters
    /// outside the Basic Multilingual Plane count twice.
    pub fn body_len(&self) -> u64 {
        self.body_text
            .as_deref()
            .map(|t| t.encode_utf16().count() as u64)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, body: Option<&str>) -> MessageRecord {
        MessageRecord {
            sender: Some(EmailAddress::new(None, "a@b.com")),
            recipients: Vec::new(),
            subject: "Status".to_string(),
            date: DateTime::parse_from_rfc3339(date).unwrap(),
            body_text: body.map(String::from),
            sequence: 0,
        }
    }

    #[test]
    fn test_day_of_month_uses_own_offset() {
        // 23:30 at -05:00 is already the 6th in UTC, but the sender's day is the 5th
        let msg = record("2024-03-05T23:30:00-05:00", None);
        assert_eq!(msg.day_of_month(), 5);
    }

    #[test]
    fn test_body_len_counts_utf16_units() {
        assert_eq!(record("2024-03-05T10:00:00Z", Some("señal")).body_len(), 5);
        assert_eq!(record("2024-03-05T10:00:00Z", Some("done 🚀")).body_len(), 7);
        assert_eq!(record("2024-03-05T10:00:00Z", None).body_len(), 0);
    }

    #[test]
    fn test_sender_address_empty_is_none() {
        let mut msg = record("2024-03-05T10:00:00Z", None);
        msg.sender = Some(EmailAddress::new(None, ""));
        assert_eq!(msg.sender_address(), None);
    }
}
