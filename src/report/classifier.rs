//! Decides which messages count as status reports.

use regex::Regex;

use crate::config::ClassifierConfig;
use crate::error::{PulseError, Result};
use crate::model::message::MessageRecord;

/// Automated senders: local part `noreply` / `no-reply` at any domain.
pub const DEFAULT_IGNORED_SENDER: &str = r"(?i)^no-?reply@.+$";

/// Replies are not original reports.
pub const DEFAULT_IGNORED_SUBJECT: &str = r"(?i)^RE:";

/// Outcome of classifying one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Counted toward its author's activity.
    Report,
    /// Sender matched an ignored-sender pattern.
    Automated,
    /// Subject matched an ignored-subject pattern.
    Reply,
    /// No sender address to classify.
    MissingSender,
}

/// Report classifier with its rejection patterns.
#[derive(Debug, Clone)]
pub struct Classifier {
    ignored_senders: Vec<Regex>,
    ignored_subjects: Vec<Regex>,
}

impl Classifier {
    /// Compile a classifier from raw pattern strings.
    pub fn new<S: AsRef<str>>(ignored_senders: &[S], ignored_subjects: &[S]) -> Result<Self> {
        Ok(Self {
            ignored_senders: compile(ignored_senders)?,
            ignored_subjects: compile(ignored_subjects)?,
        })
    }

    /// Compile the patterns from the `[classifier]` config section.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        Self::new(&config.ignored_senders, &config.ignored_subjects)
    }

    /// Classify a message.
    pub fn classify(&self, message: &MessageRecord) -> Verdict {
        let Some(sender) = message.sender_address() else {
            return Verdict::MissingSender;
        };
        if self.ignored_senders.iter().any(|re| re.is_match(sender)) {
            return Verdict::Automated;
        }
        if self
            .ignored_subjects
            .iter()
            .any(|re| re.is_match(&message.subject))
        {
            return Verdict::Reply;
        }
        Verdict::Report
    }

    /// `true` when the message counts as a report.
    pub fn is_report(&self, message: &MessageRecord) -> bool {
        self.classify(message) == Verdict::Report
    }
}

impl Default for Classifier {
    fn default() -> Self {
        // Constant patterns always compile
        Self {
            ignored_senders: vec![Regex::new(DEFAULT_IGNORED_SENDER).expect("valid default pattern")],
            ignored_subjects: vec![
                Regex::new(DEFAULT_IGNORED_SUBJECT).expect("valid default pattern"),
            ],
        }
    }
}

fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p.as_ref()).map_err(|source| PulseError::InvalidPattern {
                pattern: p.as_ref().to_string(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::address::EmailAddress;

    fn message(sender: Option<&str>, subject: &str) -> MessageRecord {
        MessageRecord {
            sender: sender.map(|s| EmailAddress::new(None, s)),
            recipients: Vec::new(),
            subject: subject.to_string(),
            date: chrono::DateTime::parse_from_rfc3339("2024-03-05T10:00:00Z").unwrap(),
            body_text: None,
            sequence: 0,
        }
    }

    #[test]
    fn test_accepts_plain_report() {
        let c = Classifier::default();
        assert_eq!(c.classify(&message(Some("alice@co.com"), "Weekly")), Verdict::Report);
    }

    #[test]
    fn test_rejects_noreply_variants() {
        let c = Classifier::default();
        for sender in ["noreply@system.com", "no-reply@x.org", "NoReply@Corp.COM", "NO-REPLY@a.b"] {
            assert_eq!(
                c.classify(&message(Some(sender), "Weekly")),
                Verdict::Automated,
                "{sender}"
            );
        }
        // Not the whole local part
        assert!(c.is_report(&message(Some("noreply-team@co.com"), "Weekly")));
        assert!(c.is_report(&message(Some("xnoreply@co.com"), "Weekly")));
    }

    #[test]
    fn test_rejects_replies() {
        let c = Classifier::default();
        assert_eq!(c.classify(&message(Some("a@co.com"), "RE: weekly")), Verdict::Reply);
        assert_eq!(c.classify(&message(Some("a@co.com"), "re:weekly")), Verdict::Reply);
        assert!(c.is_report(&message(Some("a@co.com"), "FW: RE: weekly")));
        assert!(c.is_report(&message(Some("a@co.com"), "")));
    }

    #[test]
    fn test_automated_wins_over_subject() {
        let c = Classifier::default();
        assert_eq!(
            c.classify(&message(Some("noreply@system.com"), "RE: anything")),
            Verdict::Automated
        );
    }

    #[test]
    fn test_missing_sender() {
        let c = Classifier::default();
        assert_eq!(c.classify(&message(None, "Weekly")), Verdict::MissingSender);
        assert_eq!(c.classify(&message(Some(""), "Weekly")), Verdict::MissingSender);
    }

    #[test]
    fn test_injected_patterns() {
        let c = Classifier::new(&["^bot@"], &["(?i)^fwd?:"]).unwrap();
        assert_eq!(c.classify(&message(Some("bot@co.com"), "x")), Verdict::Automated);
        assert_eq!(c.classify(&message(Some("a@co.com"), "Fwd: x")), Verdict::Reply);
        // Defaults are not implied
        assert!(c.is_report(&message(Some("noreply@co.com"), "RE: x")));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Classifier::new(&["("], &[]).unwrap_err();
        assert!(matches!(err, PulseError::InvalidPattern { .. }));
    }

    #[test]
    fn test_from_default_config_matches_default() {
        let c = Classifier::from_config(&ClassifierConfig::default()).unwrap();
        assert_eq!(c.classify(&message(Some("no-reply@a.com"), "x")), Verdict::Automated);
    }
}
