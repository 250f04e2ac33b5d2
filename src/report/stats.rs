//! Per-author statistics: span, count, business-day ratio and sparklines.

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::report::aggregate::AuthorGroups;
use crate::report::calendar::BusinessDays;
use crate::report::span::{Metric, Span};
use crate::report::sparkline::Sparkline;

/// The two rendered distributions of a [`Stat`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sparklines {
    /// Reports per day.
    pub count: String,
    /// Report body size per day.
    pub size: String,
}

/// Activity summary for one author.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stat {
    pub author: String,
    pub span: Span,
    /// Number of reports.
    pub count: usize,
    /// Reports per business day; above 1.0 when an author averages more
    /// than one report a day.
    pub ratio: f64,
    pub sparklines: Sparklines,
}

impl Stat {
    /// Ratio as a whole percentage, truncated toward zero.
    pub fn percent(&self) -> u64 {
        (self.ratio * 100.0).trunc() as u64
    }
}

/// Build one [`Stat`] per author group, sorted by ascending ratio.
///
/// The sort is stable: authors with equal ratios keep the order in which
/// they were first encountered.
pub fn assemble(
    groups: &AuthorGroups<'_>,
    business_days: BusinessDays,
    sparkline: &Sparkline,
) -> Result<Vec<Stat>> {
    let days = f64::from(business_days.get());

    let mut stats = groups
        .iter()
        .map(|group| -> Result<Stat> {
            let span = Span::build(&group.author, group.messages.iter().copied())?;
            let count = group.messages.len();
            let ratio = count as f64 / days;
            debug!(author = %group.author, count, ratio, "Assembled author stats");
            Ok(Stat {
                author: group.author.clone(),
                sparklines: Sparklines {
                    count: sparkline.render(&span.series(Metric::Count)),
                    size: sparkline.render(&span.series(Metric::Size)),
                },
                span,
                count,
                ratio,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    // Ratios are finite and non-negative
    stats.sort_by(|a, b| a.ratio.total_cmp(&b.ratio));
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::address::EmailAddress;
    use crate::model::message::MessageRecord;
    use crate::report::aggregate::group_by_author;
    use crate::report::classifier::Classifier;
    use crate::report::contacts::Directory;
    use crate::report::span::DaySlot;

    fn message(sender: &str, subject: &str, date: &str, body: &str) -> MessageRecord {
        MessageRecord {
            sender: Some(EmailAddress::new(None, sender)),
            recipients: Vec::new(),
            subject: subject.to_string(),
            date: chrono::DateTime::parse_from_rfc3339(date).unwrap(),
            body_text: Some(body.to_string()),
            sequence: 0,
        }
    }

    fn days(n: u32) -> BusinessDays {
        BusinessDays::new(n).unwrap()
    }

    #[test]
    fn test_end_to_end_example() {
        let messages = vec![
            message("alice@co.com", "Weekly", "2024-03-05T09:00:00Z", &"a".repeat(100)),
            message("alice@co.com", "Daily", "2024-03-05T18:00:00Z", &"b".repeat(50)),
            message("alice@co.com", "RE: weekly", "2024-03-06T09:00:00Z", "thanks"),
        ];
        let dir = Directory::from_rows(vec![vec!["Alice", "alice@co.com"]]);
        let groups = group_by_author(&messages, &Classifier::default(), &dir);
        let stats = assemble(&groups, days(20), &Sparkline::default()).unwrap();

        assert_eq!(stats.len(), 1);
        let alice = &stats[0];
        assert_eq!(alice.author, "Alice");
        assert_eq!(alice.count, 2);
        assert!((alice.ratio - 0.10).abs() < 1e-12);
        assert_eq!(alice.percent(), 10);
        assert_eq!(alice.span.day(5), Some(&DaySlot { count: 2, size: 150 }));
        for day in (1..=31).filter(|&d| d != 5) {
            assert_eq!(alice.span.day(day), Some(&DaySlot::default()), "day {day}");
        }
        assert_eq!(alice.sparklines.count.chars().nth(4), Some('█'));
        assert_eq!(alice.sparklines.size.chars().count(), 31);
    }

    #[test]
    fn test_sorted_ascending_by_ratio() {
        let messages = vec![
            message("busy@co.com", "S", "2024-03-01T09:00:00Z", "x"),
            message("busy@co.com", "S", "2024-03-02T09:00:00Z", "x"),
            message("busy@co.com", "S", "2024-03-03T09:00:00Z", "x"),
            message("quiet@co.com", "S", "2024-03-01T09:00:00Z", "x"),
            message("mid@co.com", "S", "2024-03-01T09:00:00Z", "x"),
            message("mid@co.com", "S", "2024-03-04T09:00:00Z", "x"),
        ];
        let groups = group_by_author(&messages, &Classifier::default(), &Directory::empty());
        let stats = assemble(&groups, days(21), &Sparkline::default()).unwrap();

        let authors: Vec<_> = stats.iter().map(|s| s.author.as_str()).collect();
        assert_eq!(authors, vec!["quiet@co.com", "mid@co.com", "busy@co.com"]);
        assert!(stats.windows(2).all(|w| w[0].ratio <= w[1].ratio));
    }

    #[test]
    fn test_ties_keep_encounter_order() {
        let messages = vec![
            message("zed@co.com", "S", "2024-03-01T09:00:00Z", "x"),
            message("amy@co.com", "S", "2024-03-01T09:00:00Z", "x"),
            message("kim@co.com", "S", "2024-03-01T09:00:00Z", "x"),
        ];
        let groups = group_by_author(&messages, &Classifier::default(), &Directory::empty());
        let stats = assemble(&groups, days(20), &Sparkline::default()).unwrap();
        let authors: Vec<_> = stats.iter().map(|s| s.author.as_str()).collect();
        assert_eq!(authors, vec!["zed@co.com", "amy@co.com", "kim@co.com"]);
    }

    #[test]
    fn test_ratio_may_exceed_one() {
        let messages: Vec<_> = (1..=9)
            .map(|d| message("eager@co.com", "S", &format!("2024-03-{d:02}T09:00:00Z"), ""))
            .collect();
        let groups = group_by_author(&messages, &Classifier::default(), &Directory::empty());
        let stats = assemble(&groups, days(4), &Sparkline::default()).unwrap();
        assert!((stats[0].ratio - 2.25).abs() < 1e-12);
        assert_eq!(stats[0].percent(), 225);
    }

    #[test]
    fn test_span_count_sums_to_count() {
        let messages: Vec<_> = [3, 3, 17, 28, 31]
            .iter()
            .map(|d| message("bob@co.com", "S", &format!("2024-03-{d:02}T09:00:00Z"), "hi"))
            .collect();
        let groups = group_by_author(&messages, &Classifier::default(), &Directory::empty());
        let stats = assemble(&groups, days(21), &Sparkline::default()).unwrap();
        assert_eq!(stats[0].span.total(Metric::Count), stats[0].count as u64);
        assert_eq!(stats[0].author, "bob@co.com");
    }

    #[test]
    fn test_no_groups_no_stats() {
        let groups = group_by_author(&[], &Classifier::default(), &Directory::empty());
        let stats = assemble(&groups, days(20), &Sparkline::default()).unwrap();
        assert!(stats.is_empty());
    }
}
