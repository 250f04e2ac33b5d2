//! Integration tests for loading a mailbox and summarizing it per author.

use std::path::{Path, PathBuf};

use mboxpulse::error::PulseError;
use mboxpulse::report::calendar::{self, BusinessDays, Calendar, ReportMonth, WeekdayCalendar};
use mboxpulse::report::classifier::Classifier;
use mboxpulse::report::contacts::Directory;
use mboxpulse::report::span::Metric;
use mboxpulse::report::sparkline::Sparkline;
use mboxpulse::report::summarize;
use mboxpulse::store::loader::load_mailbox;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Calendar with the same number of business days every month.
struct FixedCalendar(u32);

impl Calendar for FixedCalendar {
    fn business_days_in_month(&self, _year: i32, _month: u32) -> u32 {
        self.0
    }
}

fn march_2024() -> ReportMonth {
    ReportMonth::parse("2024-03").unwrap()
}

// ─── Loading ────────────────────────────────────────────────────────

#[test]
fn test_load_fixture_decodes_every_message() {
    let mailbox = load_mailbox(fixture("reports.mbox"), None).unwrap();
    assert_eq!(mailbox.messages.len(), 5);
    assert!(mailbox.failures.is_empty());
    assert_eq!(mailbox.total(), 5);

    let first = &mailbox.messages[0];
    assert_eq!(first.subject, "Weekly status");
    assert_eq!(first.sender_address(), Some("alice@co.com"));
    assert_eq!(first.day_of_month(), 5);
}

#[test]
fn test_load_missing_mailbox_is_an_error() {
    let err = load_mailbox(fixture("does-not-exist.mbox"), None).unwrap_err();
    assert!(matches!(err, PulseError::FileNotFound(_)));
}

#[test]
fn test_load_reports_progress() {
    let last = std::cell::Cell::new((0u64, 0u64));
    load_mailbox(
        fixture("reports.mbox"),
        Some(&|current, total| last.set((current, total))),
    )
    .unwrap();
    let (current, total) = last.get();
    assert!(total > 0);
    assert_eq!(current, total);
}

// ─── Summary ────────────────────────────────────────────────────────

#[test]
fn test_summary_with_contacts() {
    let mailbox = load_mailbox(fixture("reports.mbox"), None).unwrap();
    let directory = Directory::load(fixture("contacts.csv"), "auto").unwrap();
    let days = calendar::business_days_in(&WeekdayCalendar::default(), march_2024()).unwrap();
    assert_eq!(days.get(), 21);

    let summary = summarize(
        &mailbox.messages,
        &Classifier::default(),
        &directory,
        days,
        &Sparkline::default(),
    )
    .unwrap();

    assert_eq!(summary.verdicts.reports, 3);
    assert_eq!(summary.verdicts.automated, 1);
    assert_eq!(summary.verdicts.replies, 1);

    let authors: Vec<_> = summary.stats.iter().map(|s| s.author.as_str()).collect();
    assert_eq!(authors, vec!["Bob Builder", "Alice Example"]);

    let bob = &summary.stats[0];
    assert_eq!(bob.count, 1);
    assert_eq!(bob.percent(), 4);
    assert_eq!(bob.span.day(11).map(|s| s.count), Some(1));

    // Both of Alice's addresses land in one group, on the 5th
    let alice = &summary.stats[1];
    assert_eq!(alice.count, 2);
    assert_eq!(alice.percent(), 9);
    assert_eq!(alice.span.day(5).map(|s| s.count), Some(2));
    assert_eq!(alice.span.total(Metric::Count), 2);
    assert!(alice.span.day(5).map(|s| s.size).unwrap_or(0) >= 150);
    assert_eq!(alice.sparklines.count.chars().count(), 31);
    assert_eq!(alice.sparklines.count.chars().nth(4), Some('█'));
    assert_eq!(alice.sparklines.size.chars().nth(4), Some('█'));
    assert!(alice.sparklines.count.chars().take(4).all(|c| c == '▁'));
}

#[test]
fn test_summary_without_contacts_groups_by_address() {
    let mailbox = load_mailbox(fixture("reports.mbox"), None).unwrap();
    let summary = summarize(
        &mailbox.messages,
        &Classifier::default(),
        &Directory::empty(),
        BusinessDays::new(20).unwrap(),
        &Sparkline::default(),
    )
    .unwrap();

    let mut authors: Vec<_> = summary.stats.iter().map(|s| s.author.as_str()).collect();
    authors.sort_unstable();
    assert_eq!(authors, vec!["alice.e@co.com", "alice@co.com", "bob@co.com"]);
    assert!(summary.stats.iter().all(|s| s.count == 1));
}

#[test]
fn test_missing_contacts_file_is_empty_directory() {
    let directory = Directory::load(fixture("no-such-contacts.csv"), "auto").unwrap();
    assert!(directory.is_empty());
}

#[test]
fn test_utf16_contacts_with_bom() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.csv");
    let mut bytes = vec![0xFF, 0xFE];
    for unit in "Alice Example,alice@co.com\n".encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    std::fs::write(&path, bytes).unwrap();

    let directory = Directory::load(&path, "auto").unwrap();
    assert_eq!(directory.resolve("alice@co.com"), "Alice Example");
}

// ─── Calendar ───────────────────────────────────────────────────────

#[test]
fn test_zero_business_days_is_rejected() {
    let err = calendar::business_days_in(&FixedCalendar(0), march_2024()).unwrap_err();
    assert!(matches!(
        err,
        PulseError::NoBusinessDays {
            year: 2024,
            month: 3
        }
    ));
}

#[test]
fn test_custom_calendar_drives_ratio() {
    let mailbox = load_mailbox(fixture("reports.mbox"), None).unwrap();
    let directory = Directory::load(fixture("contacts.csv"), "auto").unwrap();
    let days = calendar::business_days_in(&FixedCalendar(2), march_2024()).unwrap();
    let summary = summarize(
        &mailbox.messages,
        &Classifier::default(),
        &directory,
        days,
        &Sparkline::default(),
    )
    .unwrap();

    let alice = summary
        .stats
        .iter()
        .find(|s| s.author == "Alice Example")
        .unwrap();
    assert!((alice.ratio - 1.0).abs() < 1e-12);
    assert_eq!(alice.percent(), 100);
}
