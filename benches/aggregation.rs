use criterion::{criterion_group, criterion_main, Criterion};
use std::path::Path;

use mboxpulse::model::address::EmailAddress;
use mboxpulse::model::message::MessageRecord;
use mboxpulse::report::calendar::BusinessDays;
use mboxpulse::report::classifier::Classifier;
use mboxpulse::report::contacts::Directory;
use mboxpulse::report::sparkline::Sparkline;

fn synthetic_messages(count: usize, authors: usize) -> Vec<MessageRecord> {
    (0..count)
        .map(|i| {
            let day = (i % 28) + 1;
            let subject = if i % 7 == 0 { "RE: status" } else { "Status" };
            MessageRecord {
                sender: Some(EmailAddress::new(None, &format!("user{}@co.com", i % authors))),
                recipients: Vec::new(),
                subject: subject.to_string(),
                date: chrono::DateTime::parse_from_rfc3339(&format!(
                    "2024-03-{day:02}T09:00:00+00:00"
                ))
                .unwrap(),
                body_text: Some("x".repeat(i % 500)),
                sequence: i as u64,
            }
        })
        .collect()
}

fn bench_summarize(c: &mut Criterion) {
    let messages = synthetic_messages(10_000, 50);
    let directory = Directory::from_rows(
        (0..50).map(|i| vec![format!("User {i}"), format!("user{i}@co.com")]),
    );
    let classifier = Classifier::default();
    let sparkline = Sparkline::default();
    let days = BusinessDays::new(21).unwrap();

    c.bench_function("summarize_10k_messages", |b| {
        b.iter(|| {
            mboxpulse::report::summarize(&messages, &classifier, &directory, days, &sparkline)
                .unwrap()
        })
    });
}

fn bench_load_fixture(c: &mut Criterion) {
    let fixture_path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("reports.mbox");

    c.bench_function("load_reports_mbox", |b| {
        b.iter(|| mboxpulse::store::loader::load_mailbox(&fixture_path, None).unwrap())
    });
}

criterion_group!(benches, bench_summarize, bench_load_fixture);
criterion_main!(benches);
