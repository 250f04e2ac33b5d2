//! `mboxpulse`: status-report activity per author from an MBOX archive.
//!
//! Messages are decoded, filtered down to original human reports, grouped
//! by contact, and summarized as a report count, a ratio against the
//! month's business days, and per-day sparklines.

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod parser;
pub mod report;
pub mod store;
