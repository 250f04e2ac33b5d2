//! JSON rendering of a run summary.

use std::io::Write;

use crate::report::Summary;

/// Pretty-printed JSON document for a summary.
pub fn summary_json(summary: &Summary, business_days: u32) -> serde_json::Value {
    let authors: Vec<serde_json::Value> = summary
        .stats
        .iter()
        .map(|s| {
            serde_json::json!({
                "author": s.author,
                "count": s.count,
                "ratio": s.ratio,
                "percent": s.percent(),
                "sparklines": s.sparklines,
                "span": s.span,
            })
        })
        .collect();

    serde_json::json!({
        "business_days": business_days,
        "classification": summary.verdicts,
        "authors": authors,
    })
}

/// Write the summary as pretty JSON followed by a newline.
pub fn write_summary(
    out: &mut impl Write,
    summary: &Summary,
    business_days: u32,
) -> anyhow::Result<()> {
    let value = summary_json(summary, business_days);
    serde_json::to_writer_pretty(&mut *out, &value)?;
    writeln!(out)?;
    Ok(())
}
