//! The report engine: classification, author resolution and grouping,
//! per-day spans, business-day ratios and sparklines.
//!
//! ```text
//! records ─▶ classifier ─▶ aggregate (contacts) ─▶ span ─▶ stats
//!                                                  calendar ┘  └ sparkline
//! ```

pub mod aggregate;
pub mod calendar;
pub mod classifier;
pub mod contacts;
pub mod span;
pub mod sparkline;
pub mod stats;

use crate::error::Result;
use crate::model::message::MessageRecord;

use self::aggregate::{group_by_author, VerdictCounts};
use self::calendar::BusinessDays;
use self::classifier::Classifier;
use self::contacts::Directory;
use self::sparkline::Sparkline;
use self::stats::Stat;

/// Everything a run produces: the ordered stats plus the classification tally.
#[derive(Debug, Clone)]
pub struct Summary {
    pub stats: Vec<Stat>,
    pub verdicts: VerdictCounts,
}

/// Run the whole engine over decoded messages.
pub fn summarize(
    messages: &[MessageRecord],
    classifier: &Classifier,
    directory: &Directory,
    business_days: BusinessDays,
    sparkline: &Sparkline,
) -> Result<Summary> {
    let groups = group_by_author(messages, classifier, directory);
    let stats = stats::assemble(&groups, business_days, sparkline)?;
    Ok(Summary {
        stats,
        verdicts: groups.verdicts(),
    })
}
