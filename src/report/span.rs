//! Per-author day-of-month histogram.

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::error::{PulseError, Result};
use crate::model::message::MessageRecord;

/// Number of day slots. Every month uses all 31, so sparklines keep one
/// width across months.
pub const SPAN_DAYS: usize = 31;

/// Activity on one day of the month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DaySlot {
    /// Number of reports.
    pub count: u64,
    /// Total body length of those reports.
    pub size: u64,
}

/// Which slot value to read out of a [`Span`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Count,
    Size,
}

impl Metric {
    pub fn of(self, slot: &DaySlot) -> u64 {
        match self {
            Self::Count => slot.count,
            Self::Size => slot.size,
        }
    }
}

/// Dense 31-slot histogram indexed by day of month (1–31).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    slots: [DaySlot; SPAN_DAYS],
}

impl Default for Span {
    fn default() -> Self {
        Self {
            slots: [DaySlot::default(); SPAN_DAYS],
        }
    }
}

impl Span {
    /// Build the histogram of one author's messages.
    ///
    /// Fails with [`PulseError::DayOutOfRange`] rather than clamping a day
    /// outside 1–31.
    pub fn build<'a, I>(author: &str, messages: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a MessageRecord>,
    {
        let mut span = Self::default();
        for message in messages {
            let day = message.day_of_month();
            let slot = span.slot_mut(day).ok_or_else(|| PulseError::DayOutOfRange {
                author: author.to_string(),
                day,
            })?;
            slot.count += 1;
            slot.size += message.body_len();
        }
        Ok(span)
    }

    /// Slot for `day` (1–31).
    pub fn day(&self, day: u32) -> Option<&DaySlot> {
        let idx = (day as usize).checked_sub(1)?;
        self.slots.get(idx)
    }

    fn slot_mut(&mut self, day: u32) -> Option<&mut DaySlot> {
        let idx = (day as usize).checked_sub(1)?;
        self.slots.get_mut(idx)
    }

    /// Slots for days 1..=31, in order.
    pub fn slots(&self) -> &[DaySlot; SPAN_DAYS] {
        &self.slots
    }

    /// One value per day for the chosen metric.
    pub fn series(&self, metric: Metric) -> Vec<u64> {
        self.slots.iter().map(|s| metric.of(s)).collect()
    }

    /// Sum of a metric over the month.
    pub fn total(&self, metric: Metric) -> u64 {
        self.slots.iter().map(|s| metric.of(s)).sum()
    }
}

impl Serialize for Span {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(SPAN_DAYS))?;
        for slot in &self.slots {
            seq.serialize_element(slot)?;
        }
        seq.end()
    }
}
