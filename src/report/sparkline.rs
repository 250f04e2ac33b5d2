//! Compact one-line rendering of a numeric series.

/// Eight block glyphs, lowest to highest.
pub const DEFAULT_TICKS: &str = "▁▂▃▄▅▆▇█";

/// Renders series as sparklines over a fixed glyph ramp.
///
/// Each value is scaled against the series maximum: `ceil(v / max * n) - 1`
/// picks the glyph, so zeros and the smallest values share the lowest glyph
/// and the maximum always gets the highest one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sparkline {
    ticks: Vec<char>,
}

impl Default for Sparkline {
    fn default() -> Self {
        Self {
            ticks: DEFAULT_TICKS.chars().collect(),
        }
    }
}

impl Sparkline {
    /// Use a custom glyph ramp. Falls back to the default ramp when `ticks`
    /// is empty.
    pub fn with_ticks(ticks: &str) -> Self {
        let ticks: Vec<char> = ticks.chars().collect();
        if ticks.is_empty() {
            return Self::default();
        }
        Self { ticks }
    }

    /// One glyph per input value, in input order.
    pub fn render(&self, values: &[u64]) -> String {
        let lowest = self.ticks[0];
        let max = values.iter().copied().max().unwrap_or(0);
        if max == 0 {
            return std::iter::repeat(lowest).take(values.len()).collect();
        }

        let levels = self.ticks.len() as u128;
        values
            .iter()
            .map(|&v| {
                // Integer ceil(v * levels / max), no float rounding at the top
                let scaled = (v as u128 * levels).div_ceil(max as u128);
                let idx = scaled.saturating_sub(1) as usize;
                self.ticks[idx.min(self.ticks.len() - 1)]
            })
            .collect()
    }
}

/// Render with the default glyph ramp.
pub fn render(values: &[u64]) -> String {
    Sparkline::default().render(values)
}
