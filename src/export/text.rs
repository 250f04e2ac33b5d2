//! Console rendering of per-author stats.

use std::io::Write;

use crate::report::stats::Stat;

/// Write one author block:
///
/// ```text
/// Author: Alice
/// Messages: 2, daily ratio: 10%
/// Messages amount distribution: ▁▁▁▁█▁…
/// Messages size distribution:   ▁▁▁▁█▁…
/// ```
pub fn write_stat(out: &mut impl Write, stat: &Stat) -> std::io::Result<()> {
    writeln!(out, "Author: {}", stat.author)?;
    writeln!(
        out,
        "Messages: {}, daily ratio: {}%",
        stat.count,
        stat.percent()
    )?;
    writeln!(out, "Messages amount distribution: {}", stat.sparklines.count)?;
    writeln!(out, "Messages size distribution:   {}", stat.sparklines.size)?;
    writeln!(out)
}

/// Write every stat in order, flushing after each block so partial output
/// survives a later failure.
pub fn write_stats(out: &mut impl Write, stats: &[Stat]) -> std::io::Result<()> {
    for stat in stats {
        write_stat(out, stat)?;
        out.flush()?;
    }
    Ok(())
}
