//! Export per-author stats to CSV.
//!
//! Output is UTF-8 with BOM for Excel compatibility.

use std::io::Write;
use std::path::Path;

use anyhow::Context;

use crate::report::stats::Stat;

/// Write stats as CSV rows.
///
/// Columns: Author, Reports, Ratio, Percent, Count_Sparkline, Size_Sparkline
pub fn write_csv(out: impl Write, stats: &[Stat]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        "Author",
        "Reports",
        "Ratio",
        "Percent",
        "Count_Sparkline",
        "Size_Sparkline",
    ])?;
    for stat in stats {
        let count = stat.count.to_string();
        let ratio = format!("{:.4}", stat.ratio);
        let percent = stat.percent().to_string();
        writer.write_record([
            stat.author.as_str(),
            count.as_str(),
            ratio.as_str(),
            percent.as_str(),
            stat.sparklines.count.as_str(),
            stat.sparklines.size.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Export stats to a CSV file, creating parent directories as needed.
pub fn export_csv(stats: &[Stat], output_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory {}", parent.display()))?;
        }
    }
    let mut file = std::fs::File::create(output_path)
        .with_context(|| format!("Cannot create CSV file {}", output_path.display()))?;

    // UTF-8 BOM for Excel
    file.write_all(&[0xEF, 0xBB, 0xBF])?;
    write_csv(file, stats)
        .with_context(|| format!("Cannot write CSV file {}", output_path.display()))
}
