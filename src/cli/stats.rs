use anyhow::{bail, Result};

use crate::{
    stats::{summarize, TrackerSummary, DISPLAY_ORDER, WEEKDAY_NAMES},
    storage::tracker_storage::TrackerStorage,
};

use super::commands::validate_tracker_name;

pub async fn process_stats_command(storage: &impl TrackerStorage, tracker: &str) -> Result<()> {
    validate_tracker_name(tracker)?;
    let records = storage.fetch_records(tracker).await?;
    if records.is_empty() {
        bail!("Tracker '{tracker}' has no records");
    }

    let summary = summarize(&records)?;
    print!("{}", render_summary(tracker, &summary));
    Ok(())
}

/// Renders the two stats tables. Both traverse the buckets Sunday first, and
/// a weekday without records shows a 0 average but a blank min/max.
fn render_summary(tracker: &str, summary: &TrackerSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Stats for '{tracker}' ({} entries)\n\n",
        summary.entry_count
    ));

    out.push_str(&format!(
        "{:<10} {:>12} {:>12}\n",
        "Day", "Total", "Average"
    ));
    for index in DISPLAY_ORDER {
        let bucket = &summary.buckets[index];
        out.push_str(&format!(
            "{:<10} {:>12.2} {:>12.2}\n",
            WEEKDAY_NAMES[index],
            bucket.total,
            bucket.average()
        ));
    }
    out.push_str(&format!(
        "{:<10} {:>12.2} {:>12.2}\n",
        "All", summary.global_sum, summary.global_avg
    ));

    out.push('\n');
    out.push_str(&format!("{:<10} {:>12} {:>12}\n", "Day", "Min", "Max"));
    for index in DISPLAY_ORDER {
        let bucket = &summary.buckets[index];
        out.push_str(&format!(
            "{:<10} {:>12} {:>12}\n",
            WEEKDAY_NAMES[index],
            format_extreme(bucket.min),
            format_extreme(bucket.max)
        ));
    }
    out.push_str(&format!(
        "{:<10} {:>12.2} {:>12.2}\n",
        "All", summary.global_min, summary.global_max
    ));

    out
}

fn format_extreme(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}
