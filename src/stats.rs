//! Weekday aggregation over the records of one tracker. This is a pure pass
//! over the record set: nothing here touches storage or the terminal.

use anyhow::{bail, Result};

use crate::{storage::entities::RecordEntity, utils::time::weekday_index};

/// Names indexed the same way as [TrackerSummary::buckets], Monday first.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Traversal order used when rendering buckets: Sunday first, then Monday
/// through Saturday. Both stats tables use this same order.
pub const DISPLAY_ORDER: [usize; 7] = [6, 0, 1, 2, 3, 4, 5];

/// Running figures for a single weekday. `min`/`max` stay `None` until the
/// first record lands in the bucket.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeekdayBucket {
    pub total: f64,
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl WeekdayBucket {
    fn add(&mut self, value: f64) {
        self.total += value;
        self.count += 1;
        match self.min {
            Some(min) if value < min => self.min = Some(value),
            None => self.min = Some(value),
            Some(_) => {}
        }
        match self.max {
            Some(max) if value > max => self.max = Some(value),
            None => self.max = Some(value),
            Some(_) => {}
        }
    }

    /// The average of an empty bucket is defined as 0 so that a weekday with
    /// no records still renders as a normal table row. This is deliberately
    /// not the rule for the global average, which is only ever produced by
    /// [summarize] and fails on an empty record set instead.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.
        } else {
            self.total / self.count as f64
        }
    }
}

/// Everything the stats output needs, computed in one pass. Buckets are
/// indexed 0 = Monday .. 6 = Sunday; use [DISPLAY_ORDER] for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerSummary {
    pub entry_count: usize,
    pub global_sum: f64,
    pub global_avg: f64,
    pub global_min: f64,
    pub global_max: f64,
    pub buckets: [WeekdayBucket; 7],
}

/// Folds the full record set of one tracker into per-weekday buckets plus
/// global figures. The input order doesn't matter. An empty record set is an
/// error: there is no meaningful global average for it, and callers are
/// expected to report the tracker as empty rather than print a zero table.
pub fn summarize(records: &[RecordEntity]) -> Result<TrackerSummary> {
    let Some(first) = records.first() else {
        bail!("Can't summarize a tracker without records");
    };

    let mut buckets = [WeekdayBucket::default(); 7];
    let mut global_min = first.value;
    let mut global_max = first.value;
    for record in records {
        buckets[weekday_index(record.day)].add(record.value);
        // strict comparisons, so in a tie the earliest record wins
        if record.value < global_min {
            global_min = record.value;
        }
        if record.value > global_max {
            global_max = record.value;
        }
    }

    let global_sum: f64 = buckets.iter().map(|bucket| bucket.total).sum();
    let entry_count: usize = buckets.iter().map(|bucket| bucket.count).sum();

    Ok(TrackerSummary {
        entry_count,
        global_sum,
        global_avg: global_sum / entry_count as f64,
        global_min,
        global_max,
        buckets,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::storage::entities::RecordEntity;

    use super::{summarize, WeekdayBucket, DISPLAY_ORDER};

    // 2024-04-01 was a Monday
    const MONDAY: NaiveDate = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
    const TUESDAY: NaiveDate = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
    const SUNDAY: NaiveDate = NaiveDate::from_ymd_opt(2024, 4, 7).unwrap();

    fn record(day: NaiveDate, value: f64) -> RecordEntity {
        RecordEntity::new("test", day, value)
    }

    #[test]
    fn test_worked_example() {
        let records = [
            record(MONDAY, 5.),
            record(MONDAY, 3.),
            record(TUESDAY, 10.),
        ];
        let summary = summarize(&records).unwrap();

        let monday = summary.buckets[0];
        assert_eq!(monday.count, 2);
        assert_eq!(monday.total, 8.);
        assert_eq!(monday.min, Some(3.));
        assert_eq!(monday.max, Some(5.));
        assert_eq!(monday.average(), 4.);

        let tuesday = summary.buckets[1];
        assert_eq!(tuesday.count, 1);
        assert_eq!(tuesday.total, 10.);
        assert_eq!(tuesday.min, Some(10.));
        assert_eq!(tuesday.max, Some(10.));
        assert_eq!(tuesday.average(), 10.);

        assert_eq!(summary.entry_count, 3);
        assert_eq!(summary.global_sum, 18.);
        assert_eq!(summary.global_avg, 6.);
        assert_eq!(summary.global_min, 3.);
        assert_eq!(summary.global_max, 10.);
    }

    #[test]
    fn test_bucket_figures_sum_to_globals() {
        let records = [
            record(MONDAY, 2.5),
            record(TUESDAY, 4.),
            record(SUNDAY, 1.),
            record(SUNDAY.succ_opt().unwrap(), 7.25),
            record(MONDAY, 0.25),
        ];
        let summary = summarize(&records).unwrap();

        let bucket_total: f64 = summary.buckets.iter().map(|b| b.total).sum();
        let bucket_count: usize = summary.buckets.iter().map(|b| b.count).sum();
        assert_eq!(bucket_total, summary.global_sum);
        assert_eq!(bucket_count, summary.entry_count);
        assert_eq!(bucket_count, records.len());
    }

    #[test]
    fn test_empty_bucket_is_zero_but_empty_input_fails() {
        // a weekday nobody recorded on reports average 0
        let summary = summarize(&[record(MONDAY, 5.)]).unwrap();
        assert_eq!(summary.buckets[1].count, 0);
        assert_eq!(summary.buckets[1].average(), 0.);
        assert_eq!(WeekdayBucket::default().average(), 0.);

        // while no records at all refuses to produce a global average
        assert!(summarize(&[]).is_err());
    }

    #[test]
    fn test_exact_ties_are_deterministic() {
        for records in [
            [record(MONDAY, 5.), record(MONDAY, 5.)],
            [record(MONDAY, 5.), record(MONDAY, 5.)],
        ] {
            let summary = summarize(&records).unwrap();
            assert_eq!(summary.buckets[0].min, Some(5.));
            assert_eq!(summary.buckets[0].max, Some(5.));
            assert_eq!(summary.global_min, 5.);
            assert_eq!(summary.global_max, 5.);
        }
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let records = [
            record(MONDAY, 5.),
            record(TUESDAY, 3.),
            record(SUNDAY, 11.),
        ];
        assert_eq!(summarize(&records).unwrap(), summarize(&records).unwrap());
    }

    #[test]
    fn test_display_order_starts_on_sunday_and_covers_the_week() {
        assert_eq!(DISPLAY_ORDER[0], 6);
        let mut seen = DISPLAY_ORDER;
        seen.sort();
        assert_eq!(seen, [0, 1, 2, 3, 4, 5, 6]);
    }
}
