use crate::models::{DailyMoodPoint, MoodLog, MoodSummary, WeeklyMoodPoint};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

pub const DEFAULT_INTENSITY: u8 = 5;
pub const INTENSITY_RANGE: RangeInclusive<u8> = 1..=10;

pub fn mood_summary_at(today: NaiveDate, logs: &[MoodLog]) -> MoodSummary {
    const WEEK_COUNT: usize = 8;

    let mut by_day: BTreeMap<NaiveDate, (u32, u32)> = BTreeMap::new();
    for log in logs {
        let entry = by_day.entry(log.created_at.date_naive()).or_default();
        entry.0 += 1;
        entry.1 += u32::from(log.intensity);
    }

    let mut last_7_days = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset as i64);
        let (entries, intensity_sum) = by_day.get(&date).copied().unwrap_or_default();
        last_7_days.push(DailyMoodPoint {
            date: date.to_string(),
            entries,
            avg_intensity: mean(intensity_sum, entries),
        });
    }

    let current_week_start = week_start(today);
    let mut weekly = Vec::with_capacity(WEEK_COUNT);

    for offset in (0..WEEK_COUNT).rev() {
        let start = current_week_start - Duration::weeks(offset as i64);
        let end = start + Duration::days(6);

        let mut entries = 0u32;
        let mut intensity_sum = 0u32;
        for day_offset in 0..7 {
            let date = start + Duration::days(day_offset);
            if let Some((count, intensity)) = by_day.get(&date) {
                entries += count;
                intensity_sum += intensity;
            }
        }

        let days_counted = if today < start {
            0
        } else if today > end {
            7
        } else {
            (today - start).num_days() as u8 + 1
        };

        let denom = if days_counted == 0 { 1.0 } else { f64::from(days_counted) };

        weekly.push(WeeklyMoodPoint {
            week: week_label(start),
            start_date: start.to_string(),
            end_date: end.to_string(),
            entries,
            days_counted,
            avg_intensity: mean(intensity_sum, entries),
            avg_entries_per_day: f64::from(entries) / denom,
        });
    }

    MoodSummary {
        last_7_days,
        weekly,
    }
}

fn mean(sum: u32, count: u32) -> f64 {
    if count == 0 {
        0.0
    } else {
        f64::from(sum) / f64::from(count)
    }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}
