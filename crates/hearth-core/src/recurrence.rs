// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recurrence calculator: the next due instant for daily and weekly
//! repeating tasks.
//!
//! All functions are pure over an explicit reference instant. The result
//! is always strictly after the reference instant; a candidate landing
//! exactly on it rolls forward.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::error::HearthError;
use crate::types::{RepeatKind, RepeatRule};

/// Fallback hour/minute applied when `timeHHMM` is malformed.
const FALLBACK_HOUR: u32 = 16;
const FALLBACK_MINUTE: u32 = 0;

/// How many days forward the weekly scan looks. Covers two full weeks so
/// any non-empty day set is always hit.
const WEEKLY_SCAN_DAYS: i64 = 14;

/// Parse `H:MM`/`HH:MM` into clamped (hour, minute).
///
/// Hour is clamped to 0..=23, minute to 0..=59. Anything that does not
/// match the shape at all falls back to 16:00.
pub fn parse_time_hhmm(s: &str) -> (u32, u32) {
    fn parse(s: &str) -> Option<(u32, u32)> {
        let (h, m) = s.split_once(':')?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return None;
        }
        let hour = h.parse::<u32>().ok()?;
        let minute = m.parse::<u32>().ok()?;
        Some((hour.min(23), minute.min(59)))
    }
    parse(s.trim()).unwrap_or((FALLBACK_HOUR, FALLBACK_MINUTE))
}

fn at_time(date: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
    date.and_hms_opt(hour, minute, 0)
        .expect("hour and minute are clamped to valid ranges")
        .and_utc()
}

/// Next daily occurrence of `time_hhmm` strictly after `now`.
pub fn next_daily(time_hhmm: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    let (hour, minute) = parse_time_hhmm(time_hhmm);
    let mut candidate = at_time(now.date_naive(), hour, minute);
    if candidate <= now {
        candidate += Duration::days(1);
    }
    candidate
}

/// Next weekly occurrence of `time_hhmm` on one of `days_of_week`
/// (0=Sun..6=Sat), strictly after `now`.
///
/// Scans forward day by day for up to two weeks; the `now + 7d` fallback
/// is unreachable for a non-empty day set but keeps the function total.
pub fn next_weekly(time_hhmm: &str, days_of_week: &[u8], now: DateTime<Utc>) -> DateTime<Utc> {
    let (hour, minute) = parse_time_hhmm(time_hhmm);
    for offset in 0..WEEKLY_SCAN_DAYS {
        let date = now.date_naive() + Duration::days(offset);
        let weekday = date.weekday().num_days_from_sunday() as u8;
        if days_of_week.contains(&weekday) {
            let candidate = at_time(date, hour, minute);
            if candidate > now {
                return candidate;
            }
        }
    }
    at_time(now.date_naive() + Duration::days(7), hour, minute)
}

/// Next due instant for `rule`, as epoch milliseconds.
///
/// Returns `Ok(None)` for one-time rules (the caller supplies the due
/// timestamp directly). Weekly rules are validated first: an empty day
/// set is a validation error, never an arbitrary date.
pub fn next_occurrence(rule: &RepeatRule, now: DateTime<Utc>) -> Result<Option<i64>, HearthError> {
    rule.validate()?;
    let time = rule.time_hhmm.as_deref().unwrap_or("");
    match rule.kind {
        RepeatKind::None => Ok(None),
        RepeatKind::Daily => Ok(Some(next_daily(time, now).timestamp_millis())),
        RepeatKind::Weekly => {
            Ok(Some(next_weekly(time, &rule.days_of_week, now).timestamp_millis()))
        }
    }
}

/// Absolute pre-alert instants for a due timestamp, from negative minute
/// offsets. Offsets that are not negative are skipped.
pub fn alert_instants(due_ms: i64, alert_offsets_min: &[i32]) -> Vec<i64> {
    alert_offsets_min
        .iter()
        .filter(|offset| **offset < 0)
        .map(|offset| due_ms + i64::from(*offset) * 60_000)
        .collect()
}
