//! Sleep session segmentation
//!
//! Sleep exports arrive as individual stage segments (core, deep, REM,
//! awake...). Segments separated by at most [`SPLIT_GAP_MINUTES`] belong to
//! the same night; the night is dated by when it started, with anything
//! before noon counted towards the previous day.

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike};
use log::debug;

use super::IngestSummary;
use crate::error::Result;
use crate::models::SleepSegmentRow;
use crate::payload::{Metric, MetricData};
use crate::store::MetricStore;
use crate::timestamp::{epoch_millis, local_date_and_hour, parse_any_datetime, previous_day};

/// Largest gap between segments of one session
pub const SPLIT_GAP_MINUTES: i64 = 120;

/// Sessions starting before this hour belong to the previous day
pub const SLEEP_DATE_CUTOFF_HOUR: u32 = 12;

const SPLIT_GAP_MS: i64 = SPLIT_GAP_MINUTES * 60 * 1000;

/// A segment with its parsed bounds
#[derive(Debug, Clone)]
pub struct SleepSegment<'a> {
    pub sample: &'a MetricData,
    pub start_raw: &'a str,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub start_ms: i64,
    pub end_ms: i64,
}

/// Consecutive segments with no gap above the split threshold
#[derive(Debug, Clone)]
pub struct SleepSession<'a> {
    pub segments: Vec<SleepSegment<'a>>,
    pub start_ms: i64,
    /// Latest end seen so far, not necessarily the last segment's end
    pub end_ms: i64,
}

impl<'a> SleepSession<'a> {
    fn open(segment: SleepSegment<'a>) -> Self {
        Self {
            start_ms: segment.start_ms,
            end_ms: segment.end_ms,
            segments: vec![segment],
        }
    }

    /// Date the whole session is attributed to
    pub fn sleep_date(&self) -> Result<NaiveDate> {
        // Sessions are never empty; `open` seeds the first segment.
        sleep_date_for(self.segments[0].start_raw)
    }
}

/// Parse every sample that has both a start and an end
pub fn collect_segments<'a>(metrics: &[&'a Metric]) -> Result<Vec<SleepSegment<'a>>> {
    let mut segments = Vec::new();

    for metric in metrics {
        for sample in &metric.data {
            let (Some(start_raw), Some(end_raw)) =
                (sample.start_date.as_deref(), sample.end_date.as_deref())
            else {
                continue;
            };

            let start = parse_any_datetime(start_raw)?;
            let end = parse_any_datetime(end_raw)?;
            segments.push(SleepSegment {
                sample,
                start_raw,
                start,
                end,
                start_ms: epoch_millis(&start),
                end_ms: epoch_millis(&end),
            });
        }
    }

    Ok(segments)
}

/// Sort segments by start and group them greedily into sessions.
///
/// A new session starts when the next segment begins more than
/// [`SPLIT_GAP_MINUTES`] after the running end of the current one.
pub fn group_sessions(mut segments: Vec<SleepSegment<'_>>) -> Vec<SleepSession<'_>> {
    segments.sort_by_key(|s| s.start_ms);

    let mut sessions: Vec<SleepSession<'_>> = Vec::new();
    for segment in segments {
        match sessions.last_mut() {
            Some(current) if segment.start_ms - current.end_ms <= SPLIT_GAP_MS => {
                current.end_ms = current.end_ms.max(segment.end_ms);
                current.segments.push(segment);
            }
            _ => sessions.push(SleepSession::open(segment)),
        }
    }

    sessions
}

/// Sleep date for a session starting at `start`: the local date, or the day
/// before when the local hour is before noon.
pub fn sleep_date_for(start: &str) -> Result<NaiveDate> {
    let (date, hour) = match local_date_and_hour(start) {
        (Some(date), hour) => (date, hour),
        (None, _) => {
            let dt = parse_any_datetime(start)?;
            (dt.date_naive(), dt.hour())
        }
    };

    if hour < SLEEP_DATE_CUTOFF_HOUR {
        Ok(previous_day(date))
    } else {
        Ok(date)
    }
}

/// Rows for every segment, each carrying its session's sleep date
pub fn build_rows(metrics: &[&Metric]) -> Result<Vec<SleepSegmentRow>> {
    let sessions = group_sessions(collect_segments(metrics)?);
    let mut rows = Vec::new();

    for session in &sessions {
        let sleep_date = session.sleep_date()?;
        debug!(
            "Sleep session with {} segments dated {}",
            session.segments.len(),
            sleep_date
        );

        for segment in &session.segments {
            rows.push(SleepSegmentRow {
                session_start: segment.start,
                session_end: segment.end,
                duration_hours: segment.sample.qty,
                stage: segment.sample.value.clone(),
                source: segment.sample.source.clone(),
                sleep_date,
            });
        }
    }

    Ok(rows)
}

pub async fn process_sleep_analysis<S: MetricStore>(
    metrics: &[&Metric],
    store: &mut S,
    summary: &mut IngestSummary,
) -> Result<()> {
    for row in build_rows(metrics)? {
        if store.sleep_segment_exists(&row).await? {
            summary.sleep_sessions.record(false);
            continue;
        }

        store.insert_sleep_segment(&row).await?;
        summary.sleep_sessions.record(true);
    }

    Ok(())
}
