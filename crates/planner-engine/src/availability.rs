//! Free-window computation over a horizon of days.
//!
//! For each day the tasks starting on that date form the busy set. Free windows
//! are the gaps the busy set leaves inside the day's active hours, emitted in
//! chronological order: before the first task, between tasks, after the last.

use chrono::{NaiveDate, NaiveDateTime};

use crate::model::{DayWindow, FreeInterval, Task};

/// Number of days covered when the caller does not specify a horizon.
pub const DEFAULT_HORIZON_DAYS: u32 = 14;

/// How busy intervals that overlap each other are treated during gap detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GapPolicy {
    /// Compare each task only with its successor in start order, exactly as the
    /// intervals were recorded. Overlapping tasks are not merged, so a task nested
    /// inside a longer one can expose a "gap" that the longer task still covers,
    /// and tasks reaching outside the active hours are not clipped.
    #[default]
    AsRecorded,
    /// Clip busy intervals to the active hours and merge overlapping or touching
    /// ones before computing gaps. Every emitted window is then genuinely free.
    MergeOverlaps,
}

type Interval = (NaiveDateTime, NaiveDateTime);

/// Compute free windows for `days` consecutive days beginning at `start_date`.
///
/// Tasks are assigned to the date their start falls on; a task crossing
/// midnight only counts against its first day. Output is ordered by day, then
/// chronologically within the day. `days == 0` yields an empty list.
///
/// # Arguments
///
/// * `tasks` — Every known task; only those starting inside the horizon matter.
/// * `window` — The daily wake/sleep envelope.
/// * `start_date` — First day of the horizon.
/// * `days` — Number of days to cover.
/// * `policy` — Overlap handling, see [`GapPolicy`].
pub fn compute_free_windows(
    tasks: &[Task],
    window: DayWindow,
    start_date: NaiveDate,
    days: u32,
    policy: GapPolicy,
) -> Vec<FreeInterval> {
    let mut windows = Vec::new();

    for date in start_date.iter_days().take(days as usize) {
        let (day_start, day_end) = window.bounds(date);

        // Collected in insertion order so the stable sort keeps ties in that order.
        let busy: Vec<Interval> = tasks
            .iter()
            .filter(|t| t.date() == date)
            .map(|t| (t.start, t.end))
            .collect();

        match policy {
            GapPolicy::AsRecorded => gaps_as_recorded(busy, day_start, day_end, &mut windows),
            GapPolicy::MergeOverlaps => gaps_merged(busy, day_start, day_end, &mut windows),
        }
    }

    windows
}

/// Free windows of a single day, see [`compute_free_windows`].
pub fn free_windows_on(
    tasks: &[Task],
    window: DayWindow,
    date: NaiveDate,
    policy: GapPolicy,
) -> Vec<FreeInterval> {
    compute_free_windows(tasks, window, date, 1, policy)
}

fn gaps_as_recorded(
    mut busy: Vec<Interval>,
    day_start: NaiveDateTime,
    day_end: NaiveDateTime,
    out: &mut Vec<FreeInterval>,
) {
    if busy.is_empty() {
        out.push(FreeInterval {
            start: day_start,
            end: day_end,
        });
        return;
    }

    busy.sort_by_key(|&(start, _)| start);

    let (first_start, _) = busy[0];
    if first_start > day_start {
        out.push(FreeInterval {
            start: day_start,
            end: first_start,
        });
    }

    // Adjacent pairs only. Touching or overlapping pairs emit nothing.
    for pair in busy.windows(2) {
        let (_, prev_end) = pair[0];
        let (next_start, _) = pair[1];
        if prev_end < next_start {
            out.push(FreeInterval {
                start: prev_end,
                end: next_start,
            });
        }
    }

    let (_, last_end) = busy[busy.len() - 1];
    if last_end < day_end {
        out.push(FreeInterval {
            start: last_end,
            end: day_end,
        });
    }
}

fn gaps_merged(
    busy: Vec<Interval>,
    day_start: NaiveDateTime,
    day_end: NaiveDateTime,
    out: &mut Vec<FreeInterval>,
) {
    let merged = merge_busy_periods(busy, day_start, day_end);

    let mut cursor = day_start;
    for (busy_start, busy_end) in merged {
        if cursor < busy_start {
            out.push(FreeInterval {
                start: cursor,
                end: busy_start,
            });
        }
        cursor = cursor.max(busy_end);
    }

    if cursor < day_end {
        out.push(FreeInterval {
            start: cursor,
            end: day_end,
        });
    }
}

/// Clip intervals to `[window_start, window_end]` and merge overlapping or
/// adjacent ones. Returns a sorted, non-overlapping list.
fn merge_busy_periods(
    intervals: Vec<Interval>,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> Vec<Interval> {
    let mut clipped: Vec<Interval> = intervals
        .into_iter()
        .filter(|&(start, end)| start < window_end && end > window_start)
        .map(|(start, end)| (start.max(window_start), end.min(window_end)))
        .collect();

    clipped.sort_by_key(|&(start, end)| (start, end));

    let mut merged: Vec<Interval> = Vec::with_capacity(clipped.len());
    for (start, end) in clipped {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }

    merged
}
