//! Tests for free-window computation over a multi-day horizon.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use planner_engine::availability::{compute_free_windows, free_windows_on, GapPolicy};
use planner_engine::{DayWindow, FreeInterval, MemoryStorage, TaskDraft, TaskStore};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
    day(d).and_time(hm(h, m))
}

fn window() -> DayWindow {
    DayWindow::new(hm(9, 0), hm(22, 0)).unwrap()
}

/// Build tasks through a store so they carry real identifiers.
fn tasks(entries: &[(u32, (u32, u32), (u32, u32), &str)]) -> Vec<planner_engine::Task> {
    let mut store = TaskStore::new(MemoryStorage::new());
    for &(d, (sh, sm), (eh, em), title) in entries {
        store
            .add_task(TaskDraft::on(day(d), hm(sh, sm), hm(eh, em), title))
            .unwrap();
    }
    store.tasks().to_vec()
}

fn spans(windows: &[FreeInterval]) -> Vec<(NaiveDateTime, NaiveDateTime)> {
    windows.iter().map(|w| (w.start, w.end)).collect()
}

// ── Single day ──────────────────────────────────────────────────────────────

#[test]
fn two_separate_tasks_leave_three_windows() {
    let busy = tasks(&[(2, (10, 0), (11, 0), "A"), (2, (13, 0), (14, 0), "B")]);

    let free = free_windows_on(&busy, window(), day(2), GapPolicy::AsRecorded);

    assert_eq!(
        spans(&free),
        vec![
            (at(2, 9, 0), at(2, 10, 0)),
            (at(2, 11, 0), at(2, 13, 0)),
            (at(2, 14, 0), at(2, 22, 0)),
        ]
    );
    assert_eq!(free[1].duration_minutes(), 120);
}

#[test]
fn empty_day_is_one_full_window() {
    let free = free_windows_on(&[], window(), day(2), GapPolicy::AsRecorded);
    assert_eq!(spans(&free), vec![(at(2, 9, 0), at(2, 22, 0))]);
}

#[test]
fn task_covering_whole_day_leaves_nothing() {
    let busy = tasks(&[(2, (9, 0), (22, 0), "all day")]);
    let free = free_windows_on(&busy, window(), day(2), GapPolicy::AsRecorded);
    assert!(free.is_empty());
}

#[test]
fn insertion_order_does_not_matter() {
    let busy = tasks(&[(2, (13, 0), (14, 0), "B"), (2, (10, 0), (11, 0), "A")]);
    let free = free_windows_on(&busy, window(), day(2), GapPolicy::AsRecorded);
    assert_eq!(
        spans(&free),
        vec![
            (at(2, 9, 0), at(2, 10, 0)),
            (at(2, 11, 0), at(2, 13, 0)),
            (at(2, 14, 0), at(2, 22, 0)),
        ]
    );
}

#[test]
fn task_at_wake_time_has_no_leading_window() {
    let busy = tasks(&[(2, (9, 0), (10, 0), "standup")]);
    let free = free_windows_on(&busy, window(), day(2), GapPolicy::AsRecorded);
    assert_eq!(spans(&free), vec![(at(2, 10, 0), at(2, 22, 0))]);
}

#[test]
fn task_ending_at_sleep_time_has_no_trailing_window() {
    let busy = tasks(&[(2, (20, 0), (22, 0), "reading")]);
    let free = free_windows_on(&busy, window(), day(2), GapPolicy::AsRecorded);
    assert_eq!(spans(&free), vec![(at(2, 9, 0), at(2, 20, 0))]);
}

#[test]
fn back_to_back_tasks_leave_no_gap_between_them() {
    let busy = tasks(&[(2, (10, 0), (11, 0), "A"), (2, (11, 0), (12, 0), "B")]);
    let free = free_windows_on(&busy, window(), day(2), GapPolicy::AsRecorded);
    assert_eq!(
        spans(&free),
        vec![(at(2, 9, 0), at(2, 10, 0)), (at(2, 12, 0), at(2, 22, 0))]
    );
}

// ── Overlap handling ────────────────────────────────────────────────────────

#[test]
fn overlapping_pair_emits_no_gap_between_them() {
    let busy = tasks(&[(2, (10, 0), (12, 0), "A"), (2, (11, 0), (13, 0), "B")]);
    let free = free_windows_on(&busy, window(), day(2), GapPolicy::AsRecorded);
    assert_eq!(
        spans(&free),
        vec![(at(2, 9, 0), at(2, 10, 0)), (at(2, 13, 0), at(2, 22, 0))]
    );
}

#[test]
fn nested_task_exposes_covered_gap_as_recorded() {
    // A covers 10-13 and contains B (11-12). Comparing only neighbours, B.end
    // precedes C.start, so 12-14 is reported although A still covers 12-13.
    let busy = tasks(&[
        (2, (10, 0), (13, 0), "A"),
        (2, (11, 0), (12, 0), "B"),
        (2, (14, 0), (15, 0), "C"),
    ]);

    let recorded = free_windows_on(&busy, window(), day(2), GapPolicy::AsRecorded);
    assert_eq!(
        spans(&recorded),
        vec![
            (at(2, 9, 0), at(2, 10, 0)),
            (at(2, 12, 0), at(2, 14, 0)),
            (at(2, 15, 0), at(2, 22, 0)),
        ]
    );

    let merged = free_windows_on(&busy, window(), day(2), GapPolicy::MergeOverlaps);
    assert_eq!(
        spans(&merged),
        vec![
            (at(2, 9, 0), at(2, 10, 0)),
            (at(2, 13, 0), at(2, 14, 0)),
            (at(2, 15, 0), at(2, 22, 0)),
        ]
    );
}

#[test]
fn last_task_decides_trailing_window_as_recorded() {
    // The long task ends after the last-starting one; only the last one's end is consulted.
    let busy = tasks(&[(2, (10, 0), (21, 0), "long"), (2, (11, 0), (12, 0), "short")]);

    let recorded = free_windows_on(&busy, window(), day(2), GapPolicy::AsRecorded);
    assert_eq!(
        spans(&recorded),
        vec![(at(2, 9, 0), at(2, 10, 0)), (at(2, 12, 0), at(2, 22, 0))]
    );

    let merged = free_windows_on(&busy, window(), day(2), GapPolicy::MergeOverlaps);
    assert_eq!(
        spans(&merged),
        vec![(at(2, 9, 0), at(2, 10, 0)), (at(2, 21, 0), at(2, 22, 0))]
    );
}

#[test]
fn tasks_outside_active_hours_are_clipped_only_when_merging() {
    let busy = tasks(&[(2, (7, 0), (8, 0), "gym")]);

    let recorded = free_windows_on(&busy, window(), day(2), GapPolicy::AsRecorded);
    assert_eq!(spans(&recorded), vec![(at(2, 8, 0), at(2, 22, 0))]);

    let merged = free_windows_on(&busy, window(), day(2), GapPolicy::MergeOverlaps);
    assert_eq!(spans(&merged), vec![(at(2, 9, 0), at(2, 22, 0))]);
}

// ── Horizon ─────────────────────────────────────────────────────────────────

#[test]
fn horizon_emits_days_in_order() {
    let busy = tasks(&[(3, (10, 0), (11, 0), "A")]);

    let free = compute_free_windows(&busy, window(), day(2), 3, GapPolicy::AsRecorded);

    assert_eq!(
        spans(&free),
        vec![
            (at(2, 9, 0), at(2, 22, 0)),
            (at(3, 9, 0), at(3, 10, 0)),
            (at(3, 11, 0), at(3, 22, 0)),
            (at(4, 9, 0), at(4, 22, 0)),
        ]
    );
}

#[test]
fn tasks_outside_horizon_are_ignored() {
    let busy = tasks(&[(1, (10, 0), (11, 0), "before"), (9, (10, 0), (11, 0), "after")]);
    let free = compute_free_windows(&busy, window(), day(2), 2, GapPolicy::AsRecorded);
    assert_eq!(
        spans(&free),
        vec![(at(2, 9, 0), at(2, 22, 0)), (at(3, 9, 0), at(3, 22, 0))]
    );
}

#[test]
fn task_crossing_midnight_counts_only_on_its_start_day() {
    let mut store = TaskStore::new(MemoryStorage::new());
    store
        .add_task(TaskDraft::new(at(2, 21, 0), at(3, 10, 0), "night shift"))
        .unwrap();

    let free = compute_free_windows(store.tasks(), window(), day(2), 2, GapPolicy::AsRecorded);

    assert_eq!(
        spans(&free),
        vec![
            (at(2, 9, 0), at(2, 21, 0)),
            (at(3, 9, 0), at(3, 22, 0)),
        ]
    );
}

#[test]
fn zero_days_is_empty() {
    let free = compute_free_windows(&[], window(), day(2), 0, GapPolicy::AsRecorded);
    assert!(free.is_empty());
}

#[test]
fn default_horizon_is_two_weeks() {
    let free = compute_free_windows(
        &[],
        window(),
        day(2),
        planner_engine::DEFAULT_HORIZON_DAYS,
        GapPolicy::AsRecorded,
    );
    assert_eq!(free.len(), 14);
    assert_eq!(free[13].date(), day(15));
}
