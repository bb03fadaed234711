//! Text rendering of calendar rows and free windows as grid tables.

use planner_engine::{AgendaEntry, FreeInterval};
use unicode_width::UnicodeWidthStr;

const CALENDAR_HEADERS: [&str; 5] = ["Index", "Date", "Start Time", "End Time", "Task"];
const WINDOW_HEADERS: [&str; 3] = ["Date", "Start Time", "End Time"];

/// The personal calendar listing, or an empty-state line.
pub fn calendar(entries: &[AgendaEntry]) -> String {
    if entries.is_empty() {
        return "\nNo tasks scheduled.\n".to_string();
    }

    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            vec![
                e.index.to_string(),
                e.date.format("%Y-%m-%d").to_string(),
                e.task.start.format("%H:%M").to_string(),
                e.task.end.format("%H:%M").to_string(),
                e.task.title.clone(),
            ]
        })
        .collect();

    format!(
        "\n=== Personal Calendar ===\n{}",
        grid(&CALENDAR_HEADERS, &rows)
    )
}

/// The available time windows listing, or an empty-state line.
pub fn windows(windows: &[FreeInterval]) -> String {
    if windows.is_empty() {
        return "\nNo available time windows.\n".to_string();
    }

    let rows: Vec<Vec<String>> = windows
        .iter()
        .map(|w| {
            vec![
                w.start.format("%Y-%m-%d").to_string(),
                w.start.format("%H:%M").to_string(),
                w.end.format("%H:%M").to_string(),
            ]
        })
        .collect();

    format!(
        "\n=== Available Time Windows ===\n{}",
        grid(&WINDOW_HEADERS, &rows)
    )
}

/// Render a grid table: `+---+` rules between rows, `+===+` under the header.
///
/// Cells are left-aligned and padded by one space. Widths are terminal
/// columns, so double-width glyphs take two.
pub fn grid(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.width());
        }
    }

    let mut out = grid_rule(&widths, '-');
    out.push_str(&grid_line(&widths, headers.iter().copied()));
    out.push_str(&grid_rule(&widths, '='));
    for row in rows {
        out.push_str(&grid_line(&widths, row.iter().map(String::as_str)));
        out.push_str(&grid_rule(&widths, '-'));
    }
    out
}

fn grid_rule(widths: &[usize], fill: char) -> String {
    let mut line = String::from("+");
    for w in widths {
        line.extend(std::iter::repeat(fill).take(w + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

fn grid_line<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::from("|");
    for (w, cell) in widths.iter().zip(cells) {
        let pad = w - cell.width();
        line.push(' ');
        line.push_str(cell);
        line.extend(std::iter::repeat(' ').take(pad + 1));
        line.push('|');
    }
    line.push('\n');
    line
}
