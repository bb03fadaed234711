//! The interactive five-choice menu.
//!
//! Reads from any `BufRead` and writes to any `Write` so the whole flow can be
//! driven from tests. End of input behaves like choosing "Exit".

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use planner_engine::{EngineError, Planner, Storage, TaskDraft};
use tracing::error;

use crate::input::{parse_date, parse_time};
use crate::presenter;

const MENU: &str = "\n=== Calendar Management System ===
1. Add Task
2. View Personal Calendar
3. View Available Time Windows
4. Delete Task
5. Exit
";

pub struct Menu<'p, S, R, W> {
    planner: &'p mut Planner<S>,
    today: NaiveDate,
    days: u32,
    input: R,
    out: W,
}

/// Whether the loop should keep going after a step.
enum Flow {
    Continue,
    Quit,
}

impl<'p, S: Storage, R: BufRead, W: Write> Menu<'p, S, R, W> {
    pub fn new(planner: &'p mut Planner<S>, today: NaiveDate, days: u32, input: R, out: W) -> Self {
        Self {
            planner,
            today,
            days,
            input,
            out,
        }
    }

    pub fn run(mut self) -> Result<()> {
        loop {
            write!(self.out, "{MENU}")?;
            let Some(choice) = self.prompt("\nPlease select an option (1-5): ")? else {
                break;
            };

            let flow = match choice.trim() {
                "1" => self.add()?,
                "2" => self.show_calendar()?,
                "3" => self.show_windows()?,
                "4" => self.delete()?,
                "5" => {
                    writeln!(self.out, "Thank you for using the system!")?;
                    Flow::Quit
                }
                _ => {
                    writeln!(self.out, "Invalid choice, please try again!")?;
                    Flow::Continue
                }
            };

            if let Flow::Quit = flow {
                break;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Print `message`, then read one line. `None` at end of input.
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.out, "{message}")?;
        self.out.flush()?;

        let mut line = String::new();
        let n = self
            .input
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn add(&mut self) -> Result<Flow> {
        let Some(date) = self.prompt("Enter the date (YYYY-MM-DD): ")? else {
            return Ok(Flow::Quit);
        };
        let Some(start) = self.prompt("Enter the start time (HH:MM): ")? else {
            return Ok(Flow::Quit);
        };
        let Some(end) = self.prompt("Enter the end time (HH:MM): ")? else {
            return Ok(Flow::Quit);
        };
        let Some(title) = self.prompt("Enter task name: ")? else {
            return Ok(Flow::Quit);
        };

        let parsed = parse_date(&date).and_then(|d| Ok((d, parse_time(&start)?, parse_time(&end)?)));
        let Ok((date, start, end)) = parsed else {
            writeln!(self.out, "Input format error, please try again!")?;
            return Ok(Flow::Continue);
        };

        match self.planner.add_task(TaskDraft::on(date, start, end, title)) {
            Ok(_) => writeln!(self.out, "Task added successfully!")?,
            Err(EngineError::InvalidRange { .. }) => {
                writeln!(self.out, "End time must be after start time, please try again!")?
            }
            Err(e) => {
                error!(error = %e, "failed to save calendar after adding a task");
                writeln!(self.out, "Task added, but the calendar could not be saved: {e}")?
            }
        }
        Ok(Flow::Continue)
    }

    fn show_calendar(&mut self) -> Result<Flow> {
        let agenda = self.planner.agenda(self.today, self.days);
        write!(self.out, "{}", presenter::calendar(&agenda))?;
        Ok(Flow::Continue)
    }

    fn show_windows(&mut self) -> Result<Flow> {
        let windows = self.planner.free_windows(self.today, self.days);
        write!(self.out, "{}", presenter::windows(&windows))?;
        Ok(Flow::Continue)
    }

    fn delete(&mut self) -> Result<Flow> {
        self.show_calendar()?;
        if !self.planner.has_tasks() {
            writeln!(self.out, "No tasks to delete!")?;
            return Ok(Flow::Continue);
        }

        let Some(date) = self.prompt("Enter the date of the task to delete (YYYY-MM-DD): ")? else {
            return Ok(Flow::Quit);
        };
        let Ok(date) = parse_date(&date) else {
            writeln!(self.out, "Invalid input format. Please try again!")?;
            return Ok(Flow::Continue);
        };
        if !self.planner.has_date(date) {
            writeln!(self.out, "No tasks found on this date!")?;
            return Ok(Flow::Continue);
        }

        let Some(index) = self.prompt("Enter the index of the task to delete: ")? else {
            return Ok(Flow::Quit);
        };
        let Ok(index) = index.trim().parse::<usize>() else {
            writeln!(self.out, "Invalid input format. Please try again!")?;
            return Ok(Flow::Continue);
        };

        match self.planner.delete_task(date, index) {
            Ok(Some(_)) => writeln!(self.out, "Task deleted successfully!")?,
            Ok(None) => writeln!(
                self.out,
                "Failed to delete task. Please check the index and try again."
            )?,
            Err(e) => {
                error!(error = %e, "failed to save calendar after deleting a task");
                writeln!(self.out, "Task deleted, but the calendar could not be saved: {e}")?
            }
        }
        Ok(Flow::Continue)
    }
}
