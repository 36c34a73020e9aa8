use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

/// Command-boundary failures. Every variant carries the exact message the
/// interface prints back to the user; none of them terminates the program.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("List is empty, you have free time (for now)! YAY :D")]
    EmptyList,
    #[error("Sorry, you did not enter a valid task number. Please try again.")]
    InvalidIndex,
    #[error("Whoops, you did not fill in the description of the {0} properly. Please try again.")]
    MissingDescription(&'static str),
    #[error("Whoops, you did not fill in the schedule of the {0} properly. Please try again.")]
    MissingSchedule(&'static str),
    #[error("Sorry, you did not enter a valid date (D/M/YYYY) and/or time (HHmm). Please try again.")]
    InvalidDateTime,
    #[error("Sorry, you did not enter a search. Please try again.")]
    MissingQuery,
    #[error("Sorry, you did not enter a valid command! Please try again.")]
    UnknownCommand,
}

/// Failures while reconstructing a task from a stored line. These are fatal
/// to the load, not recoverable command errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("line does not start with a `[tag][marker] ` header")]
    BadHeader,
    #[error("unknown type tag `{0}`")]
    UnknownTag(char),
    #[error("missing description")]
    MissingDescription,
    #[error("missing `(...)` schedule clause")]
    MissingClause,
    #[error("unparseable schedule clause `{0}`")]
    BadClause(String),
}

/// The three task shapes. Closed set: a new variant forces every render and
/// query match in this file to handle it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    Todo,
    Deadline {
        date: NaiveDate,
        time: Option<NaiveTime>,
    },
    Event {
        date: NaiveDate,
        start: Option<NaiveTime>,
        end: Option<NaiveTime>,
    },
}

/// A single task. Display numbers are not stored here; a task's number is
/// its current 1-based position in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub description: String,
    pub done: bool,
    pub kind: TaskKind,
}

impl Task {
    pub fn todo(description: impl Into<String>) -> Task {
        Task {
            description: description.into(),
            done: false,
            kind: TaskKind::Todo,
        }
    }

    pub fn deadline(
        description: impl Into<String>,
        date: NaiveDate,
        time: Option<NaiveTime>,
    ) -> Task {
        Task {
            description: description.into(),
            done: false,
            kind: TaskKind::Deadline { date, time },
        }
    }

    pub fn event(
        description: impl Into<String>,
        date: NaiveDate,
        times: Option<(NaiveTime, NaiveTime)>,
    ) -> Task {
        let (start, end) = match times {
            Some((start, end)) => (Some(start), Some(end)),
            None => (None, None),
        };
        Task {
            description: description.into(),
            done: false,
            kind: TaskKind::Event { date, start, end },
        }
    }

    /// Sets the done flag unconditionally; the list decides whether marking
    /// an already-done task deserves its own message.
    pub fn mark_done(&mut self) {
        self.done = true;
    }
}

const DATE_INPUT_FORMAT: &str = "%d/%m/%Y";
const DATE_DISPLAY_FORMAT: &str = "%-d %b %Y";
const TIME_INPUT_FORMAT: &str = "%H%M";
const TIME_DISPLAY_FORMAT: &str = "%-I:%M%P";

/// Render a date in the fixed display pattern, e.g. `2 Sep 2024`.
pub fn fmt_date(date: NaiveDate) -> String {
    date.format(DATE_DISPLAY_FORMAT).to_string()
}

/// Render a time on the 12-hour clock, e.g. `6:00pm`.
pub fn fmt_time(time: NaiveTime) -> String {
    time.format(TIME_DISPLAY_FORMAT).to_string()
}

/// Parse a date in the command form (`2/9/2024`) or the rendered form
/// (`2 Sep 2024`). The command form wins when both could apply.
pub fn parse_date(text: &str) -> Result<NaiveDate, TrackerError> {
    NaiveDate::parse_from_str(text, DATE_INPUT_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(text, DATE_DISPLAY_FORMAT))
        .map_err(|_| TrackerError::InvalidDateTime)
}

/// Parse a time in the command form (`1800`) or the rendered form
/// (`6:00pm`).
pub fn parse_time(text: &str) -> Result<NaiveTime, TrackerError> {
    NaiveTime::parse_from_str(text, TIME_INPUT_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(text, TIME_DISPLAY_FORMAT))
        .map_err(|_| TrackerError::InvalidDateTime)
}

/// Split a deadline clause into date and optional time. Accepts both the
/// command form (`2/9/2024 1800`) and the rendered form
/// (`2 Sep 2024, 6:00pm`); a bare date is valid in either form.
pub fn parse_deadline_schedule(
    clause: &str,
) -> Result<(NaiveDate, Option<NaiveTime>), TrackerError> {
    let clause = clause.trim();
    if let Ok(date) = parse_date(clause) {
        return Ok((date, None));
    }
    let (date_part, time_part) = split_schedule(clause)?;
    Ok((parse_date(date_part)?, Some(parse_time(time_part)?)))
}

/// Same shape as the deadline clause, with the time field being a
/// `start-end` range.
pub fn parse_event_schedule(
    clause: &str,
) -> Result<(NaiveDate, Option<(NaiveTime, NaiveTime)>), TrackerError> {
    let clause = clause.trim();
    if let Ok(date) = parse_date(clause) {
        return Ok((date, None));
    }
    let (date_part, range_part) = split_schedule(clause)?;
    let (start, end) = range_part
        .split_once('-')
        .ok_or(TrackerError::InvalidDateTime)?;
    Ok((
        parse_date(date_part)?,
        Some((parse_time(start)?, parse_time(end)?)),
    ))
}

// The rendered form separates date and time with ", "; the command form
// with a single space. The rendered date itself contains spaces, so split
// from the right.
fn split_schedule(clause: &str) -> Result<(&str, &str), TrackerError> {
    if let Some(parts) = clause.rsplit_once(", ") {
        return Ok(parts);
    }
    clause.rsplit_once(' ').ok_or(TrackerError::InvalidDateTime)
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            TaskKind::Todo => 'T',
            TaskKind::Deadline { .. } => 'D',
            TaskKind::Event { .. } => 'E',
        };
        let marker = if self.done { '✓' } else { '✗' };
        write!(f, "[{}][{}] {}", tag, marker, self.description)?;
        match &self.kind {
            TaskKind::Todo => Ok(()),
            TaskKind::Deadline { date, time } => {
                write!(f, " (by: {}", fmt_date(*date))?;
                if let Some(time) = time {
                    write!(f, ", {}", fmt_time(*time))?;
                }
                write!(f, ")")
            }
            TaskKind::Event { date, start, end } => {
                write!(f, " (at: {}", fmt_date(*date))?;
                if let (Some(start), Some(end)) = (start, end) {
                    write!(f, ", {}-{}", fmt_time(*start), fmt_time(*end))?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Reconstruct a task from one line of the store file. The layout is the
/// same text `Display` produces: type tag at character 2, done marker at
/// character 5 (characters, not bytes: the marker is multi-byte UTF-8),
/// then the description and, for deadlines and events, the parenthesized
/// schedule clause.
pub fn decode(line: &str) -> Result<Task, DecodeError> {
    let chars: Vec<char> = line.chars().collect();
    if chars.len() < 8
        || chars[0] != '['
        || chars[2] != ']'
        || chars[3] != '['
        || chars[5] != ']'
        || chars[6] != ' '
    {
        return Err(DecodeError::BadHeader);
    }
    let done = chars[4] == '✓';
    let rest: String = chars[7..].iter().collect();

    let mut task = match chars[1] {
        'T' => Task::todo(rest),
        'D' => {
            let (description, clause) = split_clause(&rest)?;
            let clause = clause.strip_prefix("by: ").unwrap_or(clause);
            let (date, time) = parse_deadline_schedule(clause)
                .map_err(|_| DecodeError::BadClause(clause.to_string()))?;
            Task::deadline(description, date, time)
        }
        'E' => {
            let (description, clause) = split_clause(&rest)?;
            let clause = clause.strip_prefix("at: ").unwrap_or(clause);
            let (date, times) = parse_event_schedule(clause)
                .map_err(|_| DecodeError::BadClause(clause.to_string()))?;
            Task::event(description, date, times)
        }
        other => return Err(DecodeError::UnknownTag(other)),
    };
    if done {
        task.mark_done();
    }
    Ok(task)
}

// Split `description (clause)` at the first `(`; the clause must close the
// line.
fn split_clause(rest: &str) -> Result<(&str, &str), DecodeError> {
    let open = rest.find('(').ok_or(DecodeError::MissingClause)?;
    let description = rest[..open].trim_end();
    if description.is_empty() {
        return Err(DecodeError::MissingDescription);
    }
    let clause = rest[open + 1..]
        .strip_suffix(')')
        .ok_or(DecodeError::MissingClause)?;
    Ok((description, clause))
}

/// Outcome of a mark-done request. Marking twice is a no-op the caller
/// reports with its own message.
#[derive(Debug)]
pub enum DoneOutcome<'a> {
    Marked(&'a Task),
    AlreadyDone(&'a Task),
}

/// The ordered in-memory task store. Display numbers are derived from
/// storage order, so deletion renumbers the tail by construction.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> TaskList {
        TaskList::default()
    }

    pub fn add(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// All tasks in order. An empty store is an error the caller renders as
    /// a friendly message rather than an empty listing.
    pub fn list(&self) -> Result<&[Task], TrackerError> {
        if self.tasks.is_empty() {
            return Err(TrackerError::EmptyList);
        }
        Ok(&self.tasks)
    }

    /// Flip the done flag of the task at the given 1-based position.
    pub fn mark_done(&mut self, position: usize) -> Result<DoneOutcome<'_>, TrackerError> {
        let task = self.task_at_mut(position)?;
        if task.done {
            return Ok(DoneOutcome::AlreadyDone(task));
        }
        task.mark_done();
        Ok(DoneOutcome::Marked(task))
    }

    /// Remove the task at the given 1-based position and return it for the
    /// confirmation message. Every task behind it shifts one position left.
    pub fn delete(&mut self, position: usize) -> Result<Task, TrackerError> {
        if position == 0 || position > self.tasks.len() {
            return Err(TrackerError::InvalidIndex);
        }
        Ok(self.tasks.remove(position - 1))
    }

    /// Deadlines due and events held exactly on the given date.
    pub fn due_by(&self, date: NaiveDate) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| match task.kind {
                TaskKind::Deadline { date: due, .. } => due == date,
                TaskKind::Event { date: at, .. } => at == date,
                TaskKind::Todo => false,
            })
            .collect()
    }

    /// Deadlines and events dated on or before the given date. With a time
    /// bound, only tasks that carry the relevant time field (due time for
    /// deadlines, end time for events) not after the bound qualify; a task
    /// without that field is excluded even when its date matches.
    pub fn due_before(&self, date: NaiveDate, bound: Option<NaiveTime>) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| {
                let (task_date, task_time) = match task.kind {
                    TaskKind::Deadline { date, time } => (date, time),
                    TaskKind::Event { date, end, .. } => (date, end),
                    TaskKind::Todo => return false,
                };
                if task_date > date {
                    return false;
                }
                match bound {
                    None => true,
                    Some(bound) => matches!(task_time, Some(time) if time <= bound),
                }
            })
            .collect()
    }

    /// Case-sensitive literal substring search over descriptions, paired
    /// with each match's current display number.
    pub fn find(&self, needle: &str) -> Vec<(usize, &Task)> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.description.contains(needle))
            .map(|(index, task)| (index + 1, task))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn task_at_mut(&mut self, position: usize) -> Result<&mut Task, TrackerError> {
        if position == 0 {
            return Err(TrackerError::InvalidIndex);
        }
        self.tasks
            .get_mut(position - 1)
            .ok_or(TrackerError::InvalidIndex)
    }
}
