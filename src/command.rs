use chrono::{NaiveDate, NaiveTime};

use crate::model::{self, Task, TrackerError};

/// Every action a line of user input can request.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    List,
    Done(usize),
    Delete(usize),
    Add(Task),
    DueBy(NaiveDate),
    DueBefore(NaiveDate, Option<NaiveTime>),
    Find(String),
}

/// Classify a line by its leading keyword and parse the arguments.
/// Keywords are case-sensitive; anything unrecognized is an
/// `UnknownCommand`.
pub fn parse(line: &str) -> Result<Command, TrackerError> {
    if line == "list" {
        return Ok(Command::List);
    }
    if let Some(rest) = keyword(line, "done") {
        return Ok(Command::Done(parse_position(rest)?));
    }
    if let Some(rest) = keyword(line, "delete") {
        return Ok(Command::Delete(parse_position(rest)?));
    }
    if let Some(rest) = keyword(line, "todo") {
        return Ok(Command::Add(parse_todo(rest)?));
    }
    if let Some(rest) = keyword(line, "deadline") {
        return Ok(Command::Add(parse_deadline(rest)?));
    }
    if let Some(rest) = keyword(line, "event") {
        return Ok(Command::Add(parse_event(rest)?));
    }
    if let Some(rest) = keyword(line, "items due by") {
        return Ok(Command::DueBy(model::parse_date(rest.trim())?));
    }
    if let Some(rest) = keyword(line, "items due before") {
        // same clause shape as a deadline schedule: date, optional time
        let (date, bound) = model::parse_deadline_schedule(rest)?;
        return Ok(Command::DueBefore(date, bound));
    }
    if let Some(rest) = keyword(line, "find") {
        if rest.trim().is_empty() {
            return Err(TrackerError::MissingQuery);
        }
        return Ok(Command::Find(rest.to_string()));
    }
    Err(TrackerError::UnknownCommand)
}

// Match a leading keyword and return the remainder after it and one
// separating space. A bare keyword yields an empty remainder; a longer
// word that merely starts with the keyword does not match.
fn keyword<'a>(line: &'a str, word: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(word)?;
    if rest.is_empty() {
        return Some("");
    }
    rest.strip_prefix(' ')
}

fn parse_position(rest: &str) -> Result<usize, TrackerError> {
    rest.trim()
        .parse::<usize>()
        .map_err(|_| TrackerError::InvalidIndex)
}

fn parse_todo(rest: &str) -> Result<Task, TrackerError> {
    let description = rest.trim();
    if description.is_empty() {
        return Err(TrackerError::MissingDescription("todo"));
    }
    Ok(Task::todo(description))
}

fn parse_deadline(rest: &str) -> Result<Task, TrackerError> {
    let (description, clause) = split_at_schedule(rest, "deadline")?;
    let (date, time) = model::parse_deadline_schedule(clause)?;
    Ok(Task::deadline(description, date, time))
}

fn parse_event(rest: &str) -> Result<Task, TrackerError> {
    let (description, clause) = split_at_schedule(rest, "event")?;
    let (date, times) = model::parse_event_schedule(clause)?;
    Ok(Task::event(description, date, times))
}

// Split `description /clause` at the first `/`. The date inside the clause
// may itself contain slashes, which is why only the first one separates.
fn split_at_schedule<'a>(
    rest: &'a str,
    kind: &'static str,
) -> Result<(&'a str, &'a str), TrackerError> {
    let (description, clause) = rest
        .split_once('/')
        .ok_or(TrackerError::MissingSchedule(kind))?;
    let description = description.trim();
    if description.is_empty() {
        return Err(TrackerError::MissingDescription(kind));
    }
    Ok((description, clause))
}
