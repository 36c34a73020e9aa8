use chrono::{NaiveDate, NaiveTime};

use crate::model;
use model::{fmt_date, fmt_time, DoneOutcome, Task, TaskList, TrackerError};

/// Divider framing every block the tracker prints.
pub const DIVIDER: &str = "____________________________________________________________";
const INDENT: &str = "   ";

fn frame(body: &str) -> String {
    format!("{}\n{}\n{}", DIVIDER, body, DIVIDER)
}

pub fn greeting() -> String {
    frame("Hello! I'm Tasko.\nWhat can I do for you?")
}

pub fn farewell() -> String {
    frame("Bye! See you again soon.")
}

pub fn error(error: &TrackerError) -> String {
    frame(&error.to_string())
}

/// Render the whole list with display numbers, or the friendly empty-list
/// message.
pub fn list(tasks: &TaskList) -> String {
    match tasks.list() {
        Err(empty) => error(&empty),
        Ok(all) => {
            let mut body = String::from("Here are the task(s) in your list:");
            for (index, task) in all.iter().enumerate() {
                body.push_str(&format!("\n{}.{}", index + 1, task));
            }
            frame(&body)
        }
    }
}

/// Append the task and confirm with its rendered form and the new total.
pub fn added(tasks: &mut TaskList, task: Task) -> String {
    let rendered = task.to_string();
    tasks.add(task);
    frame(&format!(
        "Got it. I've added this task:\n{}{}\nNow you have {} task(s) in the list.",
        INDENT,
        rendered,
        tasks.len()
    ))
}

pub fn done(tasks: &mut TaskList, position: usize) -> String {
    match tasks.mark_done(position) {
        Err(invalid) => error(&invalid),
        Ok(DoneOutcome::AlreadyDone(_)) => frame("Task already done!"),
        Ok(DoneOutcome::Marked(task)) => frame(&format!(
            "Good job! I've marked this task as done:\n{}{}",
            INDENT, task
        )),
    }
}

pub fn deleted(tasks: &mut TaskList, position: usize) -> String {
    match tasks.delete(position) {
        Err(invalid) => error(&invalid),
        Ok(task) => frame(&format!(
            "Noted. I've removed this task:\n{}{}\nNow you have {} task(s) in the list.",
            INDENT,
            task,
            tasks.len()
        )),
    }
}

pub fn due_by(tasks: &TaskList, date: NaiveDate) -> String {
    let matches = tasks.due_by(date);
    let mut body = format!("Task(s) due by {}:", fmt_date(date));
    if matches.is_empty() {
        body.push_str(&format!("\n- No tasks due on {} -", fmt_date(date)));
    } else {
        for task in matches {
            body.push_str(&format!("\n{}", task));
        }
    }
    frame(&body)
}

pub fn due_before(tasks: &TaskList, date: NaiveDate, bound: Option<NaiveTime>) -> String {
    let when = match bound {
        Some(time) => format!("{}, {}", fmt_date(date), fmt_time(time)),
        None => fmt_date(date),
    };
    let matches = tasks.due_before(date, bound);
    let mut body = format!("Task(s) due before {}:", when);
    if matches.is_empty() {
        body.push_str(&format!("\n- No tasks due before {} -", when));
    } else {
        for task in matches {
            body.push_str(&format!("\n{}", task));
        }
    }
    frame(&body)
}

pub fn found(tasks: &TaskList, needle: &str) -> String {
    let matches = tasks.find(needle);
    let mut body = String::from("Here are the matching tasks in your list:");
    if matches.is_empty() {
        body.push_str("\n- No results found -");
    } else {
        for (number, task) in matches {
            body.push_str(&format!("\n{}.{}", number, task));
        }
    }
    frame(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(day: u32, month: u32, year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn blocks_are_framed_by_dividers() {
        let tasks = TaskList::new();
        let block = list(&tasks);
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines.first(), Some(&DIVIDER));
        assert_eq!(lines.last(), Some(&DIVIDER));
    }

    #[test]
    fn empty_list_prints_the_friendly_message() {
        let tasks = TaskList::new();
        assert!(list(&tasks).contains("List is empty, you have free time (for now)! YAY :D"));
    }

    #[test]
    fn adding_confirms_with_render_and_count() {
        let mut tasks = TaskList::new();
        let block = added(&mut tasks, Task::todo("read book"));
        assert!(block.contains("Got it. I've added this task:"));
        assert!(block.contains("   [T][✗] read book"));
        assert!(block.contains("Now you have 1 task(s) in the list."));
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn listing_numbers_tasks_from_one() {
        let mut tasks = TaskList::new();
        tasks.add(Task::todo("read book"));
        tasks.add(Task::todo("return book"));
        let block = list(&tasks);
        assert!(block.contains("\n1.[T][✗] read book"));
        assert!(block.contains("\n2.[T][✗] return book"));
    }

    #[test]
    fn marking_done_twice_reports_the_noop() {
        let mut tasks = TaskList::new();
        tasks.add(Task::todo("read book"));
        assert!(done(&mut tasks, 1).contains("Good job! I've marked this task as done:"));
        assert!(done(&mut tasks, 1).contains("Task already done!"));
    }

    #[test]
    fn invalid_positions_report_without_mutating() {
        let mut tasks = TaskList::new();
        tasks.add(Task::todo("read book"));
        let block = deleted(&mut tasks, 7);
        assert!(block.contains("Sorry, you did not enter a valid task number."));
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn deleting_confirms_with_the_removed_task() {
        let mut tasks = TaskList::new();
        tasks.add(Task::todo("read book"));
        let block = deleted(&mut tasks, 1);
        assert!(block.contains("Noted. I've removed this task:"));
        assert!(block.contains("   [T][✗] read book"));
        assert!(block.contains("Now you have 0 task(s) in the list."));
    }

    #[test]
    fn queries_report_zero_matches_as_text_not_errors() {
        let tasks = TaskList::new();
        assert!(due_by(&tasks, date(2, 9, 2024)).contains("- No tasks due on 2 Sep 2024 -"));
        assert!(
            due_before(&tasks, date(2, 9, 2024), None)
                .contains("- No tasks due before 2 Sep 2024 -")
        );
        assert!(found(&tasks, "book").contains("- No results found -"));
    }

    #[test]
    fn due_query_headers_echo_the_parsed_schedule() {
        let tasks = TaskList::new();
        let bound = chrono::NaiveTime::from_hms_opt(18, 0, 0).unwrap();
        let block = due_before(&tasks, date(2, 9, 2024), Some(bound));
        assert!(block.contains("Task(s) due before 2 Sep 2024, 6:00pm:"));
    }
}
