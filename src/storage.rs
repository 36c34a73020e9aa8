use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

use crate::model::{self, TaskList};

/// Load the store file, or an empty list when it does not exist yet. A
/// malformed line fails the whole load; there is no safe way to keep the
/// rest of a corrupt store.
pub fn load(path: &Path) -> Result<TaskList> {
    if !path.exists() {
        debug!("no store file at {}, starting empty", path.display());
        return Ok(TaskList::new());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read store file {}.", path.display()))?;

    let mut tasks = TaskList::new();
    for (number, line) in contents.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let task = model::decode(line).with_context(|| {
            format!("Corrupt task on line {} of {}.", number + 1, path.display())
        })?;
        tasks.add(task);
    }
    Ok(tasks)
}

/// Write every task as one line of the same text the decoder reads back.
pub fn save(path: &Path, tasks: &TaskList) -> Result<()> {
    let mut contents = String::new();
    for task in tasks.iter() {
        contents.push_str(&task.to_string());
        contents.push('\n');
    }
    fs::write(path, contents)
        .with_context(|| format!("Failed to write store file {}.", path.display()))?;
    debug!("saved {} task(s) to {}", tasks.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Task;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn saving_then_loading_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.txt");

        let mut tasks = TaskList::new();
        tasks.add(Task::todo("read book"));
        tasks.add(Task::deadline(
            "return book",
            NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
            Some(NaiveTime::from_hms_opt(18, 0, 0).unwrap()),
        ));
        tasks.add(Task::event(
            "project meeting",
            NaiveDate::from_ymd_opt(2024, 9, 3).unwrap(),
            Some((
                NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            )),
        ));
        tasks.mark_done(1).unwrap();

        save(&path, &tasks).unwrap();
        assert_eq!(load(&path).unwrap(), tasks);
    }

    #[test]
    fn a_missing_store_file_is_an_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let tasks = load(&dir.path().join("nothing-here.txt")).unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn a_corrupt_line_fails_the_whole_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.txt");
        fs::write(&path, "[T][✓] read book\ngarbage\n").unwrap();

        let error = load(&path).unwrap_err();
        assert!(format!("{:#}", error).contains("line 2"));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.txt");
        fs::write(&path, "[T][✗] read book\n\n[T][✓] return book\n").unwrap();

        let tasks = load(&path).unwrap();
        assert_eq!(tasks.len(), 2);
    }
}
