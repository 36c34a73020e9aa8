use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use directories::ProjectDirs;
use flexi_logger::{FileSpec, Logger, LoggerHandle};
use log::{debug, info};
use structopt::StructOpt;

mod cli;
mod command;
mod interface;
mod model;
mod storage;

use cli::CommandLineArgs;
use command::Command;
use model::TaskList;

fn find_default_store_file() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("com", "tasko", "tasko")?;
    let root_dir = dirs.data_dir();
    if !root_dir.exists() {
        std::fs::create_dir_all(root_dir).ok()?;
    }
    Some(root_dir.join("tasks.txt"))
}

/// Log to a file next to the store so the conversation on stdout stays
/// clean. The handle must stay alive for the lifetime of the program.
fn init_logging(store_file: &Path) -> anyhow::Result<LoggerHandle> {
    let log_dir = store_file.parent().unwrap_or_else(|| Path::new("."));
    let handle = Logger::try_with_env_or_str("info")?
        .log_to_file(FileSpec::default().directory(log_dir).basename("tasko"))
        .append()
        .start()?;
    Ok(handle)
}

fn main() -> anyhow::Result<()> {
    // Get the command-line arguments.
    let CommandLineArgs { store_file } = CommandLineArgs::from_args();

    // Unpack the store file.
    let store_file = store_file
        .or_else(find_default_store_file)
        .ok_or_else(|| anyhow!("Failed to find a store file."))?;

    let _logger = init_logging(&store_file)?;

    let mut tasks = storage::load(&store_file)?;
    info!(
        "loaded {} task(s) from {}",
        tasks.len(),
        store_file.display()
    );

    println!("{}", interface::greeting());
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "bye" {
            break;
        }
        println!("{}", dispatch(&mut tasks, &store_file, line)?);
    }
    println!("{}", interface::farewell());
    Ok(())
}

/// Route one line of input to the matching operation, persisting after
/// mutations. User-input errors come back as framed messages and never end
/// the session.
fn dispatch(tasks: &mut TaskList, store_file: &Path, line: &str) -> anyhow::Result<String> {
    debug!("command: {}", line);
    let output = match command::parse(line) {
        Err(error) => interface::error(&error),
        Ok(Command::List) => interface::list(tasks),
        Ok(Command::Find(needle)) => interface::found(tasks, &needle),
        Ok(Command::DueBy(date)) => interface::due_by(tasks, date),
        Ok(Command::DueBefore(date, bound)) => interface::due_before(tasks, date, bound),
        Ok(Command::Add(task)) => {
            let output = interface::added(tasks, task);
            storage::save(store_file, tasks)?;
            output
        }
        Ok(Command::Done(position)) => {
            let output = interface::done(tasks, position);
            storage::save(store_file, tasks)?;
            output
        }
        Ok(Command::Delete(position)) => {
            let output = interface::deleted(tasks, position);
            storage::save(store_file, tasks)?;
            output
        }
    };
    Ok(output)
}
