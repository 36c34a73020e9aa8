use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "Tasko", about = "The minimalistic personal task tracker.")]
pub struct CommandLineArgs {
    /// Use a different store file.
    #[structopt(parse(from_os_str), short, long)]
    pub store_file: Option<PathBuf>,
}
