use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tinker_core::{FileOutputChannel, OutputChannel};

use crate::config::TinkerConfig;

#[derive(Args)]
pub struct LogArgs {
    #[command(subcommand)]
    pub command: LogCommands,
}

#[derive(Subcommand)]
pub enum LogCommands {
    /// Print the output log path
    Path,
    /// Print the output log
    Show,
    /// Empty the output log
    Clear,
}

pub fn run(args: LogArgs, config: &TinkerConfig) -> Result<()> {
    let path = config.log.output_path();

    match args.command {
        LogCommands::Path => println!("{}", path.display()),
        LogCommands::Show => match std::fs::read_to_string(&path) {
            Ok(contents) => print!("{contents}"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        },
        LogCommands::Clear => {
            let channel = FileOutputChannel::open(&path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            channel.clear();
            channel.dispose();
            println!("Cleared {}", path.display());
        }
    }
    Ok(())
}
