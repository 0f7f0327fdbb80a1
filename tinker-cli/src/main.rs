use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod host;
mod logging;
mod terminal;

#[derive(Parser)]
#[command(name = "tinker", about = "Run PHP snippets in a Laravel Tinker session")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a file (or some of its lines) in Tinker and attach to the session
    Run(commands::run::RunArgs),
    /// Print code the way it is sent to Tinker
    Normalize(commands::normalize::NormalizeArgs),
    /// Print the Laravel project root
    Locate(commands::locate::LocateArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Inspect the output log
    Log(commands::log::LogArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose, &tinker_paths::trace_log_path());
    let config = config::ConfigLoader::load()?;

    match cli.command {
        Commands::Run(args) => commands::run::run(args, &config).await,
        Commands::Normalize(args) => commands::normalize::run(args),
        Commands::Locate(args) => commands::locate::run(args, &config).await,
        Commands::Config(args) => commands::config::run(args, &config),
        Commands::Log(args) => commands::log::run(args, &config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::PathBuf;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_accepts_lines_and_workspaces() {
        let cli = Cli::try_parse_from([
            "tinker", "run", "snippet.php", "--lines", "2:4", "-w", "/a", "-w", "/b",
        ])
        .unwrap();

        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.file, Some(PathBuf::from("snippet.php")));
        let lines = args.lines.unwrap();
        assert_eq!((lines.first, lines.last), (2, 4));
        assert_eq!(args.workspaces, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert!(!args.detach);
    }

    #[test]
    fn run_rejects_bad_line_range() {
        assert!(Cli::try_parse_from(["tinker", "run", "--lines", "9:1"]).is_err());
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["tinker", "log", "path", "-v"]).unwrap();
        assert!(cli.verbose);
    }
}
