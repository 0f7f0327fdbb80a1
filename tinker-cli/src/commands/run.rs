use std::io::IsTerminal;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tinker_core::{Extension, FileOutputChannel, RUN_COMMAND, RunOutcome, TextDocument};

use super::{read_source, workspace_folders};
use crate::config::TinkerConfig;
use crate::host::TerminalHost;

/// How long to wait for the session to wind down after deactivation
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[derive(Args)]
pub struct RunArgs {
    /// PHP file to run (stdin when omitted or `-`)
    pub file: Option<PathBuf>,

    /// Run only these lines, 1-based and inclusive (e.g. 3:7)
    #[arg(long, value_name = "A:B")]
    pub lines: Option<LineRange>,

    /// Workspace folder to search for the Laravel project (repeatable)
    #[arg(short, long = "workspace", value_name = "DIR")]
    pub workspaces: Vec<PathBuf>,

    /// Don't attach the keyboard; stream output for a while, then exit
    #[arg(long)]
    pub detach: bool,

    /// Seconds to keep streaming output with --detach
    #[arg(long, default_value_t = 3, value_name = "SECS")]
    pub linger: u64,
}

/// An inclusive line range given as `A:B`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub first: usize,
    pub last: usize,
}

impl FromStr for LineRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (first, last) = match s.split_once(':') {
            Some((first, last)) => (first, last),
            None => (s, s),
        };
        let parse = |n: &str| {
            n.trim()
                .parse::<usize>()
                .map_err(|_| format!("invalid line number {n:?}"))
        };
        let (first, last) = (parse(first)?, parse(last)?);
        if first == 0 || last < first {
            return Err(format!("invalid line range {s:?}"));
        }
        Ok(Self { first, last })
    }
}

pub async fn run(args: RunArgs, config: &TinkerConfig) -> Result<()> {
    let source = read_source(args.file.as_deref())?;
    let mut document = TextDocument::new(source);
    if let Some(lines) = args.lines {
        document = document.with_line_selection(lines.first, lines.last);
    }

    let folders = workspace_folders(&args.workspaces, config)?;
    let interactive =
        !args.detach && std::io::stdin().is_terminal() && std::io::stdout().is_terminal();
    tracing::info!(folders = ?folders, interactive, "Starting tinker run");

    let log_path = config.log.output_path();
    let output = Arc::new(
        FileOutputChannel::open(&log_path)
            .with_context(|| format!("Failed to open output log {}", log_path.display()))?,
    );

    let host = Arc::new(TerminalHost::new(Some(document), folders, interactive));
    let extension = Extension::activate(host.clone(), output, config.bridge_config());

    let outcome = extension.execute(RUN_COMMAND).await;
    if !matches!(outcome, Ok(RunOutcome::Submitted)) {
        extension.deactivate();
        return outcome.map(|_| ()).map_err(Into::into);
    }

    if interactive {
        eprint!("Attached to Tinker. Press Ctrl+] to detach.\r\n");
        host.wait_closed().await;
    } else {
        tokio::time::sleep(Duration::from_secs(args.linger)).await;
    }

    extension.deactivate();
    if tokio::time::timeout(SHUTDOWN_GRACE, host.wait_closed())
        .await
        .is_err()
    {
        tracing::warn!("Session output did not end after deactivation");
    }
    Ok(())
}
