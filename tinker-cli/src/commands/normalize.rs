use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tinker_core::{TextDocument, minify_php, retrieve_content};

use super::read_source;
use super::run::LineRange;

#[derive(Args)]
pub struct NormalizeArgs {
    /// PHP file to normalize (stdin when omitted or `-`)
    pub file: Option<PathBuf>,

    /// Normalize only these lines, 1-based and inclusive (e.g. 3:7)
    #[arg(long, value_name = "A:B")]
    pub lines: Option<LineRange>,
}

pub fn run(args: NormalizeArgs) -> Result<()> {
    let mut document = TextDocument::new(read_source(args.file.as_deref())?);
    if let Some(lines) = args.lines {
        document = document.with_line_selection(lines.first, lines.last);
    }

    match retrieve_content(Some(&document)) {
        Some(code) => println!("{}", minify_php(&code)),
        None => anyhow::bail!("No code to run."),
    }
    Ok(())
}
