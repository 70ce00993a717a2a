use crate::presentation;
use crate::types::OutputFormat;
use agmerge_runtime::{MergeOptions, MergeOutcome, MergeService};
use anyhow::Result;
use is_terminal::IsTerminal;
use std::path::Path;

pub fn handle(dir: &Path, options: MergeOptions, format: OutputFormat) -> Result<()> {
    let service = MergeService::new(options);
    let outcome = service.merge_directory(dir)?;

    if let MergeOutcome::Merged(report) = &outcome {
        tracing::debug!("{}", presentation::describe_report(report));
    }

    match format {
        OutputFormat::Json => println!("{}", presentation::render_json(&outcome)?),
        OutputFormat::Plain => {
            let use_color = std::io::stdout().is_terminal();
            println!("{}", presentation::render_plain(&outcome, use_color));
        }
    }

    Ok(())
}
