use super::args::Cli;
use super::handlers;
use crate::logging;
use agmerge_runtime::{Config, MergeOptions};
use anyhow::Result;

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    let config = Config::load(cli.config.as_deref())?;
    let options = MergeOptions {
        other_events: cli
            .other_events
            .map(Into::into)
            .unwrap_or(config.merge.other_events),
        dry_run: cli.dry_run,
    };

    handlers::merge::handle(&cli.path, options, cli.format)
}
