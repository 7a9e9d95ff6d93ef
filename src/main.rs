//! panda-config
//!
//! Resolves the service configuration the same way the service does at startup
//! and prints it, one accessor lookup, or the origin of each service address.

use anyhow::Result;
use clap::Parser;
use panda_config::cli::{Cli, Command, ShowArgs, render};
use panda_config::config::{ConfigLoader, ProcessEnv};
use panda_config::logging::{self, LogTarget};
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The subscriber level comes from the resolved `log.level`.
    let paths = cli.paths();
    let candidates = paths.candidates();
    let loader = ConfigLoader::load_with(paths, &ProcessEnv)?;

    let target: LogTarget = cli.log.parse()?;
    logging::init(&target, logging::level_for(cli.verbose, &loader.config().log))?;
    debug!(
        ?candidates,
        file = ?loader.config_path(),
        overrides = ?loader.applied_overrides(),
        "configuration resolved"
    );

    let output = match cli.command {
        None => render::show(&loader, &ShowArgs::default())?,
        Some(Command::Show(args)) => render::show(&loader, &args)?,
        Some(Command::Get(args)) => render::get(&loader.settings(), &args)?,
        Some(Command::Sources) => render::sources(&loader),
    };
    println!("{output}");

    Ok(())
}
