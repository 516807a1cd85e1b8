use agenda::cli::{self, CliArgs, Repl};
use agenda::config::Config;
use agenda::context::{AppContext, StandardContext};
use agenda::controller::TaskController;
use agenda::storage::LocalStorage;
use anyhow::{Context, Result};
use simplelog::{ConfigBuilder, WriteLogger};
use std::env;
use std::fs::OpenOptions;
use std::io;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let binary_name = args.first().map(String::as_str).unwrap_or("agenda");
    let opts = CliArgs::parse(args.get(1..).unwrap_or_default())?;

    if opts.help {
        cli::print_help(binary_name);
        return Ok(());
    }

    let ctx = StandardContext::new(opts.root.clone());
    let config = Config::load_or_init(&ctx)?;
    init_logging(&ctx, &config)?;

    let tasks_path = match opts.file {
        Some(path) => path,
        None => config.tasks_path(&ctx)?,
    };
    log::info!("Starting with task file {:?}", tasks_path);

    let controller = TaskController::new(LocalStorage::new(tasks_path));
    let stdin = io::stdin();
    let mut repl =
        Repl::new(stdin.lock(), io::stdout(), controller).confirm_delete(config.confirm_delete);
    repl.run()
}

/// Logs go to a file so they never mix with the interactive output.
fn init_logging(ctx: &dyn AppContext, config: &Config) -> Result<()> {
    let path = ctx.get_log_path()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;
    WriteLogger::init(
        config.log_level.to_level_filter(),
        ConfigBuilder::new().build(),
        file,
    )
    .context("Failed to initialise logging")?;
    Ok(())
}
