use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use pixie_batch::{
    BatchRunner, Cli, ConsoleReporter, ImageProcessor, Repl, SuperResolution,
};

fn main() -> anyhow::Result<()> {
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .init();

    let config = cli.process_config();
    config.validate().context("invalid configuration")?;

    let mut reporter = ConsoleReporter::new();

    match cli.command {
        None => {
            let super_resolution = SuperResolution::initialize(&config.model, &mut reporter);
            let runner = BatchRunner::new(ImageProcessor::new(config, super_resolution));
            Repl::new(runner)?.run()
        }
        Some(command) => {
            let (directory, action) = command.into_action();

            let super_resolution = action
                .super_resolution(&directory, &config.model, &mut reporter)
                .with_context(|| format!("cannot process {}", directory.display()))?;
            let runner = BatchRunner::new(ImageProcessor::new(config, super_resolution));

            action
                .execute(&runner, &directory, &mut reporter)
                .with_context(|| format!("cannot process {}", directory.display()))?;
            Ok(())
        }
    }
}
