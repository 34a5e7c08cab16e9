//! castbind command-line entry point.

mod cli;

use std::fs;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;

use castbind_core::config::ConfigManager;
use castbind_core::logging::{self, LogConfig, LogLevel, RunLoggerBuilder};
use castbind_core::media::FfmpegCli;
use castbind_core::orchestrator::{self, Context};

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let command = cli.command;
    let common = command.common().clone();
    let kind = command.kind();

    let config_path = common.config_path();
    let mut manager = ConfigManager::new(&config_path);
    manager
        .load_or_create()
        .with_context(|| format!("loading config {}", config_path.display()))?;
    let mut settings = manager.into_settings();
    command.apply(&mut settings);

    let logs_dir = common.dir.join(&settings.paths.logs_folder);
    fs::create_dir_all(&logs_dir)
        .with_context(|| format!("creating log directory {}", logs_dir.display()))?;

    let level = if common.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    let _guard = logging::init_tracing_with_file(level, &logs_dir);
    tracing::debug!("castbind {} ({})", castbind_core::version(), kind);

    let run_name = format!("{}-{}", kind, chrono::Local::now().format("%Y%m%d-%H%M%S"));
    let mut log_config = LogConfig::from_settings(&settings.logging);
    log_config.level = level;

    let logger = RunLoggerBuilder::new(&run_name, &logs_dir)
        .config(log_config)
        .console(Box::new(|line| println!("{}", line)))
        .build()
        .context("creating run log")?;

    let media = FfmpegCli::new()
        .with_ffmpeg_path(&settings.tools.ffmpeg)
        .with_ffprobe_path(&settings.tools.ffprobe)
        .with_error_tail(settings.logging.error_tail as usize);

    let mut ctx = Context::new(
        kind,
        settings,
        run_name,
        &common.dir,
        Arc::new(logger),
        Arc::new(media),
    );
    if let Some(output) = common.output {
        ctx = ctx.with_output_path(output);
    }
    if let Some(base_date) = command.base_date() {
        ctx = ctx.with_base_date(base_date);
    }

    let state = orchestrator::run(&ctx).with_context(|| format!("{} run failed", kind))?;

    if let Some(path) = state.output_path() {
        tracing::info!("Wrote {}", path.display());
    }
    Ok(())
}
