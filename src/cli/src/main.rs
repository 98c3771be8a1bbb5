//! Tutor CLI - record grades, homework and stamps from the terminal.
//!
//! Provides student, console, homework, stamp, log and configuration commands.

mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tutor_core::telemetry::init_telemetry;

use commands::{config, console, homework, logs, stamps, student, Context};
use output::OutputFormat;

/// Tutor - grading, homework and stamp ledger
#[derive(Parser)]
#[command(
    name = "tutor",
    version = "0.1.0",
    about = "Tutor - grading, homework and stamp ledger",
    long_about = "CLI tool for recording grading results, homework and stamps for students.",
    propagate_version = true
)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    output: OutputFormat,

    /// Directory holding the ledger collections
    #[arg(long, global = true, env = "TUTOR_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Settings file (defaults to ~/.tutor/tutor.toml)
    #[arg(long, global = true, env = "TUTOR_CONFIG")]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Student roster operations
    #[command(subcommand)]
    Student(student::StudentCommands),

    /// Run one console command, e.g. `tutor run algebra 12 X`
    Run(console::RunArgs),

    /// Read console commands from stdin until `exit`
    Console(console::ConsoleArgs),

    /// Homework operations
    #[command(subcommand)]
    Homework(homework::HomeworkCommands),

    /// Stamp rankings, history and milestone reset
    #[command(subcommand)]
    Stamps(stamps::StampsCommands),

    /// Grading log queries
    #[command(subcommand)]
    Logs(logs::LogsCommands),

    /// Configuration management
    #[command(subcommand)]
    Config(config::ConfigCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let settings = config::load_settings(cli.config.as_deref())?;
    let logging = if cli.verbose {
        settings.logging.clone().with_level("debug")
    } else {
        settings.logging.clone()
    };
    init_telemetry(&logging)?;

    let data_dir = cli
        .data_dir
        .clone()
        .or_else(|| config::load_value("data-dir").map(PathBuf::from))
        .unwrap_or_else(|| settings.storage.data_dir.clone());

    let ctx = Context {
        format: cli.output,
        data_dir,
        recent_limit: settings.views.recent_limit,
    };

    let result = match cli.command {
        Commands::Student(cmd) => student::execute(cmd, &ctx),
        Commands::Run(args) => console::run(args, &ctx),
        Commands::Console(args) => console::interactive(args, &ctx),
        Commands::Homework(cmd) => homework::execute(cmd, &ctx),
        Commands::Stamps(cmd) => stamps::execute(cmd, &ctx),
        Commands::Logs(cmd) => logs::execute(cmd, &ctx),
        Commands::Config(cmd) => config::execute(cmd, ctx.format),
    };

    if let Err(e) = result {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
