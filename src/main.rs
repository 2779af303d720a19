// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use smi2srt::app_config::{self, Config};
use smi2srt::app_controller::{Controller, RunOptions};
use smi2srt::file_utils::FileManager;
use smi2srt::timecode;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for smi2srt
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_time_begin(value: &str) -> Result<u64, String> {
    timecode::parse_duration_spec(value).map_err(|e| e.to_string())
}

/// smi2srt - SAMI, ASS and SRT to SRT converter
///
/// Converts subtitle files into UTF-8 SubRip files, one per language.
#[derive(Parser, Debug)]
#[command(name = "smi2srt")]
#[command(version)]
#[command(about = "Convert SAMI, ASS and SRT subtitles into per-language SRT files")]
#[command(long_about = "smi2srt converts SAMI (.smi), ASS (.ass) and SubRip (.srt) subtitles into UTF-8 SRT files.
A SAMI file carrying several languages is split into one SRT per language.

EXAMPLES:
    smi2srt movie.smi                        # Writes movie.ko.srt, movie.en.srt, ...
    smi2srt -n /movies/                      # Convert every .smi below /movies, keep existing outputs
    smi2srt -l movie.smi                     # List tracks and output names only
    smi2srt -t -1500 movie.srt               # Show every cue 1.5 seconds earlier
    smi2srt -t 2000 -b 10:00 movie.ass       # Delay cues from 10:00 onward by 2 seconds
    smi2srt -e cp949 -o out.srt movie.kor.smi
    smi2srt completions bash > smi2srt.bash  # Generate bash completions

CONFIGURATION:
    Settings are read from conf.json by default, then from the smi2srt
    directory under the user configuration directory. Command line flags
    take precedence. No configuration file is created.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Subtitle file or directory to convert
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Do not overwrite existing output files
    #[arg(short, long)]
    no_overwrite: bool,

    /// List the subtitle tracks and output names without writing
    #[arg(short, long)]
    list_subtitles: bool,

    /// Time offset in milliseconds, negative to show cues earlier
    #[arg(short, long, allow_hyphen_values = true)]
    time_offset: Option<i64>,

    /// Apply the offset only from this time on (milliseconds or [H:]MM:SS[,mmm])
    #[arg(short = 'b', long, value_parser = parse_time_begin)]
    time_begin: Option<u64>,

    /// Output file (single input file with a single track only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Source encoding label (e.g. 'cp949', 'utf-16le'), auto-detected by default
    #[arg(short, long)]
    encoding: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌",
            Level::Warn => "🚧",
            Level::Info => "✅",
            Level::Debug => "🔍",
            Level::Trace => "📋",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // The logger accepts everything; the max level is narrowed once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "smi2srt", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let input_path = cli.input_path.clone()
        .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

    let config = load_config(&cli)?;

    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;
    let options = RunOptions {
        list_only: cli.list_subtitles,
        output_path: cli.output.clone(),
    };

    let report = if FileManager::file_exists(&input_path) {
        controller.run(&input_path, &options)?
    } else if FileManager::dir_exists(&input_path) {
        controller.run_folder(&input_path, &options)?
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    };

    for output in &report.outputs {
        println!("{}", output.display());
    }

    if !report.failures.is_empty() {
        info!("{} file(s) could not be converted", report.failures.len());
    }

    Ok(())
}

// @loads: Config file, then applies command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load(&cli.config_path)
        .context("Failed to load configuration")?;

    if let Some(offset) = cli.time_offset {
        config.time_offset_ms = offset;
    }
    if let Some(begin) = cli.time_begin {
        config.time_begin_ms = begin;
    }
    if cli.no_overwrite {
        config.no_overwrite = true;
    }
    if let Some(encoding) = &cli.encoding {
        config.encoding = Some(encoding.clone());
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate()
        .context("Configuration validation failed")?;

    Ok(config)
}
