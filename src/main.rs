#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use log::{error, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use zhvi::app_config::{self, Config};
use zhvi::app_controller::{self, Controller};
use zhvi::providers::gemini::Gemini;
use zhvi::session::Stage;
use zhvi::translation::verify_credentials;

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
    /// Correct then translate a subtitle file (default command)
    Run(FileArgs),

    /// Correct grammar, spelling and punctuation of a Chinese subtitle file
    Correct(FileArgs),

    /// Translate an already corrected Chinese subtitle file to Vietnamese
    Translate(FileArgs),

    /// Check the API key and report which model will be used
    Verify,

    /// Search and replace inside a translated subtitle file
    Replace {
        /// Subtitle file to edit in place
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Text to search for
        #[arg(long)]
        search: String,

        /// Replacement text
        #[arg(long)]
        replace: String,

        /// Treat the search text as a regular expression
        #[arg(long)]
        regex: bool,
    },

    /// Generate shell completions for zhvi
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct FileArgs {
    /// Input subtitle file
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Directory for output files (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Style hint, e.g. "trinh thám", "review phim", "trang trọng"
    #[arg(short, long)]
    style: Option<String>,
}

/// zhvi - Chinese subtitle correction and Vietnamese translation
///
/// Corrects Chinese SRT subtitles and translates them to Vietnamese with
/// a Gemini model, sending one request per document.
#[derive(Parser, Debug)]
#[command(name = "zhvi")]
#[command(version)]
#[command(about = "Correct Chinese subtitles and translate them to Vietnamese")]
#[command(long_about = "zhvi corrects Chinese SRT subtitles and translates them to Vietnamese using Gemini.

EXAMPLES:
    zhvi movie.srt                              # Correct and translate
    zhvi correct movie.srt                      # Only correct
    zhvi translate movie.corrected_chinese.srt  # Only translate
    zhvi run -s \"review phim\" movie.srt          # Use a style hint
    zhvi verify --api-key KEY                   # Check an API key
    zhvi replace out.srt --search A --replace B # Fix a recurring term
    zhvi completions bash > zhvi.bash           # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't exist,
    a default one is created. The API key can also be given with --api-key or
    the GEMINI_API_KEY environment variable.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input subtitle file (runs correct then translate)
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Directory for output files (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Style hint, e.g. "trinh thám", "review phim", "trang trọng"
    #[arg(short, long)]
    style: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Use this model instead of probing the configured candidates
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Prefix and ANSI colour for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("✗", "1;31"),
            Level::Warn => ("!", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("·", "1;36"),
            Level::Trace => ("…", "1;35"),
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
            let (prefix, colour) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                colour, now, prefix, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    if let Err(e) = run(CommandLineOptions::parse()).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(mut cli: CommandLineOptions) -> Result<()> {
    if let Some(level) = &cli.log_level {
        log::set_max_level(app_config::LogLevel::from(level.clone()).to_level_filter());
    }

    let command = match cli.command.take() {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "zhvi", &mut std::io::stdout());
            return Ok(());
        }
        Some(Commands::Replace { file, search, replace, regex }) => {
            app_controller::replace_in_file(&file, &search, &replace, regex)?;
            return Ok(());
        }
        Some(command) => command,
        None => {
            // Default behavior - use top-level args
            let input_path = cli.input_path.clone().ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;
            Commands::Run(FileArgs {
                input_path,
                output_dir: cli.output_dir.clone(),
                force_overwrite: cli.force_overwrite,
                style: cli.style.clone(),
            })
        }
    };

    let mut config = load_config(&cli)?;

    let (args, stage) = match command {
        Commands::Verify => {
            let check = verify_credentials(&config, &config.api_key).await;
            if check.ok {
                info!("API key is valid. Model: {}", check.detail);
                return Ok(());
            }
            return Err(anyhow!("API check failed: {}", check.detail));
        }
        Commands::Run(args) => (args, None),
        Commands::Correct(args) => (args, Some(Stage::Corrected)),
        Commands::Translate(args) => (args, Some(Stage::Translated)),
        Commands::Replace { .. } | Commands::Completions { .. } => return Ok(()),
    };

    if args.style.is_some() {
        config.style = args.style.clone();
    }

    let provider = Gemini::new(config.api_key.clone(), config.endpoint.clone(), config.timeout_secs)?;
    let mut controller = Controller::with_config(config)?;
    controller.connect(provider).await?;

    let output_dir = args.output_dir.as_deref();
    match stage {
        None => {
            controller.run_pipeline(&args.input_path, output_dir, args.force_overwrite).await?;
        }
        Some(Stage::Translated) => {
            controller.run_translate(&args.input_path, output_dir, args.force_overwrite).await?;
        }
        Some(_) => {
            controller.run_correct(&args.input_path, output_dir, args.force_overwrite).await?;
        }
    }

    Ok(())
}

/// Load the config file and apply command line and environment overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(Path::new(&cli.config_path))?;

    if let Some(api_key) = &cli.api_key {
        config.api_key = api_key.clone();
    }

    if let Some(model) = &cli.model {
        config.candidate_models = vec![model.clone()];
    }

    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    config.validate()?;
    Ok(config)
}
