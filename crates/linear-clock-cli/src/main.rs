use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "linear-clock", version, about = "Linear Clock CLI")]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current bar state as JSON
    Status,
    /// Configured time range
    Range {
        #[command(subcommand)]
        action: commands::range::RangeAction,
    },
    /// Task management for today
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Time and task under a fractional bar position
    At {
        /// Position along the bar, 0.0 to 1.0
        position: f64,
        /// Max distance to a task marker
        #[arg(long, default_value = "0.01")]
        tolerance: f64,
    },
    /// Focus mode
    Focus {
        #[command(subcommand)]
        action: commands::focus::FocusAction,
    },
    /// Import tasks from a JSON file
    Import {
        /// Path to the JSON document
        file: std::path::PathBuf,
    },
    /// Export today's tasks as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<std::path::PathBuf>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Run the clock and raise task notifications
    Watch {
        /// Print notifications as JSON lines instead of desktop popups
        #[arg(long)]
        stdout: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Status => commands::status::run(),
        Commands::Range { action } => commands::range::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::At {
            position,
            tolerance,
        } => commands::status::run_at(position, tolerance),
        Commands::Focus { action } => commands::focus::run(action),
        Commands::Import { file } => commands::transfer::run_import(&file),
        Commands::Export { output } => commands::transfer::run_export(output.as_deref()),
        Commands::Config { action } => commands::config::run(action),
        Commands::Watch { stdout } => commands::watch::run(stdout),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
