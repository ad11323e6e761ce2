//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use west_curate::output::OutputConfig;

/// west-curate - Compose a west manifest from Zephyr and a vendor overlay
#[derive(Parser, Debug)]
#[command(name = "west-curate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute (defaults to the interactive menu)
    #[command(subcommand)]
    command: Option<Commands>,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pick projects interactively and save the manifest
    Menu(commands::menu::MenuArgs),

    /// List the tags that can be selected
    Tags(commands::tags::TagsArgs),

    /// Compose the manifest without interaction
    Render(commands::render::RenderArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        self.init_logging();
        let output = OutputConfig::from_env_and_flag(&self.color);
        output.apply();

        match self.command {
            None => commands::menu::execute(commands::menu::MenuArgs::default(), output),
            Some(Commands::Menu(args)) => commands::menu::execute(args, output),
            Some(Commands::Tags(args)) => commands::tags::execute(args, output),
            Some(Commands::Render(args)) => commands::render::execute(args, output),
            Some(Commands::Completions(args)) => commands::completions::execute(args),
        }
    }

    /// `--log-level` sets the baseline; `RUST_LOG` refines it.
    fn init_logging(&self) {
        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&self.log_level);
        if let Ok(filters) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filters);
        }
        builder.format_timestamp(None).format_target(false);
        let _ = builder.try_init();
    }
}
