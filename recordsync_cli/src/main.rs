use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use std::path::PathBuf;

use recordsync_cli::config::{AppConfig, ConfigManager, get_config};
use recordsync_cli::error::{CliError, exit_code_for};
use recordsync_cli::orchestrators::run_orchestrator::{OutputFormat, RunOptions, RunOrchestrator};
use recordsync_cli::terminal;

#[derive(Parser)]
#[command(name = "recordsync")]
#[command(author, version, about = "Record Sync - Create a record and sync it to the secondary store", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one record sync session against JSON fixtures
    Run {
        /// JSON file with the form's default field values
        #[arg(short, long, value_name = "FILE")]
        params: PathBuf,

        /// JSON file with the secondary store records
        #[arg(short, long, value_name = "FILE")]
        store: PathBuf,

        /// Subject typed into the form
        #[arg(long)]
        subject: Option<String>,

        /// Description typed into the form
        #[arg(long)]
        description: Option<String>,

        /// Additional form edit (can be specified multiple times)
        #[arg(short, long = "edit", value_name = "FIELD=VALUE")]
        edits: Vec<String>,

        /// Output format (defaults to output.default_format)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show the configuration file path
    Path,

    /// Get a configuration value
    Get {
        /// Configuration key (e.g., orchestrator.lookup_limit)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., orchestrator.lookup_limit)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration values
    List,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Human,
    Json,
    Minimal,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Human => OutputFormat::Human,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Minimal => OutputFormat::Minimal,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Debug)
            .filter_module("recordsync_core", log::LevelFilter::Debug)
            .filter_module("recordsync_cli", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
        eprintln!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    if let Err(e) = dispatch(cli.command).await {
        eprintln!("{}", format!("Error: {e:#}").red());
        if let Some(cli_error) = e.downcast_ref::<CliError>() {
            for suggestion in cli_error.suggestions() {
                eprintln!("  {} {suggestion}", "→".yellow());
            }
        }
        std::process::exit(exit_code_for(&e).code());
    }
}

async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            params,
            store,
            subject,
            description,
            edits,
            format,
        } => {
            let config = get_config().context("Failed to load configuration")?;
            apply_color_setting(&config);

            let format = match format {
                Some(arg) => arg.into(),
                None => config.output.default_format.parse::<OutputFormat>()?,
            };
            let options = RunOptions {
                params_path: params,
                store_path: store,
                subject,
                description,
                edits,
                format,
            };

            RunOrchestrator::new(config.orchestrator, options)
                .run()
                .await
        }
        Commands::Config { command } => config_command(command),
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
    }
}

fn apply_color_setting(config: &AppConfig) {
    if !config.output.color_enabled || !terminal::supports_color() {
        colored::control::set_override(false);
    }
}

fn config_command(command: ConfigCommand) -> Result<()> {
    let mut manager = ConfigManager::new();

    match command {
        ConfigCommand::Path => {
            println!("{}", manager.get_config_path().display());
        }
        ConfigCommand::Get { key } => {
            println!("{}", manager.get(&key)?);
        }
        ConfigCommand::Set { key, value } => {
            manager.set(&key, &value)?;
            eprintln!("{}", format!("Set {key} = {value}").green());
            eprintln!(
                "Configuration saved to: {}",
                manager.get_config_path().display()
            );
        }
        ConfigCommand::List => {
            let items = manager.list()?;
            eprintln!("{}", "Configuration:".bold().blue());
            eprintln!("Config file: {}", manager.get_config_path().display());

            let mut current_section = "";
            for (key, value) in &items {
                let (section, name) = key.split_once('.').unwrap_or(("general", key.as_str()));
                if section != current_section {
                    println!();
                    println!("[{}]", section.yellow());
                    current_section = section;
                }
                println!("  {} = {}", name.cyan(), value);
            }
        }
    }

    Ok(())
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
