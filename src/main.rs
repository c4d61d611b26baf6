mod common;
mod config;
mod emit;
mod export;
mod generate_commands;
mod secrets;
mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish the viewer runtime artifacts from a configuration document
    Run {
        #[clap(short, long)]
        config: String,
        #[clap(short, long)]
        watch: bool,
    },
    /// Load, overlay and validate a document, reporting every problem
    Validate {
        #[clap(short, long)]
        config: String,
    },
    /// Write a default configuration document
    Init {
        #[clap(short, long)]
        config: String,
    },
    Generate {
        #[clap(subcommand)]
        command: GenerateCommands,
    },
}

#[derive(Subcommand, Debug)]
enum GenerateCommands {
    Template { name: String },
    Sample { dir: String },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        Commands::Run { config, watch } => {
            info!("Publishing configuration: {}", config);
            emit::execute_emit(config, watch)?;
        }
        Commands::Validate { config } => {
            validate_command(&config)?;
        }
        Commands::Init { config } => {
            info!("Initializing configuration: {}", config);
            let config_file_path = config;
            let config = config::ViewerConfig::default();
            let serialized_config = serde_yaml::to_string(&config)?;
            common::write_string_to_file(&config_file_path, &serialized_config)?;
        }
        Commands::Generate { command } => match command {
            GenerateCommands::Template { name } => {
                info!("Generating template: {}", name);
                generate_commands::generate_template(name);
            }
            GenerateCommands::Sample { dir } => {
                info!("Generating sample: {}", dir);
                generate_commands::generate_sample(dir);
            }
        },
    }

    Ok(())
}

fn validate_command(config_path: &str) -> Result<()> {
    let mut config = emit::load_config(std::path::Path::new(config_path))?;
    secrets::apply_env(&mut config);

    match validate::validate(&config) {
        Ok(()) => {
            println!("{} {}", "ok".green().bold(), config_path);
            Ok(())
        }
        Err(errors) => {
            for error in &errors {
                println!("{} {}", "error:".red().bold(), error);
            }
            anyhow::bail!("{} configuration error(s) in {}", errors.len(), config_path);
        }
    }
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("handlebars=off,{}", log_level)))
        .without_time()
        .init();
}
