// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hearth - family task coordination and parental-control admin service.
//!
//! This is the binary entry point for the Hearth server.

use clap::{Parser, Subcommand};

mod doctor;
mod serve;

/// Hearth - family task coordination and parental-control admin service.
#[derive(Parser, Debug)]
#[command(name = "hearth", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Hearth gateway server.
    Serve,
    /// Print the resolved configuration as TOML.
    Config,
    /// Check configuration and the environment the server would run in.
    Doctor,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match hearth_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            hearth_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Config) => show_config(&config),
        Some(Commands::Doctor) => doctor::run_doctor(&config).await,
        None => {
            println!("hearth: use --help for available commands");
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Print the fully-resolved configuration.
fn show_config(config: &hearth_config::HearthConfig) -> Result<(), hearth_core::HearthError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| hearth_core::HearthError::Config(format!("rendering config failed: {e}")))?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed).
        let config =
            hearth_config::load_and_validate().expect("default config should be valid");
        assert_eq!(config.service.name, "hearth");
    }

    #[test]
    fn resolved_config_renders_as_toml() {
        let config = hearth_config::HearthConfig::default();
        let rendered = toml::to_string_pretty(&config).unwrap();
        assert!(rendered.contains("[service]"));
        assert!(rendered.contains("[server]"));
    }
}
