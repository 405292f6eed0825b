//! Heritage Server: host process for the testament registry
//!
//! Owns the persisted ledger state (testaments + token books) and executes
//! registry operations on behalf of a caller. Without a command it runs a
//! monitor loop reporting testaments near or past their heartbeat window.
//!
//! # Usage
//!
//! ```bash
//! heritage-server --config /path/to/heritage-server.toml           # daemon
//! heritage-server --check                                          # one monitor cycle
//! heritage-server --validate                                       # check config
//! heritage-server --as 0x…01 add 0x…02 0x…aa 30                    # run an operation
//! ```

mod commands;
mod config;
mod daemon;

use anyhow::{Context, Result};
use heritage_core::{Address, SystemClock};
use std::path::PathBuf;
use std::str::FromStr;

fn main() -> Result<()> {
    // Parse CLI args (minimal, no clap)
    let args: Vec<String> = std::env::args().collect();

    let mut config_path = PathBuf::from("/config/heritage-server.toml");
    let mut one_shot = false;
    let mut validate_only = false;
    let mut caller: Option<Address> = None;
    let mut operation: Option<(String, Vec<String>)> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                if i < args.len() {
                    config_path = PathBuf::from(&args[i]);
                } else {
                    anyhow::bail!("--config requires a path argument");
                }
            }
            "--as" => {
                i += 1;
                let raw = args
                    .get(i)
                    .context("--as requires a caller address")?;
                caller = Some(
                    Address::from_str(raw)
                        .with_context(|| format!("Invalid caller address: {}", raw))?,
                );
            }
            "--check" | "--once" => {
                one_shot = true;
            }
            "--validate" => {
                validate_only = true;
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--version" | "-V" => {
                println!("heritage-server {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            other if other.starts_with('-') => {
                anyhow::bail!("Unknown argument: {}", other);
            }
            name => {
                // Everything after the command name belongs to the command
                operation = Some((name.to_string(), args[i + 1..].to_vec()));
                break;
            }
        }
        i += 1;
    }

    // Load config; a missing file falls back to defaults for local use
    let mut server_config = if config_path.exists() {
        config::ServerConfig::from_file(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        toml::from_str("").context("Failed to build default config")?
    };

    // Apply env overrides
    server_config.apply_env_overrides();

    // Validate
    server_config
        .validate()
        .context("Configuration validation failed")?;

    // Init logger
    std::env::set_var("RUST_LOG", &server_config.server.log_level);
    env_logger::init();

    if validate_only {
        println!("✅ Configuration is valid.");
        println!("  Registry:       {}", server_config.registry.address);
        println!("  Data dir:       {}", server_config.server.data_dir.display());
        println!(
            "  Check interval: {} secs",
            server_config.server.check_interval_secs
        );
        println!(
            "  Thresholds:     {:.0}% / {:.0}%",
            server_config.liveness.checkin_threshold * 100.0,
            server_config.liveness.critical_threshold * 100.0
        );
        return Ok(());
    }

    if let Some((name, rest)) = operation {
        let command = commands::Command::parse(&name, &rest)?;
        let output = commands::run(&server_config, caller, &command)
            .with_context(|| format!("`{}` failed", name))?;
        println!("{}", output);
        return Ok(());
    }

    if one_shot {
        log::info!("Running single check cycle…");
        daemon::run_check_cycle(&server_config, &SystemClock)?;
        log::info!("Done.");
        return Ok(());
    }

    // Build tokio runtime
    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;

    // Install Ctrl-C handler for graceful shutdown
    let shutdown = rt.block_on(async {
        tokio::select! {
            result = daemon::run(server_config) => result,
            _ = tokio::signal::ctrl_c() => {
                log::info!("Received shutdown signal. Exiting…");
                Ok(())
            }
        }
    });

    if let Err(e) = shutdown {
        log::error!("Server error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn print_help() {
    println!(
        r#"Heritage Server: proof-of-life inheritance registry host

USAGE:
    heritage-server [OPTIONS] [COMMAND [ARGS...]]

OPTIONS:
    -c, --config <PATH>   Config file path (default: /config/heritage-server.toml)
    --as <ADDRESS>        Caller identity for registry operations
    --check, --once       Run a single liveness check cycle and exit
    --validate            Validate config file and exit
    -h, --help            Show this help message
    -V, --version         Show version

COMMANDS (run once against the ledger state, then exit):
    add <inheritor> <token> <max_days>      Register a testament (caller = testator)
    update <inheritor> <token> <max_days>   Replace the caller's testament
    proof                                   Send a heartbeat (caller = testator)
    inherit                                 Claim an elapsed testament (caller = inheritor)
    revoke                                  Withdraw the caller's testament
    show-testator <address>                 Look up by testator
    show-inheritor <address>                Look up by inheritor
    deploy <token> <symbol>                 Register a token in the ledger
    mint <token> <to> <amount>              Credit tokens
    approve <token> <amount>                Allow the registry to spend the caller's tokens
    balance <token> <owner>                 Show a balance

Without a command the server runs the monitor loop.

ENVIRONMENT VARIABLES (override config file):
    HERITAGE_DATA_DIR           Data directory path
    HERITAGE_CHECK_INTERVAL     Check interval in seconds
    HERITAGE_LOG_LEVEL          Log level (error/warn/info/debug/trace)
    HERITAGE_REGISTRY_ADDRESS   Registry account address

EXAMPLES:
    # Run as daemon with config file
    heritage-server --config /path/to/config.toml

    # Single check (useful for cron jobs)
    heritage-server --config config.toml --check

    # Heartbeat as a testator
    heritage-server --config config.toml --as 0x1000000000000000000000000000000000000001 proof
"#
    );
}
