//! `devgate config` command implementation.
//!
//! Resolves the dev-server configuration (config file or defaults) and prints
//! it, human-readable or as a single JSON object with `--json`.

use devgate_core::loader::resolve_config;
use devgate_core::settings::DevServerConfig;
use devgate_core::AllowedHosts;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::Path;

/// Schema version for `--json` output. Bump on breaking shape changes.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct ConfigReport<'a> {
    config_schema_version: u32,
    /// Path the config was loaded from, or null when defaults applied.
    source: Option<String>,
    config: &'a DevServerConfig,
}

pub fn run(cwd: &Path, config_path: Option<&Path>, json: bool) -> Result<()> {
    let (source, config) = resolve_config(cwd, config_path).into_diagnostic()?;

    if json {
        let report = ConfigReport {
            config_schema_version: CONFIG_SCHEMA_VERSION,
            source: source.as_ref().map(|p| p.display().to_string()),
            config: &config,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).into_diagnostic()?
        );
        return Ok(());
    }

    match &source {
        Some(path) => println!("Config: {}", path.display()),
        None => println!("Config: (defaults, no config file found)"),
    }

    println!();
    println!("Server");
    match &config.server.allowed_hosts {
        AllowedHosts::Any => println!("  allowed hosts: any"),
        AllowedHosts::List(hosts) if hosts.is_empty() => {
            println!("  allowed hosts: loopback only");
        }
        AllowedHosts::List(hosts) => {
            println!("  allowed hosts: loopback + {}", hosts.join(", "));
        }
    }
    if let Some(port) = config.server.port {
        println!("  port: {port}");
    }
    if let Some(host) = &config.server.host {
        println!("  host: {host}");
    }
    if let Some(open) = config.server.open {
        println!("  open: {open}");
    }

    Ok(())
}
