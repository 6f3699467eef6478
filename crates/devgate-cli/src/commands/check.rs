//! `devgate check` command implementation.
//!
//! Answers the question the allow-list exists for: would a request with this
//! `Host` value be admitted? Exit code 0 means admitted, 1 means denied.

use devgate_core::loader::resolve_config;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct CheckReport<'a> {
    host: &'a str,
    allowed: bool,
    source: Option<String>,
}

pub fn run(cwd: &Path, host: &str, config_path: Option<&Path>, json: bool) -> Result<()> {
    let (source, config) = resolve_config(cwd, config_path).into_diagnostic()?;
    let allowed = config.server.allowed_hosts.admits(host);

    tracing::debug!(host, allowed, "checked host against allow-list");

    if json {
        let report = CheckReport {
            host,
            allowed,
            source: source.as_ref().map(|p| p.display().to_string()),
        };
        println!("{}", serde_json::to_string(&report).into_diagnostic()?);
    } else if allowed {
        println!("{host}: allowed");
    } else {
        println!("{host}: denied");
    }

    if !allowed {
        std::process::exit(1);
    }
    Ok(())
}
