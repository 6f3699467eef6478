//! Typed dev-server configuration.
//!
//! The configuration record is constructed once at startup, either from a
//! config file (see [`crate::loader`]) or from defaults, and is immutable
//! afterwards. Every field the runtime does not populate stays at its
//! default.

use serde::Serialize;

use crate::hosts::AllowedHosts;

/// Configuration consumed by the dev server at process startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DevServerConfig {
    /// Server options.
    pub server: ServerSettings,
}

/// Server options from the `server` block of a config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSettings {
    /// Hosts permitted to reach the dev server.
    pub allowed_hosts: AllowedHosts,

    /// Port to listen on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Host to bind to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Open browser automatically.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<bool>,
}

impl DevServerConfig {
    /// Set the allow-list.
    #[must_use]
    pub fn with_allowed_hosts(mut self, hosts: AllowedHosts) -> Self {
        self.server.allowed_hosts = hosts;
        self
    }

    /// Set the listen port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.server.port = Some(port);
        self
    }

    /// Set the bind host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.server.host = Some(host.into());
        self
    }
}
