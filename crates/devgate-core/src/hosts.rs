//! Host allow-list matching.
//!
//! `server.allowedHosts` exists to guard the dev server against DNS-rebinding
//! style requests: a request is admitted only if its `Host` value is loopback,
//! appears in the allow-list, or matches a leading-dot wildcard entry.

use serde::ser::{Serialize, Serializer};

/// Which request hosts the dev server admits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedHosts {
    /// Admit any host (`allowedHosts: true` in the config source).
    Any,
    /// Admit loopback plus the listed host names. An empty list is valid and
    /// means no hosts beyond loopback are pre-approved.
    List(Vec<String>),
}

impl Default for AllowedHosts {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

// Serializes to the config-file shape: `true` or an array of strings.
impl Serialize for AllowedHosts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Any => serializer.serialize_bool(true),
            Self::List(hosts) => hosts.serialize(serializer),
        }
    }
}

impl AllowedHosts {
    /// Build an allow-list from host names, dropping empty entries.
    pub fn list<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(
            hosts
                .into_iter()
                .map(Into::into)
                .filter(|h| !h.is_empty())
                .collect(),
        )
    }

    /// Number of explicit entries (0 for `Any`).
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Any => 0,
            Self::List(hosts) => hosts.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a request with the given `Host` value is admitted.
    ///
    /// The value may carry a port suffix (`example.com:5173`, `[::1]:5173`);
    /// comparison is case-insensitive. Loopback names are always admitted.
    /// A list entry starting with `.` admits the bare domain and every
    /// subdomain of it.
    #[must_use]
    pub fn admits(&self, host: &str) -> bool {
        let host = normalize_host(host);
        if host.is_empty() {
            return false;
        }
        if is_loopback(&host) {
            return true;
        }
        match self {
            Self::Any => true,
            Self::List(entries) => entries.iter().any(|entry| entry_matches(entry, &host)),
        }
    }
}

/// Strip a `:port` suffix and IPv6 brackets, and lowercase.
fn normalize_host(raw: &str) -> String {
    let raw = raw.trim();
    let bare = if let Some(rest) = raw.strip_prefix('[') {
        // Bracketed IPv6 literal, e.g. "[::1]:5173"
        rest.split(']').next().unwrap_or(rest)
    } else {
        match raw.rfind(':') {
            // More than one colon and no brackets: bare IPv6, keep as-is
            Some(idx) if raw[..idx].contains(':') => raw,
            Some(idx) => &raw[..idx],
            None => raw,
        }
    };
    bare.to_ascii_lowercase()
}

fn is_loopback(host: &str) -> bool {
    host == "localhost" || host.ends_with(".localhost") || host == "127.0.0.1" || host == "::1"
}

fn entry_matches(entry: &str, host: &str) -> bool {
    let entry = entry.to_ascii_lowercase();
    if let Some(domain) = entry.strip_prefix('.') {
        host == domain || host.ends_with(&entry)
    } else {
        host == entry
    }
}
