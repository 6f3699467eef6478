//! Config file discovery and parsing.
//!
//! Loads `devgate.config.ts`, `devgate.config.js`, `vite.config.ts`, or
//! `vite.config.js` and extracts the static server configuration from the
//! default export.
//!
//! ## Supported config format
//!
//! ```js
//! import { defineConfig } from 'vite'
//!
//! export default defineConfig({
//!   server: {
//!     allowedHosts: ['scclin021'],
//!   },
//! })
//! ```
//!
//! A bare `export default { ... }` works as well. The object literal is
//! parsed as a JSON5-like structure: unquoted keys, single quotes, trailing
//! commas, comments.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::Error;
use crate::hosts::AllowedHosts;
use crate::settings::DevServerConfig;

/// Config file names in priority order.
const CONFIG_FILES: &[&str] = &[
    "devgate.config.ts",
    "devgate.config.js",
    "vite.config.ts",
    "vite.config.js",
];

/// Find a config file in the given root directory.
#[must_use]
pub fn find_config_file(root: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.exists())
}

/// Load configuration from a config file in the given root directory.
///
/// If `config_path` is `Some`, use that specific file. Otherwise,
/// auto-discover; `Ok(None)` means no config file exists.
pub fn load_config(
    root: &Path,
    config_path: Option<&Path>,
) -> Result<Option<(PathBuf, DevServerConfig)>, Error> {
    let path = match config_path {
        Some(p) => {
            let abs = if p.is_absolute() {
                p.to_path_buf()
            } else {
                root.join(p)
            };
            if !abs.exists() {
                return Err(Error::ConfigNotFound { path: abs });
            }
            abs
        }
        None => match find_config_file(root) {
            Some(p) => p,
            None => return Ok(None),
        },
    };

    let source = std::fs::read_to_string(&path).map_err(|source| Error::ConfigRead {
        path: path.clone(),
        source,
    })?;

    let config = parse_config(&source).map_err(|message| Error::ConfigParse {
        path: path.clone(),
        message,
    })?;

    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(Some((path, config)))
}

/// Resolve the startup configuration: the parsed config file if one exists,
/// defaults otherwise. Returns the source path alongside the config.
pub fn resolve_config(
    root: &Path,
    config_path: Option<&Path>,
) -> Result<(Option<PathBuf>, DevServerConfig), Error> {
    match load_config(root, config_path)? {
        Some((path, config)) => Ok((Some(path), config)),
        None => Ok((None, DevServerConfig::default())),
    }
}

/// Parse config source: locate the default export, unwrap an optional
/// `defineConfig(...)` call, parse the object literal, convert to the typed
/// record.
fn parse_config(source: &str) -> Result<DevServerConfig, String> {
    let mut scanner = Scanner::new(source);
    scanner.seek_default_export()?;
    let value = scanner.parse_export_value()?;
    Ok(from_value(&value))
}

/// Convert the raw parsed object into the typed configuration. Unknown
/// fields are ignored; the external runtime defaults everything else.
fn from_value(value: &Value) -> DevServerConfig {
    let mut config = DevServerConfig::default();

    let Some(server) = value.get("server").and_then(Value::as_object) else {
        return config;
    };

    if let Some(hosts) = server.get("allowedHosts") {
        config.server.allowed_hosts = allowed_hosts_from_value(hosts);
    }
    if let Some(port) = server.get("port").and_then(Value::as_u64) {
        config.server.port = u16::try_from(port).ok();
    }
    if let Some(host) = server.get("host").and_then(Value::as_str) {
        config.server.host = Some(host.to_string());
    }
    if let Some(open) = server.get("open").and_then(Value::as_bool) {
        config.server.open = Some(open);
    }

    config
}

fn allowed_hosts_from_value(value: &Value) -> AllowedHosts {
    match value {
        Value::Bool(true) => AllowedHosts::Any,
        Value::Array(items) => AllowedHosts::list(items.iter().filter_map(Value::as_str)),
        _ => AllowedHosts::default(),
    }
}

/// Single-pass scanner over config source. Skips comments and strings while
/// seeking, then parses the JSON5-ish object literal into `serde_json::Value`.
struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Skip whitespace and `//` / `/* */` comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.rest().starts_with("//") => {
                    while let Some(ch) = self.peek() {
                        if ch == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                Some('/') if self.rest().starts_with("/*") => {
                    self.pos += 2;
                    match self.rest().find("*/") {
                        Some(idx) => self.pos += idx + 2,
                        None => self.pos = self.src.len(),
                    }
                }
                _ => break,
            }
        }
    }

    /// Consume an identifier-like word (alphanumerics, `_`, `$`, `.`).
    fn scan_word(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' || ch == '$' || ch == '.' {
                self.bump();
            } else {
                break;
            }
        }
        &self.src[start..self.pos]
    }

    /// Advance to just past the `export default` keywords, skipping strings
    /// and comments so the marker is never matched inside one.
    fn seek_default_export(&mut self) -> Result<(), String> {
        loop {
            self.skip_trivia();
            match self.peek() {
                None => {
                    return Err("No `export default` found in config file".to_string());
                }
                Some('"' | '\'' | '`') => {
                    self.scan_string()?;
                }
                Some(ch) if is_word_start(ch) => {
                    if self.scan_word() == "export" {
                        let mark = self.pos;
                        self.skip_trivia();
                        if self.peek().is_some_and(is_word_start) && self.scan_word() == "default"
                        {
                            return Ok(());
                        }
                        self.pos = mark;
                    }
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    /// Parse the exported value: the object literal, optionally wrapped in
    /// call expressions like `defineConfig({ ... })`.
    fn parse_export_value(&mut self) -> Result<Value, String> {
        let mut wrappers = 0usize;
        loop {
            self.skip_trivia();
            match self.peek() {
                Some('{') => break,
                Some(ch) if is_word_start(ch) => {
                    self.scan_word();
                    self.skip_trivia();
                    if !self.eat('(') {
                        return Err(
                            "Expected `(` after identifier in default export".to_string()
                        );
                    }
                    wrappers += 1;
                }
                Some(ch) => {
                    return Err(format!("Expected object literal in default export, got '{ch}'"));
                }
                None => return Err("Unexpected end of input".to_string()),
            }
        }

        let value = self.parse_value()?;

        for _ in 0..wrappers {
            self.skip_trivia();
            if !self.eat(')') {
                return Err("Unclosed call in default export".to_string());
            }
        }

        Ok(value)
    }

    fn parse_value(&mut self) -> Result<Value, String> {
        self.skip_trivia();
        match self.peek() {
            Some('{') => self.parse_object(),
            Some('[') => self.parse_array(),
            Some('"' | '\'' | '`') => Ok(Value::String(self.scan_string()?)),
            Some(ch) if ch == '-' || ch.is_ascii_digit() => self.parse_number(),
            Some(ch) if is_word_start(ch) => self.parse_keyword(),
            Some(ch) => Err(format!("Unexpected character '{ch}' at offset {}", self.pos)),
            None => Err("Unexpected end of input".to_string()),
        }
    }

    fn parse_object(&mut self) -> Result<Value, String> {
        self.bump(); // '{'
        let mut map = serde_json::Map::new();

        loop {
            self.skip_trivia();
            if self.eat('}') {
                return Ok(Value::Object(map));
            }
            if self.peek().is_none() {
                return Err("Unterminated object".to_string());
            }

            let key = self.parse_key()?;
            self.skip_trivia();
            if !self.eat(':') {
                return Err(format!("Expected ':' after key '{key}'"));
            }

            let value = self.parse_value()?;
            map.insert(key, value);

            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {}
                Some(ch) => return Err(format!("Expected ',' or '}}' in object, got '{ch}'")),
                None => return Err("Unterminated object".to_string()),
            }
        }
    }

    fn parse_array(&mut self) -> Result<Value, String> {
        self.bump(); // '['
        let mut items = Vec::new();

        loop {
            self.skip_trivia();
            if self.eat(']') {
                return Ok(Value::Array(items));
            }
            if self.peek().is_none() {
                return Err("Unterminated array".to_string());
            }

            items.push(self.parse_value()?);

            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {}
                Some(ch) => return Err(format!("Expected ',' or ']' in array, got '{ch}'")),
                None => return Err("Unterminated array".to_string()),
            }
        }
    }

    /// Object key: quoted string or bare identifier. Bare keys may contain
    /// dots (`process.env.NODE_ENV`).
    fn parse_key(&mut self) -> Result<String, String> {
        self.skip_trivia();
        match self.peek() {
            Some('"' | '\'') => self.scan_string(),
            Some(ch) if is_word_start(ch) || ch == '.' => Ok(self.scan_word().to_string()),
            other => Err(format!("Expected object key, got {other:?}")),
        }
    }

    fn scan_string(&mut self) -> Result<String, String> {
        let quote = self.bump().ok_or_else(|| "Unterminated string".to_string())?;
        let mut out = String::new();

        loop {
            match self.bump() {
                Some(ch) if ch == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some(ch) => out.push(ch),
                    None => return Err("Unterminated string escape".to_string()),
                },
                Some(ch) => out.push(ch),
                None => return Err("Unterminated string".to_string()),
            }
        }
    }

    fn parse_number(&mut self) -> Result<Value, String> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        let mut has_dot = false;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                self.bump();
            } else if ch == '.' && !has_dot {
                has_dot = true;
                self.bump();
            } else {
                break;
            }
        }
        let text = &self.src[start..self.pos];

        if has_dot {
            text.parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| format!("Invalid number '{text}'"))
        } else {
            text.parse::<i64>()
                .map(|n| Value::Number(n.into()))
                .map_err(|e| format!("Invalid number '{text}': {e}"))
        }
    }

    fn parse_keyword(&mut self) -> Result<Value, String> {
        match self.scan_word() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "null" | "undefined" => Ok(Value::Null),
            word => Err(format!("Unexpected token '{word}'")),
        }
    }
}

fn is_word_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    const VITE_STYLE_SOURCE: &str = r#"
        // vite.config.js
        import { defineConfig } from 'vite'

        export default defineConfig({
          server: {
            allowedHosts: ['scclin021'],
            // optionally also allow these if you use them:
            // allowedHosts: ['scclin021', 'localhost', '127.0.0.1', '[::1]'],
          },
        })
    "#;

    #[test]
    fn test_find_config_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_config_file(dir.path()).is_none());

        std::fs::write(dir.path().join("vite.config.js"), "export default {}").unwrap();
        assert_eq!(
            find_config_file(dir.path()).unwrap(),
            dir.path().join("vite.config.js")
        );

        // devgate.config.ts takes priority
        std::fs::write(dir.path().join("devgate.config.ts"), "export default {}").unwrap();
        assert_eq!(
            find_config_file(dir.path()).unwrap(),
            dir.path().join("devgate.config.ts")
        );
    }

    #[test]
    fn test_parse_vite_style_config() {
        let config = parse_config(VITE_STYLE_SOURCE).unwrap();
        assert_eq!(
            config.server.allowed_hosts,
            AllowedHosts::list(["scclin021"])
        );
        assert_eq!(config.server.allowed_hosts.len(), 1);
        assert_eq!(config.server.port, None);
        assert_eq!(config.server.host, None);
        assert_eq!(config.server.open, None);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let first = parse_config(VITE_STYLE_SOURCE).unwrap();
        let second = parse_config(VITE_STYLE_SOURCE).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_adding_host_grows_list() {
        let one = parse_config("export default { server: { allowedHosts: ['a'] } }").unwrap();
        let two =
            parse_config("export default { server: { allowedHosts: ['a', 'b'] } }").unwrap();
        assert_eq!(two.server.allowed_hosts.len(), one.server.allowed_hosts.len() + 1);
        assert!(two.server.allowed_hosts.admits("b"));
    }

    #[test]
    fn test_empty_allow_list_is_valid() {
        let config = parse_config("export default { server: { allowedHosts: [] } }").unwrap();
        assert_eq!(config.server.allowed_hosts, AllowedHosts::list::<_, String>([]));
        assert!(config.server.allowed_hosts.is_empty());
    }

    #[test]
    fn test_allowed_hosts_true() {
        let config =
            parse_config("export default { server: { allowedHosts: true } }").unwrap();
        assert_eq!(config.server.allowed_hosts, AllowedHosts::Any);
    }

    #[test]
    fn test_parse_full_server_block() {
        let source = r#"
            export default {
                server: {
                    port: 4000,
                    host: 'localhost',
                    open: true,
                    allowedHosts: ["scclin021", ".example.com"],
                },
            };
        "#;
        let config = parse_config(source).unwrap();
        assert_eq!(config.server.port, Some(4000));
        assert_eq!(config.server.host.as_deref(), Some("localhost"));
        assert_eq!(config.server.open, Some(true));
        assert_eq!(config.server.allowed_hosts.len(), 2);
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("export default {};").unwrap();
        assert_eq!(config, DevServerConfig::default());
    }

    #[test]
    fn test_comments_and_trailing_commas() {
        let source = "
            /* header
               comment */
            export default {
                server: { // inline
                    allowedHosts: [
                        'a', // first
                        'b',
                    ],
                },
            };
        ";
        let config = parse_config(source).unwrap();
        assert_eq!(config.server.allowed_hosts.len(), 2);
    }

    #[test]
    fn test_marker_inside_string_ignored() {
        let source = r#"
            const note = "export default nothing";
            export default { server: { allowedHosts: ['a'] } };
        "#;
        let config = parse_config(source).unwrap();
        assert_eq!(config.server.allowed_hosts.len(), 1);
    }

    #[test]
    fn test_no_default_export() {
        assert!(parse_config("const config = {};").is_err());
    }

    #[test]
    fn test_unclosed_wrapper_call() {
        assert!(parse_config("export default defineConfig({ server: {} }").is_err());
    }

    #[test]
    fn test_non_string_entries_dropped() {
        let config =
            parse_config("export default { server: { allowedHosts: ['a', 1, ''] } }").unwrap();
        assert_eq!(config.server.allowed_hosts.len(), 1);
        assert!(config.server.allowed_hosts.admits("a"));
    }

    #[test]
    fn test_load_config_discovery() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("devgate.config.js"),
            "export default { server: { allowedHosts: ['scclin021'], port: 8080 } };",
        )
        .unwrap();

        let (path, config) = load_config(dir.path(), None).unwrap().unwrap();
        assert_eq!(path, dir.path().join("devgate.config.js"));
        assert_eq!(config.server.port, Some(8080));
        assert!(config.server.allowed_hosts.admits("scclin021"));
    }

    #[test]
    fn test_load_config_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("custom.config.js"),
            "export default { server: { port: 9999 } };",
        )
        .unwrap();

        let result = load_config(dir.path(), Some(Path::new("custom.config.js"))).unwrap();
        let (_, config) = result.unwrap();
        assert_eq!(config.server.port, Some(9999));
    }

    #[test]
    fn test_load_config_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(dir.path(), Some(Path::new("nonexistent.config.js")));
        assert!(matches!(result, Err(Error::ConfigNotFound { .. })));
    }

    #[test]
    fn test_load_config_parse_error_names_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("vite.config.js"), "module.exports = {}").unwrap();

        match load_config(dir.path(), None) {
            Err(Error::ConfigParse { path, .. }) => {
                assert_eq!(path, dir.path().join("vite.config.js"));
            }
            other => panic!("expected ConfigParse error, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_config_without_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let (path, config) = resolve_config(dir.path(), None).unwrap();
        assert!(path.is_none());
        assert_eq!(config, DevServerConfig::default());
    }
}
