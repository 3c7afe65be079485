use crate::error::{PrompsterError, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MAX_FILE_BYTES: u64 = 1024 * 1024;

/// Built-in exclusion patterns, gitignore syntax.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    ".git/",
    ".hg/",
    ".svn/",
    "__pycache__/",
    ".mypy_cache/",
    ".pytest_cache/",
    ".tox/",
    "node_modules/",
    "venv/",
    ".venv/",
    "env/",
    ".ipynb_checkpoints/",
    "build/",
    "dist/",
    "target/",
    "*.pyc",
    ".DS_Store",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Process-wide settings, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Canonical directory being browsed.
    pub root: PathBuf,
    pub host: String,
    pub port: u16,
    pub max_file_bytes: u64,
    /// Patterns added on top of [`DEFAULT_EXCLUDES`].
    pub extra_excludes: Vec<String>,
    pub show_hidden: bool,
    pub respect_gitignore: bool,
    pub tls: Option<TlsPaths>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let requested_root = match get("PROMPSTER_ROOT") {
            Some(root) => PathBuf::from(root),
            None => env::current_dir().map_err(|e| PrompsterError::io(".", e))?,
        };
        let root = requested_root
            .canonicalize()
            .map_err(|e| PrompsterError::io(&requested_root, e))?;
        if !root.is_dir() {
            return Err(PrompsterError::Config(format!(
                "root is not a directory: {}",
                root.display()
            )));
        }

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| PrompsterError::Config(format!("PORT must be a port number, got '{}'", raw)))?,
            None => DEFAULT_PORT,
        };

        let max_file_bytes = match get("PROMPSTER_MAX_FILE_BYTES") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                PrompsterError::Config(format!(
                    "PROMPSTER_MAX_FILE_BYTES must be a byte count, got '{}'",
                    raw
                ))
            })?,
            None => DEFAULT_MAX_FILE_BYTES,
        };

        let extra_excludes = get("PROMPSTER_EXCLUDE")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let tls = match (get("CERT_PATH"), get("KEY_PATH")) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: PathBuf::from(cert),
                key: PathBuf::from(key),
            }),
            _ => None,
        };

        Ok(Config {
            root,
            host: get("PROMPSTER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            max_file_bytes,
            extra_excludes,
            show_hidden: parse_flag("PROMPSTER_SHOW_HIDDEN", get("PROMPSTER_SHOW_HIDDEN"), false)?,
            respect_gitignore: parse_flag(
                "PROMPSTER_RESPECT_GITIGNORE",
                get("PROMPSTER_RESPECT_GITIGNORE"),
                true,
            )?,
            tls,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(key: &str, value: Option<String>, default: bool) -> Result<bool> {
    let Some(raw) = value else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(PrompsterError::Config(format!(
            "{} must be a boolean, got '{}'",
            key, raw
        ))),
    }
}
