use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://http-observatory.security.mozilla.org/api/v1";

/// Name of the proxy file looked up in the working directory when no
/// explicit path is given.
pub const DEFAULT_PROXY_FILE: &str = "proxy";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub proxy: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read proxy file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("proxy file {path} contains no proxy address")]
    EmptyProxy { path: PathBuf },
}

impl Config {
    /// Resolve the runtime configuration once at startup. The proxy is read
    /// from `proxy_file` if given, otherwise from `./proxy` if that file
    /// exists; an explicitly named file must be readable and non-empty.
    pub fn resolve(
        api_url: &str,
        proxy_file: Option<&Path>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let proxy = match proxy_file {
            Some(path) => Some(read_proxy(path)?),
            None => {
                let default = Path::new(DEFAULT_PROXY_FILE);
                if default.is_file() {
                    Some(read_proxy(default)?)
                } else {
                    None
                }
            }
        };

        Ok(Self {
            api_url: api_url.to_string(),
            proxy,
            timeout,
        })
    }
}

fn read_proxy(path: &Path) -> Result<String, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToString::to_string)
        .ok_or_else(|| ConfigError::EmptyProxy {
            path: path.to_path_buf(),
        })
}
