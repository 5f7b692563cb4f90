//! Server configuration, read from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::routing::DEFAULT_TREE_CACHE;

/// Error in a configuration variable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value {value:?} for {variable}: {reason}")]
pub struct ConfigError {
    variable: &'static str,
    value: String,
    reason: &'static str,
}

/// Configuration of the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind (`TRANSIT_HOST`).
    pub host: IpAddr,

    /// Port to bind (`TRANSIT_PORT`).
    pub port: u16,

    /// Dataset loaded at startup, if any (`TRANSIT_DATA`).
    pub data_path: Option<PathBuf>,

    /// Shortest-path trees cached per graph snapshot (`TRANSIT_PATH_CACHE`).
    pub tree_cache: u64,
}

impl ServerConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, falling back to defaults
    /// for unset variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = match lookup("TRANSIT_HOST") {
            Some(value) => value.parse().map_err(|_| ConfigError {
                variable: "TRANSIT_HOST",
                value,
                reason: "expected an IP address",
            })?,
            None => defaults.host,
        };

        let port = match lookup("TRANSIT_PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError {
                variable: "TRANSIT_PORT",
                value,
                reason: "expected a port number",
            })?,
            None => defaults.port,
        };

        let tree_cache = match lookup("TRANSIT_PATH_CACHE") {
            Some(value) => value.parse().map_err(|_| ConfigError {
                variable: "TRANSIT_PATH_CACHE",
                value,
                reason: "expected a non-negative integer",
            })?,
            None => defaults.tree_cache,
        };

        let data_path = lookup("TRANSIT_DATA")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            host,
            port,
            data_path,
            tree_cache,
        })
    }

    /// The socket address to listen on.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
            data_path: None,
            tree_cache: DEFAULT_TREE_CACHE,
        }
    }
}
