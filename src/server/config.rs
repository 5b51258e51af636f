//! HTTP server configuration, read from a JSON file at startup.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

pub const SERVER_CONFIG_VAR: &str = "AVATAR_SERVER_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "avatar_server.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind. Loopback unless a deployment opts in.
    #[serde(default = "default_host")]
    pub host: IpAddr,
    /// 0 picks a free port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    8787
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Load config from a JSON file. Falls back to defaults if file is missing or invalid.
pub fn load_config(path: &Path) -> ServerConfig {
    crate::config::load_json_config(path, "server")
}
