//! Server configuration from command-line flags and the environment.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::Parser;
use zip_starter_core::FetchConfig;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3000;

/// zip-starter server: POST a JSON document, get a starter archive back
#[derive(Debug, Clone, Parser)]
#[command(name = "zip-starter-server")]
#[command(version, about, long_about = None)]
pub struct ServerConfig {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "STARTER_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Give up on remote documents after this many seconds (no limit if unset)
    #[arg(long, env = "STARTER_FETCH_TIMEOUT_SECS", value_name = "SECS")]
    pub fetch_timeout_secs: Option<u64>,

    /// Reject remote documents larger than this many bytes (no limit if unset)
    #[arg(long, env = "STARTER_MAX_FETCH_BYTES", value_name = "BYTES")]
    pub max_fetch_bytes: Option<u64>,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout: self.fetch_timeout_secs.map(Duration::from_secs),
            max_body_bytes: self.max_fetch_bytes,
        }
    }
}
