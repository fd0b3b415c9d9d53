//! Service configuration from command-line flags and environment variables.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Run mode of the service.
///
/// Selects the default log verbosity when `RUST_LOG` is not set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RunMode {
    /// Verbose logging, route table printed at startup.
    Debug,
    /// Informational logging.
    #[default]
    Release,
    /// Warnings and errors only.
    Test,
}

impl RunMode {
    /// Name of the mode as accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Debug => "debug",
            RunMode::Release => "release",
            RunMode::Test => "test",
        }
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            RunMode::Debug => "ipgeo=debug,ipgeo_service=debug,tower_http=debug",
            RunMode::Release => "ipgeo=info,ipgeo_service=info,tower_http=info",
            RunMode::Test => "warn",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// IP geolocation HTTP service
#[derive(Debug, Clone, Parser)]
#[command(name = "ipgeo-service")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Server run mode
    #[arg(long, env = "MODE", value_enum, default_value_t = RunMode::Release)]
    pub mode: RunMode,

    /// HTTP server port
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Path to the MaxMind City database (.mmdb)
    #[arg(short, long, env = "GEO_FILE")]
    pub geo_file: PathBuf,
}

impl Config {
    /// Address the listener binds to (all interfaces).
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
