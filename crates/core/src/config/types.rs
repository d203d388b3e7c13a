use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::archiver::ArchiverConfig;
use crate::converter::ConverterConfig;
use crate::retention::RetentionConfig;
use crate::storage::StorageConfig;
use crate::worker::JobsConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Echo converter output to the service log and default to debug logging.
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub archiver: ArchiverConfig,
    #[serde(default)]
    pub retention: RetentionConfig,
    #[serde(default)]
    pub jobs: JobsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served at `/` (index.html) and `/static/*`.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    /// Largest accepted request body.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_max_upload_bytes() -> usize {
    100 * 1024 * 1024 // 100 MiB
}
