// configuration type definitions

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// command line interface definition
#[derive(Parser, Debug, Clone)]
#[command(name = "upsink", version = env!("CARGO_PKG_VERSION"))]
#[command(about = "streaming multipart upload sink")]
pub struct Cli {
    /// directory where uploaded files are written
    pub upload_dir: Option<PathBuf>,

    /// host to listen on
    #[arg(short = 'l', long)]
    pub host: Option<String>,

    /// port to listen on
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// config file to use
    #[arg(short = 'c', long)]
    pub config_file: Option<PathBuf>,

    /// increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, action = clap::ArgAction::Count)]
    pub quiet: u8,
}

/// complete application configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upload: UploadConfig,
}

/// server configuration section
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
}

/// upload pipeline configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    #[serde(default = "default_max_section_size")]
    pub max_section_size: u64,
    #[serde(default = "default_buffered_body_limit")]
    pub buffered_body_limit: usize,
    #[serde(default)]
    pub create_directories: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            upload_dir: PathBuf::from("."),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_section_size: default_max_section_size(),
            buffered_body_limit: default_buffered_body_limit(),
            create_directories: false,
        }
    }
}

// default value functions for serde
fn default_max_section_size() -> u64 {
    u64::MAX // accept bodies of any representable size
}

fn default_buffered_body_limit() -> usize {
    700_000_000
}
