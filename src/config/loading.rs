// configuration loading and merging logic

use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use tracing::{debug, info};

use super::types::{AppConfig, Cli};

/// load and merge configuration from multiple sources
/// precedence: defaults < config file < cli arguments
pub fn load_configuration(cli: &Cli) -> Result<AppConfig> {
    debug!("loading configuration with cli args: {:?}", cli);

    // start with default configuration
    let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

    // merge config file if provided
    if let Some(config_path) = &cli.config_file {
        if config_path.exists() {
            info!("loading config file: {}", config_path.display());
            figment = figment.merge(Toml::file(config_path));
        } else {
            anyhow::bail!("config file not found: {}", config_path.display());
        }
    }

    // merge cli overrides - highest precedence
    figment = apply_cli_overrides(figment, cli);

    // extract final configuration
    let config: AppConfig = figment.extract().context("failed to parse configuration")?;

    // validate configuration
    validate_configuration(&config)?;

    debug!("final configuration: {:?}", config);
    Ok(config)
}

/// merge the cli arguments the user actually provided
fn apply_cli_overrides(mut figment: Figment, cli: &Cli) -> Figment {
    if let Some(upload_dir) = &cli.upload_dir {
        figment = figment.merge(Serialized::defaults(upload_dir).key("server.upload_dir"));
    }
    if let Some(host) = &cli.host {
        figment = figment.merge(Serialized::defaults(host).key("server.host"));
    }
    if let Some(port) = cli.port {
        figment = figment.merge(Serialized::defaults(port).key("server.port"));
    }
    figment
}

/// validate configuration for consistency
fn validate_configuration(config: &AppConfig) -> Result<()> {
    let upload_dir = &config.server.upload_dir;

    if upload_dir.exists() {
        if !upload_dir.is_dir() {
            anyhow::bail!(
                "upload directory is not a directory: {}",
                upload_dir.display()
            );
        }
    } else if !config.upload.create_directories {
        anyhow::bail!(
            "upload directory does not exist and create_directories is false: {}",
            upload_dir.display()
        );
    }

    // validate port range
    if config.server.port == 0 {
        anyhow::bail!("port cannot be 0");
    }

    Ok(())
}
