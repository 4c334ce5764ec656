//! Configuration commands.

use std::path::Path;

use weekview_core::{UserClaims, resolve_timezone};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::secret::SecretRef;

/// Dump the current configuration to stdout.
///
/// A plain-text access token is never printed.
pub fn dump(config: &ClientConfig, path: &Path) -> ClientResult<()> {
    println!("# config.toml ({})", path.display());
    println!("{}", to_redacted_toml(config)?);
    Ok(())
}

fn to_redacted_toml(config: &ClientConfig) -> ClientResult<String> {
    let mut shown = config.clone();
    if let Some(ref token) = config.graph.access_token {
        shown.graph.access_token = Some(SecretRef::parse(token).to_string());
    }
    toml::to_string_pretty(&shown)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))
}

/// Validate the configuration.
pub fn validate(config: &ClientConfig) -> ClientResult<()> {
    let warnings = config.validate().map_err(ClientError::Config)?;
    for warning in &warnings {
        println!("warning: {}", warning);
    }

    if config.graph.access_token.is_some() {
        config
            .graph
            .resolve_access_token()
            .map_err(ClientError::Config)?;
        println!("Graph access token resolves.");
    }

    let claims = config.claims();
    println!(
        "Week view timezone: {}",
        resolve_timezone(claims.timezone()).name()
    );
    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path(path: &Path) -> ClientResult<()> {
    println!("config: {}", path.display());
    Ok(())
}
