//! One-shot CLI commands

use anyhow::{Context, Result, bail};

use crate::api::jwt::JwtService;
use crate::config::StaticConfig;

/// Print a sample configuration, or write it to `output_path`
pub fn run_generate_config(output_path: Option<&str>) -> Result<()> {
    match output_path {
        Some(path) => {
            StaticConfig::default()
                .save_to_file(path)
                .map_err(|e| anyhow::anyhow!("{}", e))
                .with_context(|| format!("Failed to write {}", path))?;
            println!("Configuration written to {}", path);
        }
        None => println!("{}", StaticConfig::generate_sample_config()),
    }
    Ok(())
}

/// Mint a bearer token for `user` with the configured secret
pub fn run_issue_token(config: &StaticConfig, user: &str) -> Result<String> {
    if config.auth.jwt_secret.is_empty() {
        bail!("auth.jwt_secret is not set; set it in the config file or LH__AUTH__JWT_SECRET");
    }
    if user.trim().is_empty() {
        bail!("--user must not be empty");
    }
    JwtService::from_config(&config.auth)
        .issue_token(user)
        .context("Failed to sign token")
}
