use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::cli::commands::Command;
use crate::config::ReportDeskConfig;

pub struct ShowConfigCommand {
    config: ReportDeskConfig,
}

impl ShowConfigCommand {
    pub fn new(config: ReportDeskConfig) -> Self {
        Self { config }
    }
}

impl Command for ShowConfigCommand {
    async fn execute(&self) -> Result<()> {
        print!("{}", toml::to_string_pretty(&self.config.redacted())?);
        Ok(())
    }
}

/// Writes a default configuration file
pub struct InitConfigCommand {
    path: PathBuf,
    force: bool,
}

impl InitConfigCommand {
    pub fn new(path: impl Into<PathBuf>, force: bool) -> Self {
        Self {
            path: path.into(),
            force,
        }
    }
}

impl Command for InitConfigCommand {
    async fn execute(&self) -> Result<()> {
        if self.path.exists() && !self.force {
            bail!(
                "{} already exists. Use --force to overwrite it.",
                self.path.display()
            );
        }

        ReportDeskConfig::default().save_to_file(&self.path)?;
        println!("✅ Wrote {}", self.path.display());
        println!("   💡 Set the bearer token with {}", crate::config::TOKEN_ENV);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report-desk.toml");
        std::fs::write(&path, "# mine\n").unwrap();

        let err = InitConfigCommand::new(&path, false).execute().await.unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        InitConfigCommand::new(&path, true).execute().await.unwrap();
        let loaded = ReportDeskConfig::load_from(dir.path()).unwrap();
        assert_eq!(loaded.backend.invoices_url, "http://localhost:8080");
    }
}
