use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::workflows::ClockZone;

pub const CONFIG_FILE: &str = "report-desk.toml";
pub const RC_FILE: &str = ".report-desk-rc";
pub const ENV_PREFIX: &str = "REPORT_DESK";
pub const TOKEN_ENV: &str = "REPORT_DESK_TOKEN";

/// Main configuration structure for report-desk
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReportDeskConfig {
    /// Backend connection settings
    pub backend: BackendConfig,
    /// Status workflow settings
    pub workflow: WorkflowConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Base URL serving `/api/viewfile` and `/api/update-status`
    pub reports_url: String,
    /// Base URL serving `/invoices`
    pub invoices_url: String,
    /// Bearer token forwarded on every request (can be set via env var)
    pub token: Option<String>,
    /// Per-request timeout
    pub timeout_seconds: u64,
    /// Rate limiting settings
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Sustained requests per second
    pub requests_per_second: u32,
    /// Burst capacity
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 5,
            burst: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WorkflowConfig {
    /// Calendar used to reject future payment dates: "local" or "utc"
    pub clock: ClockZone,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is unset
    pub log_level: String,
    /// Emit JSON log lines instead of compact text
    pub json_logs: bool,
}

impl Default for ReportDeskConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig {
                reports_url: "http://localhost:8082".to_string(),
                invoices_url: "http://localhost:8080".to_string(),
                token: None, // Read from REPORT_DESK_TOKEN or a config file
                timeout_seconds: 30,
                rate_limit: RateLimitConfig::default(),
            },
            workflow: WorkflowConfig::default(),
            observability: ObservabilityConfig {
                log_level: "warn".to_string(),
                json_logs: false,
            },
        }
    }
}

impl ReportDeskConfig {
    /// Load configuration from the current directory. See [`Self::load_from`].
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files in `dir` (report-desk.toml, .report-desk-rc)
    /// 3. Environment variables (`REPORT_DESK_BACKEND__REPORTS_URL`, ...)
    pub fn load_from(dir: &Path) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        let config_file = dir.join(CONFIG_FILE);
        if config_file.exists() {
            builder = builder.add_source(File::from(config_file).format(config::FileFormat::Toml));
        }

        let rc_file = dir.join(RC_FILE);
        if rc_file.exists() {
            builder = builder.add_source(File::from(rc_file).format(config::FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut report_desk_config: ReportDeskConfig = builder.build()?.try_deserialize()?;

        if report_desk_config.backend.token.is_none() {
            if let Ok(token) = std::env::var(TOKEN_ENV) {
                report_desk_config.backend.token = Some(token);
            }
        }

        Ok(report_desk_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }

    /// Copy with the token masked, for display
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.backend.token.is_some() {
            copy.backend.token = Some("********".to_string());
        }
        copy
    }
}

/// Global configuration instance; `.env` must be loaded before first use
static CONFIG: std::sync::LazyLock<Result<ReportDeskConfig, anyhow::Error>> =
    std::sync::LazyLock::new(ReportDeskConfig::load);

/// Get the global configuration
pub fn config() -> Result<&'static ReportDeskConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}
