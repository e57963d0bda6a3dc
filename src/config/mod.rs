//! Configuration management
//!
//! YAML-based configuration with support for:
//! - Environment variable overrides
//! - Multiple configuration file locations
//! - Default values for all optional settings
//!
//! The provider section is read once at start-up and is immutable afterwards;
//! every reconciler receives the client built from it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Local dummy CA used for acceptance runs
    #[serde(default)]
    pub dummy_ca: DummyCaConfig,
}

/// CA connection and credential configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Base URL of the CA, e.g. `https://ca.internal:9000`
    #[serde(default)]
    pub ca_url: String,
    /// One-time token embedded in `/sign` requests
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub admin_name: String,
    #[serde(default)]
    pub admin_key: String,
    #[serde(default)]
    pub admin_provisioner: Option<String>,
    /// Bearer token for admin API calls
    #[serde(default)]
    pub admin_token: Option<String>,
    /// Timeout in seconds (supports both timeout_secs and timeout field names)
    #[serde(default = "default_timeout", alias = "timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_ssl_verify")]
    pub ssl_verify: bool,
    /// Extra root certificate bundle (step-ca roots are usually private)
    #[serde(default)]
    pub ssl_ca: Option<PathBuf>,
}

fn default_timeout() -> u64 {
    30
}

fn default_ssl_verify() -> bool {
    true
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            ca_url: String::new(),
            token: String::new(),
            admin_name: String::new(),
            admin_key: String::new(),
            admin_provisioner: None,
            admin_token: None,
            timeout_secs: default_timeout(),
            ssl_verify: default_ssl_verify(),
            ssl_ca: None,
        }
    }
}

// Tokens and keys stay out of Debug output
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("ca_url", &self.ca_url)
            .field("token", &redact(&self.token))
            .field("admin_name", &self.admin_name)
            .field("admin_key", &redact(&self.admin_key))
            .field("admin_provisioner", &self.admin_provisioner)
            .field(
                "admin_token",
                &self.admin_token.as_deref().map(redact),
            )
            .field("timeout_secs", &self.timeout_secs)
            .field("ssl_verify", &self.ssl_verify)
            .field("ssl_ca", &self.ssl_ca)
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        ""
    } else {
        "[redacted]"
    }
}

impl ProviderConfig {
    /// Validate the provider block
    pub fn validate(&self) -> Result<()> {
        if self.ca_url.is_empty() {
            anyhow::bail!("CA URL cannot be empty");
        }
        if !(self.ca_url.starts_with("http://") || self.ca_url.starts_with("https://")) {
            anyhow::bail!("CA URL must start with http:// or https://: {}", self.ca_url);
        }
        if self.token.is_empty() {
            anyhow::bail!("Signing token cannot be empty");
        }
        if self.admin_name.is_empty() {
            anyhow::bail!("Admin name cannot be empty");
        }
        if self.admin_key.is_empty() {
            anyhow::bail!("Admin key cannot be empty");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("Timeout cannot be 0");
        }
        if let Some(ref ca) = self.ssl_ca {
            if !ca.exists() {
                anyhow::bail!("CA bundle not found: {:?}", ca);
            }
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    /// Log output target (console or file)
    #[serde(default = "default_log_target")]
    pub target: LogTarget,
    /// Directory for log files (used when target is "file" or "both")
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default = "default_log_prefix")]
    pub log_prefix: String,
    #[serde(default = "default_log_rotation")]
    pub daily_rotation: bool,
}

/// Log output target
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    /// Log to stderr
    #[default]
    Console,
    /// Log to file with optional rotation
    File,
    /// Log to both stderr and file
    Both,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

fn default_log_target() -> LogTarget {
    LogTarget::Console
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("./logs")
}

fn default_log_prefix() -> String {
    "stepca-provider".to_string()
}

fn default_log_rotation() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            target: default_log_target(),
            log_dir: default_log_dir(),
            log_prefix: default_log_prefix(),
            daily_rotation: default_log_rotation(),
        }
    }
}

/// Dummy CA listener configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DummyCaConfig {
    #[serde(default = "default_dummy_host")]
    pub host: String,
    #[serde(default = "default_dummy_port")]
    pub port: u16,
}

fn default_dummy_host() -> String {
    "127.0.0.1".to_string()
}

fn default_dummy_port() -> u16 {
    8080
}

impl Default for DummyCaConfig {
    fn default() -> Self {
        Self {
            host: default_dummy_host(),
            port: default_dummy_port(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values
    /// 2. Configuration file (YAML)
    /// 3. Environment variables (prefixed with STEPCA_)
    ///
    /// The provider block is not validated here; binaries that talk to a CA
    /// call [`ProviderConfig::validate`] themselves.
    pub fn load() -> Result<Self> {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        let config_path = std::env::var("STEPCA_PROVIDER_CONFIG")
            .map(PathBuf::from)
            .ok()
            .or_else(Self::find_config_file);

        let mut config = match config_path {
            Some(ref path) if path.exists() => {
                eprintln!("[CONFIG] Loading configuration from: {:?}", path);
                Self::from_file(path)?
            }
            Some(ref path) => {
                eprintln!("[CONFIG] Config file not found: {:?}, using defaults", path);
                AppConfig::default()
            }
            None => AppConfig::default(),
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Parse a YAML configuration file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_norway::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Find the configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            PathBuf::from("config.yaml"),
            PathBuf::from("config/config.yaml"),
            PathBuf::from("/etc/stepca-provider/config.yaml"),
            dirs::config_dir()
                .map(|p| p.join("stepca-provider/config.yaml"))
                .unwrap_or_default(),
        ];

        paths.into_iter().find(|p| p.exists())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Provider overrides
        if let Some(url) = lookup("STEPCA_CA_URL") {
            self.provider.ca_url = url;
        }
        if let Some(token) = lookup("STEPCA_TOKEN") {
            self.provider.token = token;
        }
        if let Some(name) = lookup("STEPCA_ADMIN_NAME") {
            self.provider.admin_name = name;
        }
        if let Some(key) = lookup("STEPCA_ADMIN_KEY") {
            self.provider.admin_key = key;
        }
        if let Some(provisioner) = lookup("STEPCA_ADMIN_PROVISIONER") {
            self.provider.admin_provisioner = Some(provisioner);
        }
        if let Some(token) = lookup("STEPCA_ADMIN_TOKEN") {
            self.provider.admin_token = Some(token);
        }
        if let Some(timeout) = lookup("STEPCA_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                self.provider.timeout_secs = t;
            }
        }
        if let Some(ca) = lookup("STEPCA_SSL_CA") {
            self.provider.ssl_ca = Some(PathBuf::from(ca));
        }
        if let Some(verify) = lookup("STEPCA_SSL_VERIFY") {
            self.provider.ssl_verify = verify.parse().unwrap_or(true);
        }

        // Logging overrides
        if let Some(level) = lookup("RUST_LOG") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("STEPCA_LOG_FORMAT") {
            self.logging.format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "compact" => LogFormat::Compact,
                _ => LogFormat::Pretty,
            };
        }
        if let Some(target) = lookup("STEPCA_LOG_TARGET") {
            self.logging.target = match target.to_lowercase().as_str() {
                "file" => LogTarget::File,
                "both" => LogTarget::Both,
                _ => LogTarget::Console,
            };
        }
        if let Some(dir) = lookup("STEPCA_LOG_DIR") {
            self.logging.log_dir = PathBuf::from(dir);
        }

        // Dummy CA overrides
        if let Some(host) = lookup("DUMMY_CA_HOST") {
            self.dummy_ca.host = host;
        }
        if let Some(port) = lookup("DUMMY_CA_PORT") {
            if let Ok(p) = port.parse() {
                self.dummy_ca.port = p;
            }
        }
    }

    /// Create a default configuration file
    pub fn create_default_config(path: &PathBuf) -> Result<()> {
        let mut config = AppConfig::default();
        config.provider.ca_url = "https://localhost:9000".to_string();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_norway::to_string(&config)?;
        std::fs::write(path, yaml)?;

        Ok(())
    }
}
