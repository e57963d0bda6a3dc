//! terraform-provider-stepca
//!
//! Loads the provider configuration, configures the step-ca client and, by
//! default, runs a connectivity check that reads the CA version and root
//! certificate through the same data sources the provider exposes.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{error, info, warn};

use stepca_provider::data_sources::DataSource;
use stepca_provider::logging::init_logging;
use stepca_provider::models::{Severity, StateResponse};
use stepca_provider::{AppConfig, StepCaProvider};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        return Ok(ExitCode::SUCCESS);
    }

    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        println!("terraform-provider-stepca {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(pos) = args.iter().position(|arg| arg == "--init-config") {
        let path = args
            .get(pos + 1)
            .map(PathBuf::from)
            .context("--init-config requires a path")?;
        AppConfig::create_default_config(&path)
            .with_context(|| format!("Failed to write default configuration to {:?}", path))?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let config = AppConfig::load().context("Failed to load configuration")?;
    let _log_guard = init_logging(&config.logging);

    info!("{} provider starting up", StepCaProvider::TYPE_NAME);

    let provider = StepCaProvider::configure(&config.provider)
        .context("Failed to configure the step-ca provider")?;

    check(&provider).await
}

#[derive(Serialize)]
struct CheckReport {
    ca_url: String,
    version: Option<String>,
    root_fingerprint: Option<String>,
}

/// Read the version and root certificate and print a JSON summary
async fn check(provider: &StepCaProvider) -> Result<ExitCode> {
    let version = provider.version_data_source().read(&()).await;
    let root = provider.ca_certificate_data_source().read(&()).await;

    let failed = report_diagnostics("stepca_version", &version)
        | report_diagnostics("stepca_ca_certificate", &root);

    let report = CheckReport {
        ca_url: provider
            .client()
            .map(|c| c.base_url().to_string())
            .unwrap_or_default(),
        version: version.state.map(|v| v.version),
        root_fingerprint: root.state.and_then(|r| r.fingerprint),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    if failed {
        Ok(ExitCode::FAILURE)
    } else {
        info!("CA check passed");
        Ok(ExitCode::SUCCESS)
    }
}

/// Log diagnostics; true when any of them is an error
fn report_diagnostics<T>(source: &str, response: &StateResponse<T>) -> bool {
    for diag in &response.diagnostics {
        match diag.severity {
            Severity::Warning => warn!(source, summary = %diag.summary, "{}", diag.detail),
            Severity::Error => error!(source, summary = %diag.summary, "{}", diag.detail),
        }
    }
    response.has_error()
}

fn print_help() {
    println!(
        r#"terraform-provider-stepca {}

USAGE:
    terraform-provider-stepca [OPTIONS]

With no options, loads the configuration, connects to the CA and prints its
version and root certificate fingerprint.

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information
    --init-config <PATH>    Write a default configuration file to PATH

ENVIRONMENT:
    STEPCA_PROVIDER_CONFIG  Path to configuration file
    STEPCA_CA_URL           CA base URL
    STEPCA_TOKEN            One-time token used for signing
    STEPCA_ADMIN_NAME       Admin subject
    STEPCA_ADMIN_KEY        Admin key path
    STEPCA_ADMIN_PROVISIONER
                            Provisioner the admin belongs to
    STEPCA_ADMIN_TOKEN      Bearer token for admin API calls
    RUST_LOG                Log filter (default: info)

CONFIGURATION:
    The configuration file is looked up in the following order:
    1. Path specified by STEPCA_PROVIDER_CONFIG
    2. ./config.yaml
    3. ./config/config.yaml
    4. /etc/stepca-provider/config.yaml
    5. <user config dir>/stepca-provider/config.yaml"#,
        env!("CARGO_PKG_VERSION")
    );
}
