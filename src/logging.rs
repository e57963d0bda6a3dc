//! Logging initialisation shared by the binaries
//!
//! Console output goes to stderr so stdout stays free for command output.

use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

use crate::config::{LogFormat, LogTarget, LoggingConfig};

/// Initialise the global subscriber
///
/// Keep the returned guard alive for the lifetime of the process so file
/// output is flushed.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let console = match config.target {
        LogTarget::Console | LogTarget::Both => {
            Some(format_layer(&config.format, std::io::stderr))
        }
        LogTarget::File => None,
    };

    let (file, guard) = match config.target {
        LogTarget::File | LogTarget::Both => {
            let (writer, guard) = create_file_writer(config);
            (Some(format_layer(&config.format, writer)), Some(guard))
        }
        LogTarget::Console => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file)
        .init();

    guard
}

/// Create a file writer with optional daily rotation
fn create_file_writer(config: &LoggingConfig) -> (NonBlocking, WorkerGuard) {
    if let Err(e) = std::fs::create_dir_all(&config.log_dir) {
        eprintln!(
            "Warning: Failed to create log directory {:?}: {}",
            config.log_dir, e
        );
    }

    let file_appender = if config.daily_rotation {
        tracing_appender::rolling::daily(&config.log_dir, &config.log_prefix)
    } else {
        tracing_appender::rolling::never(&config.log_dir, &config.log_prefix)
    };

    tracing_appender::non_blocking(file_appender)
}

fn format_layer<S, W>(format: &LogFormat, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_writer(writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_writer(writer)
            .boxed(),
    }
}
