use anyhow::{Context, Result};
use dotgraph::{convert_directory, ConvertError, ConverterConfig};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    init_tracing();
    info!("dotgraph v{}", dotgraph::version());

    let config = ConverterConfig::from_env().context("invalid configuration")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match convert_directory(&config, &mut out) {
        Ok(report) => {
            if report.is_empty() {
                info!("No DOT files found in {:?}", config.input_dir);
            }
            Ok(())
        }
        // Already reported on stdout
        Err(ConvertError::MissingInputDirectory(_)) => Ok(()),
        Err(err) => {
            error!("Batch aborted: {}", err);
            Err(err.into())
        }
    }
}

/// Log to stderr so stdout carries only the per-file lines.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
