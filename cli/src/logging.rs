use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use simplenote_core::WIRE_TARGET;
use tracing::{warn, Level};
use tracing_subscriber::{
    filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// Diagnostics go to stderr (`RUST_LOG` wins over `--verbose`). With
/// `wire_log`, raw request traces also go to that file, truncated first.
pub fn setup_tracing(verbose: bool, wire_log: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            format!(
                "simplenote_core=debug,{crate_name}=debug",
                crate_name = env!("CARGO_CRATE_NAME")
            )
            .into()
        } else {
            "warn".into()
        }
    });

    // A log file we cannot create only costs us the traces.
    let (wire_file, wire_error) = match wire_log.map(File::create) {
        Some(Ok(file)) => (Some(file), None),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };
    let wire_layer = wire_file.map(|file| {
        fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .with_filter(Targets::new().with_target(WIRE_TARGET, Level::TRACE))
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .with(wire_layer)
        .init();

    if let (Some(path), Some(e)) = (wire_log, wire_error) {
        warn!(path = %path.display(), error = %e, "cannot create log file, traces are dropped");
    }
}
