pub mod entities;
pub mod snapshot;

pub use snapshot::Snapshot;

// Re-export tracing so downstream crates share one version
pub use tracing;

/// Installs a stdout tracing subscriber for binaries embedding the engine.
/// The log level comes from the RUST_LOG environment variable.
#[cfg(not(test))]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt::format::FmtSpan;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_span_events(FmtSpan::CLOSE)
        .init();
}
