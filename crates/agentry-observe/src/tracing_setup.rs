//! Tracing initialization for the agentry binary.
//!
//! Diagnostics go to stderr; stdout belongs to the conversation transcript.
//! Span export over OpenTelemetry is opt-in and prints to stdout for local
//! inspection.
//!
//! # Usage
//!
//! ```no_run
//! agentry_observe::tracing_setup::init_tracing(false, "warn").unwrap();
//! // ... run the turn ...
//! agentry_observe::tracing_setup::shutdown_tracing();
//! ```

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use std::sync::OnceLock;

/// Stores the OTel tracer provider so it can be shut down cleanly on exit.
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Install the global subscriber: an `EnvFilter` built from `RUST_LOG` with
/// `default_filter` as the fallback, an stderr `fmt` layer with span close
/// timing, and, when `enable_otel` is set, an OpenTelemetry bridge with a
/// stdout span exporter.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init_tracing(
    enable_otel: bool,
    default_filter: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE);

    // One process serves one turn, so spans are exported unbatched and the
    // final flush happens in shutdown_tracing rather than on a batch timer.
    let otel_layer = enable_otel.then(|| {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer("agentry");
        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);
        tracing_opentelemetry::layer().with_tracer(tracer)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()?;

    Ok(())
}

/// Flush pending spans and shut down the OTel tracer provider.
///
/// Safe to call when OTel was never enabled (no-op in that case).
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: OTel tracer provider shutdown error: {e}");
        }
    }
}
