//! Log formatting shared by the backend binary and its libraries.
//!
//! [`init`] installs one global subscriber:
//! - `EnvFilter` from `RUST_LOG` (fallback passed by the caller)
//! - a compact application layer for every target except this crate
//! - [`layer`], which renders this crate's provider events with file:line and
//!   span-close timings

use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Crate target prefix used to route provider logs to [`layer`].
pub const TARGET_PREFIX: &str = "ai_llm_service";

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        w.write_str(&now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }
}

fn is_ours(target: &str) -> bool {
    target.starts_with(TARGET_PREFIX)
}

/// Formatting layer that renders ONLY events emitted by this crate.
///
/// Span close events are enabled so `#[instrument]`ed provider calls log
/// their duration.
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(io::stdout().is_terminal())
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(true))
        .with_filter(filter::filter_fn(|meta| is_ours(meta.target())))
}

/// Formatting layer for everything that is not covered by [`layer`].
pub fn app_layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_target(true)
        .with_ansi(io::stdout().is_terminal())
        .compact()
        .with_filter(filter::filter_fn(|meta| !is_ours(meta.target())))
}

/// Level directive for **this** library only, e.g. `ai_llm_service=debug`.
pub fn level_directive(level: Level) -> Directive {
    let s = format!("{TARGET_PREFIX}={}", level.as_str().to_lowercase());
    Directive::from_str(&s).unwrap_or_else(|_| filter::LevelFilter::INFO.into())
}

/// `EnvFilter` from `RUST_LOG` or `default`, plus a per-crate level for provider logs.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    base.add_directive(level_directive(level))
}

/// Installs the global subscriber.
///
/// # Errors
/// Fails if a global subscriber was already set.
pub fn init(default_filter: &str, provider_level: Level) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter_with_level(default_filter, provider_level))
        .with(app_layer())
        .with(layer())
        .try_init()
}
