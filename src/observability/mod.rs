use std::time::{Duration, Instant};

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;

/// Map a configured log level to a tracing filter directive.
///
/// - "DISABLED" -> `None` (no subscriber installed)
/// - "WARNING" -> WARN
/// - "CRITICAL" -> ERROR
/// - Others map directly (DEBUG, INFO, ERROR)
#[must_use]
pub fn level_directive(log_level: &str) -> Option<String> {
    let level = log_level.to_uppercase();
    match level.as_str() {
        "DISABLED" => None,
        "WARNING" => Some("WARN".to_string()),
        "CRITICAL" => Some("ERROR".to_string()),
        _ => Some(level),
    }
}

/// Initialize the tracing subscriber with the configured level and format.
pub fn init_tracing(log_level: &str, format: LogFormat) {
    let Some(directive) = level_directive(log_level) else {
        return;
    };

    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("INFO"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Log token usage for a completed messages request at INFO level.
pub fn log_request_usage(
    model: &str,
    input_tokens: u64,
    output_tokens: u64,
    stream: bool,
    duration: Duration,
) {
    info!(
        model = model,
        input_tokens = input_tokens,
        output_tokens = output_tokens,
        stream = stream,
        duration_seconds = duration.as_secs_f64(),
        "request completed"
    );
}

/// Log token usage, computing duration from start time.
pub fn log_request_complete(
    model: &str,
    input_tokens: u64,
    output_tokens: u64,
    stream: bool,
    start_time: Instant,
) {
    log_request_usage(model, input_tokens, output_tokens, stream, start_time.elapsed());
}
