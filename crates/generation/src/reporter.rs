//! Exception reporting sink.

use tracing::error;

/// Receives errors worth an operator's attention, tagged with identifiers.
pub trait ExceptionReporter: Send + Sync {
    fn capture(&self, error: &dyn std::error::Error, message: &str, tags: &[(&str, String)]);
}

/// Default reporter: one `error!` event per capture, tags rendered as `key=value` pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingExceptionReporter;

impl ExceptionReporter for TracingExceptionReporter {
    fn capture(&self, error: &dyn std::error::Error, message: &str, tags: &[(&str, String)]) {
        let tags = tags
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(" ");
        error!(error = %error, tags = %tags, "{}", message);
    }
}
