//! Structured logging for request/response exchanges
//!
//! Every request the suite issues is logged through an [`Exchange`], so a
//! failing scenario can be read back from the log without re-running it.

use http::{Method, StatusCode};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::http::ApiRequest;

/// First segment of a request path (`pet` or `store`), logged as `endpoint`.
pub fn endpoint_group(path: &str) -> &str {
    path.trim_start_matches('/').split('/').next().unwrap_or_default()
}

/// One request on the wire, from dispatch to its outcome.
#[derive(Debug)]
pub struct Exchange {
    method: Method,
    path: String,
    query: String,
    sent_bytes: usize,
    started: Instant,
}

impl Exchange {
    /// Log the dispatch of `request` and start its clock.
    pub fn begin(request: &ApiRequest, sent_bytes: usize) -> Self {
        let query = request
            .query_pairs()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let exchange = Self {
            method: request.method().clone(),
            path: request.path().to_string(),
            query,
            sent_bytes,
            started: Instant::now(),
        };
        debug!(
            method = %exchange.method,
            endpoint = endpoint_group(&exchange.path),
            path = %exchange.path,
            query = %exchange.query,
            sent_bytes,
            "Sending request"
        );
        exchange
    }

    /// Time since dispatch.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Log the status the service answered with and return the elapsed time.
    ///
    /// Error statuses are logged at info level too: negative scenarios expect
    /// them.
    pub fn answered(&self, status: StatusCode, received_bytes: usize) -> Duration {
        let elapsed = self.elapsed();
        info!(
            method = %self.method,
            endpoint = endpoint_group(&self.path),
            path = %self.path,
            status = status.as_u16(),
            error_status = !status.is_success(),
            elapsed_ms = elapsed.as_millis(),
            sent_bytes = self.sent_bytes,
            received_bytes,
            "Response received"
        );
        elapsed
    }

    /// Log a request that never got an answer.
    pub fn unanswered(&self, error: &Error) {
        warn!(
            method = %self.method,
            endpoint = endpoint_group(&self.path),
            path = %self.path,
            elapsed_ms = self.elapsed().as_millis(),
            kind = %error.kind(),
            error = %error,
            "No response"
        );
    }
}

/// Install a `tracing-subscriber` formatter for test binaries.
///
/// Honors `RUST_LOG` and defaults to `info`. Calling it more than once is
/// harmless; only the first call installs a subscriber.
#[cfg(feature = "trace")]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
