//! Prometheus metrics for observability.
//!
//! The Store records counters and histograms through the `metrics` facade.
//! Nothing is exported until a recorder is installed; [`MetricsRecorder`]
//! installs the Prometheus recorder and renders the exposition text on demand.
//!
//! # Example
//!
//! ```rust,no_run
//! use storefront_runtime::metrics::MetricsRecorder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let recorder = MetricsRecorder::install()?;
//! // ... send actions ...
//! if let Some(text) = recorder.render() {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use thiserror::Error;

// Re-export metrics macros for use in feature crates
pub use metrics::{counter, gauge, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Installed Prometheus recorder.
#[derive(Clone, Default)]
pub struct MetricsRecorder {
    handle: Option<PrometheusHandle>,
}

impl std::fmt::Debug for MetricsRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsRecorder")
            .field("installed", &self.handle.is_some())
            .finish()
    }
}

impl MetricsRecorder {
    /// Describe the store metrics and install the Prometheus recorder.
    ///
    /// If a recorder is already installed (e.g. several tests in one process),
    /// the existing one keeps recording and the returned value has no handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the exporter cannot be built or installed.
    pub fn install() -> Result<Self, MetricsError> {
        register_metrics();

        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[0.000_01, 0.000_1, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                tracing::debug!("Prometheus metrics recorder installed");
                Ok(Self {
                    handle: Some(handle),
                })
            },
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(Self::default())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            },
        }
    }

    /// Render current metrics in Prometheus format.
    ///
    /// Returns `None` if this instance did not install the recorder.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all store metric descriptions.
fn register_metrics() {
    describe_counter!("store.commands.total", "Total number of actions sent to stores");
    describe_histogram!(
        "store.reducer.duration_seconds",
        "Time taken to execute reducers"
    );
    describe_counter!(
        "store.effects.executed",
        "Total number of effects executed, labelled by effect type"
    );
    describe_counter!(
        "store.shutdown.rejected_actions",
        "Actions rejected because the store was shutting down"
    );
}
