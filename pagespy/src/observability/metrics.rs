//! Metrics collection for `PageSpy`.
//!
//! Prometheus-compatible counters for the tracker and sidebar. The recorder
//! is installed without an HTTP endpoint; `simulate --metrics` prints the
//! rendered exposition text after a run.

use std::sync::OnceLock;

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use pagespy_core::spy::Resolution;

use crate::error::PageSpyError;

/// Handle of the installed recorder.
static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Installs the global Prometheus recorder and returns its handle.
///
/// A second call returns the handle installed by the first.
///
/// # Errors
///
/// Returns `PageSpyError::Io` if the recorder cannot be installed (for
/// example when another recorder is already set).
pub fn init_metrics() -> Result<PrometheusHandle, PageSpyError> {
    if let Some(handle) = HANDLE.get() {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(handle.clone());
    }
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| PageSpyError::Io(std::io::Error::other(e.to_string())))?;
    describe_metrics();
    Ok(HANDLE.get_or_init(|| handle).clone())
}

/// Registers metric descriptions with the global recorder.
fn describe_metrics() {
    describe_counter!(
        "pagespy_visibility_batches_total",
        "Visibility batches resolved by the scroll spy"
    );
    describe_counter!(
        "pagespy_empty_batches_total",
        "Visibility batches with no intersecting section"
    );
    describe_counter!(
        "pagespy_active_changes_total",
        "Changes of the active section"
    );
    describe_counter!(
        "pagespy_sidebar_toggles_total",
        "Sidebar open and close transitions"
    );
    describe_gauge!(
        "pagespy_observed_sections",
        "Sections under visibility observation"
    );
}

/// Records one resolved visibility batch.
pub fn record_resolution(resolution: &Resolution) {
    counter!("pagespy_visibility_batches_total").increment(1);
    match resolution {
        Resolution::NoneVisible => counter!("pagespy_empty_batches_total").increment(1),
        Resolution::Changed { .. } => counter!("pagespy_active_changes_total").increment(1),
        Resolution::Unchanged { .. } => {}
    }
}

/// Records a sidebar transition.
pub fn record_sidebar_toggle(opened: bool) {
    let state = if opened { "open" } else { "closed" };
    counter!("pagespy_sidebar_toggles_total", "state" => state).increment(1);
}

/// Sets the number of observed sections.
#[allow(clippy::cast_precision_loss)]
pub fn set_observed_sections(count: usize) {
    gauge!("pagespy_observed_sections").set(count as f64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagespy_core::spy::ActiveChange;

    #[test]
    fn recording_without_recorder_is_noop() {
        record_resolution(&Resolution::NoneVisible);
        record_resolution(&Resolution::Changed {
            change: ActiveChange {
                previous: None,
                current: "modules".to_string(),
            },
            ratio: 0.5,
        });
        record_sidebar_toggle(true);
        set_observed_sections(3);
    }

    #[test]
    fn init_is_idempotent_and_renders_counters() {
        let first = init_metrics().unwrap();
        let second = init_metrics().unwrap();
        record_resolution(&Resolution::NoneVisible);
        let text = second.render();
        assert!(text.contains("pagespy_visibility_batches_total"));
        assert!(text.contains("pagespy_empty_batches_total"));
        drop(first);
    }
}
