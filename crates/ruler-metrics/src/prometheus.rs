//! Prometheus text exposition format.
//!
//! Renders a registry into the text exposition format for scraping, and
//! indexes gathered metric families by name so callers (and tests) can
//! look up individual series by their label set.

use std::collections::{BTreeMap, HashMap};

use prometheus::proto::{Metric, MetricFamily};
use prometheus::{Encoder, Registry, TextEncoder};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("failed to encode metrics: {0}")]
    Encode(#[from] prometheus::Error),

    #[error("exposition is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Render every family in `registry` as Prometheus text.
pub fn render_prometheus(registry: &Registry) -> Result<String, MetricsError> {
    let families = registry.gather();
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Gathered metric families keyed by family name.
#[derive(Debug, Default)]
pub struct MetricFamilyMap {
    families: HashMap<String, MetricFamily>,
}

impl MetricFamilyMap {
    /// Gather `registry` once and index the result.
    pub fn gather(registry: &Registry) -> Self {
        let families = registry
            .gather()
            .into_iter()
            .map(|mf| (mf.get_name().to_string(), mf))
            .collect();
        Self { families }
    }

    pub fn get(&self, name: &str) -> Option<&MetricFamily> {
        self.families.get(name)
    }

    /// Number of series in a family. Families with no series are not
    /// exported at all, so an absent family counts as zero.
    pub fn metric_count(&self, name: &str) -> usize {
        self.get(name).map_or(0, |mf| mf.get_metric().len())
    }

    /// Label sets of every series in a family, in exposition order.
    pub fn label_sets(&self, name: &str) -> Vec<BTreeMap<String, String>> {
        self.get(name)
            .map(|mf| mf.get_metric().iter().map(labels_of).collect())
            .unwrap_or_default()
    }

    /// Gauge value of the series whose label set is exactly `labels`.
    pub fn gauge_value(&self, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
        let wanted: BTreeMap<String, String> = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.get(name)?
            .get_metric()
            .iter()
            .find(|m| labels_of(m) == wanted)
            .map(|m| m.get_gauge().get_value())
    }
}

fn labels_of(metric: &Metric) -> BTreeMap<String, String> {
    metric
        .get_label()
        .iter()
        .map(|lp| (lp.get_name().to_string(), lp.get_value().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::{GaugeVec, Opts};

    const NAME: &str = "ruler_test_group";

    fn registry_with_gauge() -> (Registry, GaugeVec) {
        let registry = Registry::new();
        let opts = Opts::new(NAME, "Test gauge.");
        let gauge = GaugeVec::new(opts, &["user", "rule_group"]).unwrap();
        registry.register(Box::new(gauge.clone())).unwrap();
        (registry, gauge)
    }

    #[test]
    fn render_empty_registry() {
        let registry = Registry::new();
        let output = render_prometheus(&registry).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn render_labeled_gauge() {
        let (registry, gauge) = registry_with_gauge();
        gauge.with_label_values(&["user1", "/r/u1/ns1;g1"]).set(1.0);

        let output = render_prometheus(&registry).unwrap();
        assert!(output.contains("# HELP ruler_test_group Test gauge."));
        assert!(output.contains("# TYPE ruler_test_group gauge"));
        assert!(output.contains("rule_group=\"/r/u1/ns1;g1\""));
        assert!(output.contains("user=\"user1\""));
    }

    #[test]
    fn render_format_is_prometheus_compatible() {
        let (registry, gauge) = registry_with_gauge();
        gauge.with_label_values(&["a", "k1"]).set(1.0);
        gauge.with_label_values(&["b", "k2"]).set(1.0);

        let output = render_prometheus(&registry).unwrap();
        for line in output.lines() {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            assert!(
                line.contains('{') && line.contains('}'),
                "line should have labels: {line}"
            );
        }
    }

    #[test]
    fn family_map_lookups() {
        let (registry, gauge) = registry_with_gauge();
        gauge.with_label_values(&["user1", "k1"]).set(1.0);
        gauge.with_label_values(&["user2", "k2"]).set(1.0);

        let mfm = MetricFamilyMap::gather(&registry);
        assert_eq!(mfm.metric_count(NAME), 2);
        assert_eq!(
            mfm.gauge_value(NAME, &[("user", "user2"), ("rule_group", "k2")]),
            Some(1.0)
        );
        assert_eq!(
            mfm.gauge_value(NAME, &[("user", "user2"), ("rule_group", "k1")]),
            None
        );
        // A partial label set never matches.
        assert_eq!(mfm.gauge_value(NAME, &[("user", "user1")]), None);
        assert_eq!(mfm.label_sets(NAME).len(), 2);
    }

    #[test]
    fn family_map_missing_family_counts_zero() {
        let (registry, gauge) = registry_with_gauge();
        gauge.with_label_values(&["user1", "k1"]).set(1.0);
        gauge.remove_label_values(&["user1", "k1"]).unwrap();

        let mfm = MetricFamilyMap::gather(&registry);
        assert_eq!(mfm.metric_count(NAME), 0);
        assert_eq!(mfm.metric_count("does_not_exist"), 0);
        assert!(mfm.label_sets("does_not_exist").is_empty());
    }
}
