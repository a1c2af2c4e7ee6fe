//! ruler-metrics — Prometheus plumbing for the ruler.
//!
//! # Architecture
//!
//! ```text
//! prometheus::Registry  ← gauges registered by ruler components
//!   ├── render_prometheus() → text/plain for a /metrics endpoint
//!   └── MetricFamilyMap::gather() → name-indexed families for inspection
//! ```

pub mod prometheus;

pub use self::prometheus::{MetricFamilyMap, MetricsError, render_prometheus};
