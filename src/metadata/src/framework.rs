use serde::Deserialize;
use serde::Serialize;

use crate::strategies::Layer;
use crate::strategies::TenantStrategy;
use crate::strategies::Unit;

/// A metric shown on a framework layer: either a bare label or a keyed metric
/// with an optional target.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum MetricItem {
    Label(String),
    Metric {
        key: String,
        label: String,
        #[serde(default)]
        target: Option<f64>,
        #[serde(default)]
        unit: Option<Unit>,
    },
}

impl MetricItem {
    pub fn label(&self) -> &str {
        match self {
            MetricItem::Label(label) => label,
            MetricItem::Metric { label, .. } => label,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TimeScale {
    RealTime,
    Weeks,
    Months,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkLayer {
    pub layer: Layer,
    pub title: String,
    pub time_scale: TimeScale,
    pub metrics: Vec<MetricItem>,
}

fn labels(items: &[&str]) -> Vec<MetricItem> {
    items
        .iter()
        .map(|v| MetricItem::Label(v.to_string()))
        .collect()
}

/// Operator dashboard layers, board level first.
pub fn default_layers() -> Vec<FrameworkLayer> {
    vec![
        FrameworkLayer {
            layer: Layer::L3,
            title: "Strategic growth".to_string(),
            time_scale: TimeScale::Months,
            metrics: labels(&[
                "Growth rate",
                "CAC payback",
                "LTV:CAC",
                "Rule of 40",
                "Magic number",
            ]),
        },
        FrameworkLayer {
            layer: Layer::L2,
            title: "Financial health".to_string(),
            time_scale: TimeScale::Months,
            metrics: labels(&["ARR / GRR / NRR", "LTV", "CPL / CAC / CTS", "GTM efficiency"]),
        },
        FrameworkLayer {
            layer: Layer::L1,
            title: "System behavior".to_string(),
            time_scale: TimeScale::Weeks,
            metrics: labels(&[
                "Velocity metrics",
                "Conversion rates",
                "Cycle time",
                "Loop metrics (k)",
            ]),
        },
        FrameworkLayer {
            layer: Layer::L0,
            title: "Data model".to_string(),
            time_scale: TimeScale::RealTime,
            metrics: labels(&[
                "Time metrics",
                "Volume metrics",
                "Cost metrics",
                "Atomic signals",
            ]),
        },
    ]
}

/// Metrics of one layer: the framework labels followed by the tenant's
/// targets on that layer.
pub fn layer_metrics(
    layers: &[FrameworkLayer],
    strategy: Option<&TenantStrategy>,
    layer: Layer,
) -> Vec<MetricItem> {
    let mut metrics = layers
        .iter()
        .filter(|l| l.layer == layer)
        .flat_map(|l| l.metrics.iter().cloned())
        .collect::<Vec<_>>();

    if let Some(strategy) = strategy {
        metrics.extend(
            strategy
                .targets
                .iter()
                .filter(|t| t.layer == layer)
                .map(|t| MetricItem::Metric {
                    key: t.metric_key.clone(),
                    label: t.label.clone(),
                    target: Some(t.target),
                    unit: Some(t.unit),
                }),
        );
    }

    metrics
}
