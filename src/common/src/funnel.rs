use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::CommonError;
use crate::Result;
use crate::PERCENT;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FunnelCategory {
    Acquisition,
    Conversion,
    Retention,
}

impl FunnelCategory {
    pub fn as_str(&self) -> &str {
        match self {
            FunnelCategory::Acquisition => "ACQUISITION",
            FunnelCategory::Conversion => "CONVERSION",
            FunnelCategory::Retention => "RETENTION",
        }
    }
}

impl fmt::Display for FunnelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FunnelCategory {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "ACQUISITION" => Ok(FunnelCategory::Acquisition),
            "CONVERSION" => Ok(FunnelCategory::Conversion),
            "RETENTION" => Ok(FunnelCategory::Retention),
            other => Err(CommonError::BadRequest(format!(
                "unknown funnel category {other:?}"
            ))),
        }
    }
}

/// One named step of a marketing-to-revenue funnel as supplied by a data source.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FunnelStep {
    pub id: String,
    pub label: String,
    pub value: f64,
    pub previous_value: f64,
    pub category: FunnelCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_metric: Option<String>,
    // visual hint for hourglass rendering, carried through as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl FunnelStep {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        value: f64,
        previous_value: f64,
        category: FunnelCategory,
    ) -> Self {
        FunnelStep {
            id: id.into(),
            label: label.into(),
            value,
            previous_value,
            category,
            metric_label: None,
            sub_metric: None,
            height: None,
        }
    }

    /// Period-over-period change in percent.
    pub fn delta(&self) -> Option<f64> {
        delta(self.value, self.previous_value)
    }
}

/// `to / from * 100`, or `None` when the ratio is undefined.
pub fn rate(to: f64, from: f64) -> Option<f64> {
    if from == 0.0 {
        return None;
    }

    let r = to / from * PERCENT;
    r.is_finite().then_some(r)
}

/// `(value - previous) / previous * 100`, or `None` when `previous` is zero.
pub fn delta(value: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }

    let d = (value - previous) / previous * PERCENT;
    d.is_finite().then_some(d)
}

pub fn steps_from_json(data: &str) -> Result<Vec<FunnelStep>> {
    Ok(serde_json::from_str(data)?)
}
