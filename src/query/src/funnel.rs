use std::str::FromStr;

use common::error::CommonError;
use common::funnel;
use common::funnel::FunnelCategory;
use common::funnel::FunnelStep;
use serde::Deserialize;
use serde::Serialize;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Cohort {
    #[default]
    All,
    Acquisition,
    Retention,
}

impl FromStr for Cohort {
    type Err = CommonError;

    fn from_str(s: &str) -> common::Result<Self> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Cohort::All),
            "acquisition" => Ok(Cohort::Acquisition),
            "retention" => Ok(Cohort::Retention),
            other => Err(CommonError::BadRequest(format!("unknown cohort {other:?}"))),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepConversion {
    pub from_id: String,
    pub to_id: String,
    pub rate: Option<f64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub entered: f64,
    pub completed: f64,
    pub overall: Option<f64>,
}

pub fn filter_cohort(steps: &[FunnelStep], cohort: Cohort) -> Vec<FunnelStep> {
    let category = match cohort {
        Cohort::All => return steps.to_vec(),
        Cohort::Acquisition => FunnelCategory::Acquisition,
        Cohort::Retention => FunnelCategory::Retention,
    };

    steps
        .iter()
        .filter(|s| s.category == category)
        .cloned()
        .collect()
}

pub fn step_conversions(steps: &[FunnelStep]) -> Vec<StepConversion> {
    steps
        .windows(2)
        .map(|w| StepConversion {
            from_id: w[0].id.clone(),
            to_id: w[1].id.clone(),
            rate: funnel::rate(w[1].value, w[0].value),
        })
        .collect()
}

/// Conversion between two arbitrary steps. The earlier step in the list is
/// always the start, whatever the argument order.
pub fn custom_conversion(steps: &[FunnelStep], a: &str, b: &str) -> Option<StepConversion> {
    let ia = steps.iter().position(|s| s.id == a)?;
    let ib = steps.iter().position(|s| s.id == b)?;
    let (start, end) = if ia <= ib {
        (&steps[ia], &steps[ib])
    } else {
        (&steps[ib], &steps[ia])
    };

    Some(StepConversion {
        from_id: start.id.clone(),
        to_id: end.id.clone(),
        rate: funnel::rate(end.value, start.value),
    })
}

pub fn summary(steps: &[FunnelStep]) -> Option<Summary> {
    let (first, last) = (steps.first()?, steps.last()?);

    Some(Summary {
        entered: first.value,
        completed: last.value,
        overall: funnel::rate(last.value, first.value),
    })
}
