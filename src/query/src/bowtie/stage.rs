use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use common::error::CommonError;
use common::funnel::FunnelCategory;
use serde::Deserialize;
use serde::Serialize;

pub const STAGES_COUNT: usize = 7;

/// Stage of the bowtie model. Declaration order is the funnel order.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalStage {
    Prospects,
    Leads,
    Opportunities,
    Wins,
    Live,
    Customers,
    Growth,
}

impl CanonicalStage {
    pub const ALL: [CanonicalStage; STAGES_COUNT] = [
        CanonicalStage::Prospects,
        CanonicalStage::Leads,
        CanonicalStage::Opportunities,
        CanonicalStage::Wins,
        CanonicalStage::Live,
        CanonicalStage::Customers,
        CanonicalStage::Growth,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalStage::Prospects => "prospects",
            CanonicalStage::Leads => "leads",
            CanonicalStage::Opportunities => "opportunities",
            CanonicalStage::Wins => "wins",
            CanonicalStage::Live => "live",
            CanonicalStage::Customers => "customers",
            CanonicalStage::Growth => "growth",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CanonicalStage::Prospects => "Prospects",
            CanonicalStage::Leads => "Leads",
            CanonicalStage::Opportunities => "Opportunities",
            CanonicalStage::Wins => "Wins",
            CanonicalStage::Live => "Live",
            CanonicalStage::Customers => "Customers",
            CanonicalStage::Growth => "Growth",
        }
    }

    pub fn category(&self) -> FunnelCategory {
        match self {
            CanonicalStage::Prospects | CanonicalStage::Leads => FunnelCategory::Acquisition,
            CanonicalStage::Opportunities | CanonicalStage::Wins => FunnelCategory::Conversion,
            CanonicalStage::Live | CanonicalStage::Customers | CanonicalStage::Growth => {
                FunnelCategory::Retention
            }
        }
    }
}

impl fmt::Display for CanonicalStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalStage {
    type Err = CommonError;

    fn from_str(s: &str) -> common::Result<Self> {
        let name = s.trim().to_lowercase();
        CanonicalStage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == name)
            .ok_or_else(|| CommonError::BadRequest(format!("unknown stage {s:?}")))
    }
}

/// Manual classification overrides keyed by step id or lower-cased label/id.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct StageMap(HashMap<String, CanonicalStage>);

impl StageMap {
    pub fn new() -> Self {
        StageMap(HashMap::new())
    }

    pub fn from_json(data: &str) -> common::Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn insert(&mut self, key: impl Into<String>, stage: CanonicalStage) -> Option<CanonicalStage> {
        self.0.insert(key.into(), stage)
    }

    pub fn get(&self, key: &str) -> Option<CanonicalStage> {
        self.0.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, CanonicalStage)> for StageMap {
    fn from_iter<T: IntoIterator<Item = (K, CanonicalStage)>>(iter: T) -> Self {
        StageMap(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_and_index() {
        for (idx, stage) in CanonicalStage::ALL.iter().enumerate() {
            assert_eq!(stage.index(), idx);
        }
        assert!(CanonicalStage::Prospects < CanonicalStage::Growth);
        assert!(CanonicalStage::Wins < CanonicalStage::Live);
    }

    #[test]
    fn test_category() {
        assert_eq!(CanonicalStage::Leads.category(), FunnelCategory::Acquisition);
        assert_eq!(CanonicalStage::Wins.category(), FunnelCategory::Conversion);
        assert_eq!(CanonicalStage::Live.category(), FunnelCategory::Retention);
    }

    #[test]
    fn test_parse() {
        assert_eq!("growth".parse::<CanonicalStage>().unwrap(), CanonicalStage::Growth);
        assert_eq!(" Wins ".parse::<CanonicalStage>().unwrap(), CanonicalStage::Wins);
        assert!("unclassified".parse::<CanonicalStage>().is_err());
    }

    #[test]
    fn test_stage_map_from_json() {
        let map = StageMap::from_json(r#"{"x": "growth", "demo booked": "opportunities"}"#).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("x"), Some(CanonicalStage::Growth));
        assert_eq!(map.get("demo booked"), Some(CanonicalStage::Opportunities));
        assert_eq!(map.get("y"), None);

        assert!(StageMap::from_json(r#"{"x": "nowhere"}"#).is_err());
    }
}
