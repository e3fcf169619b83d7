use common::funnel;
use common::funnel::FunnelStep;
use serde::Deserialize;
use serde::Serialize;

use crate::bowtie::classify;
use crate::bowtie::CanonicalStage;
use crate::bowtie::StageMap;
use crate::bowtie::STAGES_COUNT;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedStage {
    pub key: CanonicalStage,
    pub value: f64,
    pub previous_value: f64,
    pub metric_label: String,
    pub sub_metric: Option<String>,
    pub source_ids: Vec<String>,
}

impl AggregatedStage {
    pub fn empty(key: CanonicalStage) -> Self {
        AggregatedStage {
            key,
            value: 0.0,
            previous_value: 0.0,
            metric_label: key.label().to_string(),
            sub_metric: None,
            source_ids: vec![],
        }
    }

    pub fn delta(&self) -> Option<f64> {
        funnel::delta(self.value, self.previous_value)
    }
}

fn first_non_empty<'a>(mut values: impl Iterator<Item = Option<&'a String>>) -> Option<String> {
    values.find_map(|v| v.filter(|s| !s.is_empty()).cloned())
}

/// Buckets steps into the seven bowtie stages. The result always holds every
/// stage in canonical order, zeroed when nothing was classified into it.
pub fn aggregate(steps: &[FunnelStep], overrides: Option<&StageMap>) -> [AggregatedStage; STAGES_COUNT] {
    let mut buckets: [Vec<&FunnelStep>; STAGES_COUNT] = std::array::from_fn(|_| Vec::new());
    for step in steps {
        buckets[classify(step, overrides).index()].push(step);
    }

    CanonicalStage::ALL.map(|key| {
        let bucket = &buckets[key.index()];
        let mut stage = AggregatedStage::empty(key);

        // f64 Sum starts from -0.0, keep empty stages at +0.0
        stage.value = bucket.iter().fold(0.0, |acc, s| acc + s.value);
        stage.previous_value = bucket.iter().fold(0.0, |acc, s| acc + s.previous_value);
        if let Some(label) = first_non_empty(bucket.iter().map(|s| s.metric_label.as_ref())) {
            stage.metric_label = label;
        }
        stage.sub_metric = first_non_empty(bucket.iter().map(|s| s.sub_metric.as_ref()));
        stage.source_ids = bucket.iter().map(|s| s.id.clone()).collect();

        stage
    })
}

#[cfg(test)]
mod tests {
    use common::funnel::FunnelCategory;

    use super::*;

    fn step(id: &str, label: &str, value: f64, previous_value: f64) -> FunnelStep {
        FunnelStep::new(id, label, value, previous_value, FunnelCategory::Acquisition)
    }

    fn mixed_steps() -> Vec<FunnelStep> {
        vec![
            step("1", "Website visits", 15241.0, 14000.0),
            step("2", "Email Signup", 4203.0, 3800.0),
            step("zzz", "???", 5.0, 5.0),
            step("5", "MQL", 501.0, 450.0),
            step("6", "SQL", 377.0, 320.0),
            step("7", "Deal won", 189.0, 150.0),
            step("8", "Onboarding", 95.0, 80.0),
            step("9", "Renewals", 70.0, 60.0),
            step("10", "Upsell", 35.0, 30.0),
            step("11", "Negative", -3.0, 2.0),
        ]
    }

    #[test]
    fn test_empty_input() {
        let stages = aggregate(&[], None);
        assert_eq!(stages.len(), 7);
        for (stage, key) in stages.iter().zip(CanonicalStage::ALL) {
            assert_eq!(stage.key, key);
            assert_eq!(stage.value, 0.0);
            assert!(stage.value.is_sign_positive());
            assert!(stage.previous_value.is_sign_positive());
            assert_eq!(stage.metric_label, key.label());
            assert_eq!(stage.sub_metric, None);
            assert!(stage.source_ids.is_empty());
            assert_eq!(stage.delta(), None);
        }
    }

    #[test]
    fn test_empty_stages_are_positive_zero() {
        let stages = aggregate(&[step("7", "Closed won", 20.0, 25.0)], None);
        let live = &stages[CanonicalStage::Live.index()];
        assert!(live.value.is_sign_positive());
        assert!(live.previous_value.is_sign_positive());
        assert_eq!(serde_json::to_value(live).unwrap()["value"].to_string(), "0.0");
        assert_eq!(live.value.to_string(), "0");

        let edges = crate::bowtie::conversions(&stages);
        assert_eq!(edges[3].from, CanonicalStage::Wins);
        assert_eq!(crate::bowtie::format_rate(edges[3].rate), "0.0%");
    }

    #[test]
    fn test_totality_and_conservation() {
        let steps = mixed_steps();
        let mut overrides = StageMap::new();
        overrides.insert("11", CanonicalStage::Customers);

        for map in [None, Some(&overrides)] {
            let stages = aggregate(&steps, map);
            let keys = stages.iter().map(|s| s.key).collect::<Vec<_>>();
            assert_eq!(keys, CanonicalStage::ALL.to_vec());

            let count: usize = stages.iter().map(|s| s.source_ids.len()).sum();
            assert_eq!(count, steps.len());

            let value: f64 = stages.iter().map(|s| s.value).sum();
            let expected: f64 = steps.iter().map(|s| s.value).sum();
            assert_eq!(value, expected);

            let prev: f64 = stages.iter().map(|s| s.previous_value).sum();
            let expected: f64 = steps.iter().map(|s| s.previous_value).sum();
            assert_eq!(prev, expected);
        }
    }

    #[test]
    fn test_deterministic() {
        let steps = mixed_steps();
        let overrides: StageMap = vec![("zzz", CanonicalStage::Growth)].into_iter().collect();
        assert_eq!(aggregate(&steps, Some(&overrides)), aggregate(&steps, Some(&overrides)));
        assert_eq!(aggregate(&steps, None), aggregate(&steps, None));
    }

    #[test]
    fn test_keyword_scenario() {
        let steps = vec![step("s1", "Email Signup", 100.0, 80.0)];
        let stages = aggregate(&steps, None);

        let leads = &stages[CanonicalStage::Leads.index()];
        assert_eq!(leads.value, 100.0);
        assert_eq!(leads.previous_value, 80.0);
        assert_eq!(leads.source_ids, vec!["s1".to_string()]);
        assert_eq!(leads.delta(), Some(25.0));

        for stage in stages.iter().filter(|s| s.key != CanonicalStage::Leads) {
            assert_eq!(stage.value, 0.0);
        }
    }

    #[test]
    fn test_fallback_scenario() {
        let steps = vec![step("zzz", "???", 5.0, 5.0)];
        let stages = aggregate(&steps, None);
        assert_eq!(stages[CanonicalStage::Leads.index()].source_ids, vec!["zzz".to_string()]);
    }

    #[test]
    fn test_multi_step() {
        let steps = vec![
            step("o1", "Opportunities created", 30.0, 25.0),
            step("d1", "Demo booked", 20.0, 15.0),
        ];
        let stages = aggregate(&steps, None);
        let opps = &stages[CanonicalStage::Opportunities.index()];
        assert_eq!(opps.value, 50.0);
        assert_eq!(opps.previous_value, 40.0);
        assert_eq!(opps.source_ids, vec!["o1".to_string(), "d1".to_string()]);
    }

    #[test]
    fn test_override_scenario() {
        let steps = vec![step("x", "random unmatched text", 7.0, 3.0)];
        let overrides: StageMap = vec![("x", CanonicalStage::Growth)].into_iter().collect();
        let stages = aggregate(&steps, Some(&overrides));
        assert_eq!(stages[CanonicalStage::Growth.index()].source_ids, vec!["x".to_string()]);
        assert!(stages[CanonicalStage::Leads.index()].source_ids.is_empty());
    }

    #[test]
    fn test_labels() {
        let mut a = step("a", "Demo booked", 1.0, 1.0);
        a.metric_label = Some("".to_string());
        let mut b = step("b", "Proposal sent", 1.0, 1.0);
        b.metric_label = Some("Proposals".to_string());
        b.sub_metric = Some("".to_string());
        let mut c = step("c", "Pipeline", 1.0, 1.0);
        c.metric_label = Some("Pipeline".to_string());
        c.sub_metric = Some("R$ 1.2M".to_string());

        let stages = aggregate(&[a, b, c], None);
        let opps = &stages[CanonicalStage::Opportunities.index()];
        assert_eq!(opps.metric_label, "Proposals");
        assert_eq!(opps.sub_metric.as_deref(), Some("R$ 1.2M"));
        assert_eq!(stages[CanonicalStage::Wins.index()].metric_label, "Wins");
    }
}
