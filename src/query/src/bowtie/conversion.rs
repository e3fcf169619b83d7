use common::funnel;
use serde::Deserialize;
use serde::Serialize;

use crate::bowtie::AggregatedStage;
use crate::bowtie::CanonicalStage;
use crate::bowtie::STAGES_COUNT;

pub const EDGES_COUNT: usize = STAGES_COUNT - 1;

pub const UNDEFINED_RATE: &str = "—";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ConversionEdge {
    pub from: CanonicalStage,
    pub to: CanonicalStage,
    /// `None` when the source stage is empty.
    pub rate: Option<f64>,
}

/// Conversion rate between each pair of adjacent stages in canonical order.
pub fn conversions(stages: &[AggregatedStage; STAGES_COUNT]) -> [ConversionEdge; EDGES_COUNT] {
    std::array::from_fn(|i| {
        let (from, to) = (&stages[i], &stages[i + 1]);
        ConversionEdge {
            from: CanonicalStage::ALL[i],
            to: CanonicalStage::ALL[i + 1],
            rate: if from.value > 0.0 {
                funnel::rate(to.value, from.value)
            } else {
                None
            },
        }
    })
}

/// Renders a rate with one decimal, or the undefined sentinel.
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(r) if r.is_finite() => format!("{r:.1}%"),
        _ => UNDEFINED_RATE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stages(values: [f64; STAGES_COUNT]) -> [AggregatedStage; STAGES_COUNT] {
        CanonicalStage::ALL.map(|key| {
            let mut stage = AggregatedStage::empty(key);
            stage.value = values[key.index()];
            stage
        })
    }

    #[test]
    fn test_edges_order() {
        let edges = conversions(&stages([0.0; STAGES_COUNT]));
        assert_eq!(edges.len(), 6);
        let pairs = edges.iter().map(|e| (e.from, e.to)).collect::<Vec<_>>();
        assert_eq!(pairs, vec![
            (CanonicalStage::Prospects, CanonicalStage::Leads),
            (CanonicalStage::Leads, CanonicalStage::Opportunities),
            (CanonicalStage::Opportunities, CanonicalStage::Wins),
            (CanonicalStage::Wins, CanonicalStage::Live),
            (CanonicalStage::Live, CanonicalStage::Customers),
            (CanonicalStage::Customers, CanonicalStage::Growth),
        ]);
        assert!(edges.iter().all(|e| e.rate.is_none()));
    }

    #[test]
    fn test_conversion_chain() {
        let edges = conversions(&stages([1000.0, 250.0, 50.0, 10.0, 0.0, 0.0, 0.0]));
        assert_eq!(edges[0].rate, Some(25.0));
        assert_eq!(edges[1].rate, Some(20.0));
        assert_eq!(edges[2].rate, Some(20.0));
        assert_eq!(edges[3].rate, Some(0.0));
        // nothing went live
        assert_eq!(edges[4].rate, None);
        assert_eq!(edges[5].rate, None);
    }

    #[test]
    fn test_empty_source_stage() {
        let edges = conversions(&stages([0.0, 250.0, 0.0, 0.0, 0.0, 0.0, 0.0]));
        assert_eq!(edges[0].rate, None);
        assert_eq!(format_rate(edges[0].rate), UNDEFINED_RATE);

        // negative counts are aggregated as-is but never yield a rate
        let edges = conversions(&stages([-5.0, 10.0, 0.0, 0.0, 0.0, 0.0, 0.0]));
        assert_eq!(edges[0].rate, None);
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(Some(25.0)), "25.0%");
        assert_eq!(format_rate(Some(33.333)), "33.3%");
        assert_eq!(format_rate(None), "—");
        assert_eq!(format_rate(Some(f64::INFINITY)), "—");
        assert_eq!(format_rate(Some(f64::NAN)), "—");
    }
}
