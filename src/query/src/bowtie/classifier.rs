use common::funnel::FunnelStep;
use lazy_static::lazy_static;
use regex::Regex;

use crate::bowtie::CanonicalStage;
use crate::bowtie::StageMap;

pub const FALLBACK_STAGE: CanonicalStage = CanonicalStage::Leads;

lazy_static! {
    // evaluated top to bottom, first match wins
    pub static ref STAGE_PATTERNS: Vec<(Regex, CanonicalStage)> = vec![
        (
            pattern(&["prospect", "visit", "session", "traffic", "audience", "impress"]),
            CanonicalStage::Prospects
        ),
        (
            pattern(&["lead", "mql", "signup", "capture"]),
            CanonicalStage::Leads
        ),
        (
            pattern(&["opport", "sql", "pipeline", "negotia", "proposal", "demo", "meeting"]),
            CanonicalStage::Opportunities
        ),
        (
            pattern(&["won", "win", "closed won", "payment approved", "deal won", "contract"]),
            CanonicalStage::Wins
        ),
        (
            pattern(&["onboard", "activ", "first value", "go live"]),
            CanonicalStage::Live
        ),
        (
            pattern(&["customer", "retention", "renew", "active", "churn"]),
            CanonicalStage::Customers
        ),
        (
            pattern(&["upsell", "cross", "expand", "growth", "upgrade"]),
            CanonicalStage::Growth
        ),
    ];
}

// Alternatives are anchored on a leading word boundary only, so "opport"
// matches "opportunities".
fn pattern(words: &[&str]) -> Regex {
    let alts = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");

    Regex::new(&format!(r"\b(?:{alts})")).unwrap()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    Override,
    Pattern,
    Fallback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    pub stage: CanonicalStage,
    pub source: Source,
}

pub fn classify(step: &FunnelStep, overrides: Option<&StageMap>) -> CanonicalStage {
    classify_detailed(step, overrides).stage
}

/// Like [`classify`], but also tells whether the stage came from an override,
/// a keyword pattern or the `leads` fallback.
pub fn classify_detailed(step: &FunnelStep, overrides: Option<&StageMap>) -> Classification {
    let id = step.id.to_lowercase();
    let label = step.label.to_lowercase();

    if let Some(overrides) = overrides {
        let found = overrides
            .get(&step.id)
            .or_else(|| overrides.get(&label))
            .or_else(|| overrides.get(&id));
        if let Some(stage) = found {
            return Classification {
                stage,
                source: Source::Override,
            };
        }
    }

    let text = format!("{id} {label}");
    match STAGE_PATTERNS.iter().find(|(re, _)| re.is_match(&text)) {
        Some((_, stage)) => Classification {
            stage: *stage,
            source: Source::Pattern,
        },
        None => Classification {
            stage: FALLBACK_STAGE,
            source: Source::Fallback,
        },
    }
}
