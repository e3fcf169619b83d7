use chrono::Utc;
use lazy_static::lazy_static;
use serde::Deserialize;
use serde::Serialize;

use crate::strategies::BusinessModel;
use crate::strategies::Kpi;
use crate::strategies::Layer;
use crate::strategies::Maturity;
use crate::strategies::QuarterGoal;
use crate::strategies::Target;
use crate::strategies::TenantStrategy;
use crate::strategies::Unit;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TargetsByMaturity {
    pub basic: Vec<Target>,
    pub mid: Vec<Target>,
    pub adv: Vec<Target>,
}

impl TargetsByMaturity {
    pub fn get(&self, maturity: Maturity) -> &[Target] {
        match maturity {
            Maturity::Basic => &self.basic,
            Maturity::Mid => &self.mid,
            Maturity::Adv => &self.adv,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StrategyTemplate {
    pub model: BusinessModel,
    pub label: String,
    pub north_star: String,
    pub kpis: Vec<Kpi>,
    pub targets_by_maturity: TargetsByMaturity,
    pub playbooks: Vec<String>,
}

fn kpi(layer: Layer, metric_key: &str, label: &str) -> Kpi {
    Kpi {
        metric_key: metric_key.to_string(),
        label: label.to_string(),
        layer,
    }
}

fn target(layer: Layer, metric_key: &str, label: &str, target: f64, unit: Unit) -> Target {
    Target {
        metric_key: metric_key.to_string(),
        label: label.to_string(),
        layer,
        target,
        unit,
    }
}

fn playbooks(items: &[&str]) -> Vec<String> {
    items.iter().map(|v| v.to_string()).collect()
}

lazy_static! {
    static ref B2B: StrategyTemplate = StrategyTemplate {
        model: BusinessModel::B2b,
        label: "B2B (SDR + closer, consultative cycle)".to_string(),
        north_star: "Qualified SQLs / new revenue".to_string(),
        kpis: vec![
            kpi(Layer::L0, "dq_valid_rate", "% valid data"),
            kpi(Layer::L0, "utm_coverage", "UTM coverage"),
            kpi(Layer::L1, "leads", "Leads"),
            kpi(Layer::L1, "mql", "MQL"),
            kpi(Layer::L1, "sql", "SQL"),
            kpi(Layer::L1, "mql_to_sql", "MQL → SQL"),
            kpi(Layer::L1, "sla_first_contact", "First contact SLA"),
            kpi(Layer::L1, "cycle_days", "Cycle (days)"),
            kpi(Layer::L2, "cpl", "CPL"),
            kpi(Layer::L2, "cpsql", "Cost per SQL"),
            kpi(Layer::L2, "cac", "CAC"),
            kpi(Layer::L3, "growth_rate", "Growth rate"),
            kpi(Layer::L3, "ltv_cac", "LTV:CAC"),
            kpi(Layer::L3, "payback", "CAC payback"),
        ],
        targets_by_maturity: TargetsByMaturity {
            basic: vec![
                target(Layer::L0, "dq_valid_rate", "% valid data", 85.0, Unit::Percent),
                target(Layer::L1, "mql_to_sql", "MQL → SQL", 15.0, Unit::Percent),
                target(Layer::L1, "sla_first_contact", "First contact SLA", 60.0, Unit::Min),
                target(Layer::L1, "cycle_days", "Cycle (days)", 30.0, Unit::Days),
                target(Layer::L2, "cpl", "CPL", 30.0, Unit::Currency),
            ],
            mid: vec![
                target(Layer::L0, "dq_valid_rate", "% valid data", 92.0, Unit::Percent),
                target(Layer::L1, "mql_to_sql", "MQL → SQL", 22.0, Unit::Percent),
                target(Layer::L1, "sla_first_contact", "First contact SLA", 10.0, Unit::Min),
                target(Layer::L1, "cycle_days", "Cycle (days)", 21.0, Unit::Days),
                target(Layer::L2, "cpsql", "Cost per SQL", 120.0, Unit::Currency),
            ],
            adv: vec![
                target(Layer::L0, "dq_valid_rate", "% valid data", 97.0, Unit::Percent),
                target(Layer::L1, "mql_to_sql", "MQL → SQL", 28.0, Unit::Percent),
                target(Layer::L1, "sla_first_contact", "First contact SLA", 5.0, Unit::Min),
                target(Layer::L1, "cycle_days", "Cycle (days)", 14.0, Unit::Days),
                target(Layer::L3, "ltv_cac", "LTV:CAC", 3.0, Unit::Count),
            ],
        },
        playbooks: playbooks(&[
            "Define ICP, SQL qualification criteria and routing",
            "Multichannel cadence (email/chat/call) with SLAs and follow-ups",
            "Standardize pipeline stages with exit criteria per stage",
        ]),
    };

    static ref B2C: StrategyTemplate = StrategyTemplate {
        model: BusinessModel::B2c,
        label: "B2C (short cycle, service led)".to_string(),
        north_star: "Conversions / revenue".to_string(),
        kpis: vec![
            kpi(Layer::L0, "dq_valid_rate", "% valid data"),
            kpi(Layer::L1, "visits", "Visitors"),
            kpi(Layer::L1, "leads", "Signups/Leads"),
            kpi(Layer::L1, "lead_to_contact", "Lead → Contact"),
            kpi(Layer::L1, "contact_to_sale", "Contact → Sale"),
            kpi(Layer::L1, "first_response_time", "First response"),
            kpi(Layer::L2, "cpl", "CPL"),
            kpi(Layer::L2, "cac", "CAC"),
            kpi(Layer::L3, "growth_rate", "Growth rate"),
        ],
        targets_by_maturity: TargetsByMaturity {
            basic: vec![
                target(Layer::L0, "dq_valid_rate", "% valid data", 85.0, Unit::Percent),
                target(Layer::L1, "first_response_time", "First response", 30.0, Unit::Min),
                target(Layer::L1, "lead_to_contact", "Lead → Contact", 45.0, Unit::Percent),
            ],
            mid: vec![
                target(Layer::L0, "dq_valid_rate", "% valid data", 92.0, Unit::Percent),
                target(Layer::L1, "first_response_time", "First response", 5.0, Unit::Min),
                target(Layer::L1, "contact_to_sale", "Contact → Sale", 20.0, Unit::Percent),
            ],
            adv: vec![
                target(Layer::L0, "dq_valid_rate", "% valid data", 97.0, Unit::Percent),
                target(Layer::L1, "first_response_time", "First response", 2.0, Unit::Min),
                target(Layer::L2, "cac", "CAC", 150.0, Unit::Currency),
            ],
        },
        playbooks: playbooks(&[
            "Service scripts and objection handling per persona",
            "Follow-up automation and conversion recovery",
            "Intent segmentation (hot/warm/cold) and priorities",
        ]),
    };

    static ref ECOM: StrategyTemplate = StrategyTemplate {
        model: BusinessModel::Ecom,
        label: "E-commerce (DTC / online store)".to_string(),
        north_star: "GMV / margin".to_string(),
        kpis: vec![
            kpi(Layer::L0, "utm_coverage", "UTM coverage"),
            kpi(Layer::L1, "sessions", "Sessions"),
            kpi(Layer::L1, "atc_rate", "Session → Add-to-cart"),
            kpi(Layer::L1, "checkout_rate", "ATC → Checkout"),
            kpi(Layer::L1, "purchase_rate", "Session → Purchase"),
            kpi(Layer::L2, "aov", "Average order value"),
            kpi(Layer::L2, "roas", "ROAS"),
            kpi(Layer::L2, "mer", "MER"),
            kpi(Layer::L3, "ltv_cac", "LTV:CAC"),
        ],
        targets_by_maturity: TargetsByMaturity {
            basic: vec![
                target(Layer::L1, "purchase_rate", "Session → Purchase", 1.0, Unit::Percent),
                target(Layer::L2, "aov", "Average order value", 180.0, Unit::Currency),
                target(Layer::L2, "roas", "ROAS", 2.0, Unit::Count),
            ],
            mid: vec![
                target(Layer::L1, "purchase_rate", "Session → Purchase", 1.5, Unit::Percent),
                target(Layer::L2, "mer", "MER", 4.0, Unit::Count),
                target(Layer::L2, "roas", "ROAS", 3.0, Unit::Count),
            ],
            adv: vec![
                target(Layer::L1, "purchase_rate", "Session → Purchase", 2.0, Unit::Percent),
                target(Layer::L3, "ltv_cac", "LTV:CAC", 3.0, Unit::Count),
                target(Layer::L2, "mer", "MER", 6.0, Unit::Count),
            ],
        },
        playbooks: playbooks(&[
            "Cart and checkout recovery (flows and incentives)",
            "CRO (product page, shipping, social proof) with A/B tests",
            "Per-channel guardrails (ROAS/MER) and budget reallocation",
        ]),
    };

    static ref SAAS: StrategyTemplate = StrategyTemplate {
        model: BusinessModel::Saas,
        label: "SaaS (subscription)".to_string(),
        north_star: "New ARR + NRR".to_string(),
        kpis: vec![
            kpi(Layer::L0, "dq_valid_rate", "% valid data"),
            kpi(Layer::L1, "mql_to_sql", "MQL → SQL"),
            kpi(Layer::L1, "trial_to_paid", "Trial → Paid"),
            kpi(Layer::L1, "time_to_value", "Time-to-value"),
            kpi(Layer::L2, "cac", "CAC"),
            kpi(Layer::L3, "nrr", "NRR"),
            kpi(Layer::L3, "grr", "GRR"),
            kpi(Layer::L3, "payback", "CAC payback"),
        ],
        targets_by_maturity: TargetsByMaturity {
            basic: vec![
                target(Layer::L1, "trial_to_paid", "Trial → Paid", 15.0, Unit::Percent),
                target(Layer::L3, "grr", "GRR", 85.0, Unit::Percent),
            ],
            mid: vec![
                target(Layer::L1, "trial_to_paid", "Trial → Paid", 22.0, Unit::Percent),
                target(Layer::L3, "nrr", "NRR", 105.0, Unit::Percent),
                target(Layer::L3, "payback", "CAC payback", 6.0, Unit::Count),
            ],
            adv: vec![
                target(Layer::L1, "trial_to_paid", "Trial → Paid", 30.0, Unit::Percent),
                target(Layer::L3, "nrr", "NRR", 115.0, Unit::Percent),
                target(Layer::L3, "payback", "CAC payback", 4.0, Unit::Count),
            ],
        },
        playbooks: playbooks(&[
            "PQL scoring from product usage events and routing",
            "Onboarding with milestones and an activation playbook",
            "Health score, churn prevention and expansion",
        ]),
    };
}

pub fn template(model: BusinessModel) -> &'static StrategyTemplate {
    match model {
        BusinessModel::B2b => &*B2B,
        BusinessModel::B2c => &*B2C,
        BusinessModel::Ecom => &*ECOM,
        BusinessModel::Saas => &*SAAS,
    }
}

pub fn publish(
    tenant_id: String,
    model: BusinessModel,
    maturity: Maturity,
    quarter_goal: QuarterGoal,
) -> TenantStrategy {
    let tpl = template(model);

    TenantStrategy {
        tenant_id,
        model,
        maturity,
        quarter_goal,
        north_star: tpl.north_star.clone(),
        kpis: tpl.kpis.clone(),
        targets: tpl.targets_by_maturity.get(maturity).to_vec(),
        playbooks: tpl.playbooks.clone(),
        updated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue() {
        for model in BusinessModel::ALL {
            let tpl = template(model);
            assert_eq!(tpl.model, model);
            assert!(!tpl.kpis.is_empty());
            assert_eq!(tpl.playbooks.len(), 3);
            for maturity in [Maturity::Basic, Maturity::Mid, Maturity::Adv] {
                assert!(!tpl.targets_by_maturity.get(maturity).is_empty());
            }
        }
    }

    #[test]
    fn test_publish() {
        let s = publish("t1".to_string(), BusinessModel::B2b, Maturity::Mid, QuarterGoal::Revenue);
        assert_eq!(s.tenant_id, "t1");
        assert_eq!(s.north_star, "Qualified SQLs / new revenue");
        assert_eq!(s.kpis.len(), 14);
        assert_eq!(s.targets.len(), 5);
        assert_eq!(s.targets[1].metric_key, "mql_to_sql");
        assert_eq!(s.targets[1].target, 22.0);
        assert_eq!(s.targets[4].unit, Unit::Currency);

        let s = publish("t2".to_string(), BusinessModel::Saas, Maturity::Basic, QuarterGoal::Retention);
        assert_eq!(s.targets.len(), 2);
        assert_eq!(s.targets[1].metric_key, "grr");
        assert_eq!(s.quarter_goal, QuarterGoal::Retention);
    }
}
