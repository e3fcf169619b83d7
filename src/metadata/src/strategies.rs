use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::RwLock;

use bincode::deserialize;
use bincode::serialize;
use chrono::DateTime;
use chrono::Utc;
use rocksdb::Transaction;
use rocksdb::TransactionDB;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::error::MetadataError;
use crate::metadata::ListResponse;
use crate::metadata::ResponseMetadata;
use crate::store::path_helpers::list;
use crate::store::path_helpers::make_data_value_key;
use crate::templates;
use crate::Result;

const NAMESPACE: &[u8] = b"strategies";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BusinessModel {
    B2b,
    B2c,
    Ecom,
    Saas,
}

impl BusinessModel {
    pub const ALL: [BusinessModel; 4] = [
        BusinessModel::B2b,
        BusinessModel::B2c,
        BusinessModel::Ecom,
        BusinessModel::Saas,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            BusinessModel::B2b => "b2b",
            BusinessModel::B2c => "b2c",
            BusinessModel::Ecom => "ecom",
            BusinessModel::Saas => "saas",
        }
    }
}

impl FromStr for BusinessModel {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self> {
        BusinessModel::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| MetadataError::BadRequest(format!("unknown business model {s}")))
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Maturity {
    Basic,
    Mid,
    Adv,
}

impl FromStr for Maturity {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "basic" => Ok(Maturity::Basic),
            "mid" => Ok(Maturity::Mid),
            "adv" => Ok(Maturity::Adv),
            _ => Err(MetadataError::BadRequest(format!("unknown maturity {s}"))),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuarterGoal {
    Revenue,
    Volume,
    Efficiency,
    Retention,
}

impl FromStr for QuarterGoal {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "revenue" => Ok(QuarterGoal::Revenue),
            "volume" => Ok(QuarterGoal::Volume),
            "efficiency" => Ok(QuarterGoal::Efficiency),
            "retention" => Ok(QuarterGoal::Retention),
            _ => Err(MetadataError::BadRequest(format!("unknown quarter goal {s}"))),
        }
    }
}

/// Operator framework layer, from atomic signals (L0) up to board level (L3).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    L0,
    L1,
    L2,
    L3,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "R$")]
    Currency,
    Count,
    Min,
    Days,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Unit::Percent => "%",
            Unit::Currency => "R$",
            Unit::Count => "count",
            Unit::Min => "min",
            Unit::Days => "days",
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub metric_key: String,
    pub label: String,
    pub layer: Layer,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub metric_key: String,
    pub label: String,
    pub layer: Layer,
    pub target: f64,
    pub unit: Unit,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TenantStrategy {
    pub tenant_id: String,
    pub model: BusinessModel,
    pub maturity: Maturity,
    pub quarter_goal: QuarterGoal,
    pub north_star: String,
    pub kpis: Vec<Kpi>,
    pub targets: Vec<Target>,
    pub playbooks: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublishStrategyRequest {
    pub tenant_id: String,
    pub model: BusinessModel,
    pub maturity: Maturity,
    pub quarter_goal: QuarterGoal,
}

fn validate_tenant_id(tenant_id: &str) -> Result<()> {
    if tenant_id.trim().is_empty() {
        return Err(MetadataError::BadRequest(
            "tenant id must not be empty".to_string(),
        ));
    }

    Ok(())
}

/// Per-tenant strategy repository.
pub trait Provider: Sync + Send {
    fn get(&self, tenant_id: &str) -> Result<Option<TenantStrategy>>;
    fn put(&self, strategy: TenantStrategy) -> Result<TenantStrategy>;
    fn delete(&self, tenant_id: &str) -> Result<TenantStrategy>;
    fn list(&self) -> Result<ListResponse<TenantStrategy>>;

    /// Builds the strategy from the model template and stores it, replacing
    /// any previous strategy of the tenant.
    fn publish(&self, req: PublishStrategyRequest) -> Result<TenantStrategy> {
        let strategy = templates::publish(
            req.tenant_id,
            req.model,
            req.maturity,
            req.quarter_goal,
        );
        self.put(strategy)
    }
}

pub struct ProviderImpl {
    db: Arc<TransactionDB>,
}

impl ProviderImpl {
    pub fn new(db: Arc<TransactionDB>) -> Self {
        ProviderImpl { db }
    }

    fn _get(&self, tx: &Transaction<TransactionDB>, tenant_id: &str) -> Result<Option<TenantStrategy>> {
        let key = make_data_value_key(NAMESPACE, tenant_id);

        match tx.get(key)? {
            None => Ok(None),
            Some(value) => Ok(Some(deserialize(&value)?)),
        }
    }
}

impl Provider for ProviderImpl {
    fn get(&self, tenant_id: &str) -> Result<Option<TenantStrategy>> {
        validate_tenant_id(tenant_id)?;
        let tx = self.db.transaction();

        self._get(&tx, tenant_id)
    }

    fn put(&self, strategy: TenantStrategy) -> Result<TenantStrategy> {
        validate_tenant_id(&strategy.tenant_id)?;
        let tx = self.db.transaction();

        let data = serialize(&strategy)?;
        tx.put(make_data_value_key(NAMESPACE, &strategy.tenant_id), data)?;
        tx.commit()?;

        debug!(tenant_id = %strategy.tenant_id, "strategy saved");
        Ok(strategy)
    }

    fn delete(&self, tenant_id: &str) -> Result<TenantStrategy> {
        validate_tenant_id(tenant_id)?;
        let tx = self.db.transaction();

        let strategy = self
            ._get(&tx, tenant_id)?
            .ok_or_else(|| MetadataError::NotFound("strategy not found".to_string()))?;
        tx.delete(make_data_value_key(NAMESPACE, tenant_id))?;
        tx.commit()?;

        debug!(tenant_id, "strategy deleted");
        Ok(strategy)
    }

    fn list(&self) -> Result<ListResponse<TenantStrategy>> {
        let tx = self.db.transaction();

        list(&tx, NAMESPACE)
    }
}

/// Keeps strategies in process memory. Useful for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryProvider {
    strategies: RwLock<BTreeMap<String, TenantStrategy>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Provider for MemoryProvider {
    fn get(&self, tenant_id: &str) -> Result<Option<TenantStrategy>> {
        validate_tenant_id(tenant_id)?;

        Ok(self.strategies.read()?.get(tenant_id).cloned())
    }

    fn put(&self, strategy: TenantStrategy) -> Result<TenantStrategy> {
        validate_tenant_id(&strategy.tenant_id)?;
        self.strategies
            .write()?
            .insert(strategy.tenant_id.clone(), strategy.clone());

        Ok(strategy)
    }

    fn delete(&self, tenant_id: &str) -> Result<TenantStrategy> {
        validate_tenant_id(tenant_id)?;

        self.strategies
            .write()?
            .remove(tenant_id)
            .ok_or_else(|| MetadataError::NotFound("strategy not found".to_string()))
    }

    fn list(&self) -> Result<ListResponse<TenantStrategy>> {
        Ok(ListResponse {
            data: self.strategies.read()?.values().cloned().collect(),
            meta: ResponseMetadata { next: None },
        })
    }
}
