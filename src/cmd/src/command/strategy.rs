use std::fs;
use std::io::Write;
use std::sync::Arc;

use clap::Args;
use clap::Subcommand;
use common::config::Config;
use common::DATA_PATH_METADATA;
use metadata::framework::default_layers;
use metadata::framework::layer_metrics;
use metadata::framework::FrameworkLayer;
use metadata::strategies::BusinessModel;
use metadata::strategies::Maturity;
use metadata::strategies::PublishStrategyRequest;
use metadata::strategies::QuarterGoal;
use metadata::templates::template;
use metadata::MetadataProvider;
use tracing::debug;
use tracing::info;

use crate::command::write_json;
use crate::error::Error;
use crate::error::Result;

#[derive(Args, Clone, Debug)]
pub struct Strategy {
    #[command(subcommand)]
    pub cmd: StrategyCommand,
}

#[derive(Subcommand, Clone, Debug)]
pub enum StrategyCommand {
    /// Print the template of a business model
    Template {
        #[arg(long)]
        model: BusinessModel,
    },
    /// Build a tenant strategy from its model template and store it
    Publish {
        #[arg(long)]
        tenant: String,
        #[arg(long)]
        model: BusinessModel,
        #[arg(long, default_value = "basic")]
        maturity: Maturity,
        #[arg(long, default_value = "revenue")]
        goal: QuarterGoal,
    },
    Show {
        #[arg(long)]
        tenant: String,
    },
    List,
    Delete {
        #[arg(long)]
        tenant: String,
    },
    /// Print the framework layers with the tenant's targets merged in
    Framework {
        #[arg(long)]
        tenant: Option<String>,
    },
}

pub fn open(cfg: &Config) -> Result<MetadataProvider> {
    let path = cfg.data.path.join(DATA_PATH_METADATA);
    debug!("metadata path: {:?}", path);
    fs::create_dir_all(&path)?;

    let db = Arc::new(metadata::rocksdb::new(path)?);
    Ok(MetadataProvider::try_new(db)?)
}

pub fn run<W: Write>(md: &MetadataProvider, cmd: &StrategyCommand, out: &mut W) -> Result<()> {
    match cmd {
        StrategyCommand::Template { model } => write_json(out, template(*model)),
        StrategyCommand::Publish {
            tenant,
            model,
            maturity,
            goal,
        } => {
            let strategy = md.strategies.publish(PublishStrategyRequest {
                tenant_id: tenant.clone(),
                model: *model,
                maturity: *maturity,
                quarter_goal: *goal,
            })?;
            info!(
                tenant_id = %strategy.tenant_id,
                model = strategy.model.as_str(),
                "strategy published"
            );

            write_json(out, &strategy)
        }
        StrategyCommand::Show { tenant } => match md.strategies.get(tenant)? {
            Some(strategy) => write_json(out, &strategy),
            None => Err(Error::NotFound(format!("no strategy for tenant {tenant:?}"))),
        },
        StrategyCommand::List => write_json(out, &md.strategies.list()?),
        StrategyCommand::Delete { tenant } => {
            let strategy = md.strategies.delete(tenant)?;
            info!(tenant_id = %strategy.tenant_id, "strategy deleted");

            write_json(out, &strategy)
        }
        StrategyCommand::Framework { tenant } => {
            let strategy = match tenant {
                Some(tenant) => md.strategies.get(tenant)?,
                None => None,
            };
            let layers = default_layers();
            let merged = layers
                .iter()
                .map(|l| FrameworkLayer {
                    metrics: layer_metrics(&layers, strategy.as_ref(), l.layer),
                    ..l.clone()
                })
                .collect::<Vec<_>>();

            write_json(out, &merged)
        }
    }
}

#[cfg(test)]
mod tests {
    use metadata::error::MetadataError;
    use serde_json::Value;

    use super::*;

    fn exec(md: &MetadataProvider, cmd: StrategyCommand) -> Result<Value> {
        let mut out = Vec::new();
        run(md, &cmd, &mut out)?;

        Ok(serde_json::from_slice(&out)?)
    }

    #[test]
    fn test_strategy_commands() -> Result<()> {
        let md = MetadataProvider::new_memory();

        let v = exec(&md, StrategyCommand::Template {
            model: BusinessModel::Saas,
        })?;
        assert_eq!(v["model"], "saas");

        let v = exec(&md, StrategyCommand::Publish {
            tenant: "acme".to_string(),
            model: BusinessModel::B2b,
            maturity: Maturity::Mid,
            goal: QuarterGoal::Volume,
        })?;
        assert_eq!(v["tenantId"], "acme");
        assert_eq!(v["quarterGoal"], "volume");
        assert_eq!(v["targets"][1]["metricKey"], "mql_to_sql");

        let v = exec(&md, StrategyCommand::Show {
            tenant: "acme".to_string(),
        })?;
        assert_eq!(v["model"], "b2b");

        let v = exec(&md, StrategyCommand::List)?;
        assert_eq!(v["data"].as_array().map(|a| a.len()), Some(1));

        let v = exec(&md, StrategyCommand::Framework {
            tenant: Some("acme".to_string()),
        })?;
        assert_eq!(v[0]["layer"], "L3");
        assert_eq!(v[3]["timeScale"], "realTime");

        exec(&md, StrategyCommand::Delete {
            tenant: "acme".to_string(),
        })?;
        assert!(matches!(
            exec(&md, StrategyCommand::Show {
                tenant: "acme".to_string(),
            }),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            exec(&md, StrategyCommand::Delete {
                tenant: "acme".to_string(),
            }),
            Err(Error::Metadata(MetadataError::NotFound(_)))
        ));

        Ok(())
    }

    #[test]
    fn test_framework_without_tenant() -> Result<()> {
        let md = MetadataProvider::new_memory();
        let v = exec(&md, StrategyCommand::Framework { tenant: None })?;

        assert_eq!(v.as_array().map(|a| a.len()), Some(4));
        assert_eq!(v[2]["metrics"][0], "Velocity metrics");
        Ok(())
    }
}
