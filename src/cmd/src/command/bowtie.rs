use std::fs;
use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use common::funnel::steps_from_json;
use common::funnel::FunnelStep;
use query::bowtie::aggregate;
use query::bowtie::classify_detailed;
use query::bowtie::conversions;
use query::bowtie::format_rate;
use query::bowtie::AggregatedStage;
use query::bowtie::ConversionEdge;
use query::bowtie::Source;
use query::bowtie::StageMap;
use serde::Serialize;
use tracing::debug;
use tracing::warn;

use crate::command::fmt_delta;
use crate::command::write_json;
use crate::command::Format;
use crate::error::Result;

#[derive(Args, Clone, Debug)]
pub struct Bowtie {
    /// JSON array of funnel steps
    #[arg(long)]
    pub input: PathBuf,
    /// JSON object mapping step ids or labels to stages
    #[arg(long)]
    pub stage_map: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = Format::Table)]
    pub format: Format,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub stages: Vec<AggregatedStage>,
    pub conversions: Vec<ConversionEdge>,
    pub fallback_steps: usize,
}

pub fn report(steps: &[FunnelStep], overrides: Option<&StageMap>) -> Report {
    let fallback_steps = steps
        .iter()
        .filter(|s| classify_detailed(s, overrides).source == Source::Fallback)
        .count();
    if fallback_steps > 0 {
        warn!(
            fallback_steps,
            total = steps.len(),
            "steps without a stage match were counted as leads"
        );
    }

    let stages = aggregate(steps, overrides);
    let edges = conversions(&stages);

    Report {
        stages: stages.to_vec(),
        conversions: edges.to_vec(),
        fallback_steps,
    }
}

pub fn write_table<W: Write>(report: &Report, out: &mut W) -> Result<()> {
    writeln!(
        out,
        "{:<15}{:>12}{:>12}{:>12}  {:<24}SOURCES",
        "STAGE", "VALUE", "PREVIOUS", "DELTA", "METRIC"
    )?;
    for stage in &report.stages {
        writeln!(
            out,
            "{:<15}{:>12}{:>12}{:>12}  {:<24}{}",
            stage.key.as_str(),
            stage.value,
            stage.previous_value,
            fmt_delta(stage.delta()),
            stage.metric_label,
            stage.source_ids.join(",")
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{:<32}{:>8}", "CONVERSION", "RATE")?;
    for edge in &report.conversions {
        writeln!(
            out,
            "{:<32}{:>8}",
            format!("{} → {}", edge.from, edge.to),
            format_rate(edge.rate)
        )?;
    }

    Ok(())
}

pub fn run<W: Write>(args: &Bowtie, out: &mut W) -> Result<()> {
    let steps = steps_from_json(&fs::read_to_string(&args.input)?)?;
    let overrides = match &args.stage_map {
        Some(path) => Some(StageMap::from_json(&fs::read_to_string(path)?)?),
        None => None,
    };
    debug!(
        steps = steps.len(),
        overrides = overrides.as_ref().map(|m| m.len()).unwrap_or_default(),
        "funnel loaded"
    );

    let report = report(&steps, overrides.as_ref());
    match args.format {
        Format::Table => write_table(&report, out),
        Format::Json => write_json(out, &report),
    }
}
