use std::fs;
use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use common::funnel::steps_from_json;
use common::funnel::FunnelStep;
use query::bowtie::format_rate;
use query::funnel::custom_conversion;
use query::funnel::filter_cohort;
use query::funnel::step_conversions;
use query::funnel::summary;
use query::funnel::Cohort;
use query::funnel::StepConversion;
use query::funnel::Summary;
use serde::Serialize;
use tracing::debug;

use crate::command::write_json;
use crate::command::Format;
use crate::error::Error;
use crate::error::Result;

#[derive(Args, Clone, Debug)]
pub struct Funnel {
    /// JSON array of funnel steps
    #[arg(long)]
    pub input: PathBuf,
    /// all, acquisition or retention
    #[arg(long, default_value = "all")]
    pub cohort: Cohort,
    /// Start step id of a custom conversion
    #[arg(long, requires = "to")]
    pub from: Option<String>,
    /// End step id of a custom conversion
    #[arg(long, requires = "from")]
    pub to: Option<String>,
    #[arg(long, value_enum, default_value_t = Format::Table)]
    pub format: Format,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub cohort: Cohort,
    pub conversions: Vec<StepConversion>,
    pub custom: Option<StepConversion>,
    pub summary: Option<Summary>,
}

pub fn report(
    steps: &[FunnelStep],
    cohort: Cohort,
    custom: Option<(&str, &str)>,
) -> Result<Report> {
    let steps = filter_cohort(steps, cohort);
    let custom = match custom {
        Some((from, to)) => Some(custom_conversion(&steps, from, to).ok_or_else(|| {
            Error::NotFound(format!("steps {from:?} and {to:?} are not both in the cohort"))
        })?),
        None => None,
    };

    Ok(Report {
        cohort,
        conversions: step_conversions(&steps),
        custom,
        summary: summary(&steps),
    })
}

fn write_conversion<W: Write>(out: &mut W, c: &StepConversion) -> Result<()> {
    writeln!(
        out,
        "{:<32}{:>8}",
        format!("{} → {}", c.from_id, c.to_id),
        format_rate(c.rate)
    )?;

    Ok(())
}

pub fn write_table<W: Write>(report: &Report, out: &mut W) -> Result<()> {
    writeln!(out, "{:<32}{:>8}", "CONVERSION", "RATE")?;
    for c in &report.conversions {
        write_conversion(out, c)?;
    }
    if let Some(c) = &report.custom {
        writeln!(out)?;
        writeln!(out, "custom")?;
        write_conversion(out, c)?;
    }

    writeln!(out)?;
    match &report.summary {
        Some(s) => writeln!(
            out,
            "entered {} completed {} overall {}",
            s.entered,
            s.completed,
            format_rate(s.overall)
        )?,
        None => writeln!(out, "no steps")?,
    }

    Ok(())
}

pub fn run<W: Write>(args: &Funnel, out: &mut W) -> Result<()> {
    let steps = steps_from_json(&fs::read_to_string(&args.input)?)?;
    debug!(steps = steps.len(), cohort = ?args.cohort, "funnel loaded");

    let custom = args.from.as_deref().zip(args.to.as_deref());
    let report = report(&steps, args.cohort, custom)?;
    match args.format {
        Format::Table => write_table(&report, out),
        Format::Json => write_json(out, &report),
    }
}

#[cfg(test)]
mod tests {
    use common::funnel::FunnelCategory;

    use super::*;

    fn steps() -> Vec<FunnelStep> {
        vec![
            FunnelStep::new("1", "Awareness", 1000.0, 900.0, FunnelCategory::Acquisition),
            FunnelStep::new("2", "MQL", 250.0, 200.0, FunnelCategory::Acquisition),
            FunnelStep::new("3", "MRR1", 0.0, 10.0, FunnelCategory::Retention),
            FunnelStep::new("4", "MRR2", 500.0, 400.0, FunnelCategory::Retention),
        ]
    }

    #[test]
    fn test_report() {
        let res = report(&steps(), Cohort::All, Some(("2", "1"))).unwrap();
        assert_eq!(res.conversions.len(), 3);
        assert_eq!(res.conversions[0].rate, Some(25.0));
        assert_eq!(res.conversions[2].rate, None);
        assert_eq!(res.custom.unwrap().from_id, "1");
        assert_eq!(res.summary.unwrap().overall, Some(50.0));

        let res = report(&steps(), Cohort::Retention, None).unwrap();
        assert_eq!(res.conversions.len(), 1);
        assert_eq!(res.summary.unwrap().entered, 0.0);

        // step 1 is filtered out of the retention cohort
        assert!(matches!(
            report(&steps(), Cohort::Retention, Some(("1", "4"))),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_write_table() {
        let res = report(&steps(), Cohort::Acquisition, Some(("1", "2"))).unwrap();
        let mut out = Vec::new();
        write_table(&res, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        let lines = out.lines().collect::<Vec<_>>();

        assert_eq!(lines[1], format!("{:<32}{:>8}", "1 → 2", "25.0%"));
        assert_eq!(lines[3], "custom");
        assert_eq!(lines[6], "entered 1000 completed 250 overall 25.0%");

        let res = report(&[], Cohort::All, None).unwrap();
        let mut out = Vec::new();
        write_table(&res, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().ends_with("no steps\n"));
    }
}
