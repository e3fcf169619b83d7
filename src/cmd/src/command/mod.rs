use std::io::Write;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::Result;

pub mod bowtie;
pub mod funnel;
pub mod strategy;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Table,
    Json,
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;

    Ok(())
}

fn fmt_delta(delta: Option<f64>) -> String {
    match delta {
        Some(d) => format!("{d:+.1}%"),
        None => query::bowtie::conversion::UNDEFINED_RATE.to_string(),
    }
}
