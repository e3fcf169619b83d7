//! Bowtie model: normalizes heterogeneous funnel steps into seven canonical
//! stages and computes stage-to-stage conversion.

pub mod aggregate;
pub mod classifier;
pub mod conversion;
pub mod stage;

pub use aggregate::aggregate;
pub use aggregate::AggregatedStage;
pub use classifier::classify;
pub use classifier::classify_detailed;
pub use classifier::Classification;
pub use classifier::Source;
pub use conversion::conversions;
pub use conversion::format_rate;
pub use conversion::ConversionEdge;
pub use stage::CanonicalStage;
pub use stage::StageMap;
pub use stage::STAGES_COUNT;
