pub mod bowtie;
pub mod funnel;

pub use bowtie::aggregate;
pub use bowtie::classify;
pub use bowtie::conversions;
pub use bowtie::AggregatedStage;
pub use bowtie::CanonicalStage;
pub use bowtie::ConversionEdge;
pub use bowtie::StageMap;
