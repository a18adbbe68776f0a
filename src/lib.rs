// Contribution: semantic contribution of a publication relative to the work
// it cites and the work that cites it.
//
// This is the library root. The engine runs text -> corpus -> vsm ->
// geometry, glued together by pipeline; pairwise is the citation-distance
// form of the measure. dataset, batch and output feed and present it.

pub mod batch;
pub mod config;
pub mod corpus;
pub mod dataset;
pub mod error;
pub mod geometry;
pub mod output;
pub mod pairwise;
pub mod pipeline;
pub mod text;
pub mod vsm;

pub use error::{ContributionError, Result};
pub use pipeline::{ContributionPipeline, ContributionReport};
