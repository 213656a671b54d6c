//! Analysis pipeline.
//!
//! Parsing of single model responses, aggregation over repeated scoring
//! runs, and the follow-up suggestion request.

pub mod aggregator;
pub mod parser;
pub mod suggestions;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregator::Aggregator;
pub use suggestions::request_suggestions;
