//! Presentation of analysis results.
//!
//! This module draws the mind map and writes the text and JSON summaries.

pub mod generator;
pub mod mindmap;

pub use generator::{generate_summary_text, write_json_report};
pub use mindmap::{render, MindMap};
