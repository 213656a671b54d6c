//! Mind map generation.
//!
//! Builds a small Graphviz graph: the score at the root, one node holding
//! all strengths, one holding all weaknesses, and one node per suggestion.
//! Rendering pipes the DOT source through the `dot` binary.

use crate::error::AtsError;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

/// Default maximum label length in characters.
pub const DEFAULT_LABEL_MAX_CHARS: usize = 50;

const ROOT_ID: &str = "ATS";
const STRENGTHS_ID: &str = "Strengths";
const WEAKNESSES_ID: &str = "Weaknesses";

/// Cut `text` to `max_chars` characters and append `...` if it was longer.
pub fn truncate_label(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub shape: &'static str,
    pub color: &'static str,
    pub fill: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub label: &'static str,
}

/// A directed graph of the analysis results.
#[derive(Debug, Clone, Default)]
pub struct MindMap {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl MindMap {
    /// Lay out the score, findings and suggestions.
    pub fn build(
        score: f64,
        strengths: &[String],
        weaknesses: &[String],
        suggestions: &[String],
        max_chars: usize,
    ) -> Self {
        let mut map = MindMap::default();

        map.add_node(ROOT_ID, format!("ATS Score\n{:.2}%", score), "circle", "blue", "lightblue");
        map.add_node(
            STRENGTHS_ID,
            join_truncated(strengths, max_chars),
            "box",
            "green",
            "lightgreen",
        );
        map.add_node(
            WEAKNESSES_ID,
            join_truncated(weaknesses, max_chars),
            "box",
            "red",
            "lightcoral",
        );

        for (idx, suggestion) in suggestions.iter().enumerate() {
            let id = format!("Suggestion {}", idx + 1);
            map.add_node(&id, truncate_label(suggestion, max_chars), "ellipse", "orange", "gold");
            map.add_edge(ROOT_ID, &id, "Improve");
        }

        map.add_edge(ROOT_ID, STRENGTHS_ID, "Positive");
        map.add_edge(ROOT_ID, WEAKNESSES_ID, "Negative");

        map
    }

    fn add_node(
        &mut self,
        id: &str,
        label: String,
        shape: &'static str,
        color: &'static str,
        fill: &'static str,
    ) {
        self.nodes.push(Node {
            id: id.to_string(),
            label,
            shape,
            color,
            fill,
        });
    }

    fn add_edge(&mut self, from: &str, to: &str, label: &'static str) {
        self.edges.push(Edge {
            from: from.to_string(),
            to: to.to_string(),
            label,
        });
    }

    /// Graphviz DOT source for this map.
    pub fn to_dot(&self) -> String {
        let mut dot = String::new();

        dot.push_str("digraph \"Mind Map\" {\n");
        dot.push_str("\trankdir=TB\n");

        for node in &self.nodes {
            dot.push_str(&format!(
                "\t\"{}\" [label=\"{}\" color={} fillcolor={} shape={} style=filled]\n",
                escape(&node.id),
                escape(&node.label),
                node.color,
                node.fill,
                node.shape
            ));
        }

        for edge in &self.edges {
            dot.push_str(&format!(
                "\t\"{}\" -> \"{}\" [label=\"{}\"]\n",
                escape(&edge.from),
                escape(&edge.to),
                edge.label
            ));
        }

        dot.push_str("}\n");
        dot
    }
}

fn join_truncated(items: &[String], max_chars: usize) -> String {
    items
        .iter()
        .map(|item| truncate_label(item, max_chars))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape for a double-quoted DOT string. Newlines become `\n` line breaks.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            c => out.push(c),
        }
    }
    out
}

/// Render DOT source to `<stem>.<format>` with the Graphviz `dot` binary.
pub async fn render(
    dot_source: &str,
    stem: &str,
    format: &str,
    dot_bin: &str,
) -> Result<PathBuf, AtsError> {
    let output_path = PathBuf::from(format!("{}.{}", stem, format));
    debug!("Rendering mind map with {} to {}", dot_bin, output_path.display());

    let mut child = Command::new(dot_bin)
        .arg(format!("-T{}", format))
        .arg("-o")
        .arg(&output_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            AtsError::Render(format!(
                "failed to start '{}': {}. Is Graphviz installed?",
                dot_bin, e
            ))
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(dot_source.as_bytes())
            .await
            .map_err(|e| AtsError::Render(format!("failed to write DOT source: {}", e)))?;
    }

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| AtsError::Render(format!("failed to wait for {}: {}", dot_bin, e)))?;

    if !output.status.success() {
        return Err(AtsError::Render(format!(
            "{} exited with {}: {}",
            dot_bin,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    info!("Mind map written to {}", output_path.display());
    Ok(output_path)
}
