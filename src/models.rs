//! Data models for the resume analyzer.
//!
//! This module contains the structures that flow between the parser,
//! the aggregator, the suggestion request and the presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The structured fields pulled out of a single model response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedRun {
    /// ATS score in [0, 100], if the response contained a usable score line.
    pub score: Option<f64>,
    /// Bullet items listed under the strengths header, in response order.
    pub strengths: Vec<String>,
    /// Bullet items listed under the weaknesses header, in response order.
    pub weaknesses: Vec<String>,
}

/// Combined result of all scoring runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Mean of the scored runs, or 0 when no run produced a score.
    pub average_score: f64,
    /// Strengths from every run, concatenated in call order.
    pub strengths: Vec<String>,
    /// Weaknesses from every run, concatenated in call order.
    pub weaknesses: Vec<String>,
    /// Number of runs performed.
    pub runs: usize,
    /// Number of runs that yielded a score.
    pub scored_runs: usize,
}

impl AggregateResult {
    /// Strengths followed by weaknesses, one per line.
    pub fn findings_text(&self) -> String {
        self.strengths
            .iter()
            .chain(self.weaknesses.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Improvement suggestions, either as raw model text or pre-split items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Suggestions {
    Text(String),
    List(Vec<String>),
}

impl Suggestions {
    /// Returns the individual suggestions.
    ///
    /// Text is split on numbered lines (`1.` or `1)`), with the number
    /// stripped. Continuation lines are appended to the preceding item.
    /// Text without any numbered line falls back to one item per non-empty line.
    pub fn items(&self) -> Vec<String> {
        match self {
            Suggestions::List(items) => items
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Suggestions::Text(text) => split_suggestion_text(text),
        }
    }
}

fn split_suggestion_text(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if !lines.iter().any(|l| strip_number_prefix(l).is_some()) {
        return lines.into_iter().map(String::from).collect();
    }

    let mut items: Vec<String> = Vec::new();
    for line in lines {
        if let Some(rest) = strip_number_prefix(line) {
            items.push(rest.to_string());
        } else if let Some(last) = items.last_mut() {
            last.push(' ');
            last.push_str(line);
        }
        // Preamble before the first numbered line is dropped.
    }

    items.retain(|s| !s.is_empty());
    items
}

/// Strips a leading `N.` or `N)` marker, returning the remaining text.
fn strip_number_prefix(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = &line[digits..];
    rest.strip_prefix('.')
        .or_else(|| rest.strip_prefix(')'))
        .map(str::trim)
}

/// Metadata about one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Resume file that was analyzed.
    pub resume_file: String,
    /// Date and time of the analysis.
    pub analysis_date: DateTime<Utc>,
    /// Name of the LLM model used.
    pub model_used: String,
    /// Duration of the analysis in seconds.
    pub duration_seconds: f64,
}

/// Everything produced by one analysis, as written to the JSON dump.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    pub result: AggregateResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Suggestions>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_findings_text_orders_strengths_first() {
        let result = AggregateResult {
            average_score: 75.0,
            strengths: vec!["Clear layout".to_string()],
            weaknesses: vec!["No metrics".to_string(), "Long summary".to_string()],
            runs: 1,
            scored_runs: 1,
        };
        assert_eq!(
            result.findings_text(),
            "Clear layout\nNo metrics\nLong summary"
        );
    }

    #[test]
    fn test_suggestion_items_from_numbered_text() {
        let text = "Here are my suggestions:\n\
                    1. Add quantifiable achievements\n\
                    2) Use standard section headings\n\
                    such as Experience and Education\n\
                    3. Remove graphics";
        let items = Suggestions::Text(text.to_string()).items();
        assert_eq!(
            items,
            vec![
                "Add quantifiable achievements",
                "Use standard section headings such as Experience and Education",
                "Remove graphics",
            ]
        );
    }

    #[test]
    fn test_suggestion_items_without_numbers() {
        let text = "Add keywords\n\nShorten the summary\n";
        let items = Suggestions::Text(text.to_string()).items();
        assert_eq!(items, vec!["Add keywords", "Shorten the summary"]);
    }

    #[test]
    fn test_suggestion_items_from_list() {
        let list = Suggestions::List(vec![
            " Add keywords ".to_string(),
            String::new(),
            "Fix dates".to_string(),
        ]);
        assert_eq!(list.items(), vec!["Add keywords", "Fix dates"]);
    }

    #[test]
    fn test_empty_suggestions() {
        assert!(Suggestions::Text(String::new()).items().is_empty());
    }
}
