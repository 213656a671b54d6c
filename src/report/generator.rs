//! Text and JSON output of the analysis results.

use crate::models::{AggregateResult, AnalysisReport};
use anyhow::{Context, Result};
use std::path::Path;

/// Generate the plain-text summary printed at the end of a run.
pub fn generate_summary_text(result: &AggregateResult, suggestions: Option<&[String]>) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "ATS Score: {:.2}% ({} of {} runs scored)",
        result.average_score, result.scored_runs, result.runs
    ));

    lines.push(String::new());
    lines.push("Strengths:".to_string());
    push_items(&mut lines, &result.strengths);

    lines.push(String::new());
    lines.push("Weaknesses:".to_string());
    push_items(&mut lines, &result.weaknesses);

    if let Some(suggestions) = suggestions {
        lines.push(String::new());
        lines.push("Suggestions:".to_string());
        for (i, suggestion) in suggestions.iter().enumerate() {
            lines.push(format!("{}. {}", i + 1, suggestion));
        }
    }

    lines.join("\n")
}

fn push_items(lines: &mut Vec<String>, items: &[String]) {
    if items.is_empty() {
        lines.push("  (none found)".to_string());
    }
    for item in items {
        lines.push(format!("- {}", item));
    }
}

/// Generate a JSON report.
pub fn generate_json_report(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write a JSON report to a file.
pub fn write_json_report(report: &AnalysisReport, path: &Path) -> Result<()> {
    let content = generate_json_report(report)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReportMetadata, Suggestions};
    use chrono::Utc;
    use tempfile::TempDir;

    fn create_test_result() -> AggregateResult {
        AggregateResult {
            average_score: 72.5,
            strengths: vec!["Clear layout".to_string()],
            weaknesses: vec![],
            runs: 3,
            scored_runs: 2,
        }
    }

    fn create_test_report() -> AnalysisReport {
        AnalysisReport {
            metadata: ReportMetadata {
                resume_file: "Resume/jane.pdf".to_string(),
                analysis_date: Utc::now(),
                model_used: "test-model".to_string(),
                duration_seconds: 12.0,
            },
            result: create_test_result(),
            suggestions: None,
        }
    }

    #[test]
    fn test_summary_text() {
        let suggestions = vec!["Add metrics".to_string()];
        let text = generate_summary_text(&create_test_result(), Some(suggestions.as_slice()));

        assert!(text.starts_with("ATS Score: 72.50% (2 of 3 runs scored)"));
        assert!(text.contains("- Clear layout"));
        assert!(text.contains("Weaknesses:\n  (none found)"));
        assert!(text.contains("Suggestions:\n1. Add metrics"));
    }

    #[test]
    fn test_summary_text_without_suggestions() {
        let text = generate_summary_text(&create_test_result(), None);
        assert!(!text.contains("Suggestions:"));
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&create_test_report()).unwrap();

        assert!(json.contains("\"resume_file\""));
        assert!(json.contains("\"average_score\": 72.5"));
        assert!(!json.contains("\"suggestions\""));
    }

    #[test]
    fn test_write_json_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("result.json");
        let mut report = create_test_report();
        report.suggestions = Some(Suggestions::List(vec!["Add metrics".to_string()]));

        write_json_report(&report, &path).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["result"]["scored_runs"], 2);
        assert_eq!(parsed["suggestions"][0], "Add metrics");
    }
}
