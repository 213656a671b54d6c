//! Multi-run score aggregation.
//!
//! The same scoring prompt is sent to the model several times and the
//! parsed runs are combined: scores are averaged, strengths and weaknesses
//! are concatenated in call order without deduplication.

use crate::analysis::parser::parse_response;
use crate::error::AtsError;
use crate::llm::prompts::scoring_prompt;
use crate::llm::InferenceClient;
use crate::models::{AggregateResult, ParsedRun};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

/// Default number of scoring runs.
pub const DEFAULT_RUNS: usize = 3;

/// Combine parsed runs into one result.
///
/// The average only covers runs that produced a score; with no scored runs
/// it is 0.
pub fn aggregate(runs: &[ParsedRun]) -> AggregateResult {
    let scores: Vec<f64> = runs.iter().filter_map(|r| r.score).collect();

    let average_score = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    };

    AggregateResult {
        average_score,
        strengths: runs.iter().flat_map(|r| r.strengths.clone()).collect(),
        weaknesses: runs.iter().flat_map(|r| r.weaknesses.clone()).collect(),
        runs: runs.len(),
        scored_runs: scores.len(),
    }
}

/// Drives repeated scoring calls against one inference client.
pub struct Aggregator<'a> {
    client: &'a dyn InferenceClient,
    runs: usize,
    show_progress: bool,
}

impl<'a> Aggregator<'a> {
    pub fn new(client: &'a dyn InferenceClient, runs: usize) -> Self {
        Self {
            client,
            runs,
            show_progress: false,
        }
    }

    /// Show a progress bar while the runs execute.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Score `resume_text` `runs` times, one call after another.
    ///
    /// The first failed call aborts the whole aggregation.
    pub async fn run(&self, resume_text: &str) -> Result<AggregateResult, AtsError> {
        let prompt = scoring_prompt(resume_text);
        let progress = self.progress_bar();
        let mut parsed = Vec::with_capacity(self.runs);

        for i in 0..self.runs {
            progress.set_message(format!("run {}/{}", i + 1, self.runs));
            debug!("Scoring run {}/{} with {}", i + 1, self.runs, self.client.model());

            let response = match self.client.generate(&prompt).await {
                Ok(response) => response,
                Err(e) => {
                    progress.abandon_with_message(format!("run {} failed", i + 1));
                    return Err(e);
                }
            };

            let run = parse_response(&response);
            match run.score {
                Some(score) => info!("Run {}: ATS score {:.2}%", i + 1, score),
                None => info!("Run {}: no score found in response", i + 1),
            }

            parsed.push(run);
            progress.inc(1);
        }

        progress.finish_and_clear();

        let result = aggregate(&parsed);
        info!(
            "Average ATS score {:.2}% over {}/{} scored runs",
            result.average_score, result.scored_runs, result.runs
        );

        Ok(result)
    }

    fn progress_bar(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(self.runs as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::testing::ScriptedClient;

    fn scored(score: Option<f64>) -> ParsedRun {
        ParsedRun {
            score,
            ..ParsedRun::default()
        }
    }

    #[test]
    fn test_average_of_scored_runs() {
        let runs = vec![scored(Some(80.0)), scored(Some(90.0)), scored(Some(100.0))];
        let result = aggregate(&runs);
        assert_eq!(result.average_score, 90.0);
        assert_eq!(result.scored_runs, 3);
    }

    #[test]
    fn test_unscored_runs_do_not_count() {
        let runs = vec![scored(Some(60.0)), scored(None), scored(Some(80.0))];
        let result = aggregate(&runs);
        assert_eq!(result.average_score, 70.0);
        assert_eq!(result.runs, 3);
        assert_eq!(result.scored_runs, 2);
    }

    #[test]
    fn test_no_scored_runs_average_zero() {
        assert_eq!(aggregate(&[scored(None), scored(None)]).average_score, 0.0);
        assert_eq!(aggregate(&[]).average_score, 0.0);
    }

    #[test]
    fn test_lists_concatenate_with_duplicates() {
        let runs = vec![
            ParsedRun {
                score: Some(50.0),
                strengths: vec!["Clear".to_string()],
                weaknesses: vec!["Short".to_string()],
            },
            ParsedRun {
                score: None,
                strengths: vec!["Clear".to_string(), "Keywords".to_string()],
                weaknesses: vec![],
            },
        ];
        let result = aggregate(&runs);
        assert_eq!(result.strengths, vec!["Clear", "Clear", "Keywords"]);
        assert_eq!(result.weaknesses, vec!["Short"]);
    }

    #[tokio::test]
    async fn test_run_calls_client_runs_times_with_same_prompt() {
        let client = ScriptedClient::new(vec![
            "ATS Score: 80%".to_string(),
            "ATS Score: 90%".to_string(),
            "ATS Score: 100%".to_string(),
        ]);

        let result = Aggregator::new(&client, 3).run("Resume text").await.unwrap();

        assert_eq!(result.average_score, 90.0);
        let prompts = client.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts.iter().all(|p| p == &prompts[0]));
        assert!(prompts[0].contains("Resume text"));
    }

    #[tokio::test]
    async fn test_run_aborts_on_first_failure() {
        let client = ScriptedClient::new(vec!["ATS Score: 80%".to_string()]);

        let err = Aggregator::new(&client, 3).run("Resume").await.unwrap_err();

        assert!(matches!(err, AtsError::Inference(_)));
        assert_eq!(client.prompts().len(), 2);
    }

    #[test]
    fn test_hidden_progress_with_block_on() {
        let client = ScriptedClient::new(vec!["nothing useful".to_string()]);
        let result = tokio_test::block_on(Aggregator::new(&client, 1).run("Resume")).unwrap();
        assert_eq!(result.average_score, 0.0);
        assert_eq!(result.runs, 1);
        assert_eq!(result.scored_runs, 0);
    }
}
