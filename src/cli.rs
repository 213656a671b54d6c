//! Command-line interface argument parsing and interactive prompts.
//!
//! Argument parsing uses clap. The prompts are written against generic
//! readers and writers so they can be driven from tests.

use crate::config::Backend;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// ATSCheck - score a resume for ATS compatibility with a local LLM
///
/// Extracts the text of a resume, asks the model for an ATS score several
/// times, averages the results and draws a mind map of the findings.
///
/// Examples:
///   atscheck
///   atscheck --file Resume/jane_doe.pdf --runs 5
///   atscheck --backend http --model mistral:7b --no-suggestions
///   atscheck --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory listed for interactive resume selection
    #[arg(long, value_name = "DIR", env = "ATSCHECK_RESUME_DIR")]
    pub dir: Option<PathBuf>,

    /// Resume file to analyze (skips the selection prompt)
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Ollama model to use
    #[arg(short, long, env = "ATSCHECK_MODEL")]
    pub model: Option<String>,

    /// Number of scoring runs to average
    #[arg(long, value_name = "N")]
    pub runs: Option<usize>,

    /// Inference backend (cli, http)
    #[arg(long, value_name = "BACKEND")]
    pub backend: Option<Backend>,

    /// Path to the ollama binary (cli backend)
    #[arg(long, value_name = "PATH")]
    pub ollama_bin: Option<String>,

    /// Ollama API endpoint URL (http backend)
    #[arg(long, value_name = "URL", env = "OLLAMA_URL")]
    pub ollama_url: Option<String>,

    /// Per-call timeout in seconds (no timeout unless set)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Temperature for LLM responses (0.0 - 1.0, http backend)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Mind map output file stem
    #[arg(short, long, value_name = "STEM")]
    pub output: Option<String>,

    /// Also write the aggregated result as JSON
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Generate improvement suggestions without asking
    #[arg(long, conflicts_with = "no_suggestions")]
    pub suggestions: bool,

    /// Skip improvement suggestions without asking
    #[arg(long, conflicts_with = "suggestions")]
    pub no_suggestions: bool,

    /// Skip rendering the mind map
    #[arg(long)]
    pub no_chart: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .atscheck.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .atscheck.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.runs == Some(0) {
            return Err("Runs must be at least 1".to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if let Some(ref file) = self.file {
            if !file.is_file() {
                return Err(format!("Resume file does not exist: {}", file.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// The suggestions answer given on the command line, if any.
    pub fn suggestions_choice(&self) -> Option<bool> {
        if self.suggestions {
            Some(true)
        } else if self.no_suggestions {
            Some(false)
        } else {
            None
        }
    }
}

/// List `files` numbered from 1 and read the user's choice.
///
/// Re-prompts on anything that is not a valid index. End of input is an error.
pub fn select_resume<R: BufRead, W: Write>(
    files: &[PathBuf],
    input: &mut R,
    output: &mut W,
) -> Result<PathBuf> {
    if files.is_empty() {
        return Err(anyhow::anyhow!("No resume files to choose from"));
    }

    writeln!(output, "Available resumes:")?;
    for (i, file) in files.iter().enumerate() {
        writeln!(output, "  {}. {}", i + 1, display_name(file))?;
    }

    loop {
        write!(output, "Select a resume by number (1-{}): ", files.len())?;
        output.flush()?;

        let line = read_line(input).context("Failed to read selection")?;
        let Some(line) = line else {
            return Err(anyhow::anyhow!("No resume selected"));
        };

        match line.trim().parse::<usize>() {
            Ok(n) if (1..=files.len()).contains(&n) => return Ok(files[n - 1].clone()),
            _ => writeln!(output, "Invalid choice: {}", line.trim())?,
        }
    }
}

/// Ask a yes/no question. End of input counts as "no".
pub fn confirm<R: BufRead, W: Write>(question: &str, input: &mut R, output: &mut W) -> Result<bool> {
    loop {
        write!(output, "{} (yes/no): ", question)?;
        output.flush()?;

        let Some(line) = read_line(input).context("Failed to read answer")? else {
            return Ok(false);
        };

        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            other => writeln!(output, "Please answer yes or no (got '{}')", other)?,
        }
    }
}

fn read_line<R: BufRead>(input: &mut R) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        Ok(None)
    } else {
        Ok(Some(line))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;

    pub(crate) fn make_args() -> Args {
        Args {
            dir: None,
            file: None,
            model: None,
            runs: None,
            backend: None,
            ollama_bin: None,
            ollama_url: None,
            timeout: None,
            temperature: None,
            output: None,
            json: None,
            suggestions: false,
            no_suggestions: false,
            no_chart: false,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_zero_runs() {
        let mut args = make_args();
        args.runs = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_file() {
        let mut args = make_args();
        args.file = Some(PathBuf::from("/definitely/not/here.pdf"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_suggestions_choice() {
        let mut args = make_args();
        assert_eq!(args.suggestions_choice(), None);
        args.suggestions = true;
        assert_eq!(args.suggestions_choice(), Some(true));
        args.suggestions = false;
        args.no_suggestions = true;
        assert_eq!(args.suggestions_choice(), Some(false));
    }

    #[test]
    fn test_select_resume_retries_until_valid() {
        let files = vec![PathBuf::from("Resume/a.pdf"), PathBuf::from("Resume/b.docx")];
        let mut input = Cursor::new("abc\n7\n2\n");
        let mut output = Vec::new();

        let chosen = select_resume(&files, &mut input, &mut output).unwrap();
        assert_eq!(chosen, PathBuf::from("Resume/b.docx"));

        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("1. a.pdf"));
        assert!(shown.contains("2. b.docx"));
        assert!(shown.contains("Invalid choice: abc"));
        assert!(shown.contains("Invalid choice: 7"));
    }

    #[test]
    fn test_select_resume_eof() {
        let files = vec![PathBuf::from("a.pdf")];
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert!(select_resume(&files, &mut input, &mut output).is_err());
    }

    #[test]
    fn test_select_resume_empty_list() {
        let mut input = Cursor::new("1\n");
        let mut output = Vec::new();
        assert!(select_resume(&[], &mut input, &mut output).is_err());
    }

    #[test]
    fn test_confirm() {
        let mut output = Vec::new();
        assert!(confirm("Continue?", &mut Cursor::new("YES\n"), &mut output).unwrap());
        assert!(!confirm("Continue?", &mut Cursor::new("n\n"), &mut output).unwrap());
        assert!(confirm("Continue?", &mut Cursor::new("maybe\ny\n"), &mut output).unwrap());
        assert!(!confirm("Continue?", &mut Cursor::new(""), &mut output).unwrap());
    }
}
