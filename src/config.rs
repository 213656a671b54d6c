//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.atscheck.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".atscheck.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Mind map settings.
    #[serde(default)]
    pub chart: ChartConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory listed for interactive resume selection.
    #[serde(default = "default_resume_dir")]
    pub resume_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            resume_dir: default_resume_dir(),
        }
    }
}

fn default_resume_dir() -> String {
    "Resume".to_string()
}

/// Which inference backend to talk to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Spawn `ollama run <model>` per call
    #[default]
    Cli,
    /// POST to the Ollama HTTP API
    Http,
}

/// LLM model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name passed to Ollama.
    #[serde(default = "default_model")]
    pub name: String,

    /// Inference backend.
    #[serde(default)]
    pub backend: Backend,

    /// Path to the ollama binary (cli backend).
    #[serde(default = "default_ollama_bin")]
    pub ollama_bin: String,

    /// Ollama API URL (http backend).
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    /// Temperature for generation (http backend).
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Per-call timeout in seconds. Unset means calls may run indefinitely.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// Number of scoring runs averaged together.
    #[serde(default = "default_runs")]
    pub runs: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model(),
            backend: Backend::default(),
            ollama_bin: default_ollama_bin(),
            ollama_url: default_ollama_url(),
            temperature: default_temperature(),
            timeout_seconds: None,
            runs: default_runs(),
        }
    }
}

fn default_model() -> String {
    "llama3.2:latest".to_string()
}

fn default_ollama_bin() -> String {
    "ollama".to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_runs() -> usize {
    crate::analysis::aggregator::DEFAULT_RUNS
}

/// Mind map rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Output file stem; the format is appended as the extension.
    #[serde(default = "default_chart_output")]
    pub output: String,

    /// Graphviz output format (png, svg, pdf).
    #[serde(default = "default_chart_format")]
    pub format: String,

    /// Path to the Graphviz `dot` binary.
    #[serde(default = "default_dot_bin")]
    pub dot_bin: String,

    /// Labels longer than this many characters are truncated.
    #[serde(default = "default_label_max_chars")]
    pub label_max_chars: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output: default_chart_output(),
            format: default_chart_format(),
            dot_bin: default_dot_bin(),
            label_max_chars: default_label_max_chars(),
        }
    }
}

fn default_chart_output() -> String {
    "mind_map".to_string()
}

fn default_chart_format() -> String {
    "png".to_string()
}

fn default_dot_bin() -> String {
    "dot".to_string()
}

fn default_label_max_chars() -> usize {
    crate::report::mindmap::DEFAULT_LABEL_MAX_CHARS
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref dir) = args.dir {
            self.general.resume_dir = dir.display().to_string();
        }

        if let Some(ref model) = args.model {
            self.model.name = model.clone();
        }
        if let Some(backend) = args.backend {
            self.model.backend = backend;
        }
        if let Some(ref bin) = args.ollama_bin {
            self.model.ollama_bin = bin.clone();
        }
        if let Some(ref url) = args.ollama_url {
            self.model.ollama_url = url.clone();
        }
        if let Some(temperature) = args.temperature {
            self.model.temperature = temperature;
        }
        if let Some(timeout) = args.timeout {
            self.model.timeout_seconds = Some(timeout);
        }
        if let Some(runs) = args.runs {
            self.model.runs = runs;
        }

        if let Some(ref output) = args.output {
            self.chart.output = output.clone();
        }
    }

    /// Check values that serde cannot reject on its own.
    pub fn validate(&self) -> Result<()> {
        if self.model.runs == 0 {
            return Err(anyhow::anyhow!("model.runs must be at least 1"));
        }
        if self.model.timeout_seconds == Some(0) {
            return Err(anyhow::anyhow!("model.timeout_seconds must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.model.temperature) {
            return Err(anyhow::anyhow!("model.temperature must be between 0.0 and 1.0"));
        }
        if self.model.backend == Backend::Http
            && !self.model.ollama_url.starts_with("http://")
            && !self.model.ollama_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!(
                "model.ollama_url must start with 'http://' or 'https://'"
            ));
        }
        if self.chart.format.trim().is_empty() {
            return Err(anyhow::anyhow!("chart.format must not be empty"));
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
