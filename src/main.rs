//! ATSCheck - resume ATS compatibility scoring with a local LLM
//!
//! Extracts the text of a resume, asks an Ollama model for an ATS score
//! several times, averages the parsed results, optionally asks for
//! improvement suggestions, and draws a mind map of the findings.
//!
//! Exit codes:
//!   0 - Success (a failed mind map render still counts as success)
//!   1 - Runtime error (extraction, inference, config, etc.)

mod analysis;
mod cli;
mod config;
mod error;
mod extract;
mod llm;
mod models;
mod report;
mod scanner;

use analysis::Aggregator;
use anyhow::{Context, Result};
use chrono::Utc;
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use models::{AnalysisReport, ReportMetadata, Suggestions};
use report::MindMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("ATSCheck v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run_analysis(args).await {
        error!("Analysis failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .atscheck.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the model, number of runs and chart output.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete analysis workflow.
async fn run_analysis(args: Args) -> Result<()> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate()?;

    // Step 1: Pick and read the resume
    let resume_path = choose_resume(&args, &config)?;
    println!("📄 Extracting text from {}", resume_path.display());

    let resume_text = extract::extract_text(&resume_path)?;
    info!("Extracted {} characters", resume_text.len());

    // Step 2: Score it repeatedly
    let client = llm::build_client(&config.model)?;

    println!("🤖 Scoring with {}", client.model());
    println!("   Backend: {:?}", config.model.backend);
    println!("   Runs: {}", config.model.runs);

    let result = Aggregator::new(client.as_ref(), config.model.runs)
        .with_progress(!args.quiet)
        .run(&resume_text)
        .await?;

    println!("\n{}", report::generate_summary_text(&result, None));

    // Step 3: Optional suggestions
    let want_suggestions = match args.suggestions_choice() {
        Some(choice) => choice,
        None => {
            let stdin = std::io::stdin();
            let mut input = stdin.lock();
            let mut output = std::io::stdout();
            cli::confirm("\nGenerate improvement suggestions?", &mut input, &mut output)?
        }
    };

    let suggestions = if want_suggestions {
        let text = analysis::request_suggestions(client.as_ref(), &result).await?;
        let items = Suggestions::Text(text).items();
        println!("\n💡 Suggestions:");
        for (i, item) in items.iter().enumerate() {
            println!("   {}. {}", i + 1, item);
        }
        Some(items)
    } else {
        None
    };

    // Step 4: Mind map
    if args.no_chart {
        debug!("Skipping mind map (--no-chart)");
    } else {
        let map = MindMap::build(
            result.average_score,
            &result.strengths,
            &result.weaknesses,
            suggestions.as_deref().unwrap_or(&[]),
            config.chart.label_max_chars,
        );

        match report::render(
            &map.to_dot(),
            &config.chart.output,
            &config.chart.format,
            &config.chart.dot_bin,
        )
        .await
        {
            Ok(path) => println!("\n🗺️  Mind map generated: {}", path.display()),
            Err(e) => {
                warn!("{}", e);
                eprintln!("\n⚠️  Error generating mind map: {}", e);
            }
        }
    }

    // Step 5: Optional JSON dump
    let duration = start_time.elapsed().as_secs_f64();

    if let Some(ref json_path) = args.json {
        let report = AnalysisReport {
            metadata: ReportMetadata {
                resume_file: resume_path.display().to_string(),
                analysis_date: Utc::now(),
                model_used: client.model().to_string(),
                duration_seconds: duration,
            },
            result,
            suggestions: suggestions.map(Suggestions::List),
        };
        report::write_json_report(&report, json_path)?;
        println!("📝 Results saved to: {}", json_path.display());
    }

    println!("\n✅ Analysis complete in {:.1}s", duration);
    Ok(())
}

/// Resolve the resume to analyze: `--file`, or an interactive pick.
fn choose_resume(args: &Args, config: &Config) -> Result<PathBuf> {
    if let Some(ref file) = args.file {
        return Ok(file.clone());
    }

    let dir = Path::new(&config.general.resume_dir);
    let files = scanner::list_resumes(dir)?;

    if files.is_empty() {
        return Err(anyhow::anyhow!(
            "No PDF, DOCX or TXT resumes found in {}",
            dir.display()
        ));
    }

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    cli::select_resume(&files, &mut input, &mut output)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
