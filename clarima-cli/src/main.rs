//! Clarima CLI - physical climate risk assessment from the command line
//!
//! Wraps document discovery and batched measure scoring behind two
//! commands: `discover` for the evidence corpus alone, `assess` for the
//! full 44-measure assessment.

use anyhow::Context;
use clap::{Parser, Subcommand};
use clarima_assessment::{AssessmentPipeline, MemoryStore, SiumaiGenerator};
use clarima_core::{
    init_logging, log_operation_error, log_operation_start, log_operation_success, performance,
    ClarimaConfig, CompanyProfile, LoggingConfig,
};
use clarima_discovery::{AdaptiveSearchController, BraveSearchClient, JinaReaderClient};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "clarima")]
#[command(about = "Physical climate risk assessment from public web evidence")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover climate-related documents for a company
    Discover {
        /// Company name
        company: String,

        /// ISIN or other unique identifier
        #[arg(short, long)]
        isin: Option<String>,

        /// Write discovered documents as JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the full 44-measure assessment for a company
    Assess {
        /// Company name
        company: String,

        /// ISIN or other unique identifier
        #[arg(short, long)]
        isin: Option<String>,

        /// Sector, included in scoring prompts when known
        #[arg(long)]
        sector: Option<String>,

        /// Industry, included in scoring prompts when known
        #[arg(long)]
        industry: Option<String>,

        /// Country, included in scoring prompts when known
        #[arg(long)]
        country: Option<String>,

        /// Write the assessment as JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the full per-measure detail table
        #[arg(long)]
        detail: bool,

        /// Fetch page text for top documents to enrich the corpus
        #[arg(long)]
        extract: bool,
    },

    /// Manage configuration
    Config {
        /// Show the effective configuration
        #[arg(long)]
        show: bool,

        /// Write a default configuration file
        #[arg(long)]
        init: bool,

        /// Validate the configuration and exit
        #[arg(long)]
        validate: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut logging_config = LoggingConfig::default();
    if cli.verbose {
        logging_config.level = "debug".to_string();
    }
    init_logging(&logging_config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Starting Clarima CLI v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Discover {
            company,
            isin,
            output,
        } => run_discover(&config, &company, isin.as_deref(), output.as_deref()).await,
        Commands::Assess {
            company,
            isin,
            sector,
            industry,
            country,
            output,
            detail,
            extract,
        } => {
            let mut profile = CompanyProfile::new(&company);
            profile.isin = isin;
            profile.sector = sector;
            profile.industry = industry;
            profile.country = country;
            run_assess(config, profile, output.as_deref(), detail, extract).await
        }
        Commands::Config {
            show,
            init,
            validate,
        } => run_config(&config, cli.config.as_ref(), show, init, validate),
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ClarimaConfig> {
    match path {
        Some(path) => ClarimaConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(ClarimaConfig::default()),
    }
}

async fn run_discover(
    config: &ClarimaConfig,
    company: &str,
    isin: Option<&str>,
    output: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    log_operation_start!("discover", company = company);

    let provider = Arc::new(BraveSearchClient::new(&config.search)?);
    let controller = AdaptiveSearchController::new(provider, config.discovery.clone());

    let documents = match controller.discover(company, isin).await {
        Ok(documents) => documents,
        Err(e) => {
            log_operation_error!("discover", e);
            return Err(e.into());
        }
    };
    log_operation_success!("discover", documents = documents.len());

    println!("Discovered {} documents for {}", documents.len(), company);
    for doc in &documents {
        println!("  {} - {}", doc.url, doc.title);
    }

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&documents)?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Wrote document list to {}", path.display());
    }
    Ok(())
}

async fn run_assess(
    config: ClarimaConfig,
    profile: CompanyProfile,
    output: Option<&std::path::Path>,
    detail: bool,
    extract: bool,
) -> anyhow::Result<()> {
    let mut config = config;
    if extract {
        config.discovery.extract_content = true;
    }

    let search = Arc::new(BraveSearchClient::new(&config.search)?);
    let generator = Arc::new(SiumaiGenerator::new(&config.llm).await?);
    let store = Arc::new(MemoryStore::new());

    let mut pipeline = AssessmentPipeline::new(search, generator, store, config);
    if extract {
        pipeline = pipeline.with_extractor(Arc::new(JinaReaderClient::new()));
    }

    log_operation_start!("assess", company = profile.name.as_str());

    let assessment =
        match performance::measure_async("assess", pipeline.assess(&profile)).await {
            Ok(assessment) => assessment,
            Err(e) => {
                log_operation_error!("assess", e);
                return Err(e.into());
            }
        };
    log_operation_success!("assess", score = assessment.physical_risk_score);

    println!("Assessment for {}", assessment.company_name);
    println!("  Physical risk score: {:.1} / 10", assessment.physical_risk_score);
    println!("  Overall rating:      {} risk", assessment.overall_risk_rating);
    println!("  Measures assessed:   {}", assessment.total_measures_assessed);

    if detail {
        println!();
        for row in clarima_assessment::measure_detail_rows(&assessment) {
            println!("  {}  score {}  confidence {}", row.measure_id, row.score, row.confidence);
        }
    }

    if let Some(path) = output {
        clarima_assessment::write_assessment_json(&assessment, path).await?;
        println!("Wrote assessment to {}", path.display());
    }
    Ok(())
}

fn run_config(
    config: &ClarimaConfig,
    path: Option<&PathBuf>,
    show: bool,
    init: bool,
    validate: bool,
) -> anyhow::Result<()> {
    if init {
        let target = path
            .cloned()
            .unwrap_or_else(|| PathBuf::from("clarima.toml"));
        ClarimaConfig::default().save_to_file(&target)?;
        println!("Wrote default configuration to {}", target.display());
        return Ok(());
    }
    if validate {
        config.validate()?;
        println!("Configuration is valid");
        return Ok(());
    }
    if show {
        println!("{}", toml::to_string_pretty(config)?);
        return Ok(());
    }
    println!("Use --show, --init, or --validate");
    Ok(())
}
