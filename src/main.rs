//! Fake Job Detector - command line entry point
//!
//! Classifies job postings and prints the dataset statistics behind the charts.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fake_job_detector::{
    config::{AppConfig, LoggingConfig},
    eda::source::{load_archive, load_summary},
    AppContext, DetectorError, PostingForm,
};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "fake-job-detector",
    about = "Classify job postings as fraudulent or legitimate"
)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(
        long,
        short,
        env = "FAKEJOB_CONFIG",
        default_value = "config/config.toml"
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify one or more job postings
    Predict(PredictArgs),
    /// Print the dataset summary used for the charts
    Eda {
        /// Print the per-class text length box plots instead of the full summary
        #[arg(long, default_value_t = false)]
        box_plots: bool,
    },
    /// Compute a summary document from a dataset archive
    Summarize {
        /// ZIP archive containing a single CSV (path or URL)
        #[arg(long)]
        archive: String,
        /// Where to write the summary JSON
        #[arg(long, default_value = "data/eda_summary.json")]
        output: PathBuf,
        #[arg(long, default_value_t = 100)]
        top_words: usize,
    },
}

#[derive(Args, Debug)]
struct PredictArgs {
    /// JSON file holding a form object or an array of them
    #[arg(long, conflicts_with_all = ["title", "description"])]
    form: Option<PathBuf>,
    #[arg(long, default_value = "")]
    title: String,
    #[arg(long, default_value = "")]
    location: String,
    #[arg(long, default_value = "")]
    salary_range: String,
    #[arg(long, default_value = "")]
    company_profile: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    requirements: String,
    #[arg(long, default_value = "")]
    benefits: String,
    /// Print verdicts as JSON lines
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FormFile {
    One(PostingForm),
    Many(Vec<PostingForm>),
}

impl PredictArgs {
    fn forms(&self) -> Result<Vec<PostingForm>> {
        if let Some(path) = &self.form {
            let raw = fs::read(path).with_context(|| format!("failed to read {:?}", path))?;
            let parsed: FormFile = serde_json::from_slice(&raw)
                .with_context(|| format!("{:?} is not a form or list of forms", path))?;
            return Ok(match parsed {
                FormFile::One(form) => vec![form],
                FormFile::Many(forms) => forms,
            });
        }

        Ok(vec![PostingForm {
            title: self.title.clone(),
            location: self.location.clone(),
            salary_range: self.salary_range.clone(),
            company_profile: self.company_profile.clone(),
            description: self.description.clone(),
            requirements: self.requirements.clone(),
            benefits: self.benefits.clone(),
        }])
    }
}

fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("fake_job_detector={}", config.level).parse()?);
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_found = cli.config.exists();
    let config = if config_found {
        AppConfig::load_from_path(&cli.config)?
    } else {
        AppConfig::default()
    };
    init_logging(&config.logging)?;
    if !config_found {
        warn!(path = %cli.config.display(), "Configuration file not found, using defaults");
    }

    match cli.command {
        Command::Predict(args) => predict(&config, &args),
        Command::Eda { box_plots } => {
            let loaded = load_summary(&config.dataset);
            info!(source = %loaded.origin, "Dataset summary ready");
            let json = if box_plots {
                serde_json::to_string_pretty(&loaded.summary.length_box_plots())?
            } else {
                serde_json::to_string_pretty(&loaded.summary)?
            };
            println!("{}", json);
            Ok(())
        }
        Command::Summarize {
            archive,
            output,
            top_words,
        } => {
            let summary = load_archive(&archive, top_words)?;
            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(&output, serde_json::to_vec_pretty(&summary)?)
                .with_context(|| format!("failed to write {:?}", output))?;
            info!(
                output = %output.display(),
                rows = summary.class_distribution.total,
                fake_rate = format!("{:.2}%", summary.fake_rate()),
                "Summary written"
            );
            Ok(())
        }
    }
}

fn predict(config: &AppConfig, args: &PredictArgs) -> Result<()> {
    let forms = args.forms()?;
    let ctx = AppContext::bootstrap(config)?;

    let mut failed = 0usize;
    for form in &forms {
        match ctx.submit(form) {
            Ok(verdict) => {
                if args.json {
                    println!("{}", serde_json::to_string(&verdict)?);
                } else {
                    println!("{}  {}", verdict.label, verdict.probability_text());
                }
            }
            Err(DetectorError::EmptyInput) => {
                failed += 1;
                eprintln!("{}", DetectorError::EmptyInput);
            }
            Err(e) => {
                failed += 1;
                eprintln!("{:#}", anyhow::Error::from(e));
            }
        }
    }

    ctx.metrics().print_summary();
    anyhow::ensure!(failed == 0, "{} of {} postings could not be classified", failed, forms.len());
    Ok(())
}
