//! Sample Dataset Writer
//!
//! Writes a ZIP archive holding one CSV of randomly generated job postings,
//! in the column layout the detector's dataset loader expects.
//!
//! Usage: sample-dataset [output.zip] [count] [fraud_rate]

use rand::Rng;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use tracing::info;
use zip::write::SimpleFileOptions;

const MEMBER_NAME: &str = "fake_job_postings.csv";

/// One CSV row
#[derive(Debug, Clone, Serialize)]
struct PostingRow {
    job_id: u64,
    title: String,
    location: String,
    salary_range: String,
    company_profile: String,
    description: String,
    requirements: String,
    benefits: String,
    employment_type: String,
    industry: String,
    fraudulent: u8,
}

/// Posting generator for demos and smoke tests
struct PostingGenerator {
    rng: rand::rngs::ThreadRng,
    posting_counter: u64,
}

impl PostingGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            posting_counter: 0,
        }
    }

    /// Generate an ordinary posting
    fn generate_legitimate(&mut self) -> PostingRow {
        self.posting_counter += 1;
        let title = self.random_choice(&[
            "Software Engineer",
            "Account Manager",
            "Registered Nurse",
            "Marketing Coordinator",
            "Warehouse Associate",
        ]);
        let company = self.random_choice(&["Northwind", "Contoso", "Globex", "Initech"]);

        PostingRow {
            job_id: self.posting_counter,
            title: title.to_string(),
            location: self
                .random_choice(&["US, NY, New York", "GB, LND, London", "DE, BE, Berlin"])
                .to_string(),
            salary_range: self.maybe(0.3, || "45000-60000".to_string()),
            company_profile: format!(
                "{} is a growing company with a collaborative team and offices in several countries.",
                company
            ),
            description: format!(
                "We are looking for a {} to join our team. You will work with customers and colleagues to deliver quality results.",
                title
            ),
            requirements: format!("{}+ years of experience. Strong communication skills.", self.rng.gen_range(1..8)),
            benefits: self.maybe(0.6, || "Health insurance, pension plan, paid time off.".to_string()),
            employment_type: self.random_choice(&["Full-time", "Part-time", "Contract"]).to_string(),
            industry: self
                .random_choice(&["Information Technology", "Hospital & Health Care", "Retail"])
                .to_string(),
            fraudulent: 0,
        }
    }

    /// Generate a posting with common scam markers
    fn generate_suspicious(&mut self) -> PostingRow {
        self.posting_counter += 1;
        let title = self.random_choice(&[
            "Data Entry Clerk",
            "Work From Home Assistant",
            "Administrative Assistant",
            "Customer Service Representative",
        ]);

        PostingRow {
            job_id: self.posting_counter,
            title: title.to_string(),
            location: self.random_choice(&["US, TX, Houston", "", "US"]).to_string(),
            salary_range: self.maybe(0.5, || "80000-120000".to_string()),
            company_profile: self.maybe(0.3, || "Leading global firm.".to_string()),
            description: format!(
                "Earn ${} weekly from home! No experience needed. Apply now and start today, cash paid weekly.",
                self.rng.gen_range(500..3000)
            ),
            requirements: self.maybe(0.2, || "Computer and internet access.".to_string()),
            benefits: self.maybe(0.2, || "Flexible hours.".to_string()),
            employment_type: self.random_choice(&["Part-time", "", "Other"]).to_string(),
            industry: self.random_choice(&["Oil & Energy", "", "Accounting"]).to_string(),
            fraudulent: 1,
        }
    }

    /// `value()` with probability `p`, else an empty cell
    fn maybe(&mut self, p: f64, value: impl FnOnce() -> String) -> String {
        if self.rng.gen_bool(p) {
            value()
        } else {
            String::new()
        }
    }

    fn random_choice<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[self.rng.gen_range(0..choices.len())]
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sample_dataset=info".parse()?),
        )
        .init();

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let output = args
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or("data/fake_job_postings.zip");
    let count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(1000);
    let fraud_rate: f64 = args
        .get(3)
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.05)
        .clamp(0.0, 1.0);

    info!(output = %output, count, fraud_rate, "Generating sample dataset");

    let mut generator = PostingGenerator::new();
    let mut rng = rand::thread_rng();
    let mut csv_writer = csv::Writer::from_writer(Vec::new());
    let mut legitimate_count = 0u64;
    let mut suspicious_count = 0u64;

    for _ in 0..count {
        let row = if rng.gen_bool(fraud_rate) {
            suspicious_count += 1;
            generator.generate_suspicious()
        } else {
            legitimate_count += 1;
            generator.generate_legitimate()
        };
        csv_writer.serialize(&row)?;
    }
    let csv_bytes = csv_writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV: {}", e))?;

    if let Some(parent) = std::path::Path::new(output)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)?;
    }
    let mut archive = zip::ZipWriter::new(File::create(output)?);
    archive.start_file(MEMBER_NAME, SimpleFileOptions::default())?;
    archive.write_all(&csv_bytes)?;
    archive.finish()?;

    info!(
        "Wrote {} postings ({} legitimate, {} suspicious) to {}",
        count, legitimate_count, suspicious_count, output
    );

    Ok(())
}
