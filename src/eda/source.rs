//! Dataset summary loading: precomputed JSON, then the ZIP archive, then the fixed fallback.

use crate::config::DatasetConfig;
use crate::eda::aggregate::SummaryBuilder;
use crate::eda::summary::EdaSummary;
use crate::eda::synthetic::synthetic_summary;
use crate::fetch::fetch_bytes;
use crate::types::posting::JobPosting;
use anyhow::{Context, Result};
use std::fmt;
use std::io::{Cursor, Read};
use tracing::{info, warn};

/// Columns the dataset CSV must provide
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "title",
    "description",
    "company_profile",
    "requirements",
    "benefits",
    "fraudulent",
];

/// Which source produced the summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetOrigin {
    Precomputed,
    Archive,
    Synthetic,
}

impl fmt::Display for DatasetOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatasetOrigin::Precomputed => "precomputed",
            DatasetOrigin::Archive => "archive",
            DatasetOrigin::Synthetic => "synthetic",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub summary: EdaSummary,
    pub origin: DatasetOrigin,
}

/// Load the summary from the first source that works. Never fails.
pub fn load_summary(config: &DatasetConfig) -> LoadedDataset {
    if let Some(location) = &config.precomputed {
        match load_precomputed(location, config.top_words) {
            Ok(summary) => {
                info!(location = %location, rows = summary.class_distribution.total, "Loaded precomputed summary");
                return LoadedDataset {
                    summary,
                    origin: DatasetOrigin::Precomputed,
                };
            }
            Err(e) => warn!(location = %location, error = %format!("{:#}", e), "Precomputed summary unavailable"),
        }
    }

    if let Some(location) = &config.archive {
        match load_archive(location, config.top_words) {
            Ok(summary) => {
                info!(location = %location, rows = summary.class_distribution.total, "Summarized dataset archive");
                return LoadedDataset {
                    summary,
                    origin: DatasetOrigin::Archive,
                };
            }
            Err(e) => warn!(location = %location, error = %format!("{:#}", e), "Dataset archive unavailable"),
        }
    }

    warn!("No dataset source available, using synthetic summary");
    LoadedDataset {
        summary: synthetic_summary(),
        origin: DatasetOrigin::Synthetic,
    }
}

/// Fetch and validate a precomputed summary document.
pub fn load_precomputed(location: &str, max_words: usize) -> Result<EdaSummary> {
    let bytes = fetch_bytes(location)?;
    let summary: EdaSummary =
        serde_json::from_slice(&bytes).context("malformed summary document")?;
    summary.validate(max_words)?;
    Ok(summary)
}

/// Fetch a ZIP archive and summarize its CSV member.
pub fn load_archive(location: &str, top_words: usize) -> Result<EdaSummary> {
    let bytes = fetch_bytes(location)?;
    summarize_archive(&bytes, top_words)
}

/// Summarize the single CSV inside an in-memory ZIP archive.
pub fn summarize_archive(bytes: &[u8], top_words: usize) -> Result<EdaSummary> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).context("not a ZIP archive")?;

    let csv_members: Vec<String> = archive
        .file_names()
        .filter(|name| !name.starts_with("__MACOSX/"))
        .filter(|name| name.to_ascii_lowercase().ends_with(".csv"))
        .map(str::to_string)
        .collect();
    let member = match csv_members.as_slice() {
        [only] => only.clone(),
        [] => anyhow::bail!("archive contains no CSV file"),
        many => anyhow::bail!("archive contains {} CSV files, expected one", many.len()),
    };

    let entry = archive
        .by_name(&member)
        .with_context(|| format!("failed to open {} in archive", member))?;
    summarize_csv(entry, top_words).with_context(|| format!("failed to summarize {}", member))
}

/// Summarize CSV rows (header row required) read from `reader`.
///
/// Rows that fail to parse are skipped and counted in a warning.
pub fn summarize_csv<R: Read>(reader: R, top_words: usize) -> Result<EdaSummary> {
    let mut builder = SummaryBuilder::new(top_words);
    let skipped = for_each_row(reader, |row| builder.add(&row))?;
    if skipped > 0 {
        warn!(skipped, kept = builder.rows(), "Skipped malformed dataset rows");
    }
    Ok(builder.finish())
}

/// Parse all rows of a dataset CSV.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<JobPosting>> {
    let mut rows = Vec::new();
    for_each_row(reader, |row| rows.push(row))?;
    Ok(rows)
}

fn for_each_row<R: Read>(reader: R, mut visit: impl FnMut(JobPosting)) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers().context("failed to read CSV header")?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    anyhow::ensure!(missing.is_empty(), "CSV is missing columns {:?}", missing);

    // Only row-level parse failures are skippable; a failing reader means a damaged source
    let mut skipped = 0usize;
    for record in reader.deserialize::<JobPosting>() {
        match record {
            Ok(row) => visit(row),
            Err(e) if e.is_io_error() => {
                return Err(anyhow::Error::new(e).context("failed to read dataset CSV"))
            }
            Err(_) => skipped += 1,
        }
    }
    Ok(skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eda::summary::TOP_WORDS;
    use crate::types::posting::TextField;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const CSV: &str = "job_id,title,company_profile,description,requirements,benefits,fraudulent\n\
        1,Sales Rep,Acme Inc,Sell widgets,Driving license,Car,0\n\
        2,Data Entry,,Earn cash from home,,,1\n\
        3,Engineer,Acme Inc,Build widgets,Rust,Pension,0\n";

    fn zip_with(members: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in members {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_summarize_archive() {
        let bytes = zip_with(&[("fake_job_postings.csv", CSV)]);
        let summary = summarize_archive(&bytes, TOP_WORDS).unwrap();

        assert_eq!(summary.class_distribution.real, 2);
        assert_eq!(summary.class_distribution.fake, 1);
        assert_eq!(summary.class_distribution.total, 3);
        assert_eq!(summary.missing_values.get(TextField::Benefits, true), 1);
        assert_eq!(summary.missing_values.get(TextField::CompanyProfile, true), 1);
        assert_eq!(summary.missing_values.get(TextField::Benefits, false), 0);
        assert_eq!(summary.real_words[0], ("widgets".to_string(), 2));
        assert_eq!(summary.real_words[1], ("acme".to_string(), 2));
    }

    #[test]
    fn test_archive_member_rules() {
        let none = zip_with(&[("readme.txt", "hello")]);
        assert!(summarize_archive(&none, TOP_WORDS).is_err());

        let two = zip_with(&[("a.csv", CSV), ("b.csv", CSV)]);
        assert!(summarize_archive(&two, TOP_WORDS).is_err());

        let mac = zip_with(&[("data.CSV", CSV), ("__MACOSX/._data.CSV", "junk")]);
        assert_eq!(
            summarize_archive(&mac, TOP_WORDS).unwrap().class_distribution.total,
            3
        );

        assert!(summarize_archive(b"not a zip", TOP_WORDS).is_err());
    }

    #[test]
    fn test_corrupt_member_is_an_error() {
        let name = "d.csv";
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(
                name,
                SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored),
            )
            .unwrap();
        writer.write_all(CSV.as_bytes()).unwrap();
        let mut bytes = writer.finish().unwrap().into_inner();

        // Stored member: the CSV header bytes appear verbatim in the archive
        let data_start = bytes.windows(6).position(|w| w == b"job_id").unwrap();
        bytes[data_start + 1] ^= 0x01;

        assert!(summarize_archive(&bytes, TOP_WORDS).is_err());
    }

    #[test]
    fn test_padded_headers_still_bind() {
        let csv = " title , description,company_profile,requirements,benefits,fraudulent\n\
            Courier,Deliver parcels,,,,0\n";
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title.as_deref(), Some("Courier"));
    }

    #[test]
    fn test_missing_required_column() {
        let err = summarize_csv("title,description\nA,B\n".as_bytes(), TOP_WORDS).unwrap_err();
        assert!(err.to_string().contains("fraudulent"));
    }

    #[test]
    fn test_read_rows() {
        let rows = read_rows(CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].title.as_deref(), Some("Data Entry"));
        assert!(rows[1].is_fake());
    }

    #[test]
    fn test_precedence() {
        let dir = tempfile::tempdir().unwrap();

        let archive_path = dir.path().join("postings.zip");
        std::fs::write(&archive_path, zip_with(&[("postings.csv", CSV)])).unwrap();
        let archive = Some(archive_path.to_string_lossy().into_owned());

        let bad_json = dir.path().join("broken.json");
        std::fs::write(&bad_json, "{\"classDistribution\": 3}").unwrap();

        // Malformed precomputed document falls through to the archive
        let config = DatasetConfig {
            precomputed: Some(bad_json.to_string_lossy().into_owned()),
            archive: archive.clone(),
            top_words: TOP_WORDS,
        };
        let loaded = load_summary(&config);
        assert_eq!(loaded.origin, DatasetOrigin::Archive);

        // A valid precomputed document wins
        let good_json = dir.path().join("eda.json");
        std::fs::write(&good_json, serde_json::to_vec(&loaded.summary).unwrap()).unwrap();
        let config = DatasetConfig {
            precomputed: Some(good_json.to_string_lossy().into_owned()),
            archive,
            top_words: TOP_WORDS,
        };
        let loaded = load_summary(&config);
        assert_eq!(loaded.origin, DatasetOrigin::Precomputed);
        assert_eq!(loaded.summary.class_distribution.total, 3);

        // Nothing available
        let config = DatasetConfig {
            precomputed: Some(dir.path().join("nope.json").to_string_lossy().into_owned()),
            archive: None,
            top_words: TOP_WORDS,
        };
        let loaded = load_summary(&config);
        assert_eq!(loaded.origin, DatasetOrigin::Synthetic);
        assert_eq!(loaded.summary, synthetic_summary());
    }
}
