//! Reads startup resources from a local path or an http(s) URL.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::debug;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

pub fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Fetch the raw bytes behind `location`.
pub fn fetch_bytes(location: &str) -> Result<Vec<u8>> {
    if is_url(location) {
        debug!(url = %location, "Fetching remote resource");
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        let response = client
            .get(location)
            .send()
            .with_context(|| format!("failed to fetch {}", location))?;
        let status = response.status();
        anyhow::ensure!(status.is_success(), "fetching {} returned {}", location, status);
        let bytes = response
            .bytes()
            .with_context(|| format!("failed to read body of {}", location))?;
        Ok(bytes.to_vec())
    } else {
        debug!(path = %location, "Reading local resource");
        std::fs::read(location).with_context(|| format!("failed to read {}", location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_url_detection() {
        assert!(is_url("https://example.com/eda.json"));
        assert!(is_url("http://localhost:8000/tokenizer.json"));
        assert!(!is_url("data/eda.json"));
        assert!(!is_url("/abs/path/http.json"));
    }

    #[test]
    fn test_reads_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"max_len\": 4}").unwrap();
        let bytes = fetch_bytes(file.path().to_str().unwrap()).unwrap();
        assert_eq!(bytes, b"{\"max_len\": 4}");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = fetch_bytes("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
