//! HTTP prediction endpoint client

use crate::config::InferenceConfig;
use crate::models::inference::{sanitize_probability, Predictor};
use crate::types::posting::PostingForm;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Response fields checked for the probability, in order
const PROBABILITY_FIELDS: [&str; 2] = ["fraud_proba", "probability"];

#[derive(Serialize)]
struct PredictRequest<'a> {
    full_text: &'a str,
}

/// Sends raw form text to `POST /predict` and reads back the probability.
#[derive(Clone)]
pub struct RemotePredictor {
    client: Client,
    endpoint: String,
}

impl RemotePredictor {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self> {
        anyhow::ensure!(!endpoint.trim().is_empty(), "missing prediction endpoint");
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build prediction HTTP client")?;
        Ok(Self { client, endpoint })
    }

    pub fn from_config(config: &InferenceConfig) -> Result<Self> {
        Self::new(
            config.endpoint.clone(),
            Duration::from_secs(config.timeout_secs.max(1)),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST `{"full_text": text}` and parse the returned probability.
    pub fn predict_text(&self, text: &str) -> Result<f64> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&PredictRequest { full_text: text })
            .send()
            .with_context(|| format!("request to {} failed", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            anyhow::bail!("prediction endpoint returned {}: {}", status, body);
        }

        let body: Value = response
            .json()
            .context("failed to parse prediction response")?;
        let probability = parse_probability(&body)?;
        debug!(endpoint = %self.endpoint, probability, "Remote prediction received");
        Ok(probability)
    }
}

/// Extract `fraud_proba` (or `probability`) from a response body.
pub fn parse_probability(body: &Value) -> Result<f64> {
    let raw = PROBABILITY_FIELDS
        .iter()
        .find_map(|field| body.get(*field).and_then(Value::as_f64))
        .with_context(|| format!("response has no numeric probability: {}", body))?;
    sanitize_probability(raw)
}

impl Predictor for RemotePredictor {
    fn name(&self) -> &'static str {
        "remote-http"
    }

    fn predict(&self, form: &PostingForm) -> Result<f64> {
        self.predict_text(&form.full_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve a single HTTP response and hand back the raw request.
    fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            request
        });
        (format!("http://{}/predict", addr), handle)
    }

    fn read_request(stream: &mut std::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
                let length = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= pos + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn predictor(endpoint: String) -> RemotePredictor {
        RemotePredictor::new(endpoint, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_posts_full_text_and_reads_fraud_proba() {
        let (endpoint, server) = serve_once("200 OK", r#"{"fraud_proba": 0.73}"#);
        let form = PostingForm {
            title: "Data entry".to_string(),
            description: "Work from home".to_string(),
            ..Default::default()
        };

        let probability = predictor(endpoint).predict(&form).unwrap();
        assert!((probability - 0.73).abs() < 1e-9);

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /predict"));
        assert!(request.contains(r#"{"full_text":"Data entry Work from home"}"#));
    }

    #[test]
    fn test_accepts_probability_field_and_clamps() {
        let (endpoint, server) = serve_once("200 OK", r#"{"probability": 1.25}"#);
        assert_eq!(predictor(endpoint).predict_text("x").unwrap(), 1.0);
        server.join().unwrap();
    }

    #[test]
    fn test_non_success_status_is_an_error() {
        let (endpoint, server) = serve_once("503 Service Unavailable", r#"{"error":"busy"}"#);
        let err = predictor(endpoint).predict_text("x").unwrap_err();
        assert!(err.to_string().contains("503"));
        server.join().unwrap();
    }

    #[test]
    fn test_parse_probability() {
        assert_eq!(parse_probability(&json!({"fraud_proba": 0.2, "probability": 0.9})).unwrap(), 0.2);
        assert_eq!(parse_probability(&json!({"probability": 0.9})).unwrap(), 0.9);
        assert!(parse_probability(&json!({"fraud_proba": "high"})).is_err());
        assert!(parse_probability(&json!({"label": 1})).is_err());
    }

    #[test]
    fn test_rejects_empty_endpoint() {
        assert!(RemotePredictor::new("  ".to_string(), Duration::from_secs(1)).is_err());
    }
}
