//! Remote artifact fetch for the exercise classifier.
//!
//! Unlike the rest of the artifact set, the exercise classifier is published
//! at a fixed HTTPS URL and fetched once at process warm-up. The fetch blocks
//! readiness: an unreachable host, a non-success status, or a corrupt payload
//! is fatal with an error naming the artifact and URL.
//!
//! Transport failures and bad statuses are retried a bounded number of times
//! with exponential backoff; a corrupt payload is not retried, since a second
//! download of the same bytes cannot improve it.

use std::time::Duration;

use super::artifact::{ArtifactError, SoftmaxClassifier, EXERCISE_MODEL};

/// Published location of the exercise classifier artifact.
pub const DEFAULT_EXERCISE_MODEL_URL: &str =
    "https://exer-models.s3.us-east-2.amazonaws.com/exercise_classifier.json";

/// Per-request timeout.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Total attempts (first try + retries).
const FETCH_ATTEMPTS: u32 = 3;

/// Backoff before retry `n` is `RETRY_BASE_DELAY * 2^(n-1)`.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Fetch and validate the exercise classifier artifact.
///
/// # Errors
/// Returns `ArtifactError::Fetch` when the host is unreachable or keeps
/// returning a non-success status, and `ArtifactError::Malformed` when the
/// payload does not deserialize into a valid classifier.
pub fn fetch_exercise_classifier(url: &str) -> Result<SoftmaxClassifier, ArtifactError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| fetch_error(url, format!("failed to build HTTP client: {e}")))?;

    let mut last_error = fetch_error(url, "no fetch attempted".to_string());
    for attempt in 1..=FETCH_ATTEMPTS {
        if attempt > 1 {
            let backoff = RETRY_BASE_DELAY * 2u32.pow(attempt - 2);
            tracing::warn!(
                "Exercise model fetch attempt {}/{} failed, retrying in {:?}: {}",
                attempt - 1,
                FETCH_ATTEMPTS,
                backoff,
                last_error
            );
            std::thread::sleep(backoff);
        }

        match try_fetch(&client, url) {
            Ok(model) => {
                tracing::info!(
                    "Fetched exercise classifier from {} ({} classes, {} features)",
                    url,
                    model.classes.len(),
                    model.n_features()
                );
                return Ok(model);
            }
            // A payload that parsed but failed validation will not change on retry.
            Err(e @ ArtifactError::Malformed { .. }) => return Err(e),
            Err(e) => last_error = e,
        }
    }

    Err(last_error)
}

fn try_fetch(client: &reqwest::blocking::Client, url: &str) -> Result<SoftmaxClassifier, ArtifactError> {
    let response = client
        .get(url)
        .send()
        .map_err(|e| fetch_error(url, e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(fetch_error(url, format!("server returned status {status}")));
    }

    let body = response
        .text()
        .map_err(|e| fetch_error(url, format!("failed to read response body: {e}")))?;

    SoftmaxClassifier::from_json_str(EXERCISE_MODEL, &body)
}

fn fetch_error(url: &str, reason: String) -> ArtifactError {
    ArtifactError::Fetch {
        name: EXERCISE_MODEL,
        url: url.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;

    /// Serve `connections` canned HTTP responses on an ephemeral port.
    fn spawn_server(body: &'static str, status_line: &'static str, connections: usize) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");

        std::thread::spawn(move || {
            for _ in 0..connections {
                let Ok((mut stream, _)) = listener.accept() else {
                    return;
                };
                // Drain the request head before responding.
                let mut reader = BufReader::new(stream.try_clone().expect("clone"));
                let mut line = String::new();
                while reader.read_line(&mut line).is_ok() {
                    if line == "\r\n" || line.is_empty() {
                        break;
                    }
                    line.clear();
                }
                let response = format!(
                    "{status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        format!("http://{addr}/exercise_classifier.json")
    }

    #[test]
    fn test_fetch_success() {
        let url = spawn_server(
            r#"{"classes":[0,1],"coefficients":[[0.1,0.2],[0.3,0.4]],"intercepts":[0.0,0.0]}"#,
            "HTTP/1.1 200 OK",
            1,
        );

        let model = fetch_exercise_classifier(&url).expect("fetch");
        assert_eq!(model.classes, vec![0, 1]);
        assert_eq!(model.n_features(), 2);
    }

    #[test]
    fn test_fetch_fails_on_bad_status_after_retries() {
        let url = spawn_server("", "HTTP/1.1 500 Internal Server Error", FETCH_ATTEMPTS as usize);

        let err = fetch_exercise_classifier(&url).expect_err("must fail");
        let msg = err.to_string();
        assert!(msg.contains(EXERCISE_MODEL));
        assert!(msg.contains("500"));
    }

    #[test]
    fn test_fetch_fails_fast_on_corrupt_payload() {
        let url = spawn_server(r#"{"classes":[]}"#, "HTTP/1.1 200 OK", 1);

        let err = fetch_exercise_classifier(&url).expect_err("must fail");
        assert!(matches!(err, ArtifactError::Malformed { .. }));
    }
}
