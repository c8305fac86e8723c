use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use config::HarvestConfig;
use rate_limit::RequestWindow;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::{Client, Method, Response, StatusCode};
use secrecy::ExposeSecret;
use serde_json::{Value, json};

use crate::error::HarvestError;
use crate::types::{
    ApplicationFilters, CandidateFilters, CandidateUpdate, JobFilters, JobStageFilters,
    NewCandidate, NoteVisibility, Pagination, UserFilters,
};

/// First backoff delay; doubled on every further attempt.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Authenticated, rate-limited client for the Harvest API.
///
/// One instance should be shared by all callers of a process so the rolling
/// request window accounts for every outbound request.
#[derive(Debug)]
pub struct HarvestClient {
    client: Client,
    base_url: String,
    max_retries: u32,
    window: RequestWindow,
}

impl HarvestClient {
    /// Build a client from the Harvest configuration section.
    ///
    /// Fails when no API key is configured; no network traffic happens here.
    pub fn new(config: &HarvestConfig) -> crate::Result<Self> {
        let api_key = config.api_key.as_ref().ok_or(HarvestError::MissingCredential)?;

        // Harvest uses basic auth with the key as username and a blank password.
        let credentials = STANDARD.encode(format!("{}:", api_key.expose_secret()));

        let mut auth = HeaderValue::from_str(&format!("Basic {credentials}")).map_err(|_| {
            HarvestError::InvalidParameters(
                "API key contains characters not allowed in an HTTP header".to_string(),
            )
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| {
                log::error!("Failed to create the Harvest HTTP client: {e}");
                HarvestError::Connection(e.to_string())
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            window: RequestWindow::new(config.rate_limit.limit, config.rate_limit.interval),
        })
    }

    /// Issue one request, waiting on the rate window and retrying throttled
    /// or failing attempts with exponential backoff.
    ///
    /// Throttling responses (429) and server errors are retried up to the
    /// configured attempt count; a `Retry-After` hint from the server
    /// overrides the computed backoff for that attempt. Other client errors
    /// are surfaced immediately.
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&Value>,
    ) -> crate::Result<Value> {
        let url = format!("{}/{path}", self.base_url);
        let mut delay = RETRY_BASE_DELAY;
        let mut attempts = 0;

        loop {
            attempts += 1;
            self.window.acquire().await;

            log::debug!("{method} {url} (attempt {attempts})");

            let mut request = self.client.request(method.clone(), &url);

            if !query.is_empty() {
                request = request.query(query);
            }

            if let Some(body) = body {
                request = request.json(body);
            }

            let retry_hint = match request.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return parse_success(response).await;
                    }

                    let retry_hint = retry_after(&response);
                    let message = error_message(response).await;

                    if status != StatusCode::TOO_MANY_REQUESTS && !status.is_server_error() {
                        return Err(HarvestError::Api {
                            status: status.as_u16(),
                            message,
                        });
                    }

                    if attempts >= self.max_retries {
                        return Err(if status == StatusCode::TOO_MANY_REQUESTS {
                            HarvestError::RateLimited { attempts, message }
                        } else {
                            HarvestError::Api {
                                status: status.as_u16(),
                                message,
                            }
                        });
                    }

                    log::warn!("Harvest returned {status} for {method} {url}, retrying");
                    retry_hint
                }
                Err(error) => {
                    // Connection failures and timeouts are retryable.
                    if attempts >= self.max_retries {
                        return Err(HarvestError::Connection(error.to_string()));
                    }

                    log::warn!("Request to {url} failed ({error}), retrying");
                    None
                }
            };

            let wait = retry_hint.unwrap_or(delay);
            tokio::time::sleep(wait).await;
            delay = delay.saturating_mul(2);
        }
    }

    /// List jobs, newest first per the Harvest default ordering.
    pub async fn list_jobs(&self, filters: &JobFilters) -> crate::Result<Value> {
        self.send(Method::GET, "jobs", &filters.query(), None).await
    }

    /// Fetch a single job.
    pub async fn get_job(&self, job_id: i64) -> crate::Result<Value> {
        self.send(Method::GET, &format!("jobs/{job_id}"), &[], None).await
    }

    /// List candidates.
    pub async fn list_candidates(&self, filters: &CandidateFilters) -> crate::Result<Value> {
        self.send(Method::GET, "candidates", &filters.query(), None).await
    }

    /// Fetch a single candidate.
    pub async fn get_candidate(&self, candidate_id: i64) -> crate::Result<Value> {
        self.send(Method::GET, &format!("candidates/{candidate_id}"), &[], None)
            .await
    }

    /// Create a candidate.
    pub async fn create_candidate(&self, candidate: &NewCandidate) -> crate::Result<Value> {
        if candidate.first_name.trim().is_empty() || candidate.last_name.trim().is_empty() {
            return Err(HarvestError::InvalidParameters(
                "first_name and last_name must not be empty".to_string(),
            ));
        }

        self.send(Method::POST, "candidates", &[], Some(&candidate.body()))
            .await
    }

    /// Update a candidate; only the provided fields are changed.
    pub async fn update_candidate(
        &self,
        candidate_id: i64,
        update: &CandidateUpdate,
    ) -> crate::Result<Value> {
        if update.is_empty() {
            return Err(HarvestError::InvalidParameters(
                "at least one field to update must be provided".to_string(),
            ));
        }

        self.send(
            Method::PATCH,
            &format!("candidates/{candidate_id}"),
            &[],
            Some(&update.body()),
        )
        .await
    }

    /// Add a note to a candidate's activity feed.
    pub async fn add_candidate_note(
        &self,
        candidate_id: i64,
        note: &str,
        visibility: NoteVisibility,
    ) -> crate::Result<Value> {
        let body = note_body(note, visibility)?;

        self.send(
            Method::POST,
            &format!("candidates/{candidate_id}/activity_feed/notes"),
            &[],
            Some(&body),
        )
        .await
    }

    /// List applications.
    pub async fn list_applications(&self, filters: &ApplicationFilters) -> crate::Result<Value> {
        self.send(Method::GET, "applications", &filters.query(), None).await
    }

    /// Fetch a single application.
    pub async fn get_application(&self, application_id: i64) -> crate::Result<Value> {
        self.send(Method::GET, &format!("applications/{application_id}"), &[], None)
            .await
    }

    /// Move an application from its current stage. Without an explicit
    /// target stage the remote advances to the next configured stage.
    pub async fn advance_application(
        &self,
        application_id: i64,
        from_stage_id: i64,
        to_stage_id: Option<i64>,
    ) -> crate::Result<Value> {
        let mut body = json!({ "from_stage_id": from_stage_id });

        if let Some(to_stage_id) = to_stage_id {
            body["to_stage_id"] = json!(to_stage_id);
        }

        self.send(
            Method::POST,
            &format!("applications/{application_id}/advance"),
            &[],
            Some(&body),
        )
        .await
    }

    /// Reject an application, optionally recording a reason and notes.
    pub async fn reject_application(
        &self,
        application_id: i64,
        rejection_reason_id: Option<i64>,
        notes: Option<&str>,
    ) -> crate::Result<Value> {
        let mut body = json!({});

        if let Some(rejection_reason_id) = rejection_reason_id {
            body["rejection_reason_id"] = json!(rejection_reason_id);
        }

        if let Some(notes) = notes {
            body["notes"] = json!(notes);
        }

        self.send(
            Method::POST,
            &format!("applications/{application_id}/reject"),
            &[],
            Some(&body),
        )
        .await
    }

    /// Add a note to an application.
    pub async fn add_application_note(
        &self,
        application_id: i64,
        note: &str,
        visibility: NoteVisibility,
    ) -> crate::Result<Value> {
        let body = note_body(note, visibility)?;

        self.send(
            Method::POST,
            &format!("applications/{application_id}/notes"),
            &[],
            Some(&body),
        )
        .await
    }

    /// List hiring pipeline stages, either across all jobs or for one job.
    pub async fn list_job_stages(&self, filters: &JobStageFilters) -> crate::Result<Value> {
        // With a job filter the per-job sub-resource is the right endpoint.
        let path = match filters.job_id {
            Some(job_id) => format!("jobs/{job_id}/stages"),
            None => "job_stages".to_string(),
        };

        self.send(Method::GET, &path, &filters.query(), None).await
    }

    /// Fetch a single job stage.
    pub async fn get_job_stage(&self, stage_id: i64) -> crate::Result<Value> {
        self.send(Method::GET, &format!("job_stages/{stage_id}"), &[], None)
            .await
    }

    /// List departments.
    pub async fn list_departments(&self, pagination: &Pagination) -> crate::Result<Value> {
        let mut query = Vec::new();
        pagination.push_query(&mut query);

        self.send(Method::GET, "departments", &query, None).await
    }

    /// List offices.
    pub async fn list_offices(&self, pagination: &Pagination) -> crate::Result<Value> {
        let mut query = Vec::new();
        pagination.push_query(&mut query);

        self.send(Method::GET, "offices", &query, None).await
    }

    /// List users.
    pub async fn list_users(&self, filters: &UserFilters) -> crate::Result<Value> {
        self.send(Method::GET, "users", &filters.query(), None).await
    }
}

fn note_body(note: &str, visibility: NoteVisibility) -> crate::Result<Value> {
    if note.trim().is_empty() {
        return Err(HarvestError::InvalidParameters(
            "note must not be empty".to_string(),
        ));
    }

    Ok(json!({
        "body": note,
        "visibility": visibility.as_str(),
    }))
}

async fn parse_success(response: Response) -> crate::Result<Value> {
    if response.status() == StatusCode::NO_CONTENT {
        return Ok(json!({}));
    }

    response
        .json()
        .await
        .map_err(|e| HarvestError::Connection(format!("Invalid JSON in response: {e}")))
}

fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_secs)
}

async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    extract_message(status, &body)
}

/// Harvest error bodies carry a top-level `message`; fall back to the raw
/// body or the status reason when the shape is different.
fn extract_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(body)
        && let Some(Value::String(message)) = object.get("message")
    {
        return message.clone();
    }

    let trimmed = body.trim();

    if trimmed.is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        let mut message = trimmed.chars().take(200).collect::<String>();

        if trimmed.chars().count() > 200 {
            message.push('…');
        }

        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_extracted_from_harvest_error_body() {
        let message = extract_message(
            StatusCode::NOT_FOUND,
            r#"{"message":"Resource not found"}"#,
        );
        assert_eq!(message, "Resource not found");
    }

    #[test]
    fn non_json_body_passed_through() {
        let message = extract_message(StatusCode::BAD_GATEWAY, "upstream exploded");
        assert_eq!(message, "upstream exploded");
    }

    #[test]
    fn empty_body_falls_back_to_status_reason() {
        let message = extract_message(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(message, "Service Unavailable");
    }

    #[test]
    fn overlong_bodies_are_truncated() {
        let body = "x".repeat(300);
        let message = extract_message(StatusCode::INTERNAL_SERVER_ERROR, &body);

        assert_eq!(message.chars().count(), 201);
        assert!(message.ends_with('…'));
    }

    #[test]
    fn client_requires_a_credential() {
        let config = config::HarvestConfig::default();

        let error = HarvestClient::new(&config).unwrap_err();
        assert!(matches!(error, HarvestError::MissingCredential));
    }
}
