use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::config::ServerConfig;

use super::transport::{ApiOutcome, ApiRequest, HttpMethod, Transport};

/// Badge server API client with connection pooling.
pub struct BadgrClient {
    http_client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
    csrf_token: Option<String>,
}

impl BadgrClient {
    pub fn new(server: &ServerConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("badgr-cli/1.0")
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: server.base_url.trim_end_matches('/').to_string(),
            api_token: server.api_token.clone(),
            csrf_token: server.csrf_token.clone(),
        }
    }

    /// Create a new client with custom HTTP client configuration
    pub fn with_custom_client(server: &ServerConfig, http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            base_url: server.base_url.trim_end_matches('/').to_string(),
            api_token: server.api_token.clone(),
            csrf_token: server.csrf_token.clone(),
        }
    }

    fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }
}

#[async_trait]
impl Transport for BadgrClient {
    async fn send(&self, request: ApiRequest) -> ApiOutcome {
        let url = self.absolute_url(&request.url);
        debug!("{} {}", request.method.as_str(), url);

        let mut form = Form::new();
        for (name, value) in &request.fields {
            form = form.text(name.clone(), value.clone());
        }
        for file in &request.files {
            let part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
            form = form.part(file.field.clone(), part);
        }

        let mut builder = match request.method {
            HttpMethod::Post => self.http_client.post(&url),
            HttpMethod::Put => self.http_client.put(&url),
        };
        builder = builder.header("Accept", "application/json");
        if let Some(token) = &self.api_token {
            builder = builder.header("Authorization", format!("Token {token}"));
        }
        if let Some(csrf) = &self.csrf_token {
            builder = builder.header("X-CSRFToken", csrf.clone());
        }

        let response = match builder.multipart(form).send().await {
            Ok(response) => response,
            Err(err) => {
                error!("request to {url} never completed: {err}");
                return ApiOutcome::TransportFailed {
                    detail: err.to_string(),
                };
            }
        };

        let status = response.status().as_u16();
        debug!("response status: {status}");
        let body = response.text().await.unwrap_or_default();

        if request.success_statuses.contains(&status) {
            match serde_json::from_str::<Value>(&body) {
                Ok(record) => ApiOutcome::Success { status, record },
                Err(err) => {
                    error!("success status {status} but unparsable body: {err}");
                    ApiOutcome::Unparsable { status }
                }
            }
        } else {
            ApiOutcome::Rejected {
                status,
                detail: rejection_detail(&body),
            }
        }
    }
}

/// Pulls a human-readable message out of an error response body: the
/// `detail` field of a JSON object, a bare JSON string, or the raw text.
pub fn rejection_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = serde_json::from_str::<Value>(trimmed) {
        match parsed {
            Value::Object(map) => {
                if let Some(Value::String(detail)) = map.get("detail") {
                    return Some(detail.clone());
                }
            }
            Value::String(message) => return Some(message),
            _ => {}
        }
    }
    Some(trimmed.to_string())
}
