//! HTTP client wrapper - executes assembled requests and reduces transport
//! outcomes to a [`ResponseOutcome`]

use std::time::Instant;

use crate::assembler::{RequestBody, RequestDescriptor};
use crate::messages::NetworkResponse;
use crate::models::{HttpMethod, ResponseOutcome};

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::GET => reqwest::Method::GET,
        HttpMethod::POST => reqwest::Method::POST,
        HttpMethod::PUT => reqwest::Method::PUT,
        HttpMethod::DELETE => reqwest::Method::DELETE,
        HttpMethod::PATCH => reqwest::Method::PATCH,
        HttpMethod::HEAD => reqwest::Method::HEAD,
        HttpMethod::OPTIONS => reqwest::Method::OPTIONS,
    }
}

/// Build a reqwest request from a descriptor
fn build_request(
    client: &reqwest::Client,
    descriptor: &RequestDescriptor,
) -> reqwest::RequestBuilder {
    let mut req_builder = client
        .request(to_reqwest_method(descriptor.method), descriptor.url.clone())
        .timeout(descriptor.timeout);

    for (key, value) in &descriptor.headers {
        req_builder = req_builder.header(key, value);
    }

    match &descriptor.body {
        Some(RequestBody::Json(value)) => {
            // Content-Type was already set during assembly
            req_builder = req_builder.body(value.to_string());
        }
        Some(RequestBody::Text(text)) => {
            req_builder = req_builder.body(text.clone());
        }
        None => {}
    }

    req_builder
}

/// Execute a request and reduce the transport result to an outcome.
///
/// Any received HTTP response counts as `Success`, whatever the status code.
/// Elapsed time is wall clock from just before send, on failure paths too.
pub async fn execute(
    client: &reqwest::Client,
    descriptor: RequestDescriptor,
    request_id: u64,
) -> NetworkResponse {
    let start = Instant::now();
    let req_builder = build_request(client, &descriptor);

    let result = req_builder.send().await;

    let outcome = match result {
        Ok(resp) => {
            let status = resp.status();
            let status_text = status_text_of(status.as_u16());
            let headers: Vec<(String, String)> = resp
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
                .collect();

            match resp.text().await {
                Ok(body) => {
                    let elapsed_ms = start.elapsed().as_millis() as u64;
                    let size_bytes = body.len();
                    ResponseOutcome::Success {
                        status: status.as_u16(),
                        status_text,
                        headers,
                        body: format_body(body),
                        elapsed_ms,
                        size_bytes,
                    }
                }
                Err(e) => ResponseOutcome::Failure {
                    message: format!("Error reading body: {}", e),
                    status: Some(status.as_u16()),
                    status_text: Some(status_text),
                    body: None,
                    elapsed_ms: start.elapsed().as_millis() as u64,
                },
            }
        }
        Err(e) => reduce_send_error(&e, start.elapsed().as_millis() as u64),
    };

    NetworkResponse::Completed {
        id: request_id,
        outcome,
    }
}

/// Map a reqwest send error to a failure outcome
fn reduce_send_error(e: &reqwest::Error, elapsed_ms: u64) -> ResponseOutcome {
    let message = if e.is_timeout() {
        "Request timed out (30s)".to_string()
    } else if e.status().is_none() {
        // Nothing came back from the server at all (DNS, refused connection)
        "No response received - check your network connection".to_string()
    } else {
        format!("Request failed: {}", e)
    };

    ResponseOutcome::Failure {
        message,
        status: e.status().map(|s| s.as_u16()),
        status_text: e.status().map(|s| status_text_of(s.as_u16())),
        body: None,
        elapsed_ms,
    }
}

fn status_text_of(code: u16) -> String {
    reqwest::StatusCode::from_u16(code)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("")
        .to_string()
}

/// Pretty-print JSON bodies for display; everything else passes through
fn format_body(body: String) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
        serde_json::to_string_pretty(&json).unwrap_or(body)
    } else {
        body
    }
}

/// Create an HTTP client with default configuration
pub fn create_client() -> reqwest::Client {
    use crate::constants::REQUEST_TIMEOUT_MS;
    use std::time::Duration;

    reqwest::Client::builder()
        .timeout(Duration::from_millis(REQUEST_TIMEOUT_MS))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
