//! Response classification shared by every webhook channel.
//!
//! Channels never retry on their own: each POST is turned into exactly one
//! [`DeliveryOutcome`] and the queue decides what happens next.

use std::time::Duration;

use reqwest::{
    Client, Response, StatusCode,
    header::{CONTENT_TYPE, HeaderMap},
};

use crate::domain::{models::DeliveryOutcome, value_objects::BackoffPolicy};

/// Primary cooldown hint, seconds (fractional allowed).
pub const RETRY_AFTER_HEADER: &str = "Retry-After";
/// Secondary, provider-specific cooldown hint, seconds (fractional allowed).
pub const RESET_AFTER_HEADER: &str = "X-RateLimit-Reset-After";
pub const DEFAULT_RATE_LIMIT_COOLDOWN: Duration = Duration::from_secs(30);

const MAX_ERROR_BODY_CHARS: usize = 512;

/// POST an already serialized JSON body and classify whatever comes back.
pub async fn post_json(http: &Client, url: &str, body: Vec<u8>) -> DeliveryOutcome {
    let request = http
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .body(body);
    match request.send().await {
        Ok(response) => classify_response(response).await,
        Err(err) => classify_transport_error(&err),
    }
}

pub async fn classify_response(response: Response) -> DeliveryOutcome {
    let status = response.status();
    if status.is_success() {
        return DeliveryOutcome::Success;
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        return DeliveryOutcome::RateLimited {
            retry_after: rate_limit_cooldown(response.headers()),
        };
    }

    let body = response.text().await.unwrap_or_default();
    DeliveryOutcome::permanent(format!(
        "HTTP {}: {}",
        status.as_u16(),
        truncate(body.trim())
    ))
}

pub fn classify_transport_error(err: &reqwest::Error) -> DeliveryOutcome {
    let kind = if err.is_timeout() {
        "request timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    DeliveryOutcome::transient(format!("{kind}: {err}"))
}

/// `Retry-After`, then `X-RateLimit-Reset-After`, then 30s. Parsed values
/// are floored at one second.
pub fn rate_limit_cooldown(headers: &HeaderMap) -> Duration {
    parse_seconds(headers, RETRY_AFTER_HEADER)
        .or_else(|| parse_seconds(headers, RESET_AFTER_HEADER))
        .map(BackoffPolicy::provider_delay)
        .unwrap_or(DEFAULT_RATE_LIMIT_COOLDOWN)
}

fn parse_seconds(headers: &HeaderMap, name: &str) -> Option<Duration> {
    let secs = headers
        .get(name)?
        .to_str()
        .ok()?
        .trim()
        .parse::<f64>()
        .ok()?;
    if !secs.is_finite() {
        return None;
    }
    Some(Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(Duration::MAX))
}

fn truncate(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        return body.to_string();
    }
    let mut short: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    short.push('…');
    short
}
