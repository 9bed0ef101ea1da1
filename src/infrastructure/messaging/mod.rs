pub mod automation_webhook;
pub mod chat_webhook;
pub mod dispatch_worker;
pub mod http_outcome;

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;

/// One pooled client shared by every channel.
pub fn build_http_client(timeout: Duration) -> anyhow::Result<Client> {
    Ok(Client::builder()
        .user_agent(concat!("voyage-notifier/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()?)
}

/// RFC 3339, UTC, millisecond precision, `Z` suffix.
pub(crate) fn iso_utc(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
