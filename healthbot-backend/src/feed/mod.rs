//! Outbreak alert feed client
//!
//! Pulls the current alert list from the configured HTTP feed. The dispatch
//! loop must never be blocked or crashed by a flaky upstream, so the public
//! entry point degrades every failure to an empty list; the error taxonomy
//! lives in `try_fetch` where it stays visible in the signature.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::models::Alert;

/// Request timeout so an unresponsive feed cannot stall a cycle.
const FEED_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("feed returned HTTP {0}")]
    Status(u16),
}

pub struct FeedClient {
    http: reqwest::Client,
    url: Option<String>,
}

impl FeedClient {
    /// `url = None` (or empty) disables polling fetches entirely.
    pub fn new(url: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(FEED_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            url: url.filter(|u| !u.trim().is_empty()),
        }
    }

    /// Fetch the current alert list. Network errors, timeouts, non-success
    /// statuses and unexpected payload shapes all yield an empty list; an
    /// unconfigured URL returns empty without a network call.
    pub async fn fetch_alerts(&self) -> Vec<Alert> {
        let url = match &self.url {
            Some(u) => u.clone(),
            None => return Vec::new(),
        };

        match self.try_fetch(&url).await {
            Ok(alerts) => alerts,
            Err(e) => {
                log::warn!("Outbreak feed unavailable: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<Vec<Alert>, FeedError> {
        let resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(FeedError::Status(resp.status().as_u16()));
        }
        let body: Value = resp.json().await?;
        Ok(parse_alert_payload(body))
    }
}

/// Accepts either a bare list of alert records or an object with an
/// `alerts` field holding the list. Any other top-level shape means no
/// alerts, and records that are not objects are dropped individually.
fn parse_alert_payload(body: Value) -> Vec<Alert> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("alerts") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_bare_list() {
        let alerts = parse_alert_payload(json!([
            {"title": "Dengue Alert", "region": "North Zone", "message": "Avoid standing water"},
            {"title": "Cholera Watch", "severity": "high", "message": "Boil drinking water"}
        ]));
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].title.as_deref(), Some("Dengue Alert"));
        assert_eq!(alerts[1].severity.as_deref(), Some("high"));
    }

    #[test]
    fn test_parse_wrapped_list() {
        let alerts = parse_alert_payload(json!({
            "alerts": [{"title": "Dengue Alert", "message": "Avoid standing water"}],
            "generated_at": "2024-01-01"
        }));
        assert_eq!(alerts.len(), 1);
    }

    #[test]
    fn test_parse_unexpected_shapes_are_empty() {
        assert!(parse_alert_payload(json!({"items": []})).is_empty());
        assert!(parse_alert_payload(json!("no alerts")).is_empty());
        assert!(parse_alert_payload(json!(42)).is_empty());
        assert!(parse_alert_payload(json!(null)).is_empty());
    }

    #[test]
    fn test_parse_drops_non_object_records() {
        let alerts = parse_alert_payload(json!([
            "garbage",
            {"title": "Dengue Alert"},
            7
        ]));
        assert_eq!(alerts.len(), 1);
    }

    #[tokio::test]
    async fn test_unconfigured_url_returns_empty() {
        assert!(FeedClient::new(None).fetch_alerts().await.is_empty());
        assert!(FeedClient::new(Some("  ".to_string())).fetch_alerts().await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_feed_degrades_to_empty() {
        let client = FeedClient::new(Some("not a valid url".to_string()));
        assert!(client.fetch_alerts().await.is_empty());
    }
}
