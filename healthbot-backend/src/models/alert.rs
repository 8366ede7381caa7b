use serde::Deserialize;

/// Fallback title when the feed record has none.
const DEFAULT_TITLE: &str = "Outbreak Alert";
/// Fallback body when the feed record has none.
const DEFAULT_MESSAGE: &str = "Stay cautious and follow preventive measures.";

/// One outbreak alert record as returned by the external feed.
///
/// Every field is optional: the feed makes no well-formedness promises, so
/// summary construction falls back to generic text where fields are absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Alert {
    pub title: Option<String>,
    pub region: Option<String>,
    pub severity: Option<String>,
    pub message: Option<String>,
}

impl Alert {
    /// Build the outbound message text: `"{title} - {region}: {message}"`,
    /// dropping the region segment when absent.
    pub fn summary(&self) -> String {
        let title = non_empty(&self.title).unwrap_or(DEFAULT_TITLE);
        let message = non_empty(&self.message).unwrap_or(DEFAULT_MESSAGE);
        match non_empty(&self.region) {
            Some(region) => format!("{} - {}: {}", title, region, message),
            None => format!("{}: {}", title, message),
        }
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
