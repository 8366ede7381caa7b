use std::env;

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub poll_interval_seconds: u64,
    pub feed_url: Option<String>,
    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    pub twilio_sms_from: Option<String>,
    pub twilio_whatsapp_from: Option<String>,
    pub preferred_channel: String,
    pub relay_all_alerts: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "./.db/healthbot.db".to_string()),
            poll_interval_seconds: env::var("ALERT_POLL_INTERVAL_SECONDS")
                .unwrap_or_else(|_| "900".to_string())
                .parse()
                .expect("ALERT_POLL_INTERVAL_SECONDS must be a valid number"),
            feed_url: non_empty(env::var("OUTBREAK_API_URL").ok()),
            twilio_account_sid: non_empty(env::var("TWILIO_ACCOUNT_SID").ok()),
            twilio_auth_token: non_empty(env::var("TWILIO_AUTH_TOKEN").ok()),
            twilio_sms_from: non_empty(env::var("TWILIO_SMS_FROM").ok()),
            twilio_whatsapp_from: non_empty(env::var("TWILIO_WHATSAPP_FROM").ok()),
            preferred_channel: env::var("PREFERRED_CHANNEL")
                .unwrap_or_else(|_| "whatsapp".to_string())
                .to_lowercase(),
            relay_all_alerts: env::var("RELAY_ALL_ALERTS")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
