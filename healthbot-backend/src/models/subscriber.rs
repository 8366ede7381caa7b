use chrono::{DateTime, Utc};

/// Transport family used to reach a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Rest,
    TwilioSms,
    TwilioWhatsapp,
}

impl ChannelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Rest => "rest",
            ChannelKind::TwilioSms => "twilio:sms",
            ChannelKind::TwilioWhatsapp => "twilio:whatsapp",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rest" => Some(ChannelKind::Rest),
            "twilio:sms" | "sms" => Some(ChannelKind::TwilioSms),
            "twilio:whatsapp" | "whatsapp" => Some(ChannelKind::TwilioWhatsapp),
            _ => None,
        }
    }

    /// Twilio-family channels are eligible for preferred-channel rewriting.
    pub fn is_twilio(&self) -> bool {
        matches!(self, ChannelKind::TwilioSms | ChannelKind::TwilioWhatsapp)
    }
}

/// Reply language preference for a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Hindi,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Hindi => "hindi",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "english" | "en" => Some(Language::English),
            "hindi" | "hi" => Some(Language::Hindi),
            _ => None,
        }
    }
}

/// A recipient registered for outbreak alerts, one row per `recipient_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscriber {
    pub recipient_id: String,
    pub channel: ChannelKind,
    pub address: String,
    pub language: Language,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_round_trip() {
        for channel in [
            ChannelKind::Rest,
            ChannelKind::TwilioSms,
            ChannelKind::TwilioWhatsapp,
        ] {
            assert_eq!(ChannelKind::from_str(channel.as_str()), Some(channel));
        }
        assert_eq!(ChannelKind::from_str("carrier-pigeon"), None);
    }

    #[test]
    fn test_language_defaults_to_english() {
        assert_eq!(Language::default(), Language::English);
        assert_eq!(Language::from_str("HI"), Some(Language::Hindi));
        assert_eq!(Language::from_str("klingon"), None);
    }
}
