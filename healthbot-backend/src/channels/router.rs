//! Channel router
//!
//! Turns a subscriber's stored channel/address into the transport address
//! and sending identity for one delivery, or a skip when no usable identity
//! is configured. A skip is not an error; the recipient simply sits out the
//! cycle.

use crate::models::Subscriber;

const WHATSAPP_PREFIX: &str = "whatsapp:";

/// Outcome of routing one subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteDecision {
    Deliver { to: String, from: String },
    Skip { reason: String },
}

pub struct ChannelRouter {
    prefer_whatsapp: bool,
    sms_from: Option<String>,
    whatsapp_from: Option<String>,
}

impl ChannelRouter {
    pub fn new(
        preferred_channel: &str,
        sms_from: Option<String>,
        whatsapp_from: Option<String>,
    ) -> Self {
        Self {
            prefer_whatsapp: preferred_channel.eq_ignore_ascii_case("whatsapp"),
            sms_from: sms_from.filter(|s| !s.is_empty()),
            whatsapp_from: whatsapp_from.filter(|s| !s.is_empty()),
        }
    }

    /// Resolve the transport address and sender identity for a subscriber.
    ///
    /// A bare number on a Twilio-family channel is rewritten to the
    /// `whatsapp:` form when that is the preferred channel and a WhatsApp
    /// sending identity exists; otherwise the stored address passes through
    /// unchanged. The identity is then chosen by the resolved form.
    pub fn resolve(&self, subscriber: &Subscriber) -> RouteDecision {
        if subscriber.address.is_empty() {
            return RouteDecision::Skip {
                reason: "subscriber has no address".to_string(),
            };
        }

        let mut to = subscriber.address.clone();
        if subscriber.channel.is_twilio()
            && self.prefer_whatsapp
            && !to.starts_with(WHATSAPP_PREFIX)
            && self.whatsapp_from.is_some()
        {
            to = format!("{}{}", WHATSAPP_PREFIX, to);
        }

        let (identity, kind) = if to.starts_with(WHATSAPP_PREFIX) {
            (self.whatsapp_from.as_deref(), "whatsapp")
        } else {
            (self.sms_from.as_deref(), "sms")
        };

        match identity {
            Some(from) => RouteDecision::Deliver {
                to,
                from: from.to_string(),
            },
            None => RouteDecision::Skip {
                reason: format!("no {} sending identity configured", kind),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChannelKind, Language};
    use chrono::Utc;

    fn subscriber(channel: ChannelKind, address: &str) -> Subscriber {
        Subscriber {
            recipient_id: "u1".to_string(),
            channel,
            address: address.to_string(),
            language: Language::English,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_bare_number_rewritten_to_whatsapp_form() {
        let router = ChannelRouter::new(
            "whatsapp",
            Some("+15550001111".to_string()),
            Some("whatsapp:+15550002222".to_string()),
        );
        let decision = router.resolve(&subscriber(ChannelKind::TwilioSms, "+15551234567"));
        assert_eq!(
            decision,
            RouteDecision::Deliver {
                to: "whatsapp:+15551234567".to_string(),
                from: "whatsapp:+15550002222".to_string(),
            }
        );
    }

    #[test]
    fn test_already_prefixed_address_passes_through() {
        let router = ChannelRouter::new(
            "whatsapp",
            None,
            Some("whatsapp:+15550002222".to_string()),
        );
        let decision =
            router.resolve(&subscriber(ChannelKind::TwilioWhatsapp, "whatsapp:+15551234567"));
        assert_eq!(
            decision,
            RouteDecision::Deliver {
                to: "whatsapp:+15551234567".to_string(),
                from: "whatsapp:+15550002222".to_string(),
            }
        );
    }

    #[test]
    fn test_sms_preferred_keeps_bare_number_and_sms_identity() {
        let router = ChannelRouter::new(
            "sms",
            Some("+15550001111".to_string()),
            Some("whatsapp:+15550002222".to_string()),
        );
        let decision = router.resolve(&subscriber(ChannelKind::TwilioSms, "+15551234567"));
        assert_eq!(
            decision,
            RouteDecision::Deliver {
                to: "+15551234567".to_string(),
                from: "+15550001111".to_string(),
            }
        );
    }

    #[test]
    fn test_no_whatsapp_identity_means_no_rewrite() {
        // Without a WhatsApp sender the bare number stays on SMS.
        let router = ChannelRouter::new("whatsapp", Some("+15550001111".to_string()), None);
        let decision = router.resolve(&subscriber(ChannelKind::TwilioSms, "+15551234567"));
        assert_eq!(
            decision,
            RouteDecision::Deliver {
                to: "+15551234567".to_string(),
                from: "+15550001111".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_identity_skips_recipient() {
        let router = ChannelRouter::new("sms", None, None);
        match router.resolve(&subscriber(ChannelKind::TwilioSms, "+15551234567")) {
            RouteDecision::Skip { reason } => assert!(reason.contains("sms")),
            other => panic!("expected skip, got {:?}", other),
        }
    }

    #[test]
    fn test_rest_channel_is_never_rewritten() {
        let router = ChannelRouter::new(
            "whatsapp",
            Some("+15550001111".to_string()),
            Some("whatsapp:+15550002222".to_string()),
        );
        let decision = router.resolve(&subscriber(ChannelKind::Rest, "+15551234567"));
        assert_eq!(
            decision,
            RouteDecision::Deliver {
                to: "+15551234567".to_string(),
                from: "+15550001111".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_address_skips() {
        let router = ChannelRouter::new("sms", Some("+15550001111".to_string()), None);
        assert!(matches!(
            router.resolve(&subscriber(ChannelKind::TwilioSms, "")),
            RouteDecision::Skip { .. }
        ));
    }
}
