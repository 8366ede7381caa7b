//! Conversational handler surface
//!
//! The operations the conversational front-end invokes as side effects of
//! intent resolution: subscribe, unsubscribe, and the write side of the
//! interaction log. Replies are user-facing text in the subscriber's
//! language; store failures become failure text, never a crashed handler.

use std::sync::Arc;

use crate::db::Database;
use crate::models::{ChannelKind, Language};

pub struct SubscriptionService {
    db: Arc<Database>,
}

impl SubscriptionService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Register (or fully overwrite) a subscription and return the reply
    /// text for the user.
    pub fn subscribe(
        &self,
        recipient_id: &str,
        channel: ChannelKind,
        address: &str,
        language: Language,
    ) -> String {
        match self
            .db
            .upsert_subscriber(recipient_id, channel, address, language)
        {
            Ok(()) => reply(language, Reply::Subscribed),
            Err(e) => {
                log::error!("Failed to store subscription for {}: {}", recipient_id, e);
                reply(language, Reply::SubscribeFailed)
            }
        }
    }

    /// Drop a subscription. The stored row's language localizes the reply;
    /// unknown ids get the default and still succeed.
    pub fn unsubscribe(&self, recipient_id: &str) -> String {
        let language = self
            .db
            .get_subscriber(recipient_id)
            .ok()
            .flatten()
            .map(|s| s.language)
            .unwrap_or_default();

        match self.db.delete_subscriber(recipient_id) {
            Ok(()) => reply(language, Reply::Unsubscribed),
            Err(e) => {
                log::error!("Failed to remove subscription for {}: {}", recipient_id, e);
                reply(language, Reply::UnsubscribeFailed)
            }
        }
    }

    /// Append one exchange to the interaction log. Logging is best-effort:
    /// a failure here must never reach the user or abort their reply.
    pub fn log_interaction(
        &self,
        user_id: &str,
        channel: &str,
        intent: &str,
        message: &str,
        response: &str,
    ) {
        if let Err(e) = self
            .db
            .insert_interaction(user_id, channel, intent, message, response)
        {
            log::warn!("Failed to log interaction for {}: {}", user_id, e);
        }
    }
}

enum Reply {
    Subscribed,
    SubscribeFailed,
    Unsubscribed,
    UnsubscribeFailed,
}

fn reply(language: Language, kind: Reply) -> String {
    let text = match (language, kind) {
        (Language::English, Reply::Subscribed) => {
            "You are now subscribed to outbreak alerts."
        }
        (Language::English, Reply::SubscribeFailed) => {
            "Sorry, we could not save your subscription. Please try again later."
        }
        (Language::English, Reply::Unsubscribed) => {
            "You have been unsubscribed from outbreak alerts."
        }
        (Language::English, Reply::UnsubscribeFailed) => {
            "Sorry, we could not update your subscription. Please try again later."
        }
        (Language::Hindi, Reply::Subscribed) => {
            "आपने प्रकोप अलर्ट की सदस्यता ले ली है।"
        }
        (Language::Hindi, Reply::SubscribeFailed) => {
            "क्षमा करें, आपकी सदस्यता सहेजी नहीं जा सकी। कृपया बाद में पुनः प्रयास करें।"
        }
        (Language::Hindi, Reply::Unsubscribed) => {
            "आपकी प्रकोप अलर्ट सदस्यता समाप्त कर दी गई है।"
        }
        (Language::Hindi, Reply::UnsubscribeFailed) => {
            "क्षमा करें, आपकी सदस्यता अपडेट नहीं हो सकी। कृपया बाद में पुनः प्रयास करें।"
        }
    };
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service() -> (TempDir, SubscriptionService) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.db");
        let db = Arc::new(Database::new(path.to_str().unwrap()).unwrap());
        (dir, SubscriptionService::new(db))
    }

    #[test]
    fn test_subscribe_replies_in_requested_language() {
        let (_dir, svc) = service();

        let english = svc.subscribe("u1", ChannelKind::TwilioSms, "+15551234567", Language::English);
        assert_eq!(english, "You are now subscribed to outbreak alerts.");

        let hindi = svc.subscribe("u2", ChannelKind::TwilioSms, "+15557654321", Language::Hindi);
        assert!(hindi.contains("सदस्यता"));
    }

    #[test]
    fn test_unsubscribe_uses_stored_language() {
        let (_dir, svc) = service();

        svc.subscribe("u1", ChannelKind::TwilioSms, "+15551234567", Language::Hindi);
        let goodbye = svc.unsubscribe("u1");
        assert!(goodbye.contains("समाप्त"));

        // unknown id: default language, still a success reply
        let unknown = svc.unsubscribe("ghost");
        assert_eq!(unknown, "You have been unsubscribed from outbreak alerts.");
    }

    #[test]
    fn test_log_interaction_writes_a_row() {
        let (_dir, svc) = service();

        svc.log_interaction("u1", "rest", "symptoms", "dengue symptoms?", "Fever, rash...");

        let recent = svc.db.recent_interactions(10).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].intent, "symptoms");
    }
}
