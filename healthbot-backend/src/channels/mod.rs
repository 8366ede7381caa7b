//! Outbound delivery: address normalization and the provider client.

pub mod router;
pub mod twilio;

pub use router::{ChannelRouter, RouteDecision};
pub use twilio::{AlertSender, ProviderError, TwilioSender};
