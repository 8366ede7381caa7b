//! Domain model types shared across the service.

mod alert;
mod interaction;
mod subscriber;

pub use alert::Alert;
pub use interaction::Interaction;
pub use subscriber::{ChannelKind, Language, Subscriber};
