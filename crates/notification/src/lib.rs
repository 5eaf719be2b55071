//! # notification
//!
//! Delivers outbound messages to a chat without tripping the transport's flood control:
//! sends go out one at a time, in order, with a random pause between them.

mod channel;
mod error;
mod throttle;

pub use channel::{NotificationChannel, ThrottledChannel, MEDIA_GROUP_LIMIT};
pub use error::DeliveryError;
pub use throttle::ThrottleConfig;
