use dbot_core::DbotError;
use thiserror::Error;

/// Notification transport failure. The remaining queue of the failing call was dropped.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("delivery to chat {chat_id} failed at item {index}: {source}")]
    Transport {
        chat_id: i64,
        /// Position of the failing item in the caller's slice. For a failed album, the
        /// position of its first photo.
        index: usize,
        #[source]
        source: DbotError,
    },
}
