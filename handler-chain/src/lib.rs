//! # Handler chain
//!
//! Runs a sequence of handlers for each inbound message: every `before` gate first (any `false`
//! stops the chain), then `handle` in order until one returns Stop.

use dbot_core::{Handler, HandlerResponse, Message, Result};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Chain of handlers: before (all, in order) → handle (until Stop).
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler.
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs all before gates, then handle until Stop. Returns Stop when a gate or a handler
    /// stopped the chain, Continue when nobody claimed the message.
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    pub async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        for h in &self.handlers {
            let name = std::any::type_name_of_val(h.as_ref());
            if !h.before(message).await? {
                info!(handler = %name, "before returned false, chain stopped");
                return Ok(HandlerResponse::Stop);
            }
        }

        for h in &self.handlers {
            let name = std::any::type_name_of_val(h.as_ref());
            let response = h.handle(message).await?;
            debug!(handler = %name, response = ?response, "handler processed");
            if response == HandlerResponse::Stop {
                return Ok(HandlerResponse::Stop);
            }
        }

        debug!(message_id = %message.id, "no handler claimed the message");
        Ok(HandlerResponse::Continue)
    }
}
