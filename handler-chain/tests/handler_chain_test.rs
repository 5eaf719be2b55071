//! Integration tests for [`handler_chain::HandlerChain`].
//!
//! Covers: before gates run in order, a false gate stops the chain before any handle, the first
//! Stop ends the handle phase, and errors propagate.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use dbot_core::{Chat, DbotError, Handler, HandlerResponse, Message, User};
use handler_chain::HandlerChain;

fn create_test_message(content: &str) -> Message {
    Message {
        id: "test_message_id".to_string(),
        content: content.to_string(),
        user: User {
            id: 123,
            username: Some("test_user".to_string()),
            first_name: Some("Test".to_string()),
            last_name: None,
        },
        chat: Chat {
            id: 456,
            chat_type: "private".to_string(),
        },
        created_at: Utc::now(),
    }
}

struct OrderHandler {
    name: &'static str,
    order: Arc<Mutex<Vec<String>>>,
    response: HandlerResponse,
}

#[async_trait::async_trait]
impl Handler for OrderHandler {
    async fn before(&self, _message: &Message) -> dbot_core::Result<bool> {
        self.order.lock().unwrap().push(format!("before_{}", self.name));
        Ok(true)
    }

    async fn handle(&self, _message: &Message) -> dbot_core::Result<HandlerResponse> {
        self.order.lock().unwrap().push(format!("handle_{}", self.name));
        Ok(self.response.clone())
    }
}

/// **Test: all before gates run first, then handle in order; nobody stops → Continue.**
#[tokio::test]
async fn test_before_then_handle_in_order() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let chain = HandlerChain::new()
        .add_handler(Arc::new(OrderHandler {
            name: "first",
            order: order.clone(),
            response: HandlerResponse::Continue,
        }))
        .add_handler(Arc::new(OrderHandler {
            name: "second",
            order: order.clone(),
            response: HandlerResponse::Continue,
        }));

    let result = chain.handle(&create_test_message("test")).await.unwrap();

    assert_eq!(result, HandlerResponse::Continue);
    assert_eq!(
        *order.lock().unwrap(),
        vec!["before_first", "before_second", "handle_first", "handle_second"]
    );
}

/// **Test: the first handler returning Stop ends the handle phase.**
#[tokio::test]
async fn test_stop_ends_handle_phase() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let chain = HandlerChain::new()
        .add_handler(Arc::new(OrderHandler {
            name: "first",
            order: order.clone(),
            response: HandlerResponse::Stop,
        }))
        .add_handler(Arc::new(OrderHandler {
            name: "second",
            order: order.clone(),
            response: HandlerResponse::Continue,
        }));

    let result = chain.handle(&create_test_message("test")).await.unwrap();

    assert_eq!(result, HandlerResponse::Stop);
    assert!(!order.lock().unwrap().contains(&"handle_second".to_string()));
}

/// **Test: a before gate returning false stops the chain; no handle runs.**
#[tokio::test]
async fn test_false_gate_stops_chain() {
    struct BlockingHandler;

    #[async_trait::async_trait]
    impl Handler for BlockingHandler {
        async fn before(&self, _message: &Message) -> dbot_core::Result<bool> {
            Ok(false)
        }
    }

    struct CountingHandler(Arc<AtomicUsize>);

    #[async_trait::async_trait]
    impl Handler for CountingHandler {
        async fn handle(&self, _message: &Message) -> dbot_core::Result<HandlerResponse> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(HandlerResponse::Continue)
        }
    }

    let handle_count = Arc::new(AtomicUsize::new(0));
    let chain = HandlerChain::new()
        .add_handler(Arc::new(BlockingHandler))
        .add_handler(Arc::new(CountingHandler(handle_count.clone())));

    let result = chain.handle(&create_test_message("test")).await.unwrap();

    assert_eq!(result, HandlerResponse::Stop);
    assert_eq!(handle_count.load(Ordering::SeqCst), 0);
}

/// **Test: a handler error is returned to the caller.**
#[tokio::test]
async fn test_handler_error_propagates() {
    struct FailingHandler;

    #[async_trait::async_trait]
    impl Handler for FailingHandler {
        async fn handle(&self, _message: &Message) -> dbot_core::Result<HandlerResponse> {
            Err(DbotError::Bot("boom".to_string()))
        }
    }

    let chain = HandlerChain::new().add_handler(Arc::new(FailingHandler));

    let err = chain.handle(&create_test_message("test")).await.unwrap_err();
    assert!(matches!(err, DbotError::Bot(_)));
    assert_eq!(chain.len(), 1);
}
