//! Integration tests for the image bot handler chain.
//!
//! Builds the production order (auth → registration → generation) over a recording bot,
//! an in-memory user store and an orchestrator with a scripted engine, then drives it with
//! core messages the way the Telegram REPL would.

use async_trait::async_trait;
use chrono::Utc;
use dbot_core::{Bot, Chat, HandlerResponse, Message, Orientation, Photo, Result, Style, User};
use generation::{GenerationOrchestrator, OrchestratorOptions, TracingExceptionReporter};
use handler_chain::HandlerChain;
use image_generation_client::{
    EngineError, GenerateImageRequest, GenerationTask, ImageGenerationEngine,
};
use image_handlers::{
    welcome_message, AuthHandler, ImageGenerationHandler, RegistrationHandler,
    MSG_ALREADY_REGISTERED, MSG_GENERATION_FAILED, MSG_GENERATION_STARTED, MSG_NOT_ALLOWED,
    MSG_REGISTERED, MSG_REGISTER_FIRST,
};
use notification::{DeliveryError, NotificationChannel};
use std::sync::{Arc, Mutex};
use storage::{GenerationStatus, InMemoryGenerationStore, InMemoryUserStore, UserStore};

const ALLOWED_USER: i64 = 1001;
const CHAT_ID: i64 = -500;

#[derive(Default)]
struct RecordingBot {
    replies: Mutex<Vec<(i64, String)>>,
}

impl RecordingBot {
    fn last_reply(&self) -> Option<String> {
        self.replies.lock().unwrap().last().map(|(_, text)| text.clone())
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        self.replies.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }

    async fn send_photo(&self, _chat_id: i64, _url: &str, _caption: Option<&str>) -> Result<()> {
        Ok(())
    }

    async fn send_media_group(&self, _chat_id: i64, _photos: &[Photo]) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
struct ScriptedEngine {
    requests: Mutex<Vec<GenerateImageRequest>>,
    reject: bool,
}

#[async_trait]
impl ImageGenerationEngine for ScriptedEngine {
    async fn generate(&self, request: &GenerateImageRequest) -> std::result::Result<GenerationTask, EngineError> {
        if self.reject {
            return Err(EngineError::Rejected("statusCode 500".to_string()));
        }
        let mut requests = self.requests.lock().unwrap();
        requests.push(request.clone());
        Ok(GenerationTask {
            task_id: format!("T{}", requests.len()),
            images: Vec::new(),
        })
    }

    async fn get_generated_images(&self, task_id: &str) -> std::result::Result<GenerationTask, EngineError> {
        Ok(GenerationTask {
            task_id: task_id.to_string(),
            images: Vec::new(),
        })
    }
}

struct SilentChannel;

#[async_trait]
impl NotificationChannel for SilentChannel {
    async fn send_messages(&self, _chat_id: i64, _messages: &[String]) -> std::result::Result<(), DeliveryError> {
        Ok(())
    }

    async fn send_photos(&self, _chat_id: i64, _photos: &[Photo]) -> std::result::Result<(), DeliveryError> {
        Ok(())
    }
}

struct Setup {
    bot: Arc<RecordingBot>,
    users: Arc<InMemoryUserStore>,
    engine: Arc<ScriptedEngine>,
    orchestrator: Arc<GenerationOrchestrator>,
    chain: HandlerChain,
}

fn setup_with(engine: ScriptedEngine) -> Setup {
    let bot = Arc::new(RecordingBot::default());
    let users = Arc::new(InMemoryUserStore::new());
    let engine = Arc::new(engine);
    let orchestrator = Arc::new(GenerationOrchestrator::new(
        Arc::new(InMemoryGenerationStore::new()),
        engine.clone(),
        Arc::new(SilentChannel),
        Arc::new(TracingExceptionReporter),
        "http://localhost/webhooks/generated-images/generation-completed".to_string(),
        OrchestratorOptions::default(),
    ));

    let chain = HandlerChain::new()
        .add_handler(Arc::new(AuthHandler::new(bot.clone(), [ALLOWED_USER])))
        .add_handler(Arc::new(RegistrationHandler::new(bot.clone(), users.clone())))
        .add_handler(Arc::new(ImageGenerationHandler::new(
            bot.clone(),
            users.clone(),
            orchestrator.clone(),
        )));

    Setup {
        bot,
        users,
        engine,
        orchestrator,
        chain,
    }
}

fn setup() -> Setup {
    setup_with(ScriptedEngine::default())
}

fn message(user_id: i64, content: &str) -> Message {
    Message {
        id: "m1".to_string(),
        user: User {
            id: user_id,
            username: Some("ann".to_string()),
            first_name: Some("Ann".to_string()),
            last_name: Some("Lee".to_string()),
        },
        chat: Chat {
            id: CHAT_ID,
            chat_type: "private".to_string(),
        },
        content: content.to_string(),
        created_at: Utc::now(),
    }
}

/// **Test: senders outside the allow-list are refused and nothing else runs.**
#[tokio::test]
async fn test_unknown_sender_rejected() {
    let s = setup();

    let response = s.chain.handle(&message(42, "/register")).await.unwrap();

    assert_eq!(response, HandlerResponse::Stop);
    assert_eq!(s.bot.last_reply().as_deref(), Some(MSG_NOT_ALLOWED));
    assert!(!s.users.exists(42).await.unwrap());
}

/// **Test: /start asks unregistered users to register, then greets them by name.**
#[tokio::test]
async fn test_start_before_and_after_register() {
    let s = setup();

    s.chain.handle(&message(ALLOWED_USER, "/start")).await.unwrap();
    assert_eq!(s.bot.last_reply().as_deref(), Some(MSG_REGISTER_FIRST));

    s.chain.handle(&message(ALLOWED_USER, "/register")).await.unwrap();
    assert_eq!(s.bot.last_reply().as_deref(), Some(MSG_REGISTERED));

    s.chain.handle(&message(ALLOWED_USER, "/start")).await.unwrap();
    assert_eq!(s.bot.last_reply(), Some(welcome_message("Ann")));

    let user = s.users.get_by_external_id(ALLOWED_USER).await.unwrap();
    assert_eq!(user.first_name.as_deref(), Some("Ann"));
    assert_eq!(user.last_name.as_deref(), Some("Lee"));
}

/// **Test: a second /register does not create a second user.**
#[tokio::test]
async fn test_register_twice() {
    let s = setup();

    s.chain.handle(&message(ALLOWED_USER, "/register")).await.unwrap();
    s.chain.handle(&message(ALLOWED_USER, "/register@image_bot")).await.unwrap();

    assert_eq!(s.bot.last_reply().as_deref(), Some(MSG_ALREADY_REGISTERED));
}

/// **Test: prompts from unregistered users are not submitted.**
#[tokio::test]
async fn test_prompt_requires_registration() {
    let s = setup();

    s.chain.handle(&message(ALLOWED_USER, "a cat on a roof")).await.unwrap();

    assert_eq!(s.bot.last_reply().as_deref(), Some(MSG_REGISTER_FIRST));
    assert!(s.engine.requests.lock().unwrap().is_empty());
}

/// **Test: a registered user's text becomes a photo, vertical generation for their chat.**
#[tokio::test]
async fn test_prompt_creates_generation() {
    let s = setup();
    s.chain.handle(&message(ALLOWED_USER, "/register")).await.unwrap();

    let response = s
        .chain
        .handle(&message(ALLOWED_USER, "  a cat on a roof "))
        .await
        .unwrap();

    assert_eq!(response, HandlerResponse::Stop);
    assert_eq!(s.bot.last_reply().as_deref(), Some(MSG_GENERATION_STARTED));

    let requests = s.engine.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].prompt, "a cat on a roof");
    assert_eq!(requests[0].style, Style::Photo);
    assert_eq!(requests[0].orientation, Orientation::Vertical);

    let record = s.orchestrator.get_by_task_id("T1").await.unwrap();
    let user = s.users.get_by_external_id(ALLOWED_USER).await.unwrap();
    assert_eq!(record.user_id, user.id);
    assert_eq!(record.chat_id, CHAT_ID);
    assert_eq!(record.generation_status, GenerationStatus::Processing);
}

/// **Test: an engine rejection is reported to the user and does not error the chain.**
#[tokio::test]
async fn test_engine_rejection_reply() {
    let s = setup_with(ScriptedEngine {
        reject: true,
        ..Default::default()
    });
    s.chain.handle(&message(ALLOWED_USER, "/register")).await.unwrap();

    let response = s.chain.handle(&message(ALLOWED_USER, "a cat")).await.unwrap();

    assert_eq!(response, HandlerResponse::Stop);
    assert_eq!(s.bot.last_reply().as_deref(), Some(MSG_GENERATION_FAILED));
}

/// **Test: unknown commands are not treated as prompts.**
#[tokio::test]
async fn test_unknown_command_passes_through() {
    let s = setup();
    s.chain.handle(&message(ALLOWED_USER, "/register")).await.unwrap();
    let replies_before = s.bot.replies.lock().unwrap().len();

    let response = s.chain.handle(&message(ALLOWED_USER, "/help")).await.unwrap();

    assert_eq!(response, HandlerResponse::Continue);
    assert_eq!(s.bot.replies.lock().unwrap().len(), replies_before);
    assert!(s.engine.requests.lock().unwrap().is_empty());
}
