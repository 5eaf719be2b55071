//! Integration tests: component wiring + webhook server + handler chain.
//!
//! Components are built from an explicit BotConfig with a recording Bot and a scripted engine
//! injected; the axum server is bound on 127.0.0.1:0 and called over HTTP with reqwest, the way
//! the engine would call it.

use async_trait::async_trait;
use chrono::Utc;
use dbot_core::{Bot, Chat, GeneratedImage, Message, Photo, User};
use image_generation_client::{
    EngineError, GenerateImageRequest, GenerationTask, ImageGenerationEngine,
};
use std::sync::{Arc, Mutex};
use storage::GenerationStatus;
use telegram_bot::{
    build_bot_components, build_handler_chain, create_generation_store, serve, BaseConfig,
    BotComponents, BotConfig, GenerationConfig, GenerationStoreKind, GENERATION_COMPLETED_PATH,
};
use tempfile::TempDir;

const USER_ID: i64 = 284307817;
const CHAT_ID: i64 = 284307817;

#[derive(Default)]
struct RecordingBot {
    sent: Mutex<Vec<(i64, String)>>,
}

impl RecordingBot {
    fn texts(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(_, t)| t.clone()).collect()
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, chat_id: i64, text: &str) -> dbot_core::Result<()> {
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }

    async fn send_photo(&self, _chat_id: i64, _url: &str, _caption: Option<&str>) -> dbot_core::Result<()> {
        Ok(())
    }

    async fn send_media_group(&self, _chat_id: i64, _photos: &[Photo]) -> dbot_core::Result<()> {
        Ok(())
    }
}

/// Hands out task 1001 and returns one image for it.
struct ScriptedEngine;

#[async_trait]
impl ImageGenerationEngine for ScriptedEngine {
    async fn generate(&self, _request: &GenerateImageRequest) -> Result<GenerationTask, EngineError> {
        Ok(GenerationTask {
            task_id: "1001".to_string(),
            images: Vec::new(),
        })
    }

    async fn get_generated_images(&self, task_id: &str) -> Result<GenerationTask, EngineError> {
        Ok(GenerationTask {
            task_id: task_id.to_string(),
            images: vec![GeneratedImage {
                id: "1".to_string(),
                url: "https://cdn.example/1001/1.png".to_string(),
            }],
        })
    }
}

fn config(store: GenerationStoreKind, database_url: &str) -> BotConfig {
    BotConfig {
        base: BaseConfig {
            bot_token: "123456:TEST".to_string(),
            telegram_api_url: None,
            log_file: "logs/test.log".to_string(),
            database_url: database_url.to_string(),
            generation_store: store,
            allowed_telegram_user_ids: vec![USER_ID],
            server_host: "127.0.0.1".to_string(),
            port: 0,
        },
        generation: GenerationConfig {
            fusara_api_key: "test-key".to_string(),
            fusara_api_url: "http://127.0.0.1:1".to_string(),
            callback_url: format!("http://127.0.0.1:8080{}", GENERATION_COMPLETED_PATH),
            enhance_prompt: false,
            notify_min_delay_ms: 1,
            notify_max_delay_ms: 2,
            deliver_as_photos: false,
        },
    }
}

fn message(content: &str) -> Message {
    Message {
        id: "1".to_string(),
        user: User {
            id: USER_ID,
            username: None,
            first_name: Some("Ann".to_string()),
            last_name: None,
        },
        chat: Chat {
            id: CHAT_ID,
            chat_type: "private".to_string(),
        },
        content: content.to_string(),
        created_at: Utc::now(),
    }
}

struct App {
    config: BotConfig,
    bot: Arc<RecordingBot>,
    components: BotComponents,
    base_url: String,
}

async fn start_app(config: BotConfig) -> App {
    let bot = Arc::new(RecordingBot::default());
    let store = create_generation_store(&config).await.unwrap();
    let components = build_bot_components(
        &config,
        store,
        Some(bot.clone()),
        Some(Arc::new(ScriptedEngine)),
    )
    .await
    .unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, components.orchestrator.clone()));

    App {
        config,
        bot,
        components,
        base_url: format!("http://{}", addr),
    }
}

impl App {
    /// Registers the user and submits "a cat" through the handler chain.
    async fn submit_prompt(&self) {
        let chain = build_handler_chain(&self.config, &self.components);
        chain.handle(&message("/register")).await.unwrap();
        chain.handle(&message("a cat")).await.unwrap();
    }

    async fn callback(&self, body: serde_json::Value) -> (u16, String) {
        let response = reqwest::Client::new()
            .post(format!("{}{}", self.base_url, GENERATION_COMPLETED_PATH))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = response.status().as_u16();
        (status, response.text().await.unwrap())
    }

    async fn status_of_task(&self) -> GenerationStatus {
        self.components
            .orchestrator
            .get_by_task_id("1001")
            .await
            .unwrap()
            .generation_status
    }
}

/// **Test: GET /alive answers with the current time.**
#[tokio::test]
async fn test_alive() {
    let app = start_app(config(GenerationStoreKind::Memory, ":memory:")).await;

    let response = reqwest::get(format!("{}/alive", app.base_url)).await.unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert!(response.text().await.unwrap().starts_with("It is alive"));
}

/// **Test: prompt → succeeded callback → completed record and one notification with the url.**
#[tokio::test]
async fn test_succeeded_callback_completes_and_notifies() {
    let app = start_app(config(GenerationStoreKind::Memory, ":memory:")).await;
    app.submit_prompt().await;
    assert_eq!(app.status_of_task().await, GenerationStatus::Processing);

    let (status, body) = app
        .callback(serde_json::json!({ "taskId": 1001, "statusId": 100 }))
        .await;

    assert_eq!((status, body.as_str()), (200, "OK"));
    assert_eq!(app.status_of_task().await, GenerationStatus::Completed);
    let notifications: Vec<String> = app
        .bot
        .texts()
        .into_iter()
        .filter(|t| t.contains("https://cdn.example/1001/1.png"))
        .collect();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].contains("a cat"));

    // A duplicate delivery of the same callback is acknowledged and ignored.
    let (status, _) = app
        .callback(serde_json::json!({ "taskId": 1001, "statusId": 100 }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(
        app.bot.texts().iter().filter(|t| t.contains("cdn.example")).count(),
        1
    );
}

/// **Test: initial and processing callbacks are acknowledged without a transition.**
#[tokio::test]
async fn test_progress_callbacks_ignored() {
    let app = start_app(config(GenerationStoreKind::Memory, ":memory:")).await;
    app.submit_prompt().await;

    for status_id in [10, 20] {
        let (status, body) = app
            .callback(serde_json::json!({ "taskId": 1001, "statusId": status_id }))
            .await;
        assert_eq!((status, body.as_str()), (200, "OK"));
    }
    assert_eq!(app.status_of_task().await, GenerationStatus::Processing);
}

/// **Test: failed callback marks the record failed and tells the chat.**
#[tokio::test]
async fn test_failed_callback() {
    let app = start_app(config(GenerationStoreKind::Memory, ":memory:")).await;
    app.submit_prompt().await;

    let (status, _) = app
        .callback(serde_json::json!({ "taskId": "1001", "statusId": 200 }))
        .await;

    assert_eq!(status, 200);
    assert_eq!(app.status_of_task().await, GenerationStatus::Failed);
    assert_eq!(
        app.bot.texts().last().map(String::as_str),
        Some("Failed to generate image for the prompt: \"a cat\"")
    );
}

/// **Test: malformed bodies and unknown statuses are 400; unknown tasks are 500.**
#[tokio::test]
async fn test_invalid_callbacks() {
    let app = start_app(config(GenerationStoreKind::Memory, ":memory:")).await;

    let (status, body) = app
        .callback(serde_json::json!({ "taskId": 1, "statusId": 100, "extra": 1 }))
        .await;
    assert_eq!(status, 400);
    assert!(body.starts_with("ValidationError"));

    let (status, _) = app.callback(serde_json::json!({ "taskId": 1 })).await;
    assert_eq!(status, 400);

    let (status, _) = app
        .callback(serde_json::json!({ "taskId": 1, "statusId": 300 }))
        .await;
    assert_eq!(status, 400);

    let (status, body) = app
        .callback(serde_json::json!({ "taskId": 999, "statusId": 100 }))
        .await;
    assert_eq!(status, 500);
    assert!(body.contains("Not found"));
}

/// **Test: the sqlite store choice persists records to the configured file.**
#[tokio::test]
async fn test_sqlite_generation_store_wiring() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("generations.db");
    let app = start_app(config(GenerationStoreKind::Sqlite, db_path.to_str().unwrap())).await;

    app.submit_prompt().await;

    assert!(db_path.exists());
    let reopened = storage::SqliteGenerationStore::new(db_path.to_str().unwrap())
        .await
        .unwrap();
    let record = storage::GenerationRecordStore::get_by_task_id(&reopened, "1001")
        .await
        .unwrap();
    assert_eq!(record.prompt, "a cat");
    assert_eq!(record.chat_id, CHAT_ID);
}
