//! Generation lifecycle: `idle → processing → {completed, failed}`.
//!
//! Triggered from two sides at once: chat handlers call [`GenerationOrchestrator::create`] and
//! the engine webhook calls [`GenerationOrchestrator::complete`] / [`GenerationOrchestrator::fail`].
//! Every guard-then-update runs under the record's lock; notifications are sent after the lock
//! is released.

use dbot_core::{Orientation, Photo, Style};
use image_generation_client::{GenerateImageRequest, ImageGenerationEngine};
use notification::NotificationChannel;
use std::sync::Arc;
use storage::{GenerationRecord, GenerationRecordStore, GenerationStatus, NewGeneration};
use tracing::{debug, info, instrument, warn};

use crate::error::GenerationError;
use crate::locks::RecordLocks;
use crate::reporter::ExceptionReporter;

/// Outcome of a state-changing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    /// The record was not in the required status; nothing changed.
    Skipped,
}

/// How the images of a completed generation reach the chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionDelivery {
    /// One text message with the prompt and every image url.
    #[default]
    Text,
    /// The images themselves, grouped, captioned with the prompt.
    Photos,
}

#[derive(Debug, Clone, Default)]
pub struct OrchestratorOptions {
    /// Used when a [`CreateGeneration`] does not say.
    pub enhance_prompt: bool,
    pub delivery: CompletionDelivery,
}

/// Input of [`GenerationOrchestrator::create`].
#[derive(Debug, Clone)]
pub struct CreateGeneration {
    pub prompt: String,
    pub style: Style,
    pub orientation: Orientation,
    pub user_id: String,
    pub chat_id: i64,
    pub enhance_prompt: Option<bool>,
}

pub fn completion_message(prompt: &str, urls: &[&str]) -> String {
    format!(
        "Here is the generated image for the prompt: \"{}\"\n\n{}",
        prompt,
        urls.join("\n")
    )
}

pub fn failure_message(prompt: &str) -> String {
    format!("Failed to generate image for the prompt: \"{}\"", prompt)
}

pub struct GenerationOrchestrator {
    store: Arc<dyn GenerationRecordStore>,
    engine: Arc<dyn ImageGenerationEngine>,
    notifier: Arc<dyn NotificationChannel>,
    reporter: Arc<dyn ExceptionReporter>,
    callback_url: String,
    options: OrchestratorOptions,
    locks: RecordLocks,
}

impl GenerationOrchestrator {
    pub fn new(
        store: Arc<dyn GenerationRecordStore>,
        engine: Arc<dyn ImageGenerationEngine>,
        notifier: Arc<dyn NotificationChannel>,
        reporter: Arc<dyn ExceptionReporter>,
        callback_url: String,
        options: OrchestratorOptions,
    ) -> Self {
        Self {
            store,
            engine,
            notifier,
            reporter,
            callback_url,
            options,
            locks: RecordLocks::new(),
        }
    }

    pub fn options(&self) -> &OrchestratorOptions {
        &self.options
    }

    /// Submits the prompt to the engine, stores the record and moves it to `processing`.
    ///
    /// Returns the record as stored after initialization. An empty prompt is rejected before
    /// the engine is contacted; an engine rejection is returned as is and nothing is stored.
    #[instrument(skip(self, input), fields(user_id = %input.user_id, chat_id = input.chat_id))]
    pub async fn create(&self, input: CreateGeneration) -> Result<GenerationRecord, GenerationError> {
        if input.prompt.trim().is_empty() {
            return Err(GenerationError::Validation(
                "prompt must not be empty".to_string(),
            ));
        }

        let request = GenerateImageRequest {
            prompt: input.prompt.clone(),
            enhance_prompt: input.enhance_prompt.unwrap_or(self.options.enhance_prompt),
            style: input.style,
            orientation: input.orientation,
            completion_callback_url: self.callback_url.clone(),
        };
        let task = self.engine.generate(&request).await?;

        let record = self
            .store
            .create(GenerationRecord::new(NewGeneration {
                prompt: input.prompt,
                style: input.style,
                orientation: input.orientation,
                user_id: input.user_id,
                chat_id: input.chat_id,
            }))
            .await?;
        info!(record_id = %record.id, task_id = %task.task_id, "generation record created");

        self.initialize(&record.id, &task.task_id).await?;
        Ok(self.store.get_by_id(&record.id).await?)
    }

    /// `idle → processing`, binding the engine task id.
    #[instrument(skip(self))]
    pub async fn initialize(
        &self,
        record_id: &str,
        task_id: &str,
    ) -> Result<Transition, GenerationError> {
        let _guard = self.locks.acquire(record_id).await;
        let mut record = self.store.get_by_id(record_id).await?;

        if !record.initialize(task_id) {
            debug!(status = %record.generation_status, "initialize skipped");
            return Ok(Transition::Skipped);
        }
        self.store.update(record).await?;
        info!("generation processing");
        Ok(Transition::Applied)
    }

    /// `processing → completed`: fetches the final images, commits, then notifies the chat.
    #[instrument(skip(self))]
    pub async fn complete(&self, task_id: &str) -> Result<Transition, GenerationError> {
        let record_id = self.record_id_for_task(task_id).await?;

        let guard = self.locks.acquire(&record_id).await;
        let mut record = self.store.get_by_id(&record_id).await?;
        // Checked before the fetch so skipped callbacks never reach the engine.
        if record.generation_status != GenerationStatus::Processing {
            debug!(record_id = %record_id, status = %record.generation_status, "complete skipped");
            return Ok(Transition::Skipped);
        }

        let task = self.engine.get_generated_images(task_id).await?;
        if !record.complete(task.images) {
            debug!(record_id = %record_id, status = %record.generation_status, "complete skipped");
            return Ok(Transition::Skipped);
        }
        let record = self.store.update(record).await?;
        drop(guard);
        info!(record_id = %record.id, image_count = record.images.len(), "generation completed");

        let delivered = self.deliver_completion(&record).await;
        self.report_delivery(delivered, &record, task_id, "completion notification failed")?;
        Ok(Transition::Applied)
    }

    /// `processing → failed`: commits, notifies the chat and reports the failure.
    ///
    /// Storage errors on the way to the commit are reported as well before being returned.
    #[instrument(skip(self))]
    pub async fn fail(&self, task_id: &str) -> Result<Transition, GenerationError> {
        let record_id = self.record_id_for_task(task_id).await?;

        let record = match self.commit_failure(&record_id).await {
            Ok(Some(record)) => record,
            Ok(None) => return Ok(Transition::Skipped),
            Err(e) => {
                self.reporter.capture(
                    &e,
                    "failed to mark generation as failed",
                    &[("record_id", record_id.clone()), ("task_id", task_id.to_string())],
                );
                return Err(e);
            }
        };
        warn!(record_id = %record.id, "generation failed");

        let delivered = self
            .notifier
            .send_messages(record.chat_id, &[failure_message(&record.prompt)])
            .await;

        let failure = GenerationError::TaskFailed {
            record_id: record.id.clone(),
            task_id: task_id.to_string(),
        };
        self.reporter.capture(
            &failure,
            &failure.to_string(),
            &[("record_id", record.id.clone()), ("task_id", task_id.to_string())],
        );

        self.report_delivery(delivered, &record, task_id, "failure notification failed")?;
        Ok(Transition::Applied)
    }

    pub async fn get_by_id(&self, record_id: &str) -> Result<GenerationRecord, GenerationError> {
        Ok(self.store.get_by_id(record_id).await?)
    }

    pub async fn get_by_task_id(&self, task_id: &str) -> Result<GenerationRecord, GenerationError> {
        Ok(self.store.get_by_task_id(task_id).await?)
    }

    async fn record_id_for_task(&self, task_id: &str) -> Result<String, GenerationError> {
        match self.store.get_by_task_id(task_id).await {
            Ok(record) => Ok(record.id),
            Err(e) => {
                let e = GenerationError::from(e);
                if matches!(e, GenerationError::NotFound(_)) {
                    warn!(task_id, "no generation record for task");
                }
                Err(e)
            }
        }
    }

    /// Guard and commit of `fail` under the record lock. `None` when the guard rejects.
    async fn commit_failure(
        &self,
        record_id: &str,
    ) -> Result<Option<GenerationRecord>, GenerationError> {
        let _guard = self.locks.acquire(record_id).await;
        let mut record = self.store.get_by_id(record_id).await?;
        if !record.fail() {
            debug!(record_id, status = %record.generation_status, "fail skipped");
            return Ok(None);
        }
        Ok(Some(self.store.update(record).await?))
    }

    /// Photos mode falls back to the text message when no image has a url to send.
    async fn deliver_completion(
        &self,
        record: &GenerationRecord,
    ) -> Result<(), notification::DeliveryError> {
        let urls: Vec<&str> = record
            .images
            .iter()
            .map(|i| i.url.as_str())
            .filter(|url| !url.trim().is_empty())
            .collect();

        if self.options.delivery == CompletionDelivery::Photos && !urls.is_empty() {
            let photos: Vec<Photo> = urls
                .iter()
                .enumerate()
                .map(|(index, url)| {
                    let photo = Photo::new(url.to_string());
                    if index == 0 {
                        photo.with_caption(record.prompt.clone())
                    } else {
                        photo
                    }
                })
                .collect();
            return self.notifier.send_photos(record.chat_id, &photos).await;
        }

        let message = completion_message(&record.prompt, &urls);
        self.notifier.send_messages(record.chat_id, &[message]).await
    }

    fn report_delivery(
        &self,
        delivered: Result<(), notification::DeliveryError>,
        record: &GenerationRecord,
        task_id: &str,
        message: &str,
    ) -> Result<(), GenerationError> {
        delivered.map_err(|e| {
            self.reporter.capture(
                &e,
                message,
                &[
                    ("record_id", record.id.clone()),
                    ("task_id", task_id.to_string()),
                    ("chat_id", record.chat_id.to_string()),
                ],
            );
            GenerationError::Delivery(e)
        })
    }
}
