//! Generation record: one prompt's journey from submission to delivered images.
//!
//! The transition methods are the only way status moves. Each checks the current status
//! and leaves the record untouched when the guard does not hold.

use chrono::{DateTime, Utc};
use dbot_core::{GeneratedImage, Orientation, Style};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle status. Advances only `Idle → Processing → {Completed, Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    /// Record created, engine not yet confirmed.
    Idle,
    /// Engine accepted the task and assigned a task id.
    Processing,
    Completed,
    Failed,
}

impl GenerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStatus::Idle => "idle",
            GenerationStatus::Processing => "processing",
            GenerationStatus::Completed => "completed",
            GenerationStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationStatus::Completed | GenerationStatus::Failed)
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(GenerationStatus::Idle),
            "processing" => Ok(GenerationStatus::Processing),
            "completed" => Ok(GenerationStatus::Completed),
            "failed" => Ok(GenerationStatus::Failed),
            other => Err(format!("unknown generation status: {}", other)),
        }
    }
}

/// Caller-supplied fields of a new record.
#[derive(Debug, Clone)]
pub struct NewGeneration {
    pub prompt: String,
    pub style: Style,
    pub orientation: Orientation,
    pub user_id: String,
    pub chat_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub id: String,
    pub prompt: String,
    pub style: Style,
    pub orientation: Orientation,
    /// Empty until the record is completed; replaced wholesale on completion.
    pub images: Vec<GeneratedImage>,
    pub user_id: String,
    /// Destination chat for notifications; independent of `user_id`.
    pub chat_id: i64,
    /// Engine task id; `None` until the engine accepted the submission, then immutable.
    pub generation_task_id: Option<String>,
    pub generation_status: GenerationStatus,
    pub created_at: DateTime<Utc>,
}

impl GenerationRecord {
    /// Creates an `Idle` record with a fresh UUID, no images and no task id.
    pub fn new(input: NewGeneration) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            prompt: input.prompt,
            style: input.style,
            orientation: input.orientation,
            images: Vec::new(),
            user_id: input.user_id,
            chat_id: input.chat_id,
            generation_task_id: None,
            generation_status: GenerationStatus::Idle,
            created_at: Utc::now(),
        }
    }

    /// `Idle → Processing`, binding the engine task id. Returns whether it applied.
    pub fn initialize(&mut self, task_id: &str) -> bool {
        if self.generation_status != GenerationStatus::Idle {
            return false;
        }
        self.generation_task_id = Some(task_id.to_string());
        self.generation_status = GenerationStatus::Processing;
        true
    }

    /// `Processing → Completed`, replacing the image set. Returns whether it applied.
    pub fn complete(&mut self, images: Vec<GeneratedImage>) -> bool {
        if self.generation_status != GenerationStatus::Processing {
            return false;
        }
        self.images = images;
        self.generation_status = GenerationStatus::Completed;
        true
    }

    /// `Processing → Failed`; images stay as they are. Returns whether it applied.
    pub fn fail(&mut self) -> bool {
        if self.generation_status != GenerationStatus::Processing {
            return false;
        }
        self.generation_status = GenerationStatus::Failed;
        true
    }

    pub fn task_id(&self) -> Option<&str> {
        self.generation_task_id.as_deref()
    }
}
