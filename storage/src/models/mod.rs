//! Persisted models: generation records and registered users.

mod generation_record;
mod user_record;

pub use generation_record::{GenerationRecord, GenerationStatus, NewGeneration};
pub use user_record::UserRecord;
