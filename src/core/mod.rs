pub mod cleaner;
pub mod config;
pub mod convert;
pub mod discovery;
pub mod error;
pub mod orchestrator;
pub mod progress;
pub mod transcription;
pub mod workflow;
