#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod quiz_service;
pub mod score_store;

pub use keydrill_core::Clock;

pub use config::AppConfig;
pub use error::{ConfigError, ScoreStoreError};
pub use quiz_service::{FinishOutcome, QuizService, StoreUpdate, Tagged};
pub use score_store::{HttpScoreStore, ScoreStore, ScoreSubmission};
