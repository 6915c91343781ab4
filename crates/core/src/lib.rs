#![forbid(unsafe_code)]

pub mod model;
pub mod session;
pub mod time;

pub use model::{
    Combo, Elapsed, KeyChord, LeaderboardEntry, Question, QuestionRecord, builtin_catalog, rank_of,
};
pub use session::{
    AuthError, Epoch, KeyOutcome, PendingStep, Phase, QuizSession, StepKind, points_for_elapsed,
};
pub use time::Clock;
