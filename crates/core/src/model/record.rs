use serde::{Serialize, Serializer};
use std::fmt;

/// Time taken to answer a question.
///
/// `Overtime` is the sentinel for questions that were never answered
/// correctly; it renders as `">15"` in record rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elapsed {
    Millis(i64),
    Overtime,
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // One decimal, matching the summary table and stored details.
            Elapsed::Millis(ms) => write!(f, "{:.1}", *ms as f64 / 1000.0),
            Elapsed::Overtime => write!(f, ">15"),
        }
    }
}

impl Serialize for Elapsed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One row of the per-question record kept during a session and sent to the
/// score store as the `details` payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionRecord {
    pub question: String,
    #[serde(rename = "time")]
    pub elapsed: Elapsed,
    pub points: u32,
}
