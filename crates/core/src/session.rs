use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

use crate::model::{Elapsed, KeyChord, Question, QuestionRecord};

/// Scoring window: a correct answer earns up to 15 points, decaying by one
/// point per elapsed second, never below zero.
pub const SCORE_WINDOW_MS: i64 = 15_000;

/// Maximum points a single question can award.
pub const MAX_POINTS: u32 = 15;

/// Delay before advancing after a correct answer.
pub const ADVANCE_DELAY_MS: u64 = 1_000;

/// Delay before input unlocks after a first mismatch.
pub const RETRY_DELAY_MS: u64 = 200;

/// Delay before advancing after the answer has been revealed.
pub const REVEAL_DELAY_MS: u64 = 2_000;

/// Points for a correct answer given the elapsed time in milliseconds.
#[must_use]
pub fn points_for_elapsed(elapsed_ms: i64) -> u32 {
    let raw = (SCORE_WINDOW_MS - elapsed_ms).div_euclid(1_000);
    u32::try_from(raw).unwrap_or(0)
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("password does not match")]
    WrongPassword,
}

/// Coarse stage of the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Login,
    Intro,
    Active,
    Summary,
}

/// Tag distinguishing one quiz attempt from the next.
///
/// Bumped on every reset; anything scheduled or in flight that carries an
/// older epoch must be discarded instead of applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Epoch(u64);

impl Epoch {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a delayed follow-up should do once its delay expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Re-enable input on the same question (after a first mismatch).
    Unlock,
    /// Move to the next question, or to the summary past the last one.
    Advance,
}

/// A delayed follow-up to a key resolution.
///
/// The caller schedules the delay and hands the step back to
/// [`QuizSession::apply`]; a step from a previous epoch becomes a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingStep {
    pub epoch: Epoch,
    pub kind: StepKind,
    pub delay_ms: u64,
}

/// Resolution of a submitted key chord.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    /// Not in the active phase, input locked, or a bare-modifier chord.
    Ignored,
    /// Correct combo; points were awarded and a record appended.
    Matched {
        points: u32,
        elapsed_ms: i64,
        step: PendingStep,
    },
    /// First mismatch; the answer stays hidden.
    Retry { step: PendingStep },
    /// Second mismatch; the expected combo display text is exposed and a
    /// zero-point overtime record appended.
    Revealed { answer: String, step: PendingStep },
}

/// The quiz session state machine.
///
/// Owns quiz progression, input matching, scoring, and the retry/lockout
/// policy. Every operation except [`login`](Self::login) is total: calls
/// outside their valid phase are no-ops. Network side effects live in the
/// services layer and never block or roll back transitions here.
pub struct QuizSession {
    owner: Option<String>,
    questions: Vec<Question>,
    phase: Phase,
    current: usize,
    score: u32,
    attempts: u8,
    locked: bool,
    records: Vec<QuestionRecord>,
    question_started_at: Option<DateTime<Utc>>,
    epoch: Epoch,
}

impl QuizSession {
    /// Creates a session over an already-ordered question list.
    ///
    /// The caller is responsible for shuffling; the order is kept for the
    /// lifetime of the session, including across resets.
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            owner: None,
            questions,
            phase: Phase::Login,
            current: 0,
            score: 0,
            attempts: 0,
            locked: false,
            records: Vec::new(),
            question_started_at: None,
            epoch: Epoch::default(),
        }
    }

    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn attempts(&self) -> u8 {
        self.attempts
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Highest score achievable over the whole catalog.
    #[must_use]
    pub fn max_score(&self) -> u32 {
        u32::try_from(self.questions.len()).unwrap_or(u32::MAX) * MAX_POINTS
    }

    #[must_use]
    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.phase == Phase::Active {
            self.questions.get(self.current)
        } else {
            None
        }
    }

    /// Authenticates the player and moves `Login -> Intro`.
    ///
    /// The owner name is stored trimmed. Outside the login phase this is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmptyName` when the trimmed name is empty and
    /// `AuthError::WrongPassword` when the password does not match the
    /// injected shared secret.
    pub fn login(&mut self, name: &str, password: &str, expected: &str) -> Result<(), AuthError> {
        if self.phase != Phase::Login {
            return Ok(());
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::EmptyName);
        }
        if password != expected {
            return Err(AuthError::WrongPassword);
        }
        self.owner = Some(name.to_string());
        self.phase = Phase::Intro;
        Ok(())
    }

    /// Moves `Intro -> Active(0)` and arms the question timer.
    pub fn start(&mut self, now: DateTime<Utc>) {
        if self.phase != Phase::Intro {
            return;
        }
        if self.questions.is_empty() {
            self.phase = Phase::Summary;
            return;
        }
        self.phase = Phase::Active;
        self.attempts = 0;
        self.locked = false;
        self.question_started_at = Some(now);
    }

    /// Resolves a key chord against the current question.
    ///
    /// Only meaningful in the active phase while input is unlocked;
    /// bare-modifier and unresolvable chords are silently ignored. A
    /// non-ignored outcome locks input and carries the [`PendingStep`] the
    /// caller must schedule.
    pub fn submit_key(&mut self, chord: &KeyChord, now: DateTime<Utc>) -> KeyOutcome {
        if self.phase != Phase::Active || self.locked {
            return KeyOutcome::Ignored;
        }
        let Some(combo) = chord.normalize() else {
            return KeyOutcome::Ignored;
        };
        let (Some(question), Some(started)) =
            (self.questions.get(self.current), self.question_started_at)
        else {
            return KeyOutcome::Ignored;
        };

        if combo == *question.combo() {
            let elapsed_ms = (now - started).num_milliseconds().max(0);
            let points = points_for_elapsed(elapsed_ms);
            let record = QuestionRecord {
                question: question.description().to_string(),
                elapsed: Elapsed::Millis(elapsed_ms),
                points,
            };
            self.locked = true;
            self.score += points;
            self.records.push(record);
            KeyOutcome::Matched {
                points,
                elapsed_ms,
                step: self.pending(StepKind::Advance, ADVANCE_DELAY_MS),
            }
        } else {
            self.attempts += 1;
            self.locked = true;
            if self.attempts >= 2 {
                let record = QuestionRecord {
                    question: question.description().to_string(),
                    elapsed: Elapsed::Overtime,
                    points: 0,
                };
                let answer = question.display().to_string();
                self.records.push(record);
                KeyOutcome::Revealed {
                    answer,
                    step: self.pending(StepKind::Advance, REVEAL_DELAY_MS),
                }
            } else {
                KeyOutcome::Retry {
                    step: self.pending(StepKind::Unlock, RETRY_DELAY_MS),
                }
            }
        }
    }

    /// Applies a delayed step once its delay has expired.
    ///
    /// A step tagged with an older epoch is discarded: the session was reset
    /// while the step was pending. Advancing past the last question moves
    /// `Active -> Summary`.
    pub fn apply(&mut self, step: PendingStep, now: DateTime<Utc>) {
        if step.epoch != self.epoch || self.phase != Phase::Active {
            return;
        }
        match step.kind {
            StepKind::Unlock => {
                self.locked = false;
            }
            StepKind::Advance => {
                self.current += 1;
                self.attempts = 0;
                self.locked = false;
                if self.current >= self.questions.len() {
                    self.phase = Phase::Summary;
                    self.question_started_at = None;
                } else {
                    self.question_started_at = Some(now);
                }
            }
        }
    }

    /// Returns to the intro, clearing score, records, attempts, and lock.
    ///
    /// Allowed from the summary or mid-run. Bumps the epoch so pending steps
    /// and in-flight store responses for the old run are discarded. The
    /// question order drawn at construction is kept.
    pub fn reset(&mut self) {
        if !matches!(self.phase, Phase::Active | Phase::Summary) {
            return;
        }
        self.phase = Phase::Intro;
        self.current = 0;
        self.score = 0;
        self.attempts = 0;
        self.locked = false;
        self.records.clear();
        self.question_started_at = None;
        self.epoch = self.epoch.next();
    }

    fn pending(&self, kind: StepKind, delay_ms: u64) -> PendingStep {
        PendingStep {
            epoch: self.epoch,
            kind,
            delay_ms,
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("owner", &self.owner)
            .field("phase", &self.phase)
            .field("current", &self.current)
            .field("score", &self.score)
            .field("attempts", &self.attempts)
            .field("locked", &self.locked)
            .field("records_len", &self.records.len())
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
