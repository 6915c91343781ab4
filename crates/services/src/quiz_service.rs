use std::sync::Arc;

use rand::rng;
use rand::seq::SliceRandom;
use tracing::warn;

use keydrill_core::model::{LeaderboardEntry, Question, QuestionRecord, builtin_catalog, rank_of};
use keydrill_core::session::{AuthError, Epoch, QuizSession};
use keydrill_core::time::Clock;

use crate::score_store::{ScoreStore, ScoreSubmission};

/// A value produced for a specific quiz attempt.
///
/// Store calls are asynchronous and unordered with respect to local state;
/// consumers must discard values whose epoch no longer matches the live
/// session instead of applying them.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged<T> {
    pub epoch: Epoch,
    pub value: T,
}

impl<T> Tagged<T> {
    #[must_use]
    pub fn is_current(&self, epoch: Epoch) -> bool {
        self.epoch == epoch
    }
}

/// Outcome of persisting a finished run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FinishOutcome {
    /// Refreshed board; empty when the refetch failed.
    pub leaderboard: Vec<LeaderboardEntry>,
    /// 1-based position of the owner on the refreshed board.
    pub ranking: Option<usize>,
    /// Score delta against the previous personal best, when one exists.
    pub improvement: Option<i64>,
}

/// An asynchronous store result ready to be applied to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreUpdate {
    Leaderboard(Vec<LeaderboardEntry>),
    Finished(FinishOutcome),
}

/// Orchestrates session construction, login, and the two network-facing
/// flows. All store traffic is fire-and-forget: failures are logged and the
/// quiz continues on whatever data it already has.
pub struct QuizService {
    store: Arc<dyn ScoreStore>,
    clock: Clock,
    access_password: String,
}

impl QuizService {
    #[must_use]
    pub fn new(store: Arc<dyn ScoreStore>, access_password: impl Into<String>) -> Self {
        Self {
            store,
            clock: Clock::default(),
            access_password: access_password.into(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Builds a session over a freshly shuffled built-in catalog.
    #[must_use]
    pub fn new_session(&self) -> QuizSession {
        self.session_over(builtin_catalog())
    }

    /// Builds a session over the given catalog, shuffled uniformly.
    ///
    /// The permutation is drawn once here; the session keeps it for its
    /// whole lifetime, including across resets.
    #[must_use]
    pub fn session_over(&self, mut questions: Vec<Question>) -> QuizSession {
        let mut rng = rng();
        questions.as_mut_slice().shuffle(&mut rng);
        QuizSession::new(questions)
    }

    /// Logs the player in against the configured shared password.
    ///
    /// # Errors
    ///
    /// Propagates `AuthError` from the session; the caller re-prompts.
    pub fn login(
        &self,
        session: &mut QuizSession,
        name: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        session.login(name, password, &self.access_password)
    }

    /// Fetches the ranked board, tagged with the attempt it was asked for.
    ///
    /// Returns `None` on network failure so the previous board stays on
    /// screen; the error is logged, never surfaced.
    pub async fn refresh_leaderboard(&self, epoch: Epoch) -> Option<Tagged<StoreUpdate>> {
        match self.store.best_scores().await {
            Ok(entries) => Some(Tagged {
                epoch,
                value: StoreUpdate::Leaderboard(entries),
            }),
            Err(err) => {
                warn!(%epoch, error = %err, "leaderboard fetch failed");
                None
            }
        }
    }

    /// Persists a finished run, then reports the refreshed board, the
    /// owner's ranking on it, and the delta against their previous best.
    ///
    /// Each store call that fails is logged and degrades the outcome
    /// (missing improvement, empty board) without failing the flow.
    pub async fn finish(
        &self,
        epoch: Epoch,
        name: &str,
        score: u32,
        details: Vec<QuestionRecord>,
    ) -> Tagged<StoreUpdate> {
        let previous = match self.store.personal_best(name).await {
            Ok(previous) => previous,
            Err(err) => {
                warn!(%epoch, error = %err, "personal best lookup failed");
                None
            }
        };
        let improvement = previous.map(|best| i64::from(score) - best);

        let submission = ScoreSubmission {
            name: name.to_string(),
            score,
            details,
        };
        if let Err(err) = self.store.insert_score(&submission).await {
            warn!(%epoch, error = %err, "score save failed");
        }

        let leaderboard = match self.store.best_scores().await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(%epoch, error = %err, "leaderboard refetch failed");
                Vec::new()
            }
        };
        let ranking = rank_of(&leaderboard, name);

        Tagged {
            epoch,
            value: StoreUpdate::Finished(FinishOutcome {
                leaderboard,
                ranking,
                improvement,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keydrill_core::model::Combo;

    #[test]
    fn tagged_tracks_its_epoch() {
        let tagged = Tagged {
            epoch: Epoch::default(),
            value: 1,
        };
        assert!(tagged.is_current(Epoch::default()));
        assert!(!tagged.is_current(Epoch::default().next()));
    }

    #[test]
    fn shuffle_is_a_bijection_of_the_catalog() {
        struct NoStore;
        #[async_trait::async_trait]
        impl ScoreStore for NoStore {
            async fn best_scores(
                &self,
            ) -> Result<Vec<LeaderboardEntry>, crate::error::ScoreStoreError> {
                Ok(Vec::new())
            }
            async fn personal_best(
                &self,
                _name: &str,
            ) -> Result<Option<i64>, crate::error::ScoreStoreError> {
                Ok(None)
            }
            async fn insert_score(
                &self,
                _submission: &ScoreSubmission,
            ) -> Result<(), crate::error::ScoreStoreError> {
                Ok(())
            }
        }

        let service = QuizService::new(Arc::new(NoStore), "secret");
        let session = service.new_session();

        let mut shuffled: Vec<Combo> = session
            .questions()
            .iter()
            .map(|q| q.combo().clone())
            .collect();
        let mut original: Vec<Combo> =
            builtin_catalog().iter().map(|q| q.combo().clone()).collect();
        assert_eq!(shuffled.len(), original.len());

        shuffled.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        original.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        assert_eq!(shuffled, original);
    }
}
