//! End-to-end quiz flow against an in-memory score store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use keydrill_core::model::{Combo, KeyChord, LeaderboardEntry, Question};
use keydrill_core::session::{KeyOutcome, Phase};
use keydrill_core::time::fixed_now;
use services::{QuizService, ScoreStore, ScoreStoreError, ScoreSubmission, StoreUpdate};

const SECRET: &str = "open sesame";

#[derive(Default)]
struct FakeStore {
    seeded: Vec<LeaderboardEntry>,
    submissions: Mutex<Vec<ScoreSubmission>>,
    fail: bool,
}

impl FakeStore {
    fn seeded(entries: Vec<(&str, i64)>) -> Self {
        Self {
            seeded: entries
                .into_iter()
                .map(|(name, score)| LeaderboardEntry {
                    name: name.to_string(),
                    score,
                })
                .collect(),
            ..Self::default()
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn unavailable() -> ScoreStoreError {
        ScoreStoreError::HttpStatus(reqwest::StatusCode::SERVICE_UNAVAILABLE)
    }
}

#[async_trait]
impl ScoreStore for FakeStore {
    async fn best_scores(&self) -> Result<Vec<LeaderboardEntry>, ScoreStoreError> {
        if self.fail {
            return Err(Self::unavailable());
        }
        let mut board = self.seeded.clone();
        for submission in self.submissions.lock().unwrap().iter() {
            board.push(LeaderboardEntry {
                name: submission.name.clone(),
                score: i64::from(submission.score),
            });
        }
        board.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(board)
    }

    async fn personal_best(&self, name: &str) -> Result<Option<i64>, ScoreStoreError> {
        if self.fail {
            return Err(Self::unavailable());
        }
        Ok(self
            .seeded
            .iter()
            .filter(|entry| entry.name == name)
            .map(|entry| entry.score)
            .max())
    }

    async fn insert_score(&self, submission: &ScoreSubmission) -> Result<(), ScoreStoreError> {
        if self.fail {
            return Err(Self::unavailable());
        }
        self.submissions.lock().unwrap().push(submission.clone());
        Ok(())
    }
}

fn small_catalog() -> Vec<Question> {
    vec![
        Question::new(Combo::new("ctrl+f"), "Find"),
        Question::new(Combo::new("ctrl+z"), "Undo the last action"),
        Question::new(Combo::new("shift+enter"), "Open the message in its own window"),
    ]
}

/// Builds the chord a player would press for the given combo.
fn chord_for(combo: &Combo) -> KeyChord {
    let tokens: Vec<&str> = combo.tokens().collect();
    let (key, modifiers) = tokens.split_last().expect("combo has a primary key");
    let mut chord = KeyChord::of(key);
    for modifier in modifiers {
        chord = match *modifier {
            "ctrl" => chord.with_ctrl(),
            "alt" => chord.with_alt(),
            "meta" => chord.with_meta(),
            "shift" => chord.with_shift(),
            other => panic!("unexpected modifier token {other}"),
        };
    }
    chord
}

#[tokio::test]
async fn full_run_persists_score_with_ranking_and_improvement() {
    let store = Arc::new(FakeStore::seeded(vec![("Ada", 10), ("Grace", 40)]));
    let service = QuizService::new(Arc::clone(&store) as Arc<dyn ScoreStore>, SECRET);

    let mut session = service.session_over(small_catalog());
    service.login(&mut session, "Ada", SECRET).unwrap();
    session.start(fixed_now());

    while session.phase() == Phase::Active {
        let combo = session.current_question().unwrap().combo().clone();
        let outcome = session.submit_key(&chord_for(&combo), fixed_now());
        let KeyOutcome::Matched { step, .. } = outcome else {
            panic!("expected a match, got {outcome:?}");
        };
        session.apply(step, fixed_now());
    }

    assert_eq!(session.phase(), Phase::Summary);
    assert_eq!(session.score(), 45); // 3 questions, 15 points each at t=0

    let tagged = service
        .finish(
            session.epoch(),
            session.owner().unwrap(),
            session.score(),
            session.records().to_vec(),
        )
        .await;
    assert!(tagged.is_current(session.epoch()));

    let StoreUpdate::Finished(outcome) = tagged.value else {
        panic!("expected a finish outcome");
    };
    // 45 beats the seeded 40, so Ada tops the refreshed board.
    assert_eq!(outcome.ranking, Some(1));
    assert_eq!(outcome.improvement, Some(35));

    let submissions = store.submissions.lock().unwrap();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].name, "Ada");
    assert_eq!(submissions[0].score, 45);
    assert_eq!(submissions[0].details.len(), 3);
}

#[tokio::test]
async fn finish_without_previous_best_reports_no_improvement() {
    let store = Arc::new(FakeStore::seeded(vec![("Grace", 40)]));
    let service = QuizService::new(store as Arc<dyn ScoreStore>, SECRET);

    let tagged = service
        .finish(Default::default(), "Ada", 20, Vec::new())
        .await;
    let StoreUpdate::Finished(outcome) = tagged.value else {
        panic!("expected a finish outcome");
    };
    assert_eq!(outcome.improvement, None);
    assert_eq!(outcome.ranking, Some(2));
}

#[tokio::test]
async fn refresh_is_swallowed_when_the_store_is_down() {
    let service = QuizService::new(Arc::new(FakeStore::failing()), SECRET);
    assert!(service.refresh_leaderboard(Default::default()).await.is_none());
}

#[tokio::test]
async fn finish_degrades_when_the_store_is_down() {
    let service = QuizService::new(Arc::new(FakeStore::failing()), SECRET);
    let tagged = service
        .finish(Default::default(), "Ada", 20, Vec::new())
        .await;
    let StoreUpdate::Finished(outcome) = tagged.value else {
        panic!("expected a finish outcome");
    };
    assert!(outcome.leaderboard.is_empty());
    assert_eq!(outcome.ranking, None);
    assert_eq!(outcome.improvement, None);
}

#[tokio::test]
async fn store_response_for_an_old_attempt_is_stale_after_reset() {
    let store = Arc::new(FakeStore::seeded(vec![("Ada", 10)]));
    let service = QuizService::new(store as Arc<dyn ScoreStore>, SECRET);

    let mut session = service.session_over(small_catalog());
    service.login(&mut session, "Ada", SECRET).unwrap();
    session.start(fixed_now());

    let epoch_before = session.epoch();
    let pending = service.refresh_leaderboard(epoch_before).await.unwrap();

    session.reset();
    assert!(!pending.is_current(session.epoch()));
}
