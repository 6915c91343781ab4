use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use keydrill_core::model::{LeaderboardEntry, QuestionRecord, sort_ranked};

use crate::error::ScoreStoreError;

/// A finished run as handed to the store: owner, total, and the serialized
/// per-question detail rows.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreSubmission {
    pub name: String,
    pub score: u32,
    pub details: Vec<QuestionRecord>,
}

/// Persistence and ranking service for finished runs.
///
/// Consistency and transport are the store's business; callers treat every
/// operation as fire-and-forget.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// All recorded best scores, sorted descending by score.
    async fn best_scores(&self) -> Result<Vec<LeaderboardEntry>, ScoreStoreError>;

    /// The player's best previous score, if they have one on record.
    async fn personal_best(&self, name: &str) -> Result<Option<i64>, ScoreStoreError>;

    /// Inserts a finished run.
    async fn insert_score(&self, submission: &ScoreSubmission) -> Result<(), ScoreStoreError>;
}

/// Score store backed by a Supabase-style REST interface: a `scores` table
/// and a `get_best_scores` remote procedure.
pub struct HttpScoreStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpScoreStore {
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/rest/v1/{path}", self.base_url)
    }

    fn check(response: reqwest::Response) -> Result<reqwest::Response, ScoreStoreError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(ScoreStoreError::HttpStatus(response.status()))
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScoreRow {
    score: i64,
}

#[async_trait]
impl ScoreStore for HttpScoreStore {
    async fn best_scores(&self) -> Result<Vec<LeaderboardEntry>, ScoreStoreError> {
        let response = self
            .client
            .post(self.endpoint("rpc/get_best_scores"))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let mut entries: Vec<LeaderboardEntry> = Self::check(response)?.json().await?;
        sort_ranked(&mut entries);
        Ok(entries)
    }

    async fn personal_best(&self, name: &str) -> Result<Option<i64>, ScoreStoreError> {
        let name_filter = format!("eq.{name}");
        let response = self
            .client
            .get(self.endpoint("scores"))
            .query(&[
                ("select", "score"),
                ("name", name_filter.as_str()),
                ("order", "score.desc"),
                ("limit", "1"),
            ])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let rows: Vec<ScoreRow> = Self::check(response)?.json().await?;
        Ok(rows.first().map(|row| row.score))
    }

    async fn insert_score(&self, submission: &ScoreSubmission) -> Result<(), ScoreStoreError> {
        let response = self
            .client
            .post(self.endpoint("scores"))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(submission)
            .send()
            .await?;

        Self::check(response)?;
        Ok(())
    }
}
