use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::core::FitScorer;
use crate::models::{Profile, Requirements, ScoreResult};
use crate::services::postgres::{PostgresClient, PostgresError};

/// Errors surfaced by a scoring request
#[derive(Debug, Error)]
pub enum FitError {
    #[error("profile not found")]
    ProfileNotFound,

    #[error("store error: {0}")]
    Store(#[from] PostgresError),
}

/// Storage needed to score a program for an applicant
#[allow(async_fn_in_trait)]
pub trait AdmissionStore {
    async fn profile_for_user(&self, user_id: Uuid) -> Result<Option<Profile>, PostgresError>;

    async fn requirements_for(&self, program_id: Uuid) -> Result<Option<Requirements>, PostgresError>;

    async fn record_score(
        &self,
        profile_id: Uuid,
        program_id: Uuid,
        result: &ScoreResult,
    ) -> Result<(), PostgresError>;
}

impl AdmissionStore for PostgresClient {
    async fn profile_for_user(&self, user_id: Uuid) -> Result<Option<Profile>, PostgresError> {
        self.get_profile_by_user(user_id).await
    }

    async fn requirements_for(&self, program_id: Uuid) -> Result<Option<Requirements>, PostgresError> {
        self.find_requirements(program_id).await
    }

    async fn record_score(
        &self,
        profile_id: Uuid,
        program_id: Uuid,
        result: &ScoreResult,
    ) -> Result<(), PostgresError> {
        PostgresClient::record_score(self, profile_id, program_id, result).await
    }
}

/// Scores the caller's profile against a program and records the result
///
/// History recording is best-effort: a failed write is logged and the
/// computed score is still returned.
pub struct FitService<S> {
    store: Arc<S>,
    scorer: FitScorer,
}

impl<S: AdmissionStore> FitService<S> {
    pub fn new(store: Arc<S>, scorer: FitScorer) -> Self {
        Self { store, scorer }
    }

    pub fn scorer(&self) -> &FitScorer {
        &self.scorer
    }

    pub async fn score_program(&self, user_id: Uuid, program_id: Uuid) -> Result<ScoreResult, FitError> {
        let profile = self
            .store
            .profile_for_user(user_id)
            .await?
            .ok_or(FitError::ProfileNotFound)?;

        let requirements = self
            .store
            .requirements_for(program_id)
            .await?
            .unwrap_or_default();

        let result = self.scorer.score(&profile, &requirements);

        if let Err(e) = self.store.record_score(profile.id, program_id, &result).await {
            tracing::warn!(
                "Scored program {} for profile {} but history recording failed: {}",
                program_id,
                profile.id,
                e
            );
        }

        Ok(result)
    }
}
