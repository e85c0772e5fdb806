use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::{ProfileInput, ProfileResponse, ScoreRequest, ScoreResponse};
use crate::routes::{parse_id, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/profile/me", web::get().to(get_my_profile))
        .route("/profile/me", web::post().to(upsert_my_profile))
        .route("/score", web::post().to(score_program));
}

/// GET /api/v1/profile/me
///
/// Returns `{"profile": null}` until the caller saves one.
async fn get_my_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let profile = state.postgres.get_profile_by_user(user.id).await?;
    Ok(HttpResponse::Ok().json(ProfileResponse { profile }))
}

/// POST /api/v1/profile/me
///
/// Full replace: fields missing from the body are cleared.
async fn upsert_my_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<ProfileInput>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner().normalized();
    if let Err(errors) = input.validate() {
        tracing::info!("Profile validation failed for user {}: {}", user.id, errors);
        return Err(errors.into());
    }

    let profile = state.postgres.upsert_profile(user.id, &input).await?;
    Ok(HttpResponse::Ok().json(ProfileResponse {
        profile: Some(profile),
    }))
}

/// Score the caller's profile against a program
///
/// POST /api/v1/score
///
/// Request body:
/// ```json
/// { "program_id": "uuid" }
/// ```
async fn score_program(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<ScoreRequest>,
) -> Result<HttpResponse, ApiError> {
    let program_id = parse_id(body.program_id.as_deref(), "program_id")?;

    let result = state.fit.score_program(user.id, program_id).await?;

    tracing::info!(
        "Scored program {} for user {}: {} ({} reasons)",
        program_id,
        user.id,
        result.score,
        result.reasons.len()
    );

    Ok(HttpResponse::Ok().json(ScoreResponse {
        score: result.score,
        reasons: result.reasons,
    }))
}
