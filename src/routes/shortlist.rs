use actix_web::{web, HttpResponse};

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::{ShortlistAddRequest, ShortlistResponse};
use crate::routes::{parse_id, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/shortlist", web::get().to(list_shortlist))
        .route("/shortlist", web::post().to(add_to_shortlist))
        .route("/shortlist/{program_id}", web::delete().to(remove_from_shortlist));
}

async fn list_shortlist(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let items = state.postgres.list_shortlist(user.id).await?;
    Ok(HttpResponse::Ok().json(ShortlistResponse { items }))
}

async fn add_to_shortlist(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<ShortlistAddRequest>,
) -> Result<HttpResponse, ApiError> {
    let program_id = parse_id(body.program_id.as_deref(), "program_id")?;
    state.postgres.add_to_shortlist(user.id, program_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn remove_from_shortlist(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let program_id = parse_id(Some(path.as_str()), "program_id")?;
    let removed = state.postgres.remove_from_shortlist(user.id, program_id).await?;
    tracing::debug!("Shortlist remove {} for user {}: removed={}", program_id, user.id, removed);
    Ok(HttpResponse::NoContent().finish())
}
