use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::routes::{parse_id, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/universities/{id}", web::get().to(get_university));
}

/// GET /api/v1/universities/{id}
async fn get_university(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(Some(path.as_str()), "id")?;

    match state.postgres.get_university(id).await? {
        Some(university) => Ok(HttpResponse::Ok().json(university)),
        None => Err(ApiError::NotFound("university not found".to_string())),
    }
}
