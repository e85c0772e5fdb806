use actix_web::{web, HttpResponse};

use crate::core::{CatalogQuery, Filter};
use crate::error::ApiError;
use crate::models::{CatalogParams, CatalogResponse};
use crate::routes::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/programs", web::get().to(list_programs));
}

/// Catalog listing endpoint
///
/// GET /api/v1/programs?q=&countries=US,GB&levels=&fields=&currency=
///     &min_tuition=&max_tuition=&scholarship=true&sort=qs&page=1&limit=20
async fn list_programs(
    state: web::Data<AppState>,
    query: web::Query<Vec<(String, String)>>,
) -> Result<HttpResponse, ApiError> {
    let params = CatalogParams::from_pairs(query.into_inner());
    let filter = Filter::from_params(&params);
    let query = CatalogQuery::build(&filter);

    let (items, total) = state.postgres.list_programs(&query).await?;

    tracing::info!(
        "Catalog listing: {} predicates, order {:?}, page {}/{} (limit {}), {} of {} rows",
        query.predicates.len(),
        query.order,
        filter.page,
        query.window.page_count(total),
        filter.limit,
        items.len(),
        total
    );

    Ok(HttpResponse::Ok().json(CatalogResponse {
        page: filter.page,
        limit: filter.limit,
        total,
        items,
    }))
}
