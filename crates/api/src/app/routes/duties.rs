use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use dutyroster_duties::{DutyFilter, DutyPatch, NewDuty};

use crate::app::extract::{ApiJson, ApiPath, ApiQuery};
use crate::app::{errors, AppServices};
use crate::authz::RequirePermission;
use crate::permissions::{DutiesEdit, DutiesView};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_duties).post(create_duty))
        .route(
            "/:id",
            get(get_duty)
                .put(update_duty)
                .delete(delete_duty),
        )
}

fn not_found(id: &str) -> axum::response::Response {
    errors::not_found(format!("Duty with ID {id} not found."))
}

pub async fn list_duties(
    _: RequirePermission<DutiesView>,
    Extension(services): Extension<Arc<AppServices>>,
    ApiQuery(filter): ApiQuery<DutyFilter>,
) -> axum::response::Response {
    match services.duties.list(&filter).await {
        Ok(duties) => (StatusCode::OK, Json(duties)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_duty(
    _: RequirePermission<DutiesView>,
    Extension(services): Extension<Arc<AppServices>>,
    ApiPath(id): ApiPath<String>,
) -> axum::response::Response {
    match services.duties.get(&id).await {
        Ok(Some(duty)) => (StatusCode::OK, Json(duty)).into_response(),
        Ok(None) => not_found(&id),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_duty(
    _: RequirePermission<DutiesEdit>,
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<NewDuty>,
) -> axum::response::Response {
    match services.duties.create(body).await {
        Ok(duty) => (StatusCode::CREATED, Json(duty)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_duty(
    _: RequirePermission<DutiesEdit>,
    Extension(services): Extension<Arc<AppServices>>,
    ApiPath(id): ApiPath<String>,
    ApiJson(body): ApiJson<DutyPatch>,
) -> axum::response::Response {
    match services.duties.update(&id, body).await {
        Ok(Some(duty)) => (StatusCode::OK, Json(duty)).into_response(),
        Ok(None) => not_found(&id),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_duty(
    _: RequirePermission<DutiesEdit>,
    Extension(services): Extension<Arc<AppServices>>,
    ApiPath(id): ApiPath<String>,
) -> axum::response::Response {
    match services.duties.delete(&id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found(&id),
        Err(e) => errors::service_error_to_response(e),
    }
}
