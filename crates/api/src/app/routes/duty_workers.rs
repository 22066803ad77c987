use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use dutyroster_duties::{DutyWorkerFilter, DutyWorkerPatch, NewDutyWorker};

use crate::app::extract::{ApiJson, ApiPath, ApiQuery};
use crate::app::{errors, AppServices};
use crate::authz::RequirePermission;
use crate::permissions::{DutyWorkersEdit, DutyWorkersView};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_duty_workers).post(create_duty_worker))
        .route(
            "/:id",
            get(get_duty_worker)
                .put(update_duty_worker)
                .delete(delete_duty_worker),
        )
}

fn not_found(id: &str) -> axum::response::Response {
    errors::not_found(format!("DutyWorker with ID {id} not found."))
}

pub async fn list_duty_workers(
    _: RequirePermission<DutyWorkersView>,
    Extension(services): Extension<Arc<AppServices>>,
    ApiQuery(filter): ApiQuery<DutyWorkerFilter>,
) -> axum::response::Response {
    match services.duty_workers.list(&filter).await {
        Ok(workers) => (StatusCode::OK, Json(workers)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_duty_worker(
    _: RequirePermission<DutyWorkersView>,
    Extension(services): Extension<Arc<AppServices>>,
    ApiPath(id): ApiPath<String>,
) -> axum::response::Response {
    match services.duty_workers.get(&id).await {
        Ok(Some(worker)) => (StatusCode::OK, Json(worker)).into_response(),
        Ok(None) => not_found(&id),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_duty_worker(
    _: RequirePermission<DutyWorkersEdit>,
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<NewDutyWorker>,
) -> axum::response::Response {
    match services.duty_workers.create(body).await {
        Ok(worker) => (StatusCode::CREATED, Json(worker)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_duty_worker(
    _: RequirePermission<DutyWorkersEdit>,
    Extension(services): Extension<Arc<AppServices>>,
    ApiPath(id): ApiPath<String>,
    ApiJson(body): ApiJson<DutyWorkerPatch>,
) -> axum::response::Response {
    match services.duty_workers.update(&id, body).await {
        Ok(Some(worker)) => (StatusCode::OK, Json(worker)).into_response(),
        Ok(None) => not_found(&id),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_duty_worker(
    _: RequirePermission<DutyWorkersEdit>,
    Extension(services): Extension<Arc<AppServices>>,
    ApiPath(id): ApiPath<String>,
) -> axum::response::Response {
    match services.duty_workers.delete(&id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found(&id),
        Err(e) => errors::service_error_to_response(e),
    }
}
