use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use dutyroster_duties::{DutyTypeFilter, DutyTypePatch, NewDutyType};

use crate::app::extract::{ApiJson, ApiPath, ApiQuery};
use crate::app::{errors, AppServices};
use crate::authz::RequirePermission;
use crate::permissions::{DutyTypesEdit, DutyTypesView};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_duty_types).post(create_duty_type))
        .route(
            "/:id",
            get(get_duty_type)
                .put(update_duty_type)
                .delete(delete_duty_type),
        )
}

fn not_found(id: &str) -> axum::response::Response {
    errors::not_found(format!("DutyType with ID {id} not found."))
}

pub async fn list_duty_types(
    _: RequirePermission<DutyTypesView>,
    Extension(services): Extension<Arc<AppServices>>,
    ApiQuery(filter): ApiQuery<DutyTypeFilter>,
) -> axum::response::Response {
    match services.duty_types.list(&filter).await {
        Ok(types) => (StatusCode::OK, Json(types)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_duty_type(
    _: RequirePermission<DutyTypesView>,
    Extension(services): Extension<Arc<AppServices>>,
    ApiPath(id): ApiPath<String>,
) -> axum::response::Response {
    match services.duty_types.get(&id).await {
        Ok(Some(duty_type)) => (StatusCode::OK, Json(duty_type)).into_response(),
        Ok(None) => not_found(&id),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_duty_type(
    _: RequirePermission<DutyTypesEdit>,
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<NewDutyType>,
) -> axum::response::Response {
    match services.duty_types.create(body).await {
        Ok(duty_type) => (StatusCode::CREATED, Json(duty_type)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_duty_type(
    _: RequirePermission<DutyTypesEdit>,
    Extension(services): Extension<Arc<AppServices>>,
    ApiPath(id): ApiPath<String>,
    ApiJson(body): ApiJson<DutyTypePatch>,
) -> axum::response::Response {
    match services.duty_types.update(&id, body).await {
        Ok(Some(duty_type)) => (StatusCode::OK, Json(duty_type)).into_response(),
        Ok(None) => not_found(&id),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_duty_type(
    _: RequirePermission<DutyTypesEdit>,
    Extension(services): Extension<Arc<AppServices>>,
    ApiPath(id): ApiPath<String>,
) -> axum::response::Response {
    match services.duty_types.delete(&id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found(&id),
        Err(e) => errors::service_error_to_response(e),
    }
}
