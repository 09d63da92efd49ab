//! # REST API for Lesson Plans

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use shared::{ApprovePlanRequest, LessonPlan, PlanListResponse, SubmitPlanRequest};
use tracing::{error, info};

use crate::backend::io::rest::caller::Caller;
use crate::backend::io::rest::error::ApiError;
use crate::backend::io::rest::extract::{ApiJson, ApiPath};
use crate::backend::AppState;

pub async fn list_plans(State(state): State<AppState>, Caller(user): Caller) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/plans for {}", user.id);

    let plans = state.lesson_plan_service.list_plans(&user).await?;
    Ok(Json(PlanListResponse { plans }))
}

pub async fn submit_plan(
    State(state): State<AppState>,
    Caller(teacher): Caller,
    ApiJson(request): ApiJson<SubmitPlanRequest>,
) -> impl IntoResponse {
    info!("POST /api/plans - class {} on {}", request.class_id, request.date);

    match state.lesson_plan_service.submit_plan(&teacher, request).await {
        Ok(plan) => (StatusCode::CREATED, Json(plan)).into_response(),
        Err(e) => {
            error!("Failed to submit lesson plan: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn approve_plan(
    State(state): State<AppState>,
    Caller(manager): Caller,
    ApiPath(plan_id): ApiPath<String>,
    ApiJson(request): ApiJson<ApprovePlanRequest>,
) -> Result<Json<LessonPlan>, ApiError> {
    info!("POST /api/plans/{}/approve", plan_id);

    let plan = state
        .lesson_plan_service
        .approve_plan(&manager, &plan_id, &request.feedback)
        .await?;
    Ok(Json(plan))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_plans).post(submit_plan))
        .route("/:plan_id/approve", post(approve_plan))
}
