//! # REST API for Daily Routines
//!
//! Recording, reading and presenting the per-day routine of each student.
//! Writing is staff-only and further restricted by the ledger; guardians
//! read through their own endpoint, which hides the care details of days
//! the child was absent.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use shared::{GenerateSummaryRequest, GenerateSummaryResponse, RoutineFields, UpsertOutcome};
use tracing::{error, info};

use crate::backend::domain::commands::routines::SubmitRoutineCommand;
use crate::backend::io::rest::caller::Caller;
use crate::backend::io::rest::error::ApiError;
use crate::backend::io::rest::extract::{ApiJson, ApiPath};
use crate::backend::io::rest::mappers::routine_mapper::RoutineMapper;
use crate::backend::AppState;

/// Create or replace the routine of a student for a day
pub async fn submit_routine(
    State(state): State<AppState>,
    Caller(user): Caller,
    ApiPath((student_id, date)): ApiPath<(String, String)>,
    ApiJson(fields): ApiJson<RoutineFields>,
) -> impl IntoResponse {
    info!("PUT /api/routines/{}/{} by {}", student_id, date, user.id);

    let command = SubmitRoutineCommand {
        student_id,
        date,
        fields,
        author_id: user.id,
    };

    match state.routine_ledger.submit_routine(command).await {
        Ok(result) => {
            let status = match result.outcome {
                UpsertOutcome::Created => StatusCode::CREATED,
                UpsertOutcome::Replaced => StatusCode::OK,
            };
            (status, Json(RoutineMapper::to_submit_dto(result))).into_response()
        }
        Err(e) => {
            error!("Failed to submit routine: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// The stored routine of a student for a day
pub async fn load_routine(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath((student_id, date)): ApiPath<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/routines/{}/{}", student_id, date);
    caller.require_staff()?;

    match state.routine_ledger.load_routine(&student_id, &date).await? {
        Some(routine) => Ok(Json(RoutineMapper::to_dto(routine))),
        None => Err(ApiError::not_found(
            "ROUTINE_NOT_FOUND",
            format!("No routine for student {} on {}", student_id, date),
        )),
    }
}

/// Starting values for the routine form of a student and day
pub async fn routine_form(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath((student_id, date)): ApiPath<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/routines/{}/{}/form", student_id, date);
    caller.require_staff()?;

    let form = state.routine_ledger.prepare_routine_form(&student_id, &date).await?;
    Ok(Json(RoutineMapper::to_form_dto(form)))
}

/// Every routine of a student, newest first
pub async fn list_student_routines(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(student_id): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/routines/{}", student_id);
    caller.require_staff()?;

    let routines = state.routine_ledger.list_student_routines(&student_id).await?;
    Ok(Json(RoutineMapper::to_list_dto(routines)))
}

/// Which students of a class already have a routine for the day
pub async fn class_routine_status(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath((class_id, date)): ApiPath<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/classes/{}/routine-status/{}", class_id, date);
    caller.require_staff()?;

    let statuses = state.routine_ledger.routine_status_for_class(&class_id, &date).await?;
    Ok(Json(RoutineMapper::to_class_status_dto(&class_id, &date, statuses)))
}

/// Routines of one of the caller's children, as guardians see them
pub async fn guardian_routines(
    State(state): State<AppState>,
    Caller(user): Caller,
    ApiPath(student_id): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/guardian/students/{}/routines by {}", student_id, user.id);

    let routines = state.routine_ledger.guardian_routines(&user.id, &student_id).await?;
    Ok(Json(RoutineMapper::to_guardian_list_dto(&student_id, routines)))
}

/// Suggest an observation text from the day's activities
pub async fn suggest_observation(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(request): ApiJson<GenerateSummaryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("POST /api/routines/summary");
    caller.require_staff()?;

    let observation = state.summary_service.generate_observation(&request.activities).await;
    Ok(Json(GenerateSummaryResponse {
        observation: observation.text,
        generated: observation.generated,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/routines/summary", post(suggest_observation))
        .route("/routines/:student_id", get(list_student_routines))
        .route("/routines/:student_id/:date", get(load_routine).put(submit_routine))
        .route("/routines/:student_id/:date/form", get(routine_form))
        .route("/classes/:class_id/routine-status/:date", get(class_routine_status))
        .route("/guardian/students/:student_id/routines", get(guardian_routines))
}
