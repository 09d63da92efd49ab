//! # REST API for the School Directory
//!
//! Users, classes and student enrollment. Changes are manager-only; the
//! `/me/*` endpoints give teachers their classes and guardians their
//! children.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, put},
    Router,
};
use shared::{
    ClassListResponse, ClassResponse, CreateClassRequest, CreateUserRequest, EnrollStudentRequest,
    ReassignTeacherRequest, StudentListResponse, StudentResponse, UserResponse, UserRole,
};
use tracing::{error, info};

use crate::backend::domain::commands::directory::{CreateClassCommand, CreateUserCommand, EnrollStudentCommand};
use crate::backend::io::rest::caller::Caller;
use crate::backend::io::rest::error::ApiError;
use crate::backend::io::rest::extract::{ApiJson, ApiPath};
use crate::backend::io::rest::mappers::user_mapper::UserMapper;
use crate::backend::AppState;

impl From<EnrollStudentRequest> for EnrollStudentCommand {
    fn from(request: EnrollStudentRequest) -> Self {
        Self {
            name: request.name,
            class_id: request.class_id,
            guardian_emails: request.guardian_emails,
        }
    }
}

// -- Users ----------------------------------------------------------------

pub async fn list_users(State(state): State<AppState>, caller: Caller) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/users");
    caller.require_staff()?;

    let users = state.directory_service.list_users().await?;
    Ok(Json(UserMapper::to_list_dto(users)))
}

pub async fn create_user(
    State(state): State<AppState>,
    Caller(actor): Caller,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> impl IntoResponse {
    info!("POST /api/users - {} ({})", request.email, request.role);

    let command = CreateUserCommand {
        name: request.name,
        email: request.email,
        role: request.role,
        function: request.function,
    };

    match state.directory_service.create_user(&actor, command).await {
        Ok(user) => {
            let response = UserResponse {
                success_message: format!("User {} created", user.name),
                user: UserMapper::to_dto(user),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to create user: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn delete_user(
    State(state): State<AppState>,
    Caller(actor): Caller,
    ApiPath(user_id): ApiPath<String>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE /api/users/{}", user_id);

    state.directory_service.delete_user(&actor, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// -- Classes --------------------------------------------------------------

pub async fn list_classes(State(state): State<AppState>, caller: Caller) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/classes");
    caller.require_staff()?;

    let classes = state.directory_service.list_classes().await?;
    Ok(Json(ClassListResponse { classes }))
}

pub async fn create_class(
    State(state): State<AppState>,
    Caller(actor): Caller,
    ApiJson(request): ApiJson<CreateClassRequest>,
) -> impl IntoResponse {
    info!("POST /api/classes - {}", request.name);

    let command = CreateClassCommand {
        name: request.name,
        teacher_id: request.teacher_id,
    };

    match state.directory_service.create_class(&actor, command).await {
        Ok(class) => {
            let response = ClassResponse {
                success_message: format!("Class {} created", class.name),
                class,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to create class: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn reassign_teacher(
    State(state): State<AppState>,
    Caller(actor): Caller,
    ApiPath(class_id): ApiPath<String>,
    ApiJson(request): ApiJson<ReassignTeacherRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("PUT /api/classes/{}/teacher - {}", class_id, request.teacher_id);

    let class = state
        .directory_service
        .reassign_class_teacher(&actor, &class_id, &request.teacher_id)
        .await?;
    Ok(Json(ClassResponse {
        success_message: "Teacher updated".to_string(),
        class,
    }))
}

pub async fn delete_class(
    State(state): State<AppState>,
    Caller(actor): Caller,
    ApiPath(class_id): ApiPath<String>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE /api/classes/{}", class_id);

    state.directory_service.delete_class(&actor, &class_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Classes taught by the calling teacher; every class for managers
pub async fn my_classes(State(state): State<AppState>, Caller(user): Caller) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/me/classes for {}", user.id);

    let classes = match user.role {
        UserRole::Manager => state.directory_service.list_classes().await?,
        UserRole::Teacher => state.directory_service.classes_for_teacher(&user.id).await?,
        UserRole::Guardian => return Err(ApiError::forbidden("Guardians have no classes")),
    };
    Ok(Json(ClassListResponse { classes }))
}

// -- Students -------------------------------------------------------------

pub async fn list_students(State(state): State<AppState>, caller: Caller) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/students");
    caller.require_staff()?;

    let students = state.directory_service.list_students().await?;
    Ok(Json(StudentListResponse { students }))
}

pub async fn enroll_student(
    State(state): State<AppState>,
    Caller(actor): Caller,
    ApiJson(request): ApiJson<EnrollStudentRequest>,
) -> impl IntoResponse {
    info!("POST /api/students - {} in {}", request.name, request.class_id);

    match state.directory_service.enroll_student(&actor, request.into()).await {
        Ok(student) => {
            let response = StudentResponse {
                success_message: format!("{} enrolled", student.name),
                student,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to enroll student: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn update_student(
    State(state): State<AppState>,
    Caller(actor): Caller,
    ApiPath(student_id): ApiPath<String>,
    ApiJson(request): ApiJson<EnrollStudentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("PUT /api/students/{}", student_id);

    let student = state
        .directory_service
        .update_student(&actor, &student_id, request.into())
        .await?;
    Ok(Json(StudentResponse {
        success_message: format!("{} updated", student.name),
        student,
    }))
}

pub async fn delete_student(
    State(state): State<AppState>,
    Caller(actor): Caller,
    ApiPath(student_id): ApiPath<String>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE /api/students/{}", student_id);

    state.directory_service.delete_student(&actor, &student_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Children linked to the calling guardian
pub async fn my_students(State(state): State<AppState>, Caller(user): Caller) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/me/students for {}", user.id);

    let students = state.directory_service.students_for_guardian(&user.id).await?;
    Ok(Json(StudentListResponse { students }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:user_id", delete(delete_user))
        .route("/classes", get(list_classes).post(create_class))
        .route("/classes/:class_id", delete(delete_class))
        .route("/classes/:class_id/teacher", put(reassign_teacher))
        .route("/students", get(list_students).post(enroll_student))
        .route("/students/:student_id", put(update_student).delete(delete_student))
        .route("/me/classes", get(my_classes))
        .route("/me/students", get(my_students))
}
