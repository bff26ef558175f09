use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::services::users::StaffProfile;
use crate::{errors::ServiceError, ApiResponse, AppState};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Staff login: credential lookup returning role and shop affiliation.
/// No token is issued and no session is created.
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    summary = "Staff login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = ApiResponse<StaffProfile>),
        (status = 400, description = "Missing email or password", body = crate::errors::ErrorResponse),
        (status = 401, description = "Invalid email or password", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "Users"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<StaffProfile>>, ServiceError> {
    request.validate()?;
    let profile = state
        .services
        .users
        .authenticate(&request.email, &request.password)
        .await?;
    Ok(Json(ApiResponse::success(profile)))
}
