use anyhow::anyhow;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
    models::{groups::JoinStatus, sessions::CurrentUser},
};

#[derive(Deserialize, Validate)]
pub struct CreateGroupPayload {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title is required and must be at most 100 characters"
    ))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize, Validate)]
pub struct InviteUsersPayload {
    #[validate(length(min = 1, max = 100, message = "Invite between 1 and 100 users"))]
    pub user_ids: Vec<Uuid>,
}

#[derive(Serialize)]
pub struct InviteUsersResponse {
    pub invited: Vec<Uuid>,
}

#[derive(Deserialize)]
pub struct JoinIntentPayload {
    pub join: bool,
}

#[derive(Serialize)]
pub struct JoinIntentResponse {
    pub join_status: JoinStatus,
}

fn invalid_payload(e: ValidationErrors) -> AppError {
    let mut error_messages = String::new();
    for (field, errors) in e.field_errors() {
        for error in errors {
            error_messages.push_str(&format!(
                "{}: {} ",
                field,
                error
                    .message
                    .as_ref()
                    .map_or("invalid value", |m| m.as_ref())
            ));
        }
    }
    AppError::BadRequest(anyhow!(error_messages.trim().to_string()))
}

pub async fn create_group(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(mut payload): Json<CreateGroupPayload>,
) -> AppResult<impl IntoResponse> {
    payload.title = payload.title.trim().to_string();
    payload.description = payload.description.trim().to_string();
    payload.validate().map_err(invalid_payload)?;

    let group = state
        .membership
        .create_group(payload.title, payload.description, user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(group)))
}

pub async fn list_groups(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> AppResult<impl IntoResponse> {
    let groups = state.membership.list_groups(user_id).await?;

    Ok(Json(groups))
}

pub async fn get_group(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(group_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let group = state.membership.get_group(group_id, user_id).await?;

    Ok(Json(group))
}

pub async fn invite_users(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(group_id): Path<Uuid>,
    Json(payload): Json<InviteUsersPayload>,
) -> AppResult<impl IntoResponse> {
    payload.validate().map_err(invalid_payload)?;

    let invited = state
        .membership
        .invite_users(group_id, user_id, &payload.user_ids)
        .await?;

    Ok(Json(InviteUsersResponse { invited }))
}

pub async fn set_join_intent(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(group_id): Path<Uuid>,
    Json(payload): Json<JoinIntentPayload>,
) -> AppResult<impl IntoResponse> {
    let join_status = state
        .membership
        .set_join_intent(group_id, user_id, payload.join)
        .await?;

    Ok(Json(JoinIntentResponse { join_status }))
}
