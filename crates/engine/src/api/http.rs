//! HTTP routes.
//!
//! The caller's identity arrives in the `x-user-id` header, set by the auth
//! layer in front of this service.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use gauniv_domain::UserId;
use gauniv_shared::dto::{OnlineUsersDto, PresenceDto, RelationDto};

use crate::app::App;
use crate::infrastructure::ports::RepoError;
use crate::use_cases::friends::FriendError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/friends/list", get(list_relations))
        .route("/api/friends/add/{username}", post(request_friend))
        .route("/api/friends/accept/{user_id}", post(accept_friend))
        .route("/api/friends/remove/{user_id}", post(remove_relation))
        .route("/api/presence/online", get(online_users))
        .route("/api/presence/{user_id}", get(user_presence))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Identity
// =============================================================================

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserId);

/// Read the caller id from `x-user-id`. Absent or blank yields `Ok(None)`.
pub fn user_id_from_headers(headers: &HeaderMap) -> Result<Option<UserId>, ApiError> {
    let Some(value) = headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };
    let raw = value
        .to_str()
        .map_err(|_| ApiError::BadRequest("Invalid x-user-id header".to_string()))?;
    if raw.trim().is_empty() {
        return Ok(None);
    }
    UserId::new(raw)
        .map(Some)
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        user_id_from_headers(&parts.headers)?
            .map(CurrentUser)
            .ok_or(ApiError::Unauthorized)
    }
}

fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    UserId::new(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
}

// =============================================================================
// Friends
// =============================================================================

async fn list_relations(
    State(app): State<Arc<App>>,
    CurrentUser(viewer): CurrentUser,
) -> Result<Json<Vec<RelationDto>>, ApiError> {
    let rows = app.use_cases.friends.list.execute(&viewer).await?;
    Ok(Json(rows))
}

async fn request_friend(
    State(app): State<Arc<App>>,
    CurrentUser(source): CurrentUser,
    Path(username): Path<String>,
) -> Result<StatusCode, ApiError> {
    app.use_cases
        .friends
        .request
        .execute(&source, &username)
        .await?;
    Ok(StatusCode::OK)
}

async fn accept_friend(
    State(app): State<Arc<App>>,
    CurrentUser(viewer): CurrentUser,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let requester = parse_user_id(&user_id)?;
    app.use_cases
        .friends
        .accept
        .execute(&viewer, &requester)
        .await?;
    Ok(StatusCode::OK)
}

async fn remove_relation(
    State(app): State<Arc<App>>,
    CurrentUser(viewer): CurrentUser,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let other = parse_user_id(&user_id)?;
    app.use_cases.friends.remove.execute(&viewer, &other).await?;
    Ok(StatusCode::OK)
}

// =============================================================================
// Presence
// =============================================================================

async fn online_users(
    State(app): State<Arc<App>>,
    CurrentUser(_): CurrentUser,
) -> Json<OnlineUsersDto> {
    let mut user_ids: Vec<String> = app
        .presence
        .all_online_user_ids()
        .await
        .into_iter()
        .map(|id| id.to_string())
        .collect();
    user_ids.sort();
    Json(OnlineUsersDto { user_ids })
}

async fn user_presence(
    State(app): State<Arc<App>>,
    CurrentUser(_): CurrentUser,
    Path(user_id): Path<String>,
) -> Result<Json<PresenceDto>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    let is_online = app.presence.is_online(&user_id).await;
    Ok(Json(PresenceDto {
        user_id: user_id.to_string(),
        is_online,
    }))
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<FriendError> for ApiError {
    fn from(e: FriendError) -> Self {
        match e {
            FriendError::UserNotFound(_) | FriendError::RequestNotFound => {
                ApiError::NotFound(e.to_string())
            }
            FriendError::Repo(repo) => repo.into(),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}
