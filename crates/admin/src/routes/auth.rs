//! Admin sign-in route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::extract::ApiJson;
use crate::middleware::{RequireAdmin, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::AdminAuthService;
use crate::state::AppState;

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Sign in. Customer accounts are refused.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ApiJson(form): ApiJson<LoginRequest>,
) -> Result<Json<CurrentAdmin>> {
    let admin = AdminAuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await?;

    set_current_admin(&session, &admin).await?;
    set_sentry_user(admin.id.as_i32(), Some(admin.email.as_str()));
    tracing::info!(admin_id = %admin.id, "admin signed in");

    Ok(Json(admin))
}

/// Sign out.
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_admin(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// The signed-in admin.
pub async fn me(RequireAdmin(admin): RequireAdmin) -> Json<CurrentAdmin> {
    Json(admin)
}
