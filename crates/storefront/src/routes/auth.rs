//! Authentication route handlers.
//!
//! Registration, login, logout and the forgot/reset password flow. Identity
//! is kept in the server-side session.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use chowline_db::password_resets::RESET_TOKEN_TTL_MINUTES;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::extract::ApiJson;
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthService, Registration};
use crate::services::email::reset_url;
use crate::state::AppState;

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Forgot password request.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Reset password request.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
    pub password_confirm: String,
}

/// Plain acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

const RESET_REQUESTED: &str =
    "If an account exists for that email, a password reset link has been sent";

/// Register a customer account and sign it in.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    ApiJson(form): ApiJson<Registration>,
) -> Result<(StatusCode, Json<CurrentUser>)> {
    let user = AuthService::new(state.pool()).register(form).await?;

    let current = CurrentUser::from(&user);
    set_current_user(&session, &current).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    Ok((StatusCode::CREATED, Json(current)))
}

/// Sign in with email and password.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ApiJson(form): ApiJson<LoginRequest>,
) -> Result<Json<CurrentUser>> {
    let user = AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "login failed"))?;

    let current = CurrentUser::from(&user);
    set_current_user(&session, &current).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    Ok(Json(current))
}

/// Sign out. The whole session is discarded, cart included.
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// The signed-in user.
pub async fn me(RequireAuth(user): RequireAuth) -> Json<CurrentUser> {
    Json(user)
}

/// Start a password reset.
///
/// Responds `202` whether or not the email is registered. Delivery
/// failures are logged, not reported.
#[instrument(skip(state, form))]
pub async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<ForgotPasswordRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let issued = AuthService::new(state.pool())
        .request_password_reset(&form.email)
        .await?;

    if let Some((user, token)) = issued {
        let link = reset_url(&state.config().base_url, &token.token);
        match state.email() {
            Some(email) => {
                if let Err(e) = email
                    .send_password_reset(
                        user.email.as_str(),
                        &user.username,
                        &link,
                        RESET_TOKEN_TTL_MINUTES,
                    )
                    .await
                {
                    tracing::error!(user_id = %user.id, error = %e, "failed to send password reset email");
                }
            }
            None => {
                tracing::debug!(user_id = %user.id, reset_url = %link, "SMTP not configured, reset email not sent");
            }
        }
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse {
            message: RESET_REQUESTED,
        }),
    ))
}

/// Finish a password reset with the emailed token.
///
/// The user is not signed in; they log in with the new password.
#[instrument(skip(state, form))]
pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>> {
    AuthService::new(state.pool())
        .reset_password(&form.token, &form.password, &form.password_confirm)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password updated, please sign in",
    }))
}
