//! User registration route.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use rollcall_core::{RegisterInput, UserProfile, ValidationErrors, validate_registration};

use crate::error::Result;
use crate::state::AppState;

/// `POST /users` - register a new user.
///
/// Responds `201 Created` with the stored user's public profile. The
/// password digest is never part of the response.
#[tracing::instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterInput>, JsonRejection>,
) -> Result<(StatusCode, Json<UserProfile>)> {
    let Json(input) =
        payload.map_err(|rejection| ValidationErrors::single("body", rejection.body_text()))?;

    let registration = validate_registration(&input)?;
    let user = state.registration().create(registration).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}
