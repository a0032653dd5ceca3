/// User directory API routes
use crate::{
    api::form::{self, AvatarUpload},
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use roster_core::{
    validation::{validate_create, validate_update},
    ApiResponse, Field, FieldError, User, UserId,
};

/// Parse a path id; only positive integers name a user
pub fn parse_user_id(raw: &str) -> Result<UserId> {
    raw.trim()
        .parse::<UserId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            ServerError::Validation(FieldError::new(Field::Id, "Invalid user ID").into())
        })
}

/// Write an accepted avatar to disk, returning its public path
async fn store_avatar(app_state: &AppState, upload: Option<AvatarUpload>) -> Result<Option<String>> {
    match upload {
        Some(upload) => {
            let path = app_state
                .avatars
                .store(upload.image_type, &upload.data)
                .await?;
            Ok(Some(path))
        }
        None => Ok(None),
    }
}

/// GET /api/users
pub async fn list_users(State(app_state): State<AppState>) -> Result<Json<ApiResponse<Vec<User>>>> {
    let users = app_state.users.find_all().await?;
    Ok(Json(ApiResponse::list("Users retrieved successfully", users)))
}

/// GET /api/users/:id
pub async fn get_user(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<ApiResponse<User>>> {
    let id = parse_user_id(&id)?;
    let user = app_state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(ServerError::user_not_found)?;

    Ok(Json(ApiResponse::ok("User retrieved successfully", user)))
}

/// POST /api/users
/// Create a user from multipart form data (optionally with an avatar) or JSON
pub async fn create_user(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<ApiResponse<User>>)> {
    let submission = form::parse_submission(&headers, form::buffered(body)?).await?;
    let mut new_user = submission.checked(validate_create(&submission.input))?;

    let stored = store_avatar(&app_state, submission.avatar).await?;
    new_user.avatar.clone_from(&stored);

    match app_state.users.create(new_user).await {
        Ok(user) => {
            tracing::info!(id = user.id, email = %user.email, "Created user");
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse::ok("User created successfully", user)),
            ))
        }
        Err(e) => {
            if let Some(path) = &stored {
                app_state.avatars.discard(path).await;
            }
            Err(e.into())
        }
    }
}

/// PUT /api/users/:id
/// Partial update; absent fields keep their stored values
pub async fn update_user(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<ApiResponse<User>>> {
    let id = parse_user_id(&id)?;
    let submission = form::parse_submission(&headers, form::buffered(body)?).await?;
    let mut changes = submission.checked(validate_update(&submission.input))?;

    // The previous avatar is only needed when a new one replaces it
    let previous_avatar = if submission.avatar.is_some() {
        app_state
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(ServerError::user_not_found)?
            .avatar
    } else {
        None
    };

    let stored = store_avatar(&app_state, submission.avatar).await?;
    changes.avatar.clone_from(&stored);

    let user = match app_state.users.update(id, changes).await {
        Ok(Some(user)) => user,
        outcome => {
            if let Some(path) = &stored {
                app_state.avatars.discard(path).await;
            }
            return Err(match outcome {
                Err(e) => e.into(),
                Ok(_) => ServerError::user_not_found(),
            });
        }
    };

    if let Some(old) = previous_avatar {
        if stored.as_deref() != Some(old.as_str()) && app_state.avatars.is_local(&old) {
            app_state.avatars.discard(&old).await;
        }
    }

    tracing::info!(id = user.id, "Updated user");
    Ok(Json(ApiResponse::ok("User updated successfully", user)))
}

/// DELETE /api/users/:id
pub async fn delete_user(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<ApiResponse<User>>> {
    let id = parse_user_id(&id)?;
    let user = app_state
        .users
        .delete(id)
        .await?
        .ok_or_else(ServerError::user_not_found)?;

    if let Some(avatar) = &user.avatar {
        app_state.avatars.discard(avatar).await;
    }

    tracing::info!(id = user.id, "Deleted user");
    Ok(Json(ApiResponse::ok("User deleted successfully", user)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id("1").unwrap(), 1);
        assert_eq!(parse_user_id("42").unwrap(), 42);

        for raw in ["0", "-3", "abc", "1.5", ""] {
            match parse_user_id(raw) {
                Err(ServerError::Validation(errors)) => {
                    assert_eq!(errors.message_for(Field::Id), Some("Invalid user ID"));
                }
                other => panic!("{raw:?} parsed as {other:?}"),
            }
        }
    }
}
