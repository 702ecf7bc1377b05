use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::Utc;
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    dto::auth::{LoginRequest, LoginResponse, RegisterRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, issue_token},
    models::{PublicUser, User, UserRole},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const MIN_PASSWORD_LEN: usize = 6;

fn contact(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Builds a user record with a hashed password. Does not store it.
pub fn new_user(
    name: &str,
    email: Option<String>,
    phone: Option<String>,
    password: &str,
    role: UserRole,
) -> AppResult<User> {
    Ok(User {
        id: Uuid::new_v4().to_string(),
        name: name.trim().to_string(),
        email,
        phone,
        password_hash: hash_password(password)?,
        role,
        created_at: Utc::now(),
    })
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<PublicUser>> {
    let email = contact(payload.email);
    let phone = contact(payload.phone);
    if email.is_none() && phone.is_none() {
        return Err(AppError::BadRequest("Email or phone required".into()));
    }
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let user = new_user(
        &payload.name,
        email.clone(),
        phone.clone(),
        &payload.password,
        UserRole::Customer,
    )?;
    let user = state
        .store
        .users
        .insert_unless(user, |u| u.matches_contact(email.as_deref(), phone.as_deref()))
        .await?
        .ok_or_else(|| AppError::Conflict("User already exists".into()))?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok(ApiResponse::success("User created", user.into(), None))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let email = contact(payload.email);
    let phone = contact(payload.phone);
    if email.is_none() && phone.is_none() {
        return Err(AppError::BadRequest("Email or phone required".into()));
    }

    let user = state
        .store
        .user_by_contact(email.as_deref(), phone.as_deref())
        .await
        .ok_or_else(|| AppError::NotFound("Invalid user not found, please register".into()))?;

    if !verify_password(&payload.password, &user.password_hash)? {
        tracing::warn!(user_id = %user.id, "login with wrong password");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    let token = issue_token(&state.jwt, &user)?;
    tracing::info!(user_id = %user.id, role = user.role.as_str(), "user logged in");

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token,
            user: user.into(),
        },
        Some(Meta::empty()),
    ))
}

pub async fn current_user(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<PublicUser>> {
    let record = state
        .store
        .users
        .get(&user.user_id)
        .await
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(ApiResponse::success("Current user", record.into(), None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_and_never_equal_the_password() {
        let hash = hash_password("hunter22").expect("hash");
        assert_ne!(hash, "hunter22");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter22", &hash).expect("verify"));
        assert!(!verify_password("hunter23", &hash).expect("verify"));
    }
}
