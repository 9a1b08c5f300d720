use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::{
    audit,
    dto::auth::{TokenRequest, TokenResponse},
    entity::users::{Column as UserCol, Entity as Users},
    error::{AppError, AppResult},
    middleware::auth::ADMIN_ROLE,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Issues a one-hour admin token. Unknown email, non-admin accounts and wrong
/// passwords are all rejected as unauthorized.
pub async fn issue_admin_token(
    state: &AppState,
    payload: TokenRequest,
) -> AppResult<ApiResponse<TokenResponse>> {
    let TokenRequest { email, password } = payload;
    // Stored emails are lowercased at signup and seeding.
    let email = email.trim().to_lowercase();
    let user = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unauthorized".into()))?;

    if !user.is_admin {
        return Err(AppError::Unauthorized("Unauthorized".into()));
    }

    if !verify_password(&password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Wrong password".into()));
    }

    let token = state.jwt.issue(user.id, &user.email, ADMIN_ROLE)?;

    audit::record(
        &state.orm,
        Some(user.id),
        "admin_token",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Authentication successful",
        TokenResponse { token },
        Some(Meta::empty()),
    ))
}
