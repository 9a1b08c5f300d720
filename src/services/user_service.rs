use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::users::{SignupRequest, UpdateUserRequest, UserList},
    entity::{
        tickets::{Column as TicketCol, Entity as Tickets, TicketStatus},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::User,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::auth_service::hash_password,
    state::AppState,
};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r".+@.+\..+").expect("valid email pattern"));
// Indian mobile numbers.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[6-9]\d{9}$").expect("valid phone pattern"));

pub fn validate_email(email: &str) -> AppResult<()> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("Invalid email address `{email}`")))
    }
}

pub fn validate_phone(phone: &str) -> AppResult<()> {
    if PHONE_RE.is_match(phone) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("Invalid phone number `{phone}`")))
    }
}

fn require_non_empty(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(())
}

pub async fn signup(state: &AppState, payload: SignupRequest) -> AppResult<ApiResponse<User>> {
    if payload.is_admin == Some(true) {
        return Err(AppError::Unauthorized(
            "Admin accounts cannot be created through signup".into(),
        ));
    }

    let email = payload.email.trim().to_lowercase();
    let phone = payload.phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty());
    require_non_empty("name", &payload.name)?;
    require_non_empty("password", &payload.password)?;
    validate_email(&email)?;
    if let Some(phone) = &phone {
        validate_phone(phone)?;
    }

    ensure_unique(state, None, Some(&email), phone.as_deref()).await?;

    let now = Utc::now();
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        email: Set(email),
        phone: Set(phone),
        password_hash: Set(hash_password(&payload.password)?),
        is_admin: Set(false),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(user_id = %user.id, "user signed up");
    audit::record(
        &state.orm,
        Some(user.id),
        "user_signup",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success("User created", User::from(user), None))
}

pub async fn list_users(
    state: &AppState,
    auth: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(auth)?;
    let (page, limit, offset) = pagination.normalize();

    let finder = Users::find().order_by_asc(UserCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    Ok(ApiResponse::success(
        "Users",
        UserList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_user(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(auth)?;
    let user = find_user(state, id).await?;
    Ok(ApiResponse::success(
        "User",
        User::from(user),
        Some(Meta::empty()),
    ))
}

pub async fn update_user(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
    payload: UpdateUserRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(auth)?;
    let existing = find_user(state, id).await?;

    let email = payload.email.map(|e| e.trim().to_lowercase());
    let phone = payload.phone.map(|p| p.trim().to_string());
    if let Some(name) = &payload.name {
        require_non_empty("name", name)?;
    }
    if let Some(password) = &payload.password {
        require_non_empty("password", password)?;
    }
    if let Some(email) = &email {
        validate_email(email)?;
    }
    if let Some(phone) = phone.as_deref().filter(|p| !p.is_empty()) {
        validate_phone(phone)?;
    }
    ensure_unique(
        state,
        Some(id),
        email.as_deref(),
        phone.as_deref().filter(|p| !p.is_empty()),
    )
    .await?;

    let mut active: UserActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(email) = email {
        active.email = Set(email);
    }
    if let Some(phone) = phone {
        // An empty string clears the phone number.
        active.phone = Set(Some(phone).filter(|p| !p.is_empty()));
    }
    if let Some(password) = payload.password {
        active.password_hash = Set(hash_password(&password)?);
    }
    if let Some(is_admin) = payload.is_admin {
        active.is_admin = Set(is_admin);
    }
    active.updated_at = Set(Utc::now().into());
    let user = active.update(&state.orm).await?;

    audit::record(
        &state.orm,
        Some(auth.user_id),
        "user_update",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "User updated",
        User::from(user),
        Some(Meta::empty()),
    ))
}

/// Deletes a user. Users still holding booked seats are kept so the bus
/// counters stay consistent.
pub async fn delete_user(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(auth)?;
    find_user(state, id).await?;

    let held = Tickets::find()
        .filter(TicketCol::UserId.eq(id))
        .filter(TicketCol::Status.eq(TicketStatus::Closed))
        .count(&state.orm)
        .await?;
    if held > 0 {
        return Err(AppError::Conflict(format!(
            "User with ID {id} still holds {held} booked seat(s)"
        )));
    }

    Users::delete_by_id(id).exec(&state.orm).await?;

    audit::record(
        &state.orm,
        Some(auth.user_id),
        "user_delete",
        "users",
        serde_json::json!({ "user_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Successfully deleted user with ID {id}"),
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

async fn find_user(state: &AppState, id: Uuid) -> AppResult<UserModel> {
    Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with ID {id} does not exist")))
}

/// Rejects an email or phone already registered to another user.
async fn ensure_unique(
    state: &AppState,
    exclude: Option<Uuid>,
    email: Option<&str>,
    phone: Option<&str>,
) -> AppResult<()> {
    let mut any = Condition::any();
    if let Some(email) = email {
        any = any.add(UserCol::Email.eq(email));
    }
    if let Some(phone) = phone {
        any = any.add(UserCol::Phone.eq(phone));
    }
    if any.is_empty() {
        return Ok(());
    }

    let mut condition = Condition::all().add(any);
    if let Some(id) = exclude {
        condition = condition.add(UserCol::Id.ne(id));
    }

    if let Some(existing) = Users::find().filter(condition).one(&state.orm).await? {
        let field = if email.is_some_and(|e| e == existing.email) {
            "Email"
        } else {
            "Phone number"
        };
        return Err(AppError::Conflict(format!("{field} is already registered")));
    }
    Ok(())
}
