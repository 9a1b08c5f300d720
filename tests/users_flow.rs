mod common;

use bus_booking_api::{
    dto::{
        auth::TokenRequest,
        tickets::UpdateTicketRequest,
        users::{SignupRequest, UpdateUserRequest},
    },
    entity::users::{Column as UserCol, Entity as Users},
    error::AppError,
    middleware::auth::{ADMIN_ROLE, AuthUser},
    routes::params::Pagination,
    services::{auth_service, seed_service, ticket_service, user_service},
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use common::{create_bus, create_user, setup_state};

fn signup_request(email: &str) -> SignupRequest {
    SignupRequest {
        name: "Asha".into(),
        email: email.into(),
        password: "s3cret-pass".into(),
        phone: Some("9876543210".into()),
        is_admin: None,
    }
}

fn admin(user_id: Uuid) -> AuthUser {
    AuthUser {
        user_id,
        email: "admin@example.com".into(),
        role: ADMIN_ROLE.into(),
    }
}

#[tokio::test]
async fn signup_stores_a_hashed_lowercased_user() -> anyhow::Result<()> {
    let state = setup_state().await?;

    let created = user_service::signup(&state, signup_request("Asha@Example.com"))
        .await?
        .data
        .unwrap();
    assert_eq!(created.email, "asha@example.com");
    assert!(!created.is_admin);

    let stored = Users::find_by_id(created.id).one(&state.orm).await?.unwrap();
    assert_ne!(stored.password_hash, "s3cret-pass");
    assert!(auth_service::verify_password("s3cret-pass", &stored.password_hash)?);
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_rejected_and_only_one_record_exists() -> anyhow::Result<()> {
    let state = setup_state().await?;
    user_service::signup(&state, signup_request("asha@example.com")).await?;

    let mut again = signup_request("ASHA@example.com");
    again.phone = None;
    let err = user_service::signup(&state, again).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let mut same_phone = signup_request("other@example.com");
    same_phone.phone = Some("9876543210".into());
    let err = user_service::signup(&state, same_phone).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let count = Users::find()
        .filter(UserCol::Email.eq("asha@example.com"))
        .count(&state.orm)
        .await?;
    assert_eq!(count, 1);
    Ok(())
}

#[tokio::test]
async fn signup_rejects_admins_and_bad_fields() -> anyhow::Result<()> {
    let state = setup_state().await?;

    let mut as_admin = signup_request("boss@example.com");
    as_admin.is_admin = Some(true);
    let err = user_service::signup(&state, as_admin).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    let err = user_service::signup(&state, signup_request("not-an-email"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let mut bad_phone = signup_request("phone@example.com");
    bad_phone.phone = Some("12345".into());
    let err = user_service::signup(&state, bad_phone).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let mut blank_name = signup_request("blank@example.com");
    blank_name.name = "   ".into();
    let err = user_service::signup(&state, blank_name).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    assert_eq!(Users::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn admin_token_requires_an_admin_with_the_right_password() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let hash = auth_service::hash_password("admin-pass")?;
    let admin_id = create_user(&state, "admin@example.com", &hash, true).await?;
    create_user(&state, "rider@example.com", &hash, false).await?;

    let token = auth_service::issue_admin_token(
        &state,
        TokenRequest {
            email: "admin@example.com".into(),
            password: "admin-pass".into(),
        },
    )
    .await?
    .data
    .unwrap()
    .token;
    let claims = state.jwt.verify(&token)?;
    assert_eq!(claims.user_id, admin_id);
    assert_eq!(claims.role, ADMIN_ROLE);

    let err = auth_service::issue_admin_token(
        &state,
        TokenRequest {
            email: "admin@example.com".into(),
            password: "wrong".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(ref msg) if msg == "Wrong password"));

    let err = auth_service::issue_admin_token(
        &state,
        TokenRequest {
            email: "rider@example.com".into(),
            password: "admin-pass".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    let err = auth_service::issue_admin_token(
        &state,
        TokenRequest {
            email: "nobody@example.com".into(),
            password: "admin-pass".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
    Ok(())
}

#[tokio::test]
async fn admin_token_accepts_the_email_as_configured() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let admin_id =
        seed_service::ensure_admin(&state.orm, "Ops", "Admin@Example.com", "ops-pass").await?;

    let token = auth_service::issue_admin_token(
        &state,
        TokenRequest {
            email: "Admin@Example.com".into(),
            password: "ops-pass".into(),
        },
    )
    .await?
    .data
    .unwrap()
    .token;
    let claims = state.jwt.verify(&token)?;
    assert_eq!(claims.user_id, admin_id);
    assert_eq!(claims.email, "admin@example.com");

    let token = auth_service::issue_admin_token(
        &state,
        TokenRequest {
            email: "  admin@example.COM ".into(),
            password: "ops-pass".into(),
        },
    )
    .await?;
    assert!(token.data.is_some());
    Ok(())
}

#[tokio::test]
async fn seeding_an_admin_promotes_an_existing_account() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let existing = create_user(&state, "ops@example.com", "dummy", false).await?;

    let id = seed_service::ensure_admin(&state.orm, "Ops", "ops@example.com", "ops-pass").await?;
    assert_eq!(id, existing);

    let stored = Users::find_by_id(id).one(&state.orm).await?.unwrap();
    assert!(stored.is_admin);

    let fresh = seed_service::ensure_admin(&state.orm, "Root", "root@example.com", "root-pass").await?;
    assert_ne!(fresh, existing);
    assert_eq!(Users::find().count(&state.orm).await?, 2);
    Ok(())
}

#[tokio::test]
async fn user_management_is_admin_only() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let rider = AuthUser {
        user_id: Uuid::new_v4(),
        email: "rider@example.com".into(),
        role: "user".into(),
    };

    let err = user_service::list_users(&state, &rider, Pagination::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let err = user_service::delete_user(&state, &rider, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    Ok(())
}

#[tokio::test]
async fn update_and_delete_users() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let admin_id = create_user(&state, "admin@example.com", "dummy", true).await?;
    let auth = admin(admin_id);
    let user = user_service::signup(&state, signup_request("asha@example.com"))
        .await?
        .data
        .unwrap();

    let updated = user_service::update_user(
        &state,
        &auth,
        user.id,
        UpdateUserRequest {
            name: Some("Asha K".into()),
            phone: Some(String::new()),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(updated.name, "Asha K");
    assert_eq!(updated.phone, None);
    assert_eq!(updated.email, "asha@example.com");

    let err = user_service::update_user(
        &state,
        &auth,
        user.id,
        UpdateUserRequest {
            email: Some("admin@example.com".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let listed = user_service::list_users(&state, &auth, Pagination::default())
        .await?
        .data
        .unwrap();
    assert_eq!(listed.items.len(), 2);

    // A user holding a seat cannot be removed.
    let bus_id = create_bus(&state, 2).await?.bus.id;
    ticket_service::update_ticket_status(
        &state,
        bus_id,
        1,
        UpdateTicketRequest {
            user_id: Some(user.id),
            status: "closed".into(),
        },
    )
    .await?;
    let err = user_service::delete_user(&state, &auth, user.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    ticket_service::update_ticket_status(
        &state,
        bus_id,
        1,
        UpdateTicketRequest {
            user_id: None,
            status: "open".into(),
        },
    )
    .await?;
    user_service::delete_user(&state, &auth, user.id).await?;

    let err = user_service::get_user(&state, &auth, user.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    Ok(())
}
