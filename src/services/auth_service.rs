use std::sync::OnceLock;

use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr, TransactionTrait,
};

use crate::{
    dto::auth::{
        LoginRequest, LoginResponse, NewVendorAccount, RegisteredVendor, UserList, normalize_email,
    },
    entity::{
        users::{
            ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel,
            UserRole,
        },
        vendors::ActiveModel as VendorActive,
    },
    error::{AppError, AppResult},
    models::User,
    response::{ApiResponse, Meta},
    security::{hash_password, hash_password_blocking, verify_password_blocking},
    state::AppState,
};

const DUPLICATE_EMAIL: &str = "User already exists";
const BAD_CREDENTIALS: &str = "Invalid email or password";

static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// A real Argon2id hash that no account owns, checked when the email is unknown.
fn dummy_hash() -> AppResult<&'static str> {
    if let Some(hash) = DUMMY_HASH.get() {
        return Ok(hash);
    }
    let hash = hash_password("no-such-account")?;
    Ok(DUMMY_HASH.get_or_init(|| hash))
}

/// Creates a VENDOR user and its unapproved vendor record, both or neither.
pub async fn register_vendor(
    state: &AppState,
    account: NewVendorAccount,
) -> AppResult<ApiResponse<RegisteredVendor>> {
    let NewVendorAccount {
        name,
        email,
        password,
    } = account;

    let existing = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(DUPLICATE_EMAIL));
    }

    let password_hash = hash_password_blocking(password).await?;

    let txn = state.orm.begin().await?;
    let user = UserActive {
        id: NotSet,
        name: Set(name),
        email: Set(email),
        password_hash: Set(password_hash),
        role: Set(UserRole::Vendor),
        created_at: NotSet,
    }
    .insert(&txn)
    .await
    .map_err(duplicate_as_conflict)?;

    let vendor = VendorActive {
        id: NotSet,
        user_id: Set(user.id),
        approved: Set(false),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    tracing::info!(user_id = user.id, vendor_id = vendor.id, "vendor registered");

    Ok(ApiResponse::success(
        "Vendor registered, waiting for admin approval",
        RegisteredVendor {
            user: User::from(user),
            vendor_id: vendor.id,
            approved: vendor.approved,
        },
        Some(Meta::empty()),
    ))
}

/// Two registrations can race past the pre-check; the unique index settles it.
fn duplicate_as_conflict(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(DUPLICATE_EMAIL),
        _ => AppError::OrmError(err),
    }
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    payload.validate()?;
    let email = normalize_email(&payload.email);

    let user = Users::find()
        .filter(UserCol::Email.eq(email))
        .one(&state.orm)
        .await?;
    let user = check_credentials(user, payload.password).await?;

    let token = state.tokens.issue(user.id, user.role)?;
    tracing::info!(user_id = user.id, role = ?user.role, "user logged in");

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            user: User::from(user),
        },
        Some(Meta::empty()),
    ))
}

/// Unknown email and wrong password are indistinguishable to the caller, in the
/// response and in the time Argon2 takes.
async fn check_credentials(user: Option<UserModel>, password: String) -> AppResult<UserModel> {
    let stored = match &user {
        Some(user) => user.password_hash.clone(),
        None => dummy_hash()?.to_string(),
    };
    let matches = verify_password_blocking(password, stored).await?;

    match user {
        Some(user) if matches => Ok(user),
        _ => Err(AppError::InvalidCredentials(BAD_CREDENTIALS)),
    }
}

pub async fn list_users(state: &AppState) -> AppResult<ApiResponse<UserList>> {
    let items: Vec<User> = Users::find()
        .order_by_asc(UserCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    let total = items.len();
    Ok(ApiResponse::listed("Users", UserList { items }, total))
}
