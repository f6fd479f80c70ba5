use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};

use crate::{entity::users::UserRole, error::AppError, state::AppState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
    pub role: UserRole,
}

/// An authenticated caller holding the ADMIN role.
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub AuthUser);

/// An authenticated caller holding the VENDOR role.
#[derive(Debug, Clone, Copy)]
pub struct VendorUser(pub AuthUser);

pub fn ensure_role(user: &AuthUser, role: UserRole) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden(match role {
            UserRole::Admin => "Admin only",
            UserRole::Vendor => "Vendor only",
        }));
    }
    Ok(())
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(AppError::Unauthorized)?
        .to_str()
        .map_err(|_| AppError::Unauthorized)?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthorized)?;
    Ok(token)
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let token = bearer_token(parts)?;
        let identity = state.tokens.verify(token)?;

        Ok(AuthUser {
            user_id: identity.user_id,
            role: identity.role,
        })
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        ensure_role(&user, UserRole::Admin)?;
        Ok(AdminUser(user))
    }
}

impl<S> FromRequestParts<S> for VendorUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        ensure_role(&user, UserRole::Vendor)?;
        Ok(VendorUser(user))
    }
}
