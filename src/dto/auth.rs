use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppResult, FieldErrors},
    models::User,
};

const MIN_PASSWORD_LEN: usize = 6;
const MIN_NAME_LEN: usize = 2;

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// A registration that passed boundary validation, with the email normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVendorAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(self) -> AppResult<NewVendorAccount> {
        let mut errors = FieldErrors::new();

        let name = self.name.trim().to_string();
        if name.chars().count() < MIN_NAME_LEN {
            errors.add("name", "must be at least 2 characters");
        }

        let email = normalize_email(&self.email);
        if !is_plausible_email(&email) {
            errors.add("email", "invalid email format");
        }

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add("password", "must be at least 6 characters");
        }

        errors.into_result()?;
        Ok(NewVendorAccount {
            name,
            email,
            password: self.password,
        })
    }
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();
        if self.email.trim().is_empty() {
            errors.add("email", "is required");
        }
        if self.password.is_empty() {
            errors.add("password", "is required");
        }
        errors.into_result()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub user: User,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisteredVendor {
    pub user: User,
    pub vendor_id: i64,
    pub approved: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct UserList {
    #[schema(value_type = Vec<User>)]
    pub items: Vec<User>,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// `local@domain.tld` with no whitespace; deliverability is not our concern.
pub fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
