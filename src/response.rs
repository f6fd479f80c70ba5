use serde::Serialize;
use utoipa::ToSchema;

use crate::routes::params::Page;

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub total: Option<u64>,
}

impl Meta {
    pub fn paged(page: &Page, total: u64) -> Self {
        Self {
            page: Some(page.number),
            per_page: Some(page.per_page),
            total: Some(total),
        }
    }

    pub fn total(total: u64) -> Self {
        Self {
            page: None,
            per_page: None,
            total: Some(total),
        }
    }

    pub fn empty() -> Self {
        Self {
            page: None,
            per_page: None,
            total: None,
        }
    }
}

/// JSON envelope shared by every endpoint, success or failure.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }

    pub fn listed(message: impl Into<String>, data: T, total: usize) -> Self {
        Self::success(message, data, Some(Meta::total(total as u64)))
    }
}
