use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::{
    products::{Model as ProductModel, ProductStatus},
    users::{Model as UserModel, UserRole},
};

/// Public view of an account. The password hash never leaves the service layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role: model.role,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct VendorSummary {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub approved: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VendorApproval {
    pub id: i64,
    pub approved: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i64,
    pub vendor_id: i64,
    pub name: String,
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductModel> for Product {
    fn from(model: ProductModel) -> Self {
        Self {
            id: model.id,
            vendor_id: model.vendor_id,
            name: model.name,
            price: model.price,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductStatusChange {
    pub id: i64,
    pub status: ProductStatus,
}

/// An order joined with the names it is displayed with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct OrderDetail {
    pub id: i64,
    pub vendor_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub vendor_name: String,
    pub quantity: i32,
    #[schema(value_type = String, example = "59.97")]
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SalesStats {
    pub total_orders: i64,
    #[schema(value_type = String, example = "1250.00")]
    pub total_revenue: Decimal,
    pub total_vendors: i64,
}
