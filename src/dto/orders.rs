use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppResult, FieldErrors},
    models::OrderDetail,
};

/// Admin-initiated order. Any client-supplied total is not part of the contract and is ignored.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub product_id: i64,
    pub vendor_id: i64,
    pub quantity: i64,
}

/// Structurally valid order input; ids are positive and quantity fits the storage column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderInput {
    pub product_id: i64,
    pub vendor_id: i64,
    pub quantity: i32,
}

impl CreateOrderRequest {
    pub fn validate(&self) -> AppResult<OrderInput> {
        let mut errors = FieldErrors::new();
        if self.product_id <= 0 {
            errors.add("product_id", "Invalid product id");
        }
        if self.vendor_id <= 0 {
            errors.add("vendor_id", "Invalid vendor id");
        }
        let quantity = match i32::try_from(self.quantity) {
            Ok(q) if q > 0 => q,
            Ok(_) => {
                errors.add("quantity", "Quantity must be a positive number");
                0
            }
            Err(_) => {
                errors.add("quantity", "Quantity is too large");
                0
            }
        };
        errors.into_result()?;

        Ok(OrderInput {
            product_id: self.product_id,
            vendor_id: self.vendor_id,
            quantity,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<OrderDetail>,
}
