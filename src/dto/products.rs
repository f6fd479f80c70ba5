use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppResult, FieldErrors},
    models::Product,
};

const MAX_NAME_LEN: usize = 255;
const MAX_PRICE_SCALE: u32 = 2;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    #[schema(value_type = Option<String>, example = "24.50")]
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<Decimal>,
}

impl CreateProductRequest {
    pub fn validate(self) -> AppResult<ProductDraft> {
        let mut errors = FieldErrors::new();
        let name = check_name(&self.name, &mut errors);
        check_price(self.price, &mut errors);
        errors.into_result()?;
        Ok(ProductDraft {
            name,
            price: self.price.normalize(),
        })
    }
}

impl UpdateProductRequest {
    pub fn validate(self) -> AppResult<ProductChanges> {
        let mut errors = FieldErrors::new();
        if self.name.is_none() && self.price.is_none() {
            errors.add("body", "provide a name or a price");
        }
        let name = self.name.as_deref().map(|name| check_name(name, &mut errors));
        if let Some(price) = self.price {
            check_price(price, &mut errors);
        }
        errors.into_result()?;
        Ok(ProductChanges {
            name,
            price: self.price.map(|p| p.normalize()),
        })
    }
}

fn check_name(raw: &str, errors: &mut FieldErrors) -> String {
    let name = raw.trim();
    if name.is_empty() {
        errors.add("name", "Product name is required");
    } else if name.chars().count() > MAX_NAME_LEN {
        errors.add("name", "must be at most 255 characters");
    }
    name.to_string()
}

fn check_price(price: Decimal, errors: &mut FieldErrors) {
    if price <= Decimal::ZERO {
        errors.add("price", "Price must be a positive number");
    } else if price.normalize().scale() > MAX_PRICE_SCALE {
        errors.add("price", "must have at most 2 decimal places");
    } else if price >= Decimal::from(10_000_000_000_i64) {
        errors.add("price", "is too large");
    }
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}
