use chrono::Utc;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::{
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest},
    entity::products::{
        ActiveModel as ProductActive, Column as ProdCol, Entity as Products, ProductStatus,
    },
    error::{AppError, AppResult},
    extract::positive_id,
    middleware::auth::AuthUser,
    models::{Product, ProductStatusChange},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::vendor_service::{current_vendor, ensure_approved},
    state::AppState,
};

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let vendor = current_vendor(state, user).await?;
    ensure_approved(&vendor)?;
    let draft = payload.validate()?;

    let product = ProductActive {
        id: NotSet,
        vendor_id: Set(vendor.id),
        name: Set(draft.name),
        price: Set(draft.price),
        status: Set(ProductStatus::Active),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(product_id = product.id, vendor_id = vendor.id, "product created");

    Ok(ApiResponse::success(
        "Product added",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

/// Only the owning, approved vendor may change name or price.
pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: i64,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let id = positive_id("id", id)?;
    let vendor = current_vendor(state, user).await?;
    ensure_approved(&vendor)?;

    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Product not found"))?;
    if existing.vendor_id != vendor.id {
        tracing::warn!(
            product_id = id,
            owner_id = existing.vendor_id,
            vendor_id = vendor.id,
            "cross-vendor product update rejected"
        );
        return Err(AppError::Forbidden("Not your product"));
    }

    let changes = payload.validate()?;
    let mut active: ProductActive = existing.into();
    if let Some(name) = changes.name {
        active.name = Set(name);
    }
    if let Some(price) = changes.price {
        active.price = Set(price);
    }
    active.updated_at = Set(Utc::now().into());
    let product = active.update(&state.orm).await?;

    tracing::info!(product_id = product.id, vendor_id = vendor.id, "product updated");

    Ok(ApiResponse::success(
        "Product updated",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

pub async fn list_own_products(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<ProductList>> {
    let vendor = current_vendor(state, user).await?;

    let items: Vec<Product> = Products::find()
        .filter(ProdCol::VendorId.eq(vendor.id))
        .order_by_desc(ProdCol::CreatedAt)
        .order_by_desc(ProdCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let total = items.len();
    Ok(ApiResponse::listed("Products", ProductList { items }, total))
}

pub async fn list_all_products(
    state: &AppState,
    query: Pagination,
) -> AppResult<ApiResponse<ProductList>> {
    let page = query.normalize();
    let finder = Products::find()
        .order_by_desc(ProdCol::CreatedAt)
        .order_by_desc(ProdCol::Id);

    let total = finder.clone().count(&state.orm).await?;

    let items = finder
        .limit(page.per_page)
        .offset(page.offset)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(Meta::paged(&page, total)),
    ))
}

/// ACTIVE ⇄ BLOCKED in a single conditional update; vendor approval is irrelevant here.
pub async fn toggle_status(
    state: &AppState,
    admin: &AuthUser,
    id: i64,
) -> AppResult<ApiResponse<ProductStatusChange>> {
    let id = positive_id("id", id)?;

    let row: Option<(i64, String)> = sqlx::query_as(
        r#"
        UPDATE products
        SET status = CASE WHEN status = 'ACTIVE' THEN 'BLOCKED' ELSE 'ACTIVE' END,
            updated_at = now()
        WHERE id = $1
        RETURNING id, status
        "#,
    )
    .bind(id)
    .fetch_optional(&state.pool)
    .await?;
    let (id, status) = row.ok_or(AppError::NotFound("Product not found"))?;
    let status = ProductStatus::try_from_value(&status)?;

    tracing::info!(product_id = id, status = ?status, admin_id = admin.user_id, "product status toggled");

    let message = match status {
        ProductStatus::Active => "Product ACTIVE",
        ProductStatus::Blocked => "Product BLOCKED",
    };
    Ok(ApiResponse::success(
        message,
        ProductStatusChange { id, status },
        Some(Meta::empty()),
    ))
}
