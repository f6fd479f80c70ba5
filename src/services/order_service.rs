use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, EntityTrait, QuerySelect, Set, TransactionTrait,
    sea_query::LockType,
};

use crate::{
    db::DbPool,
    dto::orders::{CreateOrderRequest, OrderInput, OrderList},
    entity::{
        orders::ActiveModel as OrderActive,
        products::{Entity as Products, Model as ProductModel, ProductStatus},
        vendors::{Entity as Vendors, Model as VendorModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{OrderDetail, SalesStats},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::vendor_service::current_vendor,
    state::AppState,
};

macro_rules! order_detail_query {
    ($tail:literal) => {
        concat!(
            r#"
            SELECT o.id, o.vendor_id, o.product_id,
                   p.name AS product_name, u.name AS vendor_name,
                   o.quantity, o.total_price, o.created_at
            FROM orders o
            JOIN products p ON p.id = o.product_id
            JOIN vendors v ON v.id = o.vendor_id
            JOIN users u ON u.id = v.user_id
            "#,
            $tail
        )
    };
}

/// An order that passed every placement rule, priced from stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedOrder {
    pub vendor_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub total_price: Decimal,
}

/// Applies the placement rules in their fixed order against the rows looked up for `input`.
///
/// The first failing rule decides the error, so callers get the same rejection for the
/// same stored state no matter which other rules would also fail.
pub fn evaluate_placement(
    input: &OrderInput,
    product: Option<&ProductModel>,
    vendor: Option<&VendorModel>,
) -> AppResult<PricedOrder> {
    let product = product.ok_or(AppError::NotFound("Product not found"))?;
    if product.status != ProductStatus::Active {
        return Err(AppError::InvalidState("Product is not active"));
    }
    if product.vendor_id != input.vendor_id {
        return Err(AppError::InvalidState(
            "Product does not belong to this vendor",
        ));
    }

    let vendor = vendor.ok_or(AppError::NotFound("Vendor not found"))?;
    if !vendor.approved {
        return Err(AppError::InvalidState("Vendor is not approved"));
    }

    let total_price = product
        .price
        .checked_mul(Decimal::from(input.quantity))
        .ok_or_else(|| AppError::invalid_field("quantity", "order total is out of range"))?;

    Ok(PricedOrder {
        vendor_id: vendor.id,
        product_id: product.id,
        quantity: input.quantity,
        total_price,
    })
}

/// Validates and records an order in one transaction. The product and vendor rows are read
/// `FOR SHARE`, so a concurrent block or de-approval waits until the insert commits.
pub async fn create_order(
    state: &AppState,
    admin: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderDetail>> {
    let input = payload.validate()?;

    let txn = state.orm.begin().await?;
    let product = Products::find_by_id(input.product_id)
        .lock(LockType::Share)
        .one(&txn)
        .await?;
    let vendor = Vendors::find_by_id(input.vendor_id)
        .lock(LockType::Share)
        .one(&txn)
        .await?;

    let priced = evaluate_placement(&input, product.as_ref(), vendor.as_ref())?;

    let order = OrderActive {
        id: NotSet,
        vendor_id: Set(priced.vendor_id),
        product_id: Set(priced.product_id),
        quantity: Set(priced.quantity),
        total_price: Set(priced.total_price),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    tracing::info!(
        order_id = order.id,
        product_id = order.product_id,
        vendor_id = order.vendor_id,
        quantity = order.quantity,
        total_price = %order.total_price,
        admin_id = admin.user_id,
        "order created"
    );

    let detail = fetch_order_detail(&state.pool, order.id)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("order {} missing after insert", order.id)))?;

    Ok(ApiResponse::success(
        "Order created successfully",
        detail,
        Some(Meta::empty()),
    ))
}

pub async fn fetch_order_detail(pool: &DbPool, id: i64) -> AppResult<Option<OrderDetail>> {
    let detail = sqlx::query_as::<_, OrderDetail>(order_detail_query!("WHERE o.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(detail)
}

pub async fn list_all_orders(
    state: &AppState,
    query: Pagination,
) -> AppResult<ApiResponse<OrderList>> {
    let page = query.normalize();

    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
        .fetch_one(&state.pool)
        .await?;

    let items = sqlx::query_as::<_, OrderDetail>(order_detail_query!(
        "ORDER BY o.created_at DESC, o.id DESC LIMIT $1 OFFSET $2"
    ))
    .bind(page.per_page as i64)
    .bind(page.offset as i64)
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "Orders",
        OrderList { items },
        Some(Meta::paged(&page, total as u64)),
    ))
}

pub async fn list_vendor_orders(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<OrderList>> {
    let vendor = current_vendor(state, user).await?;

    let items = sqlx::query_as::<_, OrderDetail>(order_detail_query!(
        "WHERE o.vendor_id = $1 ORDER BY o.created_at DESC, o.id DESC"
    ))
    .bind(vendor.id)
    .fetch_all(&state.pool)
    .await?;

    let total = items.len();
    Ok(ApiResponse::listed("Orders", OrderList { items }, total))
}

pub async fn sales_stats(state: &AppState) -> AppResult<ApiResponse<SalesStats>> {
    let (total_orders, total_revenue): (i64, Decimal) =
        sqlx::query_as("SELECT COUNT(id), COALESCE(SUM(total_price), 0) FROM orders")
            .fetch_one(&state.pool)
            .await?;

    let (total_vendors,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM vendors WHERE approved")
            .fetch_one(&state.pool)
            .await?;

    Ok(ApiResponse::success(
        "Sales",
        SalesStats {
            total_orders,
            total_revenue,
            total_vendors,
        },
        Some(Meta::empty()),
    ))
}
